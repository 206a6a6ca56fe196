use crate::application::ports::{FileLoader, FileLoaderError};
use crate::domain::Page;

/// Treats the upload as UTF-8 text with pages separated by form feeds.
pub struct MockFileLoader;

#[async_trait::async_trait]
impl FileLoader for MockFileLoader {
    async fn extract_pages(&self, data: &[u8], filename: &str) -> Result<Vec<Page>, FileLoaderError> {
        let text = String::from_utf8(data.to_vec())
            .map_err(|e| FileLoaderError::ExtractionFailed(e.to_string()))?;

        let pages: Vec<Page> = text
            .split('\u{c}')
            .enumerate()
            .filter(|(_, t)| !t.trim().is_empty())
            .map(|(i, t)| Page {
                number: (i + 1) as u32,
                text: t.trim().to_string(),
            })
            .collect();

        if pages.is_empty() {
            return Err(FileLoaderError::NoTextFound(filename.to_string()));
        }
        Ok(pages)
    }
}
