use std::io::Write;
use std::time::Duration;

use async_trait::async_trait;
use pdf_oxide::PdfDocument;

use crate::application::ports::{FileLoader, FileLoaderError};
use crate::domain::Page;

use super::text_sanitizer::sanitize_extracted_text;

const EXTRACTION_TIMEOUT: Duration = Duration::from_secs(30);

/// Per-page PDF text extraction. Pages without text after sanitizing are dropped.
#[derive(Default)]
pub struct PdfAdapter;

impl PdfAdapter {
    pub fn new() -> Self {
        Self
    }

    fn read_pages(path: &std::path::Path) -> Result<Vec<Page>, FileLoaderError> {
        let mut doc = PdfDocument::open(path)
            .map_err(|e| FileLoaderError::ExtractionFailed(format!("failed to parse PDF: {e}")))?;

        let page_count = doc.page_count().map_err(|e| {
            FileLoaderError::ExtractionFailed(format!("failed to read page count: {e}"))
        })?;

        let mut pages = Vec::with_capacity(page_count);
        for page_index in 0..page_count {
            let raw = match doc.extract_text(page_index) {
                Ok(text) => text,
                Err(e) => {
                    tracing::warn!(page = page_index + 1, error = %e, "Skipping unreadable page");
                    continue;
                }
            };

            let text = sanitize_extracted_text(&raw);
            if !text.is_empty() {
                pages.push(Page {
                    number: (page_index + 1) as u32,
                    text,
                });
            }
        }

        Ok(pages)
    }
}

#[async_trait]
impl FileLoader for PdfAdapter {
    #[tracing::instrument(skip(self, data), fields(size = data.len()))]
    async fn extract_pages(&self, data: &[u8], filename: &str) -> Result<Vec<Page>, FileLoaderError> {
        let mut temp_file = tempfile::NamedTempFile::new().map_err(|e| {
            FileLoaderError::ExtractionFailed(format!("failed to create temp file: {e}"))
        })?;

        temp_file.write_all(data).map_err(|e| {
            FileLoaderError::ExtractionFailed(format!("failed to write temp file: {e}"))
        })?;

        let pages = tokio::time::timeout(
            EXTRACTION_TIMEOUT,
            tokio::task::spawn_blocking(move || Self::read_pages(temp_file.path())),
        )
        .await
        .map_err(|_| FileLoaderError::ExtractionFailed("PDF extraction timed out".to_string()))?
        .map_err(|e| FileLoaderError::ExtractionFailed(format!("task join error: {e}")))??;

        tracing::info!(page_count = pages.len(), "PDF text extraction complete");

        if pages.is_empty() {
            return Err(FileLoaderError::NoTextFound(filename.to_string()));
        }

        Ok(pages)
    }
}
