use std::sync::Arc;

use crate::application::ports::{
    CollectionConfig, Embedder, EmbedderError, FileLoader, FileLoaderError, LlmClient,
    StoredDocument, SummaryRepository, TextSplitter, TextSplitterError, VectorStore,
    VectorStoreError,
};
use crate::domain::{Chunk, CollectionName, DocSummary, UserId};

const SUMMARY_SOURCE_CHUNKS: usize = 10;
const EMBED_BATCH_SIZE: usize = 64;

const SUMMARY_PROMPT: &str = r#"You are an expert document summarizer. Read the following PDF text and generate a concise summary.

Requirements:
- Capture the main ideas, key points, and overall purpose of the document.
- Keep the summary clear, factual, and to the point.
- Do not copy large portions of text verbatim.
- Write in 1-3 short paragraphs.

Text to summarize:
"""{text}"""

Summary:"#;

#[derive(Debug, Clone, PartialEq)]
pub struct IngestionReport {
    pub filename: String,
    pub user_id: UserId,
    pub collection_name: CollectionName,
    pub pages_loaded: usize,
    pub chunks_created: usize,
}

pub struct IngestionService {
    file_loader: Arc<dyn FileLoader>,
    text_splitter: Arc<dyn TextSplitter>,
    embedder: Arc<dyn Embedder>,
    vector_store: Arc<dyn VectorStore>,
    llm_client: Arc<dyn LlmClient>,
    summary_repository: Arc<dyn SummaryRepository>,
    max_upload_bytes: usize,
}

impl IngestionService {
    pub fn new(
        file_loader: Arc<dyn FileLoader>,
        text_splitter: Arc<dyn TextSplitter>,
        embedder: Arc<dyn Embedder>,
        vector_store: Arc<dyn VectorStore>,
        llm_client: Arc<dyn LlmClient>,
        summary_repository: Arc<dyn SummaryRepository>,
        max_upload_bytes: usize,
    ) -> Self {
        Self {
            file_loader,
            text_splitter,
            embedder,
            vector_store,
            llm_client,
            summary_repository,
            max_upload_bytes,
        }
    }

    pub fn validate_upload(&self, filename: &str, size: usize) -> Result<(), IngestionError> {
        if !filename.to_lowercase().ends_with(".pdf") {
            tracing::warn!(filename, "Upload rejected: not a PDF");
            return Err(IngestionError::InvalidFile(
                "Only PDF files are supported".to_string(),
            ));
        }

        if size > self.max_upload_bytes {
            tracing::warn!(filename, size, "Upload rejected: file too large");
            return Err(IngestionError::InvalidFile(format!(
                "File size too large. Maximum {}MB allowed.",
                self.max_upload_bytes / (1024 * 1024)
            )));
        }

        Ok(())
    }

    #[tracing::instrument(skip(self, data), fields(user_id = %user_id, size = data.len()))]
    pub async fn ingest_pdf(
        &self,
        user_id: &UserId,
        filename: &str,
        data: &[u8],
    ) -> Result<IngestionReport, IngestionError> {
        self.validate_upload(filename, data.len())?;

        let pages = match self.file_loader.extract_pages(data, filename).await {
            Ok(pages) => pages,
            Err(FileLoaderError::NoTextFound(_)) => return Err(IngestionError::NoContent),
            Err(e) => return Err(IngestionError::FileLoading(e)),
        };

        if pages.is_empty() {
            tracing::warn!(filename, "No content found in PDF");
            return Err(IngestionError::NoContent);
        }
        tracing::info!(pages = pages.len(), "PDF loaded");

        let mut chunks: Vec<Chunk> = Vec::new();
        for page in &pages {
            chunks.extend(self.text_splitter.split(page, filename).await?);
        }

        if chunks.is_empty() {
            return Err(IngestionError::NoContent);
        }
        tracing::info!(chunks = chunks.len(), "Pages split into chunks");

        let collection_name = CollectionName::for_document(user_id, filename);
        let embeddings = self.embed_chunks(&chunks).await?;
        let dimensions = embeddings
            .first()
            .map(|e| e.dimensions() as u64)
            .unwrap_or_default();

        if self
            .vector_store
            .collection_exists(collection_name.as_str())
            .await?
        {
            tracing::info!(collection = %collection_name, "Replacing existing collection");
            self.vector_store
                .delete_collection(collection_name.as_str())
                .await?;
        }

        self.vector_store
            .create_collection(
                collection_name.as_str(),
                &CollectionConfig::document_collection(dimensions),
            )
            .await?;

        let documents: Vec<StoredDocument> = chunks
            .iter()
            .map(|chunk| {
                let mut document = StoredDocument::from(chunk);
                document.metadata.insert(
                    "user_id".to_string(),
                    serde_json::Value::from(user_id.as_str()),
                );
                document
            })
            .collect();

        self.vector_store
            .upsert(collection_name.as_str(), &documents, &embeddings)
            .await?;
        tracing::info!(collection = %collection_name, "Vector store populated");

        self.summarize(user_id, filename, &collection_name, &chunks)
            .await;

        Ok(IngestionReport {
            filename: filename.to_string(),
            user_id: user_id.clone(),
            collection_name,
            pages_loaded: pages.len(),
            chunks_created: chunks.len(),
        })
    }

    async fn embed_chunks(
        &self,
        chunks: &[Chunk],
    ) -> Result<Vec<crate::domain::Embedding>, IngestionError> {
        let mut embeddings = Vec::with_capacity(chunks.len());
        for batch in chunks.chunks(EMBED_BATCH_SIZE) {
            let texts: Vec<&str> = batch.iter().map(|c| c.text.as_str()).collect();
            embeddings.extend(self.embedder.embed_batch(&texts).await?);
        }
        Ok(embeddings)
    }

    async fn summarize(
        &self,
        user_id: &UserId,
        filename: &str,
        collection_name: &CollectionName,
        chunks: &[Chunk],
    ) {
        let text = chunks
            .iter()
            .take(SUMMARY_SOURCE_CHUNKS)
            .map(|c| c.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        let prompt = SUMMARY_PROMPT.replace("{text}", &text);

        let summary = match self.llm_client.complete(&prompt).await {
            Ok(summary) => summary,
            Err(e) => {
                tracing::warn!(error = %e, filename, "Document summary generation failed");
                return;
            }
        };

        let record = DocSummary::new(
            user_id.clone(),
            filename.to_string(),
            collection_name.clone(),
            summary,
        );
        match self.summary_repository.save(&record).await {
            Ok(()) => tracing::info!(filename, "Document summary saved"),
            Err(e) => tracing::warn!(error = %e, filename, "Failed to save document summary"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum IngestionError {
    #[error("{0}")]
    InvalidFile(String),
    #[error("No content found in PDF")]
    NoContent,
    #[error("file loading: {0}")]
    FileLoading(FileLoaderError),
    #[error("text splitting: {0}")]
    Splitting(#[from] TextSplitterError),
    #[error("embedding: {0}")]
    Embedding(#[from] EmbedderError),
    #[error("storage: {0}")]
    Storage(#[from] VectorStoreError),
}
