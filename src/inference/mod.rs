//! Collaborator contracts for external inference and extraction services
//!
//! The analysis pipeline never runs a model in-process. Named entity
//! recognition, extractive question answering, abstractive summarization and
//! PDF text extraction are reached through these narrow traits; the default
//! implementations in [`remote`] talk to model-serving endpoints over HTTP.

pub mod remote;

use async_trait::async_trait;

pub use remote::{RemoteInferenceClient, RemotePdfExtractor};

#[derive(Debug, thiserror::Error)]
pub enum InferenceError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Failed to parse response: {0}")]
    ParseError(String),

    #[error("Inference service unavailable: {0}")]
    Unavailable(String),
}

/// A typed entity span reported by the NER collaborator
#[derive(Debug, Clone, serde::Deserialize)]
pub struct NamedEntity {
    /// NER label, e.g. PERSON, ORG, DATE, MONEY, GPE
    pub label: String,
    pub text: String,
}

/// An extractive QA answer with the model's confidence
#[derive(Debug, Clone, serde::Deserialize)]
pub struct QaAnswer {
    pub answer: String,
    /// Model score in [0, 1]
    pub score: f64,
}

/// Generation constraints passed to the summarization collaborator
///
/// The collaborator truncates input to its 512-token window; documents longer
/// than that are summarized from their prefix only.
#[derive(Debug, Clone, serde::Serialize)]
pub struct SummaryParams {
    pub max_length: u32,
    pub min_length: u32,
    pub num_beams: u32,
    pub length_penalty: f64,
    pub early_stopping: bool,
}

impl SummaryParams {
    pub fn new(max_length: u32, min_length: u32) -> Self {
        Self {
            max_length,
            min_length,
            num_beams: 4,
            length_penalty: 2.0,
            early_stopping: true,
        }
    }
}

/// Named entity recognition collaborator
#[async_trait]
pub trait EntityAnnotator: Send + Sync {
    /// Annotate the text with typed entity spans, in document order
    async fn annotate(&self, text: &str) -> Result<Vec<NamedEntity>, InferenceError>;
}

/// Extractive question answering collaborator
#[async_trait]
pub trait ExtractiveQa: Send + Sync {
    /// Answer a question against the full document text
    async fn answer(&self, question: &str, context: &str) -> Result<QaAnswer, InferenceError>;
}

/// Abstractive summarization collaborator
#[async_trait]
pub trait AbstractiveSummarizer: Send + Sync {
    async fn summarize(&self, text: &str, params: &SummaryParams)
        -> Result<String, InferenceError>;
}

/// PDF text extraction collaborator
#[async_trait]
pub trait PdfTextExtractor: Send + Sync {
    /// Extract plain text from PDF bytes
    ///
    /// An empty result is returned as-is; callers must treat it as a failed
    /// extraction rather than analyzing an empty document.
    async fn extract(&self, bytes: &[u8]) -> Result<String, InferenceError>;
}
