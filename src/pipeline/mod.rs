//! The document analysis pipeline
//!
//! [`AnalysisPipeline`] is the orchestrator: it owns the fixed stage ordering
//! (normalize, classify, entities, clauses, summarize, assemble) and the
//! failure policy. Entity extraction and summarization are required stages
//! whose failure aborts the analysis; the classifier cannot fail and clause
//! extraction degrades per question. No stage runs more than once per call
//! and nothing is retried.
//!
//! The pipeline is stateless apart from its collaborator handles; it is
//! constructed once at startup and shared by reference, so concurrent calls
//! never interfere.

pub mod classify;
pub mod clauses;
pub mod entities;
pub mod normalize;
pub mod summarize;

use std::sync::Arc;

use chrono::Utc;

use crate::inference::{
    AbstractiveSummarizer, EntityAnnotator, ExtractiveQa, InferenceError,
};
use crate::model::{AnalysisResult, DocumentInfo, SummaryConfig};

use clauses::ClauseExtractor;
use entities::EntityExtractor;
use summarize::Summarizer;

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("No document content provided")]
    EmptyDocument,

    #[error("Entity extraction failed: {0}")]
    EntityExtraction(#[source] InferenceError),

    #[error("Summarization failed: {0}")]
    Summarization(#[source] InferenceError),
}

/// Immutable pipeline handle built once at startup and injected everywhere
/// an analysis runs
pub struct AnalysisPipeline {
    entities: EntityExtractor,
    clauses: ClauseExtractor,
    summarizer: Summarizer,
}

impl AnalysisPipeline {
    pub fn new(
        annotator: Arc<dyn EntityAnnotator>,
        qa: Arc<dyn ExtractiveQa>,
        summarization: Arc<dyn AbstractiveSummarizer>,
        summary_config: &SummaryConfig,
    ) -> Self {
        Self {
            entities: EntityExtractor::new(annotator),
            clauses: ClauseExtractor::new(qa),
            summarizer: Summarizer::new(summarization, summary_config),
        }
    }

    /// Run the full analysis over raw document text
    ///
    /// Reentrant: concurrent calls with different inputs share nothing but
    /// the collaborator clients.
    pub async fn analyze(&self, raw_text: &str) -> Result<AnalysisResult, PipelineError> {
        let text = normalize::normalize_text(raw_text);
        if text.is_empty() {
            return Err(PipelineError::EmptyDocument);
        }

        let classification = classify::classify(&text);
        tracing::info!(
            document_type = %classification.predicted_type,
            confidence = classification.confidence,
            "Document classified"
        );

        let entities = self
            .entities
            .extract(&text)
            .await
            .map_err(PipelineError::EntityExtraction)?;

        let key_clauses = self
            .clauses
            .extract(&text, classification.predicted_type)
            .await;
        tracing::debug!(count = key_clauses.len(), "Key clauses extracted");

        let summary = self
            .summarizer
            .summarize(&text)
            .await
            .map_err(PipelineError::Summarization)?;

        Ok(AnalysisResult {
            document_info: DocumentInfo {
                document_type: classification.predicted_type,
                confidence: classification.confidence,
                // Word count reflects the raw submission, not the
                // normalized form
                word_count: raw_text.split_whitespace().count() as i64,
                processed_at: Utc::now(),
            },
            entities,
            key_clauses,
            summary,
            classification_scores: classification.scores,
        })
    }
}
