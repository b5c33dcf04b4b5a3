//! Abstractive summarization stage

use std::sync::Arc;

use crate::inference::{AbstractiveSummarizer, InferenceError, SummaryParams};
use crate::model::SummaryConfig;

/// Wraps the summarization collaborator with the pipeline's generation
/// constraints: beam search (4 beams), length penalty 2.0, early stopping.
///
/// The collaborator considers only the first 512 tokens of its input; longer
/// documents are summarized from that prefix. Callers relying on full-text
/// coverage must chunk upstream.
pub struct Summarizer {
    backend: Arc<dyn AbstractiveSummarizer>,
    params: SummaryParams,
}

impl Summarizer {
    pub fn new(backend: Arc<dyn AbstractiveSummarizer>, config: &SummaryConfig) -> Self {
        Self {
            backend,
            params: SummaryParams::new(config.max_length, config.min_length),
        }
    }

    /// Generate the summary; failure is fatal to the whole analysis
    pub async fn summarize(&self, text: &str) -> Result<String, InferenceError> {
        self.backend.summarize(text, &self.params).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct ParamCapture;

    #[async_trait]
    impl AbstractiveSummarizer for ParamCapture {
        async fn summarize(
            &self,
            _text: &str,
            params: &SummaryParams,
        ) -> Result<String, InferenceError> {
            assert_eq!(params.num_beams, 4);
            assert_eq!(params.length_penalty, 2.0);
            assert!(params.early_stopping);
            assert_eq!(params.max_length, 150);
            assert_eq!(params.min_length, 30);
            Ok("a summary".to_string())
        }
    }

    #[tokio::test]
    async fn test_generation_constraints_forwarded() {
        let summarizer = Summarizer::new(Arc::new(ParamCapture), &SummaryConfig::default());
        let summary = summarizer.summarize("some document").await.unwrap();
        assert_eq!(summary, "a summary");
    }
}
