//! Analysis service: synchronous text analysis and asynchronous PDF jobs

use std::sync::Arc;

use async_trait::async_trait;

use crate::db::DbError;
use crate::inference::PdfTextExtractor;
use crate::model::{AnalysisRecord, JobStatus, RawDocument};
use crate::pipeline::{AnalysisPipeline, PipelineError};
use crate::service::jobs::JobTracker;
use crate::service::risk;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum AnalysisServiceError {
    #[error("No document content provided")]
    EmptyDocument,

    #[error("Analysis failed: {0}")]
    Pipeline(#[from] PipelineError),

    #[error("Failed to persist analysis: {0}")]
    Persistence(#[from] DbError),
}

/// Persistence seam for completed analyses
///
/// Implemented by the Postgres repository; tests substitute an in-memory
/// fake.
#[async_trait]
pub trait AnalysisStore: Send + Sync {
    async fn save(&self, record: &AnalysisRecord) -> Result<(), DbError>;
}

/// Front door for document analysis
///
/// Synchronous submissions run the pipeline inline and block the caller;
/// PDF submissions return a job id immediately and report progress through
/// the [`JobTracker`].
pub struct AnalysisService {
    pipeline: Arc<AnalysisPipeline>,
    pdf_extractor: Arc<dyn PdfTextExtractor>,
    store: Arc<dyn AnalysisStore>,
    tracker: Arc<JobTracker>,
}

impl AnalysisService {
    pub fn new(
        pipeline: Arc<AnalysisPipeline>,
        pdf_extractor: Arc<dyn PdfTextExtractor>,
        store: Arc<dyn AnalysisStore>,
        tracker: Arc<JobTracker>,
    ) -> Self {
        Self {
            pipeline,
            pdf_extractor,
            store,
            tracker,
        }
    }

    pub fn tracker(&self) -> &JobTracker {
        &self.tracker
    }

    /// Analyze raw text synchronously: pipeline, risk scoring, persistence
    pub async fn analyze_text(
        &self,
        text: String,
        filename: Option<String>,
    ) -> Result<AnalysisRecord, AnalysisServiceError> {
        if text.trim().is_empty() {
            return Err(AnalysisServiceError::EmptyDocument);
        }

        let document = RawDocument::new(text, filename);

        let result = self.pipeline.analyze(&document.text).await?;
        let risk = risk::assess(&result);

        let record = AnalysisRecord {
            document_id: document.content_hash.clone(),
            filename: document.filename.clone(),
            byte_size: document.byte_size,
            result,
            risk,
        };

        self.store.save(&record).await?;

        tracing::info!(
            document_id = %record.document_id,
            document_type = %record.result.document_info.document_type,
            risk_level = %record.risk.risk_level.as_str(),
            "Document analysis completed"
        );

        Ok(record)
    }

    /// Submit PDF bytes for asynchronous analysis and return the job id
    ///
    /// The runner drives the job through its checkpoints in the background;
    /// callers poll the tracker for progress.
    pub fn submit_pdf(self: &Arc<Self>, bytes: Vec<u8>, filename: Option<String>) -> Uuid {
        let job_id = self.tracker.submit();
        let service = Arc::clone(self);

        tokio::spawn(async move {
            service.run_pdf_job(job_id, bytes, filename).await;
        });

        job_id
    }

    /// Background runner for one PDF job
    ///
    /// One-way progression: EXTRACTING_TEXT, ANALYZING, then COMPLETED with
    /// the record or ERROR with the message. Each tracker write targets only
    /// this job's entry.
    async fn run_pdf_job(&self, job_id: Uuid, bytes: Vec<u8>, filename: Option<String>) {
        let _ = self.tracker.advance(job_id, JobStatus::ExtractingText);

        let text = match self.pdf_extractor.extract(&bytes).await {
            Ok(text) => text,
            Err(e) => {
                let _ = self
                    .tracker
                    .fail(job_id, format!("Failed to extract text from PDF: {}", e));
                return;
            }
        };

        // An empty extraction is a failure; never analyze an empty document
        if text.trim().is_empty() {
            let _ = self
                .tracker
                .fail(job_id, "Could not extract text from PDF");
            return;
        }

        let _ = self.tracker.advance(job_id, JobStatus::Analyzing);

        match self.analyze_text(text, filename).await {
            Ok(record) => {
                let _ = self.tracker.complete(job_id, record);
            }
            Err(e) => {
                tracing::error!(job_id = %job_id, error = %e, "Background analysis failed");
                let _ = self.tracker.fail(job_id, e.to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::{
        AbstractiveSummarizer, EntityAnnotator, ExtractiveQa, InferenceError, NamedEntity,
        QaAnswer, SummaryParams,
    };
    use crate::model::{DocumentType, SummaryConfig};
    use std::time::Duration;

    struct StubBackend;

    #[async_trait]
    impl EntityAnnotator for StubBackend {
        async fn annotate(&self, _text: &str) -> Result<Vec<NamedEntity>, InferenceError> {
            Ok(vec![NamedEntity {
                label: "DATE".to_string(),
                text: "January 1, 2024".to_string(),
            }])
        }
    }

    #[async_trait]
    impl ExtractiveQa for StubBackend {
        async fn answer(&self, _q: &str, _c: &str) -> Result<QaAnswer, InferenceError> {
            Ok(QaAnswer {
                answer: "the parties".to_string(),
                score: 0.5,
            })
        }
    }

    #[async_trait]
    impl AbstractiveSummarizer for StubBackend {
        async fn summarize(
            &self,
            _text: &str,
            _params: &SummaryParams,
        ) -> Result<String, InferenceError> {
            Ok("summary".to_string())
        }
    }

    struct NullStore;

    #[async_trait]
    impl AnalysisStore for NullStore {
        async fn save(&self, _record: &AnalysisRecord) -> Result<(), DbError> {
            Ok(())
        }
    }

    /// PDF extractor returning a fixed payload
    struct FixedExtractor(&'static str);

    #[async_trait]
    impl PdfTextExtractor for FixedExtractor {
        async fn extract(&self, _bytes: &[u8]) -> Result<String, InferenceError> {
            Ok(self.0.to_string())
        }
    }

    fn service_with(extractor: Arc<dyn PdfTextExtractor>) -> Arc<AnalysisService> {
        let backend = Arc::new(StubBackend);
        let pipeline = Arc::new(AnalysisPipeline::new(
            backend.clone(),
            backend.clone(),
            backend,
            &SummaryConfig::default(),
        ));
        Arc::new(AnalysisService::new(
            pipeline,
            extractor,
            Arc::new(NullStore),
            Arc::new(JobTracker::new()),
        ))
    }

    async fn await_terminal(service: &AnalysisService, job_id: Uuid) -> crate::model::Job {
        for _ in 0..200 {
            let job = service.tracker().query(job_id).unwrap();
            if job.status.is_terminal() {
                return job;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("job never reached a terminal state");
    }

    #[tokio::test]
    async fn test_sync_analysis_produces_record() {
        let service = service_with(Arc::new(FixedExtractor("")));

        let record = service
            .analyze_text(
                "This agreement, whereas each party makes a covenant.".to_string(),
                Some("contract.txt".to_string()),
            )
            .await
            .unwrap();

        assert_eq!(
            record.result.document_info.document_type,
            DocumentType::Contract
        );
        assert_eq!(record.filename.as_deref(), Some("contract.txt"));
        assert_eq!(record.document_id.len(), 64);
    }

    #[tokio::test]
    async fn test_sync_empty_text_rejected() {
        let service = service_with(Arc::new(FixedExtractor("")));
        let outcome = service.analyze_text("   ".to_string(), None).await;
        assert!(matches!(outcome, Err(AnalysisServiceError::EmptyDocument)));
    }

    #[tokio::test]
    async fn test_pdf_job_completes_with_result() {
        let service = service_with(Arc::new(FixedExtractor(
            "This agreement, whereas each party makes a covenant.",
        )));

        let job_id = service.submit_pdf(vec![1, 2, 3], Some("scan.pdf".to_string()));
        let job = await_terminal(&service, job_id).await;

        assert_eq!(job.status, JobStatus::Completed);
        assert_eq!(job.progress, 100);
        let record = job.result.unwrap();
        assert_eq!(
            record.result.document_info.document_type,
            DocumentType::Contract
        );
    }

    #[tokio::test]
    async fn test_pdf_with_empty_extraction_errors_before_analysis() {
        let service = service_with(Arc::new(FixedExtractor("   \n ")));

        let job_id = service.submit_pdf(vec![0xff], None);
        let job = await_terminal(&service, job_id).await;

        assert_eq!(job.status, JobStatus::Error);
        assert!(job
            .error
            .as_deref()
            .unwrap()
            .contains("extract text from PDF"));
        // Failed during extraction, so the ANALYZING checkpoint (50) was
        // never reached
        assert_eq!(job.progress, JobStatus::ExtractingText.progress());
        assert!(job.result.is_none());
    }

    #[tokio::test]
    async fn test_pdf_extractor_failure_fails_job() {
        struct BrokenExtractor;

        #[async_trait]
        impl PdfTextExtractor for BrokenExtractor {
            async fn extract(&self, _bytes: &[u8]) -> Result<String, InferenceError> {
                Err(InferenceError::Unavailable("tika offline".to_string()))
            }
        }

        let service = service_with(Arc::new(BrokenExtractor));
        let job_id = service.submit_pdf(vec![0x25, 0x50], None);
        let job = await_terminal(&service, job_id).await;

        assert_eq!(job.status, JobStatus::Error);
        assert!(job.error.as_deref().unwrap().contains("tika offline"));
    }

    #[tokio::test]
    async fn test_concurrent_pdf_jobs_are_independent() {
        let service = service_with(Arc::new(FixedExtractor(
            "The employer pays the employee a salary under this employment.",
        )));

        let a = service.submit_pdf(vec![1], None);
        let b = service.submit_pdf(vec![2], None);
        assert_ne!(a, b);

        let job_a = await_terminal(&service, a).await;
        let job_b = await_terminal(&service, b).await;
        assert_eq!(job_a.status, JobStatus::Completed);
        assert_eq!(job_b.status, JobStatus::Completed);
    }
}
