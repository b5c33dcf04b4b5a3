//! Application state and service initialization
//!
//! This module centralizes service construction and dependency injection so
//! the whole dependency graph is built in one place at startup.

use std::sync::Arc;

use sqlx::PgPool;

use crate::db::repository::DocumentRepository;
use crate::inference::{RemoteInferenceClient, RemotePdfExtractor};
use crate::model::Config;
use crate::pipeline::AnalysisPipeline;
use crate::service::{AnalysisService, JobTracker};

/// Application state containing all services and shared resources
pub struct AppState {
    /// Database connection pool
    pub db_pool: PgPool,
    /// Repository over stored analyses, used directly by the document API
    pub repository: DocumentRepository,
    /// Analysis front door (sync text + async PDF jobs)
    pub analysis_service: Arc<AnalysisService>,
}

impl AppState {
    /// Initialize all services and build application state
    ///
    /// This performs:
    /// 1. Database connection and schema initialization
    /// 2. Inference and PDF extraction client construction
    /// 3. Pipeline handle construction (built once, injected everywhere)
    /// 4. Analysis service and job tracker wiring
    pub async fn new(config: &Config) -> Result<Self, AppError> {
        let db_pool = crate::db::create_pool()
            .await
            .map_err(|e| AppError::DatabaseInit(e.to_string()))?;

        crate::db::init_schema(&db_pool)
            .await
            .map_err(|e| AppError::DatabaseInit(e.to_string()))?;

        let repository = DocumentRepository::new(db_pool.clone());

        // One shared client serves NER, QA and summarization
        let inference = Arc::new(RemoteInferenceClient::new(config.inference_url.clone()));
        let pdf_extractor = Arc::new(RemotePdfExtractor::new(config.pdf_extractor_url.clone()));

        let pipeline = Arc::new(AnalysisPipeline::new(
            inference.clone(),
            inference.clone(),
            inference,
            &config.summary,
        ));

        let analysis_service = Arc::new(AnalysisService::new(
            pipeline,
            pdf_extractor,
            Arc::new(repository.clone()),
            Arc::new(JobTracker::new()),
        ));

        Ok(Self {
            db_pool,
            repository,
            analysis_service,
        })
    }
}

/// Application-level errors
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum AppError {
    /// Database initialization failed
    #[error("Database initialization failed: {0}")]
    DatabaseInit(String),
}
