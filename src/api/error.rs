//! Unified API error handling
//!
//! This module provides a consistent error response format across all API endpoints.

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;
use uuid::Uuid;

/// Standard error response format
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error type/code
    pub error: String,
    /// Human-readable error message
    pub message: String,
    /// Unique request ID for tracing
    pub request_id: String,
}

/// Unified API error type
///
/// All API endpoints return `Result<T, ApiError>` for consistent error
/// handling.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ApiError {
    /// Document not found (404)
    #[error("Document not found: {0}")]
    DocumentNotFound(String),

    /// Job not found (404)
    #[error("Job not found: {0}")]
    JobNotFound(Uuid),

    /// Bad request / validation error (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Internal server error (500)
    #[error("Internal server error: {0}")]
    Internal(String),

    /// Database error (500)
    #[error("Database error: {0}")]
    Database(String),

    /// A required inference collaborator could not be reached (502)
    #[error("Collaborator unavailable: {0}")]
    CollaboratorUnavailable(String),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::DocumentNotFound(_) | ApiError::JobNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::CollaboratorUnavailable(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) | ApiError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let error_type = match self {
            ApiError::DocumentNotFound(_) => "document_not_found",
            ApiError::JobNotFound(_) => "job_not_found",
            ApiError::BadRequest(_) => "bad_request",
            ApiError::Internal(_) => "internal_error",
            ApiError::Database(_) => "database_error",
            ApiError::CollaboratorUnavailable(_) => "collaborator_unavailable",
        };

        tracing::error!(
            error_type = error_type,
            status = status.as_u16(),
            message = %self,
            "API error"
        );

        HttpResponse::build(status).json(ErrorResponse {
            error: error_type.to_string(),
            message: self.to_string(),
            request_id: Uuid::new_v4().to_string(),
        })
    }
}

// ============================================================================
// From conversions for service errors
// ============================================================================

impl From<crate::service::analysis::AnalysisServiceError> for ApiError {
    fn from(err: crate::service::analysis::AnalysisServiceError) -> Self {
        use crate::pipeline::PipelineError;
        use crate::service::analysis::AnalysisServiceError;

        match err {
            AnalysisServiceError::EmptyDocument => {
                ApiError::BadRequest("No document content provided".to_string())
            }
            AnalysisServiceError::Pipeline(PipelineError::EmptyDocument) => {
                ApiError::BadRequest("No document content provided".to_string())
            }
            AnalysisServiceError::Pipeline(e) => ApiError::CollaboratorUnavailable(e.to_string()),
            AnalysisServiceError::Persistence(e) => ApiError::Database(e.to_string()),
        }
    }
}

impl From<crate::service::jobs::JobError> for ApiError {
    fn from(err: crate::service::jobs::JobError) -> Self {
        match err {
            crate::service::jobs::JobError::NotFound(id) => ApiError::JobNotFound(id),
        }
    }
}

impl From<crate::db::DbError> for ApiError {
    fn from(err: crate::db::DbError) -> Self {
        match err {
            crate::db::DbError::NotFound(id) => ApiError::DocumentNotFound(id),
            _ => ApiError::Database(err.to_string()),
        }
    }
}
