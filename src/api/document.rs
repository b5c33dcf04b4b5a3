//! REST API endpoints for stored document analyses

use actix_web::{delete, get, web, HttpResponse, Responder};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::error::ApiError;
use crate::db::models::ListAnalysesQuery;
use crate::db::repository::DocumentRepository;

/// Query parameters for listing analyzed documents
#[derive(Debug, Deserialize, IntoParams)]
pub struct ListDocumentsParams {
    /// Page number (1-indexed, default: 1)
    pub page: Option<u32>,
    /// Page size (default: 20, max: 100)
    pub page_size: Option<u32>,
    /// Filter by predicted type (contract, license, lease, employment, nda)
    pub document_type: Option<String>,
}

/// Paginated response for stored analyses
#[derive(Debug, Serialize, ToSchema)]
pub struct DocumentListResponse {
    pub documents: Vec<DocumentSummary>,
    pub page: u32,
    pub page_size: u32,
    pub total_count: i64,
    pub total_pages: u32,
}

/// Summary of an analyzed document for list responses
#[derive(Debug, Serialize, ToSchema)]
pub struct DocumentSummary {
    pub id: String,
    pub filename: Option<String>,
    pub document_type: String,
    pub confidence: f64,
    pub risk_level: Option<String>,
    pub analyzed_at: DateTime<Utc>,
}

/// List analyzed documents with pagination and filters
#[utoipa::path(
    get,
    path = "/v1/documents",
    params(ListDocumentsParams),
    responses(
        (status = 200, description = "Documents retrieved successfully", body = DocumentListResponse),
        (status = 500, description = "Internal server error")
    ),
    tag = "documents"
)]
#[get("/v1/documents")]
pub async fn list_documents(
    repository: web::Data<DocumentRepository>,
    query: web::Query<ListDocumentsParams>,
) -> Result<impl Responder, ApiError> {
    let db_query = ListAnalysesQuery {
        page: query.page,
        page_size: query.page_size,
        document_type: query.document_type.clone(),
    };

    let paginated = repository.list(db_query).await?;

    let summaries: Vec<DocumentSummary> = paginated
        .documents
        .into_iter()
        .map(|row| DocumentSummary {
            id: row.id,
            filename: row.filename,
            document_type: row.predicted_type,
            confidence: row.confidence,
            risk_level: row.risk_level,
            analyzed_at: row.created_at,
        })
        .collect();

    Ok(HttpResponse::Ok().json(DocumentListResponse {
        documents: summaries,
        page: paginated.page,
        page_size: paginated.page_size,
        total_count: paginated.total_count,
        total_pages: paginated.total_pages,
    }))
}

/// Get a stored analysis by document ID
#[utoipa::path(
    get,
    path = "/v1/documents/{id}",
    params(
        ("id" = String, Path, description = "Document ID (content hash)")
    ),
    responses(
        (status = 200, description = "Analysis retrieved successfully", body = crate::model::AnalysisRecord),
        (status = 404, description = "Document not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "documents"
)]
#[get("/v1/documents/{id}")]
pub async fn get_document(
    repository: web::Data<DocumentRepository>,
    path: web::Path<String>,
) -> Result<impl Responder, ApiError> {
    let id = path.into_inner();
    let record = repository.get_by_id(&id).await?;
    Ok(HttpResponse::Ok().json(record))
}

/// Delete a stored analysis by document ID
#[utoipa::path(
    delete,
    path = "/v1/documents/{id}",
    params(
        ("id" = String, Path, description = "Document ID (content hash)")
    ),
    responses(
        (status = 204, description = "Document deleted successfully"),
        (status = 404, description = "Document not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "documents"
)]
#[delete("/v1/documents/{id}")]
pub async fn delete_document(
    repository: web::Data<DocumentRepository>,
    path: web::Path<String>,
) -> Result<impl Responder, ApiError> {
    let id = path.into_inner();

    if repository.delete(&id).await? {
        tracing::info!(id = %id, "Document deleted");
        Ok(HttpResponse::NoContent().finish())
    } else {
        Err(ApiError::DocumentNotFound(id))
    }
}

/// Configure document routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(list_documents)
        .service(get_document)
        .service(delete_document);
}
