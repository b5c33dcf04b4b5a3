//! REST API endpoints for document analysis submission and job status

use actix_web::{get, post, web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use super::error::ApiError;
use crate::model::AnalysisRecord;
use crate::service::AnalysisService;
use std::sync::Arc;

/// Request body for synchronous text analysis
#[derive(Debug, Deserialize, ToSchema)]
pub struct AnalyzeRequest {
    /// Raw document text
    pub text: String,
    /// Optional source filename, stored with the analysis
    pub filename: Option<String>,
}

/// Query parameters for PDF submission
#[derive(Debug, Deserialize, IntoParams)]
pub struct AnalyzePdfParams {
    /// Original filename of the uploaded PDF
    pub filename: Option<String>,
}

/// Response to an asynchronous PDF submission
#[derive(Debug, Serialize, ToSchema)]
pub struct SubmitPdfResponse {
    pub job_id: Uuid,
    pub status: String,
}

/// Analyze raw document text synchronously
#[utoipa::path(
    post,
    path = "/v1/analyze",
    request_body = AnalyzeRequest,
    responses(
        (status = 200, description = "Analysis completed", body = AnalysisRecord),
        (status = 400, description = "Empty document text"),
        (status = 502, description = "An inference collaborator is unavailable"),
        (status = 500, description = "Internal server error")
    ),
    tag = "analysis"
)]
#[post("/v1/analyze")]
pub async fn analyze_text(
    service: web::Data<Arc<AnalysisService>>,
    request: web::Json<AnalyzeRequest>,
) -> Result<impl Responder, ApiError> {
    let request = request.into_inner();

    tracing::info!(
        chars = request.text.len(),
        filename = ?request.filename,
        "Received text document for analysis"
    );

    let record = service
        .analyze_text(request.text, request.filename)
        .await?;

    Ok(HttpResponse::Ok().json(record))
}

/// Submit a PDF for asynchronous analysis
///
/// The body is the raw PDF bytes; the call returns a job id immediately and
/// the analysis proceeds in the background.
#[utoipa::path(
    post,
    path = "/v1/analyze/pdf",
    params(AnalyzePdfParams),
    request_body(content = Vec<u8>, content_type = "application/pdf"),
    responses(
        (status = 202, description = "Job accepted", body = SubmitPdfResponse),
        (status = 400, description = "Empty upload")
    ),
    tag = "analysis"
)]
#[post("/v1/analyze/pdf")]
pub async fn analyze_pdf(
    service: web::Data<Arc<AnalysisService>>,
    params: web::Query<AnalyzePdfParams>,
    body: web::Bytes,
) -> Result<impl Responder, ApiError> {
    if body.is_empty() {
        return Err(ApiError::BadRequest("Empty PDF upload".to_string()));
    }

    tracing::info!(
        bytes = body.len(),
        filename = ?params.filename,
        "Received PDF for asynchronous analysis"
    );

    let job_id = service.submit_pdf(body.to_vec(), params.filename.clone());

    Ok(HttpResponse::Accepted().json(SubmitPdfResponse {
        job_id,
        status: "processing".to_string(),
    }))
}

/// Get the status of an asynchronous analysis job
#[utoipa::path(
    get,
    path = "/v1/jobs/{id}",
    params(
        ("id" = Uuid, Path, description = "Job ID returned at submission")
    ),
    responses(
        (status = 200, description = "Job snapshot", body = crate::model::Job),
        (status = 404, description = "Job not found")
    ),
    tag = "analysis"
)]
#[get("/v1/jobs/{id}")]
pub async fn job_status(
    service: web::Data<Arc<AnalysisService>>,
    path: web::Path<Uuid>,
) -> Result<impl Responder, ApiError> {
    let id = path.into_inner();
    let job = service.tracker().query(id)?;
    Ok(HttpResponse::Ok().json(job))
}

/// Configure analysis routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(analyze_text)
        .service(analyze_pdf)
        .service(job_status);
}
