//! OpenAPI specification endpoints

use actix_web::{get, HttpResponse, Responder};
use utoipa::OpenApi;

/// OpenAPI document covering every public endpoint
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Legal Document Intelligence API",
        description = "Classification, entity/clause extraction, summarization and risk scoring for legal documents"
    ),
    paths(
        super::analysis::analyze_text,
        super::analysis::analyze_pdf,
        super::analysis::job_status,
        super::document::list_documents,
        super::document::get_document,
        super::document::delete_document,
        super::health::liveness,
        super::health::readiness,
    ),
    components(schemas(
        crate::model::AnalysisRecord,
        crate::model::AnalysisResult,
        crate::model::ClassificationResult,
        crate::model::DocumentType,
        crate::model::ExtractedClause,
        crate::model::ExtractedEntitySet,
        crate::model::Job,
        crate::model::JobStatus,
        crate::model::RiskAssessment,
        crate::model::RiskLevel,
    ))
)]
pub struct ApiDoc;

/// Serve OpenAPI JSON specification
#[get("/openapi.json")]
pub async fn openapi_json() -> impl Responder {
    HttpResponse::Ok().json(ApiDoc::openapi())
}

/// Serve OpenAPI YAML specification
#[get("/openapi.yaml")]
pub async fn openapi_yaml() -> Result<impl Responder, actix_web::Error> {
    let yaml = ApiDoc::openapi()
        .to_yaml()
        .map_err(actix_web::error::ErrorInternalServerError)?;

    Ok(HttpResponse::Ok().content_type("text/yaml").body(yaml))
}

/// Configure OpenAPI routes
pub fn configure(cfg: &mut actix_web::web::ServiceConfig) {
    cfg.service(openapi_json).service(openapi_yaml);
}
