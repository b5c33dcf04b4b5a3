//! Database module for PostgreSQL persistence

pub mod models;
pub mod repository;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::env;

// Environment variable names
const ENV_POSTGRES_HOST: &str = "LEGAL_INTEL_POSTGRES_HOST";
const ENV_POSTGRES_PORT: &str = "LEGAL_INTEL_POSTGRES_PORT";
const ENV_POSTGRES_USER: &str = "LEGAL_INTEL_POSTGRES_USER";
const ENV_POSTGRES_PASSWORD: &str = "LEGAL_INTEL_POSTGRES_PASSWORD";
const ENV_POSTGRES_DB: &str = "LEGAL_INTEL_POSTGRES_DB";

// Default values
const DEFAULT_POSTGRES_HOST: &str = "127.0.0.1";
const DEFAULT_POSTGRES_PORT: &str = "5432";
const DEFAULT_POSTGRES_USER: &str = "legal_intel";
const DEFAULT_POSTGRES_PASSWORD: &str = "legal_intel";
const DEFAULT_POSTGRES_DB: &str = "legal_intel";

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("Database connection error: {0}")]
    Connection(#[from] sqlx::Error),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Create a new database connection pool
pub async fn create_pool() -> Result<PgPool, DbError> {
    let host = env::var(ENV_POSTGRES_HOST).unwrap_or_else(|_| DEFAULT_POSTGRES_HOST.to_string());
    let port = env::var(ENV_POSTGRES_PORT).unwrap_or_else(|_| DEFAULT_POSTGRES_PORT.to_string());
    let user = env::var(ENV_POSTGRES_USER).unwrap_or_else(|_| DEFAULT_POSTGRES_USER.to_string());
    let password =
        env::var(ENV_POSTGRES_PASSWORD).unwrap_or_else(|_| DEFAULT_POSTGRES_PASSWORD.to_string());
    let database = env::var(ENV_POSTGRES_DB).unwrap_or_else(|_| DEFAULT_POSTGRES_DB.to_string());

    let database_url = format!(
        "postgres://{}:{}@{}:{}/{}",
        user, password, host, port, database
    );

    tracing::debug!(host = %host, port = %port, database = %database, "Connecting to PostgreSQL");

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&database_url)
        .await?;

    tracing::info!(host = %host, port = %port, "PostgreSQL connection established");

    Ok(pool)
}

/// Initialize database schema
pub async fn init_schema(pool: &PgPool) -> Result<(), DbError> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS documents (
            id VARCHAR(64) PRIMARY KEY,
            filename TEXT,
            byte_size BIGINT NOT NULL,
            word_count BIGINT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    // One analysis per document: document_id is the primary key
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS document_analyses (
            document_id VARCHAR(64) PRIMARY KEY REFERENCES documents(id) ON DELETE CASCADE,
            predicted_type VARCHAR(50) NOT NULL,
            confidence DOUBLE PRECISION NOT NULL,
            classification_scores JSONB NOT NULL DEFAULT '{}',
            summary TEXT NOT NULL,
            processed_at TIMESTAMPTZ NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS extracted_entities (
            id BIGSERIAL PRIMARY KEY,
            document_id VARCHAR(64) NOT NULL REFERENCES documents(id) ON DELETE CASCADE,
            entity_type VARCHAR(50) NOT NULL,
            entity_text TEXT NOT NULL,
            position INT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS extracted_clauses (
            id BIGSERIAL PRIMARY KEY,
            document_id VARCHAR(64) NOT NULL REFERENCES documents(id) ON DELETE CASCADE,
            clause_key VARCHAR(200) NOT NULL,
            clause_text TEXT NOT NULL,
            confidence DOUBLE PRECISION NOT NULL,
            question VARCHAR(300) NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS risk_assessments (
            id BIGSERIAL PRIMARY KEY,
            document_id VARCHAR(64) NOT NULL REFERENCES documents(id) ON DELETE CASCADE,
            financial_risk DOUBLE PRECISION NOT NULL,
            legal_risk DOUBLE PRECISION NOT NULL,
            operational_risk DOUBLE PRECISION NOT NULL,
            compliance_risk DOUBLE PRECISION NOT NULL,
            overall_risk DOUBLE PRECISION NOT NULL,
            risk_level VARCHAR(20) NOT NULL,
            risk_factors JSONB NOT NULL DEFAULT '[]',
            assessed_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Create indexes separately
    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_document_analyses_predicted_type ON document_analyses(predicted_type)",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_extracted_entities_document_id ON extracted_entities(document_id)",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_extracted_clauses_document_id ON extracted_clauses(document_id)",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_risk_assessments_document_id ON risk_assessments(document_id)",
    )
    .execute(pool)
    .await?;

    tracing::info!("Database schema initialized");

    Ok(())
}
