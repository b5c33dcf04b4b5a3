//! Repository for analysis persistence

use async_trait::async_trait;
use sqlx::PgPool;

use super::models::{
    rows_into_record, AnalysisRow, ClauseRow, DocumentRow, EntityRow, ListAnalysesQuery,
    PaginatedAnalyses, RiskRow, StoredAnalysisSummary,
};
use super::DbError;
use crate::model::AnalysisRecord;
use crate::service::AnalysisStore;

const DEFAULT_PAGE_SIZE: u32 = 20;
const MAX_PAGE_SIZE: u32 = 100;

/// Repository over the document/analysis row hierarchy
#[derive(Clone)]
pub struct DocumentRepository {
    pool: PgPool,
}

impl DocumentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Persist a full analysis record
    ///
    /// Re-analyzing the same content replaces the previous analysis and its
    /// child rows; the store keeps at most one analysis per document.
    pub async fn upsert(&self, record: &AnalysisRecord) -> Result<(), DbError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO documents (id, filename, byte_size, word_count)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (id) DO UPDATE SET
                filename = EXCLUDED.filename,
                byte_size = EXCLUDED.byte_size,
                word_count = EXCLUDED.word_count
            "#,
        )
        .bind(&record.document_id)
        .bind(&record.filename)
        .bind(record.byte_size)
        .bind(record.result.document_info.word_count)
        .execute(&mut *tx)
        .await?;

        // Replace children wholesale; cheaper than diffing and keeps the
        // one-analysis-per-document invariant trivially true
        for table in ["document_analyses", "extracted_entities", "extracted_clauses", "risk_assessments"] {
            sqlx::query(&format!("DELETE FROM {} WHERE document_id = $1", table))
                .bind(&record.document_id)
                .execute(&mut *tx)
                .await?;
        }

        let scores = serde_json::to_value(&record.result.classification_scores)
            .map_err(|e| DbError::Serialization(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO document_analyses (
                document_id, predicted_type, confidence, classification_scores,
                summary, processed_at
            ) VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(&record.document_id)
        .bind(record.result.document_info.document_type.as_str())
        .bind(record.result.document_info.confidence)
        .bind(&scores)
        .bind(&record.result.summary)
        .bind(record.result.document_info.processed_at)
        .execute(&mut *tx)
        .await?;

        for (entity_type, spans) in &record.result.entities.entities {
            for (position, text) in spans.iter().enumerate() {
                sqlx::query(
                    r#"
                    INSERT INTO extracted_entities (document_id, entity_type, entity_text, position)
                    VALUES ($1, $2, $3, $4)
                    "#,
                )
                .bind(&record.document_id)
                .bind(entity_type)
                .bind(text)
                .bind(position as i32)
                .execute(&mut *tx)
                .await?;
            }
        }

        for clause in record.result.key_clauses.values() {
            sqlx::query(
                r#"
                INSERT INTO extracted_clauses (document_id, clause_key, clause_text, confidence, question)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(&record.document_id)
            .bind(&clause.key)
            .bind(&clause.answer_text)
            .bind(clause.confidence)
            .bind(&clause.question)
            .execute(&mut *tx)
            .await?;
        }

        let factors = serde_json::to_value(&record.risk.risk_factors)
            .map_err(|e| DbError::Serialization(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO risk_assessments (
                document_id, financial_risk, legal_risk, operational_risk,
                compliance_risk, overall_risk, risk_level, risk_factors
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(&record.document_id)
        .bind(record.risk.financial_risk)
        .bind(record.risk.legal_risk)
        .bind(record.risk.operational_risk)
        .bind(record.risk.compliance_risk)
        .bind(record.risk.overall_risk)
        .bind(record.risk.risk_level.as_str())
        .bind(&factors)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::debug!(id = %record.document_id, "Upserted analysis record");
        Ok(())
    }

    /// Get a full analysis record by document id
    pub async fn get_by_id(&self, id: &str) -> Result<AnalysisRecord, DbError> {
        let document: DocumentRow = sqlx::query_as("SELECT * FROM documents WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::NotFound(id.to_string()))?;

        let analysis: AnalysisRow =
            sqlx::query_as("SELECT * FROM document_analyses WHERE document_id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?
                .ok_or_else(|| DbError::NotFound(id.to_string()))?;

        let entities: Vec<EntityRow> = sqlx::query_as(
            r#"
            SELECT entity_type, entity_text, position
            FROM extracted_entities
            WHERE document_id = $1
            ORDER BY entity_type, position
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        let clauses: Vec<ClauseRow> = sqlx::query_as(
            r#"
            SELECT clause_key, clause_text, confidence, question
            FROM extracted_clauses
            WHERE document_id = $1
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        let risk: Option<RiskRow> = sqlx::query_as(
            r#"
            SELECT financial_risk, legal_risk, operational_risk, compliance_risk,
                   overall_risk, risk_level, risk_factors
            FROM risk_assessments
            WHERE document_id = $1
            ORDER BY assessed_at DESC
            LIMIT 1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        rows_into_record(document, analysis, entities, clauses, risk)
            .map_err(DbError::Serialization)
    }

    /// List stored analyses with pagination and an optional type filter
    pub async fn list(&self, query: ListAnalysesQuery) -> Result<PaginatedAnalyses, DbError> {
        let page = query.page.unwrap_or(1).max(1);
        let page_size = query
            .page_size
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);
        let offset = ((page - 1) * page_size) as i64;

        let total_count: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*)
            FROM documents d
            JOIN document_analyses a ON a.document_id = d.id
            WHERE ($1::text IS NULL OR a.predicted_type = $1)
            "#,
        )
        .bind(&query.document_type)
        .fetch_one(&self.pool)
        .await?;

        let documents: Vec<StoredAnalysisSummary> = sqlx::query_as(
            r#"
            SELECT d.id, d.filename, a.predicted_type, a.confidence,
                   r.risk_level, d.created_at
            FROM documents d
            JOIN document_analyses a ON a.document_id = d.id
            LEFT JOIN risk_assessments r ON r.document_id = d.id
            WHERE ($1::text IS NULL OR a.predicted_type = $1)
            ORDER BY d.created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(&query.document_type)
        .bind(page_size as i64)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let total_pages = ((total_count.0 as f64) / (page_size as f64)).ceil() as u32;

        Ok(PaginatedAnalyses {
            documents,
            page,
            page_size,
            total_count: total_count.0,
            total_pages,
        })
    }

    /// Delete a document and its analysis rows
    /// Returns true if the document was deleted, false if it didn't exist
    pub async fn delete(&self, id: &str) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM documents WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            tracing::debug!(id = %id, "Deleted analysis record");
        }
        Ok(deleted)
    }
}

#[async_trait]
impl AnalysisStore for DocumentRepository {
    async fn save(&self, record: &AnalysisRecord) -> Result<(), DbError> {
        self.upsert(record).await
    }
}
