//! Database models for persisted analyses

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use std::collections::BTreeMap;

use crate::model::{
    AnalysisRecord, AnalysisResult, DocumentInfo, DocumentType, ExtractedClause,
    ExtractedEntitySet, RiskAssessment, RiskLevel,
};

/// `documents` row
#[derive(Debug, Clone, FromRow)]
pub struct DocumentRow {
    pub id: String,
    pub filename: Option<String>,
    pub byte_size: i64,
    pub word_count: i64,
    pub created_at: DateTime<Utc>,
}

/// `document_analyses` row
#[derive(Debug, Clone, FromRow)]
pub struct AnalysisRow {
    pub document_id: String,
    pub predicted_type: String,
    pub confidence: f64,
    pub classification_scores: serde_json::Value,
    pub summary: String,
    pub processed_at: DateTime<Utc>,
}

/// `extracted_entities` row
#[derive(Debug, Clone, FromRow)]
pub struct EntityRow {
    pub entity_type: String,
    pub entity_text: String,
    pub position: i32,
}

/// `extracted_clauses` row
#[derive(Debug, Clone, FromRow)]
pub struct ClauseRow {
    pub clause_key: String,
    pub clause_text: String,
    pub confidence: f64,
    pub question: String,
}

/// `risk_assessments` row
#[derive(Debug, Clone, FromRow)]
pub struct RiskRow {
    pub financial_risk: f64,
    pub legal_risk: f64,
    pub operational_risk: f64,
    pub compliance_risk: f64,
    pub overall_risk: f64,
    pub risk_level: String,
    pub risk_factors: serde_json::Value,
}

/// Query parameters for listing analyzed documents
#[derive(Debug, Clone, Default)]
pub struct ListAnalysesQuery {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub document_type: Option<String>,
}

/// One page of stored analyses
#[derive(Debug)]
pub struct PaginatedAnalyses {
    pub documents: Vec<StoredAnalysisSummary>,
    pub page: u32,
    pub page_size: u32,
    pub total_count: i64,
    pub total_pages: u32,
}

/// Summary row for list responses
#[derive(Debug, Clone, FromRow)]
pub struct StoredAnalysisSummary {
    pub id: String,
    pub filename: Option<String>,
    pub predicted_type: String,
    pub confidence: f64,
    pub risk_level: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Reassemble the domain record from its rows
pub fn rows_into_record(
    document: DocumentRow,
    analysis: AnalysisRow,
    entities: Vec<EntityRow>,
    clauses: Vec<ClauseRow>,
    risk: Option<RiskRow>,
) -> Result<AnalysisRecord, String> {
    let document_type = DocumentType::from_str_opt(&analysis.predicted_type)
        .ok_or_else(|| format!("Unknown document type: {}", analysis.predicted_type))?;

    let classification_scores: BTreeMap<String, f64> =
        serde_json::from_value(analysis.classification_scores)
            .map_err(|e| format!("Invalid classification scores: {}", e))?;

    // Entity rows carry their in-category position; rows arrive ordered by it
    let mut entity_set = ExtractedEntitySet::default();
    for row in entities {
        entity_set
            .entities
            .entry(row.entity_type)
            .or_default()
            .push(row.entity_text);
    }

    let key_clauses: BTreeMap<String, ExtractedClause> = clauses
        .into_iter()
        .map(|row| {
            (
                row.clause_key.clone(),
                ExtractedClause {
                    key: row.clause_key,
                    answer_text: row.clause_text,
                    confidence: row.confidence,
                    question: row.question,
                },
            )
        })
        .collect();

    let risk = match risk {
        Some(row) => {
            let risk_level = RiskLevel::from_str_opt(&row.risk_level)
                .ok_or_else(|| format!("Unknown risk level: {}", row.risk_level))?;
            let risk_factors: Vec<String> = serde_json::from_value(row.risk_factors)
                .map_err(|e| format!("Invalid risk factors: {}", e))?;
            RiskAssessment {
                financial_risk: row.financial_risk,
                legal_risk: row.legal_risk,
                operational_risk: row.operational_risk,
                compliance_risk: row.compliance_risk,
                overall_risk: row.overall_risk,
                risk_level,
                risk_factors,
            }
        }
        None => return Err(format!("Missing risk assessment for {}", document.id)),
    };

    Ok(AnalysisRecord {
        document_id: document.id,
        filename: document.filename,
        byte_size: document.byte_size,
        result: AnalysisResult {
            document_info: DocumentInfo {
                document_type,
                confidence: analysis.confidence,
                word_count: document.word_count,
                processed_at: analysis.processed_at,
            },
            entities: entity_set,
            key_clauses,
            summary: analysis.summary,
            classification_scores,
        },
        risk,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_rows() -> (DocumentRow, AnalysisRow, Vec<EntityRow>, Vec<ClauseRow>, RiskRow) {
        let document = DocumentRow {
            id: "deadbeef".to_string(),
            filename: Some("lease.pdf".to_string()),
            byte_size: 1024,
            word_count: 200,
            created_at: Utc::now(),
        };
        let analysis = AnalysisRow {
            document_id: "deadbeef".to_string(),
            predicted_type: "lease".to_string(),
            confidence: 0.8,
            classification_scores: serde_json::json!({"lease": 0.8, "contract": 0.25}),
            summary: "a lease".to_string(),
            processed_at: Utc::now(),
        };
        let entities = vec![
            EntityRow {
                entity_type: "monetary_amounts".to_string(),
                entity_text: "$1,500".to_string(),
                position: 0,
            },
            EntityRow {
                entity_type: "monetary_amounts".to_string(),
                entity_text: "$1,500".to_string(),
                position: 1,
            },
        ];
        let clauses = vec![ClauseRow {
            clause_key: "the main terms".to_string(),
            clause_text: "monthly rent of $1,500".to_string(),
            confidence: 0.6,
            question: "What are the main terms?".to_string(),
        }];
        let risk = RiskRow {
            financial_risk: 49.0,
            legal_risk: 0.0,
            operational_risk: 0.0,
            compliance_risk: 15.0,
            overall_risk: 16.0,
            risk_level: "low".to_string(),
            risk_factors: serde_json::json!(["Monetary amounts present but no payment terms clause was extracted"]),
        };
        (document, analysis, entities, clauses, risk)
    }

    #[test]
    fn test_rows_roundtrip_into_record() {
        let (document, analysis, entities, clauses, risk) = sample_rows();
        let record =
            rows_into_record(document, analysis, entities, clauses, Some(risk)).unwrap();

        assert_eq!(record.document_id, "deadbeef");
        assert_eq!(record.result.document_info.document_type, DocumentType::Lease);
        assert_eq!(
            record.result.entities.get("monetary_amounts"),
            ["$1,500", "$1,500"]
        );
        assert_eq!(record.result.key_clauses["the main terms"].confidence, 0.6);
        assert_eq!(record.risk.risk_level, RiskLevel::Low);
        assert_eq!(record.risk.risk_factors.len(), 1);
    }

    #[test]
    fn test_unknown_document_type_rejected() {
        let (document, mut analysis, entities, clauses, risk) = sample_rows();
        analysis.predicted_type = "treaty".to_string();
        assert!(rows_into_record(document, analysis, entities, clauses, Some(risk)).is_err());
    }
}
