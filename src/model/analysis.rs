//! Domain types for document analysis results

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

use super::document_type::DocumentType;

/// An ingested document before any analysis runs
///
/// Immutable once created; the content hash doubles as the persisted
/// document id so re-submitting identical content dedupes.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RawDocument {
    pub text: String,
    pub filename: Option<String>,
    pub byte_size: i64,
    /// Lowercase hex SHA-256 of the text content
    pub content_hash: String,
}

impl RawDocument {
    pub fn new(text: String, filename: Option<String>) -> Self {
        use sha2::{Digest, Sha256};
        let byte_size = text.len() as i64;
        let content_hash = format!("{:x}", Sha256::digest(text.as_bytes()));
        Self {
            text,
            filename,
            byte_size,
            content_hash,
        }
    }
}

/// Output of the rule-based document classifier
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ClassificationResult {
    pub predicted_type: DocumentType,
    /// Score of the predicted type, in [0, 1]
    pub confidence: f64,
    /// Full score vector, one entry per taxonomy type
    pub scores: BTreeMap<String, f64>,
}

/// Entity categories recognized from the NER collaborator output
pub const ENTITY_LABELS: [&str; 5] = ["PERSON", "ORG", "DATE", "MONEY", "GPE"];

/// Category used for the regex monetary pass, independent of NER MONEY
pub const MONETARY_AMOUNTS: &str = "monetary_amounts";

/// Typed entity spans grouped by category, first-occurrence order preserved
///
/// `monetary_amounts` comes from a regex pass and is intentionally not
/// deduplicated against the NER MONEY category.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct ExtractedEntitySet {
    pub entities: BTreeMap<String, Vec<String>>,
}

impl ExtractedEntitySet {
    pub fn get(&self, label: &str) -> &[String] {
        self.entities.get(label).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Total number of spans across all categories
    pub fn len(&self) -> usize {
        self.entities.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A clause retained from the extractive QA pass
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ExtractedClause {
    /// Derived from the template question, prefix phrases and trailing
    /// punctuation stripped
    pub key: String,
    pub answer_text: String,
    pub confidence: f64,
    /// The template question the answer came from
    pub question: String,
}

/// Metadata block of an analysis
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DocumentInfo {
    pub document_type: DocumentType,
    pub confidence: f64,
    /// Whitespace-delimited word count of the raw (pre-normalization) text
    pub word_count: i64,
    pub processed_at: DateTime<Utc>,
}

/// Full result of one orchestrated analysis run
///
/// Assembled once by the orchestrator and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AnalysisResult {
    pub document_info: DocumentInfo,
    pub entities: ExtractedEntitySet,
    /// Clause key -> clause; a later question deriving the same key wins
    pub key_clauses: BTreeMap<String, ExtractedClause>,
    pub summary: String,
    pub classification_scores: BTreeMap<String, f64>,
}

/// Discrete risk bands derived from the overall score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
            RiskLevel::Critical => "critical",
        }
    }

    pub fn from_str_opt(s: &str) -> Option<RiskLevel> {
        match s {
            "low" => Some(RiskLevel::Low),
            "medium" => Some(RiskLevel::Medium),
            "high" => Some(RiskLevel::High),
            "critical" => Some(RiskLevel::Critical),
            _ => None,
        }
    }
}

/// Rule-derived risk metrics persisted alongside the analysis
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RiskAssessment {
    /// Per-category scores, 0-100
    pub financial_risk: f64,
    pub legal_risk: f64,
    pub operational_risk: f64,
    pub compliance_risk: f64,
    /// Mean of the category scores, 0-100
    pub overall_risk: f64,
    pub risk_level: RiskLevel,
    /// Human-readable drivers behind the scores
    pub risk_factors: Vec<String>,
}

/// Analysis plus risk metrics as stored and returned to callers
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AnalysisRecord {
    /// Content hash of the source document
    pub document_id: String,
    pub filename: Option<String>,
    pub byte_size: i64,
    pub result: AnalysisResult,
    pub risk: RiskAssessment,
}
