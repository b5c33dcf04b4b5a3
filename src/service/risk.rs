//! Rule-based risk scoring over a completed analysis
//!
//! Scores are deterministic functions of the analysis result, so the same
//! document always produces the same assessment. Each category is scored
//! 0-100 and the overall score is their mean.

use crate::model::{AnalysisResult, DocumentType, RiskAssessment, RiskLevel, MONETARY_AMOUNTS};

/// Clause keys whose absence raises legal risk for contract-like documents
const CORE_CONTRACT_KEYS: [&str; 2] = ["the governing law", "the payment terms"];

/// Overall score thresholds for the discrete bands
const MEDIUM_THRESHOLD: f64 = 25.0;
const HIGH_THRESHOLD: f64 = 50.0;
const CRITICAL_THRESHOLD: f64 = 75.0;

/// Derive risk metrics from an analysis result
pub fn assess(result: &AnalysisResult) -> RiskAssessment {
    let mut factors = Vec::new();

    let financial_risk = score_financial(result, &mut factors);
    let legal_risk = score_legal(result, &mut factors);
    let operational_risk = score_operational(result, &mut factors);
    let compliance_risk = score_compliance(result, &mut factors);

    let overall_risk =
        (financial_risk + legal_risk + operational_risk + compliance_risk) / 4.0;

    let risk_level = if overall_risk >= CRITICAL_THRESHOLD {
        RiskLevel::Critical
    } else if overall_risk >= HIGH_THRESHOLD {
        RiskLevel::High
    } else if overall_risk >= MEDIUM_THRESHOLD {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    };

    RiskAssessment {
        financial_risk,
        legal_risk,
        operational_risk,
        compliance_risk,
        overall_risk,
        risk_level,
        risk_factors: factors,
    }
}

/// Monetary exposure: scales with the number of distinct amounts mentioned
fn score_financial(result: &AnalysisResult, factors: &mut Vec<String>) -> f64 {
    let amounts = result.entities.get(MONETARY_AMOUNTS);
    let ner_money = result.entities.get("MONEY");
    let mentions = amounts.len().max(ner_money.len());

    let mut score = (mentions as f64 * 12.0).min(60.0);

    if mentions > 0 && !result.key_clauses.contains_key("the payment terms") {
        score += 25.0;
        factors.push(
            "Monetary amounts present but no payment terms clause was extracted".to_string(),
        );
    }

    if mentions >= 3 {
        factors.push(format!("{} monetary amounts referenced", mentions));
    }

    score.min(100.0)
}

/// Legal risk: weak classification or missing core contract clauses
fn score_legal(result: &AnalysisResult, factors: &mut Vec<String>) -> f64 {
    let mut score: f64 = 0.0;

    if result.document_info.confidence < 0.5 {
        score += 30.0;
        factors.push(format!(
            "Low classification confidence ({:.2}) for type '{}'",
            result.document_info.confidence, result.document_info.document_type
        ));
    }

    if matches!(
        result.document_info.document_type,
        DocumentType::Contract | DocumentType::Lease | DocumentType::License
    ) {
        for key in CORE_CONTRACT_KEYS {
            if !result.key_clauses.contains_key(key) {
                score += 20.0;
                factors.push(format!("Missing expected clause: {}", key));
            }
        }
    }

    score.min(100.0)
}

/// Operational risk: obligations the extraction could not pin down
fn score_operational(result: &AnalysisResult, factors: &mut Vec<String>) -> f64 {
    if result.key_clauses.is_empty() {
        factors.push("No key clauses could be extracted".to_string());
        return 70.0;
    }

    let weak = result
        .key_clauses
        .values()
        .filter(|c| c.confidence < 0.3)
        .count();

    if weak > 0 {
        factors.push(format!("{} clause(s) extracted with low confidence", weak));
    }

    (weak as f64 * 15.0).min(60.0)
}

/// Compliance risk: confidentiality obligations without named parties
fn score_compliance(result: &AnalysisResult, factors: &mut Vec<String>) -> f64 {
    let mut score: f64 = 0.0;

    if result.document_info.document_type == DocumentType::Nda {
        score += 20.0;
        if result.entities.get("ORG").is_empty() && result.entities.get("PERSON").is_empty() {
            score += 30.0;
            factors.push(
                "Confidentiality obligations without identifiable parties".to_string(),
            );
        }
    }

    if result.entities.get("DATE").is_empty() {
        score += 15.0;
        factors.push("No dates recognized in the document".to_string());
    }

    score.min(100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DocumentInfo, ExtractedClause, ExtractedEntitySet};
    use chrono::Utc;
    use std::collections::BTreeMap;

    fn base_result(document_type: DocumentType, confidence: f64) -> AnalysisResult {
        AnalysisResult {
            document_info: DocumentInfo {
                document_type,
                confidence,
                word_count: 100,
                processed_at: Utc::now(),
            },
            entities: ExtractedEntitySet::default(),
            key_clauses: BTreeMap::new(),
            summary: "summary".to_string(),
            classification_scores: BTreeMap::new(),
        }
    }

    fn with_clause(result: &mut AnalysisResult, key: &str, confidence: f64) {
        result.key_clauses.insert(
            key.to_string(),
            ExtractedClause {
                key: key.to_string(),
                answer_text: "answer".to_string(),
                confidence,
                question: format!("What is {}?", key),
            },
        );
    }

    #[test]
    fn test_deterministic() {
        let result = base_result(DocumentType::Contract, 0.75);
        let a = assess(&result);
        let b = assess(&result);
        assert_eq!(a.overall_risk, b.overall_risk);
        assert_eq!(a.risk_factors, b.risk_factors);
    }

    #[test]
    fn test_scores_bounded() {
        let mut result = base_result(DocumentType::Nda, 0.1);
        result
            .entities
            .entities
            .insert(MONETARY_AMOUNTS.to_string(), vec!["$1".to_string(); 50]);
        let risk = assess(&result);
        for score in [
            risk.financial_risk,
            risk.legal_risk,
            risk.operational_risk,
            risk.compliance_risk,
            risk.overall_risk,
        ] {
            assert!((0.0..=100.0).contains(&score));
        }
    }

    #[test]
    fn test_complete_contract_scores_low() {
        let mut result = base_result(DocumentType::Contract, 1.0);
        with_clause(&mut result, "the governing law", 0.8);
        with_clause(&mut result, "the payment terms", 0.9);
        result
            .entities
            .entities
            .insert("DATE".to_string(), vec!["January 1, 2024".to_string()]);

        let risk = assess(&result);
        assert_eq!(risk.risk_level, RiskLevel::Low);
        assert!(risk.risk_factors.is_empty());
    }

    #[test]
    fn test_missing_clauses_raise_legal_risk() {
        let mut bare = base_result(DocumentType::Contract, 1.0);
        with_clause(&mut bare, "the parties", 0.8);

        let mut complete = bare.clone();
        with_clause(&mut complete, "the governing law", 0.8);
        with_clause(&mut complete, "the payment terms", 0.8);

        assert!(assess(&bare).legal_risk > assess(&complete).legal_risk);
        assert!(assess(&bare)
            .risk_factors
            .iter()
            .any(|f| f.contains("governing law")));
    }

    #[test]
    fn test_no_clauses_is_high_operational_risk() {
        let result = base_result(DocumentType::Lease, 0.6);
        let risk = assess(&result);
        assert_eq!(risk.operational_risk, 70.0);
    }

    #[test]
    fn test_level_thresholds() {
        let mut result = base_result(DocumentType::Nda, 0.1);
        // Low confidence, no clauses, no parties, no dates: every category fires
        let risk = assess(&result);
        assert!(risk.overall_risk >= MEDIUM_THRESHOLD);
        assert_ne!(risk.risk_level, RiskLevel::Low);

        with_clause(&mut result, "the main terms", 0.9);
        result.document_info.confidence = 1.0;
        let relaxed = assess(&result);
        assert!(relaxed.overall_risk < risk.overall_risk);
    }
}
