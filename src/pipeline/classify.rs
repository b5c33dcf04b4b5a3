//! Rule-based document type classification
//!
//! No model involved: each taxonomy type is scored by the fraction of its
//! indicator keywords present in the document. Deterministic by construction,
//! which reproducibility tests rely on.

use std::collections::BTreeMap;

use crate::model::{ClassificationResult, DocumentType};

/// Score every taxonomy type and pick the arg-max
///
/// Each indicator counts at most once (presence, not frequency); matching is
/// case-insensitive substring search. Ties go to the first-declared type, so
/// empty text yields an all-zero score vector classified as
/// [`DocumentType::Contract`].
pub fn classify(text: &str) -> ClassificationResult {
    let text_lower = text.to_lowercase();

    let mut scores = BTreeMap::new();
    let mut predicted = DocumentType::ALL[0];
    let mut best_score = f64::MIN;

    for doc_type in DocumentType::ALL {
        let indicators = doc_type.indicators();
        let hits = indicators
            .iter()
            .filter(|kw| text_lower.contains(*kw))
            .count();
        let score = hits as f64 / indicators.len() as f64;

        // Strict comparison keeps the first-declared type on exact ties
        if score > best_score {
            best_score = score;
            predicted = doc_type;
        }

        scores.insert(doc_type.as_str().to_string(), score);
    }

    ClassificationResult {
        predicted_type: predicted,
        confidence: best_score,
        scores,
    }
}
