//! Key clause extraction through the extractive QA collaborator

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::inference::ExtractiveQa;
use crate::model::{DocumentType, ExtractedClause};

/// Minimum QA confidence (exclusive) for a clause to be retained
const CONFIDENCE_FLOOR: f64 = 0.1;

/// Question-prefix phrases stripped when deriving a clause key
const KEY_PREFIXES: [&str; 2] = ["What is ", "What are "];

const CONTRACT_QUESTIONS: [&str; 4] = [
    "What is the effective date?",
    "Who are the parties?",
    "What are the payment terms?",
    "What is the governing law?",
];

const EMPLOYMENT_QUESTIONS: [&str; 4] = [
    "What is the salary?",
    "What is the job title?",
    "When does employment start?",
    "What are the benefits?",
];

const GENERIC_QUESTIONS: [&str; 3] = [
    "What are the main terms?",
    "Who are the parties involved?",
    "What are the key obligations?",
];

/// Question template set for a predicted document type
///
/// Only contract and employment documents have dedicated sets; every other
/// type falls back to the generic questions.
fn questions_for(document_type: DocumentType) -> &'static [&'static str] {
    match document_type {
        DocumentType::Contract => &CONTRACT_QUESTIONS,
        DocumentType::Employment => &EMPLOYMENT_QUESTIONS,
        _ => &GENERIC_QUESTIONS,
    }
}

/// Derive the clause key from its template question
fn clause_key(question: &str) -> String {
    let mut key = question;
    for prefix in KEY_PREFIXES {
        if let Some(rest) = key.strip_prefix(prefix) {
            key = rest;
            break;
        }
    }
    key.trim_end_matches(['?', '.', '!']).to_string()
}

/// Extracts key clauses by asking type-specific questions of the document
pub struct ClauseExtractor {
    qa: Arc<dyn ExtractiveQa>,
}

impl ClauseExtractor {
    pub fn new(qa: Arc<dyn ExtractiveQa>) -> Self {
        Self { qa }
    }

    /// Run every question for the document type against the text
    ///
    /// A failing question is logged and skipped; failures never abort the
    /// remaining questions, so this method itself cannot fail. Answers at or
    /// below the confidence floor are discarded. If two questions derive the
    /// same key, the later one wins.
    pub async fn extract(
        &self,
        text: &str,
        document_type: DocumentType,
    ) -> BTreeMap<String, ExtractedClause> {
        let mut clauses = BTreeMap::new();

        for question in questions_for(document_type) {
            match self.qa.answer(question, text).await {
                Ok(answer) => {
                    if answer.score > CONFIDENCE_FLOOR {
                        let key = clause_key(question);
                        clauses.insert(
                            key.clone(),
                            ExtractedClause {
                                key,
                                answer_text: answer.answer,
                                confidence: answer.score,
                                question: question.to_string(),
                            },
                        );
                    } else {
                        tracing::debug!(
                            question = %question,
                            score = answer.score,
                            "Discarding low-confidence answer"
                        );
                    }
                }
                Err(e) => {
                    tracing::warn!(question = %question, error = %e, "Error extracting clause");
                }
            }
        }

        clauses
    }
}
