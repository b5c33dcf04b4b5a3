//! Entity extraction: NER collaborator output plus a monetary regex pass

use regex::Regex;
use std::sync::{Arc, OnceLock};

use crate::inference::{EntityAnnotator, InferenceError};
use crate::model::{ExtractedEntitySet, ENTITY_LABELS, MONETARY_AMOUNTS};

fn money_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    // Currency-formatted strings: $ then digits with optional thousands
    // separators and optional two-decimal cents
    PATTERN.get_or_init(|| Regex::new(r"\$[\d,]+(?:\.\d{2})?").unwrap())
}

/// Extracts typed entity spans from normalized text
///
/// NER output is filtered to the five recognized labels; anything else the
/// annotator reports is dropped silently. Within a label, repeated spans are
/// collapsed to their first occurrence. The regex monetary pass populates
/// `monetary_amounts` independently of the NER MONEY label; that list keeps
/// every match, duplicates included, and is not deduplicated against MONEY.
pub struct EntityExtractor {
    annotator: Arc<dyn EntityAnnotator>,
}

impl EntityExtractor {
    pub fn new(annotator: Arc<dyn EntityAnnotator>) -> Self {
        Self { annotator }
    }

    /// Run the NER collaborator and the monetary pass
    ///
    /// Collaborator failure aborts the whole analysis; entities are not an
    /// optional output.
    pub async fn extract(&self, text: &str) -> Result<ExtractedEntitySet, InferenceError> {
        let spans = self.annotator.annotate(text).await?;

        let mut set = ExtractedEntitySet::default();
        for label in ENTITY_LABELS {
            set.entities.insert(label.to_string(), Vec::new());
        }

        for span in spans {
            if let Some(bucket) = set.entities.get_mut(span.label.as_str()) {
                if !bucket.contains(&span.text) {
                    bucket.push(span.text);
                }
            }
        }

        let monetary: Vec<String> = money_pattern()
            .find_iter(text)
            .map(|m| m.as_str().to_string())
            .collect();
        set.entities.insert(MONETARY_AMOUNTS.to_string(), monetary);

        tracing::debug!(total = set.len(), "Entities extracted");

        Ok(set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::NamedEntity;
    use async_trait::async_trait;

    struct FakeAnnotator {
        spans: Vec<(&'static str, &'static str)>,
    }

    #[async_trait]
    impl EntityAnnotator for FakeAnnotator {
        async fn annotate(&self, _text: &str) -> Result<Vec<NamedEntity>, InferenceError> {
            Ok(self
                .spans
                .iter()
                .map(|(label, text)| NamedEntity {
                    label: label.to_string(),
                    text: text.to_string(),
                })
                .collect())
        }
    }

    #[tokio::test]
    async fn test_filters_to_recognized_labels() {
        let extractor = EntityExtractor::new(Arc::new(FakeAnnotator {
            spans: vec![
                ("PERSON", "John Smith"),
                ("CARDINAL", "thirty"),
                ("ORG", "Tech Innovations Inc."),
                ("NORP", "Delaware corporation"),
                ("GPE", "Delaware"),
            ],
        }));

        let set = extractor.extract("irrelevant").await.unwrap();
        assert_eq!(set.get("PERSON"), ["John Smith"]);
        assert_eq!(set.get("ORG"), ["Tech Innovations Inc."]);
        assert_eq!(set.get("GPE"), ["Delaware"]);
        assert!(!set.entities.contains_key("CARDINAL"));
        assert!(!set.entities.contains_key("NORP"));
    }

    #[tokio::test]
    async fn test_repeated_spans_collapse_to_first_occurrence() {
        let extractor = EntityExtractor::new(Arc::new(FakeAnnotator {
            spans: vec![
                ("PERSON", "John Smith"),
                ("ORG", "Acme Corp"),
                ("PERSON", "John Smith"),
                ("PERSON", "Jane Doe"),
                ("ORG", "Acme Corp"),
            ],
        }));

        let set = extractor.extract("irrelevant").await.unwrap();
        assert_eq!(set.get("PERSON"), ["John Smith", "Jane Doe"]);
        assert_eq!(set.get("ORG"), ["Acme Corp"]);
    }

    #[tokio::test]
    async fn test_same_text_under_different_labels_is_kept() {
        let extractor = EntityExtractor::new(Arc::new(FakeAnnotator {
            spans: vec![("ORG", "Delaware"), ("GPE", "Delaware")],
        }));

        let set = extractor.extract("irrelevant").await.unwrap();
        assert_eq!(set.get("ORG"), ["Delaware"]);
        assert_eq!(set.get("GPE"), ["Delaware"]);
    }

    #[tokio::test]
    async fn test_monetary_amounts_order_and_duplicates() {
        let extractor = EntityExtractor::new(Arc::new(FakeAnnotator { spans: vec![] }));

        let text = "Rent is $1,500 per month. Security Deposit: $1,500 due at signing.";
        let set = extractor.extract(text).await.unwrap();
        assert_eq!(set.get(MONETARY_AMOUNTS), ["$1,500", "$1,500"]);
    }

    #[tokio::test]
    async fn test_money_regex_variants() {
        let extractor = EntityExtractor::new(Arc::new(FakeAnnotator { spans: vec![] }));

        let text = "$5,000 annually, a fee of $120000.00, and $42";
        let set = extractor.extract(text).await.unwrap();
        assert_eq!(
            set.get(MONETARY_AMOUNTS),
            ["$5,000", "$120000.00", "$42"]
        );
    }

    #[tokio::test]
    async fn test_ner_money_and_regex_kept_separate() {
        let extractor = EntityExtractor::new(Arc::new(FakeAnnotator {
            spans: vec![("MONEY", "$1,500")],
        }));

        let set = extractor.extract("pays $1,500 monthly").await.unwrap();
        assert_eq!(set.get("MONEY"), ["$1,500"]);
        assert_eq!(set.get(MONETARY_AMOUNTS), ["$1,500"]);
    }

    #[tokio::test]
    async fn test_all_categories_present_even_when_empty() {
        let extractor = EntityExtractor::new(Arc::new(FakeAnnotator { spans: vec![] }));

        let set = extractor.extract("nothing here").await.unwrap();
        for label in ENTITY_LABELS {
            assert!(set.entities.contains_key(label));
            assert!(set.get(label).is_empty());
        }
        assert!(set.is_empty());
    }
}
