//! Fixed taxonomy of legal document types and their indicator keywords

use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

/// Legal document types the classifier can predict
///
/// Declaration order matters: classification ties are broken in favor of the
/// first-declared type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    Contract,
    License,
    Lease,
    Employment,
    Nda,
}

impl DocumentType {
    /// All types in declaration (tie-break) order
    pub const ALL: [DocumentType; 5] = [
        DocumentType::Contract,
        DocumentType::License,
        DocumentType::Lease,
        DocumentType::Employment,
        DocumentType::Nda,
    ];

    /// Indicator keywords for this type
    ///
    /// Each keyword is matched as a case-insensitive substring and counted at
    /// most once per document (presence, not frequency).
    pub fn indicators(&self) -> &'static [&'static str] {
        match self {
            DocumentType::Contract => &["agreement", "party", "whereas", "covenant"],
            DocumentType::License => &["license", "licensor", "licensee", "grant"],
            DocumentType::Lease => &["lease", "lessor", "lessee", "rent", "premises"],
            DocumentType::Employment => &["employee", "employer", "employment", "salary"],
            DocumentType::Nda => &["confidential", "non-disclosure", "proprietary"],
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::Contract => "contract",
            DocumentType::License => "license",
            DocumentType::Lease => "lease",
            DocumentType::Employment => "employment",
            DocumentType::Nda => "nda",
        }
    }

    pub fn from_str_opt(s: &str) -> Option<DocumentType> {
        match s {
            "contract" => Some(DocumentType::Contract),
            "license" => Some(DocumentType::License),
            "lease" => Some(DocumentType::Lease),
            "employment" => Some(DocumentType::Employment),
            "nda" => Some(DocumentType::Nda),
            _ => None,
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_names() {
        for ty in DocumentType::ALL {
            assert_eq!(DocumentType::from_str_opt(ty.as_str()), Some(ty));
        }
    }

    #[test]
    fn test_contract_is_first_declared() {
        assert_eq!(DocumentType::ALL[0], DocumentType::Contract);
    }
}
