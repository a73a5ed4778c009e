//! Strongly-typed identifiers used across the domain.

use core::str::FromStr;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Opaque identifier of a saved quotation.
///
/// Distinct from the human-facing quotation number (`QT-1001`); never reused.
/// Any non-empty token is accepted, so ledgers written by older clients (which
/// used millisecond timestamps) still load. New ids are UUIDv7 strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct QuotationId(String);

impl QuotationId {
    /// Create a new identifier.
    ///
    /// Uses UUIDv7 (time-ordered). Prefer passing IDs explicitly in tests
    /// for determinism.
    pub fn new() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for QuotationId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for QuotationId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for QuotationId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value.trim().is_empty() {
            return Err(DomainError::invalid_id("QuotationId: must not be empty"));
        }
        Ok(Self(value))
    }
}

impl From<QuotationId> for String {
    fn from(value: QuotationId) -> Self {
        value.0
    }
}

impl FromStr for QuotationId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_ids_are_unique_and_time_ordered() {
        let a = QuotationId::new();
        let b = QuotationId::new();
        assert_ne!(a, b);
        assert!(a < b);
    }

    #[test]
    fn parses_its_own_display_form() {
        let id = QuotationId::new();
        let parsed: QuotationId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn accepts_timestamp_tokens() {
        let id: QuotationId = "1718000000000".parse().unwrap();
        assert_eq!(id.as_str(), "1718000000000");
    }

    #[test]
    fn rejects_empty() {
        for raw in ["", "   "] {
            let err = raw.parse::<QuotationId>().unwrap_err();
            assert!(matches!(err, DomainError::InvalidId(msg) if msg.starts_with("QuotationId")));
        }
    }

    #[test]
    fn serializes_as_bare_string() {
        let id = QuotationId::new();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{id}\""));
    }

    #[test]
    fn deserializes_any_non_empty_string() {
        let id: QuotationId = serde_json::from_str("\"1718000000000\"").unwrap();
        assert_eq!(id.to_string(), "1718000000000");
        assert!(serde_json::from_str::<QuotationId>("\"\"").is_err());
    }
}
