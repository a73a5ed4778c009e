//! Backup document: `{ "companyProfile": ..., "quotationHistory": [...] }`.

use serde::{Deserialize, Serialize};

use quotedesk_quotations::{CompanyProfile, Quotation};

use crate::error::ImportError;

/// Whole-ledger backup.
///
/// On import a missing or `null` section leaves the corresponding ledger
/// record alone; unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default)]
    pub company_profile: Option<CompanyProfile>,
    #[serde(default)]
    pub quotation_history: Option<Vec<Quotation>>,
}

impl Snapshot {
    pub fn to_pretty_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Parse and shape-check a document without touching any state.
    pub fn parse(text: &str) -> Result<Self, ImportError> {
        let value: serde_json::Value = serde_json::from_str(text).map_err(ImportError::Parse)?;
        if !value.is_object() {
            return Err(ImportError::NotAnObject);
        }
        serde_json::from_value(value).map_err(ImportError::Shape)
    }
}

/// What an import changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSummary {
    pub profile_restored: bool,
    /// Number of quotations written, if the history section was present.
    pub quotations_restored: Option<usize>,
}
