use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use quotedesk_core::{Entity, QuotationId};

use crate::calculator;

/// The registered company. Exactly one exists per device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyProfile {
    pub company_name: String,
    pub email: String,
    pub contact_number: String,
    /// Logo as a `data:image/...;base64,` URL.
    #[serde(default)]
    pub logo: Option<String>,
    pub referral_code: String,
}

/// One priced line of a quotation.
///
/// `id` is only unique within its parent quotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotationItem {
    pub id: String,
    pub description: String,
    pub quantity: i64,
    pub unit_price: f64,
    pub total: f64,
}

impl QuotationItem {
    pub fn new(
        id: impl Into<String>,
        description: impl Into<String>,
        quantity: i64,
        unit_price: f64,
    ) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            quantity,
            unit_price,
            total: calculator::item_total(quantity, unit_price),
        }
    }

    /// Empty line as shown by a fresh editor.
    pub fn blank(id: impl Into<String>) -> Self {
        Self::new(id, "", 0, 0.0)
    }

    pub fn is_blank(&self) -> bool {
        self.description.is_empty() && self.quantity == 0 && self.unit_price == 0.0
    }

    pub fn recompute_total(&mut self) {
        self.total = calculator::item_total(self.quantity, self.unit_price);
    }
}

/// A saved quotation.
///
/// `subtotal` and `grand_total` are a snapshot taken when the quotation was
/// saved; reading a quotation never recomputes them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quotation {
    pub id: QuotationId,
    pub quotation_number: String,
    pub client_name: String,
    pub client_contact: String,
    pub client_email: String,
    pub date: DateTime<Utc>,
    pub items: Vec<QuotationItem>,
    pub subtotal: f64,
    pub tax_percent: f64,
    pub discount_percent: f64,
    pub grand_total: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terms_and_conditions: Option<String>,
}

impl Quotation {
    pub fn tax_amount(&self) -> f64 {
        self.subtotal * self.tax_percent / 100.0
    }

    pub fn discount_amount(&self) -> f64 {
        self.subtotal * self.discount_percent / 100.0
    }
}

impl Entity for Quotation {
    type Id = QuotationId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
