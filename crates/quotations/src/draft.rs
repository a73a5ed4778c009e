//! Editable quotation, before it is saved to the ledger.

use chrono::{DateTime, Utc};

use quotedesk_core::{DomainError, DomainResult, QuotationId};

use crate::calculator::Totals;
use crate::model::{Quotation, QuotationItem};

pub const DEFAULT_TERMS: &str = "Payment due within 30 days. Late payments subject to fees.";

/// Quotation being edited.
///
/// Always holds at least one item. Line totals are kept current as quantity
/// and unit price change, so [`QuotationDraft::totals`] is always a valid
/// preview of what [`QuotationDraft::finalize`] will freeze.
#[derive(Debug, Clone, PartialEq)]
pub struct QuotationDraft {
    pub client_name: String,
    pub client_contact: String,
    pub client_email: String,
    pub tax_percent: f64,
    pub discount_percent: f64,
    pub terms_and_conditions: Option<String>,
    items: Vec<QuotationItem>,
}

impl Default for QuotationDraft {
    fn default() -> Self {
        Self::new()
    }
}

impl QuotationDraft {
    pub fn new() -> Self {
        Self {
            client_name: String::new(),
            client_contact: String::new(),
            client_email: String::new(),
            tax_percent: 0.0,
            discount_percent: 0.0,
            terms_and_conditions: Some(DEFAULT_TERMS.to_string()),
            items: vec![QuotationItem::blank("1")],
        }
    }

    /// Pre-filled draft copying client, lines, rates and terms of `source`.
    pub fn duplicate_of(source: &Quotation) -> Self {
        let mut items = source.items.clone();
        for item in &mut items {
            item.recompute_total();
        }
        if items.is_empty() {
            items.push(QuotationItem::blank("1"));
        }

        Self {
            client_name: source.client_name.clone(),
            client_contact: source.client_contact.clone(),
            client_email: source.client_email.clone(),
            tax_percent: source.tax_percent,
            discount_percent: source.discount_percent,
            terms_and_conditions: source.terms_and_conditions.clone(),
            items,
        }
    }

    pub fn items(&self) -> &[QuotationItem] {
        &self.items
    }

    /// Append an empty line and return its id (one past the highest numeric id).
    pub fn add_item(&mut self) -> String {
        let next = self
            .items
            .iter()
            .filter_map(|item| item.id.parse::<u64>().ok())
            .max()
            .map(|max| max + 1)
            .unwrap_or(self.items.len() as u64 + 1);
        let id = next.to_string();
        self.items.push(QuotationItem::blank(id.clone()));
        id
    }

    /// Fill the first blank line, or append a new one, with the given values.
    pub fn fill_line(
        &mut self,
        description: impl Into<String>,
        quantity: i64,
        unit_price: f64,
    ) -> String {
        let index = match self.items.iter().position(|item| item.is_blank()) {
            Some(index) => index,
            None => {
                self.add_item();
                self.items.len() - 1
            }
        };
        let item = &mut self.items[index];
        item.description = description.into();
        item.quantity = quantity;
        item.unit_price = unit_price;
        item.recompute_total();
        item.id.clone()
    }

    pub fn remove_item(&mut self, id: &str) -> DomainResult<()> {
        let index = self
            .items
            .iter()
            .position(|item| item.id == id)
            .ok_or_else(DomainError::not_found)?;
        if self.items.len() == 1 {
            return Err(DomainError::validation("at least one item is required"));
        }
        self.items.remove(index);
        Ok(())
    }

    pub fn set_description(&mut self, id: &str, description: impl Into<String>) -> DomainResult<()> {
        let item = self.item_mut(id).ok_or_else(DomainError::not_found)?;
        item.description = description.into();
        Ok(())
    }

    pub fn set_quantity(&mut self, id: &str, quantity: i64) -> DomainResult<()> {
        let item = self.item_mut(id).ok_or_else(DomainError::not_found)?;
        item.quantity = quantity;
        item.recompute_total();
        Ok(())
    }

    pub fn set_unit_price(&mut self, id: &str, unit_price: f64) -> DomainResult<()> {
        let item = self.item_mut(id).ok_or_else(DomainError::not_found)?;
        item.unit_price = unit_price;
        item.recompute_total();
        Ok(())
    }

    pub fn totals(&self) -> Totals {
        Totals::compute(&self.items, self.tax_percent, self.discount_percent)
    }

    /// Check the draft can be saved: client details present and every line described.
    pub fn validate(&self) -> DomainResult<()> {
        let client_fields = [&self.client_name, &self.client_contact, &self.client_email];
        if client_fields.iter().any(|field| field.trim().is_empty()) {
            return Err(DomainError::validation(
                "client name, contact and email are required",
            ));
        }
        if self.items.iter().any(|item| item.description.trim().is_empty()) {
            return Err(DomainError::validation("every item needs a description"));
        }
        Ok(())
    }

    /// Freeze the draft into a saved quotation.
    ///
    /// Items are copied by value and totals computed once here; later edits
    /// of this draft do not reach the returned quotation.
    pub fn finalize(
        &self,
        id: QuotationId,
        quotation_number: impl Into<String>,
        date: DateTime<Utc>,
    ) -> DomainResult<Quotation> {
        self.validate()?;

        let mut items = self.items.clone();
        for item in &mut items {
            item.recompute_total();
        }
        let totals = Totals::compute(&items, self.tax_percent, self.discount_percent);

        Ok(Quotation {
            id,
            quotation_number: quotation_number.into(),
            client_name: self.client_name.clone(),
            client_contact: self.client_contact.clone(),
            client_email: self.client_email.clone(),
            date,
            items,
            subtotal: totals.subtotal,
            tax_percent: self.tax_percent,
            discount_percent: self.discount_percent,
            grand_total: totals.grand_total,
            terms_and_conditions: self.terms_and_conditions.clone(),
        })
    }

    fn item_mut(&mut self, id: &str) -> Option<&mut QuotationItem> {
        self.items.iter_mut().find(|item| item.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_draft() -> QuotationDraft {
        let mut draft = QuotationDraft::new();
        draft.client_name = "Jane Doe".to_string();
        draft.client_contact = "555-0101".to_string();
        draft.client_email = "jane@example.com".to_string();
        draft.fill_line("Desk", 2, 50.0);
        draft.tax_percent = 10.0;
        draft.discount_percent = 5.0;
        draft
    }

    #[test]
    fn new_draft_has_one_blank_line_and_default_terms() {
        let draft = QuotationDraft::new();
        assert_eq!(draft.items().len(), 1);
        assert_eq!(draft.items()[0].id, "1");
        assert!(draft.items()[0].is_blank());
        assert_eq!(draft.terms_and_conditions.as_deref(), Some(DEFAULT_TERMS));
    }

    #[test]
    fn add_item_uses_next_numeric_id() {
        let mut draft = QuotationDraft::new();
        assert_eq!(draft.add_item(), "2");
        assert_eq!(draft.add_item(), "3");
        draft.remove_item("2").unwrap();
        assert_eq!(draft.add_item(), "4");
    }

    #[test]
    fn last_item_cannot_be_removed() {
        let mut draft = QuotationDraft::new();
        let err = draft.remove_item("1").unwrap_err();
        assert!(matches!(err, DomainError::Validation(msg) if msg.contains("at least one item")));
    }

    #[test]
    fn editing_quantity_or_price_recomputes_line_total() {
        let mut draft = QuotationDraft::new();
        draft.set_quantity("1", 3).unwrap();
        draft.set_unit_price("1", 4.5).unwrap();
        assert_eq!(draft.items()[0].total, 13.5);
        assert_eq!(draft.set_quantity("9", 1).unwrap_err(), DomainError::NotFound);
    }

    #[test]
    fn fill_line_reuses_blank_line_then_appends() {
        let mut draft = QuotationDraft::new();
        assert_eq!(draft.fill_line("Desk", 1, 10.0), "1");
        assert_eq!(draft.fill_line("Chair", 2, 5.0), "2");
        assert_eq!(draft.totals().subtotal, 20.0);
    }

    #[test]
    fn validation_requires_client_details_and_descriptions() {
        let mut draft = filled_draft();
        draft.client_email.clear();
        assert!(matches!(draft.validate(), Err(DomainError::Validation(_))));

        let mut draft = filled_draft();
        draft.add_item();
        let err = draft.validate().unwrap_err();
        assert!(matches!(err, DomainError::Validation(msg) if msg.contains("description")));
    }

    #[test]
    fn finalize_freezes_totals() {
        let mut draft = filled_draft();
        let quotation = draft
            .finalize(QuotationId::new(), "QT-1001", Utc::now())
            .unwrap();
        assert_eq!(quotation.subtotal, 100.0);
        assert_eq!(quotation.grand_total, 105.0);

        draft.set_quantity("1", 10).unwrap();
        assert_eq!(quotation.items[0].quantity, 2);
        assert_eq!(quotation.grand_total, 105.0);
        assert_eq!(draft.totals().subtotal, 500.0);
    }

    #[test]
    fn duplicate_copies_everything_but_identity() {
        let original = filled_draft()
            .finalize(QuotationId::new(), "QT-1001", Utc::now())
            .unwrap();
        let copy = QuotationDraft::duplicate_of(&original);
        assert_eq!(copy.client_name, original.client_name);
        assert_eq!(copy.items(), original.items.as_slice());
        assert_eq!(copy.tax_percent, 10.0);
        assert_eq!(copy.totals().grand_total, original.grand_total);
    }
}
