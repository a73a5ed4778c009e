//! Caller-side sorting and searching of quotation history.
//!
//! The ledger keeps history in insertion order; these helpers work on a copy
//! and never write anything back.

use core::str::FromStr;

use serde::{Deserialize, Serialize};

use quotedesk_core::DomainError;

use crate::model::Quotation;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Most recent `date` first.
    #[default]
    Newest,
    Oldest,
    /// Largest grand total first.
    Highest,
    Lowest,
}

impl FromStr for SortOrder {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "newest" => Ok(SortOrder::Newest),
            "oldest" => Ok(SortOrder::Oldest),
            "highest" => Ok(SortOrder::Highest),
            "lowest" => Ok(SortOrder::Lowest),
            _ => Err(DomainError::validation(
                "sort must be one of: newest, oldest, highest, lowest",
            )),
        }
    }
}

/// Stable sort in place.
pub fn sort(quotations: &mut [Quotation], order: SortOrder) {
    match order {
        SortOrder::Newest => quotations.sort_by(|a, b| b.date.cmp(&a.date)),
        SortOrder::Oldest => quotations.sort_by(|a, b| a.date.cmp(&b.date)),
        SortOrder::Highest => quotations.sort_by(|a, b| b.grand_total.total_cmp(&a.grand_total)),
        SortOrder::Lowest => quotations.sort_by(|a, b| a.grand_total.total_cmp(&b.grand_total)),
    }
}

/// Case-insensitive match on client name, quotation number or client email.
///
/// Surrounding whitespace in `query` is ignored.
pub fn matches(quotation: &Quotation, query: &str) -> bool {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    [
        &quotation.client_name,
        &quotation.quotation_number,
        &quotation.client_email,
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(&needle))
}

/// Sorted, filtered copy of `history`.
pub fn list(history: &[Quotation], query: &str, order: SortOrder) -> Vec<Quotation> {
    let mut selected: Vec<Quotation> = history
        .iter()
        .filter(|quotation| matches(quotation, query))
        .cloned()
        .collect();
    sort(&mut selected, order);
    selected
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use quotedesk_core::QuotationId;

    fn quotation(number: &str, client: &str, day: u32, grand_total: f64) -> Quotation {
        Quotation {
            id: QuotationId::new(),
            quotation_number: number.to_string(),
            client_name: client.to_string(),
            client_contact: "555".to_string(),
            client_email: format!("{}@example.com", client.to_lowercase()),
            date: Utc.with_ymd_and_hms(2024, 3, day, 9, 0, 0).unwrap(),
            items: Vec::new(),
            subtotal: grand_total,
            tax_percent: 0.0,
            discount_percent: 0.0,
            grand_total,
            terms_and_conditions: None,
        }
    }

    fn history() -> Vec<Quotation> {
        vec![
            quotation("QT-1002", "Bravo", 5, 300.0),
            quotation("QT-1001", "Alpha", 1, 50.0),
            quotation("QT-1003", "Charlie", 9, 120.0),
        ]
    }

    fn numbers(list: &[Quotation]) -> Vec<&str> {
        list.iter().map(|q| q.quotation_number.as_str()).collect()
    }

    #[test]
    fn sorts_by_date_and_total() {
        let h = history();
        assert_eq!(numbers(&list(&h, "", SortOrder::Newest)), ["QT-1003", "QT-1002", "QT-1001"]);
        assert_eq!(numbers(&list(&h, "", SortOrder::Oldest)), ["QT-1001", "QT-1002", "QT-1003"]);
        assert_eq!(numbers(&list(&h, "", SortOrder::Highest)), ["QT-1002", "QT-1003", "QT-1001"]);
        assert_eq!(numbers(&list(&h, "", SortOrder::Lowest)), ["QT-1001", "QT-1003", "QT-1002"]);
    }

    #[test]
    fn search_is_case_insensitive_over_name_number_and_email() {
        let h = history();
        assert_eq!(numbers(&list(&h, "ALPHA", SortOrder::Newest)), ["QT-1001"]);
        assert_eq!(numbers(&list(&h, "qt-1003", SortOrder::Newest)), ["QT-1003"]);
        assert_eq!(numbers(&list(&h, "bravo@", SortOrder::Newest)), ["QT-1002"]);
        assert!(list(&h, "nobody", SortOrder::Newest).is_empty());
    }

    #[test]
    fn search_ignores_surrounding_whitespace() {
        let h = history();
        assert_eq!(numbers(&list(&h, "  alpha ", SortOrder::Newest)), ["QT-1001"]);
        assert_eq!(list(&h, "   ", SortOrder::Newest).len(), 3);
    }

    #[test]
    fn listing_leaves_input_order_alone() {
        let h = history();
        let _ = list(&h, "", SortOrder::Highest);
        assert_eq!(numbers(&h), ["QT-1002", "QT-1001", "QT-1003"]);
    }

    #[test]
    fn parses_sort_names() {
        assert_eq!("Highest".parse::<SortOrder>().unwrap(), SortOrder::Highest);
        assert!("sideways".parse::<SortOrder>().is_err());
    }
}
