//! Plain-text quotation document.

use std::fmt;

use crate::calculator::format_amount;
use crate::model::{CompanyProfile, Quotation};

const WIDTH: usize = 72;

/// Lay out `quotation` under the company header. Amounts use two decimals.
pub fn render_quotation(quotation: &Quotation, company: &CompanyProfile) -> String {
    QuotationDocument { quotation, company }.to_string()
}

/// Plain-text view of a quotation, printable with `{}`.
#[derive(Debug, Clone, Copy)]
pub struct QuotationDocument<'a> {
    pub quotation: &'a Quotation,
    pub company: &'a CompanyProfile,
}

impl fmt::Display for QuotationDocument<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self { quotation, company } = *self;
        let rule = "-".repeat(WIDTH);

        writeln!(f, "{:^WIDTH$}", company.company_name)?;
        writeln!(f, "{:^WIDTH$}", company.email)?;
        writeln!(f, "{:^WIDTH$}", company.contact_number)?;
        writeln!(f)?;
        writeln!(f, "{:^WIDTH$}", "QUOTATION")?;
        writeln!(f, "{rule}")?;
        writeln!(
            f,
            "Quotation Number: {:<20} Client Name:    {}",
            quotation.quotation_number, quotation.client_name
        )?;
        writeln!(
            f,
            "Date:             {:<20} Client Contact: {}",
            quotation.date.format("%Y-%m-%d"),
            quotation.client_contact
        )?;
        writeln!(f, "{:<38}Client Email:   {}", "", quotation.client_email)?;
        writeln!(f, "{rule}")?;
        writeln!(
            f,
            "{:<4} {:<34} {:>6} {:>12} {:>12}",
            "#", "Description", "Qty", "Unit Price", "Total"
        )?;
        writeln!(f, "{rule}")?;
        for (index, item) in quotation.items.iter().enumerate() {
            writeln!(
                f,
                "{:<4} {:<34} {:>6} {:>12} {:>12}",
                index + 1,
                item.description,
                item.quantity,
                format_amount(item.unit_price),
                format_amount(item.total)
            )?;
        }
        writeln!(f, "{rule}")?;
        writeln!(f, "{:>58} {:>13}", "Subtotal:", format_amount(quotation.subtotal))?;
        if quotation.tax_percent != 0.0 {
            let label = format!("Tax ({}%):", quotation.tax_percent);
            writeln!(f, "{label:>58} {:>13}", format_amount(quotation.tax_amount()))?;
        }
        if quotation.discount_percent != 0.0 {
            let label = format!("Discount ({}%):", quotation.discount_percent);
            let amount = format!("-{}", format_amount(quotation.discount_amount()));
            writeln!(f, "{label:>58} {amount:>13}")?;
        }
        writeln!(f, "{:>58} {:>13}", "Grand Total:", format_amount(quotation.grand_total))?;

        if let Some(terms) = quotation
            .terms_and_conditions
            .as_deref()
            .filter(|terms| !terms.trim().is_empty())
        {
            writeln!(f)?;
            writeln!(f, "Terms & Conditions:")?;
            writeln!(f, "{terms}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::QuotationDraft;
    use chrono::{TimeZone, Utc};
    use quotedesk_core::QuotationId;

    fn company() -> CompanyProfile {
        CompanyProfile {
            company_name: "Acme Traders".to_string(),
            email: "sales@acme.test".to_string(),
            contact_number: "555-0100".to_string(),
            logo: None,
            referral_code: "REF".to_string(),
        }
    }

    fn quotation() -> Quotation {
        let mut draft = QuotationDraft::new();
        draft.client_name = "Jane Doe".to_string();
        draft.client_contact = "555-0101".to_string();
        draft.client_email = "jane@example.com".to_string();
        draft.fill_line("Standing desk", 2, 50.0);
        draft.tax_percent = 10.0;
        draft.discount_percent = 5.0;
        draft
            .finalize(
                QuotationId::new(),
                "QT-1001",
                Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
            )
            .unwrap()
    }

    #[test]
    fn document_contains_header_lines_and_totals() {
        let text = render_quotation(&quotation(), &company());
        assert!(text.contains("Acme Traders"));
        assert!(text.contains("QT-1001"));
        assert!(text.contains("2024-05-01"));
        assert!(text.contains("Standing desk"));
        assert!(text.contains("Subtotal:"));
        assert!(text.contains("100.00"));
        assert!(text.contains("Tax (10%):"));
        assert!(text.contains("-5.00"));
        assert!(text.contains("105.00"));
        assert!(text.contains("Payment due within 30 days"));
    }

    #[test]
    fn document_displays_the_same_text() {
        let (q, c) = (quotation(), company());
        let shown = format!("{}", QuotationDocument { quotation: &q, company: &c });
        assert_eq!(shown, render_quotation(&q, &c));
        assert!(shown.ends_with("Late payments subject to fees.\n"));
    }

    #[test]
    fn zero_rates_are_omitted() {
        let mut q = quotation();
        q.tax_percent = 0.0;
        q.discount_percent = 0.0;
        q.terms_and_conditions = None;
        let text = render_quotation(&q, &company());
        assert!(!text.contains("Tax ("));
        assert!(!text.contains("Discount ("));
        assert!(!text.contains("Terms"));
    }
}
