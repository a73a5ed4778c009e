//! Quotation domain module.
//!
//! This crate contains the quotation data model and the business rules around
//! it, implemented purely as deterministic domain logic (no IO, no storage):
//! totals computation, draft editing, registration checks, history listing,
//! analytics, the keypad calculator and plain-text rendering.

pub mod analytics;
pub mod calculator;
pub mod draft;
pub mod keypad;
pub mod listing;
pub mod model;
pub mod profile;
pub mod render;

pub use analytics::{Analytics, ClientSummary};
pub use calculator::{Totals, format_amount, grand_total, item_total, subtotal};
pub use draft::{DEFAULT_TERMS, QuotationDraft};
pub use keypad::{Key, Keypad, Operator};
pub use listing::SortOrder;
pub use model::{CompanyProfile, Quotation, QuotationItem};
pub use profile::{ProfileUpdate, Registration, encode_logo, is_valid_email, sniff_logo_mime};
pub use render::{QuotationDocument, render_quotation};
