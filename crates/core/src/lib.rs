//! `quotedesk-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives shared by the quotation
//! model and the ledger store (no storage or IO concerns).

pub mod entity;
pub mod error;
pub mod id;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::QuotationId;
