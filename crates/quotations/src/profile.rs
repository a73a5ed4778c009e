//! Registration and profile editing rules.
//!
//! These checks run before anything is handed to the ledger store, which
//! itself accepts whatever profile it is given.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use quotedesk_core::{DomainError, DomainResult};

use crate::model::CompanyProfile;

/// Largest accepted logo file (2 MiB).
pub const MAX_LOGO_BYTES: usize = 2 * 1024 * 1024;

const ACCEPTED_LOGO_TYPES: [&str; 2] = ["image/jpeg", "image/png"];

/// `local@domain.tld`: one `@`, no whitespace, a dot inside the domain part.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

/// Detect PNG or JPEG from the file's leading bytes.
pub fn sniff_logo_mime(bytes: &[u8]) -> Option<&'static str> {
    const PNG: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
    const JPEG: &[u8] = &[0xFF, 0xD8, 0xFF];

    if bytes.starts_with(PNG) {
        Some("image/png")
    } else if bytes.starts_with(JPEG) {
        Some("image/jpeg")
    } else {
        None
    }
}

/// Validate a logo upload and encode it as a data URL.
pub fn encode_logo(bytes: &[u8], mime: &str) -> DomainResult<String> {
    if !ACCEPTED_LOGO_TYPES.contains(&mime) {
        return Err(DomainError::validation("only JPG and PNG files are allowed"));
    }
    if bytes.len() > MAX_LOGO_BYTES {
        return Err(DomainError::validation("file size must be less than 2MB"));
    }
    Ok(format!("data:{mime};base64,{}", STANDARD.encode(bytes)))
}

/// Registration form contents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Registration {
    pub company_name: String,
    pub email: String,
    pub contact_number: String,
    pub logo: Option<String>,
    pub referral_code: String,
}

impl Registration {
    /// Check the form and produce the profile to save.
    ///
    /// The referral code is only compared here; a saved profile is never
    /// re-checked against it.
    pub fn validate(self, referral_secret: &str) -> DomainResult<CompanyProfile> {
        let missing_text = [
            &self.company_name,
            &self.email,
            &self.contact_number,
            &self.referral_code,
        ]
        .iter()
        .any(|field| field.trim().is_empty());
        let missing_logo = self.logo.as_deref().is_none_or(str::is_empty);
        if missing_text || missing_logo {
            return Err(DomainError::validation("all fields are required"));
        }

        if self.referral_code != referral_secret {
            return Err(DomainError::validation("invalid referral code"));
        }

        if !is_valid_email(&self.email) {
            return Err(DomainError::validation("invalid email address"));
        }

        Ok(CompanyProfile {
            company_name: self.company_name,
            email: self.email,
            contact_number: self.contact_number,
            logo: self.logo,
            referral_code: self.referral_code,
        })
    }
}

/// Partial edit of the saved profile. `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub company_name: Option<String>,
    pub email: Option<String>,
    pub contact_number: Option<String>,
    pub logo: Option<String>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self.company_name.is_none()
            && self.email.is_none()
            && self.contact_number.is_none()
            && self.logo.is_none()
    }

    pub fn apply(self, current: &CompanyProfile) -> DomainResult<CompanyProfile> {
        let mut updated = current.clone();

        if let Some(name) = self.company_name {
            if name.trim().is_empty() {
                return Err(DomainError::validation("company name cannot be empty"));
            }
            updated.company_name = name;
        }
        if let Some(email) = self.email {
            if !is_valid_email(&email) {
                return Err(DomainError::validation("invalid email address"));
            }
            updated.email = email;
        }
        if let Some(contact) = self.contact_number {
            if contact.trim().is_empty() {
                return Err(DomainError::validation("contact number cannot be empty"));
            }
            updated.contact_number = contact;
        }
        if let Some(logo) = self.logo {
            updated.logo = Some(logo);
        }

        Ok(updated)
    }
}
