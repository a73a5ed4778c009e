//! Command dispatch.
//!
//! Every command works against one [`LedgerStore`] and writes its output to
//! the supplied writer, so the whole surface runs unchanged against the
//! in-memory backend in tests.

use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, bail};
use quotedesk_core::{DomainError, QuotationId};
use quotedesk_quotations::{
    Analytics, CompanyProfile, Keypad, ProfileUpdate, Quotation, QuotationDraft, Registration,
    encode_logo, format_amount, listing, render_quotation, sniff_logo_mime,
};
use quotedesk_store::{Clock, KeyValueBackend, LedgerStore, SessionState, SystemClock};

use crate::cli::{
    Command, DraftArgs, HistoryArgs, ProfileCommand, ProfileEditArgs, QuoteCommand, RegisterArgs,
};

pub struct App<B, C = SystemClock> {
    store: LedgerStore<B, C>,
    referral_code: String,
}

impl<B: KeyValueBackend, C: Clock> App<B, C> {
    pub fn new(store: LedgerStore<B, C>, referral_code: impl Into<String>) -> Self {
        Self {
            store,
            referral_code: referral_code.into(),
        }
    }

    pub fn store(&self) -> &LedgerStore<B, C> {
        &self.store
    }

    pub fn run(&self, command: Command, out: &mut dyn Write) -> anyhow::Result<()> {
        tracing::debug!(?command, "running command");

        match command {
            Command::Register(args) => self.register(args, out),
            Command::Profile {
                action: ProfileCommand::Show,
            } => self.show_profile(out),
            Command::Profile {
                action: ProfileCommand::Edit(args),
            } => self.edit_profile(args, out),
            Command::Logout => self.logout(out),
            Command::Quote { action } => self.quote(action, out),
            Command::History(args) => self.history(args, out),
            Command::Analytics => self.analytics(out),
            Command::Export { output } => self.export(output.as_deref(), out),
            Command::Import { input } => self.import(&input, out),
            Command::Calc { keys } => calc(&keys, out),
        }
    }

    /// Active profile, refreshing the session. Fails when logged out.
    fn require_profile(&self) -> anyhow::Result<CompanyProfile> {
        if self.store.check_and_evict_if_expired()? == SessionState::ExpiredSession {
            bail!("session expired; run `quotedesk register` again");
        }
        let profile = self
            .store
            .get_profile()?
            .context("no company profile; run `quotedesk register` first")?;
        self.store.refresh_session()?;
        Ok(profile)
    }

    fn register(&self, args: RegisterArgs, out: &mut dyn Write) -> anyhow::Result<()> {
        let registration = Registration {
            company_name: args.company_name,
            email: args.email,
            contact_number: args.contact_number,
            logo: Some(load_logo(&args.logo)?),
            referral_code: args.referral_code,
        };
        let profile = registration.validate(&self.referral_code)?;
        self.store.save_profile(&profile)?;

        writeln!(
            out,
            "Registered {}. Session valid for {} hours.",
            profile.company_name,
            self.store.session_policy().duration().num_hours()
        )?;
        Ok(())
    }

    fn show_profile(&self, out: &mut dyn Write) -> anyhow::Result<()> {
        let profile = self.require_profile()?;
        let logo = profile
            .logo
            .as_deref()
            .and_then(|url| url.strip_prefix("data:"))
            .and_then(|rest| rest.split(';').next())
            .unwrap_or("none");

        writeln!(out, "Company: {}", profile.company_name)?;
        writeln!(out, "Email:   {}", profile.email)?;
        writeln!(out, "Contact: {}", profile.contact_number)?;
        writeln!(out, "Logo:    {logo}")?;
        Ok(())
    }

    fn edit_profile(&self, args: ProfileEditArgs, out: &mut dyn Write) -> anyhow::Result<()> {
        let current = self.require_profile()?;
        let update = ProfileUpdate {
            company_name: args.company_name,
            email: args.email,
            contact_number: args.contact_number,
            logo: args.logo.as_deref().map(load_logo).transpose()?,
        };
        if update.is_empty() {
            bail!("nothing to change; pass at least one field to edit");
        }

        let updated = update.apply(&current)?;
        self.store.save_profile(&updated)?;
        writeln!(out, "Profile updated.")?;
        Ok(())
    }

    fn logout(&self, out: &mut dyn Write) -> anyhow::Result<()> {
        self.store.clear_session()?;
        writeln!(out, "Logged out.")?;
        Ok(())
    }

    fn quote(&self, action: QuoteCommand, out: &mut dyn Write) -> anyhow::Result<()> {
        let profile = self.require_profile()?;

        match action {
            QuoteCommand::New(args) => {
                let mut draft = QuotationDraft::new();
                apply_draft_args(&mut draft, args);
                self.issue(&draft, &profile, out)
            }
            QuoteCommand::Show { reference } => {
                let quotation = self.resolve(&reference)?;
                write!(out, "{}", render_quotation(&quotation, &profile))?;
                Ok(())
            }
            QuoteCommand::Delete { reference } => {
                let quotation = self.resolve(&reference)?;
                if self.store.delete_quotation(&quotation.id)? {
                    writeln!(out, "Deleted {}.", quotation.quotation_number)?;
                }
                Ok(())
            }
            QuoteCommand::Duplicate {
                reference,
                draft: args,
                remove_items,
            } => {
                let source = self.resolve(&reference)?;
                let mut draft = QuotationDraft::duplicate_of(&source);
                apply_draft_args(&mut draft, args);
                for id in &remove_items {
                    draft
                        .remove_item(id)
                        .with_context(|| format!("cannot remove item `{id}`"))?;
                }
                self.issue(&draft, &profile, out)
            }
        }
    }

    /// Number, freeze and save a draft.
    ///
    /// Validation runs before a number is allocated so a rejected draft does
    /// not burn one.
    fn issue(
        &self,
        draft: &QuotationDraft,
        profile: &CompanyProfile,
        out: &mut dyn Write,
    ) -> anyhow::Result<()> {
        draft.validate()?;
        let number = self.store.next_quotation_number()?;
        let quotation = draft.finalize(QuotationId::new(), number, self.store.clock().now())?;
        self.store.save_quotation(&quotation)?;

        write!(out, "{}", render_quotation(&quotation, profile))?;
        Ok(())
    }

    /// Find a saved quotation by number, falling back to its id.
    fn resolve(&self, reference: &str) -> anyhow::Result<Quotation> {
        if let Some(quotation) = self.store.find_by_number(reference)? {
            return Ok(quotation);
        }
        if let Ok(id) = reference.parse::<QuotationId>() {
            if let Some(quotation) = self.store.get_quotation(&id)? {
                return Ok(quotation);
            }
        }
        bail!("no quotation matches `{reference}`")
    }

    fn history(&self, args: HistoryArgs, out: &mut dyn Write) -> anyhow::Result<()> {
        self.require_profile()?;
        let history = self.store.get_history()?;
        let rows = listing::list(&history, &args.search, args.sort);

        if rows.is_empty() {
            writeln!(out, "No quotations found.")?;
            return Ok(());
        }
        for quotation in &rows {
            writeln!(out, "{}", summary_line(quotation))?;
        }
        Ok(())
    }

    fn analytics(&self, out: &mut dyn Write) -> anyhow::Result<()> {
        self.require_profile()?;
        let report = Analytics::from_history(&self.store.get_history()?);

        writeln!(out, "Total quotations: {}", report.total_quotations)?;
        writeln!(out, "Total revenue:    {}", format_amount(report.total_revenue))?;
        writeln!(
            out,
            "Average value:    {}",
            format_amount(report.average_quotation_value)
        )?;

        writeln!(out)?;
        writeln!(out, "Top clients:")?;
        for (rank, client) in report.top_clients.iter().enumerate() {
            writeln!(
                out,
                "  {}. {:<30} {:>3} {:>14}",
                rank + 1,
                client.name,
                client.count,
                format_amount(client.total)
            )?;
        }

        writeln!(out)?;
        writeln!(out, "Recent activity:")?;
        for quotation in &report.recent_activity {
            writeln!(out, "  {}", summary_line(quotation))?;
        }
        Ok(())
    }

    fn export(&self, output: Option<&Path>, out: &mut dyn Write) -> anyhow::Result<()> {
        self.require_profile()?;
        let json = self.store.export_snapshot()?;

        match output {
            Some(path) => {
                fs::write(path, &json)
                    .with_context(|| format!("failed to write {}", path.display()))?;
                writeln!(out, "Exported ledger to {}.", path.display())?;
            }
            None => writeln!(out, "{json}")?,
        }
        Ok(())
    }

    fn import(&self, input: &Path, out: &mut dyn Write) -> anyhow::Result<()> {
        let text = fs::read_to_string(input)
            .with_context(|| format!("failed to read {}", input.display()))?;
        let summary = self.store.import_snapshot(&text)?;

        if summary.profile_restored {
            writeln!(out, "Company profile restored.")?;
        }
        if let Some(count) = summary.quotations_restored {
            writeln!(out, "{count} quotation(s) restored.")?;
        }
        if !summary.profile_restored && summary.quotations_restored.is_none() {
            writeln!(out, "Nothing to import.")?;
        }
        Ok(())
    }
}

fn calc(keys: &[String], out: &mut dyn Write) -> anyhow::Result<()> {
    let mut keypad = Keypad::new();
    let display = keypad.run(&keys.join(" "))?;
    writeln!(out, "{display}")?;
    Ok(())
}

fn apply_draft_args(draft: &mut QuotationDraft, args: DraftArgs) {
    if let Some(name) = args.client_name {
        draft.client_name = name;
    }
    if let Some(contact) = args.client_contact {
        draft.client_contact = contact;
    }
    if let Some(email) = args.client_email {
        draft.client_email = email;
    }
    for item in args.items {
        draft.fill_line(item.description, item.quantity, item.unit_price);
    }
    if let Some(tax) = args.tax_percent {
        draft.tax_percent = tax;
    }
    if let Some(discount) = args.discount_percent {
        draft.discount_percent = discount;
    }
    if args.no_terms {
        draft.terms_and_conditions = None;
    } else if let Some(terms) = args.terms {
        draft.terms_and_conditions = Some(terms);
    }
}

/// Read a logo file and turn it into a data URL.
fn load_logo(path: &Path) -> anyhow::Result<String> {
    let bytes = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let mime = sniff_logo_mime(&bytes)
        .ok_or_else(|| DomainError::validation("only JPG and PNG files are allowed"))?;
    Ok(encode_logo(&bytes, mime)?)
}

fn summary_line(quotation: &Quotation) -> String {
    format!(
        "{:<10} {}  {:<28} {:>14}",
        quotation.quotation_number,
        quotation.date.format("%Y-%m-%d"),
        quotation.client_name,
        format_amount(quotation.grand_total)
    )
}
