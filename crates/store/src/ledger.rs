//! The ledger store: single source of truth for the company profile and
//! quotation history.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;

use quotedesk_core::{QuotationId, entity};
use quotedesk_quotations::{CompanyProfile, Quotation};

use crate::backend::KeyValueBackend;
use crate::clock::{Clock, SystemClock};
use crate::error::{ImportError, StoreError, StoreResult};
use crate::session::{SessionPolicy, SessionState};
use crate::snapshot::{ImportSummary, Snapshot};

/// Fixed record keys. Each record holds JSON text.
pub mod keys {
    pub const COMPANY_PROFILE: &str = "companyProfile";
    pub const QUOTATION_HISTORY: &str = "quotationHistory";
    pub const LAST_QUOTATION_NUMBER: &str = "lastQuotationNumber";
    /// Epoch milliseconds of the last profile save or refresh.
    pub const SESSION_TIMESTAMP: &str = "sessionTimestamp";
}

/// Last-used number before anything has been issued.
pub const FIRST_QUOTATION_BASE: u64 = 1000;
pub const QUOTATION_NUMBER_PREFIX: &str = "QT-";

/// Ledger of one company on one device.
///
/// All operations take `&self`; mutation goes through the backend, which
/// provides its own interior locking. Writes are last-write-wins.
#[derive(Debug)]
pub struct LedgerStore<B, C = SystemClock> {
    backend: B,
    clock: C,
    policy: SessionPolicy,
}

impl<B: KeyValueBackend> LedgerStore<B, SystemClock> {
    pub fn new(backend: B) -> Self {
        Self::with_clock(backend, SystemClock)
    }
}

impl<B: KeyValueBackend, C: Clock> LedgerStore<B, C> {
    pub fn with_clock(backend: B, clock: C) -> Self {
        Self {
            backend,
            clock,
            policy: SessionPolicy::default(),
        }
    }

    pub fn with_session_policy(mut self, policy: SessionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn session_policy(&self) -> SessionPolicy {
        self.policy
    }

    // ---------------------------------------------------------------------
    // Profile and session
    // ---------------------------------------------------------------------

    /// Replace the profile and start a fresh session. No validation here.
    pub fn save_profile(&self, profile: &CompanyProfile) -> StoreResult<()> {
        self.write_json(keys::COMPANY_PROFILE, profile)?;
        self.touch_session()?;
        tracing::info!(company = %profile.company_name, "company profile saved");
        Ok(())
    }

    /// Current profile, or `None` when there is none or its session expired.
    ///
    /// Runs [`Self::check_and_evict_if_expired`] first, so reading an expired
    /// profile clears it from the store.
    pub fn get_profile(&self) -> StoreResult<Option<CompanyProfile>> {
        match self.check_and_evict_if_expired()? {
            SessionState::ActiveSession => self.read_json(keys::COMPANY_PROFILE),
            SessionState::NoProfile | SessionState::ExpiredSession => Ok(None),
        }
    }

    /// Observe the session without changing anything.
    pub fn session_state(&self) -> StoreResult<SessionState> {
        let has_profile = self.backend.get(keys::COMPANY_PROFILE)?.is_some();
        if !has_profile {
            return Ok(SessionState::NoProfile);
        }
        let timestamp = match self.read_session_timestamp() {
            Ok(timestamp) => timestamp,
            // An unreadable timestamp cannot prove the session is still live.
            Err(StoreError::Corrupt { .. }) => return Ok(SessionState::ExpiredSession),
            Err(err) => return Err(err),
        };
        Ok(self.policy.evaluate(true, timestamp, self.clock.now()))
    }

    /// Lazy expiry step shared by every profile read.
    ///
    /// Returns the state that was observed. `ExpiredSession` means the
    /// profile and session timestamp were removed by this call; the store is
    /// in `NoProfile` afterwards.
    pub fn check_and_evict_if_expired(&self) -> StoreResult<SessionState> {
        let state = self.session_state()?;
        if state == SessionState::ExpiredSession {
            tracing::warn!("session expired; clearing company profile");
            self.clear_session()?;
        }
        Ok(state)
    }

    /// Extend the session if a profile exists. Returns whether it did.
    pub fn refresh_session(&self) -> StoreResult<bool> {
        if self.backend.get(keys::COMPANY_PROFILE)?.is_none() {
            return Ok(false);
        }
        self.touch_session()?;
        tracing::debug!("session refreshed");
        Ok(true)
    }

    /// Remove the profile and session timestamp unconditionally.
    pub fn clear_session(&self) -> StoreResult<()> {
        self.backend.remove(keys::COMPANY_PROFILE)?;
        self.backend.remove(keys::SESSION_TIMESTAMP)?;
        tracing::info!("session cleared");
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Quotation history
    // ---------------------------------------------------------------------

    /// Put `quotation` at the front of history.
    ///
    /// The whole history record is rewritten in one backend write.
    pub fn save_quotation(&self, quotation: &Quotation) -> StoreResult<()> {
        let mut history = self.get_history()?;
        history.insert(0, quotation.clone());
        self.write_history(&history)?;
        tracing::info!(
            quotation_id = %quotation.id,
            number = %quotation.quotation_number,
            "quotation saved"
        );
        Ok(())
    }

    /// History in stored order (newest insert first). No sorting.
    pub fn get_history(&self) -> StoreResult<Vec<Quotation>> {
        Ok(self
            .read_json(keys::QUOTATION_HISTORY)?
            .unwrap_or_default())
    }

    pub fn get_quotation(&self, id: &QuotationId) -> StoreResult<Option<Quotation>> {
        let history = self.get_history()?;
        Ok(entity::position_of(&history, id).map(|index| history[index].clone()))
    }

    /// Look up by display number, ignoring case.
    pub fn find_by_number(&self, number: &str) -> StoreResult<Option<Quotation>> {
        Ok(self
            .get_history()?
            .into_iter()
            .find(|q| q.quotation_number.eq_ignore_ascii_case(number.trim())))
    }

    /// Remove the quotation with `id`. Returns whether one was removed; an
    /// unknown id leaves history untouched.
    pub fn delete_quotation(&self, id: &QuotationId) -> StoreResult<bool> {
        let mut history = self.get_history()?;
        let Some(index) = entity::position_of(&history, id) else {
            tracing::debug!(quotation_id = %id, "delete: no such quotation");
            return Ok(false);
        };
        history.remove(index);
        self.write_history(&history)?;
        tracing::info!(quotation_id = %id, "quotation deleted");
        Ok(true)
    }

    /// Replace the stored quotation with the same id, keeping its position.
    /// Returns whether one was replaced.
    pub fn update_quotation(&self, quotation: &Quotation) -> StoreResult<bool> {
        let mut history = self.get_history()?;
        let Some(index) = entity::position_of(&history, &quotation.id) else {
            tracing::debug!(quotation_id = %quotation.id, "update: no such quotation");
            return Ok(false);
        };
        history[index] = quotation.clone();
        self.write_history(&history)?;
        tracing::info!(quotation_id = %quotation.id, "quotation updated");
        Ok(true)
    }

    /// Allocate the next display number (`QT-1001`, `QT-1002`, ...).
    ///
    /// The counter is persisted before returning, so a number is never handed
    /// out twice. A number that is allocated but never saved leaves a gap.
    pub fn next_quotation_number(&self) -> StoreResult<String> {
        let last: u64 = self
            .read_json(keys::LAST_QUOTATION_NUMBER)?
            .unwrap_or(FIRST_QUOTATION_BASE);
        let next = last.checked_add(1).ok_or(StoreError::SequenceExhausted)?;
        self.write_json(keys::LAST_QUOTATION_NUMBER, &next)?;
        tracing::debug!(next, "quotation number allocated");
        Ok(format!("{QUOTATION_NUMBER_PREFIX}{next}"))
    }

    // ---------------------------------------------------------------------
    // Backup
    // ---------------------------------------------------------------------

    /// Pretty-printed JSON of profile and history.
    ///
    /// The profile goes through [`Self::get_profile`], so an expired session
    /// exports `null` (and is evicted).
    pub fn export_snapshot(&self) -> StoreResult<String> {
        let snapshot = Snapshot {
            company_profile: self.get_profile()?,
            quotation_history: Some(self.get_history()?),
        };
        snapshot.to_pretty_json().map_err(|source| StoreError::Encode {
            key: "snapshot",
            source,
        })
    }

    /// Restore from an exported document.
    ///
    /// The whole document is parsed and checked before anything is written;
    /// on any parse or shape failure the ledger is left exactly as it was.
    /// Sections absent from the document are not touched.
    ///
    /// Both records are encoded up front. History is written before the
    /// profile, so a backend failure part-way never leaves a restored profile
    /// next to the old history.
    pub fn import_snapshot(&self, text: &str) -> Result<ImportSummary, ImportError> {
        let snapshot = match Snapshot::parse(text) {
            Ok(snapshot) => snapshot,
            Err(err) => {
                tracing::warn!(error = %err, "import rejected");
                return Err(err);
            }
        };

        let history_json = snapshot
            .quotation_history
            .as_ref()
            .map(|history| encode(keys::QUOTATION_HISTORY, history))
            .transpose()?;
        let profile_json = snapshot
            .company_profile
            .as_ref()
            .map(|profile| encode(keys::COMPANY_PROFILE, profile))
            .transpose()?;

        let mut summary = ImportSummary::default();
        if let (Some(history), Some(json)) = (&snapshot.quotation_history, history_json) {
            self.backend.set(keys::QUOTATION_HISTORY, &json)?;
            summary.quotations_restored = Some(history.len());
        }
        if let Some(json) = profile_json {
            self.backend.set(keys::COMPANY_PROFILE, &json)?;
            self.touch_session()?;
            summary.profile_restored = true;
        }

        tracing::info!(
            profile_restored = summary.profile_restored,
            quotations_restored = ?summary.quotations_restored,
            "ledger imported"
        );
        Ok(summary)
    }

    // ---------------------------------------------------------------------
    // Record helpers
    // ---------------------------------------------------------------------

    fn read_json<T: DeserializeOwned>(&self, key: &'static str) -> StoreResult<Option<T>> {
        match self.backend.get(key)? {
            Some(text) => serde_json::from_str(&text)
                .map(Some)
                .map_err(|source| StoreError::Corrupt { key, source }),
            None => Ok(None),
        }
    }

    fn write_json<T: Serialize + ?Sized>(&self, key: &'static str, value: &T) -> StoreResult<()> {
        let text = encode(key, value)?;
        self.backend.set(key, &text)
    }

    fn write_history(&self, history: &[Quotation]) -> StoreResult<()> {
        self.write_json(keys::QUOTATION_HISTORY, history)
    }

    fn touch_session(&self) -> StoreResult<()> {
        let now = self.clock.now().timestamp_millis();
        self.write_json(keys::SESSION_TIMESTAMP, &now)
    }

    fn read_session_timestamp(&self) -> StoreResult<Option<DateTime<Utc>>> {
        let Some(millis) = self.read_json::<i64>(keys::SESSION_TIMESTAMP)? else {
            return Ok(None);
        };
        Ok(DateTime::from_timestamp_millis(millis))
    }
}

fn encode<T: Serialize + ?Sized>(key: &'static str, value: &T) -> StoreResult<String> {
    serde_json::to_string(value).map_err(|source| StoreError::Encode { key, source })
}
