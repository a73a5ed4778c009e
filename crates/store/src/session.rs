//! Session policy.
//!
//! ```text
//! NoProfile     --save_profile------> ActiveSession
//! ActiveSession --refresh_session---> ActiveSession
//! ActiveSession --clear_session-----> NoProfile
//! ActiveSession --duration elapsed--> ExpiredSession
//! ExpiredSession --get_profile------> NoProfile   (store cleared)
//! ```
//!
//! Expiry is evaluated lazily on the next profile read; there is no timer.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_SESSION_HOURS: i64 = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    NoProfile,
    ActiveSession,
    ExpiredSession,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionPolicy {
    duration: Duration,
}

impl Default for SessionPolicy {
    fn default() -> Self {
        Self::new(Duration::hours(DEFAULT_SESSION_HOURS))
    }
}

impl SessionPolicy {
    pub fn new(duration: Duration) -> Self {
        Self { duration }
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Strictly longer than the session duration.
    pub fn is_expired(&self, started: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(started) > self.duration
    }

    /// Classify the persisted session.
    ///
    /// A profile without a timestamp counts as active.
    pub fn evaluate(
        &self,
        has_profile: bool,
        timestamp: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> SessionState {
        if !has_profile {
            return SessionState::NoProfile;
        }
        match timestamp {
            Some(started) if self.is_expired(started, now) => SessionState::ExpiredSession,
            _ => SessionState::ActiveSession,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap()
    }

    #[test]
    fn default_is_one_day() {
        assert_eq!(SessionPolicy::default().duration(), Duration::hours(24));
    }

    #[test]
    fn expiry_is_strictly_after_duration() {
        let policy = SessionPolicy::default();
        assert!(!policy.is_expired(t0(), t0() + Duration::hours(24)));
        assert!(policy.is_expired(t0(), t0() + Duration::hours(24) + Duration::milliseconds(1)));
    }

    #[test]
    fn evaluate_covers_all_states() {
        let policy = SessionPolicy::new(Duration::hours(1));
        let later = t0() + Duration::hours(2);
        assert_eq!(policy.evaluate(false, Some(t0()), later), SessionState::NoProfile);
        assert_eq!(policy.evaluate(true, Some(t0()), t0()), SessionState::ActiveSession);
        assert_eq!(policy.evaluate(true, Some(t0()), later), SessionState::ExpiredSession);
        assert_eq!(policy.evaluate(true, None, later), SessionState::ActiveSession);
    }
}
