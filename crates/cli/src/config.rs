//! Runtime configuration.
//!
//! All settings come from environment variables; a `.env` file in the
//! working directory is honoured for local use.

use std::path::PathBuf;

use chrono::Duration;
use quotedesk_observability::LogFormat;
use quotedesk_store::SessionPolicy;
use quotedesk_store::backend::sqlite::default_db_path;
use quotedesk_store::session::DEFAULT_SESSION_HOURS;

pub const DATA_DIR_VAR: &str = "QUOTEDESK_DATA_DIR";
pub const REFERRAL_CODE_VAR: &str = "QUOTEDESK_REFERRAL_CODE";
pub const LOG_FORMAT_VAR: &str = "QUOTEDESK_LOG_FORMAT";
pub const SESSION_HOURS_VAR: &str = "QUOTEDESK_SESSION_HOURS";

/// Referral code accepted when none is configured.
pub const DEV_REFERRAL_CODE: &str = "quotedesk-dev";

const DB_FILE_NAME: &str = "ledger.db";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
    #[error("Could not resolve a data directory: {0}")]
    NoDataDir(String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// Directory holding the ledger database; `None` means the OS default.
    pub data_dir: Option<PathBuf>,
    pub referral_code: String,
    pub log_format: LogFormat,
    pub session_hours: i64,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// `.env` is skipped under `cfg(test)` so tests stay hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let data_dir = lookup(DATA_DIR_VAR)
            .filter(|dir| !dir.trim().is_empty())
            .map(PathBuf::from);

        let referral_code = lookup(REFERRAL_CODE_VAR)
            .filter(|code| !code.trim().is_empty())
            .unwrap_or_else(|| DEV_REFERRAL_CODE.to_string());

        let log_format = match lookup(LOG_FORMAT_VAR) {
            Some(raw) => raw
                .parse::<LogFormat>()
                .map_err(|e| ConfigError::InvalidValue(LOG_FORMAT_VAR.to_string(), e.to_string()))?,
            None => LogFormat::default(),
        };

        let session_hours = match lookup(SESSION_HOURS_VAR) {
            Some(raw) => match raw.trim().parse::<i64>() {
                Ok(hours) if hours > 0 => hours,
                _ => {
                    return Err(ConfigError::InvalidValue(
                        SESSION_HOURS_VAR.to_string(),
                        format!("'{raw}' is not a positive number of hours"),
                    ));
                }
            },
            None => DEFAULT_SESSION_HOURS,
        };

        Ok(Self {
            data_dir,
            referral_code,
            log_format,
            session_hours,
        })
    }

    /// True when registration would accept the built-in dev code.
    pub fn uses_dev_referral_code(&self) -> bool {
        self.referral_code == DEV_REFERRAL_CODE
    }

    pub fn session_policy(&self) -> SessionPolicy {
        SessionPolicy::new(Duration::hours(self.session_hours))
    }

    /// Ledger database file: `{data_dir}/ledger.db`, or the OS default.
    pub fn db_path(&self) -> Result<PathBuf, ConfigError> {
        match &self.data_dir {
            Some(dir) => Ok(dir.join(DB_FILE_NAME)),
            None => default_db_path().map_err(|e| ConfigError::NoDataDir(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.data_dir, None);
        assert!(config.uses_dev_referral_code());
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert_eq!(config.session_hours, 24);
        assert_eq!(config.session_policy(), SessionPolicy::default());
    }

    #[test]
    fn reads_every_variable() {
        let config = config_from(&[
            (DATA_DIR_VAR, "/tmp/qd"),
            (REFERRAL_CODE_VAR, "SECRET"),
            (LOG_FORMAT_VAR, "json"),
            (SESSION_HOURS_VAR, "8"),
        ])
        .unwrap();

        assert_eq!(config.db_path().unwrap(), PathBuf::from("/tmp/qd/ledger.db"));
        assert_eq!(config.referral_code, "SECRET");
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.session_policy().duration(), Duration::hours(8));
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let config = config_from(&[(DATA_DIR_VAR, " "), (REFERRAL_CODE_VAR, "")]).unwrap();
        assert_eq!(config.data_dir, None);
        assert_eq!(config.referral_code, DEV_REFERRAL_CODE);
    }

    #[test]
    fn rejects_bad_session_hours() {
        for bad in ["0", "-3", "a day"] {
            let err = config_from(&[(SESSION_HOURS_VAR, bad)]).unwrap_err();
            assert!(matches!(err, ConfigError::InvalidValue(ref var, _) if var == SESSION_HOURS_VAR));
        }
    }

    #[test]
    fn rejects_unknown_log_format() {
        let err = config_from(&[(LOG_FORMAT_VAR, "xml")]).unwrap_err();
        assert!(err.to_string().contains(LOG_FORMAT_VAR));
    }
}
