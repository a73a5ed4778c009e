//! `quotedesk` command-line front end.
//!
//! Argument parsing, configuration and command dispatch live here so they
//! can be tested without spawning the binary.

pub mod cli;
pub mod commands;
pub mod config;

pub use cli::Cli;
pub use commands::App;
pub use config::{Config, ConfigError};
