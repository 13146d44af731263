// src/error.rs
//! Error type shared by the claim service components.
//!
//! Invalid wallet input and a verification that never completes are not
//! errors; they leave the page state untouched. Everything here is an
//! operational failure of the service itself.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClaimError {
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("invalid configuration value for `{key}`: {reason}")]
    InvalidSetting { key: &'static str, reason: String },

    #[error("verification widget failed: {0}")]
    Widget(String),

    #[error("challenge encoding failed: {0}")]
    Encoding(#[from] serde_json::Error),

    #[error("page loop is no longer running")]
    PageClosed,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ClaimError>;
