use std::path::PathBuf;
use thiserror::Error;

/// A raw token that a scalar codec could not turn into its typed value.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("invalid {kind} value {raw:?}: {reason}")]
pub struct ParseError {
    pub kind: &'static str,
    pub raw: String,
    pub reason: String,
}

impl ParseError {
    pub fn new(kind: &'static str, raw: &str, reason: impl Into<String>) -> Self {
        Self {
            kind,
            raw: raw.to_string(),
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum FlagfigError {
    #[error("Config file not found: {path}")]
    FileNotFound {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Malformed config file {path}: {reason}")]
    MalformedConfig { path: PathBuf, reason: String },

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config value {value:?} for flag '{flag}': {source}")]
    InvalidValue {
        flag: String,
        value: String,
        source: ParseError,
    },

    #[error("Invalid argument {value:?} for flag '--{flag}': {source}")]
    InvalidArgument {
        flag: String,
        value: String,
        source: ParseError,
    },

    #[error(transparent)]
    Args(#[from] clap::Error),

    #[error("Invalid flag name {name:?}: {reason}")]
    InvalidFlagName { name: String, reason: &'static str },

    #[error("Flag '{0}' is already registered")]
    DuplicateFlag(String),
}
