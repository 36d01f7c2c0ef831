use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the store, the configuration loader and the commands.
///
/// The recurrence engine and the task filter never fail; they degrade to
/// `None`/`false` instead.
#[derive(Error, Debug)]
pub enum HomeError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid date '{0}'. Use YYYY-MM-DD.")]
    InvalidDate(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("{0} can no longer be changed")]
    Locked(String),

    #[error("No household set up yet. Run `hometask init` first.")]
    NoHousehold,

    #[error("A household already exists: {0}")]
    HouseholdExists(String),
}

pub type Result<T> = std::result::Result<T, HomeError>;
