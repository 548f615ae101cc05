//! Error types for table construction, simulation runs and report I/O.

use thiserror::Error;

/// Every error the engine and its collaborators can surface.
///
/// All variants are fatal to the current run; nothing is retried internally.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid probability table: {0}")]
    InvalidTable(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(
        "Trial {trial} reached the maximum of {maximum_draws} draws without a success; \
         the probability table never reaches 1.0"
    )]
    DrawLimitExceeded { trial: u64, maximum_draws: u32 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
