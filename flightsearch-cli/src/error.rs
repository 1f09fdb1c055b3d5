use flightsearch_core::{CoreError, DateError};

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("Failed to load configuration: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Invalid airport catalogue: {0}")]
    Catalogue(#[from] CoreError),

    #[error("Invalid fixed clock date: {0}")]
    ClockDate(#[from] DateError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode verdict: {0}")]
    Json(#[from] serde_json::Error),
}
