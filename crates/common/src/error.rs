use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The caller handed the engine something it cannot evaluate at all
    /// (missing quote, missing snapshot, empty history).
    #[error("Invalid analysis request: {0}")]
    InvalidRequest(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
