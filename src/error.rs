use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImbError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Normalizer error: {0}")]
    Normalizer(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Invalid record transition: {0}")]
    InvalidTransition(String),
}

pub type Result<T, E = ImbError> = std::result::Result<T, E>;
