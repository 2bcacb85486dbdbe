use thiserror::Error;

/// Fatal errors. Any of these aborts the run before output is written.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Per-row geocoding failures. The driver recovers from all of them.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeocodeError {
    #[error("missing street address or zip code")]
    MissingAddressData,

    #[error("no qualifying match for {address}")]
    NoQualifyingMatch { address: String },

    #[error("transport error: {0}")]
    Transport(String),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
