use thiserror::Error;

#[derive(Debug, Error)]
pub enum MrzError {
    #[error("Format error: {0}")]
    FormatError(String),
    #[error("Layout error: {0}")]
    LayoutError(String),
    #[error("Checksum error: {0}")]
    ChecksumError(String),
    #[error("Unknown document type: {0}")]
    UnknownDocumentType(String),
    #[error("Invalid field: {0}")]
    InvalidField(String),
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
