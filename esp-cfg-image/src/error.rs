use thiserror::Error;

/// Errors that can occur during CSV parsing, image generation, or image
/// parsing.
#[derive(Error, Debug)]
pub enum Error {
    #[error("failed to parse CSV: {0}")]
    CsvError(#[from] csv::Error),

    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("unknown field: {0}")]
    UnknownField(String),

    #[error("duplicate field: {0}")]
    DuplicateField(String),

    #[error("invalid value: {0}")]
    InvalidValue(String),

    #[error("store error: {0}")]
    StoreError(#[from] esp_cfg_store::error::Error),

    #[error("invalid image size {0}: must be {1} bytes")]
    InvalidImageSize(usize, usize),

    #[error("no valid record in image")]
    NoValidRecord,
}
