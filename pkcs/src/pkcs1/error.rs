use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("expected SEQUENCE for {0}")]
    ExpectedSequence(&'static str),

    #[error("expected {expected} elements, got {actual}")]
    InvalidElementCount {
        expected: &'static str,
        actual: usize,
    },

    #[error("expected INTEGER for {field}")]
    ExpectedInteger { field: &'static str },

    #[error("invalid version: {0} (must be 0 for two-prime or 1 for multi-prime)")]
    InvalidVersion(i64),

    #[error("version out of range for i64")]
    VersionOutOfRange,

    #[error("empty DER input")]
    EmptyDer,

    #[error("trailing data after key structure")]
    TrailingData,

    #[error("invalid PEM: {0}")]
    Pem(#[from] pem::error::Error),

    #[error("invalid DER: {0}")]
    Der(#[from] der::error::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
