use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid structure: {0}")]
    InvalidStructure(String),

    #[error("invalid version: {0} (must be 0 for v1 or 1 for v2)")]
    InvalidVersion(i64),

    #[error("unexpected algorithm: {0}")]
    UnexpectedAlgorithm(String),

    #[error("empty DER input")]
    EmptyDer,

    #[error("trailing data after key structure")]
    TrailingData,

    #[error("pkcs1: {0}")]
    Pkcs1(#[from] crate::pkcs1::Error),

    #[error("invalid PEM: {0}")]
    Pem(#[from] pem::error::Error),

    #[error("invalid DER: {0}")]
    Der(#[from] der::error::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
