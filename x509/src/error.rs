use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("certificate is not text")]
    NotText,

    #[error("unexpected label: {0}")]
    UnexpectedLabel(pem::Label),

    #[error("invalid structure: {0}")]
    InvalidStructure(String),

    #[error("invalid version: {0} (must be 0, 1 or 2)")]
    InvalidVersion(i64),

    #[error("invalid PEM: {0}")]
    Pem(#[from] pem::error::Error),

    #[error("invalid DER: {0}")]
    Der(#[from] der::error::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
