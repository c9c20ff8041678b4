use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid PEM: {0}")]
    Pem(#[from] pem::error::Error),
    #[error("invalid DER: {0}")]
    Der(#[from] der::error::Error),
    #[error("pkcs1: {0}")]
    Pkcs1(#[from] crate::pkcs1::Error),
    #[error("pkcs8: {0}")]
    Pkcs8(#[from] crate::pkcs8::Error),
    #[error("unrecognized key format")]
    UnrecognizedKeyFormat,
}

pub type Result<T> = std::result::Result<T, Error>;
