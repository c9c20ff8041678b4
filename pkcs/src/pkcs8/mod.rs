pub mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
    AlgorithmIdentifier, AlgorithmParameters, OID_RSA_ENCRYPTION, PrivateKeyInfo,
    SubjectPublicKeyInfo, Version,
};
