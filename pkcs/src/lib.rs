//! Detection and conversion between the RSA key encodings: PKCS#1 and
//! PKCS#8 private keys, PKCS#1 RSAPublicKey and SubjectPublicKeyInfo
//! public keys, each accepted as PEM text, raw DER, or a single-line
//! base64 ("no-format") string.

pub mod convert;
pub mod error;
pub mod format;
pub mod pkcs1;
pub mod pkcs8;

pub use convert::{format_private_key, format_public_key, pkcs1_to_pkcs8, pkcs8_to_pkcs1};
pub use error::Error;
pub use format::{KeyFormat, is_public_key, private_key_format, public_key_format};
