//! # kagi
//!
//! Core traits for the kagi key-format toolkit.
//!
//! Every layer of the workspace converts between representations of the
//! same key material:
//!
//! ```text
//! PEM → Vec<u8> → Der → typed structure (RSAPrivateKey, PrivateKeyInfo, ...)
//! ```
//!
//! Each step down that chain is a [`decoder::Decoder`] implementation and
//! each step back up is an [`encoder::Encoder`] implementation. The marker
//! traits (`DecodableFrom`, `EncodableTo`) restrict which pairs of types a
//! conversion may connect, so an invalid conversion is a compile error
//! rather than a runtime surprise.
//!
//! All conversions are pure: they share no state, mutate nothing in place,
//! and return a fresh value or a typed error.

#![forbid(unsafe_code)]

pub mod decoder;
pub mod encoder;
