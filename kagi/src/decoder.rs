//! Decoding half of the conversion pattern.
//!
//! A source type implements `Decoder<Self, D>` for every destination type
//! `D` it can be turned into, and `D` declares the pairing by implementing
//! the `DecodableFrom<Self>` marker. Implementations live next to the
//! destination type, which keeps the orphan rules happy: the destination
//! is always local to the implementing crate.
//!
//! ```no_run
//! use kagi::decoder::{DecodableFrom, Decoder};
//!
//! struct Hex(String);
//!
//! #[derive(Debug)]
//! struct ParseError;
//!
//! impl DecodableFrom<Vec<u8>> for Hex {}
//!
//! impl Decoder<Vec<u8>, Hex> for Vec<u8> {
//!     type Error = ParseError;
//!
//!     fn decode(&self) -> Result<Hex, Self::Error> {
//!         Ok(Hex(self.iter().map(|b| format!("{:02x}", b)).collect()))
//!     }
//! }
//! ```

/// Converts `self` (of type `T`) into a value of type `D`.
pub trait Decoder<T, D: DecodableFrom<T>> {
    /// The error type returned when decoding fails.
    type Error;

    /// Decodes `self` into `D`, never consuming or mutating the source.
    fn decode(&self) -> Result<D, Self::Error>;
}

/// Marker declaring that `D` is a valid decoding target for source type `T`.
///
/// Has no methods; it exists only so the compiler rejects conversions no
/// crate has declared.
pub trait DecodableFrom<T> {}
