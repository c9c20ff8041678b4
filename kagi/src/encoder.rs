//! Encoding half of the conversion pattern, mirroring [`crate::decoder`].
//!
//! Where a decoder walks from wire bytes toward typed structures, an
//! encoder walks back: typed structure → DER element → raw bytes.

/// Converts `self` (of type `T`) into its encoded form `E`.
pub trait Encoder<T, E: EncodableTo<T>> {
    /// The error type returned when encoding fails.
    type Error;

    /// Encodes `self` into `E`.
    fn encode(&self) -> Result<E, Self::Error>;
}

/// Marker declaring that `E` is a valid encoding target for source type `T`.
pub trait EncodableTo<T> {}
