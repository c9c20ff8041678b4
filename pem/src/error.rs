use base64::DecodeError;
use thiserror::Error;

/// Errors raised while framing, unframing, or normalizing PEM data.
///
/// Framing follows RFC 7468: matching boundary markers, a non-empty
/// base64 body, and one of the labels this toolkit recognizes.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// No `-----BEGIN <label>-----` line was found
    #[error("missing a pre encapsulation boundary")]
    MissingPreEncapsulationBoundary,

    /// The body started but no `-----END <label>-----` line followed
    #[error("missing a post encapsulation boundary")]
    MissingPostEncapsulationBoundary,

    /// Nothing between the BEGIN and END lines
    #[error("missing PEM data")]
    MissingData,

    /// The boundary label is not one this toolkit recognizes
    #[error("invalid label")]
    InvalidLabel,

    /// BEGIN and END carry different labels
    #[error("label doesn't match")]
    LabelMismatch,

    /// A boundary line that is neither BEGIN nor END
    #[error("invalid encapsulation boundary")]
    InvalidEncapsulationBoundary,

    /// A blank or otherwise unusable line inside the base64 body
    #[error("invalid base64 line")]
    InvalidBase64Line,

    /// The body (or a no-format string) is not valid base64
    #[error("base64 decode: {0}")]
    Base64Decode(DecodeError),

    /// Input that must be text (PEM or no-format) is not UTF-8
    #[error("input is not valid UTF-8 text")]
    NotText,

    /// A no-format string with whitespace in the middle of the data
    #[error("embedded whitespace in no-format input")]
    EmbeddedWhitespace,
}
