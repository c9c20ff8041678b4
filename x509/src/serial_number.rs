//! Certificate Serial Number
//!
//! RFC 5280 Section 4.1.2.2
//!
//! ```asn1
//! CertificateSerialNumber ::= INTEGER
//! ```

use std::fmt::Display;

use der::{Element, Integer};
use kagi::decoder::{DecodableFrom, Decoder};

use crate::error::{Error, Result};

/// An INTEGER that uniquely identifies a certificate issued by a given CA.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct CertificateSerialNumber {
    inner: Integer,
}

impl CertificateSerialNumber {
    /// Uppercase hex of the absolute value, two digits per byte with no
    /// separators, matching what `openssl x509 -serial` prints.
    pub fn format_hex(&self) -> String {
        self.inner
            .magnitude_bytes()
            .iter()
            .map(|b| format!("{:02X}", b))
            .collect()
    }
}

impl From<Integer> for CertificateSerialNumber {
    fn from(inner: Integer) -> Self {
        CertificateSerialNumber { inner }
    }
}

impl AsRef<Integer> for CertificateSerialNumber {
    fn as_ref(&self) -> &Integer {
        &self.inner
    }
}

impl Display for CertificateSerialNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.format_hex())
    }
}

impl DecodableFrom<Element> for CertificateSerialNumber {}

impl Decoder<Element, CertificateSerialNumber> for Element {
    type Error = Error;

    fn decode(&self) -> Result<CertificateSerialNumber> {
        match self {
            Element::Integer(i) => Ok(CertificateSerialNumber { inner: i.clone() }),
            _ => Err(Error::InvalidStructure(
                "serialNumber must be an INTEGER".to_string(),
            )),
        }
    }
}
