//! Reads X.509 certificates far enough to expose the fields this toolkit
//! cares about, the serial number first among them. Everything else in the
//! certificate is parsed structurally but not interpreted.

use std::str::FromStr;

use der::{BitString, Der, Element};
use kagi::decoder::{DecodableFrom, Decoder};
use pem::{Label, Pem};

pub mod error;
mod serial_number;

use error::{Error, Result};
pub use serial_number::CertificateSerialNumber;

/*
RFC 5280 Section 4.1

Certificate ::= SEQUENCE {
    tbsCertificate       TBSCertificate,
    signatureAlgorithm   AlgorithmIdentifier,
    signatureValue       BIT STRING
}
*/

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Certificate {
    tbs_certificate: TBSCertificate,
    signature_algorithm: Element,
    signature_value: BitString,
}

impl Certificate {
    /// Parses a PEM-framed certificate.
    pub fn from_pem(input: &[u8]) -> Result<Certificate> {
        let text = std::str::from_utf8(input).map_err(|_| Error::NotText)?;
        let pem = Pem::from_str(text)?;
        if pem.label() != Label::Certificate {
            return Err(Error::UnexpectedLabel(pem.label()));
        }
        let der: Der = pem.decode()?;
        match der.elements() {
            [element] => element.decode(),
            [] => Err(Error::InvalidStructure("empty certificate".to_string())),
            _ => Err(Error::InvalidStructure(
                "trailing data after certificate".to_string(),
            )),
        }
    }

    pub fn tbs_certificate(&self) -> &TBSCertificate {
        &self.tbs_certificate
    }

    pub fn serial_number(&self) -> &CertificateSerialNumber {
        &self.tbs_certificate.serial_number
    }

    pub fn signature_algorithm(&self) -> &Element {
        &self.signature_algorithm
    }

    pub fn signature_value(&self) -> &BitString {
        &self.signature_value
    }
}

impl DecodableFrom<Element> for Certificate {}

impl Decoder<Element, Certificate> for Element {
    type Error = Error;

    fn decode(&self) -> Result<Certificate> {
        let Element::Sequence(elements) = self else {
            return Err(Error::InvalidStructure(
                "Certificate must be a SEQUENCE".to_string(),
            ));
        };
        if elements.len() != 3 {
            return Err(Error::InvalidStructure(format!(
                "Certificate must have 3 elements, got {}",
                elements.len()
            )));
        }

        let tbs_certificate: TBSCertificate = elements[0].decode()?;

        if elements[1].as_sequence().is_none() {
            return Err(Error::InvalidStructure(
                "signatureAlgorithm must be a SEQUENCE".to_string(),
            ));
        }

        let signature_value = elements[2]
            .as_bit_string()
            .cloned()
            .ok_or_else(|| Error::InvalidStructure("signatureValue must be a BIT STRING".to_string()))?;

        Ok(Certificate {
            tbs_certificate,
            signature_algorithm: elements[1].clone(),
            signature_value,
        })
    }
}

/*
TBSCertificate ::= SEQUENCE {
     version         [0]  EXPLICIT Version DEFAULT v1,
     serialNumber         CertificateSerialNumber,
     signature            AlgorithmIdentifier,
     issuer               Name,
     validity             Validity,
     subject              Name,
     subjectPublicKeyInfo SubjectPublicKeyInfo,
     issuerUniqueID  [1]  IMPLICIT UniqueIdentifier OPTIONAL,
     subjectUniqueID [2]  IMPLICIT UniqueIdentifier OPTIONAL,
     extensions      [3]  EXPLICIT Extensions OPTIONAL
}
*/

/// The to-be-signed portion of a certificate. Only the leading fields are
/// interpreted; the rest are validated to be present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TBSCertificate {
    version: Version,
    serial_number: CertificateSerialNumber,
}

impl TBSCertificate {
    pub fn version(&self) -> Version {
        self.version
    }

    pub fn serial_number(&self) -> &CertificateSerialNumber {
        &self.serial_number
    }
}

impl DecodableFrom<Element> for TBSCertificate {}

impl Decoder<Element, TBSCertificate> for Element {
    type Error = Error;

    fn decode(&self) -> Result<TBSCertificate> {
        let Element::Sequence(elements) = self else {
            return Err(Error::InvalidStructure(
                "TBSCertificate must be a SEQUENCE".to_string(),
            ));
        };

        // [0] version is optional; v1 certificates omit it.
        let (version, offset) = match elements.first() {
            Some(Element::ContextSpecific {
                slot: 0,
                constructed: true,
                element,
            }) => {
                let version: Version = element.as_ref().decode()?;
                (version, 1)
            }
            _ => (Version::V1, 0),
        };

        // serialNumber through subjectPublicKeyInfo must all be present.
        if elements.len() < offset + 6 {
            return Err(Error::InvalidStructure(format!(
                "TBSCertificate must have at least {} elements, got {}",
                offset + 6,
                elements.len()
            )));
        }

        let serial_number: CertificateSerialNumber = elements[offset].decode()?;

        if elements[offset + 1].as_sequence().is_none() {
            return Err(Error::InvalidStructure(
                "signature must be a SEQUENCE".to_string(),
            ));
        }

        Ok(TBSCertificate {
            version,
            serial_number,
        })
    }
}

/// Certificate version, RFC 5280 Section 4.1.2.1
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Version {
    V1 = 0,
    V2 = 1,
    V3 = 2,
}

impl DecodableFrom<Element> for Version {}

impl Decoder<Element, Version> for Element {
    type Error = Error;

    fn decode(&self) -> Result<Version> {
        let Element::Integer(int) = self else {
            return Err(Error::InvalidStructure(
                "version must be an INTEGER".to_string(),
            ));
        };
        let value = int.to_i64().ok_or(Error::InvalidVersion(-1))?;
        match value {
            0 => Ok(Version::V1),
            1 => Ok(Version::V2),
            2 => Ok(Version::V3),
            _ => Err(Error::InvalidVersion(value)),
        }
    }
}
