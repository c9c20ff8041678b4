//! Value types backing the primitive ASN.1 elements.

use std::{fmt::Display, str::FromStr};

use num_bigint::BigInt;
use num_traits::ToPrimitive;

use crate::error::Error;

// ASN.1 INTEGER is a signed value of arbitrary size, encoded as
// two's-complement big-endian bytes.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Integer {
    inner: BigInt,
}

impl Integer {
    /// Returns a reference to the inner BigInt
    pub fn as_bigint(&self) -> &BigInt {
        &self.inner
    }

    /// Converts the Integer to i64 if it fits in the range
    pub fn to_i64(&self) -> Option<i64> {
        self.inner.to_i64()
    }

    /// Converts the Integer to u64 if it fits in the range
    pub fn to_u64(&self) -> Option<u64> {
        self.inner.to_u64()
    }

    /// The big-endian bytes of the absolute value, without a sign octet.
    /// Zero yields a single `0x00` byte.
    pub fn magnitude_bytes(&self) -> Vec<u8> {
        self.inner.to_bytes_be().1
    }

    /// The two's-complement big-endian encoding, as it appears in DER.
    pub fn to_signed_bytes_be(&self) -> Vec<u8> {
        self.inner.to_signed_bytes_be()
    }
}

impl From<&[u8]> for Integer {
    fn from(value: &[u8]) -> Self {
        Integer {
            inner: BigInt::from_signed_bytes_be(value),
        }
    }
}

impl From<Vec<u8>> for Integer {
    fn from(value: Vec<u8>) -> Self {
        Integer {
            inner: BigInt::from_signed_bytes_be(&value),
        }
    }
}

impl From<i64> for Integer {
    fn from(value: i64) -> Self {
        Integer {
            inner: BigInt::from(value),
        }
    }
}

impl Display for Integer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectIdentifier {
    inner: Vec<u64>,
}

impl TryFrom<&[u8]> for ObjectIdentifier {
    type Error = Error;

    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        if value.is_empty() {
            return Err(Error::InvalidObjectIdentifier("empty encoding".to_string()));
        }
        if value[value.len() - 1] & 0x80 != 0 {
            // Continuation bit set on the last byte.
            return Err(Error::InvalidObjectIdentifier(
                "incomplete encoding".to_string(),
            ));
        }

        let mut values = Vec::new();
        let first = value[0] as u64;
        values.push(first / 40);
        values.push(first % 40);

        let mut val = 0u64;
        for v in value[1..].iter() {
            val = (val << 7) | (*v as u64 & 0x7f);
            if *v & 0x80 == 0 {
                values.push(val);
                val = 0;
            }
        }

        Ok(ObjectIdentifier { inner: values })
    }
}

impl TryFrom<&ObjectIdentifier> for Vec<u8> {
    type Error = Error;

    fn try_from(oid: &ObjectIdentifier) -> Result<Self, Self::Error> {
        if oid.inner.len() < 2 {
            return Err(Error::InvalidObjectIdentifier(format!(
                "invalid length: {}",
                oid
            )));
        }

        let mut result = Vec::new();
        // The first two components share one byte.
        let first = (oid.inner[0] * 40 + oid.inner[1]) as u8;
        result.push(first);

        for v in oid.inner[2..].iter() {
            if *v == 0 {
                result.push(0x00);
                continue;
            }
            let mut encoded = Vec::new();
            let mut value = *v;
            while value > 0 {
                encoded.push(value as u8 & 0x7f);
                value >>= 7;
            }
            while let Some(b) = encoded.pop() {
                // Every byte but the last carries the continuation bit.
                if !encoded.is_empty() {
                    result.push(b | 0x80);
                } else {
                    result.push(b);
                }
            }
        }

        Ok(result)
    }
}

impl From<&[u64]> for ObjectIdentifier {
    fn from(value: &[u64]) -> Self {
        ObjectIdentifier {
            inner: value.to_vec(),
        }
    }
}

impl FromStr for ObjectIdentifier {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let values = s
            .split('.')
            .map(|s| s.parse::<u64>().map_err(Error::ParseInt))
            .collect::<Result<Vec<u64>, Error>>()?;
        Ok(ObjectIdentifier { inner: values })
    }
}

impl Display for ObjectIdentifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self.inner.first() {
            Some(n) => self.inner[1..]
                .iter()
                .fold(n.to_string(), |s, n| s + "." + &n.to_string()),
            None => String::new(),
        };
        write!(f, "{}", s)
    }
}

impl PartialEq<&str> for ObjectIdentifier {
    fn eq(&self, other: &&str) -> bool {
        self.inner
            .iter()
            .map(|n| n.to_string())
            .collect::<Vec<_>>()
            .join(".")
            == *other
    }
}

impl PartialEq<ObjectIdentifier> for &str {
    fn eq(&self, other: &ObjectIdentifier) -> bool {
        other == self
    }
}

// The leading content byte of a BIT STRING counts the unused bits in the
// final byte. Keys always use zero, but the split is preserved anyway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitString {
    unused: u8,
    data: Vec<u8>,
}

impl BitString {
    pub fn new(unused: u8, data: Vec<u8>) -> Self {
        BitString { unused, data }
    }

    /// Returns the number of unused bits in the last byte
    pub fn unused_bits(&self) -> u8 {
        self.unused
    }

    /// Returns a reference to the underlying byte data
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Consumes the BitString and returns the underlying byte data
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }
}

impl TryFrom<&[u8]> for BitString {
    type Error = Error;

    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        match value.first() {
            Some(&b) if b <= 7 => Ok(BitString {
                unused: b,
                data: value[1..].to_vec(),
            }),
            Some(&b) => Err(Error::InvalidBitString(format!(
                "unused bits {} out of range",
                b
            ))),
            None => Err(Error::InvalidBitString("empty encoding".to_string())),
        }
    }
}

impl AsRef<[u8]> for BitString {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OctetString {
    inner: Vec<u8>,
}

impl OctetString {
    /// Returns the inner bytes as a slice
    pub fn as_bytes(&self) -> &[u8] {
        &self.inner
    }

    /// Consumes self and returns the inner bytes
    pub fn into_bytes(self) -> Vec<u8> {
        self.inner
    }
}

impl From<Vec<u8>> for OctetString {
    fn from(value: Vec<u8>) -> Self {
        OctetString { inner: value }
    }
}

impl From<&[u8]> for OctetString {
    fn from(value: &[u8]) -> Self {
        OctetString {
            inner: value.to_vec(),
        }
    }
}

impl AsRef<[u8]> for OctetString {
    fn as_ref(&self) -> &[u8] {
        &self.inner
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest(input, expected,
        case(vec![0x00], 0),
        case(vec![0x05], 5),
        case(vec![0x01, 0x00], 256),
        case(vec![0xff], -1),
        case(vec![0x00, 0xff], 255),
    )]
    fn test_integer_from_signed_bytes(input: Vec<u8>, expected: i64) {
        let integer = Integer::from(input);
        assert_eq!(Some(expected), integer.to_i64());
    }

    #[rstest(value, expected,
        case(0, vec![0x00]),
        case(127, vec![0x7f]),
        case(128, vec![0x00, 0x80]),
        case(256, vec![0x01, 0x00]),
    )]
    fn test_integer_to_signed_bytes(value: i64, expected: Vec<u8>) {
        assert_eq!(expected, Integer::from(value).to_signed_bytes_be());
    }

    #[rstest(value, expected,
        case(0, vec![0x00]),
        case(255, vec![0xff]),
        case(0x0ab3, vec![0x0a, 0xb3]),
    )]
    fn test_integer_magnitude_bytes(value: i64, expected: Vec<u8>) {
        assert_eq!(expected, Integer::from(value).magnitude_bytes());
    }

    #[rstest(input, expected,
        // rsaEncryption
        case(vec![0x2a, 0x86, 0x48, 0x86, 0xf7, 0x0d, 0x01, 0x01, 0x01], "1.2.840.113549.1.1.1"),
        // id-ce-basicConstraints
        case(vec![0x55, 0x1d, 0x13], "2.5.29.19"),
        // id-ecPublicKey (contains a multi-byte arc)
        case(vec![0x2a, 0x86, 0x48, 0xce, 0x3d, 0x02, 0x01], "1.2.840.10045.2.1"),
    )]
    fn test_oid_decode(input: Vec<u8>, expected: &str) {
        let oid = ObjectIdentifier::try_from(input.as_slice()).unwrap();
        assert_eq!(oid, expected);
    }

    #[rstest(input,
        case("1.2.840.113549.1.1.1"),
        case("2.5.29.19"),
        case("1.2.840.10045.2.1"),
        // an arc equal to zero must still emit a byte
        case("1.2.840.113549.1.0.1"),
    )]
    fn test_oid_roundtrip(input: &str) {
        let oid: ObjectIdentifier = input.parse().unwrap();
        let encoded = Vec::try_from(&oid).unwrap();
        let decoded = ObjectIdentifier::try_from(encoded.as_slice()).unwrap();
        assert_eq!(oid, decoded);
        assert_eq!(input, decoded.to_string());
    }

    #[test]
    fn test_oid_incomplete_encoding() {
        let err = ObjectIdentifier::try_from([0x2au8, 0x86].as_slice()).unwrap_err();
        assert!(matches!(err, Error::InvalidObjectIdentifier(_)));
    }

    #[rstest(input, expected_unused, expected_data,
        case(vec![0x00, 0xab, 0xcd], 0, vec![0xab, 0xcd]),
        case(vec![0x03, 0xa8], 3, vec![0xa8]),
    )]
    fn test_bit_string(input: Vec<u8>, expected_unused: u8, expected_data: Vec<u8>) {
        let bs = BitString::try_from(input.as_slice()).unwrap();
        assert_eq!(expected_unused, bs.unused_bits());
        assert_eq!(expected_data, bs.as_bytes());
    }

    #[test]
    fn test_bit_string_unused_out_of_range() {
        let err = BitString::try_from([0x08, 0xff].as_slice()).unwrap_err();
        assert!(matches!(err, Error::InvalidBitString(_)));
    }
}
