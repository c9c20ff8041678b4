use nom::{IResult, Parser};

pub mod error;
pub mod value;

use error::Error;
use kagi::decoder::{DecodableFrom, Decoder};
use kagi::encoder::{EncodableTo, Encoder};
use pem::Pem;
pub use value::{BitString, Integer, ObjectIdentifier, OctetString};

const CLASS_MASK: u8 = 0xc0;
const CLASS_UNIVERSAL: u8 = 0x00;
const CLASS_CONTEXT_SPECIFIC: u8 = 0x80;
const TAG_CONSTRUCTED: u8 = 0x20;
const TAG_NUMBER_MASK: u8 = 0x1f;

const TAG_INTEGER: u8 = 0x02;
const TAG_BIT_STRING: u8 = 0x03;
const TAG_OCTET_STRING: u8 = 0x04;
const TAG_NULL: u8 = 0x05;
const TAG_OBJECT_IDENTIFIER: u8 = 0x06;
const TAG_SEQUENCE: u8 = 0x10;
const TAG_SET: u8 = 0x11;

/// A sequence of top-level DER elements decoded from a byte stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Der {
    elements: Vec<Element>,
}

impl Der {
    pub fn new(elements: Vec<Element>) -> Self {
        Der { elements }
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn into_elements(self) -> Vec<Element> {
        self.elements
    }
}

#[derive(Debug, Clone)]
struct Tlv {
    tag: u8,
    value: TlvValue,
}

#[derive(Debug, Clone)]
enum TlvValue {
    Tlvs(Vec<Tlv>),
    Data(Vec<u8>),
}

// Constructed types whose contents are themselves TLV streams.
fn is_nested(tag: u8) -> bool {
    if tag & TAG_CONSTRUCTED == 0 {
        return false;
    }
    match tag & CLASS_MASK {
        CLASS_CONTEXT_SPECIFIC => true,
        CLASS_UNIVERSAL => matches!(tag & TAG_NUMBER_MASK, TAG_SEQUENCE | TAG_SET),
        _ => false,
    }
}

impl Tlv {
    fn parse(input: &[u8]) -> IResult<&[u8], Tlv> {
        let (input, tag) = nom::number::be_u8().parse(input)?;
        let (input, length) = parse_length(input)?;
        let (input, data) = nom::bytes::complete::take(length).parse(input)?;

        if is_nested(tag) {
            // parse TLV recursively.
            let mut tlvs = Vec::new();
            let mut data = data;
            while !data.is_empty() {
                let (new_input, v) = Self::parse(data)?;
                data = new_input;
                tlvs.push(v);
            }

            return Ok((
                input,
                Tlv {
                    tag,
                    value: TlvValue::Tlvs(tlvs),
                },
            ));
        }

        Ok((
            input,
            Tlv {
                tag,
                value: TlvValue::Data(data.to_vec()),
            },
        ))
    }
}

fn parse_length(input: &[u8]) -> IResult<&[u8], u64> {
    let (input, n) = nom::number::be_u8().parse(input)?;
    if n == 0x80 {
        // indefinite form, BER only
        return Err(nom::Err::Failure(nom::error::Error::new(
            input,
            nom::error::ErrorKind::LengthValue,
        )));
    }
    if n & 0x80 == 0x80 {
        // long form
        // First 1 bit is a marker for long form.
        // Other bits represent bytes length of the length field.
        let length = n & 0x7f;
        if length > 8 {
            // would not fit in u64
            return Err(nom::Err::Failure(nom::error::Error::new(
                input,
                nom::error::ErrorKind::LengthValue,
            )));
        }
        let (input, bs) = nom::bytes::complete::take(length).parse(input)?;
        let n = bs.iter().enumerate().fold(0u64, |n, (i, &b)| {
            n + 256_u64.pow((bs.len() - i - 1) as u32) * b as u64
        });
        return Ok((input, n));
    }
    // short form: 0-127
    Ok((input, n as u64))
}

fn from_nom_error(e: nom::Err<nom::error::Error<&[u8]>>) -> Error {
    match e {
        nom::Err::Incomplete(needed) => Error::ParserIncomplete(needed),
        nom::Err::Error(e) | nom::Err::Failure(e) => Error::Parser(e.code),
    }
}

/// A decoded ASN.1 element.
///
/// Only the types that occur in key and certificate structures get a typed
/// variant. Anything else is carried through [`Element::Unparsed`], contents
/// untouched, so re-serializing reproduces the input bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Element {
    Integer(Integer),
    BitString(BitString),
    OctetString(OctetString),
    Null,
    ObjectIdentifier(ObjectIdentifier),
    Sequence(Vec<Element>),
    Set(Vec<Element>),
    ContextSpecific {
        slot: u8,
        constructed: bool,
        element: Box<Element>,
    },
    Unparsed {
        tag: u8,
        data: Vec<u8>,
    },
}

impl TryFrom<&Tlv> for Element {
    type Error = Error;

    fn try_from(tlv: &Tlv) -> Result<Self, Self::Error> {
        if tlv.tag & CLASS_MASK == CLASS_CONTEXT_SPECIFIC {
            let slot = tlv.tag & TAG_NUMBER_MASK;
            return match &tlv.value {
                // Constructed: EXPLICIT tagging around a single inner element.
                TlvValue::Tlvs(tlvs) => match tlvs.as_slice() {
                    [inner] => Ok(Element::ContextSpecific {
                        slot,
                        constructed: true,
                        element: Box::new(Element::try_from(inner)?),
                    }),
                    _ => Err(Error::InvalidContextSpecific {
                        slot,
                        msg: "constructed must hold exactly one element".to_string(),
                    }),
                },
                // Primitive: IMPLICIT tagging, the raw contents are kept and
                // interpreted by whatever schema sits above.
                TlvValue::Data(data) => Ok(Element::ContextSpecific {
                    slot,
                    constructed: false,
                    element: Box::new(Element::OctetString(OctetString::from(data.as_slice()))),
                }),
            };
        }

        match (&tlv.value, tlv.tag & CLASS_MASK, tlv.tag & TAG_NUMBER_MASK) {
            (TlvValue::Tlvs(tlvs), CLASS_UNIVERSAL, TAG_SEQUENCE) => Ok(Element::Sequence(
                tlvs.iter()
                    .map(Element::try_from)
                    .collect::<Result<Vec<_>, _>>()?,
            )),
            (TlvValue::Tlvs(tlvs), CLASS_UNIVERSAL, TAG_SET) => Ok(Element::Set(
                tlvs.iter()
                    .map(Element::try_from)
                    .collect::<Result<Vec<_>, _>>()?,
            )),
            (TlvValue::Data(data), CLASS_UNIVERSAL, TAG_INTEGER) => {
                Ok(Element::Integer(Integer::from(data.as_slice())))
            }
            (TlvValue::Data(data), CLASS_UNIVERSAL, TAG_BIT_STRING) => {
                Ok(Element::BitString(BitString::try_from(data.as_slice())?))
            }
            (TlvValue::Data(data), CLASS_UNIVERSAL, TAG_OCTET_STRING) => {
                Ok(Element::OctetString(OctetString::from(data.as_slice())))
            }
            (TlvValue::Data(data), CLASS_UNIVERSAL, TAG_NULL) => {
                if !data.is_empty() {
                    return Err(Error::InvalidNull);
                }
                Ok(Element::Null)
            }
            (TlvValue::Data(data), CLASS_UNIVERSAL, TAG_OBJECT_IDENTIFIER) => Ok(
                Element::ObjectIdentifier(ObjectIdentifier::try_from(data.as_slice())?),
            ),
            (TlvValue::Data(data), _, _) => Ok(Element::Unparsed {
                tag: tlv.tag,
                data: data.clone(),
            }),
            // is_nested only descends into the arms handled above
            (TlvValue::Tlvs(_), _, _) => Err(Error::Parser(nom::error::ErrorKind::Tag)),
        }
    }
}

impl Element {
    pub fn as_sequence(&self) -> Option<&[Element]> {
        match self {
            Element::Sequence(elements) => Some(elements),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<&Integer> {
        match self {
            Element::Integer(integer) => Some(integer),
            _ => None,
        }
    }

    pub fn as_bit_string(&self) -> Option<&BitString> {
        match self {
            Element::BitString(bs) => Some(bs),
            _ => None,
        }
    }

    pub fn as_octet_string(&self) -> Option<&OctetString> {
        match self {
            Element::OctetString(os) => Some(os),
            _ => None,
        }
    }

    pub fn as_object_identifier(&self) -> Option<&ObjectIdentifier> {
        match self {
            Element::ObjectIdentifier(oid) => Some(oid),
            _ => None,
        }
    }

    /// Serializes the element back to DER.
    pub fn to_der(&self) -> Result<Vec<u8>, Error> {
        match self {
            Element::Integer(i) => Ok(tlv(TAG_INTEGER, &i.to_signed_bytes_be())),
            Element::BitString(bs) => {
                let mut contents = Vec::with_capacity(bs.as_bytes().len() + 1);
                contents.push(bs.unused_bits());
                contents.extend_from_slice(bs.as_bytes());
                Ok(tlv(TAG_BIT_STRING, &contents))
            }
            Element::OctetString(os) => Ok(tlv(TAG_OCTET_STRING, os.as_bytes())),
            Element::Null => Ok(tlv(TAG_NULL, &[])),
            Element::ObjectIdentifier(oid) => Ok(tlv(TAG_OBJECT_IDENTIFIER, &Vec::try_from(oid)?)),
            Element::Sequence(elements) => {
                Ok(tlv(TAG_SEQUENCE | TAG_CONSTRUCTED, &to_der_all(elements)?))
            }
            Element::Set(elements) => Ok(tlv(TAG_SET | TAG_CONSTRUCTED, &to_der_all(elements)?)),
            Element::ContextSpecific {
                slot,
                constructed,
                element,
            } => {
                if *constructed {
                    Ok(tlv(
                        CLASS_CONTEXT_SPECIFIC | TAG_CONSTRUCTED | slot,
                        &element.to_der()?,
                    ))
                } else {
                    match element.as_ref() {
                        Element::OctetString(os) => {
                            Ok(tlv(CLASS_CONTEXT_SPECIFIC | slot, os.as_bytes()))
                        }
                        _ => Err(Error::InvalidContextSpecific {
                            slot: *slot,
                            msg: "implicit tagging requires raw contents".to_string(),
                        }),
                    }
                }
            }
            Element::Unparsed { tag, data } => Ok(tlv(*tag, data)),
        }
    }
}

fn to_der_all(elements: &[Element]) -> Result<Vec<u8>, Error> {
    let mut out = Vec::new();
    for element in elements {
        out.extend(element.to_der()?);
    }
    Ok(out)
}

fn tlv(tag: u8, contents: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(contents.len() + 4);
    out.push(tag);
    encode_length(contents.len(), &mut out);
    out.extend_from_slice(contents);
    out
}

fn encode_length(len: usize, out: &mut Vec<u8>) {
    if len < 0x80 {
        out.push(len as u8);
        return;
    }
    let bytes = len.to_be_bytes();
    let skip = bytes.iter().take_while(|&&b| b == 0).count();
    out.push(0x80 | (bytes.len() - skip) as u8);
    out.extend_from_slice(&bytes[skip..]);
}

impl DecodableFrom<&[u8]> for Der {}

impl Decoder<&[u8], Der> for &[u8] {
    type Error = Error;

    fn decode(&self) -> Result<Der, Self::Error> {
        let mut elements = Vec::new();
        let mut input: &[u8] = self;
        while !input.is_empty() {
            let (rest, tlv) = Tlv::parse(input).map_err(from_nom_error)?;
            input = rest;
            elements.push(Element::try_from(&tlv)?);
        }
        Ok(Der { elements })
    }
}

impl DecodableFrom<Vec<u8>> for Der {}

impl Decoder<Vec<u8>, Der> for Vec<u8> {
    type Error = Error;

    fn decode(&self) -> Result<Der, Self::Error> {
        self.as_slice().decode()
    }
}

impl DecodableFrom<Pem> for Der {}

impl Decoder<Pem, Der> for Pem {
    type Error = Error;

    fn decode(&self) -> Result<Der, Self::Error> {
        let bytes: Vec<u8> = Decoder::<Pem, Vec<u8>>::decode(self)?;
        bytes.decode()
    }
}

impl EncodableTo<Der> for Vec<u8> {}

impl Encoder<Der, Vec<u8>> for Der {
    type Error = Error;

    fn encode(&self) -> Result<Vec<u8>, Self::Error> {
        to_der_all(&self.elements)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use crate::{
        BitString, Der, Element, Integer, ObjectIdentifier, OctetString, error::Error,
        parse_length,
    };
    use kagi::decoder::Decoder;
    use kagi::encoder::Encoder;
    use pem::{Label, Pem};
    use std::str::FromStr;

    #[rstest(input, expected,
        case(vec![0x02], 0x02),
        case(vec![0x02, 0x01], 0x02),
        case(vec![0x30, 0x01], 0x30),
        case(vec![0x82, 0x02, 0x10], 256 * 0x02 + 0x10),
        case(vec![0x83, 0x01, 0x00, 0x00], 256 * 256),
        case(vec![0x82, 0xff, 0xff], 256 * 0xff + 0xff),
    )]
    fn test_parse_length(input: Vec<u8>, expected: u64) {
        let actual = parse_length(&input).unwrap();

        assert_eq!(expected, actual.1);
    }

    #[test]
    fn test_parse_length_rejects_indefinite_form() {
        assert!(parse_length(&[0x80, 0x02, 0x01, 0x00, 0x00, 0x00]).is_err());
    }

    #[test]
    fn test_parse_length_rejects_oversized_length_field() {
        // a nine-byte length field cannot fit in u64
        let mut input = vec![0x89u8];
        input.extend_from_slice(&[0xff; 9]);
        assert!(parse_length(&input).is_err());

        let mut der_input = vec![0x30u8, 0x89];
        der_input.extend_from_slice(&[0xff; 9]);
        let result: Result<Der, Error> = der_input.decode();
        assert!(result.is_err());
    }

    #[test]
    fn test_decode_sequence() {
        let input: &[u8] = &[0x30, 0x05, 0x02, 0x01, 0x05, 0x05, 0x00];
        let der: Der = input.decode().unwrap();

        let expected = Der::new(vec![Element::Sequence(vec![
            Element::Integer(Integer::from(5)),
            Element::Null,
        ])]);
        assert_eq!(expected, der);
    }

    #[test]
    fn test_decode_algorithm_identifier() {
        // SEQUENCE { OBJECT IDENTIFIER rsaEncryption, NULL }
        let input: &[u8] = &[
            0x30, 0x0d, 0x06, 0x09, 0x2a, 0x86, 0x48, 0x86, 0xf7, 0x0d, 0x01, 0x01, 0x01, 0x05,
            0x00,
        ];
        let der: Der = input.decode().unwrap();

        let elements = der.elements()[0].as_sequence().unwrap();
        let oid = elements[0].as_object_identifier().unwrap();
        assert_eq!(*oid, "1.2.840.113549.1.1.1");
        assert_eq!(Element::Null, elements[1]);

        // serialization reproduces the input
        let encoded: Vec<u8> = der.encode().unwrap();
        assert_eq!(input, encoded);
    }

    #[test]
    fn test_decode_context_specific_explicit() {
        // [0] { INTEGER 2 }, the version field of a certificate
        let input: &[u8] = &[0xa0, 0x03, 0x02, 0x01, 0x02];
        let der: Der = input.decode().unwrap();

        let expected = Element::ContextSpecific {
            slot: 0,
            constructed: true,
            element: Box::new(Element::Integer(Integer::from(2))),
        };
        assert_eq!(expected, der.elements()[0]);

        let encoded: Vec<u8> = der.encode().unwrap();
        assert_eq!(input, encoded);
    }

    #[test]
    fn test_decode_context_specific_implicit() {
        let input: &[u8] = &[0x81, 0x02, 0xca, 0xfe];
        let der: Der = input.decode().unwrap();

        let expected = Element::ContextSpecific {
            slot: 1,
            constructed: false,
            element: Box::new(Element::OctetString(OctetString::from(
                [0xca, 0xfe].as_slice(),
            ))),
        };
        assert_eq!(expected, der.elements()[0]);

        let encoded: Vec<u8> = der.encode().unwrap();
        assert_eq!(input, encoded);
    }

    #[test]
    fn test_unparsed_tag_roundtrips_verbatim() {
        // UTF8String "abc" has no typed variant
        let input: &[u8] = &[0x0c, 0x03, 0x61, 0x62, 0x63];
        let der: Der = input.decode().unwrap();

        assert!(matches!(
            der.elements()[0],
            Element::Unparsed { tag: 0x0c, .. }
        ));
        let encoded: Vec<u8> = der.encode().unwrap();
        assert_eq!(input, encoded);
    }

    #[test]
    fn test_long_form_length_roundtrip() {
        let payload = vec![0xabu8; 200];
        let element = Element::OctetString(OctetString::from(payload.clone()));
        let encoded = element.to_der().unwrap();
        assert_eq!(vec![0x04, 0x81, 200], encoded[..3].to_vec());

        let der: Der = encoded.decode().unwrap();
        assert_eq!(element, der.elements()[0]);
    }

    #[test]
    fn test_bit_string_element() {
        let input: &[u8] = &[0x03, 0x03, 0x00, 0xab, 0xcd];
        let der: Der = input.decode().unwrap();

        let bs = der.elements()[0].as_bit_string().unwrap();
        assert_eq!(0, bs.unused_bits());
        assert_eq!(vec![0xab, 0xcd], bs.as_bytes().to_vec());
    }

    #[test]
    fn test_null_with_contents_is_rejected() {
        let input: &[u8] = &[0x05, 0x01, 0x00];
        let result: Result<Der, Error> = input.decode();
        assert!(matches!(result, Err(Error::InvalidNull)));
    }

    #[test]
    fn test_decode_truncated_input() {
        let input: &[u8] = &[0x30, 0x10, 0x02, 0x01];
        let result: Result<Der, Error> = input.decode();
        assert!(result.is_err());
    }

    #[test]
    fn test_decode_from_pem() {
        let bytes = vec![0x30, 0x05, 0x02, 0x01, 0x2a, 0x05, 0x00];
        let pem = Pem::from_bytes(Label::PublicKey, &bytes);
        let reparsed = Pem::from_str(&pem.to_string()).unwrap();

        let der: Der = reparsed.decode().unwrap();
        let expected = Der::new(vec![Element::Sequence(vec![
            Element::Integer(Integer::from(42)),
            Element::Null,
        ])]);
        assert_eq!(expected, der);
    }

    #[test]
    fn test_oid_element_encode() {
        let oid = ObjectIdentifier::from_str("1.2.840.113549.1.1.1").unwrap();
        let encoded = Element::ObjectIdentifier(oid).to_der().unwrap();
        assert_eq!(
            vec![0x06, 0x09, 0x2a, 0x86, 0x48, 0x86, 0xf7, 0x0d, 0x01, 0x01, 0x01],
            encoded
        );
    }

    #[test]
    fn test_integer_magnitude_in_element() {
        let input: &[u8] = &[0x02, 0x03, 0x00, 0xab, 0xcd];
        let der: Der = input.decode().unwrap();
        let integer = der.elements()[0].as_integer().unwrap();
        assert_eq!(vec![0xab, 0xcd], integer.magnitude_bytes());
    }

    #[test]
    fn test_bit_string_new() {
        let bs = BitString::new(0, vec![0x01, 0x02]);
        let element = Element::BitString(bs);
        assert_eq!(vec![0x03, 0x03, 0x00, 0x01, 0x02], element.to_der().unwrap());
    }
}
