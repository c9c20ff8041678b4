use std::num::ParseIntError;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("parser error {0:?}")]
    Parser(nom::error::ErrorKind),
    #[error("parser incomplete: {0:?}")]
    ParserIncomplete(nom::Needed),
    #[error("invalid BIT STRING: {0}")]
    InvalidBitString(String),
    #[error("invalid OBJECT IDENTIFIER: {0}")]
    InvalidObjectIdentifier(String),
    #[error("parse int error: {0}")]
    ParseInt(ParseIntError),
    #[error("invalid NULL: contents must be empty")]
    InvalidNull,
    #[error("invalid context-specific value: {slot}, {msg}")]
    InvalidContextSpecific { slot: u8, msg: String },
    #[error("pem: {0}")]
    Pem(#[from] pem::error::Error),
}
