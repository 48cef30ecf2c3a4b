//! Codec for museum exhibit tags: NDEF well-known text records carrying a
//! JSON envelope of exhibit metadata.
//!
//! Reading a tag: payload bytes -> [`ndef::decode`] -> [`envelope::parse`].
//! Writing a tag: [`envelope::serialize`] -> [`ndef::encode`] -> bytes.
//! [`exhibit`] chains both steps; [`message`] adds NDEF message and TLV
//! framing. The codec functions are pure and safe to call from any thread.

pub mod config;
pub mod envelope;
pub mod error;
pub mod exhibit;
pub mod message;
pub mod ndef;
pub mod service;
pub mod types;
pub mod ws;

pub use envelope::ExhibitEnvelope;
pub use error::{DecodeError, EncodeError, Error, ErrorKind, Result, SchemaError};
pub use exhibit::{decode_exhibit_tag, encode_exhibit_tag, encode_exhibit_tag_default};
pub use ndef::{NdefTextRecord, TextEncoding};
