// src/error.rs
use crate::ndef::TextEncoding;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Caller-supplied text or language code that cannot be put on a tag.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncodeError {
    #[error("language code is {len} bytes, at most 63 fit in the status byte")]
    LanguageTooLong { len: usize },

    #[error("language code byte {byte:#04x} at index {index} is not printable ASCII")]
    NonPrintableLanguage { index: usize, byte: u8 },

    #[error("NDEF record {field} of {len} bytes does not fit its length field")]
    FieldTooLong { field: &'static str, len: usize },

    #[error("NDEF message of {len} bytes does not fit in a TLV")]
    RecordTooLarge { len: usize },
}

/// Malformed or truncated bytes read from a tag.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("empty payload")]
    EmptyPayload,

    #[error("payload is not hex: {0}")]
    InvalidHex(String),

    #[error("truncated language code: declared {declared} bytes, {available} available")]
    TruncatedLanguageCode { declared: usize, available: usize },

    #[error("language code is not ASCII")]
    InvalidLanguageCode,

    #[error("text is not valid {encoding}")]
    InvalidText { encoding: TextEncoding },

    #[error("no NDEF TLV found")]
    NoNdefTlv,

    #[error("NDEF TLV length runs past the end of the buffer")]
    TruncatedTlv,

    #[error("NDEF record runs past the end of the message")]
    TruncatedRecord,

    #[error("chunked NDEF records are not supported")]
    ChunkedRecord,

    #[error("message has no well-known text record")]
    NoTextRecord,
}

/// JSON that does not match the exhibit envelope schema.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("invalid JSON: {0}")]
    InvalidJson(String),

    #[error("envelope is not a JSON object")]
    NotAnObject,

    #[error("missing field `{0}`")]
    MissingField(&'static str),

    #[error("field `{field}` must be a string, found {found}")]
    FieldType {
        field: &'static str,
        found: &'static str,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Encoding,
    Decoding,
    Schema,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("encoding error: {0}")]
    Encoding(#[from] EncodeError),

    #[error("decoding error: {0}")]
    Decoding(#[from] DecodeError),

    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Encoding(_) => ErrorKind::Encoding,
            Error::Decoding(_) => ErrorKind::Decoding,
            Error::Schema(_) => ErrorKind::Schema,
        }
    }
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Encoding => "ENCODING",
            ErrorKind::Decoding => "DECODING",
            ErrorKind::Schema => "SCHEMA",
        }
    }
}
