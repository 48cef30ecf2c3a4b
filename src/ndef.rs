// src/ndef.rs
//! NDEF well-known text record payload codec.
//!
//! Payload layout: `[status byte] [language code] [text]`. The status byte
//! carries the text encoding in bit 7 and the language code length in bits
//! 0-5. Bit 6 is reserved.

use std::fmt;

use crate::error::{DecodeError, EncodeError};

pub const DEFAULT_LANGUAGE: &str = "en";

/// Longest language code the 6 length bits can describe.
pub const MAX_LANGUAGE_LEN: usize = 0x3F;

const UTF16_FLAG: u8 = 0x80;
const LANGUAGE_LEN_MASK: u8 = 0x3F;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextEncoding {
    Utf8,
    Utf16,
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextEncoding::Utf8 => f.write_str("UTF-8"),
            TextEncoding::Utf16 => f.write_str("UTF-16"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NdefTextRecord {
    language_code: String,
    encoding: TextEncoding,
    text: String,
}

impl NdefTextRecord {
    pub fn language_code(&self) -> &str {
        &self.language_code
    }

    pub fn encoding(&self) -> TextEncoding {
        self.encoding
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }
}

/// Check that `language_code` fits in a status byte and is printable ASCII.
pub fn validate_language(language_code: &str) -> Result<(), EncodeError> {
    let bytes = language_code.as_bytes();
    if let Some(index) = bytes.iter().position(|b| !(0x20..=0x7E).contains(b)) {
        return Err(EncodeError::NonPrintableLanguage {
            index,
            byte: bytes[index],
        });
    }

    if bytes.len() > MAX_LANGUAGE_LEN {
        return Err(EncodeError::LanguageTooLong { len: bytes.len() });
    }

    Ok(())
}

/// Build a text record payload. Text is always written as UTF-8.
pub fn encode(text: &str, language_code: &str) -> Result<Vec<u8>, EncodeError> {
    validate_language(language_code)?;

    let lang = language_code.as_bytes();
    let text_bytes = text.as_bytes();

    let mut payload = Vec::with_capacity(1 + lang.len() + text_bytes.len());
    // bit 7 = 0 (UTF-8), bits 0-5 = language length
    payload.push(lang.len() as u8 & LANGUAGE_LEN_MASK);
    payload.extend_from_slice(lang);
    payload.extend_from_slice(text_bytes);
    Ok(payload)
}

pub fn encode_default(text: &str) -> Result<Vec<u8>, EncodeError> {
    encode(text, DEFAULT_LANGUAGE)
}

pub fn decode(payload: &[u8]) -> Result<NdefTextRecord, DecodeError> {
    let (&status_byte, rest) = payload.split_first().ok_or(DecodeError::EmptyPayload)?;

    let encoding = if status_byte & UTF16_FLAG != 0 {
        TextEncoding::Utf16
    } else {
        TextEncoding::Utf8
    };

    let lang_len = (status_byte & LANGUAGE_LEN_MASK) as usize;
    if lang_len > rest.len() {
        return Err(DecodeError::TruncatedLanguageCode {
            declared: lang_len,
            available: rest.len(),
        });
    }

    let (lang_bytes, text_bytes) = rest.split_at(lang_len);
    if !lang_bytes.is_ascii() {
        return Err(DecodeError::InvalidLanguageCode);
    }

    let language_code: String = lang_bytes.iter().map(|&b| char::from(b)).collect();

    let text = match encoding {
        TextEncoding::Utf8 => std::str::from_utf8(text_bytes)
            .map(str::to_owned)
            .map_err(|_| DecodeError::InvalidText { encoding })?,
        TextEncoding::Utf16 => decode_utf16(text_bytes)?,
    };

    Ok(NdefTextRecord {
        language_code,
        encoding,
        text,
    })
}

// Big-endian unless a byte order mark says otherwise. The BOM is not text.
fn decode_utf16(bytes: &[u8]) -> Result<String, DecodeError> {
    let invalid = DecodeError::InvalidText {
        encoding: TextEncoding::Utf16,
    };

    if bytes.len() % 2 != 0 {
        return Err(invalid);
    }

    let (little_endian, body) = match bytes {
        [0xFE, 0xFF, body @ ..] => (false, body),
        [0xFF, 0xFE, body @ ..] => (true, body),
        body => (false, body),
    };

    let units = body.chunks_exact(2).map(|pair| {
        if little_endian {
            u16::from_le_bytes([pair[0], pair[1]])
        } else {
            u16::from_be_bytes([pair[0], pair[1]])
        }
    });

    char::decode_utf16(units)
        .collect::<Result<String, _>>()
        .map_err(|_| invalid)
}
