// src/exhibit.rs
//! Tag payload <-> exhibit envelope in one step.

use crate::envelope::{self, ExhibitEnvelope};
use crate::error::Result;
use crate::ndef;

/// Decode a text record payload and parse its text as an envelope.
pub fn decode_exhibit_tag(payload: &[u8]) -> Result<ExhibitEnvelope> {
    let record = ndef::decode(payload)?;
    Ok(envelope::parse(record.text())?)
}

pub fn encode_exhibit_tag(envelope: &ExhibitEnvelope, language_code: &str) -> Result<Vec<u8>> {
    Ok(ndef::encode(&envelope::serialize(envelope), language_code)?)
}

pub fn encode_exhibit_tag_default(envelope: &ExhibitEnvelope) -> Result<Vec<u8>> {
    encode_exhibit_tag(envelope, ndef::DEFAULT_LANGUAGE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{DecodeError, EncodeError, Error, ErrorKind, SchemaError};

    fn rocket() -> ExhibitEnvelope {
        ExhibitEnvelope {
            id: "1".into(),
            title: "Rocket".into(),
            body: "A rocket.".into(),
            url: "http://x".into(),
            image_link: "http://i".into(),
            video_link: "http://v".into(),
        }
    }

    #[test]
    fn end_to_end_round_trip() {
        let payload = encode_exhibit_tag_default(&rocket()).unwrap();
        assert_eq!(&payload[..3], &[0x02, b'e', b'n']);
        assert_eq!(decode_exhibit_tag(&payload).unwrap(), rocket());
    }

    #[test]
    fn decoding_error_comes_first() {
        let err = decode_exhibit_tag(&[0x05, b'e']).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decoding);
        assert!(matches!(
            err,
            Error::Decoding(DecodeError::TruncatedLanguageCode { .. })
        ));
    }

    #[test]
    fn schema_error_surfaces_after_decoding() {
        let payload = ndef::encode_default(r#"{"Title":"x"}"#).unwrap();
        assert_eq!(
            decode_exhibit_tag(&payload),
            Err(Error::Schema(SchemaError::MissingField("ID")))
        );
    }

    #[test]
    fn bad_language_is_an_encoding_error() {
        let err = encode_exhibit_tag(&rocket(), &"x".repeat(64)).unwrap_err();
        assert_eq!(err, Error::Encoding(EncodeError::LanguageTooLong { len: 64 }));
    }
}
