use pretty_assertions::assert_eq;

use exhibit_tag_codec::message;
use exhibit_tag_codec::{
    DecodeError, EncodeError, Error, ErrorKind, ExhibitEnvelope, SchemaError, TextEncoding,
    decode_exhibit_tag, encode_exhibit_tag, encode_exhibit_tag_default, envelope, ndef,
};

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
fn text_round_trips_across_languages() {
    let cases = [
        ("", "en"),
        ("plain ascii", "en"),
        ("日本語", "ja"),
        ("emoji 🚀 and ümlauts", "de-AT"),
        ("{\"ID\":\"1\"}", ""),
    ];

    for (text, lang) in cases {
        let record = ndef::decode(&ndef::encode(text, lang).unwrap()).unwrap();
        assert_eq!(record.text(), text);
        assert_eq!(record.language_code(), lang);
        assert_eq!(record.encoding(), TextEncoding::Utf8);
    }
}

#[test]
fn language_length_boundary() {
    assert!(ndef::encode("t", &"z".repeat(63)).is_ok());
    assert_eq!(
        ndef::encode("t", &"z".repeat(64)),
        Err(EncodeError::LanguageTooLong { len: 64 })
    );
}

#[test]
fn malformed_payloads() {
    assert_eq!(ndef::decode(&[]), Err(DecodeError::EmptyPayload));
    assert!(matches!(
        ndef::decode(&[0x02]),
        Err(DecodeError::TruncatedLanguageCode { declared: 2, .. })
    ));
}

#[test]
fn language_length_of_44_is_read_whole() {
    let lang = "q".repeat(44);
    let payload = ndef::encode("after", &lang).unwrap();
    assert_eq!(payload[0], 0x2C);

    let record = ndef::decode(&payload).unwrap();
    assert_eq!(record.language_code().len(), 44);
    assert_eq!(record.text(), "after");
}

#[test]
fn envelope_round_trip_with_escapes() {
    let envelope = ExhibitEnvelope {
        id: "\"quoted\"".into(),
        title: "back\\slash".into(),
        body: "tab\tnewline\n\u{0}".into(),
        url: "http://example.org/a?b=c&d=e".into(),
        image_link: String::new(),
        video_link: "https://video/日本".into(),
    };
    assert_eq!(envelope::parse(&envelope::serialize(&envelope)).unwrap(), envelope);
}

#[test]
fn partial_envelope_is_a_schema_error() {
    assert_eq!(
        envelope::parse(r#"{"Title":"x"}"#),
        Err(SchemaError::MissingField("ID"))
    );
}

#[test]
fn exhibit_tag_end_to_end() {
    let payload = encode_exhibit_tag_default(&rocket()).unwrap();
    assert_eq!(decode_exhibit_tag(&payload).unwrap(), rocket());

    let payload = encode_exhibit_tag(&rocket(), "en-GB").unwrap();
    let record = ndef::decode(&payload).unwrap();
    assert_eq!(record.language_code(), "en-GB");
    assert_eq!(decode_exhibit_tag(&payload).unwrap(), rocket());
}

#[test]
fn exhibit_tag_errors_keep_their_kind() {
    assert_eq!(
        decode_exhibit_tag(&[]).unwrap_err().kind(),
        ErrorKind::Decoding
    );

    let payload = ndef::encode(r#"{"Title":"x"}"#, "en").unwrap();
    assert_eq!(
        decode_exhibit_tag(&payload).unwrap_err().kind(),
        ErrorKind::Schema
    );

    assert!(matches!(
        encode_exhibit_tag(&rocket(), "\n"),
        Err(Error::Encoding(EncodeError::NonPrintableLanguage { .. }))
    ));
}

#[test]
fn reads_payload_written_by_reference_app() {
    // status 0x02, "en", then a JSON object as the Android app wrote it
    let json = r#"{"ID":"42","Title":"Apollo","Body":"Saturn V","URL":"https:\/\/nasa.gov","ImageLink":"","VideoLink":""}"#;
    let mut payload = vec![0x02, b'e', b'n'];
    payload.extend_from_slice(json.as_bytes());

    let envelope = decode_exhibit_tag(&payload).unwrap();
    assert_eq!(envelope.id, "42");
    assert_eq!(envelope.url, "https://nasa.gov");
}

#[test]
fn exhibit_survives_tag_memory_layout() {
    let tlv = message::encode_exhibit_message(&rocket(), "en").unwrap();

    // tag memory: NULL padding before the NDEF TLV, zeroed pages after it
    let mut memory = vec![0x00, 0x00];
    memory.extend_from_slice(&tlv);
    memory.resize(memory.len() + 16, 0x00);

    assert_eq!(message::decode_exhibit_message(&memory).unwrap(), rocket());
}
