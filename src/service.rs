// src/service.rs
use crossbeam_channel::{Receiver, Sender};
use log::{debug, info, warn};

use crate::config::Config;
use crate::envelope::ExhibitEnvelope;
use crate::error::{DecodeError, Result};
use crate::types::{CodecCommand, Framing, OutgoingMessage};
use crate::{exhibit, message, ndef};

/// Worker loop: one command in, one message out, until the command
/// channel closes. Commands are handled strictly in order.
pub fn run(tx: Sender<OutgoingMessage>, rx: Receiver<CodecCommand>, config: Config) {
    info!(
        "Starting codec worker (default language {:?})",
        config.default_language
    );

    while let Ok(cmd) = rx.recv() {
        debug!("Received command: {:?}", cmd);
        let reply = execute(cmd, &config);

        if let OutgoingMessage::CodecError { kind, error, .. } = &reply {
            warn!("Codec {} error: {}", kind, error);
        }

        if tx.send(reply).is_err() {
            info!("Event channel closed, stopping codec worker");
            return;
        }
    }

    info!("Command channel closed, stopping codec worker");
}

/// Run a single command against the codec.
pub fn execute(cmd: CodecCommand, config: &Config) -> OutgoingMessage {
    match cmd {
        CodecCommand::CheckStatus => OutgoingMessage::Status {
            ready: true,
            default_language: config.default_language.clone(),
        },
        CodecCommand::EncodeTag {
            request_id,
            envelope,
            language,
            framing,
        } => {
            let language = language.as_deref().unwrap_or(config.default_language.as_str());
            match encode_tag(&envelope, language, framing) {
                Ok(bytes) => OutgoingMessage::TagEncoded {
                    request_id,
                    payload: hex::encode(bytes),
                },
                Err(e) => OutgoingMessage::codec_error(request_id, &e),
            }
        }
        CodecCommand::DecodeTag {
            request_id,
            payload_hex,
            framing,
        } => match decode_tag(&payload_hex, framing) {
            Ok(envelope) => OutgoingMessage::TagDecoded {
                request_id,
                envelope,
            },
            Err(e) => OutgoingMessage::codec_error(request_id, &e),
        },
        CodecCommand::EncodeText {
            request_id,
            text,
            language,
            framing,
        } => {
            let language = language.as_deref().unwrap_or(config.default_language.as_str());
            match encode_text(&text, language, framing) {
                Ok(bytes) => OutgoingMessage::TextEncoded {
                    request_id,
                    payload: hex::encode(bytes),
                },
                Err(e) => OutgoingMessage::codec_error(request_id, &e),
            }
        }
        CodecCommand::DecodeText {
            request_id,
            payload_hex,
            framing,
        } => match decode_text(&payload_hex, framing) {
            Ok(record) => OutgoingMessage::TextDecoded {
                request_id,
                language: record.language_code().to_string(),
                encoding: record.encoding().to_string(),
                text: record.into_text(),
            },
            Err(e) => OutgoingMessage::codec_error(request_id, &e),
        },
    }
}

fn encode_tag(envelope: &ExhibitEnvelope, language: &str, framing: Framing) -> Result<Vec<u8>> {
    match framing {
        Framing::Payload => exhibit::encode_exhibit_tag(envelope, language),
        Framing::Message => message::encode_exhibit_message(envelope, language),
    }
}

fn decode_tag(payload_hex: &str, framing: Framing) -> Result<ExhibitEnvelope> {
    let bytes = from_hex(payload_hex)?;
    match framing {
        Framing::Payload => exhibit::decode_exhibit_tag(&bytes),
        Framing::Message => message::decode_exhibit_message(&bytes),
    }
}

fn encode_text(text: &str, language: &str, framing: Framing) -> Result<Vec<u8>> {
    let bytes = match framing {
        Framing::Payload => ndef::encode(text, language)?,
        Framing::Message => message::encode_text_tlv(text, language)?,
    };
    Ok(bytes)
}

fn decode_text(payload_hex: &str, framing: Framing) -> Result<ndef::NdefTextRecord> {
    let bytes = from_hex(payload_hex)?;
    let record = match framing {
        Framing::Payload => ndef::decode(&bytes)?,
        Framing::Message => message::decode_text_tlv(&bytes)?,
    };
    Ok(record)
}

fn from_hex(payload_hex: &str) -> Result<Vec<u8>, DecodeError> {
    hex::decode(payload_hex.trim()).map_err(|e| DecodeError::InvalidHex(e.to_string()))
}
