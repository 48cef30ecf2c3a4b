// src/types.rs
use serde::{Deserialize, Serialize};

use crate::envelope::ExhibitEnvelope;
use crate::error::Error;

/// How payload bytes are framed on the wire.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Framing {
    /// Bare text record payload: status byte, language code, text.
    #[default]
    Payload,
    /// Text record inside an NDEF message inside an NDEF TLV.
    Message,
}

// Messages sent TO the WebSocket client
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OutgoingMessage {
    Status {
        ready: bool,
        default_language: String,
    },
    TagEncoded {
        request_id: Option<String>,
        payload: String,
    },
    TagDecoded {
        request_id: Option<String>,
        envelope: ExhibitEnvelope,
    },
    TextEncoded {
        request_id: Option<String>,
        payload: String,
    },
    TextDecoded {
        request_id: Option<String>,
        text: String,
        language: String,
        encoding: String,
    },
    CodecError {
        request_id: Option<String>,
        kind: String,
        error: String,
    },
}

impl OutgoingMessage {
    pub fn codec_error(request_id: Option<String>, err: &Error) -> Self {
        OutgoingMessage::CodecError {
            request_id,
            kind: err.kind().as_str().to_string(),
            error: err.to_string(),
        }
    }
}

// Messages received FROM the WebSocket client. Payloads travel as hex.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IncomingMessage {
    GetStatus,
    EncodeTag {
        envelope: ExhibitEnvelope,
        #[serde(default)]
        language: Option<String>,
        #[serde(default)]
        framing: Framing,
        #[serde(default)]
        request_id: Option<String>,
    },
    DecodeTag {
        payload: String,
        #[serde(default)]
        framing: Framing,
        #[serde(default)]
        request_id: Option<String>,
    },
    EncodeText {
        text: String,
        #[serde(default)]
        language: Option<String>,
        #[serde(default)]
        framing: Framing,
        #[serde(default)]
        request_id: Option<String>,
    },
    DecodeText {
        payload: String,
        #[serde(default)]
        framing: Framing,
        #[serde(default)]
        request_id: Option<String>,
    },
}

// Internal commands sent from WS Server -> codec worker
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecCommand {
    CheckStatus,
    EncodeTag {
        request_id: Option<String>,
        envelope: ExhibitEnvelope,
        language: Option<String>,
        framing: Framing,
    },
    DecodeTag {
        request_id: Option<String>,
        payload_hex: String,
        framing: Framing,
    },
    EncodeText {
        request_id: Option<String>,
        text: String,
        language: Option<String>,
        framing: Framing,
    },
    DecodeText {
        request_id: Option<String>,
        payload_hex: String,
        framing: Framing,
    },
}

impl From<IncomingMessage> for CodecCommand {
    fn from(msg: IncomingMessage) -> Self {
        match msg {
            IncomingMessage::GetStatus => CodecCommand::CheckStatus,
            IncomingMessage::EncodeTag {
                envelope,
                language,
                framing,
                request_id,
            } => CodecCommand::EncodeTag {
                request_id,
                envelope,
                language,
                framing,
            },
            IncomingMessage::DecodeTag {
                payload,
                framing,
                request_id,
            } => CodecCommand::DecodeTag {
                request_id,
                payload_hex: payload,
                framing,
            },
            IncomingMessage::EncodeText {
                text,
                language,
                framing,
                request_id,
            } => CodecCommand::EncodeText {
                request_id,
                text,
                language,
                framing,
            },
            IncomingMessage::DecodeText {
                payload,
                framing,
                request_id,
            } => CodecCommand::DecodeText {
                request_id,
                payload_hex: payload,
                framing,
            },
        }
    }
}
