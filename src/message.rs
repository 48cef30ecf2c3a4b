// src/message.rs
//! NDEF message framing around the text record, and the Type 2 tag TLV
//! that carries the message on the card.

use crate::envelope::{self, ExhibitEnvelope};
use crate::error::{DecodeError, EncodeError, Result};
use crate::ndef::{self, NdefTextRecord};

// Header flags
const MB: u8 = 0x80; // Message Begin
const ME: u8 = 0x40; // Message End
const CF: u8 = 0x20; // Chunk Flag
const SR: u8 = 0x10; // Short Record
const IL: u8 = 0x08; // ID Length present
const TNF_MASK: u8 = 0x07;

const TLV_NULL: u8 = 0x00;
const TLV_NDEF: u8 = 0x03;
const TLV_TERMINATOR: u8 = 0xFE;
const TLV_LONG_LENGTH: u8 = 0xFF;
const MAX_TLV_LEN: usize = 0xFFFE;

pub const RTD_TEXT: &[u8] = b"T";

/// Type Name Format, the low 3 bits of the record header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tnf {
    Empty,
    WellKnown,
    Mime,
    AbsoluteUri,
    External,
    Unknown,
    Unchanged,
    Reserved,
}

impl Tnf {
    fn from_bits(bits: u8) -> Self {
        match bits & TNF_MASK {
            0 => Tnf::Empty,
            1 => Tnf::WellKnown,
            2 => Tnf::Mime,
            3 => Tnf::AbsoluteUri,
            4 => Tnf::External,
            5 => Tnf::Unknown,
            6 => Tnf::Unchanged,
            _ => Tnf::Reserved,
        }
    }

    fn bits(self) -> u8 {
        match self {
            Tnf::Empty => 0,
            Tnf::WellKnown => 1,
            Tnf::Mime => 2,
            Tnf::AbsoluteUri => 3,
            Tnf::External => 4,
            Tnf::Unknown => 5,
            Tnf::Unchanged => 6,
            Tnf::Reserved => 7,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NdefRecord {
    pub tnf: Tnf,
    pub record_type: Vec<u8>,
    pub id: Option<Vec<u8>>,
    pub payload: Vec<u8>,
}

impl NdefRecord {
    /// Well-known text record with an empty id.
    pub fn text(text: &str, language_code: &str) -> Result<Self, EncodeError> {
        Ok(Self {
            tnf: Tnf::WellKnown,
            record_type: RTD_TEXT.to_vec(),
            id: None,
            payload: ndef::encode(text, language_code)?,
        })
    }

    pub fn is_text(&self) -> bool {
        self.tnf == Tnf::WellKnown && self.record_type == RTD_TEXT
    }

    fn encode_into(&self, out: &mut Vec<u8>, mb: bool, me: bool) -> Result<(), EncodeError> {
        let type_len = field_len::<u8>("type", self.record_type.len())?;
        let id_len = match &self.id {
            Some(id) => Some(field_len::<u8>("id", id.len())?),
            None => None,
        };
        let payload_len = field_len::<u32>("payload", self.payload.len())?;

        let short = self.payload.len() <= u8::MAX as usize;

        let mut header = self.tnf.bits();
        if mb {
            header |= MB;
        }
        if me {
            header |= ME;
        }
        if short {
            header |= SR;
        }
        if self.id.is_some() {
            header |= IL;
        }

        out.push(header);
        out.push(type_len);
        if short {
            out.push(payload_len as u8);
        } else {
            out.extend_from_slice(&payload_len.to_be_bytes());
        }
        if let Some(len) = id_len {
            out.push(len);
        }
        out.extend_from_slice(&self.record_type);
        if let Some(id) = &self.id {
            out.extend_from_slice(id);
        }
        out.extend_from_slice(&self.payload);
        Ok(())
    }
}

fn field_len<T: TryFrom<usize>>(field: &'static str, len: usize) -> Result<T, EncodeError> {
    T::try_from(len).map_err(|_| EncodeError::FieldTooLong { field, len })
}

/// Serialize records into one NDEF message, setting MB on the first and ME
/// on the last.
pub fn encode_message(records: &[NdefRecord]) -> Result<Vec<u8>, EncodeError> {
    let mut message = Vec::new();
    for (i, record) in records.iter().enumerate() {
        record.encode_into(&mut message, i == 0, i == records.len() - 1)?;
    }
    Ok(message)
}

pub fn encode_text_message(text: &str, language_code: &str) -> Result<Vec<u8>, EncodeError> {
    encode_message(&[NdefRecord::text(text, language_code)?])
}

struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn take(&mut self, len: usize) -> Result<&'a [u8], DecodeError> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|&end| end <= self.data.len())
            .ok_or(DecodeError::TruncatedRecord)?;
        let bytes = &self.data[self.pos..end];
        self.pos = end;
        Ok(bytes)
    }

    fn byte(&mut self) -> Result<u8, DecodeError> {
        Ok(self.take(1)?[0])
    }

    fn is_empty(&self) -> bool {
        self.pos >= self.data.len()
    }
}

/// Parse the records of an NDEF message, stopping after the ME record.
pub fn parse_records(data: &[u8]) -> Result<Vec<NdefRecord>, DecodeError> {
    let mut records = Vec::new();
    let mut cursor = Cursor { data, pos: 0 };

    while !cursor.is_empty() {
        let header = cursor.byte()?;
        if header & CF != 0 {
            return Err(DecodeError::ChunkedRecord);
        }

        let type_len = cursor.byte()? as usize;

        // 1 byte for short records, 4 bytes big-endian otherwise
        let payload_len = if header & SR != 0 {
            cursor.byte()? as usize
        } else {
            let b = cursor.take(4)?;
            u32::from_be_bytes([b[0], b[1], b[2], b[3]]) as usize
        };

        let id_len = if header & IL != 0 {
            Some(cursor.byte()? as usize)
        } else {
            None
        };

        let record_type = cursor.take(type_len)?.to_vec();
        let id = match id_len {
            Some(len) => Some(cursor.take(len)?.to_vec()),
            None => None,
        };
        let payload = cursor.take(payload_len)?.to_vec();

        records.push(NdefRecord {
            tnf: Tnf::from_bits(header),
            record_type,
            id,
            payload,
        });

        if header & ME != 0 {
            break;
        }
    }

    Ok(records)
}

/// Decode the first well-known text record; other records are skipped.
pub fn first_text_record(records: &[NdefRecord]) -> Result<NdefTextRecord, DecodeError> {
    let record = records
        .iter()
        .find(|r| r.is_text())
        .ok_or(DecodeError::NoTextRecord)?;
    ndef::decode(&record.payload)
}

/// Wrap an NDEF message in an NDEF TLV followed by a terminator TLV.
pub fn wrap_in_tlv(message: &[u8]) -> Result<Vec<u8>, EncodeError> {
    let len = message.len();
    if len > MAX_TLV_LEN {
        return Err(EncodeError::RecordTooLarge { len });
    }

    let mut tlv = Vec::with_capacity(len + 5);
    tlv.push(TLV_NDEF);
    if len < TLV_LONG_LENGTH as usize {
        tlv.push(len as u8);
    } else {
        tlv.push(TLV_LONG_LENGTH);
        tlv.extend_from_slice(&(len as u16).to_be_bytes());
    }
    tlv.extend_from_slice(message);
    tlv.push(TLV_TERMINATOR);
    Ok(tlv)
}

/// Find the NDEF TLV in a tag memory dump and return its value.
pub fn unwrap_tlv(buffer: &[u8]) -> Result<&[u8], DecodeError> {
    let mut pos = 0;

    loop {
        let Some(&tag) = buffer.get(pos) else {
            return Err(DecodeError::NoNdefTlv);
        };

        match tag {
            TLV_NULL => {
                pos += 1;
                continue;
            }
            TLV_TERMINATOR => return Err(DecodeError::NoNdefTlv),
            _ => {}
        }

        let (len, value_start) = match buffer.get(pos + 1) {
            None => return Err(DecodeError::TruncatedTlv),
            Some(&TLV_LONG_LENGTH) => match buffer.get(pos + 2..pos + 4) {
                Some(b) => (u16::from_be_bytes([b[0], b[1]]) as usize, pos + 4),
                None => return Err(DecodeError::TruncatedTlv),
            },
            Some(&b) => (b as usize, pos + 2),
        };

        let value = buffer
            .get(value_start..value_start + len)
            .ok_or(DecodeError::TruncatedTlv)?;

        if tag == TLV_NDEF {
            return Ok(value);
        }
        pos = value_start + len;
    }
}

/// Text record -> NDEF message -> TLV, ready to write from block 4.
pub fn encode_text_tlv(text: &str, language_code: &str) -> Result<Vec<u8>, EncodeError> {
    wrap_in_tlv(&encode_text_message(text, language_code)?)
}

pub fn decode_text_tlv(buffer: &[u8]) -> Result<NdefTextRecord, DecodeError> {
    let records = parse_records(unwrap_tlv(buffer)?)?;
    first_text_record(&records)
}

pub fn encode_exhibit_message(envelope: &ExhibitEnvelope, language_code: &str) -> Result<Vec<u8>> {
    Ok(encode_text_tlv(&envelope::serialize(envelope), language_code)?)
}

pub fn decode_exhibit_message(buffer: &[u8]) -> Result<ExhibitEnvelope> {
    let record = decode_text_tlv(buffer)?;
    Ok(envelope::parse(record.text())?)
}
