// src/envelope.rs
//! Exhibit metadata envelope carried as JSON inside a text record.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::SchemaError;

/// Keys in canonical order.
pub const FIELDS: [&str; 6] = ["ID", "Title", "Body", "URL", "ImageLink", "VideoLink"];

/// Display content for one exhibit. Link fields are opaque strings.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ExhibitEnvelope {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Body")]
    pub body: String,
    #[serde(rename = "URL")]
    pub url: String,
    #[serde(rename = "ImageLink")]
    pub image_link: String,
    #[serde(rename = "VideoLink")]
    pub video_link: String,
}

impl ExhibitEnvelope {
    pub fn new(id: impl Into<String>, title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            body: body.into(),
            ..Self::default()
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn with_image_link(mut self, image_link: impl Into<String>) -> Self {
        self.image_link = image_link.into();
        self
    }

    pub fn with_video_link(mut self, video_link: impl Into<String>) -> Self {
        self.video_link = video_link.into();
        self
    }
}

/// Canonical JSON: all six keys, in [`FIELDS`] order, string values.
pub fn serialize(envelope: &ExhibitEnvelope) -> String {
    serde_json::to_string(envelope).expect("envelope of six strings always serializes")
}

/// Parse an envelope. Keys may come in any order and unknown keys are
/// ignored, but all six must be present and hold strings.
pub fn parse(json: &str) -> Result<ExhibitEnvelope, SchemaError> {
    let value: Value =
        serde_json::from_str(json).map_err(|e| SchemaError::InvalidJson(e.to_string()))?;

    let Value::Object(object) = value else {
        return Err(SchemaError::NotAnObject);
    };

    for field in FIELDS {
        if !object.contains_key(field) {
            return Err(SchemaError::MissingField(field));
        }
    }

    Ok(ExhibitEnvelope {
        id: string_field(&object, "ID")?,
        title: string_field(&object, "Title")?,
        body: string_field(&object, "Body")?,
        url: string_field(&object, "URL")?,
        image_link: string_field(&object, "ImageLink")?,
        video_link: string_field(&object, "VideoLink")?,
    })
}

fn string_field(object: &Map<String, Value>, field: &'static str) -> Result<String, SchemaError> {
    match object.get(field) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Err(SchemaError::FieldType {
            field,
            found: json_type(other),
        }),
        None => Err(SchemaError::MissingField(field)),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
