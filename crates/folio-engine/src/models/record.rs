use serde::{Deserialize, Serialize};

use crate::editing::Format;
use crate::models::{ComponentId, ParagraphKind};

/// Flat, serializable form of a paragraph.
///
/// Placeholder text is presentation state and is not part of the record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParagraphRecord {
    pub id: ComponentId,
    pub text: String,
    #[serde(default)]
    pub paragraph_type: ParagraphKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formats: Option<Vec<Format>>,
}

impl ParagraphRecord {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
