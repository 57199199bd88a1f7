use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque identity of one message; the only deduplication key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(String);

impl MessageId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MessageId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for MessageId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Sticker {
    pub id: Option<String>,
    pub name: Option<String>,
}

/// One extracted message. Missing substructure yields empty strings/lists.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RawMessageRecord {
    pub id: String,
    pub timestamp: String,
    pub username: String,
    pub content: String,
    pub attachments: Vec<String>,
    pub stickers: Vec<Sticker>,
}

/// JSON export shape: `{ "messages": [...] }`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MessagesDocument {
    pub messages: Vec<RawMessageRecord>,
}
