//! Conversation message data model
//!
//! Messages are ordered, immutable-once-finalized records owned by the
//! session. Each message carries a sortable ulid identifier, a role, and
//! an ordered list of parts (text runs and file references).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use ulid::Ulid;

use crate::session::attachments::Attachment;

/// Unique, lexicographically sortable message identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub Ulid);

impl MessageId {
    /// Generate a fresh identifier
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for MessageId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Who authored a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One piece of message content
///
/// A message's content is an ordered list of parts. Assistant messages
/// accumulate parts as deltas arrive; user messages carry their text plus
/// any attachments the user added.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Part {
    /// A run of text
    Text { text: String },
    /// A file reference (data URL for outgoing attachments, remote URL for
    /// files emitted by the provider)
    File {
        url: String,
        filename: String,
        #[serde(rename = "mediaType")]
        media_type: String,
    },
}

/// A single conversation message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub role: Role,
    pub parts: Vec<Part>,
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// Create a user message from text and attachments
    ///
    /// Attachments become `File` parts after the text part, mirroring the
    /// order they are sent on the wire.
    pub fn user(text: impl Into<String>, attachments: &[Attachment]) -> Self {
        let text = text.into();
        let mut parts = Vec::with_capacity(1 + attachments.len());
        if !text.is_empty() {
            parts.push(Part::Text { text });
        }
        for att in attachments {
            parts.push(Part::File {
                url: att.url.clone(),
                filename: att.filename.clone(),
                media_type: att.media_type.clone(),
            });
        }
        Self {
            id: MessageId::new(),
            role: Role::User,
            parts,
            created_at: Utc::now(),
        }
    }

    /// Create an empty assistant message that deltas will be folded into
    pub fn assistant_placeholder() -> Self {
        Self {
            id: MessageId::new(),
            role: Role::Assistant,
            parts: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Concatenated text content of the message (file parts skipped)
    pub fn text(&self) -> String {
        let mut out = String::new();
        for part in &self.parts {
            if let Part::Text { text } = part {
                out.push_str(text);
            }
        }
        out
    }

    /// Fold a text delta into the message
    ///
    /// Extends the trailing text part when there is one, so consecutive
    /// deltas concatenate into a single run.
    pub fn append_text_delta(&mut self, delta: &str) {
        if let Some(Part::Text { text }) = self.parts.last_mut() {
            text.push_str(delta);
        } else {
            self.parts.push(Part::Text {
                text: delta.to_string(),
            });
        }
    }

    pub fn is_user(&self) -> bool {
        self.role == Role::User
    }

    pub fn is_assistant(&self) -> bool {
        self.role == Role::Assistant
    }
}

/// What the user hands to `send`: text plus validated attachments
#[derive(Debug, Clone, Default)]
pub struct UserInput {
    pub text: String,
    pub attachments: Vec<Attachment>,
}

impl UserInput {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            attachments: Vec::new(),
        }
    }

    pub fn with_attachments(text: impl Into<String>, attachments: Vec<Attachment>) -> Self {
        Self {
            text: text.into(),
            attachments,
        }
    }

    /// Rebuild the input that produced a user message, optionally replacing
    /// its text. Used by edit-and-resend and regenerate, which re-issue a
    /// prior user turn with the original attachments intact.
    pub fn from_message(message: &Message, new_text: Option<String>) -> Self {
        let text = new_text.unwrap_or_else(|| message.text());
        let attachments = message
            .parts
            .iter()
            .filter_map(|part| match part {
                Part::File {
                    url,
                    filename,
                    media_type,
                } => Some(Attachment {
                    filename: filename.clone(),
                    media_type: media_type.clone(),
                    url: url.clone(),
                }),
                Part::Text { .. } => None,
            })
            .collect();
        Self { text, attachments }
    }

    /// True when there is nothing to send: blank text and no files
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty() && self.attachments.is_empty()
    }
}
