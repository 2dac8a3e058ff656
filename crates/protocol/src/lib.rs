//! Wire shapes of the confab chat backend.
//!
//! The backend delivers message records two ways: pushed over the live
//! subscription, and bundled in the one-shot snapshot response. Both carry
//! the same record shape; `key` identifies a logical message across sources.
//! Only the shapes are a contract here — the transport itself belongs to the
//! embedder.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

// ── Message kinds ────────────────────────────────────────────────────────────

pub mod kinds {
    pub const TEXT: &str = "text";
    pub const DIALOG: &str = "dialog";
    pub const BUTTON: &str = "button";
    pub const MEDIA: &str = "media";
    pub const HIDDEN: &str = "hidden";

    /// Kinds that carry conversational text and belong in the transcript.
    pub const DISPLAY_KINDS: &[&str] = &[TEXT, DIALOG];

    pub fn is_displayable(kind: &str) -> bool {
        DISPLAY_KINDS.contains(&kind)
    }
}

// ── Raw message record ───────────────────────────────────────────────────────

/// A message record exactly as the backend delivers it. Untrusted input:
/// any of the text fields may be missing, and re-deliveries of the same
/// `key` (possibly with changed fields) are normal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawMessage {
    pub key: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rich_text: Option<String>,
    /// Agent origin marker. The backend attaches this field (with any
    /// value, `null` included) to agent-authored records and omits it from
    /// visitor records, so presence is the signal. `None` means absent;
    /// an explicit `null` survives as `Some(Value::Null)`.
    #[serde(
        default,
        deserialize_with = "some_even_if_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub agent: Option<serde_json::Value>,
    pub timestamp: u64,
}

/// `Option<Value>` via derive folds JSON `null` into `None`, which would
/// erase the marker's presence. Deserializing the value directly and
/// wrapping keeps `null` distinct from absent.
fn some_even_if_null<'de, D>(deserializer: D) -> Result<Option<serde_json::Value>, D::Error>
where
    D: Deserializer<'de>,
{
    serde_json::Value::deserialize(deserializer).map(Some)
}

impl RawMessage {
    pub fn is_from_agent(&self) -> bool {
        self.agent.is_some()
    }
}

// ── Snapshot payload ─────────────────────────────────────────────────────────

/// Response of the snapshot call: every record the channel has retained,
/// keyed by message identity. Overlap with live-delivered records is
/// expected; reconciliation happens downstream.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SnapshotPayload {
    #[serde(default)]
    pub messages: HashMap<String, RawMessage>,
}

// ── Outbound payload ─────────────────────────────────────────────────────────

/// Payload of a visitor send. The backend accepts plain text only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutboundMessage {
    pub message: String,
}

impl OutboundMessage {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
