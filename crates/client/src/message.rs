use {confab_protocol::RawMessage, serde::Serialize};

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Author {
    Agent,
    Visitor,
}

/// A message in canonical form, ready for display decisions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub key: String,
    /// First non-empty of the raw record's title, message, and rich text.
    /// `None` when the record carried no usable text.
    pub text: Option<String>,
    pub author: Author,
    pub timestamp: u64,
    pub kind: String,
}

impl ChatMessage {
    /// Normalize a raw record. Total: every well-formed [`RawMessage`]
    /// maps to a `ChatMessage`, displayable or not. Authorship comes from
    /// marker presence alone, so a `null`/`0`/`false` marker still reads
    /// as agent-sent.
    pub fn from_raw(raw: &RawMessage) -> Self {
        Self {
            key: raw.key.clone(),
            text: first_non_empty(&[&raw.title, &raw.message, &raw.rich_text]),
            author: if raw.is_from_agent() {
                Author::Agent
            } else {
                Author::Visitor
            },
            timestamp: raw.timestamp,
            kind: raw.kind.clone(),
        }
    }

    /// Whether this message belongs in the rendered transcript.
    pub fn is_displayable(&self) -> bool {
        confab_protocol::kinds::is_displayable(&self.kind)
    }
}

fn first_non_empty(candidates: &[&Option<String>]) -> Option<String> {
    candidates
        .iter()
        .find_map(|c| c.as_deref().filter(|s| !s.is_empty()).map(String::from))
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    fn raw(json: serde_json::Value) -> RawMessage {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn title_wins_over_message_and_rich_text() {
        let msg = ChatMessage::from_raw(&raw(serde_json::json!({
            "key": "m1", "type": "text", "timestamp": 1,
            "title": "T", "message": "M", "rich_text": "R",
        })));
        assert_eq!(msg.text.as_deref(), Some("T"));
    }

    #[test]
    fn empty_title_falls_through_to_message() {
        let msg = ChatMessage::from_raw(&raw(serde_json::json!({
            "key": "m1", "type": "text", "timestamp": 1,
            "title": "", "message": "M", "rich_text": "R",
        })));
        assert_eq!(msg.text.as_deref(), Some("M"));
    }

    #[test]
    fn rich_text_is_the_last_resort() {
        let msg = ChatMessage::from_raw(&raw(serde_json::json!({
            "key": "m1", "type": "dialog", "timestamp": 1,
            "rich_text": "R",
        })));
        assert_eq!(msg.text.as_deref(), Some("R"));
    }

    #[test]
    fn no_text_candidates_yields_none() {
        let msg = ChatMessage::from_raw(&raw(serde_json::json!({
            "key": "m1", "type": "text", "timestamp": 1,
            "title": "", "message": "",
        })));
        assert!(msg.text.is_none());
    }

    #[test]
    fn marker_presence_decides_author() {
        let agent = ChatMessage::from_raw(&raw(serde_json::json!({
            "key": "a", "type": "text", "timestamp": 1, "agent": {"id": 7},
        })));
        assert_eq!(agent.author, Author::Agent);

        let visitor = ChatMessage::from_raw(&raw(serde_json::json!({
            "key": "v", "type": "text", "timestamp": 1,
        })));
        assert_eq!(visitor.author, Author::Visitor);
    }

    #[test]
    fn falsy_marker_still_means_agent() {
        for marker in [
            serde_json::Value::Null,
            serde_json::json!(0),
            serde_json::json!(false),
        ] {
            let msg = ChatMessage::from_raw(&raw(serde_json::json!({
                "key": "a", "type": "text", "timestamp": 1, "agent": marker,
            })));
            assert_eq!(msg.author, Author::Agent);
        }
    }

    #[test]
    fn kind_and_timestamp_carry_through() {
        let msg = ChatMessage::from_raw(&raw(serde_json::json!({
            "key": "b", "type": "button", "timestamp": 42, "title": "Go",
        })));
        assert_eq!(msg.kind, "button");
        assert_eq!(msg.timestamp, 42);
        assert!(!msg.is_displayable());
    }
}
