use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Published channel configuration, fetched once per session.
///
/// The typed fields cover what the stock backend publishes today. `extra`
/// carries every other field through verbatim so a transport can read
/// settings this crate does not model; the document format stays
/// backward-compatible that way.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChannelConfig {
    /// Channel identifier issued at publish time.
    pub channel_id: Option<String>,
    /// Base URL of the realtime API the transport attaches to.
    pub api_url: Option<String>,
    /// Access token for the channel, when the backend requires one.
    pub token: Option<String>,
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_fields_survive_in_extra() {
        let cfg: ChannelConfig = serde_json::from_value(serde_json::json!({
            "channelId": "ch-42",
            "apiUrl": "https://realtime.confab.example",
            "welcomeFlow": { "start": "n1" },
            "locale": "en",
        }))
        .unwrap();

        assert_eq!(cfg.channel_id.as_deref(), Some("ch-42"));
        assert_eq!(cfg.extra["locale"], "en");
        assert!(cfg.extra["welcomeFlow"].is_object());

        let back = serde_json::to_value(&cfg).unwrap();
        assert_eq!(back["welcomeFlow"]["start"], "n1");
    }

    #[test]
    fn empty_document_is_a_valid_config() {
        let cfg: ChannelConfig = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(cfg.channel_id.is_none());
        assert!(cfg.extra.is_empty());
    }
}
