use {async_trait::async_trait, tracing::debug};

use crate::schema::ChannelConfig;

/// Produces the channel configuration a session needs before it can open
/// its transport. Implementations own caching and retry policy; the
/// session controller calls [`ConfigSource::load`] once per session and
/// either gets a config or reports the session unconfigured.
#[async_trait]
pub trait ConfigSource: Send + Sync {
    async fn load(&self) -> anyhow::Result<ChannelConfig>;
}

/// Fetches the channel's published configuration document over HTTP.
pub struct HttpConfigSource {
    client: reqwest::Client,
    url: String,
}

impl HttpConfigSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }

    /// Use a caller-supplied client (shared pools, custom timeouts).
    pub fn with_client(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl ConfigSource for HttpConfigSource {
    async fn load(&self) -> anyhow::Result<ChannelConfig> {
        debug!(url = %self.url, "fetching channel config");

        let resp = self
            .client
            .get(&self.url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("failed to fetch channel config: {e}"))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("channel config returned HTTP {status}: {body}");
        }

        let config: ChannelConfig = resp
            .json()
            .await
            .map_err(|e| anyhow::anyhow!("failed to parse channel config: {e}"))?;

        debug!(channel = ?config.channel_id, "fetched channel config");
        Ok(config)
    }
}

/// Hands out a fixed configuration. For embedders that already hold one,
/// and for tests.
pub struct StaticConfigSource {
    config: ChannelConfig,
}

impl StaticConfigSource {
    pub fn new(config: ChannelConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl ConfigSource for StaticConfigSource {
    async fn load(&self) -> anyhow::Result<ChannelConfig> {
        Ok(self.config.clone())
    }
}
