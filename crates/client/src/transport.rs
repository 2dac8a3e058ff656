use std::sync::Arc;

use {
    anyhow::Result,
    async_trait::async_trait,
    confab_config::ChannelConfig,
    confab_protocol::{OutboundMessage, RawMessage, SnapshotPayload},
    tokio::sync::mpsc,
};

/// Sender half of the live delivery feed, handed to the transport at open.
pub type LiveSender = mpsc::UnboundedSender<RawMessage>;

/// Receiver half of the live delivery feed, owned by the session controller.
pub type LiveReceiver = mpsc::UnboundedReceiver<RawMessage>;

/// Connects to the chat backend. Implementations own the wire protocol;
/// the sync engine only sees raw records and the calls below.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Open a session for the configured channel. The returned session must
    /// already be subscribed: live records flow into `live_tx` from before
    /// this returns, so nothing delivered around the snapshot request can
    /// be missed. Dropping `live_tx` ends the session's live feed.
    async fn open(
        &self,
        config: &ChannelConfig,
        live_tx: LiveSender,
    ) -> Result<Arc<dyn TransportSession>>;
}

/// An open backend session.
#[async_trait]
pub trait TransportSession: Send + Sync {
    /// One-shot fetch of every record the channel has retained.
    async fn initial_messages(&self) -> Result<SnapshotPayload>;

    /// Deliver a visitor message upstream.
    async fn send_message(&self, message: OutboundMessage) -> Result<()>;
}
