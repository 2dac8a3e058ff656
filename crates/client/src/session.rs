use std::sync::Arc;

use {
    confab_config::ConfigSource,
    confab_protocol::SnapshotPayload,
    tokio::sync::{OnceCell, RwLock, mpsc},
    tracing::{debug, info, warn},
};

use crate::{
    error::Error,
    message::ChatMessage,
    outbound::OutboundDispatcher,
    store::ConversationStore,
    transport::{Transport, TransportSession},
};

/// Lifecycle of a sync session, in order. `SnapshotLoaded` implies the
/// live subscription is still active — snapshot failure never regresses a
/// session out of `LiveSubscribed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SessionPhase {
    Uninitialized,
    AwaitingConfig,
    LiveSubscribed,
    SnapshotLoaded,
}

impl SessionPhase {
    /// Outbound sends are accepted from live subscription onward.
    pub fn is_ready(self) -> bool {
        self >= SessionPhase::LiveSubscribed
    }
}

/// Events sent from the session task to the embedder.
#[derive(Debug)]
pub enum SessionEvent {
    /// The session advanced to a new phase.
    Phase(SessionPhase),
    /// The conversation changed; re-read [`SessionHandle::view`].
    Updated,
    /// Config never arrived; the session will not start.
    ConfigFailed(String),
    /// The transport could not open a session.
    ConnectFailed(String),
    /// The snapshot was rejected. Live deliveries continue.
    SnapshotFailed(String),
}

/// Spawns and drives one conversation session in background tasks.
pub struct SessionController;

impl SessionController {
    /// Start a session: load config, open the transport (which subscribes
    /// to live deliveries), then fetch the snapshot without blocking the
    /// live feed. Returns immediately — progress arrives on `event_tx`,
    /// and the handle reads never block on the network.
    pub fn spawn(
        config_source: Arc<dyn ConfigSource>,
        transport: Arc<dyn Transport>,
        event_tx: mpsc::UnboundedSender<SessionEvent>,
    ) -> SessionHandle {
        let handle = SessionHandle {
            store: Arc::new(RwLock::new(ConversationStore::new())),
            phase: Arc::new(RwLock::new(SessionPhase::Uninitialized)),
            session: Arc::new(OnceCell::new()),
        };

        tokio::spawn(session_loop(
            config_source,
            transport,
            event_tx,
            handle.clone(),
        ));

        handle
    }
}

/// Cloneable read surface over a running session. All clones share the
/// same store; writes stay with the session task.
#[derive(Clone)]
pub struct SessionHandle {
    store: Arc<RwLock<ConversationStore>>,
    phase: Arc<RwLock<SessionPhase>>,
    session: Arc<OnceCell<Arc<dyn TransportSession>>>,
}

impl SessionHandle {
    /// Current transcript: displayable messages in display order.
    pub async fn view(&self) -> Vec<ChatMessage> {
        self.store.read().await.view()
    }

    pub async fn phase(&self) -> SessionPhase {
        *self.phase.read().await
    }

    /// Whether an outbound send would currently be accepted.
    pub async fn is_ready(&self) -> bool {
        self.phase().await.is_ready()
    }

    /// Total records held, including non-displayable kinds.
    pub async fn message_count(&self) -> usize {
        self.store.read().await.len()
    }

    /// Dispatcher for visitor sends over this session.
    pub fn dispatcher(&self) -> OutboundDispatcher {
        OutboundDispatcher::new(Arc::clone(&self.phase), Arc::clone(&self.session))
    }

    async fn set_phase(&self, next: SessionPhase, event_tx: &mpsc::UnboundedSender<SessionEvent>) {
        *self.phase.write().await = next;
        // Ignore send error — means the embedder dropped its receiver.
        let _ = event_tx.send(SessionEvent::Phase(next));
    }
}

/// One full session: config, subscribe, snapshot, then live until the
/// transport drops its end of the feed.
async fn session_loop(
    config_source: Arc<dyn ConfigSource>,
    transport: Arc<dyn Transport>,
    event_tx: mpsc::UnboundedSender<SessionEvent>,
    handle: SessionHandle,
) {
    let session_id = uuid::Uuid::new_v4();

    handle
        .set_phase(SessionPhase::AwaitingConfig, &event_tx)
        .await;

    let config = match config_source.load().await {
        Ok(config) => config,
        Err(e) => {
            let err = Error::ConfigUnavailable(e);
            warn!(session = %session_id, error = %err, "session cannot start");
            let _ = event_tx.send(SessionEvent::ConfigFailed(err.to_string()));
            return;
        },
    };

    // Subscribe before the snapshot request so records delivered while the
    // snapshot is in flight land in the feed instead of a gap.
    let (live_tx, mut live_rx) = mpsc::unbounded_channel();
    let session = match transport.open(&config, live_tx).await {
        Ok(session) => session,
        Err(e) => {
            let err = Error::Connect(e);
            warn!(session = %session_id, error = %err, "session cannot start");
            let _ = event_tx.send(SessionEvent::ConnectFailed(err.to_string()));
            return;
        },
    };
    // Ignore set error — the cell is fresh for each session task.
    let _ = handle.session.set(Arc::clone(&session));

    info!(session = %session_id, channel = ?config.channel_id, "live subscription active");
    handle
        .set_phase(SessionPhase::LiveSubscribed, &event_tx)
        .await;

    let mut snap_rx = spawn_snapshot_load(session, session_id);
    let mut snapshot_pending = true;

    loop {
        tokio::select! {
            raw = live_rx.recv() => {
                match raw {
                    Some(raw) => {
                        if raw.key.is_empty() {
                            warn!(session = %session_id, "dropping live record with empty key");
                            continue;
                        }
                        debug!(session = %session_id, key = %raw.key, kind = %raw.kind, "live record");
                        handle.store.write().await.upsert_one(ChatMessage::from_raw(&raw));
                        let _ = event_tx.send(SessionEvent::Updated);
                    },
                    None => {
                        debug!(session = %session_id, "live feed closed");
                        return;
                    },
                }
            },
            outcome = snap_rx.recv(), if snapshot_pending => {
                snapshot_pending = false;
                match outcome {
                    Some(Ok(snapshot)) => {
                        apply_snapshot(&handle, snapshot, session_id).await;
                        handle.set_phase(SessionPhase::SnapshotLoaded, &event_tx).await;
                        let _ = event_tx.send(SessionEvent::Updated);
                    },
                    Some(Err(e)) => {
                        let err = Error::SnapshotLoad(e);
                        warn!(session = %session_id, error = %err, "live feed continues without history");
                        let _ = event_tx.send(SessionEvent::SnapshotFailed(err.to_string()));
                    },
                    None => {
                        warn!(session = %session_id, "snapshot task dropped without reporting");
                        let _ = event_tx.send(SessionEvent::SnapshotFailed("snapshot task aborted".into()));
                    },
                }
            },
        }
    }
}

/// Fetch the snapshot in a background task so the live feed never waits on
/// it. The outcome comes back over a capacity-1 channel read by the
/// session loop.
fn spawn_snapshot_load(
    session: Arc<dyn TransportSession>,
    session_id: uuid::Uuid,
) -> mpsc::Receiver<anyhow::Result<SnapshotPayload>> {
    let (tx, rx) = mpsc::channel(1);
    tokio::spawn(async move {
        debug!(session = %session_id, "requesting snapshot");
        let outcome = session.initial_messages().await;
        let _ = tx.send(outcome).await;
    });
    rx
}

/// Normalize, order, and apply a snapshot batch under one write lock, so
/// a reader never observes it half-applied.
async fn apply_snapshot(handle: &SessionHandle, snapshot: SnapshotPayload, session_id: uuid::Uuid) {
    let mut batch: Vec<ChatMessage> = snapshot
        .messages
        .into_values()
        .filter(|raw| {
            if raw.key.is_empty() {
                warn!(session = %session_id, "dropping snapshot record with empty key");
                return false;
            }
            true
        })
        .map(|raw| ChatMessage::from_raw(&raw))
        .collect();
    // The wire map is unordered; fix the application order so insertion
    // seqs (the timestamp tiebreak) come out the same on every run.
    batch.sort_by(|a, b| (a.timestamp, &a.key).cmp(&(b.timestamp, &b.key)));

    let count = batch.len();
    handle.store.write().await.upsert_batch(batch);
    info!(session = %session_id, count, "snapshot applied");
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phases_order_matches_lifecycle() {
        assert!(SessionPhase::Uninitialized < SessionPhase::AwaitingConfig);
        assert!(SessionPhase::AwaitingConfig < SessionPhase::LiveSubscribed);
        assert!(SessionPhase::LiveSubscribed < SessionPhase::SnapshotLoaded);
    }

    #[test]
    fn readiness_starts_at_live_subscription() {
        assert!(!SessionPhase::Uninitialized.is_ready());
        assert!(!SessionPhase::AwaitingConfig.is_ready());
        assert!(SessionPhase::LiveSubscribed.is_ready());
        assert!(SessionPhase::SnapshotLoaded.is_ready());
    }
}
