use std::sync::Arc;

use {
    confab_protocol::OutboundMessage,
    tokio::sync::{OnceCell, RwLock},
    tracing::debug,
};

use crate::{
    error::{Error, Result},
    session::SessionPhase,
    transport::TransportSession,
};

/// What became of a send request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// Accepted by the transport; the caller may clear its input.
    Sent,
    /// Empty input — dropped without touching the transport.
    EmptyInput,
    /// The session is not live yet — dropped without touching the transport.
    NotReady,
}

/// Sends visitor messages over the session's transport. Cheap to clone;
/// all clones share the session slot and phase.
#[derive(Clone)]
pub struct OutboundDispatcher {
    phase: Arc<RwLock<SessionPhase>>,
    session: Arc<OnceCell<Arc<dyn TransportSession>>>,
}

impl OutboundDispatcher {
    pub(crate) fn new(
        phase: Arc<RwLock<SessionPhase>>,
        session: Arc<OnceCell<Arc<dyn TransportSession>>>,
    ) -> Self {
        Self { phase, session }
    }

    /// Send `text` upstream, at most once. Empty input and a not-yet-live
    /// session are quiet no-ops reported through the outcome. A transport
    /// rejection comes back as [`Error::Send`]; the caller should keep its
    /// input so the visitor can retry.
    pub async fn send(&self, text: &str) -> Result<SendOutcome> {
        if text.is_empty() {
            return Ok(SendOutcome::EmptyInput);
        }
        if !self.phase.read().await.is_ready() {
            debug!("send before session is live; dropping");
            return Ok(SendOutcome::NotReady);
        }
        let Some(session) = self.session.get() else {
            debug!("send before transport session exists; dropping");
            return Ok(SendOutcome::NotReady);
        };

        session
            .send_message(OutboundMessage::new(text))
            .await
            .map_err(Error::Send)?;
        Ok(SendOutcome::Sent)
    }
}
