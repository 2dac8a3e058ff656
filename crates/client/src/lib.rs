//! Conversation sync client for confab channels.
//!
//! Maintains one consistent transcript per session, merged from a one-shot
//! snapshot fetch and a continuous live subscription. The embedder supplies
//! a [`confab_config::ConfigSource`] and a [`Transport`]; the session
//! controller reconciles both delivery paths into a deduplicated,
//! timestamp-ordered view and reports progress over an event channel.
//! Rendering, input handling, and the wire protocol stay with the embedder.

pub mod error;
pub mod message;
pub mod outbound;
pub mod session;
pub mod store;
pub mod transport;

pub use {
    error::{Error, Result},
    message::{Author, ChatMessage},
    outbound::{OutboundDispatcher, SendOutcome},
    session::{SessionController, SessionEvent, SessionHandle, SessionPhase},
    store::ConversationStore,
    transport::{LiveReceiver, LiveSender, Transport, TransportSession},
};
