//! Channel configuration for the confab sync client.
//!
//! A published channel exposes its configuration as a JSON document. The
//! client obtains it once per session (usually over HTTP via
//! [`HttpConfigSource`]) and hands it to the transport; the sync engine
//! itself never interprets it.

pub mod schema;
pub mod source;

pub use {
    schema::ChannelConfig,
    source::{ConfigSource, HttpConfigSource, StaticConfigSource},
};
