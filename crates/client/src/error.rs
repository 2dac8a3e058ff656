/// Errors the sync client surfaces to its embedder.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("channel config unavailable: {0}")]
    ConfigUnavailable(#[source] anyhow::Error),

    #[error("transport connect failed: {0}")]
    Connect(#[source] anyhow::Error),

    #[error("snapshot load failed: {0}")]
    SnapshotLoad(#[source] anyhow::Error),

    #[error("message send failed: {0}")]
    Send(#[source] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
