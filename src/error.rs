//! Error Types
//!
//! A single error enum shared by the cache, the group orchestrator and the
//! peer transport. It is `Clone` because one coalesced computation hands the
//! same result to every waiting caller.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Error {
    /// `Group::get` was called with an empty key.
    #[error("key is empty")]
    EmptyKey,

    /// The user-supplied getter failed. The message is passed through verbatim.
    #[error("{0}")]
    Loader(String),

    /// A group was built without a getter.
    #[error("getter is required to build group {0:?}")]
    MissingGetter(String),

    /// `register_peers` was called twice on the same group.
    #[error("peers already registered for group {0:?}")]
    PeersAlreadyRegistered(String),

    #[error("no such group: {0}")]
    NoSuchGroup(String),

    /// Connection error, bad status or unreadable body from a peer.
    #[error("peer request failed: {0}")]
    Peer(String),

    /// Envelope (de)serialization failure.
    #[error("codec error: {0}")]
    Codec(String),
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Loader(format!("{:#}", err))
    }
}

impl From<bincode::Error> for Error {
    fn from(err: bincode::Error) -> Self {
        Error::Codec(err.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Peer(err.to_string())
    }
}
