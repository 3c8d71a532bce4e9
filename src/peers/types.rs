use super::protocol::{FetchRequest, FetchResponse};
use crate::error::Result;

use async_trait::async_trait;
use std::sync::Arc;

/// Locates the peer that owns a key.
pub trait PeerPicker: Send + Sync {
    /// Returns a client for the owning peer, or `None` when the key should be
    /// loaded locally (this node owns it, or no peers are configured).
    fn pick_peer(&self, key: &str) -> Option<Arc<dyn PeerGetter>>;
}

/// Client side of the peer transport.
#[async_trait]
pub trait PeerGetter: Send + Sync {
    async fn get(&self, req: &FetchRequest) -> Result<FetchResponse>;
}
