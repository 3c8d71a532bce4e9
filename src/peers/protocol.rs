//! Peer Network Protocol
//!
//! Defines the path layout and the envelopes exchanged between nodes.
//!
//! A peer lookup is a plain `GET {base_path}{group}/{key}` with both segments
//! percent-encoded. The response body is a `bincode`-encoded [`FetchResponse`].

use crate::error::Result;
use serde::{Deserialize, Serialize};

// --- Defaults ---

/// Path prefix reserved for node-to-node traffic.
pub const DEFAULT_BASE_PATH: &str = "/_peercache/";
/// Virtual replicas per peer on the hash ring.
pub const DEFAULT_REPLICAS: usize = 50;
/// Content type of a successful peer response.
pub const CONTENT_TYPE_OCTET_STREAM: &str = "application/octet-stream";

// --- Data Transfer Objects ---

/// Identifies one value on a peer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchRequest {
    /// Name of the group (cache namespace) on the remote node.
    pub group: String,
    /// The cache key.
    pub key: String,
}

impl FetchRequest {
    pub fn new(group: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            key: key.into(),
        }
    }

    /// Relative path of this request below the base path.
    pub fn path(&self) -> String {
        format!(
            "{}/{}",
            urlencoding::encode(&self.group),
            urlencoding::encode(&self.key)
        )
    }
}

/// Body of a successful peer response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchResponse {
    /// Raw value bytes as stored by the owning node.
    pub value: Vec<u8>,
}

impl FetchResponse {
    pub fn encode(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self> {
        Ok(bincode::deserialize(bytes)?)
    }
}

/// Normalizes a base path to the `/prefix/` form.
pub fn normalize_base_path(base_path: &str) -> String {
    let trimmed = base_path.trim_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        format!("/{}/", trimmed)
    }
}
