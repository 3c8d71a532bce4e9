//! HTTP Peer Pool
//!
//! Owns the consistent hash ring and one HTTP client handle per peer. Both
//! are swapped together by [`HttpPool::set`], so a lookup never sees a ring
//! that points at a peer without a client.

use super::partitioner::{HashFn, HashRing};
use super::protocol::{
    DEFAULT_BASE_PATH, DEFAULT_REPLICAS, FetchRequest, FetchResponse, normalize_base_path,
};
use super::types::{PeerGetter, PeerPicker};
use crate::error::{Error, Result};

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// Tunables for an [`HttpPool`].
#[derive(Clone)]
pub struct PoolOptions {
    /// Prefix for peer requests, e.g. `/_peercache/`.
    pub base_path: String,
    /// Virtual replicas per peer.
    pub replicas: usize,
    /// Ring hash; `None` selects the default xxh32.
    pub hash: Option<HashFn>,
    /// Per-request deadline for peer fetches. `None` waits indefinitely.
    pub request_timeout: Option<Duration>,
}

impl Default for PoolOptions {
    fn default() -> Self {
        Self {
            base_path: DEFAULT_BASE_PATH.to_string(),
            replicas: DEFAULT_REPLICAS,
            hash: None,
            request_timeout: None,
        }
    }
}

#[derive(Default)]
struct PeerSet {
    ring: Option<HashRing>,
    getters: HashMap<String, Arc<HttpGetter>>,
}

pub struct HttpPool {
    /// This node's own base URL, e.g. `http://10.0.0.1:8001`.
    self_addr: String,
    base_path: String,
    replicas: usize,
    hash: Option<HashFn>,
    request_timeout: Option<Duration>,
    http_client: reqwest::Client,
    peers: Mutex<PeerSet>,
}

impl HttpPool {
    pub fn new(self_addr: impl Into<String>) -> Arc<Self> {
        Self::with_options(self_addr, PoolOptions::default())
    }

    pub fn with_options(self_addr: impl Into<String>, options: PoolOptions) -> Arc<Self> {
        let self_addr: String = self_addr.into();
        Arc::new(Self {
            self_addr: self_addr.trim_end_matches('/').to_string(),
            base_path: normalize_base_path(&options.base_path),
            replicas: options.replicas,
            hash: options.hash,
            request_timeout: options.request_timeout,
            http_client: reqwest::Client::new(),
            peers: Mutex::new(PeerSet::default()),
        })
    }

    pub fn self_addr(&self) -> &str {
        &self.self_addr
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// Replaces the whole peer set. Previous ring and clients are discarded.
    pub fn set<I, S>(&self, peers: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let peers: Vec<String> = peers
            .into_iter()
            .map(|peer| peer.as_ref().trim_end_matches('/').to_string())
            .collect();

        let mut ring = HashRing::new(self.replicas, self.hash.clone());
        ring.add(&peers);

        let getters = peers
            .iter()
            .map(|peer| {
                let getter = HttpGetter {
                    base_url: format!("{}{}", peer, self.base_path),
                    http_client: self.http_client.clone(),
                    timeout: self.request_timeout,
                };
                (peer.clone(), Arc::new(getter))
            })
            .collect();

        let mut set = self.peers.lock();
        *set = PeerSet {
            ring: Some(ring),
            getters,
        };

        tracing::info!(server = %self.self_addr, "Peer set updated: {} peer(s)", peers.len());
    }

    /// Address of the peer owning `key`, including this node itself.
    pub fn owner_of(&self, key: &str) -> Option<String> {
        let set = self.peers.lock();
        set.ring.as_ref()?.get(key).map(str::to_string)
    }
}

impl PeerPicker for HttpPool {
    fn pick_peer(&self, key: &str) -> Option<Arc<dyn PeerGetter>> {
        let set = self.peers.lock();
        let owner = set.ring.as_ref()?.get(key)?;
        if owner == self.self_addr {
            return None;
        }

        tracing::info!(server = %self.self_addr, "Pick peer {}", owner);
        let getter = set.getters.get(owner)?;
        Some(getter.clone() as Arc<dyn PeerGetter>)
    }
}

impl std::fmt::Debug for HttpPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpPool")
            .field("self_addr", &self.self_addr)
            .field("base_path", &self.base_path)
            .field("replicas", &self.replicas)
            .finish()
    }
}

/// Fetches values from one remote peer.
#[derive(Debug, Clone)]
pub struct HttpGetter {
    base_url: String,
    http_client: reqwest::Client,
    timeout: Option<Duration>,
}

impl HttpGetter {
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl PeerGetter for HttpGetter {
    async fn get(&self, req: &FetchRequest) -> Result<FetchResponse> {
        let url = format!("{}{}", self.base_url, req.path());

        let mut request = self.http_client.get(url);
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }
        let response = request.send().await?;

        if response.status() != reqwest::StatusCode::OK {
            return Err(Error::Peer(format!("bad status: {}", response.status())));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| Error::Peer(format!("reading response body: {}", e)))?;

        FetchResponse::decode(&body)
    }
}
