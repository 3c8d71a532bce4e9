//! Group Orchestrator
//!
//! Sequences a lookup: local cache -> coalesced load -> peer fetch or local
//! getter -> cache population.
//!
//! Values fetched from a remote owner are returned without being stored in
//! this node's cache. Only values produced by the local getter are cached
//! here.

use super::flight::FlightGroup;
use super::getter::Getter;
use crate::error::{Error, Result};
use crate::peers::protocol::FetchRequest;
use crate::peers::types::{PeerGetter, PeerPicker};
use crate::storage::byteview::ByteView;
use crate::storage::memory::SyncCache;

use std::sync::{Arc, OnceLock};

pub struct Group {
    name: String,
    getter: Arc<dyn Getter>,
    main_cache: SyncCache,
    peers: OnceLock<Arc<dyn PeerPicker>>,
    loader: FlightGroup<Result<ByteView>>,
}

impl Group {
    pub fn new(name: impl Into<String>, cache_bytes: i64, getter: impl Getter + 'static) -> Self {
        Self::from_parts(name.into(), cache_bytes, Arc::new(getter))
    }

    fn from_parts(name: String, cache_bytes: i64, getter: Arc<dyn Getter>) -> Self {
        Self {
            name,
            getter,
            main_cache: SyncCache::new(cache_bytes),
            peers: OnceLock::new(),
            loader: FlightGroup::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Local cache of this group.
    pub fn cache(&self) -> &SyncCache {
        &self.main_cache
    }

    /// Wires in the peer picker. A group's routing can only be set once.
    pub fn register_peers(&self, peers: Arc<dyn PeerPicker>) -> Result<()> {
        self.peers
            .set(peers)
            .map_err(|_| Error::PeersAlreadyRegistered(self.name.clone()))
    }

    pub async fn get(&self, key: &str) -> Result<ByteView> {
        if key.is_empty() {
            return Err(Error::EmptyKey);
        }

        if let Some(value) = self.main_cache.get(key) {
            tracing::debug!(group = %self.name, "Cache hit for {:?}", key);
            return Ok(value);
        }

        self.load(key).await
    }

    async fn load(&self, key: &str) -> Result<ByteView> {
        self.loader
            .work(key, move || async move {
                if let Some(peers) = self.peers.get()
                    && let Some(peer) = peers.pick_peer(key)
                {
                    match self.get_from_peer(peer.as_ref(), key).await {
                        Ok(value) => return Ok(value),
                        Err(e) => {
                            tracing::warn!(
                                group = %self.name,
                                "Failed to get {:?} from peer, loading locally: {}",
                                key,
                                e
                            );
                        }
                    }
                }

                self.get_locally(key).await
            })
            .await
    }

    async fn get_locally(&self, key: &str) -> Result<ByteView> {
        let bytes = self.getter.get(key).await?;
        // The getter hands over ownership of its buffer, so the view cannot alias it.
        let value = ByteView::from(bytes);
        self.populate_cache(key, value.clone());
        Ok(value)
    }

    async fn get_from_peer(&self, peer: &dyn PeerGetter, key: &str) -> Result<ByteView> {
        let req = FetchRequest::new(self.name.as_str(), key);
        let res = peer.get(&req).await?;
        Ok(ByteView::copy_from_slice(&res.value))
    }

    fn populate_cache(&self, key: &str, value: ByteView) {
        self.main_cache.add(key, value);
    }
}

impl std::fmt::Debug for Group {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Group")
            .field("name", &self.name)
            .field("cache", &self.main_cache)
            .field("peers_registered", &self.peers.get().is_some())
            .finish()
    }
}

/// Builds a [`Group`], reporting a missing getter as an error.
#[derive(Default)]
pub struct GroupBuilder {
    name: String,
    cache_bytes: i64,
    getter: Option<Arc<dyn Getter>>,
}

impl GroupBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Byte budget of the local cache. Zero or less means unbounded.
    pub fn cache_bytes(mut self, cache_bytes: i64) -> Self {
        self.cache_bytes = cache_bytes;
        self
    }

    pub fn getter(mut self, getter: impl Getter + 'static) -> Self {
        self.getter = Some(Arc::new(getter));
        self
    }

    pub fn build(self) -> Result<Group> {
        let getter = self
            .getter
            .ok_or_else(|| Error::MissingGetter(self.name.clone()))?;
        Ok(Group::from_parts(self.name, self.cache_bytes, getter))
    }
}
