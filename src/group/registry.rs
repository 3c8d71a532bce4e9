//! Group Registry
//!
//! Maps group names to live [`Group`]s. The peer server resolves incoming
//! requests through it, and whoever composes a node owns it, so independent
//! registries (e.g. one per test) never see each other's groups.

use super::getter::Getter;
use super::group::Group;

use dashmap::DashMap;
use std::sync::Arc;

pub struct GroupRegistry {
    groups: DashMap<String, Arc<Group>>,
}

impl GroupRegistry {
    /// Creates a new, empty registry.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Creates a group and registers it under `name`.
    ///
    /// # Arguments
    /// * `name` - Namespace of the group; peers use it to address the group.
    /// * `cache_bytes` - Byte budget of the group's local cache.
    /// * `getter` - Loads values missing from every cache.
    pub fn new_group(
        &self,
        name: &str,
        cache_bytes: i64,
        getter: impl Getter + 'static,
    ) -> Arc<Group> {
        self.register(Group::new(name, cache_bytes, getter))
    }

    /// Registers an already built group. A group with the same name is replaced.
    pub fn register(&self, group: Group) -> Arc<Group> {
        let group = Arc::new(group);
        let name = group.name().to_string();

        if self.groups.insert(name.clone(), group.clone()).is_some() {
            tracing::warn!("Replaced existing group: {}", name);
        } else {
            tracing::info!("Registered group: {}", name);
        }

        group
    }

    /// Looks up a group by name. Unknown names yield `None`.
    pub fn get(&self, name: &str) -> Option<Arc<Group>> {
        self.groups.get(name).map(|entry| entry.value().clone())
    }

    /// Returns a list of all registered group names.
    pub fn names(&self) -> Vec<String> {
        self.groups
            .iter()
            .map(|entry| entry.key().clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl Default for GroupRegistry {
    fn default() -> Self {
        Self {
            groups: DashMap::new(),
        }
    }
}
