//! Distributed Read-through Cache Library
//!
//! This library crate defines the modules that make up a cache node.
//! It serves as the foundation for the binary executable (`main.rs`).
//!
//! ## Architecture Modules
//! The system is composed of three subsystems:
//!
//! - **`storage`**: Per-node storage. A byte-budgeted LRU cache behind a mutex, holding
//!   immutable `ByteView` values.
//! - **`group`**: Named cache namespaces. A `Group` answers lookups from its cache, collapses
//!   concurrent misses into one load, and routes each miss to the key's owning node.
//! - **`peers`**: The routing and transport layer. A consistent hash ring assigns keys to nodes,
//!   and an HTTP pool fetches from (and serves to) other nodes.

pub mod error;
pub mod group;
pub mod peers;
pub mod storage;

pub use error::{Error, Result};
pub use group::getter::{Getter, GetterFn};
pub use group::group::{Group, GroupBuilder};
pub use group::registry::GroupRegistry;
pub use peers::handlers::peer_router;
pub use peers::pool::{HttpPool, PoolOptions};
pub use peers::types::{PeerGetter, PeerPicker};
pub use storage::byteview::ByteView;
