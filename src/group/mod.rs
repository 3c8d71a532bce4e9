//! Cache Group Module
//!
//! A group is a named cache namespace: a local LRU, a user-supplied getter for
//! misses, and an optional peer picker that routes keys to their owning node.
//!
//! ## Request Lifecycle
//! 1. **Lookup**: `Group::get` answers from the local `SyncCache` when it can.
//! 2. **Coalescing**: Misses go through a `FlightGroup`, so concurrent misses for one key share a single load.
//! 3. **Routing**: If a peer picker names a remote owner, the value is fetched from that peer.
//! 4. **Fallback**: Otherwise, or if the peer fetch fails, the getter runs locally and the result is cached.
//!
//! ## Submodules
//! - **`getter`**: The loader callback trait and its closure adapter.
//! - **`flight`**: Duplicate suppression for in-flight loads.
//! - **`group`**: The orchestrator itself plus its builder.
//! - **`registry`**: Name -> group lookup used by the peer server.

pub mod flight;
pub mod getter;
pub mod group;
pub mod registry;
