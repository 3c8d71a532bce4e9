//! Local Storage Module
//!
//! The per-node storage used by every group.
//!
//! ## Core Concepts
//! - **`ByteView`**: Immutable snapshot of a cached value. Callers can read it or copy it, never mutate it.
//! - **`LruCache`**: Byte-budgeted cache evicting the least recently used entry first.
//! - **`SyncCache`**: Mutex-guarded, lazily built `LruCache` shared by concurrent requests.

pub mod byteview;
pub mod lru;
pub mod memory;
