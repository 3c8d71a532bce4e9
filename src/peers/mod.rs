//! Peer Routing & Transport Module
//!
//! Decides which node owns a key and moves values between nodes over HTTP.
//! The peer set is supplied by the operator; there is no discovery protocol.
//!
//! ## Core Mechanisms
//! - **Consistent Hashing**: `HashRing` places every peer on a 32-bit ring many times (virtual replicas)
//!   so that adding or removing a peer only remaps the keys it owned.
//! - **Peer Picking**: `HttpPool` answers "who owns this key?" and hands back a client for that peer,
//!   or nothing when the owner is this node.
//! - **Transport**: `HttpGetter` fetches `GET {base_path}{group}/{key}` from a peer; `handlers` serves the
//!   same path from the local groups.

pub mod handlers;
pub mod partitioner;
pub mod pool;
pub mod protocol;
pub mod types;
