//! Adapters that live inside the domain crate for convenience.
//!
//! The in-memory store backs unit tests and the demo CLI. Durable stores
//! implement `MemberStore` in their own crates.

pub mod memory_store;
