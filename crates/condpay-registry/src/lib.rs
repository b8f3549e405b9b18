//! # condpay-registry
//!
//! **Event Resolution Registry**: owns event definitions and oracle sets,
//! and is the sole authority on whether and how an event resolved.
//!
//! ## Architecture
//!
//! The registry is a leaf component. The ledger holds a read-only query
//! capability on it ([`EventRegistry::is_resolved`]); the registry never
//! references the ledger, keeping the dependency strictly one-directional.
//!
//! Per event, the state machine is `Uncreated → Open → Resolved`, with the
//! final transition requiring a threshold of distinct authorized oracle
//! signatures over one domain-separated digest.

pub mod registry;

pub use registry::EventRegistry;
