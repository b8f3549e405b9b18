//! # condpay-types
//!
//! Shared types, errors, and configuration for the **CondPay** conditional
//! payout engine.
//!
//! This crate is the leaf dependency of the workspace — every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`EventId`], [`AccountId`], [`DomainId`], [`RemoteAddress`], [`DispatchId`], [`InstanceId`]
//! - **Event model**: [`Event`] (oracle set, threshold, resolution state)
//! - **Balance model**: [`BalanceEntry`], [`Asset`]
//! - **Signing utility**: domain-separated digests and [`Attestation`] verification
//! - **Configuration**: [`LedgerConfig`], [`ReceiverConfig`]
//! - **Errors**: [`CondpayError`] with `CP_ERR_` prefix codes
//! - **Constants**: system-wide limits

pub mod balance;
pub mod config;
pub mod constants;
pub mod error;
pub mod event;
pub mod ids;
pub mod signing;

// Re-export all primary types at crate root for ergonomic imports:
//   use condpay_types::{EventId, AccountId, BalanceEntry, ...};

pub use balance::*;
pub use config::*;
pub use error::*;
pub use event::*;
pub use ids::*;
pub use signing::*;

// Constants are accessed via `condpay_types::constants::FOO`
// (not re-exported to avoid name collisions).
