//! # condpay-settlement
//!
//! **Settlement Dispatcher**: converts resolved conditional balances into
//! outbound cross-domain transfers, plus the thin per-domain receiver that
//! credits payouts on the far side.
//!
//! ## Two-phase dispatch
//!
//! 1. [`SettlementDispatcher::mark_settlement`] — a one-shot gate, valid
//!    only after the registry reports the event resolved. Exactly one
//!    caller's attempt wins.
//! 2. [`SettlementDispatcher::settle_holder`] — per holder, repeatable:
//!    every nonzero entry becomes one [`Bridge::burn_and_route`] call and is
//!    zeroed immediately after, so retries after a partial bridge failure
//!    only reissue the remainder.
//!
//! Delivery is not awaited or verified here; the bridge's relaying process
//! carries the attestation to the [`RemoteReceiver`] out of band.

pub mod bridge;
pub mod dispatcher;
pub mod receiver;

pub use bridge::{Bridge, BridgeMessage, OutboundTransfer, RecordingBridge};
pub use dispatcher::{DispatchReceipt, SettlementDispatcher};
pub use receiver::RemoteReceiver;
