//! Error types for the CondPay engine.
//!
//! All errors use the `CP_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Event / registry errors
//! - 2xx: Balance errors
//! - 3xx: Transfer authorization errors
//! - 4xx: Settlement errors
//! - 5xx: Custody / bridge errors
//! - 6xx: Receiver / admin errors
//! - 9xx: General / internal errors
//!
//! Every failure is whole-operation: callers observing an error can assume
//! state is exactly as it was before the call, with one documented exception
//! (nonce consumption on a failed transfer — see `condpay-ledger`).

use rust_decimal::Decimal;
use thiserror::Error;

use crate::{AccountId, DomainId, EventId};

/// Central error enum for all CondPay operations.
#[derive(Debug, Error)]
pub enum CondpayError {
    // =================================================================
    // Event / Registry Errors (1xx)
    // =================================================================
    /// The requested event does not exist in the registry.
    #[error("CP_ERR_100: Event not found: {0}")]
    EventNotFound(EventId),

    /// An event with this id already exists (or the id is the reserved nil).
    #[error("CP_ERR_101: Event already exists: {0}")]
    DuplicateEvent(EventId),

    /// The signer set failed validation (empty, nil member, or duplicate).
    #[error("CP_ERR_102: Invalid signer set: {reason}")]
    InvalidSignerSet { reason: String },

    /// The threshold is zero or exceeds the signer count.
    #[error("CP_ERR_103: Invalid threshold {threshold} for {signer_count} signers")]
    InvalidThreshold {
        threshold: usize,
        signer_count: usize,
    },

    /// The event has already been resolved; resolution is final.
    #[error("CP_ERR_104: Event already resolved: {0}")]
    AlreadyResolved(EventId),

    /// Fewer distinct authorized signatures than the threshold requires.
    #[error("CP_ERR_105: Threshold not met: need {needed} distinct signers, got {distinct}")]
    ThresholdNotMet { needed: usize, distinct: usize },

    /// The event has not been resolved yet.
    #[error("CP_ERR_106: Event not resolved: {0}")]
    NotResolved(EventId),

    // =================================================================
    // Balance Errors (2xx)
    // =================================================================
    /// The amount is zero or negative.
    #[error("CP_ERR_200: Amount must be positive")]
    NonPositiveAmount,

    /// The payout destination address is the reserved nil value.
    #[error("CP_ERR_201: Destination address is nil")]
    NilDestination,

    /// The recipient account is the reserved nil value.
    #[error("CP_ERR_202: Recipient account is nil")]
    NilRecipient,

    /// The holder's total balance for the event is below the requested amount.
    #[error("CP_ERR_203: Insufficient event balance: need {needed}, have {available}")]
    InsufficientEventBalance { needed: Decimal, available: Decimal },

    /// The (holder, event) position has reached the per-position entry cap.
    #[error("CP_ERR_204: Entry limit reached for position ({holder}, {event})")]
    EntryLimitReached { holder: AccountId, event: EventId },

    // =================================================================
    // Transfer Authorization Errors (3xx)
    // =================================================================
    /// The ed25519 signature did not verify against the holder's key and
    /// current nonce.
    #[error("CP_ERR_300: Transfer signature verification failed for {from}")]
    SignatureInvalid { from: AccountId },

    /// Settlement has been marked for this event; ownership is frozen.
    #[error("CP_ERR_301: Transfers closed: settlement marked for {0}")]
    TransferAfterMark(EventId),

    /// The event has resolved; positions can no longer change hands.
    #[error("CP_ERR_302: Transfers closed: event resolved: {0}")]
    TransferAfterResolution(EventId),

    // =================================================================
    // Settlement Errors (4xx)
    // =================================================================
    /// Settlement was already marked for this event (one-shot gate).
    #[error("CP_ERR_400: Settlement already marked: {0}")]
    AlreadyMarked(EventId),

    /// Per-holder settlement requires the settlement mark first.
    #[error("CP_ERR_401: Settlement not marked: {0}")]
    NotMarked(EventId),

    // =================================================================
    // Custody / Bridge Errors (5xx)
    // =================================================================
    /// The custody collaborator refused to lock funds.
    #[error("CP_ERR_500: Custody lock failed: need {needed}, have {available}")]
    CustodyLockFailed { needed: Decimal, available: Decimal },

    /// The custody collaborator refused to pay out.
    #[error("CP_ERR_501: Custody payout failed: {reason}")]
    CustodyPayFailed { reason: String },

    /// The bridge collaborator refused the outbound transfer.
    #[error("CP_ERR_502: Bridge dispatch failed: {reason}")]
    BridgeDispatchFailed { reason: String },

    // =================================================================
    // Receiver / Admin Errors (6xx)
    // =================================================================
    /// An inbound bridge message arrived from an untrusted origin.
    #[error("CP_ERR_600: Untrusted origin: {domain}, sender {sender_hex}")]
    UntrustedOrigin { domain: DomainId, sender_hex: String },

    /// An inbound bridge message body failed to decode.
    #[error("CP_ERR_601: Malformed bridge message: {0}")]
    MalformedMessage(String),

    /// The caller is not the owner of the administrative surface.
    #[error("CP_ERR_602: Not the owner: {0}")]
    NotOwner(AccountId),

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// Unrecoverable internal error.
    #[error("CP_ERR_900: Internal error: {0}")]
    Internal(String),

    /// Serialization / deserialization error.
    #[error("CP_ERR_901: Serialization error: {0}")]
    Serialization(String),
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, CondpayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_contains_prefix() {
        let err = CondpayError::EventNotFound(EventId::from_label("x"));
        let msg = format!("{err}");
        assert!(msg.starts_with("CP_ERR_100"), "Got: {msg}");
    }

    #[test]
    fn insufficient_balance_display() {
        let err = CondpayError::InsufficientEventBalance {
            needed: Decimal::new(120, 0),
            available: Decimal::new(100, 0),
        };
        let msg = format!("{err}");
        assert!(msg.contains("CP_ERR_203"));
        assert!(msg.contains("120"));
        assert!(msg.contains("100"));
    }

    #[test]
    fn threshold_not_met_display() {
        let err = CondpayError::ThresholdNotMet {
            needed: 2,
            distinct: 1,
        };
        let msg = format!("{err}");
        assert!(msg.contains("CP_ERR_105"));
        assert!(msg.contains("need 2"));
    }

    #[test]
    fn all_errors_have_cp_err_prefix() {
        let errors: Vec<Box<dyn std::error::Error>> = vec![
            Box::new(CondpayError::NonPositiveAmount),
            Box::new(CondpayError::NilDestination),
            Box::new(CondpayError::AlreadyMarked(EventId::nil())),
            Box::new(CondpayError::NotOwner(AccountId::nil())),
            Box::new(CondpayError::Internal("test".into())),
        ];
        for err in errors {
            let msg = format!("{err}");
            assert!(
                msg.starts_with("CP_ERR_"),
                "Error missing CP_ERR_ prefix: {msg}"
            );
        }
    }
}
