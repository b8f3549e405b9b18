//! Event model: a real-world outcome attested by an M-of-N oracle set.
//!
//! ## State Machine
//!
//! ```text
//!   ┌──────┐  resolve (M distinct signers)  ┌──────────┐
//!   │ OPEN ├───────────────────────────────▶│ RESOLVED │
//!   └──────┘                                └──────────┘
//! ```
//!
//! `Open → Resolved` happens exactly once and is irreversible. Events are
//! never destroyed.

use serde::{Deserialize, Serialize};

use crate::constants::MAX_SIGNERS_PER_EVENT;
use crate::{AccountId, CondpayError, EventId, Result};

/// An event definition with its oracle set and resolution state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// Event identifier. Never nil.
    pub id: EventId,
    /// Authorized oracle signers. Non-empty, no duplicates, no nil members.
    pub signers: Vec<AccountId>,
    /// Minimum distinct authorized attestations required to resolve.
    /// Always in `1..=signers.len()`.
    pub threshold: usize,
    /// Whether the event has resolved. Irreversible once `true`.
    pub resolved: bool,
    /// Opaque outcome payload stored verbatim at resolution time.
    pub resolution_payload: Vec<u8>,
}

impl Event {
    /// Validate and construct a new event in the Open state.
    ///
    /// # Errors
    /// - [`CondpayError::DuplicateEvent`] if `id` is the reserved nil value
    /// - [`CondpayError::InvalidSignerSet`] for empty sets, nil members,
    ///   duplicate members, or more than [`MAX_SIGNERS_PER_EVENT`] members
    /// - [`CondpayError::InvalidThreshold`] if `threshold` is zero or
    ///   exceeds the signer count
    pub fn new(id: EventId, signers: Vec<AccountId>, threshold: usize) -> Result<Self> {
        if id.is_nil() {
            // Nil doubles as the "uncreated" marker, so it can never be created.
            return Err(CondpayError::DuplicateEvent(id));
        }
        if signers.is_empty() {
            return Err(CondpayError::InvalidSignerSet {
                reason: "signer set is empty".into(),
            });
        }
        if signers.len() > MAX_SIGNERS_PER_EVENT {
            return Err(CondpayError::InvalidSignerSet {
                reason: format!(
                    "{} signers exceeds limit of {MAX_SIGNERS_PER_EVENT}",
                    signers.len()
                ),
            });
        }
        for (i, signer) in signers.iter().enumerate() {
            if signer.is_nil() {
                return Err(CondpayError::InvalidSignerSet {
                    reason: format!("signer at index {i} is nil"),
                });
            }
            if signers[..i].contains(signer) {
                return Err(CondpayError::InvalidSignerSet {
                    reason: format!("duplicate signer {signer}"),
                });
            }
        }
        if threshold == 0 || threshold > signers.len() {
            return Err(CondpayError::InvalidThreshold {
                threshold,
                signer_count: signers.len(),
            });
        }

        Ok(Self {
            id,
            signers,
            threshold,
            resolved: false,
            resolution_payload: Vec::new(),
        })
    }

    /// Whether this identity is in the authorized oracle set.
    #[must_use]
    pub fn is_authorized(&self, signer: &AccountId) -> bool {
        self.signers.contains(signer)
    }

    /// Transition `Open → Resolved`, storing the payload verbatim.
    ///
    /// # Errors
    /// Returns [`CondpayError::AlreadyResolved`] if already resolved.
    pub fn mark_resolved(&mut self, payload: &[u8]) -> Result<()> {
        if self.resolved {
            return Err(CondpayError::AlreadyResolved(self.id));
        }
        self.resolved = true;
        self.resolution_payload = payload.to_vec();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signer(byte: u8) -> AccountId {
        AccountId::from_pubkey([byte; 32])
    }

    fn make_event() -> Event {
        Event::new(
            EventId::from_label("test-event"),
            vec![signer(1), signer(2), signer(3)],
            2,
        )
        .unwrap()
    }

    #[test]
    fn create_valid_event() {
        let event = make_event();
        assert!(!event.resolved);
        assert!(event.resolution_payload.is_empty());
        assert_eq!(event.threshold, 2);
    }

    #[test]
    fn nil_id_rejected() {
        let err = Event::new(EventId::nil(), vec![signer(1)], 1).unwrap_err();
        assert!(matches!(err, CondpayError::DuplicateEvent(_)));
    }

    #[test]
    fn empty_signers_rejected() {
        let err = Event::new(EventId::from_label("x"), vec![], 1).unwrap_err();
        assert!(matches!(err, CondpayError::InvalidSignerSet { .. }));
    }

    #[test]
    fn nil_signer_rejected() {
        let err =
            Event::new(EventId::from_label("x"), vec![signer(1), AccountId::nil()], 1).unwrap_err();
        assert!(matches!(err, CondpayError::InvalidSignerSet { .. }));
    }

    #[test]
    fn duplicate_signer_rejected() {
        let err =
            Event::new(EventId::from_label("x"), vec![signer(1), signer(1)], 1).unwrap_err();
        assert!(matches!(err, CondpayError::InvalidSignerSet { .. }));
    }

    #[test]
    fn zero_threshold_rejected() {
        let err = Event::new(EventId::from_label("x"), vec![signer(1)], 0).unwrap_err();
        assert!(matches!(err, CondpayError::InvalidThreshold { .. }));
    }

    #[test]
    fn oversized_threshold_rejected() {
        let err = Event::new(EventId::from_label("x"), vec![signer(1), signer(2)], 3).unwrap_err();
        assert!(matches!(
            err,
            CondpayError::InvalidThreshold {
                threshold: 3,
                signer_count: 2
            }
        ));
    }

    #[test]
    fn threshold_equal_to_signer_count_ok() {
        let event = Event::new(EventId::from_label("x"), vec![signer(1), signer(2)], 2).unwrap();
        assert_eq!(event.threshold, 2);
    }

    #[test]
    fn resolve_is_one_shot() {
        let mut event = make_event();
        event.mark_resolved(b"outcome:yes").unwrap();
        assert!(event.resolved);
        assert_eq!(event.resolution_payload, b"outcome:yes");

        let err = event.mark_resolved(b"outcome:no").unwrap_err();
        assert!(matches!(err, CondpayError::AlreadyResolved(_)));
        // First payload is final.
        assert_eq!(event.resolution_payload, b"outcome:yes");
    }

    #[test]
    fn authorization_membership() {
        let event = make_event();
        assert!(event.is_authorized(&signer(1)));
        assert!(!event.is_authorized(&signer(9)));
    }

    #[test]
    fn serde_roundtrip() {
        let event = make_event();
        let json = serde_json::to_string(&event).unwrap();
        let back: Event = serde_json::from_str(&json).unwrap();
        assert_eq!(event.id, back.id);
        assert_eq!(event.signers, back.signers);
        assert_eq!(event.threshold, back.threshold);
    }
}
