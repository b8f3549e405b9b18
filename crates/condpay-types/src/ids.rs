//! Identifiers used throughout CondPay.
//!
//! Accounts are raw ed25519 public keys (32 bytes), so a holder identity is
//! also the key its transfer authorizations verify against. Events and remote
//! addresses are opaque 32-byte values; the all-zero value is reserved as
//! nil in both cases.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// EventId
// ---------------------------------------------------------------------------

/// Identifier of a resolvable event. The all-zero value is reserved and never
/// names a real event — it doubles as the "no such event" marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct EventId(pub [u8; 32]);

impl EventId {
    #[must_use]
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Derive an event id from a human-readable label (SHA-256).
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(b"condpay:event_id:v1:");
        hasher.update(label.as_bytes());
        Self(hasher.finalize().into())
    }

    /// The reserved all-zero id.
    #[must_use]
    pub fn nil() -> Self {
        Self([0u8; 32])
    }

    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0 == [0u8; 32]
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "event:{}", hex::encode(&self.0[..8]))
    }
}

// ---------------------------------------------------------------------------
// AccountId
// ---------------------------------------------------------------------------

/// Identity of a holder, oracle signer, or owner.
/// This is the raw ed25519 public key (32 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct AccountId(pub [u8; 32]);

impl AccountId {
    #[must_use]
    pub fn from_pubkey(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// The reserved all-zero identity.
    #[must_use]
    pub fn nil() -> Self {
        Self([0u8; 32])
    }

    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0 == [0u8; 32]
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    #[must_use]
    pub fn short(&self) -> String {
        hex::encode(&self.0[..4])
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "acct:{}", hex::encode(&self.0[..8]))
    }
}

// ---------------------------------------------------------------------------
// DomainId
// ---------------------------------------------------------------------------

/// A settlement domain — an execution context reachable only through the
/// bridge, where a payout is finally credited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct DomainId(pub u32);

impl fmt::Display for DomainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "domain:{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// RemoteAddress
// ---------------------------------------------------------------------------

/// A destination address on a settlement domain. Opaque to the ledger;
/// the all-zero value is nil and never a valid payout destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct RemoteAddress(pub [u8; 32]);

impl RemoteAddress {
    #[must_use]
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub fn nil() -> Self {
        Self([0u8; 32])
    }

    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0 == [0u8; 32]
    }
}

impl fmt::Display for RemoteAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "addr:{}", hex::encode(&self.0[..8]))
    }
}

// ---------------------------------------------------------------------------
// DispatchId
// ---------------------------------------------------------------------------

/// Handle returned by the bridge for one outbound cross-domain transfer.
/// Uses UUIDv7 for time-ordered sorting of dispatch logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct DispatchId(pub Uuid);

impl DispatchId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for DispatchId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DispatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "dispatch:{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_id_nil_detection() {
        assert!(EventId::nil().is_nil());
        assert!(!EventId::from_label("world-cup-final").is_nil());
    }

    #[test]
    fn event_id_from_label_deterministic() {
        let a = EventId::from_label("rain-on-tuesday");
        let b = EventId::from_label("rain-on-tuesday");
        assert_eq!(a, b);
        assert_ne!(a, EventId::from_label("rain-on-wednesday"));
    }

    #[test]
    fn account_id_nil_detection() {
        assert!(AccountId::nil().is_nil());
        assert!(!AccountId::from_pubkey([7u8; 32]).is_nil());
    }

    #[test]
    fn dispatch_id_uniqueness() {
        let a = DispatchId::new();
        let b = DispatchId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn dispatch_id_ordering() {
        let a = DispatchId::new();
        let b = DispatchId::new();
        assert!(a < b);
    }

    #[test]
    fn display_formats() {
        let event = EventId::from_bytes([0xab; 32]);
        assert_eq!(format!("{event}"), "event:abababababababab");
        let domain = DomainId(7);
        assert_eq!(format!("{domain}"), "domain:7");
    }

    #[test]
    fn serde_roundtrips() {
        let eid = EventId::from_label("x");
        let json = serde_json::to_string(&eid).unwrap();
        let back: EventId = serde_json::from_str(&json).unwrap();
        assert_eq!(eid, back);

        let did = DispatchId::new();
        let json = serde_json::to_string(&did).unwrap();
        let back: DispatchId = serde_json::from_str(&json).unwrap();
        assert_eq!(did, back);
    }
}
