//! Deployment configuration.
//!
//! Each registry, ledger, and receiver deployment carries an [`InstanceId`]
//! that is mixed into every digest it checks, so signed messages are bound
//! to one deployment and cannot be replayed against another.

use serde::{Deserialize, Serialize};

use crate::{AccountId, Asset, DomainId};

/// Identity of one deployed component instance (32 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InstanceId(pub [u8; 32]);

impl InstanceId {
    #[must_use]
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Derive an instance id from a human-readable deployment label (SHA-256).
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(b"condpay:instance:v1:");
        hasher.update(label.as_bytes());
        Self(hasher.finalize().into())
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl std::fmt::Display for InstanceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "instance:{}", hex::encode(&self.0[..8]))
    }
}

/// Configuration for one conditional ledger deployment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Instance identity mixed into transfer digests.
    pub instance: InstanceId,
    /// Owner identity allowed to sweep uncommitted collateral.
    pub owner: AccountId,
    /// The collateral asset this ledger locks and dispatches.
    pub asset: Asset,
}

/// Configuration for one remote receiver deployment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiverConfig {
    /// Owner identity allowed to redirect stranded funds.
    pub owner: AccountId,
    /// The only settlement domain inbound messages may come from.
    pub trusted_domain: DomainId,
    /// The only sender (the ledger deployment) inbound messages may name.
    pub trusted_sender: InstanceId,
}
