//! Shared signing utility: domain-separated digests and ed25519 verification.
//!
//! Every signed message in CondPay is a SHA-256 digest over a tagged,
//! canonical byte encoding that includes the **instance identity** of the
//! component checking it. A resolution attestation for one registry
//! deployment can never be replayed against another, and a transfer
//! authorization is bound to one ledger, one nonce, one exact parameter set.
//!
//! Signer identities are raw ed25519 public keys ([`AccountId`]), so
//! "recovering" the identity behind a signature is verification against the
//! claimed key: a signature counts only if it verifies under the identity
//! it claims.

use ed25519_dalek::{Signature, Verifier, VerifyingKey};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::{AccountId, DomainId, EventId, InstanceId, RemoteAddress};

/// Domain separation tag for event resolution digests.
pub const RESOLUTION_TAG: &[u8] = b"condpay:resolve:v1:";

/// Domain separation tag for balance transfer digests.
pub const TRANSFER_TAG: &[u8] = b"condpay:transfer:v1:";

/// Digest an oracle signs to attest an event's outcome.
///
/// Commits to the registry instance, the event id, and the outcome payload.
#[must_use]
pub fn resolution_digest(registry: InstanceId, event: EventId, payload: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(RESOLUTION_TAG);
    hasher.update(registry.as_bytes());
    hasher.update(event.as_bytes());
    hasher.update((payload.len() as u64).to_le_bytes());
    hasher.update(payload);
    hasher.finalize().into()
}

/// Digest a holder signs to authorize one balance transfer.
///
/// Commits to the ledger instance, both parties, the event, the amount, the
/// recipient's payout destination, and the holder's **current** nonce. The
/// amount is encoded as its canonical decimal string, so signer and verifier
/// must pass the identical `Decimal` value.
#[must_use]
#[allow(clippy::too_many_arguments)]
pub fn transfer_digest(
    ledger: InstanceId,
    from: AccountId,
    to: AccountId,
    event: EventId,
    amount: Decimal,
    destination_domain: DomainId,
    destination_address: RemoteAddress,
    nonce: u64,
) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(TRANSFER_TAG);
    hasher.update(ledger.as_bytes());
    hasher.update(from.as_bytes());
    hasher.update(to.as_bytes());
    hasher.update(event.as_bytes());
    hasher.update(amount.to_string().as_bytes());
    hasher.update(destination_domain.0.to_le_bytes());
    hasher.update(destination_address.0);
    hasher.update(nonce.to_le_bytes());
    hasher.finalize().into()
}

/// Verify an ed25519 signature over a digest under the claimed identity.
///
/// Returns `false` for malformed keys or signatures rather than erroring —
/// a signature that cannot verify simply does not count.
#[must_use]
pub fn verify_signature(signer: AccountId, digest: &[u8; 32], signature: &[u8]) -> bool {
    let Ok(key) = VerifyingKey::from_bytes(signer.as_bytes()) else {
        return false;
    };
    let Ok(sig) = Signature::from_slice(signature) else {
        return false;
    };
    key.verify(digest, &sig).is_ok()
}

/// One oracle's signed attestation of an event's outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attestation {
    /// The identity this attestation claims to come from.
    pub signer: AccountId,
    /// Ed25519 signature over the resolution digest.
    pub signature: Vec<u8>,
}

impl Attestation {
    #[must_use]
    pub fn new(signer: AccountId, signature: Vec<u8>) -> Self {
        Self { signer, signature }
    }

    /// Whether this attestation's signature verifies for the given digest.
    #[must_use]
    pub fn verify(&self, digest: &[u8; 32]) -> bool {
        verify_signature(self.signer, digest, &self.signature)
    }
}

/// Key material helpers for tests. **Never use in production.**
#[cfg(any(test, feature = "test-helpers"))]
pub mod testkeys {
    use ed25519_dalek::{Signer, SigningKey};
    use rand::rngs::OsRng;

    use crate::AccountId;

    /// Generate a fresh ed25519 keypair; the account id is the public key.
    pub fn generate_signer() -> (SigningKey, AccountId) {
        let key = SigningKey::generate(&mut OsRng);
        let account = AccountId::from_pubkey(key.verifying_key().to_bytes());
        (key, account)
    }

    /// Sign a digest, returning the 64-byte signature.
    pub fn sign_digest(key: &SigningKey, digest: &[u8; 32]) -> Vec<u8> {
        key.sign(digest).to_bytes().to_vec()
    }
}
