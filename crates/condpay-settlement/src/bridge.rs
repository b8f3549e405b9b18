//! Bridge collaborator: the opaque burn/attest/mint cross-domain mover.
//!
//! The dispatcher hands the bridge one (amount, domain, address) triple per
//! settled entry and receives a dispatch handle back. It neither waits for
//! nor verifies delivery — confirmation is the relaying process's concern.

use condpay_types::{
    AccountId, Asset, CondpayError, DispatchId, DomainId, RemoteAddress, Result,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Outbound side of the cross-domain transfer mechanism.
pub trait Bridge {
    /// Burn `amount` of `asset` locally and route it to `destination_address`
    /// on `destination_domain`. Returns a handle identifying the dispatch.
    ///
    /// # Errors
    /// Returns [`CondpayError::BridgeDispatchFailed`] if the bridge refuses
    /// the transfer; the enclosing settlement call fails hard, no retry.
    fn burn_and_route(
        &mut self,
        amount: Decimal,
        destination_domain: DomainId,
        destination_address: RemoteAddress,
        asset: &str,
    ) -> Result<DispatchId>;
}

/// The body a remote receiver decodes from an inbound bridge message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeMessage {
    /// Local account credited on the destination domain.
    pub recipient: AccountId,
    /// Amount to credit.
    pub amount: Decimal,
}

impl BridgeMessage {
    /// Encode to the wire body.
    ///
    /// # Errors
    /// Returns [`CondpayError::Serialization`] on encoder failure.
    pub fn encode(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| CondpayError::Serialization(e.to_string()))
    }

    /// Decode from a wire body.
    ///
    /// # Errors
    /// Returns [`CondpayError::MalformedMessage`] if the body is not a
    /// well-formed message.
    pub fn decode(body: &[u8]) -> Result<Self> {
        serde_json::from_slice(body).map_err(|e| CondpayError::MalformedMessage(e.to_string()))
    }
}

/// One transfer accepted by the [`RecordingBridge`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundTransfer {
    pub dispatch_id: DispatchId,
    pub amount: Decimal,
    pub destination_domain: DomainId,
    pub destination_address: RemoteAddress,
    pub asset: Asset,
}

/// In-memory bridge keeping an ordered log of everything dispatched.
#[derive(Debug, Default)]
pub struct RecordingBridge {
    dispatched: Vec<OutboundTransfer>,
}

impl RecordingBridge {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The ordered dispatch log.
    #[must_use]
    pub fn dispatched(&self) -> &[OutboundTransfer] {
        &self.dispatched
    }

    /// Sum of all dispatched amounts.
    #[must_use]
    pub fn total_dispatched(&self) -> Decimal {
        self.dispatched.iter().map(|t| t.amount).sum()
    }
}

impl Bridge for RecordingBridge {
    fn burn_and_route(
        &mut self,
        amount: Decimal,
        destination_domain: DomainId,
        destination_address: RemoteAddress,
        asset: &str,
    ) -> Result<DispatchId> {
        let dispatch_id = DispatchId::new();
        self.dispatched.push(OutboundTransfer {
            dispatch_id,
            amount,
            destination_domain,
            destination_address,
            asset: asset.to_string(),
        });
        Ok(dispatch_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_bridge_logs_in_order() {
        let mut bridge = RecordingBridge::new();
        let addr = RemoteAddress::from_bytes([1u8; 32]);
        bridge
            .burn_and_route(Decimal::new(600, 0), DomainId(1), addr, "USDC")
            .unwrap();
        bridge
            .burn_and_route(Decimal::new(400, 0), DomainId(2), addr, "USDC")
            .unwrap();

        assert_eq!(bridge.dispatched().len(), 2);
        assert_eq!(bridge.dispatched()[0].amount, Decimal::new(600, 0));
        assert_eq!(bridge.dispatched()[1].destination_domain, DomainId(2));
        assert_eq!(bridge.total_dispatched(), Decimal::new(1000, 0));
    }

    #[test]
    fn bridge_message_roundtrip() {
        let message = BridgeMessage {
            recipient: AccountId::from_pubkey([5u8; 32]),
            amount: Decimal::new(12345, 2),
        };
        let body = message.encode().unwrap();
        let back = BridgeMessage::decode(&body).unwrap();
        assert_eq!(message, back);
    }

    #[test]
    fn malformed_body_rejected() {
        let err = BridgeMessage::decode(b"{not json").unwrap_err();
        assert!(matches!(err, CondpayError::MalformedMessage(_)));
    }
}
