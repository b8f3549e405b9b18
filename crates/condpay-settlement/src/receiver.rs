//! Remote receiver: the thin per-domain endpoint that unwraps one bridge
//! message and credits one local account.
//!
//! Pure forwarding. The receiver trusts exactly one (domain, sender) origin
//! fixed at construction; everything else is rejected before the body is
//! even decoded. Payouts come from the receiver's own already-credited
//! custody pool — the bridge's minting leg funds it out of band.

use condpay_ledger::Custody;
use condpay_types::{
    AccountId, CondpayError, DomainId, InstanceId, ReceiverConfig, Result,
};
use rust_decimal::Decimal;

use crate::bridge::BridgeMessage;

/// Per-domain payout endpoint bound to one trusted ledger deployment.
pub struct RemoteReceiver {
    owner: AccountId,
    trusted_domain: DomainId,
    trusted_sender: InstanceId,
}

impl RemoteReceiver {
    #[must_use]
    pub fn new(config: ReceiverConfig) -> Self {
        Self {
            owner: config.owner,
            trusted_domain: config.trusted_domain,
            trusted_sender: config.trusted_sender,
        }
    }

    /// Handle one inbound bridge message: validate origin, decode the body,
    /// credit the recipient from the receiver's custody pool.
    ///
    /// # Errors
    /// - [`CondpayError::UntrustedOrigin`] unless (domain, sender) match the
    ///   trusted origin exactly
    /// - [`CondpayError::MalformedMessage`] if the body fails to decode
    /// - [`CondpayError::NonPositiveAmount`] for a zero or negative amount
    /// - [`CondpayError::CustodyPayFailed`] if the pool cannot cover it
    pub fn on_message(
        &self,
        custody: &mut dyn Custody,
        source_domain: DomainId,
        source_sender: InstanceId,
        body: &[u8],
    ) -> Result<()> {
        if source_domain != self.trusted_domain || source_sender != self.trusted_sender {
            tracing::warn!(
                domain = %source_domain,
                sender = %source_sender,
                "Inbound bridge message from untrusted origin rejected"
            );
            return Err(CondpayError::UntrustedOrigin {
                domain: source_domain,
                sender_hex: hex::encode(source_sender.as_bytes()),
            });
        }

        let message = BridgeMessage::decode(body)?;
        // A well-formed body can still carry a non-positive amount; paying a
        // negative amount would debit the recipient and inflate the pool.
        if message.amount <= Decimal::ZERO {
            return Err(CondpayError::NonPositiveAmount);
        }
        custody.pay(message.recipient, message.amount)?;

        tracing::info!(
            recipient = %message.recipient,
            amount = %message.amount,
            "Payout credited"
        );
        Ok(())
    }

    /// Owner-only redirect of funds stranded in the receiver's pool.
    ///
    /// # Errors
    /// - [`CondpayError::NotOwner`] unless `caller` is the owner
    /// - [`CondpayError::NilRecipient`] for a nil payee
    /// - [`CondpayError::NonPositiveAmount`] for a zero or negative amount
    /// - [`CondpayError::CustodyPayFailed`] if the pool cannot cover it
    pub fn redirect(
        &self,
        custody: &mut dyn Custody,
        caller: AccountId,
        to: AccountId,
        amount: Decimal,
    ) -> Result<()> {
        if caller != self.owner {
            return Err(CondpayError::NotOwner(caller));
        }
        if to.is_nil() {
            return Err(CondpayError::NilRecipient);
        }
        if amount <= Decimal::ZERO {
            return Err(CondpayError::NonPositiveAmount);
        }
        custody.pay(to, amount)?;
        tracing::info!(to = %to, amount = %amount, "Stranded funds redirected");
        Ok(())
    }

    /// The single origin this receiver trusts.
    #[must_use]
    pub fn trusted_origin(&self) -> (DomainId, InstanceId) {
        (self.trusted_domain, self.trusted_sender)
    }
}

#[cfg(test)]
mod tests {
    use condpay_ledger::VaultCustody;

    use super::*;

    fn account(byte: u8) -> AccountId {
        AccountId::from_pubkey([byte; 32])
    }

    fn dec(n: i64) -> Decimal {
        Decimal::new(n, 0)
    }

    fn receiver() -> RemoteReceiver {
        RemoteReceiver::new(ReceiverConfig {
            owner: account(0xee),
            trusted_domain: DomainId(1),
            trusted_sender: InstanceId::from_label("home-ledger"),
        })
    }

    /// Custody pre-funded by the bridge's minting leg.
    fn funded_custody(amount: Decimal) -> VaultCustody {
        let mut custody = VaultCustody::new();
        let faucet = account(0xff);
        custody.credit(faucet, amount);
        custody.lock(faucet, amount).unwrap();
        custody
    }

    #[test]
    fn credits_recipient_from_trusted_origin() {
        let receiver = receiver();
        let mut custody = funded_custody(dec(1000));
        let body = BridgeMessage {
            recipient: account(5),
            amount: dec(400),
        }
        .encode()
        .unwrap();

        receiver
            .on_message(
                &mut custody,
                DomainId(1),
                InstanceId::from_label("home-ledger"),
                &body,
            )
            .unwrap();
        assert_eq!(custody.balance_of(account(5)), dec(400));
        assert_eq!(custody.held(), dec(600));
    }

    #[test]
    fn rejects_wrong_domain() {
        let receiver = receiver();
        let mut custody = funded_custody(dec(1000));
        let body = BridgeMessage {
            recipient: account(5),
            amount: dec(400),
        }
        .encode()
        .unwrap();

        let err = receiver
            .on_message(
                &mut custody,
                DomainId(2),
                InstanceId::from_label("home-ledger"),
                &body,
            )
            .unwrap_err();
        assert!(matches!(err, CondpayError::UntrustedOrigin { .. }));
        assert_eq!(custody.held(), dec(1000));
    }

    #[test]
    fn rejects_wrong_sender() {
        let receiver = receiver();
        let mut custody = funded_custody(dec(1000));
        let body = BridgeMessage {
            recipient: account(5),
            amount: dec(400),
        }
        .encode()
        .unwrap();

        let err = receiver
            .on_message(
                &mut custody,
                DomainId(1),
                InstanceId::from_label("imposter-ledger"),
                &body,
            )
            .unwrap_err();
        assert!(matches!(err, CondpayError::UntrustedOrigin { .. }));
    }

    #[test]
    fn rejects_non_positive_amount_from_trusted_origin() {
        let receiver = receiver();
        let mut custody = funded_custody(dec(100));
        let victim = account(5);

        for amount in [dec(-400), Decimal::ZERO] {
            let body = BridgeMessage {
                recipient: victim,
                amount,
            }
            .encode()
            .unwrap();
            let err = receiver
                .on_message(
                    &mut custody,
                    DomainId(1),
                    InstanceId::from_label("home-ledger"),
                    &body,
                )
                .unwrap_err();
            assert!(matches!(err, CondpayError::NonPositiveAmount));
        }
        // Neither the recipient nor the pool moved.
        assert_eq!(custody.balance_of(victim), Decimal::ZERO);
        assert_eq!(custody.held(), dec(100));
    }

    #[test]
    fn rejects_malformed_body() {
        let receiver = receiver();
        let mut custody = funded_custody(dec(1000));
        let err = receiver
            .on_message(
                &mut custody,
                DomainId(1),
                InstanceId::from_label("home-ledger"),
                b"garbage",
            )
            .unwrap_err();
        assert!(matches!(err, CondpayError::MalformedMessage(_)));
    }

    #[test]
    fn redirect_is_owner_only() {
        let receiver = receiver();
        let mut custody = funded_custody(dec(100));

        let err = receiver
            .redirect(&mut custody, account(1), account(2), dec(50))
            .unwrap_err();
        assert!(matches!(err, CondpayError::NotOwner(_)));

        receiver
            .redirect(&mut custody, account(0xee), account(2), dec(50))
            .unwrap();
        assert_eq!(custody.balance_of(account(2)), dec(50));
    }

    #[test]
    fn redirect_rejects_non_positive_amount() {
        let receiver = receiver();
        let mut custody = funded_custody(dec(100));

        for amount in [dec(-50), Decimal::ZERO] {
            let err = receiver
                .redirect(&mut custody, account(0xee), account(2), amount)
                .unwrap_err();
            assert!(matches!(err, CondpayError::NonPositiveAmount));
        }
        assert_eq!(custody.held(), dec(100));
    }
}
