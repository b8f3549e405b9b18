//! The conditional balance ledger.
//!
//! State per (holder, event) is an ordered sequence of [`BalanceEntry`]s.
//! Deposits append; transfers consume the sender's sequence FIFO and append
//! one entry on the recipient's side; settlement zeroes entries one by one
//! as each outbound transfer is dispatched. Entries are never removed, only
//! zeroed, so slot indices are stable for the life of the position.

use std::collections::{HashMap, HashSet};

use condpay_registry::EventRegistry;
use condpay_types::constants::MAX_ENTRIES_PER_POSITION;
use condpay_types::signing::{transfer_digest, verify_signature};
use condpay_types::{
    AccountId, Asset, BalanceEntry, CondpayError, DispatchId, DomainId, EventId, InstanceId,
    LedgerConfig, RemoteAddress, Result, position_total,
};
use rust_decimal::Decimal;

use crate::custody::Custody;

/// One entry drained during settlement, with the bridge handle it produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettledEntry {
    pub amount: Decimal,
    pub destination_domain: DomainId,
    pub destination_address: RemoteAddress,
    pub dispatch_id: DispatchId,
}

/// The conditional balance ledger: positions, transfer nonces, and
/// settlement marks for one deployment.
pub struct ConditionalLedger {
    /// Instance identity mixed into every transfer digest.
    instance: InstanceId,
    /// Owner allowed to sweep uncommitted collateral.
    owner: AccountId,
    /// The collateral asset this ledger locks and dispatches.
    asset: Asset,
    /// Entry sequences per (holder, event).
    positions: HashMap<(AccountId, EventId), Vec<BalanceEntry>>,
    /// Monotone per-holder transfer nonces, starting at 0.
    nonces: HashMap<AccountId, u64>,
    /// Events whose settlement has been marked (one-shot).
    marks: HashSet<EventId>,
    /// Sum of all nonzero entry amounts: locked value not yet dispatched.
    committed: Decimal,
}

impl ConditionalLedger {
    /// Create an empty ledger for the given deployment.
    #[must_use]
    pub fn new(config: LedgerConfig) -> Self {
        Self {
            instance: config.instance,
            owner: config.owner,
            asset: config.asset,
            positions: HashMap::new(),
            nonces: HashMap::new(),
            marks: HashSet::new(),
            committed: Decimal::ZERO,
        }
    }

    /// Deposit `amount` against `event`, locking it from `holder` via the
    /// custody collaborator and appending one entry routed to the given
    /// destination.
    ///
    /// The registry is deliberately not consulted: deposits are accepted
    /// even for events that do not exist yet or have already resolved.
    ///
    /// # Errors
    /// - [`CondpayError::NonPositiveAmount`] for zero or negative amounts
    /// - [`CondpayError::NilDestination`] for a nil destination address
    /// - [`CondpayError::EntryLimitReached`] at the per-position cap
    /// - [`CondpayError::CustodyLockFailed`] if custody cannot lock
    pub fn deposit(
        &mut self,
        custody: &mut dyn Custody,
        holder: AccountId,
        event: EventId,
        amount: Decimal,
        destination_domain: DomainId,
        destination_address: RemoteAddress,
    ) -> Result<()> {
        if amount <= Decimal::ZERO {
            return Err(CondpayError::NonPositiveAmount);
        }
        if destination_address.is_nil() {
            return Err(CondpayError::NilDestination);
        }
        if self
            .positions
            .get(&(holder, event))
            .is_some_and(|entries| entries.len() >= MAX_ENTRIES_PER_POSITION)
        {
            return Err(CondpayError::EntryLimitReached { holder, event });
        }

        custody.lock(holder, amount)?;
        self.positions
            .entry((holder, event))
            .or_default()
            .push(BalanceEntry::new(
                amount,
                destination_domain,
                destination_address,
            ));
        self.committed += amount;

        tracing::debug!(
            holder = %holder,
            event = %event,
            amount = %amount,
            destination = %destination_domain,
            "Deposit locked"
        );
        Ok(())
    }

    /// Transfer `amount` of `from`'s position on `event` to `to`, authorized
    /// by `from`'s ed25519 signature over the transfer digest at `from`'s
    /// **current** nonce.
    ///
    /// The nonce is consumed the moment the signature verifies, even if the
    /// balance check afterwards fails — a captured signature can never be
    /// replayed, and callers must re-fetch the nonce after any attempt.
    /// Debits are FIFO: oldest entries are zeroed first, the last touched
    /// entry reduced partially; one new entry is appended on `to`'s side
    /// with the new destination. Total event exposure is conserved.
    ///
    /// # Errors
    /// - [`CondpayError::NonPositiveAmount`], [`CondpayError::NilRecipient`],
    ///   [`CondpayError::NilDestination`] for malformed input
    /// - [`CondpayError::TransferAfterMark`] / [`CondpayError::TransferAfterResolution`]
    ///   once settlement marking or resolution closed the market
    /// - [`CondpayError::EntryLimitReached`] at the recipient's position cap
    /// - [`CondpayError::SignatureInvalid`] if the signature does not verify
    ///   (the nonce is **not** consumed in this case)
    /// - [`CondpayError::InsufficientEventBalance`] if `from`'s total is
    ///   short (the nonce **was** consumed)
    #[allow(clippy::too_many_arguments)]
    pub fn transfer_balance(
        &mut self,
        registry: &EventRegistry,
        from: AccountId,
        to: AccountId,
        event: EventId,
        amount: Decimal,
        destination_domain: DomainId,
        destination_address: RemoteAddress,
        signature: &[u8],
    ) -> Result<()> {
        if amount <= Decimal::ZERO {
            return Err(CondpayError::NonPositiveAmount);
        }
        if to.is_nil() {
            return Err(CondpayError::NilRecipient);
        }
        if destination_address.is_nil() {
            return Err(CondpayError::NilDestination);
        }
        if self.marks.contains(&event) {
            return Err(CondpayError::TransferAfterMark(event));
        }
        if registry.is_resolved(event) {
            return Err(CondpayError::TransferAfterResolution(event));
        }
        if self
            .positions
            .get(&(to, event))
            .is_some_and(|entries| entries.len() >= MAX_ENTRIES_PER_POSITION)
        {
            return Err(CondpayError::EntryLimitReached { holder: to, event });
        }

        let nonce = self.nonce(from);
        let digest = transfer_digest(
            self.instance,
            from,
            to,
            event,
            amount,
            destination_domain,
            destination_address,
            nonce,
        );
        if !verify_signature(from, &digest, signature) {
            return Err(CondpayError::SignatureInvalid { from });
        }

        // Nonce is spent from here on, success or not.
        *self.nonces.entry(from).or_insert(0) += 1;

        let available = self.total_balance(from, event);
        if available < amount {
            tracing::warn!(
                from = %from,
                event = %event,
                needed = %amount,
                available = %available,
                burned_nonce = nonce,
                "Transfer failed after nonce consumption"
            );
            return Err(CondpayError::InsufficientEventBalance {
                needed: amount,
                available,
            });
        }

        // FIFO debit across the sender's entries.
        let mut remaining = amount;
        if let Some(entries) = self.positions.get_mut(&(from, event)) {
            for entry in entries.iter_mut() {
                if remaining.is_zero() {
                    break;
                }
                if entry.amount.is_zero() {
                    continue;
                }
                let take = entry.amount.min(remaining);
                entry.amount -= take;
                remaining -= take;
            }
        }
        debug_assert!(remaining.is_zero(), "FIFO debit must consume exactly");

        self.positions
            .entry((to, event))
            .or_default()
            .push(BalanceEntry::new(
                amount,
                destination_domain,
                destination_address,
            ));

        tracing::debug!(
            from = %from,
            to = %to,
            event = %event,
            amount = %amount,
            nonce,
            "Position transferred"
        );
        Ok(())
    }

    /// Set the one-shot settlement mark for `event`.
    ///
    /// Exactly one caller wins; the loser observes a deterministic rejection.
    /// Resolution gating lives in the settlement dispatcher.
    ///
    /// # Errors
    /// Returns [`CondpayError::AlreadyMarked`] on the second and later attempts.
    pub fn mark(&mut self, event: EventId) -> Result<()> {
        if !self.marks.insert(event) {
            return Err(CondpayError::AlreadyMarked(event));
        }
        Ok(())
    }

    /// Drain `holder`'s position on `event` for settlement: for each nonzero
    /// entry, `dispatch` is invoked with its amount and destination, and the
    /// entry is zeroed immediately after the dispatch returns.
    ///
    /// A dispatch failure propagates with already-dispatched entries left
    /// zeroed, so a retry reissues only the remainder. All-zero positions
    /// are a no-op, which makes the call idempotent per holder.
    ///
    /// # Errors
    /// Whatever `dispatch` returns, unchanged.
    pub fn settle_position<F>(
        &mut self,
        holder: AccountId,
        event: EventId,
        mut dispatch: F,
    ) -> Result<Vec<SettledEntry>>
    where
        F: FnMut(Decimal, DomainId, RemoteAddress) -> Result<DispatchId>,
    {
        let mut settled = Vec::new();
        let Some(entries) = self.positions.get_mut(&(holder, event)) else {
            return Ok(settled);
        };
        for entry in entries.iter_mut() {
            if entry.amount.is_zero() {
                continue;
            }
            let dispatch_id = dispatch(
                entry.amount,
                entry.destination_domain,
                entry.destination_address,
            )?;
            settled.push(SettledEntry {
                amount: entry.amount,
                destination_domain: entry.destination_domain,
                destination_address: entry.destination_address,
                dispatch_id,
            });
            self.committed -= entry.amount;
            entry.amount = Decimal::ZERO;
        }
        Ok(settled)
    }

    /// Owner-only withdrawal of custody-held value in excess of open
    /// commitments. Returns the amount paid out (zero if nothing to sweep).
    ///
    /// # Errors
    /// - [`CondpayError::NotOwner`] unless `caller` is the owner
    /// - [`CondpayError::NilRecipient`] for a nil payee
    /// - [`CondpayError::CustodyPayFailed`] if custody refuses the payout
    pub fn sweep_uncommitted(
        &self,
        custody: &mut dyn Custody,
        caller: AccountId,
        to: AccountId,
    ) -> Result<Decimal> {
        if caller != self.owner {
            return Err(CondpayError::NotOwner(caller));
        }
        if to.is_nil() {
            return Err(CondpayError::NilRecipient);
        }
        let excess = custody.held() - self.committed;
        if excess <= Decimal::ZERO {
            return Ok(Decimal::ZERO);
        }
        custody.pay(to, excess)?;
        tracing::info!(to = %to, amount = %excess, "Uncommitted collateral swept");
        Ok(excess)
    }

    /// Total exposure of `holder` on `event`: the sum of entry amounts.
    #[must_use]
    pub fn total_balance(&self, holder: AccountId, event: EventId) -> Decimal {
        self.positions
            .get(&(holder, event))
            .map_or(Decimal::ZERO, |entries| position_total(entries))
    }

    /// The entry sequence of a position (empty for unknown positions).
    #[must_use]
    pub fn entries(&self, holder: AccountId, event: EventId) -> &[BalanceEntry] {
        self.positions
            .get(&(holder, event))
            .map_or(&[], Vec::as_slice)
    }

    /// The current transfer nonce of a holder (next one a signature must use).
    #[must_use]
    pub fn nonce(&self, holder: AccountId) -> u64 {
        self.nonces.get(&holder).copied().unwrap_or(0)
    }

    /// Whether settlement has been marked for `event`.
    #[must_use]
    pub fn is_marked(&self, event: EventId) -> bool {
        self.marks.contains(&event)
    }

    /// Total locked value not yet dispatched.
    #[must_use]
    pub fn committed(&self) -> Decimal {
        self.committed
    }

    /// The collateral asset of this ledger.
    #[must_use]
    pub fn asset(&self) -> &str {
        &self.asset
    }

    /// The deployment instance identity of this ledger.
    #[must_use]
    pub fn instance(&self) -> InstanceId {
        self.instance
    }

    /// The owner of the administrative surface.
    #[must_use]
    pub fn owner(&self) -> AccountId {
        self.owner
    }
}
