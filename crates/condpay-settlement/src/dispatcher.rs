//! Mark-then-settle dispatch of resolved conditional balances.

use chrono::{DateTime, Utc};
use condpay_ledger::ConditionalLedger;
use condpay_registry::EventRegistry;
use condpay_types::{
    AccountId, CondpayError, DispatchId, DomainId, EventId, RemoteAddress, Result,
};
use rust_decimal::Decimal;

use crate::bridge::Bridge;

/// Audit record for one outbound payout dispatch.
#[derive(Debug, Clone)]
pub struct DispatchReceipt {
    pub event: EventId,
    pub holder: AccountId,
    pub amount: Decimal,
    pub destination_domain: DomainId,
    pub destination_address: RemoteAddress,
    pub dispatch_id: DispatchId,
    pub dispatched_at: DateTime<Utc>,
}

/// Drives the two-phase settlement of resolved events and keeps the
/// dispatch audit log.
///
/// Holder discovery is out of scope: callers supply the holder set, usually
/// from off-ledger indexing of deposit and transfer records.
#[derive(Debug, Default)]
pub struct SettlementDispatcher {
    receipts: Vec<DispatchReceipt>,
}

impl SettlementDispatcher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Open the payout phase for `event`: a one-shot, compare-and-set style
    /// gate. Requires the registry to report the event resolved; exactly one
    /// caller's attempt wins and every later attempt is rejected.
    ///
    /// # Errors
    /// - [`CondpayError::NotResolved`] if the event has not resolved
    /// - [`CondpayError::AlreadyMarked`] if the gate was already taken
    pub fn mark_settlement(
        registry: &EventRegistry,
        ledger: &mut ConditionalLedger,
        event: EventId,
    ) -> Result<()> {
        if !registry.is_resolved(event) {
            return Err(CondpayError::NotResolved(event));
        }
        ledger.mark(event)?;
        tracing::info!(event = %event, "Settlement marked");
        Ok(())
    }

    /// Pay out one holder's position on a marked event: one bridge dispatch
    /// per nonzero entry, each zeroed immediately after. Returns the number
    /// of transfers dispatched.
    ///
    /// Idempotent per holder — a repeat call finds only zero entries and
    /// dispatches nothing. After a partial bridge failure a retry reissues
    /// exactly the still-nonzero remainder.
    ///
    /// # Errors
    /// - [`CondpayError::NotResolved`] / [`CondpayError::NotMarked`] if the
    ///   two-phase gate sequence has not completed
    /// - [`CondpayError::BridgeDispatchFailed`] propagated from the bridge
    pub fn settle_holder<B: Bridge>(
        &mut self,
        registry: &EventRegistry,
        ledger: &mut ConditionalLedger,
        bridge: &mut B,
        event: EventId,
        holder: AccountId,
    ) -> Result<usize> {
        if !registry.is_resolved(event) {
            return Err(CondpayError::NotResolved(event));
        }
        if !ledger.is_marked(event) {
            return Err(CondpayError::NotMarked(event));
        }

        let asset = ledger.asset().to_string();
        let settled = ledger.settle_position(holder, event, |amount, domain, address| {
            bridge.burn_and_route(amount, domain, address, &asset)
        })?;

        let dispatched = settled.len();
        let now = Utc::now();
        for entry in settled {
            self.receipts.push(DispatchReceipt {
                event,
                holder,
                amount: entry.amount,
                destination_domain: entry.destination_domain,
                destination_address: entry.destination_address,
                dispatch_id: entry.dispatch_id,
                dispatched_at: now,
            });
        }

        tracing::info!(
            event = %event,
            holder = %holder,
            dispatched,
            "Holder settled"
        );
        Ok(dispatched)
    }

    /// The dispatch audit log, in dispatch order.
    #[must_use]
    pub fn receipts(&self) -> &[DispatchReceipt] {
        &self.receipts
    }

    /// Total amount dispatched for one event across all holders.
    #[must_use]
    pub fn total_dispatched(&self, event: EventId) -> Decimal {
        self.receipts
            .iter()
            .filter(|r| r.event == event)
            .map(|r| r.amount)
            .sum()
    }
}
