//! Conditional balance entries.
//!
//! A holder's position for one event is an ordered sequence of entries, each
//! an amount owed contingent on resolution, tagged with the settlement
//! destination the depositor (or transfer recipient) named. Amounts only
//! ever decrease after creation, and once zero stay zero; entries are never
//! removed, so slot indices stay stable.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{DomainId, RemoteAddress};

/// One conditional amount owed to a holder, with its payout routing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceEntry {
    /// Amount owed back to the holder if the event resolves. Non-negative.
    pub amount: Decimal,
    /// Settlement domain the payout is dispatched to.
    pub destination_domain: DomainId,
    /// Address on that domain credited by the remote receiver.
    pub destination_address: RemoteAddress,
}

impl BalanceEntry {
    #[must_use]
    pub fn new(amount: Decimal, destination_domain: DomainId, destination_address: RemoteAddress) -> Self {
        Self {
            amount,
            destination_domain,
            destination_address,
        }
    }

    /// Whether this entry has been fully consumed (transferred away or settled).
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }
}

/// Total exposure of a position: the sum of its entry amounts.
#[must_use]
pub fn position_total(entries: &[BalanceEntry]) -> Decimal {
    entries.iter().map(|e| e.amount).sum()
}

/// Type alias for asset identifiers (e.g., "USDC").
pub type Asset = String;
