//! Custody collaborator: the component that physically holds value.
//!
//! The ledger never touches balances directly. Deposits lock value through
//! [`Custody::lock`]; the owner sweep and the remote receiver pay out
//! through [`Custody::pay`]. A lock or pay failure is a hard synchronous
//! failure of the enclosing call; nothing is retried internally.

use std::collections::HashMap;

use condpay_types::{AccountId, CondpayError, Result};
use rust_decimal::Decimal;

/// Capability to lock value into and pay value out of one component's pool.
pub trait Custody {
    /// Lock `amount` from `from`'s account into the pool.
    ///
    /// # Errors
    /// - [`CondpayError::NonPositiveAmount`] for a zero or negative amount
    /// - [`CondpayError::CustodyLockFailed`] if `from` cannot cover it
    fn lock(&mut self, from: AccountId, amount: Decimal) -> Result<()>;

    /// Pay `amount` out of the pool to `to`'s account.
    ///
    /// # Errors
    /// - [`CondpayError::NonPositiveAmount`] for a zero or negative amount
    /// - [`CondpayError::CustodyPayFailed`] if the pool cannot cover it
    fn pay(&mut self, to: AccountId, amount: Decimal) -> Result<()>;

    /// Free balance of an account (outside the pool).
    fn balance_of(&self, account: AccountId) -> Decimal;

    /// Total value the custody currently holds in the pool.
    fn held(&self) -> Decimal;
}

/// In-memory custody: per-account free balances plus one locked pool.
#[derive(Debug, Default)]
pub struct VaultCustody {
    /// Free balances per account.
    accounts: HashMap<AccountId, Decimal>,
    /// Value locked on behalf of the owning component.
    pool: Decimal,
}

impl VaultCustody {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit an account's free balance (funding for tests and demos).
    pub fn credit(&mut self, account: AccountId, amount: Decimal) {
        *self.accounts.entry(account).or_default() += amount;
    }
}

impl Custody for VaultCustody {
    fn lock(&mut self, from: AccountId, amount: Decimal) -> Result<()> {
        if amount <= Decimal::ZERO {
            return Err(CondpayError::NonPositiveAmount);
        }
        let balance = self.accounts.entry(from).or_default();
        if *balance < amount {
            return Err(CondpayError::CustodyLockFailed {
                needed: amount,
                available: *balance,
            });
        }
        *balance -= amount;
        self.pool += amount;
        Ok(())
    }

    fn pay(&mut self, to: AccountId, amount: Decimal) -> Result<()> {
        if amount <= Decimal::ZERO {
            return Err(CondpayError::NonPositiveAmount);
        }
        if self.pool < amount {
            return Err(CondpayError::CustodyPayFailed {
                reason: format!("pool holds {}, cannot pay {amount}", self.pool),
            });
        }
        self.pool -= amount;
        *self.accounts.entry(to).or_default() += amount;
        Ok(())
    }

    fn balance_of(&self, account: AccountId) -> Decimal {
        self.accounts.get(&account).copied().unwrap_or(Decimal::ZERO)
    }

    fn held(&self) -> Decimal {
        self.pool
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(byte: u8) -> AccountId {
        AccountId::from_pubkey([byte; 32])
    }

    #[test]
    fn lock_moves_into_pool() {
        let mut custody = VaultCustody::new();
        let alice = account(1);
        custody.credit(alice, Decimal::new(1000, 0));

        custody.lock(alice, Decimal::new(400, 0)).unwrap();
        assert_eq!(custody.balance_of(alice), Decimal::new(600, 0));
        assert_eq!(custody.held(), Decimal::new(400, 0));
    }

    #[test]
    fn lock_insufficient_fails_clean() {
        let mut custody = VaultCustody::new();
        let alice = account(1);
        custody.credit(alice, Decimal::new(100, 0));

        let err = custody.lock(alice, Decimal::new(200, 0)).unwrap_err();
        assert!(matches!(err, CondpayError::CustodyLockFailed { .. }));
        assert_eq!(custody.balance_of(alice), Decimal::new(100, 0));
        assert_eq!(custody.held(), Decimal::ZERO);
    }

    #[test]
    fn pay_moves_out_of_pool() {
        let mut custody = VaultCustody::new();
        let alice = account(1);
        let bob = account(2);
        custody.credit(alice, Decimal::new(1000, 0));
        custody.lock(alice, Decimal::new(1000, 0)).unwrap();

        custody.pay(bob, Decimal::new(250, 0)).unwrap();
        assert_eq!(custody.balance_of(bob), Decimal::new(250, 0));
        assert_eq!(custody.held(), Decimal::new(750, 0));
    }

    #[test]
    fn pay_beyond_pool_fails() {
        let mut custody = VaultCustody::new();
        let err = custody.pay(account(2), Decimal::ONE).unwrap_err();
        assert!(matches!(err, CondpayError::CustodyPayFailed { .. }));
    }

    #[test]
    fn non_positive_amounts_rejected() {
        let mut custody = VaultCustody::new();
        let alice = account(1);
        custody.credit(alice, Decimal::new(100, 0));
        custody.lock(alice, Decimal::new(100, 0)).unwrap();

        for amount in [Decimal::new(-10, 0), Decimal::ZERO] {
            let err = custody.lock(alice, amount).unwrap_err();
            assert!(matches!(err, CondpayError::NonPositiveAmount));
            let err = custody.pay(alice, amount).unwrap_err();
            assert!(matches!(err, CondpayError::NonPositiveAmount));
        }
        assert_eq!(custody.held(), Decimal::new(100, 0));
    }

    #[test]
    fn unknown_account_balance_is_zero() {
        let custody = VaultCustody::new();
        assert_eq!(custody.balance_of(account(9)), Decimal::ZERO);
    }
}
