//! # condpay-ledger
//!
//! **Conditional Balance Ledger**: per-(holder, event) sequences of owed
//! amounts tagged with settlement destinations.
//!
//! ## Architecture
//!
//! The ledger owns entries, transfer nonces, and settlement marks. It reads
//! the registry's resolution flag through a read-only reference passed per
//! call and never the other way around — the dependency is strictly
//! one-directional.
//!
//! Value custody (locking deposits, paying out) is delegated to the
//! [`Custody`] collaborator; the ledger only tracks who is owed what, and
//! under which event.

pub mod custody;
pub mod ledger;

pub use custody::{Custody, VaultCustody};
pub use ledger::{ConditionalLedger, SettledEntry};
