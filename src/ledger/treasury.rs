//! Value Transfer
//!
//! Native-currency payouts. The sale only needs to know whether a transfer
//! succeeded.

use std::collections::{BTreeMap, BTreeSet};

use thiserror::Error;

use crate::core::address::Address;

/// Native currency amount (smallest unit).
pub type Amount = u128;

/// Transfer failure reported by the host.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransferError {
    /// Recipient refused the payment.
    #[error("recipient {0} rejected the transfer")]
    Rejected(Address),
    /// Credit would overflow the recipient's balance.
    #[error("recipient balance overflow")]
    Overflow,
}

/// Value-transfer primitive.
pub trait ValueTransfer {
    /// Pay `amount` to `to`.
    fn send(&mut self, to: &Address, amount: Amount) -> Result<(), TransferError>;
}

/// In-memory payout ledger.
///
/// Records credited balances; accounts in the reject list fail every
/// transfer, mimicking recipients that revert on receive.
#[derive(Clone, Debug, Default)]
pub struct Treasury {
    credited: BTreeMap<Address, Amount>,
    rejecting: BTreeSet<Address>,
}

impl Treasury {
    /// Create an empty treasury.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every transfer to `account` fail.
    pub fn reject(&mut self, account: Address) {
        self.rejecting.insert(account);
    }

    /// Total paid out to `account`.
    pub fn credited(&self, account: &Address) -> Amount {
        self.credited.get(account).copied().unwrap_or(0)
    }
}

impl ValueTransfer for Treasury {
    fn send(&mut self, to: &Address, amount: Amount) -> Result<(), TransferError> {
        if self.rejecting.contains(to) {
            return Err(TransferError::Rejected(*to));
        }
        let entry = self.credited.entry(*to).or_insert(0);
        *entry = entry.checked_add(amount).ok_or(TransferError::Overflow)?;
        Ok(())
    }
}
