//! Contributor Ledger & Withdrawal
//!
//! Contributors may withdraw collected funds. There are no per-contributor
//! shares: any contributor can take up to the full balance.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::core::address::Address;
use crate::ledger::treasury::{Amount, ValueTransfer};
use crate::sale::error::SaleError;
use crate::sale::events::{SaleEvent, SaleEventData};
use crate::sale::state::{CallContext, SaleState};

/// Append-only set of contributor addresses.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributorLedger {
    members: BTreeSet<Address>,
}

impl ContributorLedger {
    /// Empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `account`. Returns true if it was not already present.
    pub fn insert(&mut self, account: Address) -> Result<bool, SaleError> {
        if account.is_zero() {
            return Err(SaleError::InvalidContributor);
        }
        Ok(self.members.insert(account))
    }

    /// Is `account` registered?
    pub fn contains(&self, account: &Address) -> bool {
        self.members.contains(account)
    }

    /// Number of contributors.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// True if no contributor is registered.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Contributors in address order.
    pub fn iter(&self) -> impl Iterator<Item = &Address> {
        self.members.iter()
    }
}

/// Register a contributor. Operator only; idempotent.
pub fn add_contributor(state: &mut SaleState, ctx: &CallContext, account: Address) -> Result<(), SaleError> {
    state.require_operator(&ctx.caller)?;

    if state.contributors.insert(account)? {
        info!("Contributor {} added", account);
        state.emit(SaleEvent::new(
            ctx.block_height,
            SaleEventData::ContributorAdded { account },
        ));
    }

    Ok(())
}

/// Pay `amount` of the collected balance to the calling contributor.
///
/// The balance is only reduced after the transfer reports success.
pub fn withdraw<T: ValueTransfer>(
    state: &mut SaleState,
    transfer: &mut T,
    ctx: &CallContext,
    amount: Amount,
) -> Result<(), SaleError> {
    if !state.contributors.contains(&ctx.caller) {
        return Err(SaleError::NotContributor);
    }
    if amount == 0 {
        return Err(SaleError::ZeroAmount);
    }
    if amount > state.balance {
        return Err(SaleError::InsufficientBalance {
            requested: amount,
            available: state.balance,
        });
    }

    if let Err(err) = transfer.send(&ctx.caller, amount) {
        warn!("Withdrawal of {} to {} failed: {}", amount, ctx.caller, err);
        return Err(SaleError::TransferFailed(err));
    }

    state.balance -= amount;
    state.emit(SaleEvent::new(
        ctx.block_height,
        SaleEventData::Withdrawn {
            account: ctx.caller,
            amount,
        },
    ));
    info!("Contributor {} withdrew {}", ctx.caller, amount);

    Ok(())
}
