//! Sale Events
//!
//! Append-only notification log. Each event carries the block height it was
//! recorded at and the account it concerns, for indexing.

use serde::{Deserialize, Serialize};

use crate::core::address::Address;
use crate::core::hash::Digest32;
use crate::ledger::treasury::Amount;
use crate::proof::commitment::TokenId;
use crate::sale::stage::Stage;

/// Event payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SaleEventData {
    /// Sale stage advanced.
    StageChanged {
        /// Previous stage.
        from: Stage,
        /// New stage.
        to: Stage,
    },

    /// Account recorded a commitment.
    CommitRecorded {
        /// Committing account.
        account: Address,
        /// Published hash.
        hash: Digest32,
        /// Block height of the commit.
        height: u64,
    },

    /// Contributor registered.
    ContributorAdded {
        /// New contributor.
        account: Address,
    },

    /// Token minted (`from` is None for mints).
    Transfer {
        /// Previous owner.
        from: Option<Address>,
        /// New owner.
        to: Address,
        /// Token minted.
        token_id: TokenId,
    },

    /// Contributor withdrew funds.
    Withdrawn {
        /// Withdrawing contributor.
        account: Address,
        /// Amount paid out.
        amount: Amount,
    },

    /// Operator changed the reveal delay.
    RevealDelayChanged {
        /// Previous delay in blocks.
        old_delay: u64,
        /// New delay in blocks.
        new_delay: u64,
    },
}

/// A recorded event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleEvent {
    /// Block height when the event was recorded.
    pub block_height: u64,

    /// Account the event concerns (for indexing).
    pub account: Option<Address>,

    /// Event data.
    pub data: SaleEventData,
}

impl SaleEvent {
    /// Create a new event, deriving the indexed account from the payload.
    pub fn new(block_height: u64, data: SaleEventData) -> Self {
        let account = match &data {
            SaleEventData::CommitRecorded { account, .. } => Some(*account),
            SaleEventData::ContributorAdded { account } => Some(*account),
            SaleEventData::Transfer { to, .. } => Some(*to),
            SaleEventData::Withdrawn { account, .. } => Some(*account),
            SaleEventData::StageChanged { .. } | SaleEventData::RevealDelayChanged { .. } => None,
        };

        Self {
            block_height,
            account,
            data,
        }
    }

    /// Create stage changed event.
    pub fn stage_changed(block_height: u64, from: Stage, to: Stage) -> Self {
        Self::new(block_height, SaleEventData::StageChanged { from, to })
    }

    /// Create commit recorded event.
    pub fn commit_recorded(block_height: u64, account: Address, hash: Digest32) -> Self {
        Self::new(
            block_height,
            SaleEventData::CommitRecorded {
                account,
                hash,
                height: block_height,
            },
        )
    }

    /// Create mint transfer event.
    pub fn minted(block_height: u64, to: Address, token_id: TokenId) -> Self {
        Self::new(
            block_height,
            SaleEventData::Transfer {
                from: None,
                to,
                token_id,
            },
        )
    }
}
