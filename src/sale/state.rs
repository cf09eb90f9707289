//! Sale State
//!
//! All mutable sale data in one struct. Operations take it by `&mut`, so
//! calls are serialized by construction and nothing lives in globals.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{ConfigError, SaleConfig};
use crate::core::address::Address;
use crate::core::bitmap::TicketBitmap;
use crate::core::hash::{Digest32, DigestHasher};
use crate::ledger::treasury::Amount;
use crate::proof::commitment::{CommitBinding, CommitRegister, Commitment};
use crate::sale::contributors::ContributorLedger;
use crate::sale::error::SaleError;
use crate::sale::events::SaleEvent;
use crate::sale::stage::{Stage, StageController};

/// Ambient data for one call: who is calling, at what height, with how much.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CallContext {
    /// Calling account.
    pub caller: Address,
    /// Current block height.
    pub block_height: u64,
    /// Value attached to the call.
    pub value: Amount,
}

impl CallContext {
    /// Context without attached value.
    pub fn new(caller: Address, block_height: u64) -> Self {
        Self {
            caller,
            block_height,
            value: 0,
        }
    }

    /// Attach a payment.
    pub fn with_value(mut self, value: Amount) -> Self {
        self.value = value;
        self
    }
}

/// Errors loading a binary snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// Bytes are not a valid encoding.
    #[error("snapshot decode failed: {0}")]
    Decode(#[from] bincode::Error),
    /// Construction parameters in the snapshot are invalid.
    #[error("snapshot config invalid: {0}")]
    Config(#[from] ConfigError),
    /// More tokens minted than the cap allows.
    #[error("snapshot minted {minted} tokens over cap {cap}")]
    SupplyOverCap {
        /// Recorded supply.
        minted: u64,
        /// Recorded cap.
        cap: u64,
    },
    /// Ticket bitmap storage does not match its capacity.
    #[error("snapshot ticket bitmap is malformed")]
    MalformedTickets,
}

/// Complete sale state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleState {
    /// Identity mixed into commitments.
    pub contract: Address,
    /// Privileged operator.
    pub operator: Address,
    /// Whitelist root (immutable).
    pub merkle_root: Digest32,
    /// Maximum supply.
    pub supply_cap: u64,
    /// Exact public-sale price.
    pub mint_price: Amount,
    /// Blocks between commit and reveal.
    pub reveal_delay: u64,
    /// Commitment binding variant.
    pub commit_binding: CommitBinding,

    /// Stage machine.
    pub stage: StageController,
    /// Per-account commitments.
    pub commitments: CommitRegister,
    /// Unused whitelist tickets.
    pub tickets: TicketBitmap,
    /// Accounts allowed to withdraw.
    pub contributors: ContributorLedger,

    /// Tokens minted through this sale.
    pub total_minted: u64,
    /// Collected funds not yet withdrawn.
    pub balance: Amount,
    /// Notification log.
    pub events: Vec<SaleEvent>,
}

impl SaleState {
    /// Build a sale from validated configuration.
    pub fn new(config: &SaleConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let tickets = TicketBitmap::new(config.whitelist_size).ok_or(ConfigError::WhitelistTooLarge {
            size: config.whitelist_size,
            max: crate::MAX_WHITELIST_SIZE,
        })?;

        Ok(Self {
            contract: config.contract,
            operator: config.operator,
            merkle_root: config.merkle_root,
            supply_cap: config.supply_cap,
            mint_price: config.mint_price,
            reveal_delay: config.reveal_delay,
            commit_binding: config.commit_binding,
            stage: StageController::new(),
            commitments: CommitRegister::new(),
            tickets,
            contributors: ContributorLedger::new(),
            total_minted: 0,
            balance: 0,
            events: Vec::new(),
        })
    }

    // =========================================================================
    // GUARDS
    // =========================================================================

    /// Fail unless `caller` is the operator.
    pub fn require_operator(&self, caller: &Address) -> Result<(), SaleError> {
        if *caller != self.operator {
            return Err(SaleError::NotOperator);
        }
        Ok(())
    }

    /// Fail if one more mint would exceed the cap.
    pub fn require_supply(&self) -> Result<(), SaleError> {
        if self.total_minted >= self.supply_cap {
            return Err(SaleError::CapExceeded { cap: self.supply_cap });
        }
        Ok(())
    }

    /// Fail if `ticket` cannot be consumed.
    pub fn require_ticket(&self, ticket: u64) -> Result<(), SaleError> {
        if !self.tickets.is_available(ticket) {
            return Err(SaleError::TicketAlreadyUsed { ticket });
        }
        Ok(())
    }

    /// Consume `ticket`, failing if it was already used.
    pub fn consume_ticket(&mut self, ticket: u64) -> Result<(), SaleError> {
        if !self.tickets.consume(ticket) {
            return Err(SaleError::TicketAlreadyUsed { ticket });
        }
        Ok(())
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    /// Current stage.
    pub fn current_stage(&self) -> Stage {
        self.stage.current()
    }

    /// Tokens still mintable.
    pub fn remaining_supply(&self) -> u64 {
        self.supply_cap.saturating_sub(self.total_minted)
    }

    /// Is `ticket` still redeemable?
    pub fn is_ticket_available(&self, ticket: u64) -> bool {
        self.tickets.is_available(ticket)
    }

    /// Commitment recorded for `account`.
    pub fn commitment_of(&self, account: &Address) -> Option<&Commitment> {
        self.commitments.get(account)
    }

    /// Blocks until `account` may reveal at `current_height`.
    pub fn blocks_until_reveal(&self, account: &Address, current_height: u64) -> Option<u64> {
        self.commitments
            .blocks_until_reveal(account, current_height, self.reveal_delay)
    }

    /// Is `account` a contributor?
    pub fn is_contributor(&self, account: &Address) -> bool {
        self.contributors.contains(account)
    }

    // =========================================================================
    // SNAPSHOTS
    // =========================================================================

    /// Record an event.
    pub(crate) fn emit(&mut self, event: SaleEvent) {
        self.events.push(event);
    }

    /// Deterministic hash of the admission-relevant state.
    ///
    /// Two replays of the same call sequence produce the same hash.
    pub fn compute_hash(&self) -> Digest32 {
        let mut hasher = DigestHasher::for_sale_state();

        hasher.update_bytes(self.contract.as_bytes());
        hasher.update_bytes(self.operator.as_bytes());
        hasher.update_bytes(&self.merkle_root);
        hasher.update_u64(self.supply_cap);
        hasher.update_u128(self.mint_price);
        hasher.update_u64(self.reveal_delay);
        hasher.update_u8(self.commit_binding as u8);
        hasher.update_u8(self.stage.current() as u8);

        // BTreeMap iteration is address-ordered
        for (account, commitment) in self.commitments.iter() {
            hasher.update_bytes(account.as_bytes());
            hasher.update_bytes(&commitment.commit_hash);
            hasher.update_u64(commitment.commit_height);
            hasher.update_bool(commitment.revealed);
        }

        hasher.update_u64(self.tickets.capacity());
        for ticket in 1..=self.tickets.capacity() {
            hasher.update_bool(self.tickets.is_available(ticket));
        }

        for account in self.contributors.iter() {
            hasher.update_bytes(account.as_bytes());
        }

        hasher.update_u64(self.total_minted);
        hasher.update_u128(self.balance);
        hasher.update_u64(self.events.len() as u64);

        hasher.finalize()
    }

    /// Encode a binary snapshot.
    pub fn to_bytes(&self) -> Result<Vec<u8>, bincode::Error> {
        bincode::serialize(self)
    }

    /// Decode a binary snapshot and re-check construction invariants.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SnapshotError> {
        let state: SaleState = bincode::deserialize(bytes)?;
        state.validate()?;
        Ok(state)
    }

    /// Construction parameters this state was built from.
    pub fn config(&self) -> SaleConfig {
        SaleConfig {
            merkle_root: self.merkle_root,
            supply_cap: self.supply_cap,
            whitelist_size: self.tickets.capacity(),
            mint_price: self.mint_price,
            reveal_delay: self.reveal_delay,
            contract: self.contract,
            operator: self.operator,
            commit_binding: self.commit_binding,
        }
    }

    /// Check the invariants a freshly built state satisfies.
    pub fn validate(&self) -> Result<(), SnapshotError> {
        self.config().validate()?;
        if self.total_minted > self.supply_cap {
            return Err(SnapshotError::SupplyOverCap {
                minted: self.total_minted,
                cap: self.supply_cap,
            });
        }
        if !self.tickets.is_consistent() {
            return Err(SnapshotError::MalformedTickets);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SaleConfig {
        SaleConfig::new([9; 32], 6, 4, Address::repeat(0xcc), Address::repeat(0x0f))
    }

    #[test]
    fn test_new_state() {
        let state = SaleState::new(&config()).unwrap();
        assert_eq!(state.current_stage(), Stage::Inactive);
        assert_eq!(state.remaining_supply(), 6);
        assert_eq!(state.tickets.remaining(), 4);
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let mut config = config();
        config.supply_cap = 0;
        assert!(matches!(SaleState::new(&config), Err(ConfigError::ZeroSupplyCap)));
    }

    #[test]
    fn test_operator_guard() {
        let state = SaleState::new(&config()).unwrap();
        assert!(state.require_operator(&Address::repeat(0x0f)).is_ok());
        assert_eq!(state.require_operator(&Address::repeat(1)), Err(SaleError::NotOperator));
    }

    #[test]
    fn test_supply_guard() {
        let mut state = SaleState::new(&config()).unwrap();
        state.total_minted = 6;
        assert_eq!(state.require_supply(), Err(SaleError::CapExceeded { cap: 6 }));
    }

    #[test]
    fn test_consume_ticket() {
        let mut state = SaleState::new(&config()).unwrap();
        state.consume_ticket(2).unwrap();
        assert!(!state.is_ticket_available(2));
        assert_eq!(state.consume_ticket(2), Err(SaleError::TicketAlreadyUsed { ticket: 2 }));
        assert_eq!(state.require_ticket(5), Err(SaleError::TicketAlreadyUsed { ticket: 5 }));
    }

    #[test]
    fn test_hash_tracks_changes() {
        let mut state = SaleState::new(&config()).unwrap();
        let before = state.compute_hash();
        assert_eq!(before, SaleState::new(&config()).unwrap().compute_hash());

        state.consume_ticket(1).unwrap();
        assert_ne!(before, state.compute_hash());
    }

    #[test]
    fn test_hash_covers_commit_binding() {
        let token_only = SaleState::new(&config()).unwrap();
        let mut bound_config = config();
        bound_config.commit_binding = CommitBinding::AccountBound;
        let account_bound = SaleState::new(&bound_config).unwrap();

        assert_ne!(token_only.compute_hash(), account_bound.compute_hash());
    }

    #[test]
    fn test_config_reconstruction() {
        let state = SaleState::new(&config()).unwrap();
        assert_eq!(state.config(), config());
    }

    #[test]
    fn test_snapshot_over_cap_rejected() {
        let mut state = SaleState::new(&config()).unwrap();
        state.total_minted = 7;
        assert_eq!(state.remaining_supply(), 0);

        let bytes = state.to_bytes().unwrap();
        assert!(matches!(
            SaleState::from_bytes(&bytes),
            Err(SnapshotError::SupplyOverCap { minted: 7, cap: 6 })
        ));
    }

    #[test]
    fn test_snapshot_zero_root_rejected() {
        let mut state = SaleState::new(&config()).unwrap();
        state.merkle_root = [0; 32];

        let bytes = state.to_bytes().unwrap();
        assert!(matches!(
            SaleState::from_bytes(&bytes),
            Err(SnapshotError::Config(ConfigError::ZeroMerkleRoot))
        ));
    }

    #[test]
    fn test_snapshot_garbage_rejected() {
        assert!(matches!(
            SaleState::from_bytes(&[1, 2, 3]),
            Err(SnapshotError::Decode(_))
        ));
    }

    #[test]
    fn test_snapshot_roundtrip() {
        let mut state = SaleState::new(&config()).unwrap();
        state.commitments.commit(Address::repeat(1), [5; 32], 17);
        state.consume_ticket(3).unwrap();

        let bytes = state.to_bytes().unwrap();
        let restored = SaleState::from_bytes(&bytes).unwrap();
        assert_eq!(restored, state);
        assert_eq!(restored.compute_hash(), state.compute_hash());
    }
}
