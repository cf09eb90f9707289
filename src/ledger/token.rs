//! Token Ledger
//!
//! Ownership bookkeeping for minted tokens.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::address::Address;
use crate::proof::commitment::TokenId;

/// Errors reported by a token ledger.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// Token ID already has an owner.
    #[error("token {0} already minted")]
    AlreadyMinted(TokenId),
    /// Mint to the zero address.
    #[error("cannot mint to the zero address")]
    ZeroRecipient,
}

/// Non-fungible token ledger.
pub trait TokenLedger {
    /// Mint `token_id` to `to`.
    fn mint(&mut self, to: Address, token_id: TokenId) -> Result<(), LedgerError>;

    /// Current owner of `token_id`.
    fn owner_of(&self, token_id: TokenId) -> Option<Address>;

    /// Number of tokens minted through this ledger.
    fn total_supply(&self) -> u64;

    /// Has `token_id` been minted?
    fn exists(&self, token_id: TokenId) -> bool {
        self.owner_of(token_id).is_some()
    }
}

/// In-memory token ledger.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TokenRegistry {
    owners: BTreeMap<TokenId, Address>,
}

impl TokenRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tokens held by `account`.
    pub fn balance_of(&self, account: &Address) -> usize {
        self.owners.values().filter(|owner| *owner == account).count()
    }

    /// Tokens held by `account`, ascending.
    pub fn tokens_of(&self, account: &Address) -> Vec<TokenId> {
        self.owners
            .iter()
            .filter(|(_, owner)| *owner == account)
            .map(|(id, _)| *id)
            .collect()
    }
}

impl TokenLedger for TokenRegistry {
    fn mint(&mut self, to: Address, token_id: TokenId) -> Result<(), LedgerError> {
        if to.is_zero() {
            return Err(LedgerError::ZeroRecipient);
        }
        if self.owners.contains_key(&token_id) {
            return Err(LedgerError::AlreadyMinted(token_id));
        }
        self.owners.insert(token_id, to);
        Ok(())
    }

    fn owner_of(&self, token_id: TokenId) -> Option<Address> {
        self.owners.get(&token_id).copied()
    }

    fn total_supply(&self) -> u64 {
        self.owners.len() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mint_and_owner() {
        let mut registry = TokenRegistry::new();
        let alice = Address::repeat(1);

        registry.mint(alice, 123).unwrap();
        assert_eq!(registry.owner_of(123), Some(alice));
        assert!(registry.exists(123));
        assert!(!registry.exists(124));
        assert_eq!(registry.total_supply(), 1);
        assert_eq!(registry.balance_of(&alice), 1);
    }

    #[test]
    fn test_double_mint_fails() {
        let mut registry = TokenRegistry::new();
        registry.mint(Address::repeat(1), 7).unwrap();
        assert_eq!(
            registry.mint(Address::repeat(2), 7),
            Err(LedgerError::AlreadyMinted(7))
        );
        assert_eq!(registry.owner_of(7), Some(Address::repeat(1)));
    }

    #[test]
    fn test_mint_to_zero_fails() {
        let mut registry = TokenRegistry::new();
        assert_eq!(registry.mint(Address::ZERO, 1), Err(LedgerError::ZeroRecipient));
        assert_eq!(registry.total_supply(), 0);
    }

    #[test]
    fn test_tokens_of_sorted() {
        let mut registry = TokenRegistry::new();
        let bob = Address::repeat(2);
        registry.mint(bob, 30).unwrap();
        registry.mint(bob, 10).unwrap();
        registry.mint(Address::repeat(3), 20).unwrap();
        assert_eq!(registry.tokens_of(&bob), vec![10, 30]);
    }
}
