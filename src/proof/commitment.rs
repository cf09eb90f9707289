//! Commit-Reveal Register
//!
//! Minters first publish `H(contract ‖ token_id ‖ salt)`, then reveal
//! `(token_id, salt)` inside the mint call once enough blocks have passed.
//! The token ID stays hidden from anyone watching pending calls until the
//! delay has elapsed.

use std::collections::BTreeMap;

use rand::Rng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::core::address::Address;
use crate::core::hash::Digest32;

/// Domain separator for commitments.
const COMMITMENT_DOMAIN: &[u8] = b"MINT_GATE_COMMIT_V1";

/// Token identifier chosen by the minter.
pub type TokenId = u64;

/// Secret salt mixed into a commitment.
pub type Salt = [u8; 32];

/// Generate a fresh random salt.
pub fn random_salt<R: Rng>(rng: &mut R) -> Salt {
    let mut salt = [0u8; 32];
    rng.fill(&mut salt);
    salt
}

/// What the commitment hash binds besides token ID and salt.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommitBinding {
    /// `H(contract ‖ token_id ‖ salt)`.
    #[default]
    TokenOnly,
    /// `H(contract ‖ account ‖ token_id ‖ salt)`. A copied commitment is
    /// useless to any other account.
    AccountBound,
}

/// Compute the commitment hash a minter publishes.
pub fn commit_hash(
    binding: CommitBinding,
    contract: &Address,
    account: &Address,
    token_id: TokenId,
    salt: &Salt,
) -> Digest32 {
    let mut hasher = Sha256::new();
    hasher.update(COMMITMENT_DOMAIN);
    hasher.update(contract.as_bytes());
    if binding == CommitBinding::AccountBound {
        hasher.update(account.as_bytes());
    }
    hasher.update(token_id.to_be_bytes());
    hasher.update(salt);
    hasher.finalize().into()
}

/// A live commitment for one account.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commitment {
    /// Published hash.
    pub commit_hash: Digest32,
    /// Block height when the commit was recorded.
    pub commit_height: u64,
    /// Set once a mint has consumed this commitment.
    pub revealed: bool,
}

/// Reveal parameters, checked against the stored commitment.
#[derive(Clone, Copy, Debug)]
pub struct Reveal<'a> {
    /// Token the minter committed to.
    pub token_id: TokenId,
    /// Salt used in the commitment.
    pub salt: &'a Salt,
}

/// Errors from the commit-reveal protocol.
///
/// All of these are recoverable: commit again and wait out the delay.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommitmentError {
    /// No live (unrevealed) commitment for the account.
    #[error("must commit first")]
    MustCommitFirst,

    /// Reveal attempted before the delay elapsed.
    #[error("reveal too early: {remaining_blocks} blocks remaining")]
    RevealTooEarly {
        /// `commit_height + delay - current_height`.
        remaining_blocks: u64,
    },

    /// Recomputed hash differs from the stored one.
    #[error("token id and salt do not match committed hash")]
    IdAndSaltDoesNotMatchCommitted,
}

/// Per-account commitment storage.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRegister {
    entries: BTreeMap<Address, Commitment>,
}

impl CommitRegister {
    /// Create an empty register.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a commitment, replacing any previous one for `account`.
    pub fn commit(&mut self, account: Address, hash: Digest32, height: u64) {
        self.entries.insert(
            account,
            Commitment {
                commit_hash: hash,
                commit_height: height,
                revealed: false,
            },
        );
    }

    /// Current commitment for `account` (revealed or not).
    pub fn get(&self, account: &Address) -> Option<&Commitment> {
        self.entries.get(account)
    }

    /// Blocks left before `account` may reveal. Zero once the delay elapsed;
    /// None without a live commitment.
    pub fn blocks_until_reveal(&self, account: &Address, current_height: u64, delay: u64) -> Option<u64> {
        let commitment = self.entries.get(account).filter(|c| !c.revealed)?;
        Some(
            commitment
                .commit_height
                .saturating_add(delay)
                .saturating_sub(current_height),
        )
    }

    /// Validate a reveal without mutating anything.
    ///
    /// Check order: live commitment, delay, hash.
    pub fn check_reveal(
        &self,
        account: &Address,
        reveal: Reveal<'_>,
        current_height: u64,
        delay: u64,
        contract: &Address,
        binding: CommitBinding,
    ) -> Result<(), CommitmentError> {
        // 1. Live commitment
        let commitment = self
            .entries
            .get(account)
            .filter(|c| !c.revealed)
            .ok_or(CommitmentError::MustCommitFirst)?;

        // 2. Delay elapsed
        let ready_at = commitment.commit_height.saturating_add(delay);
        if current_height < ready_at {
            return Err(CommitmentError::RevealTooEarly {
                remaining_blocks: ready_at - current_height,
            });
        }

        // 3. Hash matches
        let computed = commit_hash(binding, contract, account, reveal.token_id, reveal.salt);
        if computed != commitment.commit_hash {
            return Err(CommitmentError::IdAndSaltDoesNotMatchCommitted);
        }

        Ok(())
    }

    /// Mark the account's commitment consumed. Returns false without a live
    /// commitment.
    pub fn mark_revealed(&mut self, account: &Address) -> bool {
        match self.entries.get_mut(account) {
            Some(commitment) if !commitment.revealed => {
                commitment.revealed = true;
                true
            }
            _ => false,
        }
    }

    /// Number of accounts that have ever committed.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nobody has committed.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over all commitments in address order.
    pub fn iter(&self) -> impl Iterator<Item = (&Address, &Commitment)> {
        self.entries.iter()
    }
}
