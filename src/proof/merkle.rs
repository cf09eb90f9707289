//! Whitelist Merkle Tree
//!
//! Binary Merkle tree over `(account, ticket)` leaves using SHA-256 and
//! sorted-pair node hashing. Because siblings are ordered by value rather
//! than position, a proof is just the list of sibling hashes.

use crate::core::address::Address;
use crate::core::hash::{hash_with_domain, Digest32};
use sha2::{Digest, Sha256};

/// Domain separator for whitelist leaves.
const LEAF_DOMAIN: &[u8] = b"MINT_GATE_WHITELIST_LEAF_V1";

/// Domain separator for internal nodes.
const NODE_DOMAIN: &[u8] = b"MINT_GATE_WHITELIST_NODE_V1";

/// Padding leaf (hash of empty domain).
fn empty_hash() -> Digest32 {
    hash_with_domain(b"MINT_GATE_WHITELIST_EMPTY_V1", &[])
}

/// Leaf for a whitelist entry: `H(account ‖ ticket)`.
pub fn whitelist_leaf(account: &Address, ticket: u64) -> Digest32 {
    let mut hasher = Sha256::new();
    hasher.update(LEAF_DOMAIN);
    hasher.update(account.as_bytes());
    hasher.update(ticket.to_be_bytes());
    hasher.finalize().into()
}

/// Hash two nodes in ascending byte order.
pub fn hash_sorted_pair(a: &Digest32, b: &Digest32) -> Digest32 {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    let mut hasher = Sha256::new();
    hasher.update(NODE_DOMAIN);
    hasher.update(lo);
    hasher.update(hi);
    hasher.finalize().into()
}

/// Recompute the root from `leaf` and `proof` and compare with `root`.
pub fn verify(proof: &[Digest32], root: &Digest32, leaf: &Digest32) -> bool {
    let computed = proof
        .iter()
        .fold(*leaf, |current, sibling| hash_sorted_pair(&current, sibling));
    computed == *root
}

/// Whitelist tree for generating roots and proofs off-chain.
///
/// Leaves are padded to a power of two (minimum two), so every proof carries
/// at least one sibling.
#[derive(Clone, Debug)]
pub struct WhitelistTree {
    /// Entries in insertion order.
    entries: Vec<(Address, u64)>,
    /// All tree levels (leaves at index 0, root at last index).
    levels: Vec<Vec<Digest32>>,
}

impl WhitelistTree {
    /// Build a tree from whitelist entries.
    pub fn from_entries(entries: &[(Address, u64)]) -> Self {
        let mut leaves: Vec<Digest32> = entries
            .iter()
            .map(|(account, ticket)| whitelist_leaf(account, *ticket))
            .collect();

        // Pad to power of 2 for balanced tree
        let target_size = leaves.len().next_power_of_two().max(2);
        leaves.resize(target_size, empty_hash());

        let mut levels = vec![leaves];
        loop {
            let current = &levels[levels.len() - 1];
            if current.len() <= 1 {
                break;
            }
            let next: Vec<Digest32> = current
                .chunks(2)
                .map(|pair| hash_sorted_pair(&pair[0], &pair[1]))
                .collect();
            levels.push(next);
        }

        Self {
            entries: entries.to_vec(),
            levels,
        }
    }

    /// Build the standard whitelist where `accounts[i]` holds ticket `i + 1`.
    pub fn from_accounts(accounts: &[Address]) -> Self {
        let entries: Vec<(Address, u64)> = accounts
            .iter()
            .enumerate()
            .map(|(i, account)| (*account, i as u64 + 1))
            .collect();
        Self::from_entries(&entries)
    }

    /// Root hash.
    pub fn root(&self) -> Digest32 {
        self.levels
            .last()
            .and_then(|level| level.first())
            .copied()
            .unwrap_or_else(empty_hash)
    }

    /// Number of real (unpadded) entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the tree has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Proof for the entry at `index`. None if out of bounds.
    pub fn proof_at(&self, index: usize) -> Option<Vec<Digest32>> {
        if index >= self.entries.len() {
            return None;
        }

        let mut siblings = Vec::with_capacity(self.levels.len().saturating_sub(1));
        let mut current_index = index;

        // Walk up the tree, collecting sibling hashes
        for level in &self.levels[..self.levels.len() - 1] {
            siblings.push(level[current_index ^ 1]);
            current_index /= 2;
        }

        Some(siblings)
    }

    /// Proof for a specific `(account, ticket)` entry.
    pub fn proof_for(&self, account: &Address, ticket: u64) -> Option<Vec<Digest32>> {
        let index = self
            .entries
            .iter()
            .position(|(a, t)| a == account && *t == ticket)?;
        self.proof_at(index)
    }
}
