//! Admission Proofs
//!
//! The two cryptographic checks a mint must pass:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    ADMISSION PROOFS                         │
//! ├─────────────────────────────────────────────────────────────┤
//! │  merkle.rs     - Sorted-pair whitelist tree and verifier    │
//! │  commitment.rs - Commit-reveal register for token IDs       │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod commitment;
pub mod merkle;

// Re-export key types
pub use commitment::{
    commit_hash, random_salt, CommitBinding, CommitRegister, Commitment, CommitmentError, Reveal,
    Salt, TokenId,
};
pub use merkle::{hash_sorted_pair, verify, whitelist_leaf, WhitelistTree};
