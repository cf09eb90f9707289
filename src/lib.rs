//! # Mint Gate
//!
//! Deterministic admission control for a staged NFT mint: whitelist
//! presale, public sale, commit-reveal token selection and contributor
//! withdrawals. Usable as a simulator or test harness for the on-chain
//! logic it mirrors.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        MINT GATE                            │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Deterministic primitives                 │
//! │  ├── hash.rs     - SHA-256 helpers                          │
//! │  ├── address.rs  - 20-byte account addresses                │
//! │  └── bitmap.rs   - Once-only ticket bitmap                  │
//! │                                                             │
//! │  proof/          - Admission proofs                         │
//! │  ├── merkle.rs   - Sorted-pair whitelist tree               │
//! │  └── commitment.rs - Commit-reveal register                 │
//! │                                                             │
//! │  sale/           - Stage machine and entry points           │
//! │  ledger/         - Token ledger and value transfer traits   │
//! │  config.rs       - Construction-time configuration          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Execution Model
//!
//! Every operation takes `&mut SaleState` plus a [`CallContext`] carrying
//! the caller, block height and attached value. Operations either succeed
//! completely or return a [`SaleError`] with nothing changed.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod config;
pub mod core;
pub mod ledger;
pub mod proof;
pub mod sale;

// Re-export commonly used types
pub use config::{ConfigError, SaleConfig};
pub use crate::core::address::Address;
pub use crate::core::hash::Digest32;
pub use ledger::{Amount, TokenLedger, TokenRegistry, Treasury, ValueTransfer};
pub use proof::{commit_hash, CommitBinding, Salt, TokenId, WhitelistTree};
pub use sale::{CallContext, SaleError, SaleState, SnapshotError, Stage};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default blocks between commit and reveal.
pub const DEFAULT_REVEAL_DELAY: u64 = 10;

/// Default public-sale price (0.08 in 18-decimal units).
pub const DEFAULT_MINT_PRICE: Amount = 80_000_000_000_000_000;

/// Largest accepted whitelist (ticket count). The ticket bitmap for this
/// many tickets is 2 MiB.
pub const MAX_WHITELIST_SIZE: u64 = 1 << 24;
