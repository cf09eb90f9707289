//! Core primitives.
//!
//! Hashing, account identity and the ticket bitmap. Everything here is
//! deterministic and free of I/O so the admission logic built on top can be
//! replayed and compared by state hash.

pub mod address;
pub mod bitmap;
pub mod hash;

// Re-export core types
pub use address::Address;
pub use bitmap::TicketBitmap;
pub use hash::{Digest32, DigestHasher, ZERO_DIGEST, hash_with_domain, short_hex};
