//! External Collaborators
//!
//! Traits for the services the sale consumes but does not own, plus
//! in-memory implementations used by the simulator and tests.

pub mod token;
pub mod treasury;

pub use token::{LedgerError, TokenLedger, TokenRegistry};
pub use treasury::{Amount, Treasury, TransferError, ValueTransfer};
