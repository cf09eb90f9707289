//! Sale Errors
//!
//! Every failed call aborts with exactly one of these, before any state is
//! touched. Variants are specific so callers can branch on cause.

use thiserror::Error;

use crate::ledger::token::LedgerError;
use crate::ledger::treasury::{Amount, TransferError};
use crate::proof::commitment::{CommitmentError, TokenId};
use crate::sale::stage::Stage;

/// Broad failure classes, used for retry decisions and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Call made in the wrong sale stage.
    Stage,
    /// Malformed arguments (zero ticket, empty proof, wrong payment, zero amount).
    Input,
    /// Whitelist membership or ticket redemption failed.
    Whitelist,
    /// Commit-reveal protocol violated.
    CommitReveal,
    /// Supply exhausted.
    Capacity,
    /// Caller lacks the required role.
    Authorization,
    /// Funds or ledger side effect refused (transfers, balance, ledger).
    Settlement,
}

/// Errors returned by sale operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SaleError {
    /// Current stage differs from the one the operation requires.
    #[error("stage mismatch: required {required:?}, current {current:?}")]
    StageMismatch {
        /// Stage the operation requires.
        required: Stage,
        /// Stage the sale is in.
        current: Stage,
    },

    /// Ticket argument was zero.
    #[error("ticket not provided")]
    TicketNotProvided,

    /// Merkle proof was empty.
    #[error("proof not provided")]
    ProofNotProvided,

    /// Merkle proof does not lead to the whitelist root.
    #[error("invalid whitelist proof")]
    InvalidProof,

    /// Ticket already redeemed (or never issued).
    #[error("ticket {ticket} already used")]
    TicketAlreadyUsed {
        /// Offending ticket.
        ticket: u64,
    },

    /// No live commitment for the caller.
    #[error("must commit first")]
    MustCommitFirst,

    /// Reveal attempted before the delay elapsed.
    #[error("reveal too early: {remaining_blocks} blocks remaining")]
    RevealTooEarly {
        /// Blocks until the reveal becomes valid.
        remaining_blocks: u64,
    },

    /// Revealed token ID and salt do not hash to the commitment.
    #[error("token id and salt do not match committed hash")]
    IdAndSaltDoesNotMatchCommitted,

    /// Supply cap reached.
    #[error("supply cap of {cap} reached")]
    CapExceeded {
        /// Configured cap.
        cap: u64,
    },

    /// Attached payment differs from the mint price.
    #[error("wrong value: expected {expected}, got {got}")]
    WrongValue {
        /// Mint price.
        expected: Amount,
        /// Attached value.
        got: Amount,
    },

    /// Token ID already has an owner in the ledger.
    #[error("token {0} already minted")]
    TokenAlreadyMinted(TokenId),

    /// Caller is not the operator.
    #[error("caller is not the operator")]
    NotOperator,

    /// Contributor address is zero.
    #[error("invalid contributor address")]
    InvalidContributor,

    /// Caller is not a registered contributor.
    #[error("caller is not a contributor")]
    NotContributor,

    /// Withdrawal of zero.
    #[error("amount must be greater than zero")]
    ZeroAmount,

    /// Withdrawal larger than the collected balance.
    #[error("insufficient balance: requested {requested}, available {available}")]
    InsufficientBalance {
        /// Requested amount.
        requested: Amount,
        /// Collected balance.
        available: Amount,
    },

    /// Crediting the attached value would overflow the collected balance.
    #[error("balance overflow: {balance} + {value}")]
    BalanceOverflow {
        /// Balance before the call.
        balance: Amount,
        /// Value attached to the call.
        value: Amount,
    },

    /// The value-transfer primitive reported failure.
    #[error("transfer failed: {0}")]
    TransferFailed(#[from] TransferError),

    /// The token ledger refused the mint for another reason.
    #[error("ledger error: {0}")]
    Ledger(LedgerError),
}

impl SaleError {
    /// Failure class of this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::StageMismatch { .. } => ErrorCategory::Stage,
            Self::TicketNotProvided
            | Self::ProofNotProvided
            | Self::WrongValue { .. }
            | Self::ZeroAmount
            | Self::InvalidContributor => ErrorCategory::Input,
            Self::InvalidProof | Self::TicketAlreadyUsed { .. } => ErrorCategory::Whitelist,
            Self::MustCommitFirst
            | Self::RevealTooEarly { .. }
            | Self::IdAndSaltDoesNotMatchCommitted => ErrorCategory::CommitReveal,
            Self::CapExceeded { .. } => ErrorCategory::Capacity,
            Self::NotOperator | Self::NotContributor => ErrorCategory::Authorization,
            Self::TokenAlreadyMinted(_)
            | Self::InsufficientBalance { .. }
            | Self::BalanceOverflow { .. }
            | Self::TransferFailed(_)
            | Self::Ledger(_) => ErrorCategory::Settlement,
        }
    }

    /// Can the same caller succeed later by re-committing and waiting?
    pub fn is_recoverable(&self) -> bool {
        self.category() == ErrorCategory::CommitReveal
    }
}

impl From<CommitmentError> for SaleError {
    fn from(err: CommitmentError) -> Self {
        match err {
            CommitmentError::MustCommitFirst => Self::MustCommitFirst,
            CommitmentError::RevealTooEarly { remaining_blocks } => {
                Self::RevealTooEarly { remaining_blocks }
            }
            CommitmentError::IdAndSaltDoesNotMatchCommitted => Self::IdAndSaltDoesNotMatchCommitted,
        }
    }
}

impl From<LedgerError> for SaleError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::AlreadyMinted(id) => Self::TokenAlreadyMinted(id),
            other => Self::Ledger(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commitment_errors_map_flat() {
        let err: SaleError = CommitmentError::RevealTooEarly { remaining_blocks: 4 }.into();
        assert_eq!(err, SaleError::RevealTooEarly { remaining_blocks: 4 });
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_ledger_errors_map() {
        let err: SaleError = LedgerError::AlreadyMinted(9).into();
        assert_eq!(err, SaleError::TokenAlreadyMinted(9));

        let err: SaleError = LedgerError::ZeroRecipient.into();
        assert_eq!(err, SaleError::Ledger(LedgerError::ZeroRecipient));
    }

    #[test]
    fn test_categories() {
        assert_eq!(
            SaleError::StageMismatch { required: Stage::PreSale, current: Stage::Inactive }.category(),
            ErrorCategory::Stage
        );
        assert_eq!(SaleError::ProofNotProvided.category(), ErrorCategory::Input);
        assert_eq!(SaleError::InvalidProof.category(), ErrorCategory::Whitelist);
        assert_eq!(SaleError::CapExceeded { cap: 1 }.category(), ErrorCategory::Capacity);
        assert_eq!(SaleError::NotContributor.category(), ErrorCategory::Authorization);
        assert_eq!(
            SaleError::BalanceOverflow { balance: 1, value: 2 }.category(),
            ErrorCategory::Settlement
        );
        assert!(!SaleError::TicketAlreadyUsed { ticket: 1 }.is_recoverable());
    }

    #[test]
    fn test_display() {
        let err = SaleError::WrongValue { expected: 10, got: 9 };
        assert_eq!(err.to_string(), "wrong value: expected 10, got 9");
    }
}
