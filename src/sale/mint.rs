//! Admission Orchestrator
//!
//! Commit and mint entry points. Each mint runs every check before the first
//! mutation, so a failed call leaves the state, the ledger and the event log
//! exactly as they were.

use tracing::{debug, info};

use crate::core::address::Address;
use crate::core::hash::{short_hex, Digest32};
use crate::ledger::token::TokenLedger;
use crate::proof::commitment::{Reveal, Salt, TokenId};
use crate::proof::merkle::{verify, whitelist_leaf};
use crate::sale::error::SaleError;
use crate::sale::events::SaleEvent;
use crate::sale::stage::Stage;
use crate::sale::state::{CallContext, SaleState};

/// Outcome of a successful mint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MintReceipt {
    /// New owner.
    pub to: Address,
    /// Minted token.
    pub token_id: TokenId,
    /// Ticket redeemed (presale only).
    pub ticket: Option<u64>,
    /// Supply after this mint.
    pub total_minted: u64,
}

/// Record the caller's commitment, replacing any previous one.
///
/// Allowed in every stage.
pub fn commit(state: &mut SaleState, ctx: &CallContext, hash: Digest32) {
    state.commitments.commit(ctx.caller, hash, ctx.block_height);
    debug!(
        "Commit {} by {} at block {}",
        short_hex(&hash),
        ctx.caller.short(),
        ctx.block_height
    );
    state.emit(SaleEvent::commit_recorded(ctx.block_height, ctx.caller, hash));
}

/// Whitelist mint.
///
/// Check order (first failure wins): stage, ticket nonzero, proof nonempty,
/// live commitment, reveal delay, commitment hash, whitelist proof, ticket
/// unused, supply cap, token not yet minted.
#[allow(clippy::too_many_arguments)]
pub fn presale_mint<L: TokenLedger>(
    state: &mut SaleState,
    ledger: &mut L,
    ctx: &CallContext,
    ticket: u64,
    proof: &[Digest32],
    token_id: TokenId,
    salt: &Salt,
) -> Result<MintReceipt, SaleError> {
    state.stage.require(Stage::PreSale)?;

    // 1. Input presence
    if ticket == 0 {
        return Err(SaleError::TicketNotProvided);
    }
    if proof.is_empty() {
        return Err(SaleError::ProofNotProvided);
    }

    // 2. Commitment
    check_reveal(state, ctx, token_id, salt)?;

    // 3. Whitelist membership
    let leaf = whitelist_leaf(&ctx.caller, ticket);
    if !verify(proof, &state.merkle_root, &leaf) {
        return Err(SaleError::InvalidProof);
    }

    // 4. Ticket, supply, balance, ledger
    state.require_ticket(ticket)?;
    state.require_supply()?;
    let balance = credited_balance(state, ctx)?;
    require_unminted(ledger, token_id)?;

    // Effects
    ledger.mint(ctx.caller, token_id)?;
    state.consume_ticket(ticket)?;
    let receipt = settle(state, ctx, token_id, Some(ticket), balance);

    info!(
        "Presale mint: token {} to {} with ticket {}",
        token_id,
        ctx.caller.short(),
        ticket
    );
    Ok(receipt)
}

/// Public mint. Requires exactly `mint_price` attached.
pub fn public_mint<L: TokenLedger>(
    state: &mut SaleState,
    ledger: &mut L,
    ctx: &CallContext,
    token_id: TokenId,
    salt: &Salt,
) -> Result<MintReceipt, SaleError> {
    state.stage.require(Stage::PublicSale)?;

    // 1. Payment
    if ctx.value != state.mint_price {
        return Err(SaleError::WrongValue {
            expected: state.mint_price,
            got: ctx.value,
        });
    }

    // 2. Commitment
    check_reveal(state, ctx, token_id, salt)?;

    // 3. Supply, balance, ledger
    state.require_supply()?;
    let balance = credited_balance(state, ctx)?;
    require_unminted(ledger, token_id)?;

    // Effects
    ledger.mint(ctx.caller, token_id)?;
    let receipt = settle(state, ctx, token_id, None, balance);

    info!("Public mint: token {} to {}", token_id, ctx.caller.short());
    Ok(receipt)
}

fn check_reveal(state: &SaleState, ctx: &CallContext, token_id: TokenId, salt: &Salt) -> Result<(), SaleError> {
    state.commitments.check_reveal(
        &ctx.caller,
        Reveal { token_id, salt },
        ctx.block_height,
        state.reveal_delay,
        &state.contract,
        state.commit_binding,
    )?;
    Ok(())
}

/// Balance after crediting the attached value.
fn credited_balance(state: &SaleState, ctx: &CallContext) -> Result<u128, SaleError> {
    state
        .balance
        .checked_add(ctx.value)
        .ok_or(SaleError::BalanceOverflow {
            balance: state.balance,
            value: ctx.value,
        })
}

fn require_unminted<L: TokenLedger>(ledger: &L, token_id: TokenId) -> Result<(), SaleError> {
    if ledger.exists(token_id) {
        return Err(SaleError::TokenAlreadyMinted(token_id));
    }
    Ok(())
}

/// Infallible bookkeeping after the ledger accepted the mint.
fn settle(
    state: &mut SaleState,
    ctx: &CallContext,
    token_id: TokenId,
    ticket: Option<u64>,
    balance: u128,
) -> MintReceipt {
    state.commitments.mark_revealed(&ctx.caller);
    state.total_minted += 1;
    state.balance = balance;
    state.emit(SaleEvent::minted(ctx.block_height, ctx.caller, token_id));

    MintReceipt {
        to: ctx.caller,
        token_id,
        ticket,
        total_minted: state.total_minted,
    }
}
