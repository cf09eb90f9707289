//! Operator Actions
//!
//! Stage activation and reveal-delay tuning. All are operator-only.

use tracing::info;

use crate::sale::error::SaleError;
use crate::sale::events::{SaleEvent, SaleEventData};
use crate::sale::stage::Stage;
use crate::sale::state::{CallContext, SaleState};

fn advance(state: &mut SaleState, ctx: &CallContext, from: Stage, to: Stage) -> Result<(), SaleError> {
    state.require_operator(&ctx.caller)?;
    state.stage.transition(from, to)?;

    info!("Stage changed: {:?} -> {:?} at block {}", from, to, ctx.block_height);
    state.emit(SaleEvent::stage_changed(ctx.block_height, from, to));
    Ok(())
}

/// Inactive → PreSale.
pub fn activate_presale(state: &mut SaleState, ctx: &CallContext) -> Result<(), SaleError> {
    advance(state, ctx, Stage::Inactive, Stage::PreSale)
}

/// PreSale → PublicSale.
pub fn activate_public_sale(state: &mut SaleState, ctx: &CallContext) -> Result<(), SaleError> {
    advance(state, ctx, Stage::PreSale, Stage::PublicSale)
}

/// Change the number of blocks between commit and reveal.
///
/// Applies to existing commitments too: the delay is read at reveal time.
pub fn set_reveal_delay(state: &mut SaleState, ctx: &CallContext, new_delay: u64) -> Result<(), SaleError> {
    state.require_operator(&ctx.caller)?;

    let old_delay = state.reveal_delay;
    state.reveal_delay = new_delay;

    info!("Reveal delay changed: {} -> {}", old_delay, new_delay);
    state.emit(SaleEvent::new(
        ctx.block_height,
        SaleEventData::RevealDelayChanged { old_delay, new_delay },
    ));
    Ok(())
}
