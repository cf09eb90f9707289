//! Mint Gate Simulator
//!
//! Runs a scripted sale against the in-memory ledger and prints the event
//! log. Reads `MINT_GATE_*` variables when `MINT_GATE_MERKLE_ROOT` is set,
//! otherwise builds a demo whitelist.

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use mint_gate::{
    commit_hash, Address, CallContext, SaleConfig, SaleState, TokenLedger, TokenRegistry,
    Treasury, WhitelistTree, VERSION,
    proof::random_salt,
    sale::{
        activate_presale, activate_public_sale, add_contributor, commit, presale_mint,
        public_mint, withdraw,
    },
};

const CONTRACT: Address = Address::repeat(0xcc);
const OPERATOR: Address = Address::repeat(0x0f);
const DEVELOPER: Address = Address::repeat(0xde);

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Mint Gate Simulator v{}", VERSION);

    let whitelist: Vec<Address> = (1..=4).map(Address::repeat).collect();
    let tree = WhitelistTree::from_accounts(&whitelist);

    let config = if std::env::var("MINT_GATE_MERKLE_ROOT").is_ok() {
        SaleConfig::from_env().context("loading config from environment")?
    } else {
        SaleConfig::new(tree.root(), 6, whitelist.len() as u64, CONTRACT, OPERATOR)
    };

    info!("Merkle root: 0x{}", hex::encode(config.merkle_root));
    info!("Supply cap: {}, tickets: {}", config.supply_cap, config.whitelist_size);

    demo_sale(config, &tree, &whitelist)
}

/// Scripted presale and public sale.
fn demo_sale(config: SaleConfig, tree: &WhitelistTree, whitelist: &[Address]) -> Result<()> {
    info!("=== Starting Demo Sale ===");

    let mut state = SaleState::new(&config).context("building sale state")?;
    let mut ledger = TokenRegistry::new();
    let mut treasury = Treasury::new();
    let mut rng = StdRng::seed_from_u64(12345);
    let mut height = 1u64;

    let operator = CallContext::new(config.operator, height);
    add_contributor(&mut state, &operator, DEVELOPER)?;
    activate_presale(&mut state, &operator)?;

    // Presale: every whitelisted account commits, waits and mints
    let mut pending = Vec::new();
    for (i, account) in whitelist.iter().enumerate() {
        let token_id = 100 + i as u64;
        let salt = random_salt(&mut rng);
        let hash = commit_hash(config.commit_binding, &config.contract, account, token_id, &salt);
        commit(&mut state, &CallContext::new(*account, height), hash);
        pending.push((*account, i as u64 + 1, token_id, salt));
    }

    height += config.reveal_delay;

    for (account, ticket, token_id, salt) in &pending {
        let Some(proof) = tree.proof_for(account, *ticket) else {
            warn!("No whitelist proof for {}", account);
            continue;
        };
        let ctx = CallContext::new(*account, height);
        match presale_mint(&mut state, &mut ledger, &ctx, *ticket, &proof, *token_id, salt) {
            Ok(receipt) => info!("Minted token {} ({} of {})", receipt.token_id, receipt.total_minted, config.supply_cap),
            Err(err) => warn!("Presale mint by {} failed: {}", account.short(), err),
        }
    }

    // Replay of a used ticket must fail
    if let Some((account, ticket, _, _)) = pending.first() {
        let salt = random_salt(&mut rng);
        let hash = commit_hash(config.commit_binding, &config.contract, account, 999, &salt);
        commit(&mut state, &CallContext::new(*account, height), hash);
        height += config.reveal_delay;
        let proof = tree.proof_for(account, *ticket).unwrap_or_default();
        let ctx = CallContext::new(*account, height);
        if let Err(err) = presale_mint(&mut state, &mut ledger, &ctx, *ticket, &proof, 999, &salt) {
            info!("Ticket reuse rejected: {}", err);
        }
    }

    // Public sale
    activate_public_sale(&mut state, &CallContext::new(config.operator, height))?;

    let buyers: Vec<Address> = (0x50..0x54).map(Address::repeat).collect();
    let mut reveals = Vec::new();
    for (i, buyer) in buyers.iter().enumerate() {
        let token_id = 500 + i as u64;
        let salt = random_salt(&mut rng);
        let hash = commit_hash(config.commit_binding, &config.contract, buyer, token_id, &salt);
        commit(&mut state, &CallContext::new(*buyer, height), hash);
        reveals.push((*buyer, token_id, salt));
    }

    height += config.reveal_delay;

    for (buyer, token_id, salt) in &reveals {
        let ctx = CallContext::new(*buyer, height).with_value(config.mint_price);
        match public_mint(&mut state, &mut ledger, &ctx, *token_id, salt) {
            Ok(receipt) => info!("Minted token {} ({} of {})", receipt.token_id, receipt.total_minted, config.supply_cap),
            Err(err) => warn!("Public mint by {} failed: {}", buyer.short(), err),
        }
    }

    // Withdraw proceeds
    if state.balance > 0 {
        let amount = state.balance;
        withdraw(&mut state, &mut treasury, &CallContext::new(DEVELOPER, height), amount)?;
        info!("Developer received {}", treasury.credited(&DEVELOPER));
    }

    info!("=== Sale Results ===");
    info!("Stage: {:?}", state.current_stage());
    info!("Minted: {} / {}", state.total_minted, state.supply_cap);
    info!("Ledger supply: {}", ledger.total_supply());
    info!("Tickets remaining: {}", state.tickets.remaining());
    info!("State hash: {}", hex::encode(state.compute_hash()));

    let log = serde_json::to_string_pretty(&state.events).context("encoding event log")?;
    println!("{}", log);

    Ok(())
}
