//! Pool lifecycle: create, lock/unlock, inspect

use anyhow::{Context, Result};
use colored::Colorize;
use cpamm::{Custody, InitializeParams, PoolSnapshot, PoolStore, SCALE};
use solana_sdk::pubkey::Pubkey;

use crate::client::Session;

/// Render a 1e6-scaled value as a decimal
pub fn format_scaled(value: u128) -> String {
    let scale = SCALE as u128;
    format!("{}.{:06}", value / scale, value % scale)
}

pub fn initialize_pool(
    session: &mut Session,
    seed: u64,
    mint_x: Pubkey,
    mint_y: Pubkey,
    fee_bps: u16,
    authority: Option<Pubkey>,
) -> Result<()> {
    println!("{}", "=== Initialize Pool ===".bright_green().bold());
    println!("{} {}", "Seed:".bright_cyan(), seed);
    println!("{} {}", "Mint X:".bright_cyan(), mint_x);
    println!("{} {}", "Mint Y:".bright_cyan(), mint_y);
    println!("{} {} bps", "Fee:".bright_cyan(), fee_bps);

    let caller = session.caller;
    let pool = session
        .engine
        .initialize(
            &caller,
            InitializeParams {
                seed,
                mint_x,
                mint_y,
                fee_bps,
                authority,
            },
        )
        .context("Initialize rejected")?;
    session.commit()?;

    println!("\n{}", "Pool created".bright_green());
    println!("{} {}", "Pool:".bright_cyan(), pool.address);
    println!("{} {}", "LP Mint:".bright_cyan(), pool.lp_mint);
    match pool.authority {
        Some(authority) => println!("{} {}", "Authority:".bright_cyan(), authority),
        None => println!("{} {}", "Authority:".bright_cyan(), "none (pool can never be locked)".dimmed()),
    }
    Ok(())
}

pub fn set_locked(session: &mut Session, pool: &str, locked: bool) -> Result<()> {
    let address = session.resolve_pool(pool)?;
    let title = if locked { "=== Lock Pool ===" } else { "=== Unlock Pool ===" };
    println!("{}", title.bright_green().bold());
    println!("{} {}", "Pool:".bright_cyan(), address);

    let caller = session.caller;
    session
        .engine
        .set_locked(&address, &caller, locked)
        .context("Lock change rejected")?;
    session.commit()?;

    let state = if locked { "locked".yellow() } else { "unlocked".bright_green() };
    println!("\n{} {}", "Pool is now".bright_cyan(), state);
    Ok(())
}

fn print_snapshot(snap: &PoolSnapshot) {
    println!("\n{} {}", "Pool:".bright_cyan(), snap.address);
    println!("  {} {}", "Seed:".bright_cyan(), snap.seed);
    println!("  {} {}", "Mint X:".bright_cyan(), snap.mint_x);
    println!("  {} {}", "Mint Y:".bright_cyan(), snap.mint_y);
    println!("  {} {}", "LP Mint:".bright_cyan(), snap.lp_mint);
    println!("  {} {} bps", "Fee:".bright_cyan(), snap.fee_bps);
    match snap.authority {
        Some(authority) => println!("  {} {}", "Authority:".bright_cyan(), authority),
        None => println!("  {} {}", "Authority:".bright_cyan(), "none".dimmed()),
    }
    let state = if snap.locked { "locked".yellow() } else { "open".bright_green() };
    println!("  {} {}", "State:".bright_cyan(), state);
    println!("  {} {}", "Vault X:".bright_cyan(), snap.vault_x);
    println!("  {} {}", "Vault Y:".bright_cyan(), snap.vault_y);
    println!("  {} {}", "LP Supply:".bright_cyan(), snap.lp_supply);
    match snap.spot_price() {
        Some(price) => println!("  {} {}", "Spot Price (Y per X):".bright_cyan(), format_scaled(price)),
        None => println!("  {} {}", "Spot Price (Y per X):".bright_cyan(), "n/a".dimmed()),
    }
    if snap.has_residual_dust() {
        println!(
            "  {}",
            "Unclaimed vault balance: accrues to the next depositor".yellow()
        );
    }
}

pub fn show_status(session: &Session, pool: Option<&str>) -> Result<()> {
    println!("{}", "=== Pool Status ===".bright_green().bold());

    let addresses: Vec<Pubkey> = match pool {
        Some(pool) => vec![session.resolve_pool(pool)?],
        None if session.engine.store().is_empty() => {
            println!("\n{}", "No pools found".dimmed());
            return Ok(());
        }
        None => {
            println!("{} {}", "Pools:".bright_cyan(), session.engine.store().len());
            session.engine.pools().map(|p| p.address).collect()
        }
    };

    for address in addresses {
        let snap = session.engine.snapshot(&address).context("Pool lookup failed")?;
        print_snapshot(&snap);
    }
    Ok(())
}

pub fn show_balances(session: &Session, owner: Option<Pubkey>) -> Result<()> {
    let owner = owner.unwrap_or(session.caller);
    println!("{}", "=== Balances ===".bright_green().bold());
    println!("{} {}", "Owner:".bright_cyan(), owner);

    let custody = session.engine.custody();
    let mut any = false;
    for (holder, mint, amount) in custody.holdings() {
        if *holder != owner || amount == 0 {
            continue;
        }
        any = true;
        let label = if custody.mint(mint).is_some() { " (LP)" } else { "" };
        println!("  {}{} {}", mint.to_string().bright_cyan(), label.dimmed(), amount);
    }

    if !any {
        println!("\n{}", "No balances".dimmed());
    }
    Ok(())
}
