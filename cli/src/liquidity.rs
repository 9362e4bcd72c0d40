//! Liquidity provider operations

use anyhow::{Context, Result};
use colored::Colorize;

use crate::client::Session;

pub fn deposit(session: &mut Session, pool: &str, amount: u64, max_x: u64, max_y: u64) -> Result<()> {
    let address = session.resolve_pool(pool)?;
    println!("{}", "=== Deposit Liquidity ===".bright_green().bold());
    println!("{} {}", "Pool:".bright_cyan(), address);
    println!("{} {}", "LP Amount:".bright_cyan(), amount);
    println!("{} {} / {}", "Max X / Y:".bright_cyan(), max_x, max_y);

    let caller = session.caller;
    let quote = session
        .engine
        .deposit(&address, &caller, amount, max_x, max_y)
        .context("Deposit rejected")?;
    session.commit()?;

    println!("\n{}", "Deposit settled".bright_green());
    println!("{} {}", "Paid X:".bright_cyan(), quote.amount_x);
    println!("{} {}", "Paid Y:".bright_cyan(), quote.amount_y);
    println!("{} {}", "LP Minted:".bright_cyan(), quote.lp_minted);
    Ok(())
}

pub fn withdraw(session: &mut Session, pool: &str, burn: u64, min_x: u64, min_y: u64) -> Result<()> {
    let address = session.resolve_pool(pool)?;
    println!("{}", "=== Withdraw Liquidity ===".bright_green().bold());
    println!("{} {}", "Pool:".bright_cyan(), address);
    println!("{} {}", "LP Burned:".bright_cyan(), burn);
    println!("{} {} / {}", "Min X / Y:".bright_cyan(), min_x, min_y);

    let caller = session.caller;
    let quote = session
        .engine
        .withdraw(&address, &caller, burn, min_x, min_y)
        .context("Withdraw rejected")?;
    session.commit()?;

    println!("\n{}", "Withdraw settled".bright_green());
    println!("{} {}", "Received X:".bright_cyan(), quote.amount_x);
    println!("{} {}", "Received Y:".bright_cyan(), quote.amount_y);
    println!(
        "{} {}%",
        "Supply Remaining:".bright_cyan(),
        crate::pool::format_scaled(quote.remaining_ratio as u128 * 100)
    );
    Ok(())
}
