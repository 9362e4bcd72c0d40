//! Swaps and read-only quotes

use anyhow::{Context, Result};
use colored::Colorize;
use cpamm::{SwapDirection, SwapQuote};

use crate::client::Session;
use crate::pool::format_scaled;

fn print_swap_quote(quote: &SwapQuote) {
    println!("{} {}", "Input:".bright_cyan(), quote.amount_in);
    println!("{} {}", "Fee:".bright_cyan(), quote.fee);
    println!("{} {}", "Net Input:".bright_cyan(), quote.net_in);
    println!("{} {}", "Output:".bright_cyan(), quote.amount_out);
    println!("{} {}", "VWAP:".bright_cyan(), format_scaled(quote.vwap_px));
    println!(
        "{} {} / {}",
        "Reserves After (in / out):".bright_cyan(),
        quote.new_reserve_in,
        quote.new_reserve_out
    );
}

pub fn swap(
    session: &mut Session,
    pool: &str,
    direction: SwapDirection,
    amount_in: u64,
    min_out: u64,
) -> Result<()> {
    let address = session.resolve_pool(pool)?;
    println!("{}", "=== Swap ===".bright_green().bold());
    println!("{} {}", "Pool:".bright_cyan(), address);
    println!("{} {}", "Direction:".bright_cyan(), direction);
    println!("{} {}", "Min Output:".bright_cyan(), min_out);

    let caller = session.caller;
    let quote = session
        .engine
        .swap(&address, &caller, direction, amount_in, min_out)
        .context("Swap rejected")?;
    session.commit()?;

    println!("\n{}", "Swap settled".bright_green());
    print_swap_quote(&quote);
    Ok(())
}

pub fn quote_swap(session: &Session, pool: &str, direction: SwapDirection, amount_in: u64) -> Result<()> {
    let address = session.resolve_pool(pool)?;
    println!("{}", "=== Swap Quote ===".bright_green().bold());
    println!("{} {}", "Pool:".bright_cyan(), address);
    println!("{} {}", "Direction:".bright_cyan(), direction);

    let quote = session
        .engine
        .preview_swap(&address, direction, amount_in)
        .context("Swap would be rejected")?;
    print_swap_quote(&quote);
    Ok(())
}

pub fn quote_deposit(session: &Session, pool: &str, amount: u64) -> Result<()> {
    let address = session.resolve_pool(pool)?;
    println!("{}", "=== Deposit Quote ===".bright_green().bold());
    println!("{} {}", "Pool:".bright_cyan(), address);

    let quote = session
        .engine
        .preview_deposit(&address, amount)
        .context("Deposit would be rejected")?;
    println!("{} {}", "Needs X:".bright_cyan(), quote.amount_x);
    println!("{} {}", "Needs Y:".bright_cyan(), quote.amount_y);
    println!("{} {}", "LP Minted:".bright_cyan(), quote.lp_minted);
    Ok(())
}

pub fn quote_withdraw(session: &Session, pool: &str, burn: u64) -> Result<()> {
    let address = session.resolve_pool(pool)?;
    println!("{}", "=== Withdraw Quote ===".bright_green().bold());
    println!("{} {}", "Pool:".bright_cyan(), address);

    let quote = session
        .engine
        .preview_withdraw(&address, burn)
        .context("Withdraw would be rejected")?;
    println!("{} {}", "Returns X:".bright_cyan(), quote.amount_x);
    println!("{} {}", "Returns Y:".bright_cyan(), quote.amount_y);
    Ok(())
}
