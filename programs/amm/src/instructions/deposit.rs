//! Deposit instruction - add reserves, mint claim tokens

use amm_model::{quote_deposit, DepositQuote};
use log::{debug, info, warn};
use solana_program::pubkey::Pubkey;

use super::Reserves;
use crate::custody::{Custody, Movement};
use crate::error::AmmError;
use crate::state::Pool;

/// Amounts a deposit of `amount` claim tokens would take, without moving funds
pub fn quote_deposit_for(pool: &Pool, reserves: &Reserves, amount: u64) -> Result<DepositQuote, AmmError> {
    pool.ensure_unlocked()?;

    if amount == 0 {
        warn!("Error: Deposit amount must be greater than zero");
        return Err(AmmError::InvalidAmount);
    }

    let quote = quote_deposit(reserves.vault_x, reserves.vault_y, reserves.lp_supply, amount)?;
    debug!(
        "Deposit quote for pool {}: x={} y={} lp={}",
        pool.address, quote.amount_x, quote.amount_y, quote.lp_minted
    );
    Ok(quote)
}

/// Process deposit instruction
///
/// Moves the proportional X and Y from the caller into the vaults and mints
/// `amount` claim tokens to the caller, as a single custody batch.
///
/// # Security Checks
/// - Pool is not locked
/// - Amount is non-zero
/// - Required X/Y within caller's `max_x`/`max_y`
/// - Caller holds enough X and Y
pub fn process_deposit<C: Custody>(
    pool: &Pool,
    custody: &mut C,
    caller: &Pubkey,
    amount: u64,
    max_x: u64,
    max_y: u64,
) -> Result<DepositQuote, AmmError> {
    let reserves = Reserves::load(pool, custody)?;
    let quote = quote_deposit_for(pool, &reserves, amount)?;

    if quote.amount_x > max_x || quote.amount_y > max_y {
        warn!(
            "Error: Deposit needs x={} y={}, caller allowed x<={} y<={}",
            quote.amount_x, quote.amount_y, max_x, max_y
        );
        return Err(AmmError::SlippageExceeded);
    }

    if custody.balance(caller, &pool.mint_x) < quote.amount_x
        || custody.balance(caller, &pool.mint_y) < quote.amount_y
    {
        warn!("Error: {} cannot fund deposit of x={} y={}", caller, quote.amount_x, quote.amount_y);
        return Err(AmmError::InsufficientBalance);
    }

    if reserves.lp_supply == 0 && (reserves.vault_x > 0 || reserves.vault_y > 0) {
        warn!(
            "Pool {} bootstraps over unclaimed vault balances x={} y={}; they accrue to {}",
            pool.address, reserves.vault_x, reserves.vault_y, caller
        );
    }

    custody.settle(&[
        Movement::Transfer {
            asset: pool.mint_x,
            from: *caller,
            to: pool.address,
            amount: quote.amount_x,
        },
        Movement::Transfer {
            asset: pool.mint_y,
            from: *caller,
            to: pool.address,
            amount: quote.amount_y,
        },
        Movement::MintTo {
            asset: pool.lp_mint,
            authority: pool.address,
            to: *caller,
            amount: quote.lp_minted,
        },
    ])?;

    info!(
        "Deposit into pool {} by {}: x={} y={} lp_minted={}",
        pool.address, caller, quote.amount_x, quote.amount_y, quote.lp_minted
    );

    Ok(quote)
}
