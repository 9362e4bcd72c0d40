//! Withdraw instruction - burn claim tokens, return proportional reserves

use amm_model::{quote_withdraw, WithdrawQuote};
use log::{debug, info, warn};
use solana_program::pubkey::Pubkey;

use super::Reserves;
use crate::custody::{Custody, Movement};
use crate::error::AmmError;
use crate::state::Pool;

fn validate_withdraw(pool: &Pool, reserves: &Reserves, burn_amount: u64) -> Result<(), AmmError> {
    pool.ensure_unlocked()?;

    if reserves.lp_supply == 0 {
        warn!("Error: Pool {} has no liquidity", pool.address);
        return Err(AmmError::NoLiquidity);
    }

    if burn_amount == 0 {
        warn!("Error: Burn amount must be greater than zero");
        return Err(AmmError::InvalidAmount);
    }

    Ok(())
}

/// Reserves a burn of `burn_amount` would return, without moving funds
pub fn quote_withdraw_for(pool: &Pool, reserves: &Reserves, burn_amount: u64) -> Result<WithdrawQuote, AmmError> {
    validate_withdraw(pool, reserves, burn_amount)?;

    let quote = quote_withdraw(reserves.vault_x, reserves.vault_y, reserves.lp_supply, burn_amount)?;
    debug!(
        "Withdraw quote for pool {}: burn={} x={} y={}",
        pool.address, burn_amount, quote.amount_x, quote.amount_y
    );
    Ok(quote)
}

/// Process withdraw instruction
///
/// Burns the caller's claim tokens and pays out ⌊vault·burn/supply⌋ of each
/// reserve, as a single custody batch.
///
/// # Security Checks
/// - Pool is not locked
/// - Claim-token supply is non-zero (checked before anything about the burn)
/// - Burn amount is non-zero and within the caller's claim balance
/// - Payouts at least `min_x`/`min_y`
pub fn process_withdraw<C: Custody>(
    pool: &Pool,
    custody: &mut C,
    caller: &Pubkey,
    burn_amount: u64,
    min_x: u64,
    min_y: u64,
) -> Result<WithdrawQuote, AmmError> {
    let reserves = Reserves::load(pool, custody)?;
    validate_withdraw(pool, &reserves, burn_amount)?;

    let held = custody.balance(caller, &pool.lp_mint);
    if held < burn_amount {
        warn!("Error: {} holds {} claim tokens, tried to burn {}", caller, held, burn_amount);
        return Err(AmmError::InsufficientBalance);
    }

    let quote = quote_withdraw_for(pool, &reserves, burn_amount)?;

    if quote.amount_x < min_x || quote.amount_y < min_y {
        warn!(
            "Error: Withdraw pays x={} y={}, caller wanted x>={} y>={}",
            quote.amount_x, quote.amount_y, min_x, min_y
        );
        return Err(AmmError::SlippageExceeded);
    }

    custody.settle(&[
        Movement::Burn {
            asset: pool.lp_mint,
            from: *caller,
            amount: burn_amount,
        },
        Movement::Transfer {
            asset: pool.mint_x,
            from: pool.address,
            to: *caller,
            amount: quote.amount_x,
        },
        Movement::Transfer {
            asset: pool.mint_y,
            from: pool.address,
            to: *caller,
            amount: quote.amount_y,
        },
    ])?;

    info!(
        "Withdraw from pool {} by {}: burned={} x={} y={}",
        pool.address, caller, burn_amount, quote.amount_x, quote.amount_y
    );

    Ok(quote)
}
