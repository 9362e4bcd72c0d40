//! Swap instruction - constant product, fee on input

use amm_model::{quote_swap, SwapQuote};
use log::{debug, info, warn};
use solana_program::pubkey::Pubkey;

use crate::custody::{Custody, Movement};
use crate::error::AmmError;
use crate::state::{Pool, SwapDirection};

/// Swap outcome for the current vaults, without moving funds
pub fn quote_swap_for<C: Custody>(
    pool: &Pool,
    custody: &C,
    direction: SwapDirection,
    amount_in: u64,
) -> Result<SwapQuote, AmmError> {
    pool.ensure_unlocked()?;

    if amount_in == 0 {
        warn!("Error: Swap input must be greater than zero");
        return Err(AmmError::InvalidAmount);
    }

    let (mint_in, mint_out) = pool.swap_mints(direction);
    let reserve_in = custody.balance(&pool.address, &mint_in);
    let reserve_out = custody.balance(&pool.address, &mint_out);

    if reserve_in == 0 || reserve_out == 0 {
        warn!(
            "Error: Pool {} cannot swap {} with reserves in={} out={}",
            pool.address, direction, reserve_in, reserve_out
        );
        return Err(AmmError::NoLiquidity);
    }

    let quote = quote_swap(reserve_in, reserve_out, pool.fee_bps, amount_in)?;
    debug!(
        "Swap quote for pool {} ({}): in={} fee={} out={} vwap={}",
        pool.address, direction, quote.amount_in, quote.fee, quote.amount_out, quote.vwap_px
    );
    Ok(quote)
}

/// Process swap instruction
///
/// The gross input (fee included) goes into the input vault; the fee is
/// never split out, it simply stays in the reserve and grows k.
///
/// # Security Checks
/// - Pool is not locked
/// - Input is non-zero, both reserves non-empty
/// - Output at least `min_out`
/// - Caller holds the input
pub fn process_swap<C: Custody>(
    pool: &Pool,
    custody: &mut C,
    caller: &Pubkey,
    direction: SwapDirection,
    amount_in: u64,
    min_out: u64,
) -> Result<SwapQuote, AmmError> {
    let quote = quote_swap_for(pool, custody, direction, amount_in)?;

    if quote.amount_out < min_out {
        warn!("Error: Swap pays {} but caller wanted at least {}", quote.amount_out, min_out);
        return Err(AmmError::SlippageExceeded);
    }

    let (mint_in, mint_out) = pool.swap_mints(direction);

    if custody.balance(caller, &mint_in) < amount_in {
        warn!("Error: {} cannot fund swap input {}", caller, amount_in);
        return Err(AmmError::InsufficientBalance);
    }

    custody.settle(&[
        Movement::Transfer {
            asset: mint_in,
            from: *caller,
            to: pool.address,
            amount: quote.amount_in,
        },
        Movement::Transfer {
            asset: mint_out,
            from: pool.address,
            to: *caller,
            amount: quote.amount_out,
        },
    ])?;

    info!(
        "Swap on pool {} by {} ({}): in={} fee={} out={}",
        pool.address, caller, direction, quote.amount_in, quote.fee, quote.amount_out
    );

    Ok(quote)
}
