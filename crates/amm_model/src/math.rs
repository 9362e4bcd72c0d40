//! Constant product settlement math (x·y=k)

use crate::fixed::{checked_add, checked_sub, mul_wide, scaled_ratio};
use crate::{CurveError, BPS_SCALE, MAX_FEE_BPS, PRECISION, SCALE};

/// Amounts a depositor supplies and the claim tokens they receive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepositQuote {
    /// X the depositor must supply
    pub amount_x: u64,
    /// Y the depositor must supply
    pub amount_y: u64,
    /// Claim tokens minted to the depositor
    pub lp_minted: u64,
}

/// Reserves returned for burning claim tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WithdrawQuote {
    /// X paid out of the vault
    pub amount_x: u64,
    /// Y paid out of the vault
    pub amount_y: u64,
    /// Share of the supply still outstanding after the burn (scaled by PRECISION)
    pub remaining_ratio: u64,
}

/// Swap quote with fee breakdown and VWAP
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapQuote {
    /// Gross input, fee included
    pub amount_in: u64,
    /// Portion of the input retained as fee
    pub fee: u64,
    /// Input that moves along the curve
    pub net_in: u64,
    /// Output paid to the trader
    pub amount_out: u64,
    /// Input reserve after the swap (gross input credited)
    pub new_reserve_in: u64,
    /// Output reserve after the swap
    pub new_reserve_out: u64,
    /// Output per unit of input (scaled by SCALE)
    pub vwap_px: u128,
}

/// Calculate the reserves a deposit of `amount` claim tokens requires
///
/// - Empty supply: the first depositor sets a 1:1 price, x = y = lp = amount
/// - Otherwise: x = ⌊amount·vault_x / lp_supply⌋, y likewise, lp = amount
///
/// # Arguments
/// * `vault_x` / `vault_y` - Live vault balances
/// * `lp_supply` - Outstanding claim tokens
/// * `amount` - Claim tokens to mint (must be > 0)
pub fn quote_deposit(
    vault_x: u64,
    vault_y: u64,
    lp_supply: u64,
    amount: u64,
) -> Result<DepositQuote, CurveError> {
    if amount == 0 {
        return Err(CurveError::InvalidAmount);
    }

    // Supply must be able to absorb the mint
    checked_add(lp_supply, amount)?;

    if lp_supply == 0 {
        return Ok(DepositQuote {
            amount_x: amount,
            amount_y: amount,
            lp_minted: amount,
        });
    }

    Ok(DepositQuote {
        amount_x: scaled_ratio(amount, lp_supply, vault_x)?,
        amount_y: scaled_ratio(amount, lp_supply, vault_y)?,
        lp_minted: amount,
    })
}

/// Calculate the reserves returned for burning `burn_amount` claim tokens
///
/// out = ⌊vault·burn / lp_supply⌋ for each side. The floor keeps every
/// payout at or below the exact proportional share; burning the whole
/// supply returns the whole vaults.
///
/// # Arguments
/// * `vault_x` / `vault_y` - Live vault balances
/// * `lp_supply` - Outstanding claim tokens (must be > 0)
/// * `burn_amount` - Claim tokens to burn (0 < burn <= lp_supply)
pub fn quote_withdraw(
    vault_x: u64,
    vault_y: u64,
    lp_supply: u64,
    burn_amount: u64,
) -> Result<WithdrawQuote, CurveError> {
    if lp_supply == 0 {
        return Err(CurveError::InsufficientLiquidity);
    }
    if burn_amount == 0 || burn_amount > lp_supply {
        return Err(CurveError::InvalidAmount);
    }

    let remaining = lp_supply - burn_amount;

    Ok(WithdrawQuote {
        amount_x: scaled_ratio(burn_amount, lp_supply, vault_x)?,
        amount_y: scaled_ratio(burn_amount, lp_supply, vault_y)?,
        remaining_ratio: scaled_ratio(remaining, lp_supply, PRECISION)?,
    })
}

/// Calculate a fee-on-input swap along x·y=k
///
/// - fee = ⌊amount_in·fee_bps / 10000⌋
/// - net = amount_in - fee
/// - out = ⌊net·reserve_out / (reserve_in + net)⌋
///
/// The fee is left in the input reserve, so k grows whenever fee > 0.
///
/// # Arguments
/// * `reserve_in` - Vault receiving the input (must be > 0)
/// * `reserve_out` - Vault paying the output (must be > 0)
/// * `fee_bps` - Pool fee in basis points (0..=10000)
/// * `amount_in` - Gross input (must be > 0)
pub fn quote_swap(
    reserve_in: u64,
    reserve_out: u64,
    fee_bps: u16,
    amount_in: u64,
) -> Result<SwapQuote, CurveError> {
    if fee_bps > MAX_FEE_BPS {
        return Err(CurveError::InvalidFee);
    }
    if reserve_in == 0 || reserve_out == 0 {
        return Err(CurveError::InsufficientLiquidity);
    }
    if amount_in == 0 {
        return Err(CurveError::InvalidAmount);
    }

    // Gross input lands in the vault, so it must fit first
    let new_reserve_in = checked_add(reserve_in, amount_in)?;

    let fee = scaled_ratio(amount_in, BPS_SCALE, fee_bps as u64)?;
    let net_in = checked_sub(amount_in, fee)?;

    // reserve_in + net_in <= new_reserve_in, cannot overflow
    let denominator = reserve_in + net_in;
    let amount_out = scaled_ratio(net_in, denominator, reserve_out)?;

    // net_in / (reserve_in + net_in) < 1, so the output vault never empties
    let new_reserve_out = checked_sub(reserve_out, amount_out)?;

    let vwap_px = mul_wide(amount_out, SCALE) / amount_in as u128;

    Ok(SwapQuote {
        amount_in,
        fee,
        net_in,
        amount_out,
        new_reserve_in,
        new_reserve_out,
        vwap_px,
    })
}

/// k = x·y
#[inline]
pub fn invariant(reserve_x: u64, reserve_y: u64) -> u128 {
    mul_wide(reserve_x, reserve_y)
}

/// Price of X in Y (scaled by SCALE), None while X is empty
pub fn spot_price(reserve_x: u64, reserve_y: u64) -> Option<u128> {
    if reserve_x == 0 {
        return None;
    }
    Some(mul_wide(reserve_y, SCALE) / reserve_x as u128)
}


// ═══════════════════════════════════════════════════════════════
// KANI FORMAL VERIFICATION PROOFS
// ═══════════════════════════════════════════════════════════════

#[cfg(kani)]
mod kani_proofs {
    use super::*;

    /// A1: k never decreases across a swap, and grows when a fee is taken
    #[kani::proof]
    #[kani::unwind(3)]
    fn a1_invariant_non_decreasing() {
        let x0: u64 = kani::any();
        let y0: u64 = kani::any();
        let dx: u64 = kani::any();
        let fee_bps: u16 = kani::any();

        kani::assume(x0 > 0 && x0 < 1 << 40);
        kani::assume(y0 > 0 && y0 < 1 << 40);
        kani::assume(dx > 0 && dx < 1 << 40);
        kani::assume(fee_bps <= MAX_FEE_BPS);

        if let Ok(q) = quote_swap(x0, y0, fee_bps, dx) {
            let k0 = invariant(x0, y0);
            let k1 = invariant(q.new_reserve_in, q.new_reserve_out);
            assert!(k1 >= k0, "A1: invariant must not decrease");
            if q.fee > 0 {
                assert!(k1 > k0, "A1: fee must grow invariant");
            }
        }
    }

    /// A2: output is non-decreasing in input
    #[kani::proof]
    #[kani::unwind(3)]
    fn a2_output_monotonic_in_input() {
        let x0: u64 = kani::any();
        let y0: u64 = kani::any();
        let a: u64 = kani::any();
        let b: u64 = kani::any();
        let fee_bps: u16 = kani::any();

        kani::assume(x0 > 0 && x0 < 1 << 32);
        kani::assume(y0 > 0 && y0 < 1 << 32);
        kani::assume(a > 0 && a <= b && b < 1 << 32);
        kani::assume(fee_bps <= MAX_FEE_BPS);

        if let (Ok(qa), Ok(qb)) = (quote_swap(x0, y0, fee_bps, a), quote_swap(x0, y0, fee_bps, b)) {
            assert!(qa.amount_out <= qb.amount_out, "A2: output monotonic in input");
        }
    }

    /// A3: output is non-increasing in fee
    #[kani::proof]
    #[kani::unwind(3)]
    fn a3_output_antitone_in_fee() {
        let x0: u64 = kani::any();
        let y0: u64 = kani::any();
        let dx: u64 = kani::any();
        let f1: u16 = kani::any();
        let f2: u16 = kani::any();

        kani::assume(x0 > 0 && x0 < 1 << 32);
        kani::assume(y0 > 0 && y0 < 1 << 32);
        kani::assume(dx > 0 && dx < 1 << 32);
        kani::assume(f1 <= f2 && f2 <= MAX_FEE_BPS);

        if let (Ok(q1), Ok(q2)) = (quote_swap(x0, y0, f1, dx), quote_swap(x0, y0, f2, dx)) {
            assert!(q2.amount_out <= q1.amount_out, "A3: higher fee never pays more");
        }
    }

    /// W1: a withdrawal never pays more than the exact proportional share
    #[kani::proof]
    #[kani::unwind(3)]
    fn w1_withdraw_bounded_by_share() {
        let vx: u64 = kani::any();
        let vy: u64 = kani::any();
        let lp: u64 = kani::any();
        let burn: u64 = kani::any();

        kani::assume(lp > 0 && lp < 1 << 40);
        kani::assume(burn > 0 && burn <= lp);
        kani::assume(vx < 1 << 40 && vy < 1 << 40);

        if let Ok(q) = quote_withdraw(vx, vy, lp, burn) {
            assert!(mul_wide(q.amount_x, lp) <= mul_wide(vx, burn), "W1: x over-paid");
            assert!(mul_wide(q.amount_y, lp) <= mul_wide(vy, burn), "W1: y over-paid");
            assert!(q.amount_x <= vx && q.amount_y <= vy, "W1: vault overdrawn");
        }
    }
}
