//! Initialize instruction - create a pool, its vaults and its LP mint

use log::{info, warn};
use solana_program::pubkey::Pubkey;

use crate::custody::Custody;
use crate::derive::IdentityDeriver;
use crate::error::AmmError;
use crate::state::{Pool, PoolStore};
use amm_model::MAX_FEE_BPS;

/// Claim tokens carry the same precision as the reserve mints
pub const LP_DECIMALS: u8 = 6;

/// Parameters for a new pool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InitializeParams {
    pub seed: u64,
    pub mint_x: Pubkey,
    pub mint_y: Pubkey,
    pub fee_bps: u16,
    pub authority: Option<Pubkey>,
}

/// Process initialize instruction
///
/// # Security Checks
/// - Fee within [0, 10000] bps
/// - Distinct reserve mints
/// - No pool already derived from this seed
/// - LP mint identity neither issued nor held by anyone
///
/// All checks run before anything is allocated.
pub fn process_initialize<S, C, D>(
    store: &mut S,
    custody: &mut C,
    deriver: &D,
    initializer: &Pubkey,
    params: InitializeParams,
) -> Result<Pool, AmmError>
where
    S: PoolStore,
    C: Custody,
    D: IdentityDeriver,
{
    if params.fee_bps > MAX_FEE_BPS {
        warn!("Error: Fee {} bps exceeds {} bps", params.fee_bps, MAX_FEE_BPS);
        return Err(AmmError::InvalidFee);
    }

    if params.mint_x == params.mint_y {
        warn!("Error: Mint X and mint Y are both {}", params.mint_x);
        return Err(AmmError::IdenticalMints);
    }

    let address = deriver.pool_address(params.seed);
    let lp_mint = deriver.lp_mint_address(&address);

    if store.contains(&address) {
        warn!("Error: Pool for seed {} already exists at {}", params.seed, address);
        return Err(AmmError::DuplicatePool);
    }

    if custody.asset_exists(&lp_mint) {
        warn!("Error: LP mint {} for seed {} is already issued or held", lp_mint, params.seed);
        return Err(AmmError::DuplicatePool);
    }

    custody.create_mint(lp_mint, address, LP_DECIMALS)?;
    custody.open_account(address, params.mint_x);
    custody.open_account(address, params.mint_y);

    let pool = Pool {
        address,
        seed: params.seed,
        mint_x: params.mint_x,
        mint_y: params.mint_y,
        fee_bps: params.fee_bps,
        authority: params.authority,
        locked: false,
        lp_mint,
    };
    store.insert(pool);

    info!(
        "Pool {} initialized by {} (seed={}, fee={} bps, lp_mint={})",
        address, initializer, params.seed, params.fee_bps, lp_mint
    );

    Ok(pool)
}
