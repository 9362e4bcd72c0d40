//! SetLocked instruction
//!
//! Lets the pool authority pause and resume the pool. While locked, deposit,
//! withdraw and swap are rejected; state is kept as-is.

use log::{info, warn};
use solana_program::pubkey::Pubkey;

use crate::error::AmmError;
use crate::state::Pool;

/// Process set_locked instruction
///
/// # Errors
/// * Unauthorized - caller is not the authority, or the pool has none
pub fn process_set_locked(pool: &mut Pool, caller: &Pubkey, locked: bool) -> Result<(), AmmError> {
    if !pool.is_authority(caller) {
        match pool.authority {
            Some(_) => warn!("Error: {} is not the authority of pool {}", caller, pool.address),
            None => warn!("Error: Pool {} has no authority", pool.address),
        }
        return Err(AmmError::Unauthorized);
    }

    pool.locked = locked;
    info!("Pool {} {}", pool.address, if locked { "locked" } else { "unlocked" });

    Ok(())
}
