pub mod initialize;
pub mod set_locked;
pub mod deposit;
pub mod withdraw;
pub mod swap;

pub use initialize::*;
pub use set_locked::*;
pub use deposit::*;
pub use withdraw::*;
pub use swap::*;

use crate::custody::Custody;
use crate::error::AmmError;
use crate::state::Pool;

/// Live custody balances behind a pool, read fresh for every operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reserves {
    pub vault_x: u64,
    pub vault_y: u64,
    pub lp_supply: u64,
}

impl Reserves {
    pub fn load<C: Custody>(pool: &Pool, custody: &C) -> Result<Self, AmmError> {
        let lp_supply = custody.supply(&pool.lp_mint).ok_or(AmmError::PoolNotFound)?;
        Ok(Self {
            vault_x: custody.balance(&pool.address, &pool.mint_x),
            vault_y: custody.balance(&pool.address, &pool.mint_y),
            lp_supply,
        })
    }
}
