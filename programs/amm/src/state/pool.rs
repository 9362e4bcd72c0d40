//! Pool configuration record

use std::fmt;
use std::str::FromStr;

use amm_model::spot_price;
use solana_program::pubkey::Pubkey;

use crate::error::AmmError;

/// Pool config
/// PDA: ["config", seed_le]
///
/// Mints and fee are fixed at creation. Reserves and claim-token supply are
/// not stored here; they are read live from custody on every operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pool {
    /// Derived pool identity, owner of both vaults and the LP mint authority
    pub address: Pubkey,
    pub seed: u64,
    pub mint_x: Pubkey,
    pub mint_y: Pubkey,
    /// Swap fee in basis points
    pub fee_bps: u16,
    /// Who may lock/unlock; None means nobody, ever
    pub authority: Option<Pubkey>,
    /// Emergency pause switch
    pub locked: bool,
    /// PDA: ["lp", address]
    pub lp_mint: Pubkey,
}

impl Pool {
    pub fn ensure_unlocked(&self) -> Result<(), AmmError> {
        if self.locked {
            return Err(AmmError::PoolLocked);
        }
        Ok(())
    }

    pub fn is_authority(&self, caller: &Pubkey) -> bool {
        self.authority.as_ref() == Some(caller)
    }

    /// (input mint, output mint) for a swap direction
    pub fn swap_mints(&self, direction: SwapDirection) -> (Pubkey, Pubkey) {
        match direction {
            SwapDirection::XToY => (self.mint_x, self.mint_y),
            SwapDirection::YToX => (self.mint_y, self.mint_x),
        }
    }
}

/// Which reserve a swap pays into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SwapDirection {
    XToY,
    YToX,
}

impl SwapDirection {
    /// `true` sells X for Y
    pub fn from_is_x(is_x: bool) -> Self {
        if is_x {
            SwapDirection::XToY
        } else {
            SwapDirection::YToX
        }
    }
}

impl fmt::Display for SwapDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SwapDirection::XToY => write!(f, "x-to-y"),
            SwapDirection::YToX => write!(f, "y-to-x"),
        }
    }
}

impl FromStr for SwapDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "x-to-y" | "xy" | "x" => Ok(SwapDirection::XToY),
            "y-to-x" | "yx" | "y" => Ok(SwapDirection::YToX),
            other => Err(format!("unknown swap direction '{}', use x-to-y or y-to-x", other)),
        }
    }
}

/// Persisted per-pool layout with live balances filled in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolSnapshot {
    pub address: Pubkey,
    pub seed: u64,
    pub mint_x: Pubkey,
    pub mint_y: Pubkey,
    pub fee_bps: u16,
    pub authority: Option<Pubkey>,
    pub locked: bool,
    pub lp_mint: Pubkey,
    pub lp_supply: u64,
    pub vault_x: u64,
    pub vault_y: u64,
}

impl PoolSnapshot {
    /// Price of X in Y (scaled by 1e6)
    pub fn spot_price(&self) -> Option<u128> {
        spot_price(self.vault_x, self.vault_y)
    }

    /// Vault balances nobody holds a claim on
    pub fn has_residual_dust(&self) -> bool {
        self.lp_supply == 0 && (self.vault_x > 0 || self.vault_y > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool(authority: Option<Pubkey>) -> Pool {
        Pool {
            address: Pubkey::new_unique(),
            seed: 1,
            mint_x: Pubkey::new_unique(),
            mint_y: Pubkey::new_unique(),
            fee_bps: 30,
            authority,
            locked: false,
            lp_mint: Pubkey::new_unique(),
        }
    }

    #[test]
    fn test_authority_check() {
        let admin = Pubkey::new_unique();
        let p = pool(Some(admin));
        assert!(p.is_authority(&admin));
        assert!(!p.is_authority(&Pubkey::new_unique()));

        let orphan = pool(None);
        assert!(!orphan.is_authority(&admin));
    }

    #[test]
    fn test_swap_mints_follow_direction() {
        let p = pool(None);
        assert_eq!(p.swap_mints(SwapDirection::XToY), (p.mint_x, p.mint_y));
        assert_eq!(p.swap_mints(SwapDirection::YToX), (p.mint_y, p.mint_x));
    }

    #[test]
    fn test_direction_parsing() {
        assert_eq!("x-to-y".parse::<SwapDirection>(), Ok(SwapDirection::XToY));
        assert_eq!("YX".parse::<SwapDirection>(), Ok(SwapDirection::YToX));
        assert!("sideways".parse::<SwapDirection>().is_err());
        assert_eq!(SwapDirection::from_is_x(false), SwapDirection::YToX);
        assert_eq!(SwapDirection::XToY.to_string(), "x-to-y");
    }

    #[test]
    fn test_locked_pool_rejects() {
        let mut p = pool(None);
        assert_eq!(p.ensure_unlocked(), Ok(()));
        p.locked = true;
        assert_eq!(p.ensure_unlocked(), Err(AmmError::PoolLocked));
    }
}
