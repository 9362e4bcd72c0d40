//! Asset custody
//!
//! Balances are keyed by `(owner, asset)`. A pool's reserve vaults are simply
//! the pool identity's balances of `mint_x` and `mint_y`; a holder's claim
//! tokens are their balance of the pool's LP mint.
//!
//! The engine never mutates custody piecemeal. It builds the full list of
//! movements for an operation and hands it to [`Custody::settle`], which
//! applies all of them or none.

use std::collections::BTreeMap;

use solana_program::pubkey::Pubkey;
use thiserror::Error;

/// One balance change inside a settlement batch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Movement {
    /// Move `amount` of `asset` from `from` to `to`
    Transfer {
        asset: Pubkey,
        from: Pubkey,
        to: Pubkey,
        amount: u64,
    },
    /// Create `amount` new units of `asset` for `to`, signed by the mint authority
    MintTo {
        asset: Pubkey,
        authority: Pubkey,
        to: Pubkey,
        amount: u64,
    },
    /// Destroy `amount` units of `asset` held by `from`
    Burn { asset: Pubkey, from: Pubkey, amount: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CustodyError {
    #[error("unknown mint {0}")]
    UnknownMint(Pubkey),

    #[error("mint {0} already exists")]
    MintExists(Pubkey),

    #[error("signer is not the mint authority of {0}")]
    NotMintAuthority(Pubkey),

    #[error("insufficient funds")]
    InsufficientFunds,

    #[error("balance or supply overflow")]
    Overflow,
}

/// Token type tracked by custody
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MintInfo {
    /// Only this principal may mint
    pub authority: Pubkey,
    pub decimals: u8,
    pub supply: u64,
}

/// Asset-custody service consumed by the engine
pub trait Custody {
    /// Balance of `asset` held by `owner` (0 for accounts never touched)
    fn balance(&self, owner: &Pubkey, asset: &Pubkey) -> u64;

    /// Mint metadata, None for assets custody does not issue
    fn mint(&self, asset: &Pubkey) -> Option<&MintInfo>;

    /// True if custody issues `asset` or anyone holds a balance of it
    fn asset_exists(&self, asset: &Pubkey) -> bool;

    /// Register a new token type with zero supply. Fails if the identity
    /// is already issued or already held, so a new mint never starts with
    /// balances its supply does not account for.
    fn create_mint(&mut self, asset: Pubkey, authority: Pubkey, decimals: u8) -> Result<(), CustodyError>;

    /// Allocate an empty holding for `owner`; no-op if it already exists
    fn open_account(&mut self, owner: Pubkey, asset: Pubkey);

    /// Apply every movement in order, or none of them
    fn settle(&mut self, movements: &[Movement]) -> Result<(), CustodyError>;

    /// Outstanding supply of a custody-issued asset
    fn supply(&self, asset: &Pubkey) -> Option<u64> {
        self.mint(asset).map(|m| m.supply)
    }
}

/// In-process custody backed by ordered maps
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryCustody {
    balances: BTreeMap<(Pubkey, Pubkey), u64>,
    mints: BTreeMap<Pubkey, MintInfo>,
}

impl MemoryCustody {
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit `amount` of an externally issued asset to `owner`.
    ///
    /// This is how outside funds enter custody (genesis allocations, test
    /// setup). Custody-issued assets only change supply through `settle`.
    pub fn fund(&mut self, owner: Pubkey, asset: Pubkey, amount: u64) -> Result<(), CustodyError> {
        if self.mints.contains_key(&asset) {
            return Err(CustodyError::MintExists(asset));
        }
        let balance = self.balances.entry((owner, asset)).or_insert(0);
        *balance = balance.checked_add(amount).ok_or(CustodyError::Overflow)?;
        Ok(())
    }

    /// Every non-empty or explicitly opened holding, ordered by (owner, asset)
    pub fn holdings(&self) -> impl Iterator<Item = (&Pubkey, &Pubkey, u64)> {
        self.balances.iter().map(|((owner, asset), amount)| (owner, asset, *amount))
    }

    /// Every custody-issued asset
    pub fn mints(&self) -> impl Iterator<Item = (&Pubkey, &MintInfo)> {
        self.mints.iter()
    }

    /// Rebuild custody from persisted parts
    pub fn from_parts(
        holdings: impl IntoIterator<Item = (Pubkey, Pubkey, u64)>,
        mints: impl IntoIterator<Item = (Pubkey, MintInfo)>,
    ) -> Self {
        Self {
            balances: holdings
                .into_iter()
                .map(|(owner, asset, amount)| ((owner, asset), amount))
                .collect(),
            mints: mints.into_iter().collect(),
        }
    }
}

/// Working copy of a balance: the overlay value if already touched in this
/// batch, otherwise the committed value.
fn staged<'a>(
    committed: &BTreeMap<(Pubkey, Pubkey), u64>,
    overlay: &'a mut BTreeMap<(Pubkey, Pubkey), u64>,
    key: (Pubkey, Pubkey),
) -> &'a mut u64 {
    overlay
        .entry(key)
        .or_insert_with(|| committed.get(&key).copied().unwrap_or(0))
}

impl Custody for MemoryCustody {
    fn balance(&self, owner: &Pubkey, asset: &Pubkey) -> u64 {
        self.balances.get(&(*owner, *asset)).copied().unwrap_or(0)
    }

    fn mint(&self, asset: &Pubkey) -> Option<&MintInfo> {
        self.mints.get(asset)
    }

    fn asset_exists(&self, asset: &Pubkey) -> bool {
        self.mints.contains_key(asset) || self.balances.keys().any(|(_, held)| held == asset)
    }

    fn create_mint(&mut self, asset: Pubkey, authority: Pubkey, decimals: u8) -> Result<(), CustodyError> {
        if self.asset_exists(&asset) {
            return Err(CustodyError::MintExists(asset));
        }
        self.mints.insert(asset, MintInfo { authority, decimals, supply: 0 });
        Ok(())
    }

    fn open_account(&mut self, owner: Pubkey, asset: Pubkey) {
        self.balances.entry((owner, asset)).or_insert(0);
    }

    fn settle(&mut self, movements: &[Movement]) -> Result<(), CustodyError> {
        let mut balances: BTreeMap<(Pubkey, Pubkey), u64> = BTreeMap::new();
        let mut supplies: BTreeMap<Pubkey, u64> = BTreeMap::new();

        for movement in movements {
            match *movement {
                Movement::Transfer { asset, from, to, amount } => {
                    let src = staged(&self.balances, &mut balances, (from, asset));
                    *src = src.checked_sub(amount).ok_or(CustodyError::InsufficientFunds)?;
                    let dst = staged(&self.balances, &mut balances, (to, asset));
                    *dst = dst.checked_add(amount).ok_or(CustodyError::Overflow)?;
                }
                Movement::MintTo { asset, authority, to, amount } => {
                    let info = self.mints.get(&asset).ok_or(CustodyError::UnknownMint(asset))?;
                    if info.authority != authority {
                        return Err(CustodyError::NotMintAuthority(asset));
                    }
                    let supply = supplies.entry(asset).or_insert(info.supply);
                    *supply = supply.checked_add(amount).ok_or(CustodyError::Overflow)?;
                    let dst = staged(&self.balances, &mut balances, (to, asset));
                    *dst = dst.checked_add(amount).ok_or(CustodyError::Overflow)?;
                }
                Movement::Burn { asset, from, amount } => {
                    let info = self.mints.get(&asset).ok_or(CustodyError::UnknownMint(asset))?;
                    let src = staged(&self.balances, &mut balances, (from, asset));
                    *src = src.checked_sub(amount).ok_or(CustodyError::InsufficientFunds)?;
                    let supply = supplies.entry(asset).or_insert(info.supply);
                    *supply = supply.checked_sub(amount).ok_or(CustodyError::Overflow)?;
                }
            }
        }

        // Nothing above touched committed state; publish the batch
        self.balances.extend(balances);
        for (asset, supply) in supplies {
            if let Some(info) = self.mints.get_mut(&asset) {
                info.supply = supply;
            }
        }
        Ok(())
    }
}
