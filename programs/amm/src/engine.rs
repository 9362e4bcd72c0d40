//! Settlement engine
//!
//! Ties the pool store, custody and identity derivation together behind one
//! `&mut self` entry point per operation. Exclusive access to the engine is
//! the per-pool serializer: nothing can interleave between an operation's
//! validation and its custody batch.

use std::collections::BTreeMap;

use amm_model::{DepositQuote, SwapQuote, WithdrawQuote};
use log::warn;
use solana_program::pubkey::Pubkey;

use crate::custody::{Custody, MemoryCustody};
use crate::derive::{IdentityDeriver, ProgramDerivation};
use crate::error::AmmError;
use crate::instructions::{
    process_deposit, process_initialize, process_set_locked, process_swap, process_withdraw,
    quote_deposit_for, quote_swap_for, quote_withdraw_for, InitializeParams, Reserves,
};
use crate::state::{Pool, PoolSnapshot, PoolStore, SwapDirection};

/// Constant product settlement engine - generic over its collaborators
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AmmEngine<S = BTreeMap<Pubkey, Pool>, C = MemoryCustody, D = ProgramDerivation>
where
    S: PoolStore,
    C: Custody,
    D: IdentityDeriver,
{
    /// Pool records keyed by pool identity
    store: S,

    /// Vaults, holder balances and claim-token mints
    custody: C,

    /// Pool and LP mint identities
    deriver: D,
}

/// Engine over the in-memory store and custody
pub type MemoryAmmEngine = AmmEngine<BTreeMap<Pubkey, Pool>, MemoryCustody, ProgramDerivation>;

// ============================================================================
// Construction and accessors
// ============================================================================

impl<S, C, D> AmmEngine<S, C, D>
where
    S: PoolStore,
    C: Custody,
    D: IdentityDeriver,
{
    pub fn new(store: S, custody: C, deriver: D) -> Self {
        Self { store, custody, deriver }
    }

    pub fn pool(&self, address: &Pubkey) -> Option<&Pool> {
        self.store.get(address)
    }

    pub fn pools(&self) -> impl Iterator<Item = &Pool> {
        self.store.iter()
    }

    /// Identity a pool created from `seed` would get
    pub fn pool_address(&self, seed: u64) -> Pubkey {
        self.deriver.pool_address(seed)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn custody(&self) -> &C {
        &self.custody
    }

    /// Direct custody access for funding holders from outside the engine
    pub fn custody_mut(&mut self) -> &mut C {
        &mut self.custody
    }

    /// Copy of the pool record, so custody can be borrowed mutably afterwards
    fn load_pool(&self, address: &Pubkey) -> Result<Pool, AmmError> {
        match self.store.get(address) {
            Some(pool) => Ok(*pool),
            None => {
                warn!("Error: Pool {} not found", address);
                Err(AmmError::PoolNotFound)
            }
        }
    }
}

// ============================================================================
// Pool lifecycle
// ============================================================================

impl<S, C, D> AmmEngine<S, C, D>
where
    S: PoolStore,
    C: Custody,
    D: IdentityDeriver,
{
    /// Create a pool, its two empty vaults and its claim-token mint
    pub fn initialize(&mut self, initializer: &Pubkey, params: InitializeParams) -> Result<Pool, AmmError> {
        process_initialize(&mut self.store, &mut self.custody, &self.deriver, initializer, params)
    }

    /// Lock or unlock a pool. Only the pool authority may call this.
    pub fn set_locked(&mut self, address: &Pubkey, caller: &Pubkey, locked: bool) -> Result<(), AmmError> {
        let mut pool = self.load_pool(address)?;
        process_set_locked(&mut pool, caller, locked)?;

        // Record exists, checked by load_pool
        if let Some(stored) = self.store.get_mut(address) {
            *stored = pool;
        }
        Ok(())
    }

    /// Current persisted layout of a pool with live balances
    pub fn snapshot(&self, address: &Pubkey) -> Result<PoolSnapshot, AmmError> {
        let pool = self.load_pool(address)?;
        let reserves = Reserves::load(&pool, &self.custody)?;

        Ok(PoolSnapshot {
            address: pool.address,
            seed: pool.seed,
            mint_x: pool.mint_x,
            mint_y: pool.mint_y,
            fee_bps: pool.fee_bps,
            authority: pool.authority,
            locked: pool.locked,
            lp_mint: pool.lp_mint,
            lp_supply: reserves.lp_supply,
            vault_x: reserves.vault_x,
            vault_y: reserves.vault_y,
        })
    }
}

// ============================================================================
// Liquidity
// ============================================================================

impl<S, C, D> AmmEngine<S, C, D>
where
    S: PoolStore,
    C: Custody,
    D: IdentityDeriver,
{
    /// Mint `amount` claim tokens to `caller` against proportional X and Y
    pub fn deposit(
        &mut self,
        address: &Pubkey,
        caller: &Pubkey,
        amount: u64,
        max_x: u64,
        max_y: u64,
    ) -> Result<DepositQuote, AmmError> {
        let pool = self.load_pool(address)?;
        process_deposit(&pool, &mut self.custody, caller, amount, max_x, max_y)
    }

    /// Burn `burn_amount` of `caller`'s claim tokens for their share of the vaults
    pub fn withdraw(
        &mut self,
        address: &Pubkey,
        caller: &Pubkey,
        burn_amount: u64,
        min_x: u64,
        min_y: u64,
    ) -> Result<WithdrawQuote, AmmError> {
        let pool = self.load_pool(address)?;
        process_withdraw(&pool, &mut self.custody, caller, burn_amount, min_x, min_y)
    }

    /// What `deposit` would take right now
    pub fn preview_deposit(&self, address: &Pubkey, amount: u64) -> Result<DepositQuote, AmmError> {
        let pool = self.load_pool(address)?;
        let reserves = Reserves::load(&pool, &self.custody)?;
        quote_deposit_for(&pool, &reserves, amount)
    }

    /// What `withdraw` would pay right now (ignores the caller's balance)
    pub fn preview_withdraw(&self, address: &Pubkey, burn_amount: u64) -> Result<WithdrawQuote, AmmError> {
        let pool = self.load_pool(address)?;
        let reserves = Reserves::load(&pool, &self.custody)?;
        quote_withdraw_for(&pool, &reserves, burn_amount)
    }
}

// ============================================================================
// Swaps
// ============================================================================

impl<S, C, D> AmmEngine<S, C, D>
where
    S: PoolStore,
    C: Custody,
    D: IdentityDeriver,
{
    /// Sell `amount_in` of one reserve asset for the other
    pub fn swap(
        &mut self,
        address: &Pubkey,
        caller: &Pubkey,
        direction: SwapDirection,
        amount_in: u64,
        min_out: u64,
    ) -> Result<SwapQuote, AmmError> {
        let pool = self.load_pool(address)?;
        process_swap(&pool, &mut self.custody, caller, direction, amount_in, min_out)
    }

    pub fn preview_swap(
        &self,
        address: &Pubkey,
        direction: SwapDirection,
        amount_in: u64,
    ) -> Result<SwapQuote, AmmError> {
        let pool = self.load_pool(address)?;
        quote_swap_for(&pool, &self.custody, direction, amount_in)
    }
}

impl Default for MemoryAmmEngine {
    fn default() -> Self {
        Self::new(BTreeMap::new(), MemoryCustody::new(), ProgramDerivation::default())
    }
}
