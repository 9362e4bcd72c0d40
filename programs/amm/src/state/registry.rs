//! Pool registry
//!
//! Keyed store from pool identity to [`Pool`] record. The engine is generic
//! over it, so the same settlement code runs against an in-memory map, a
//! database table or account storage.

use std::collections::BTreeMap;

use solana_program::pubkey::Pubkey;

use super::Pool;

/// Trait for pluggable pool storage
pub trait PoolStore {
    fn get(&self, address: &Pubkey) -> Option<&Pool>;

    fn get_mut(&mut self, address: &Pubkey) -> Option<&mut Pool>;

    /// Insert keyed by `pool.address`, returning any record it replaced
    fn insert(&mut self, pool: Pool) -> Option<Pool>;

    fn len(&self) -> usize;

    /// Iterate over all pools
    fn iter(&self) -> impl Iterator<Item = &Pool>;

    fn contains(&self, address: &Pubkey) -> bool {
        self.get(address).is_some()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// BTreeMap-based storage (default)
impl PoolStore for BTreeMap<Pubkey, Pool> {
    fn get(&self, address: &Pubkey) -> Option<&Pool> {
        BTreeMap::get(self, address)
    }

    fn get_mut(&mut self, address: &Pubkey) -> Option<&mut Pool> {
        BTreeMap::get_mut(self, address)
    }

    fn insert(&mut self, pool: Pool) -> Option<Pool> {
        BTreeMap::insert(self, pool.address, pool)
    }

    fn len(&self) -> usize {
        BTreeMap::len(self)
    }

    fn iter(&self) -> impl Iterator<Item = &Pool> {
        self.values()
    }
}
