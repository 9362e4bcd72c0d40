//! Deterministic identity derivation
//!
//! Pools: ["config", seed_le] → pool identity
//! Claim-token mints: ["lp", pool] → LP mint identity

use solana_program::pubkey::Pubkey;

/// Namespace for pool identities
pub const POOL_SEED: &[u8] = b"config";

/// Namespace for claim-token mints
pub const LP_SEED: &[u8] = b"lp";

/// Program identity used when none is configured
pub const DEFAULT_PROGRAM_ID: Pubkey = Pubkey::new_from_array(*b"cpamm-settlement-engine-program!");

/// Pure `(namespace, seed) -> identity` mapping
pub trait IdentityDeriver {
    fn derive(&self, namespace: &[u8], seed: &[u8]) -> Pubkey;

    fn pool_address(&self, seed: u64) -> Pubkey {
        self.derive(POOL_SEED, &seed.to_le_bytes())
    }

    fn lp_mint_address(&self, pool: &Pubkey) -> Pubkey {
        self.derive(LP_SEED, pool.as_ref())
    }
}

/// Program-derived addresses under a fixed program id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgramDerivation {
    program_id: Pubkey,
}

impl ProgramDerivation {
    pub fn new(program_id: Pubkey) -> Self {
        Self { program_id }
    }
}

impl Default for ProgramDerivation {
    fn default() -> Self {
        Self::new(DEFAULT_PROGRAM_ID)
    }
}

impl IdentityDeriver for ProgramDerivation {
    fn derive(&self, namespace: &[u8], seed: &[u8]) -> Pubkey {
        Pubkey::find_program_address(&[namespace, seed], &self.program_id).0
    }
}
