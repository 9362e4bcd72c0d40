//! Constant product AMM settlement engine
//!
//! Pools hold two reserve assets and issue a claim token (LP token) for
//! proportional ownership of the reserves. Swaps follow x·y=k with the fee
//! taken on input and left in the reserve.
//!
//! Every operation validates first and then submits its balance changes to
//! custody as a single batch, so a rejected operation leaves no trace.

#![forbid(unsafe_code)]

pub mod custody;
pub mod derive;
pub mod engine;
pub mod error;
pub mod instructions;
pub mod state;

pub use custody::{Custody, CustodyError, MemoryCustody, MintInfo, Movement};
pub use derive::{IdentityDeriver, ProgramDerivation, DEFAULT_PROGRAM_ID, LP_SEED, POOL_SEED};
pub use engine::{AmmEngine, MemoryAmmEngine};
pub use error::AmmError;
pub use instructions::{InitializeParams, Reserves, LP_DECIMALS};
pub use state::{Pool, PoolSnapshot, PoolStore, SwapDirection};

pub use amm_model::{DepositQuote, SwapQuote, WithdrawQuote, PRECISION, SCALE};
