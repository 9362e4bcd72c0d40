//! Settlement errors

use amm_model::CurveError;
use thiserror::Error;

use crate::custody::CustodyError;

/// Every way an AMM operation can be rejected.
///
/// All variants are terminal: the operation that produced one left no trace
/// in the pool store or in custody.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AmmError {
    #[error("Invalid fee: must be between 0 and 10000 basis points")]
    InvalidFee,

    #[error("A pool with this seed already exists")]
    DuplicatePool,

    #[error("Pool not found")]
    PoolNotFound,

    #[error("Mint X and mint Y must be different assets")]
    IdenticalMints,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("No liquidity in pool. You need to deposit some liquidity first.")]
    NoLiquidity,

    #[error("Insufficient balance")]
    InsufficientBalance,

    #[error("Slippage exceeded")]
    SlippageExceeded,

    #[error("Arithmetic error: overflow or division by zero")]
    ArithmeticError,

    #[error("Pool is locked")]
    PoolLocked,

    #[error("Invalid amount provided")]
    InvalidAmount,
}

impl From<CurveError> for AmmError {
    fn from(err: CurveError) -> Self {
        match err {
            CurveError::InvalidAmount => AmmError::InvalidAmount,
            CurveError::InvalidFee => AmmError::InvalidFee,
            CurveError::InsufficientLiquidity => AmmError::NoLiquidity,
            CurveError::Overflow | CurveError::DivisionByZero => AmmError::ArithmeticError,
        }
    }
}

impl From<CustodyError> for AmmError {
    fn from(err: CustodyError) -> Self {
        match err {
            CustodyError::InsufficientFunds => AmmError::InsufficientBalance,
            CustodyError::Overflow => AmmError::ArithmeticError,
            CustodyError::NotMintAuthority(_) => AmmError::Unauthorized,
            // Claim-token mints are allocated only at initialize
            CustodyError::UnknownMint(_) => AmmError::PoolNotFound,
            CustodyError::MintExists(_) => AmmError::DuplicatePool,
        }
    }
}
