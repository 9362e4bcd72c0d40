//! AMM Model - pure constant product settlement math (x·y=k)
//!
//! Integer-only formulas for the settlement engine in `programs/amm`:
//! fixed-point ratio scaling, proportional deposit/withdraw amounts and
//! fee-on-input swaps. Nothing here touches storage; the engine feeds live
//! vault balances in and commits the returned amounts.
//!
//! Every division floors. There is no floating point anywhere, so two nodes
//! fed the same balances always settle to the same units.

#![no_std]

#[cfg(kani)]
extern crate kani;

pub mod fixed;
pub mod math;

pub use fixed::{checked_add, checked_sub, mul_wide, scaled_ratio};
pub use math::{
    invariant, quote_deposit, quote_swap, quote_withdraw, spot_price, DepositQuote, SwapQuote,
    WithdrawQuote,
};

/// Scaling factor for prices and VWAP (1e6)
pub const SCALE: u64 = 1_000_000;

/// Ratio precision used when reporting the share of supply left after a burn
pub const PRECISION: u64 = 1_000_000;

/// Basis points scale (10,000 bps = 100%)
pub const BPS_SCALE: u64 = 10_000;

/// Largest accepted fee
pub const MAX_FEE_BPS: u16 = 10_000;

/// Error types for curve math
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurveError {
    /// Zero amount, or a burn larger than the outstanding supply
    InvalidAmount,
    /// Fee outside [0, 10000] bps
    InvalidFee,
    /// Empty reserves or empty claim-token supply
    InsufficientLiquidity,
    /// Result does not fit the target width
    Overflow,
    /// Zero denominator
    DivisionByZero,
}
