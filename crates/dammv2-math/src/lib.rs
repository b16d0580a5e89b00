//! Math core for DAMM v2 concentrated-liquidity pools.
//!
//! Pure fixed-point arithmetic over a pool snapshot: Q64.64 sqrt prices,
//! 2^128-scaled liquidity, wide-integer intermediates, explicit rounding at
//! every division. Quoting (swap, deposit, withdraw, pool creation), the
//! fee engine (scheduled base fee, volatility fee, splits) and vesting
//! schedules all live here; fetching pool state and building transactions
//! do not.
//!
//! Every function is synchronous, allocation-free and side-effect free.
//! Failures are typed [`MathError`]s, never clamps or silent wraps.

pub mod constants;
pub mod errors;
pub mod fees;
pub mod math;
pub mod quote;
pub mod transfer_fee;
pub mod vesting;

pub use errors::MathError;
pub use fees::{
    BaseFee, CollectFeeMode, DynamicFeeConfig, DynamicFeeParams, FeeBreakdown, FeeMode,
    FeeSchedulerMode, TradeDirection,
};
pub use math::full_math::Rounding;
pub use quote::{
    DepositQuote, ExactOutQuote, ExactOutQuoteParams, PoolCreationAmounts, SwapAmount, SwapQuote,
    SwapQuoteParams, SwapResult, WithdrawQuote,
};
pub use transfer_fee::{NoTransferFee, TransferFeeAdapter, TransferFeeBreakdown};
pub use vesting::Vesting;
