use thiserror::Error;

/// Math-core error codes
/// Specific errors for each failure mode; callers surface these as typed
/// failures instead of clamped or garbage values.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum MathError {
    /// Arithmetic overflow in checked operation
    #[error("math overflow")]
    MathOverflow,

    /// Arithmetic underflow in checked operation
    #[error("math underflow")]
    MathUnderflow,

    /// Division by zero attempted
    #[error("division by zero")]
    DivisionByZero,

    /// Result doesn't fit the integer width handed to the caller
    #[error("type cast failed")]
    TypeCastFailed,

    /// Next sqrt price would fall below zero
    #[error("sqrt price cannot be negative")]
    NegativeSqrtPrice,

    /// Sqrt price must be strictly positive
    #[error("sqrt price must be greater than zero")]
    ZeroSqrtPrice,

    /// Requested output exceeds what the pool's liquidity can produce
    #[error("insufficient liquidity")]
    InsufficientLiquidity,

    /// A ratio was requested over a zero amount
    #[error("amount cannot be zero")]
    ZeroAmount,

    /// Price range is empty or inverted
    #[error("invalid price range")]
    InvalidPriceRange,

    /// Fee-schedule or dynamic-fee configuration rejected
    #[error("invalid fee parameters: {0}")]
    InvalidFeeParams(&'static str),

    /// Decimal arithmetic overflowed its 96-bit mantissa
    #[error("decimal overflow")]
    DecimalOverflow,

    /// Square root calculation failed
    #[error("sqrt calculation error")]
    SqrtError,
}
