// DAMM v2 protocol constants
// These mirror the on-chain program's numeric domain and must not drift.

/// Fee rates are expressed as a numerator over this denominator.
pub const FEE_DENOMINATOR: u64 = 1_000_000_000;

/// Basis point denominator (10000 = 100%)
pub const BASIS_POINT_MAX: u64 = 10_000;

/// Hard cap on any trade fee numerator (50%)
pub const MAX_FEE_NUMERATOR: u64 = 500_000_000;

/// Liquidity carries a 2^128 fixed-point scale
pub const LIQUIDITY_SCALE: u32 = 128;

/// Sqrt prices carry a 2^64 fixed-point scale (Q64.64)
pub const SCALE_OFFSET: u32 = 64;

/// 1.0 in Q64.64
pub const ONE_Q64: u128 = 1u128 << SCALE_OFFSET;

/// Minimum sqrt price accepted by the program (Q64.64)
pub const MIN_SQRT_PRICE: u128 = 4_295_048_016;

/// Maximum sqrt price accepted by the program (Q64.64)
pub const MAX_SQRT_PRICE: u128 = 79_226_673_521_066_979_257_578_248_091;

/// Exponents above this saturate the Q64.64 `pow` to zero.
/// Matches the fee scheduler's realistic period counts.
pub const MAX_EXPONENTIAL: u64 = 0x80000;

/// Default and maximum tolerable price change for dynamic-fee sizing (15%)
pub const MAX_PRICE_CHANGE_BPS_DEFAULT: u64 = 1_500;

/// Dynamic-fee defaults used when deriving a pool's volatility-fee config
pub mod dynamic_fee_defaults {
    /// Bin step in basis points
    pub const BIN_STEP_BPS: u16 = 1;

    /// Bin step as a Q64.64 ratio (1 bp over `BASIS_POINT_MAX`)
    pub const BIN_STEP_BPS_U128: u128 = 1_844_674_407_370_955;

    /// Volatility filter period (seconds/slots, per pool activation type)
    pub const FILTER_PERIOD: u16 = 10;

    /// Volatility decay period
    pub const DECAY_PERIOD: u16 = 120;

    /// Volatility reduction factor (50%)
    pub const REDUCTION_FACTOR: u16 = 5_000;

    /// The dynamic component tops out at this share of the base fee (percent)
    pub const MAX_DYNAMIC_FEE_PERCENT: u64 = 20;
}

/// Denominator of the dynamic-fee formula, vfc * (va * binStep)^2 / 1e11
pub const DYNAMIC_FEE_SCALING: u64 = 100_000_000_000;
