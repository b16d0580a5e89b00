//! Transfer-fee adapter
//!
//! Token-2022 mints can withhold a fee on every transfer, so the amount a
//! pool receives is not the amount a wallet sends. Quotes route every
//! user-facing amount through this seam; the mint-specific fee math lives
//! behind the trait, outside this crate. `None` at a call site means the
//! mint has no transfer-fee extension.

use crate::errors::MathError;
use serde::{Deserialize, Serialize};

/// An amount split into what crosses the transfer and what is withheld.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferFeeBreakdown {
    /// The post-fee (excluded) or pre-fee (included) amount, per direction
    pub amount: u64,
    /// The fee withheld by the mint
    pub transfer_fee: u64,
}

/// Mint-specific transfer-fee math.
pub trait TransferFeeAdapter {
    /// Net amount delivered when `included` is sent: `included − fee`.
    fn transfer_fee_excluded_amount(&self, included: u64)
        -> Result<TransferFeeBreakdown, MathError>;

    /// Gross amount that must be sent for `excluded` to arrive.
    fn transfer_fee_included_amount(&self, excluded: u64)
        -> Result<TransferFeeBreakdown, MathError>;
}

/// Identity adapter for mints without the extension.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTransferFee;

impl TransferFeeAdapter for NoTransferFee {
    fn transfer_fee_excluded_amount(
        &self,
        included: u64,
    ) -> Result<TransferFeeBreakdown, MathError> {
        Ok(TransferFeeBreakdown {
            amount: included,
            transfer_fee: 0,
        })
    }

    fn transfer_fee_included_amount(
        &self,
        excluded: u64,
    ) -> Result<TransferFeeBreakdown, MathError> {
        Ok(TransferFeeBreakdown {
            amount: excluded,
            transfer_fee: 0,
        })
    }
}

/// Net `amount` through an optional adapter, exclusion direction.
pub(crate) fn net_excluded(
    adapter: Option<&dyn TransferFeeAdapter>,
    amount: u64,
) -> Result<u64, MathError> {
    match adapter {
        Some(adapter) => Ok(adapter.transfer_fee_excluded_amount(amount)?.amount),
        None => Ok(amount),
    }
}

/// Gross `amount` through an optional adapter, inclusion direction.
pub(crate) fn gross_included(
    adapter: Option<&dyn TransferFeeAdapter>,
    amount: u64,
) -> Result<u64, MathError> {
    match adapter {
        Some(adapter) => Ok(adapter.transfer_fee_included_amount(amount)?.amount),
        None => Ok(amount),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_transfer_fee_is_identity() {
        let adapter = NoTransferFee;
        let excluded = adapter.transfer_fee_excluded_amount(1_000).unwrap();
        assert_eq!(excluded.amount, 1_000);
        assert_eq!(excluded.transfer_fee, 0);

        let included = adapter.transfer_fee_included_amount(1_000).unwrap();
        assert_eq!(included.amount, 1_000);
        assert_eq!(included.transfer_fee, 0);
    }

    #[test]
    fn test_none_adapter_passes_through() {
        assert_eq!(net_excluded(None, 42).unwrap(), 42);
        assert_eq!(gross_included(None, 42).unwrap(), 42);
    }

    // A flat-rate adapter, the shape a Token-2022 integration would take.
    struct FlatBps(u64);

    impl TransferFeeAdapter for FlatBps {
        fn transfer_fee_excluded_amount(
            &self,
            included: u64,
        ) -> Result<TransferFeeBreakdown, MathError> {
            let fee = included * self.0 / 10_000;
            Ok(TransferFeeBreakdown {
                amount: included - fee,
                transfer_fee: fee,
            })
        }

        fn transfer_fee_included_amount(
            &self,
            excluded: u64,
        ) -> Result<TransferFeeBreakdown, MathError> {
            // smallest gross whose fee leaves at least `excluded`
            let gross = (excluded * 10_000).div_ceil(10_000 - self.0);
            Ok(TransferFeeBreakdown {
                amount: gross,
                transfer_fee: gross - excluded,
            })
        }
    }

    #[test]
    fn test_custom_adapter_round_trip() {
        let adapter = FlatBps(100); // 1%
        let gross = gross_included(Some(&adapter), 9_900).unwrap();
        assert_eq!(gross, 10_000);
        assert_eq!(net_excluded(Some(&adapter), gross).unwrap(), 9_900);
    }
}
