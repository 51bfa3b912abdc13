//! Estate beneficiary shares.
//!
//! The storage layer calls [`validate_beneficiary_shares`] around its own
//! writes; the engine defines only the shape and the validation rule.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{TaxError, TaxResult};

/// One beneficiary's percentage share of an estate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeneficiaryShare {
    /// The beneficiary the share belongs to.
    pub beneficiary: String,
    /// Share of the estate as a percentage (0-100).
    pub percentage: Decimal,
}

/// Validates a set of beneficiary shares.
///
/// Each share must lie within 0-100 and the total must equal exactly
/// 100%; anything else is rejected, never adjusted.
pub fn validate_beneficiary_shares(shares: &[BeneficiaryShare]) -> TaxResult<()> {
    let hundred = Decimal::from(100);
    for share in shares {
        if share.percentage < Decimal::ZERO || share.percentage > hundred {
            return Err(TaxError::Validation {
                field: "percentage".to_string(),
                message: format!(
                    "share for '{}' must be between 0 and 100, got {}",
                    share.beneficiary, share.percentage
                ),
            });
        }
    }
    let total: Decimal = shares.iter().map(|share| share.percentage).sum();
    if total != hundred {
        return Err(TaxError::InvariantViolation {
            message: format!("beneficiary shares total {total}%, expected exactly 100%"),
        });
    }
    Ok(())
}
