//! SA dividends withholding tax.
//!
//! A flat rate on gross non-wrapper dividends; no allowance applies.
//! Dividends received inside a tax-free savings account stay out of the
//! base and are reported as tax-free.

use rust_decimal::Decimal;

use crate::error::{TaxError, TaxResult};
use crate::models::{BandLine, LiabilityResult, TaxCharge};

use super::cgt_sa::validate_rate;

/// Inputs to an SA dividends withholding calculation.
#[derive(Debug, Clone)]
pub struct SaDividendInput {
    /// Total dividends received, wrapper-held included.
    pub total_dividends: Decimal,
    /// Dividends received inside a wrapper (e.g. a TFSA).
    pub wrapper_dividends: Decimal,
}

/// Calculates SA dividends withholding tax at the given flat rate.
pub fn calculate_sa_dividend_withholding(
    input: &SaDividendInput,
    rate: Decimal,
) -> TaxResult<LiabilityResult> {
    validate_rate("rate", rate)?;
    if input.total_dividends < Decimal::ZERO {
        return Err(TaxError::Validation {
            field: "total_dividends".to_string(),
            message: format!("must not be negative, got {}", input.total_dividends),
        });
    }
    if input.wrapper_dividends < Decimal::ZERO
        || input.wrapper_dividends > input.total_dividends
    {
        return Err(TaxError::Validation {
            field: "wrapper_dividends".to_string(),
            message: format!(
                "wrapper portion {} must lie between 0 and the total {}",
                input.wrapper_dividends, input.total_dividends
            ),
        });
    }

    if input.total_dividends.is_zero() {
        return Ok(LiabilityResult::zero(TaxCharge::SaDividendWithholding));
    }

    let taxable = input.total_dividends - input.wrapper_dividends;
    let tax_due = taxable * rate;
    let bands = if taxable > Decimal::ZERO {
        vec![BandLine {
            label: "dividends withheld at flat rate".to_string(),
            amount: taxable,
            rate,
            tax: tax_due,
        }]
    } else {
        vec![]
    };

    Ok(LiabilityResult {
        charge: TaxCharge::SaDividendWithholding,
        gross: input.total_dividends,
        tax_free: input.wrapper_dividends,
        reliefs: vec![],
        taxable,
        bands,
        tax_due,
    })
}
