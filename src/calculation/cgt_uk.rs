//! UK capital gains tax.
//!
//! Gains realized inside a tax-advantaged wrapper are excluded from the
//! taxable base and reported as tax-free. The remainder is reduced by
//! whatever is left of the annual exempt amount, then taxed at the
//! single configured rate for the year.

use rust_decimal::Decimal;

use crate::config::UkCgtPolicy;
use crate::error::{TaxError, TaxResult};
use crate::models::{
    AllowanceBalance, AllowanceKind, BandLine, LiabilityResult, ReliefKind, ReliefLine, TaxCharge,
};

/// Inputs to a UK capital gains calculation.
#[derive(Debug, Clone)]
pub struct UkGainsInput {
    /// Total realized gains, wrapper-held gains included.
    pub total_gains: Decimal,
    /// The portion of gains realized inside a wrapper (e.g. an ISA).
    pub wrapper_gains: Decimal,
}

/// Calculates UK capital gains tax.
///
/// # Arguments
///
/// * `input` - Total and wrapper-held gains
/// * `exempt` - The annual exempt amount balance from the ledger; only
///   its remaining headroom is consumed
/// * `policy` - The CGT parameters for the tax year
pub fn calculate_uk_cgt(
    input: &UkGainsInput,
    exempt: &AllowanceBalance,
    policy: &UkCgtPolicy,
) -> TaxResult<LiabilityResult> {
    validate_gains(input.total_gains, input.wrapper_gains)?;
    if exempt.kind != AllowanceKind::CgtExemptAmount {
        return Err(TaxError::Validation {
            field: "exempt".to_string(),
            message: format!("expected a cgt_exempt_amount balance, got {}", exempt.kind),
        });
    }

    if input.total_gains.is_zero() {
        return Ok(LiabilityResult::zero(TaxCharge::UkCapitalGains));
    }

    let base = input.total_gains - input.wrapper_gains;
    let exempt_applied = exempt.remaining.min(base);
    let taxable = base - exempt_applied;
    let tax_due = taxable * policy.rate;

    let bands = if taxable > Decimal::ZERO {
        vec![BandLine {
            label: "gains above annual exempt amount".to_string(),
            amount: taxable,
            rate: policy.rate,
            tax: tax_due,
        }]
    } else {
        vec![]
    };

    Ok(LiabilityResult {
        charge: TaxCharge::UkCapitalGains,
        gross: input.total_gains,
        tax_free: input.wrapper_gains,
        reliefs: vec![ReliefLine {
            kind: ReliefKind::AnnualExemptAmount,
            statute_ref: "TCGA 1992 s.1K".to_string(),
            applied: exempt_applied,
        }],
        taxable,
        bands,
        tax_due,
    })
}

pub(super) fn validate_gains(total: Decimal, wrapper: Decimal) -> TaxResult<()> {
    if total < Decimal::ZERO {
        return Err(TaxError::Validation {
            field: "total_gains".to_string(),
            message: format!("must not be negative, got {total}"),
        });
    }
    if wrapper < Decimal::ZERO {
        return Err(TaxError::Validation {
            field: "wrapper_gains".to_string(),
            message: format!("must not be negative, got {wrapper}"),
        });
    }
    if wrapper > total {
        return Err(TaxError::Validation {
            field: "wrapper_gains".to_string(),
            message: format!("wrapper portion {wrapper} exceeds the total {total}"),
        });
    }
    Ok(())
}
