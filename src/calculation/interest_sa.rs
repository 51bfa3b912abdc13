//! SA savings interest tax.
//!
//! Wrapper interest is excluded, the age-tiered interest exemption is
//! applied (the higher tier starts at the policy age boundary), and the
//! remainder is taxed at the caller's marginal rate.

use rust_decimal::Decimal;

use crate::config::InterestExemptionPolicy;
use crate::error::{TaxError, TaxResult};
use crate::models::{BandLine, LiabilityResult, ReliefKind, ReliefLine, TaxCharge};

use super::cgt_sa::validate_rate;

/// Inputs to an SA savings interest calculation.
#[derive(Debug, Clone)]
pub struct SaInterestInput {
    /// Total interest received, wrapper-held included.
    pub total_interest: Decimal,
    /// Interest received inside a wrapper (e.g. a TFSA).
    pub wrapper_interest: Decimal,
    /// Age at the end of the tax year.
    pub age: u32,
    /// The caller's marginal income tax rate, as a fraction.
    pub marginal_rate: Decimal,
}

/// Calculates SA tax on savings interest.
pub fn calculate_sa_interest_tax(
    input: &SaInterestInput,
    policy: &InterestExemptionPolicy,
) -> TaxResult<LiabilityResult> {
    validate_rate("marginal_rate", input.marginal_rate)?;
    if input.total_interest < Decimal::ZERO {
        return Err(TaxError::Validation {
            field: "total_interest".to_string(),
            message: format!("must not be negative, got {}", input.total_interest),
        });
    }
    if input.wrapper_interest < Decimal::ZERO || input.wrapper_interest > input.total_interest {
        return Err(TaxError::Validation {
            field: "wrapper_interest".to_string(),
            message: format!(
                "wrapper portion {} must lie between 0 and the total {}",
                input.wrapper_interest, input.total_interest
            ),
        });
    }

    if input.total_interest.is_zero() {
        return Ok(LiabilityResult::zero(TaxCharge::SaSavingsInterest));
    }

    let base = input.total_interest - input.wrapper_interest;
    let exemption = if input.age >= policy.age_boundary {
        policy.over_age_limit
    } else {
        policy.under_age_limit
    };
    let exemption_applied = exemption.min(base);
    let taxable = base - exemption_applied;
    let tax_due = taxable * input.marginal_rate;

    let bands = if taxable > Decimal::ZERO {
        vec![BandLine {
            label: "interest at marginal rate".to_string(),
            amount: taxable,
            rate: input.marginal_rate,
            tax: tax_due,
        }]
    } else {
        vec![]
    };

    Ok(LiabilityResult {
        charge: TaxCharge::SaSavingsInterest,
        gross: input.total_interest,
        tax_free: input.wrapper_interest,
        reliefs: vec![ReliefLine {
            kind: ReliefKind::InterestExemption,
            statute_ref: "ITA 58 of 1962 s.10(1)(i)".to_string(),
            applied: exemption_applied,
        }],
        taxable,
        bands,
        tax_due,
    })
}
