//! UK savings interest tax.
//!
//! The order of allowance application matters: wrapper interest is
//! excluded first, then the starting rate band (itself a function of
//! non-savings income relative to the personal allowance), then the
//! band-dependent personal savings allowance, and only then is the
//! remainder taxed at the caller's marginal band rate.

use rust_decimal::Decimal;

use crate::config::SavingsPolicy;
use crate::error::{TaxError, TaxResult};
use crate::models::{BandLine, LiabilityResult, ReliefKind, ReliefLine, TaxBand, TaxCharge};

/// Inputs to a UK savings interest calculation.
#[derive(Debug, Clone)]
pub struct UkInterestInput {
    /// Total interest received, wrapper-held included.
    pub total_interest: Decimal,
    /// Interest received inside a wrapper (e.g. a cash ISA).
    pub wrapper_interest: Decimal,
    /// Non-savings income for the year, used to taper the starting
    /// rate band.
    pub non_savings_income: Decimal,
    /// The caller's marginal tax band.
    pub band: TaxBand,
}

/// Calculates UK tax on savings interest.
///
/// The starting rate band of `starting_rate_band` reduces pound for
/// pound as non-savings income rises past the personal allowance,
/// reaching zero once income is `starting_rate_band` past it.
pub fn calculate_uk_savings_tax(
    input: &UkInterestInput,
    policy: &SavingsPolicy,
) -> TaxResult<LiabilityResult> {
    for (field, amount) in [
        ("total_interest", input.total_interest),
        ("wrapper_interest", input.wrapper_interest),
        ("non_savings_income", input.non_savings_income),
    ] {
        if amount < Decimal::ZERO {
            return Err(TaxError::Validation {
                field: field.to_string(),
                message: format!("must not be negative, got {amount}"),
            });
        }
    }
    if input.wrapper_interest > input.total_interest {
        return Err(TaxError::Validation {
            field: "wrapper_interest".to_string(),
            message: format!(
                "wrapper portion {} exceeds the total {}",
                input.wrapper_interest, input.total_interest
            ),
        });
    }

    if input.total_interest.is_zero() {
        return Ok(LiabilityResult::zero(TaxCharge::UkSavingsInterest));
    }

    let base = input.total_interest - input.wrapper_interest;

    // 1. Starting rate band, tapered by income above the personal
    //    allowance.
    let income_over_allowance =
        (input.non_savings_income - policy.personal_allowance).max(Decimal::ZERO);
    let starting_rate_available =
        (policy.starting_rate_band - income_over_allowance).max(Decimal::ZERO);
    let starting_applied = starting_rate_available.min(base);

    // 2. Personal savings allowance for the band.
    let psa = policy.personal_savings_allowance.for_band(input.band);
    let psa_applied = psa.min(base - starting_applied);

    // 3. Marginal rate on the remainder.
    let taxable = base - starting_applied - psa_applied;
    let rate = policy.rates.for_band(input.band);
    let tax_due = taxable * rate;

    let bands = if taxable > Decimal::ZERO {
        vec![BandLine {
            label: format!("interest at {:?} rate", input.band).to_lowercase(),
            amount: taxable,
            rate,
            tax: tax_due,
        }]
    } else {
        vec![]
    };

    Ok(LiabilityResult {
        charge: TaxCharge::UkSavingsInterest,
        gross: input.total_interest,
        tax_free: input.wrapper_interest,
        reliefs: vec![
            ReliefLine {
                kind: ReliefKind::StartingRateBand,
                statute_ref: "ITA 2007 s.12".to_string(),
                applied: starting_applied,
            },
            ReliefLine {
                kind: ReliefKind::PersonalSavingsAllowance,
                statute_ref: "ITA 2007 s.12B".to_string(),
                applied: psa_applied,
            },
        ],
        taxable,
        bands,
        tax_due,
    })
}
