//! SA capital gains tax via the inclusion-rate method.
//!
//! Only the included portion of a gain enters taxable income; the tax is
//! the included gain at the caller's marginal rate, equivalently the
//! whole gain at an effective rate of inclusion times marginal.

use rust_decimal::Decimal;

use crate::config::SaCgtPolicy;
use crate::error::{TaxError, TaxResult};
use crate::models::{BandLine, LiabilityResult, ReliefKind, ReliefLine, TaxCharge};

use super::cgt_uk::validate_gains;

/// Inputs to an SA capital gains calculation.
#[derive(Debug, Clone)]
pub struct SaGainsInput {
    /// Total realized gains, wrapper-held gains included.
    pub total_gains: Decimal,
    /// The portion of gains realized inside a wrapper (e.g. a TFSA).
    pub wrapper_gains: Decimal,
    /// The caller's marginal income tax rate, as a fraction.
    pub marginal_rate: Decimal,
}

/// Calculates SA capital gains tax.
pub fn calculate_sa_cgt(input: &SaGainsInput, policy: &SaCgtPolicy) -> TaxResult<LiabilityResult> {
    validate_gains(input.total_gains, input.wrapper_gains)?;
    validate_rate("marginal_rate", input.marginal_rate)?;

    if input.total_gains.is_zero() {
        return Ok(LiabilityResult::zero(TaxCharge::SaCapitalGains));
    }

    let base = input.total_gains - input.wrapper_gains;
    let included = base * policy.inclusion_rate;
    let excluded = base - included;
    let tax_due = included * input.marginal_rate;

    let bands = if included > Decimal::ZERO {
        vec![BandLine {
            label: "included gain at marginal rate".to_string(),
            amount: included,
            rate: input.marginal_rate,
            tax: tax_due,
        }]
    } else {
        vec![]
    };

    Ok(LiabilityResult {
        charge: TaxCharge::SaCapitalGains,
        gross: input.total_gains,
        tax_free: input.wrapper_gains,
        reliefs: vec![ReliefLine {
            kind: ReliefKind::GainExclusion,
            statute_ref: "ITA 58 of 1962 Eighth Schedule para 10".to_string(),
            applied: excluded,
        }],
        taxable: included,
        bands,
        tax_due,
    })
}

/// Validates a caller-supplied rate fraction lies within 0 to 1.
pub(super) fn validate_rate(field: &str, rate: Decimal) -> TaxResult<()> {
    if rate < Decimal::ZERO || rate > Decimal::ONE {
        return Err(TaxError::Validation {
            field: field.to_string(),
            message: format!("rate must be between 0 and 1, got {rate}"),
        });
    }
    Ok(())
}
