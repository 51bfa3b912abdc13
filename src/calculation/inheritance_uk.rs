//! UK inheritance tax.
//!
//! The chargeable estate is the net estate less the nil-rate bands, never
//! negative. The standard rate drops to the reduced rate when charitable
//! gifts reach the policy threshold of the baseline (the net estate less
//! the base and transferred nil-rate bands).

use rust_decimal::Decimal;

use crate::config::InheritancePolicy;
use crate::error::{TaxError, TaxResult};
use crate::models::{BandLine, LiabilityResult, ReliefKind, ReliefLine, TaxCharge};

/// Inputs to a UK inheritance tax calculation.
#[derive(Debug, Clone)]
pub struct UkEstateInput {
    /// The net estate after debts and expenses.
    pub net_estate: Decimal,
    /// Gifts to charity made out of the estate.
    pub charitable_gifts: Decimal,
    /// Nil-rate band transferred from a deceased spouse, zero if none.
    pub transferable_nil_rate_band: Decimal,
}

/// Calculates UK inheritance tax on an estate.
///
/// # Arguments
///
/// * `input` - Estate value, charitable gifts and any transferred band
/// * `policy` - The inheritance tax parameters for the tax year
///
/// # Returns
///
/// A [`LiabilityResult`] itemizing the bands applied, or a validation
/// error for negative figures or a transferred band above the base band.
pub fn calculate_uk_inheritance_tax(
    input: &UkEstateInput,
    policy: &InheritancePolicy,
) -> TaxResult<LiabilityResult> {
    for (field, amount) in [
        ("net_estate", input.net_estate),
        ("charitable_gifts", input.charitable_gifts),
        (
            "transferable_nil_rate_band",
            input.transferable_nil_rate_band,
        ),
    ] {
        if amount < Decimal::ZERO {
            return Err(TaxError::Validation {
                field: field.to_string(),
                message: format!("must not be negative, got {amount}"),
            });
        }
    }
    // A transferred band cannot exceed 100% of the base band.
    if input.transferable_nil_rate_band > policy.nil_rate_band {
        return Err(TaxError::Validation {
            field: "transferable_nil_rate_band".to_string(),
            message: format!(
                "{} exceeds the {} nil-rate band",
                input.transferable_nil_rate_band, policy.nil_rate_band
            ),
        });
    }

    if input.net_estate.is_zero() {
        return Ok(LiabilityResult::zero(TaxCharge::UkInheritanceTax));
    }

    // Bands are consumed in order; each line records what it absorbed.
    let mut remaining = input.net_estate;
    let mut reliefs = vec![];
    for (kind, statute_ref, band) in [
        (
            ReliefKind::NilRateBand,
            "IHTA 1984 s.7",
            policy.nil_rate_band,
        ),
        (
            ReliefKind::TransferableNilRateBand,
            "IHTA 1984 s.8A",
            input.transferable_nil_rate_band,
        ),
        (
            ReliefKind::ResidenceNilRateBand,
            "IHTA 1984 s.8D",
            policy.residence_nil_rate_band,
        ),
    ] {
        let applied = band.min(remaining);
        remaining -= applied;
        reliefs.push(ReliefLine {
            kind,
            statute_ref: statute_ref.to_string(),
            applied,
        });
    }
    let taxable = remaining;

    // The reduced rate applies when charitable gifts reach the policy
    // threshold of the baseline: the estate less the base and
    // transferred bands, before the residence band.
    let baseline = (input.net_estate - policy.nil_rate_band - input.transferable_nil_rate_band)
        .max(Decimal::ZERO);
    let charitable = baseline > Decimal::ZERO
        && input.charitable_gifts >= baseline * policy.charitable_threshold;
    let rate = if charitable {
        policy.reduced_rate
    } else {
        policy.standard_rate
    };

    let tax_due = taxable * rate;
    let bands = if taxable > Decimal::ZERO {
        vec![BandLine {
            label: if charitable {
                "chargeable estate at reduced rate".to_string()
            } else {
                "chargeable estate".to_string()
            },
            amount: taxable,
            rate,
            tax: tax_due,
        }]
    } else {
        vec![]
    };

    Ok(LiabilityResult {
        charge: TaxCharge::UkInheritanceTax,
        gross: input.net_estate,
        tax_free: Decimal::ZERO,
        reliefs,
        taxable,
        bands,
        tax_due,
    })
}
