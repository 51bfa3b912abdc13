//! SA estate duty.
//!
//! Duty is charged on the dutiable amount (estate value less the
//! abatement, never negative) on a two-tier scale: the lower rate up to
//! the ceiling, the higher rate on the excess.

use rust_decimal::Decimal;

use crate::config::EstateDutyPolicy;
use crate::error::{TaxError, TaxResult};
use crate::models::{BandLine, LiabilityResult, ReliefKind, ReliefLine, TaxCharge};

/// Inputs to an SA estate duty calculation.
#[derive(Debug, Clone)]
pub struct SaEstateInput {
    /// The value of the estate before the abatement.
    pub estate_value: Decimal,
}

/// Calculates SA estate duty on an estate.
pub fn calculate_sa_estate_duty(
    input: &SaEstateInput,
    policy: &EstateDutyPolicy,
) -> TaxResult<LiabilityResult> {
    if input.estate_value < Decimal::ZERO {
        return Err(TaxError::Validation {
            field: "estate_value".to_string(),
            message: format!("must not be negative, got {}", input.estate_value),
        });
    }
    if input.estate_value.is_zero() {
        return Ok(LiabilityResult::zero(TaxCharge::SaEstateDuty));
    }

    let abatement_applied = policy.abatement.min(input.estate_value);
    let dutiable = input.estate_value - abatement_applied;

    let reliefs = vec![ReliefLine {
        kind: ReliefKind::EstateAbatement,
        statute_ref: "Estate Duty Act 45 of 1955 s.4A".to_string(),
        applied: abatement_applied,
    }];

    let mut bands = vec![];
    let mut tax_due = Decimal::ZERO;
    if dutiable > Decimal::ZERO {
        let lower_slice = dutiable.min(policy.lower_rate_ceiling);
        let lower_tax = lower_slice * policy.lower_rate;
        bands.push(BandLine {
            label: "dutiable amount at lower rate".to_string(),
            amount: lower_slice,
            rate: policy.lower_rate,
            tax: lower_tax,
        });
        tax_due += lower_tax;

        let excess = dutiable - lower_slice;
        if excess > Decimal::ZERO {
            let higher_tax = excess * policy.higher_rate;
            bands.push(BandLine {
                label: "dutiable amount above ceiling".to_string(),
                amount: excess,
                rate: policy.higher_rate,
                tax: higher_tax,
            });
            tax_due += higher_tax;
        }
    }

    Ok(LiabilityResult {
        charge: TaxCharge::SaEstateDuty,
        gross: input.estate_value,
        tax_free: Decimal::ZERO,
        reliefs,
        taxable: dutiable,
        bands,
        tax_due,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_fixtures::policy_2024_25;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn duty(estate: &str) -> LiabilityResult {
        let policy = policy_2024_25();
        calculate_sa_estate_duty(
            &SaEstateInput {
                estate_value: dec(estate),
            },
            &policy.sa.estate_duty,
        )
        .unwrap()
    }

    /// ED-001: a dutiable amount below the ceiling is wholly at 20%.
    #[test]
    fn test_below_ceiling_taxed_at_lower_rate() {
        // 20,000,000 - 3,500,000 abatement = 16,500,000 dutiable.
        let result = duty("20000000");
        assert_eq!(result.taxable, dec("16500000"));
        assert_eq!(result.tax_due, dec("3300000"));
        assert_eq!(result.bands.len(), 1);
        assert_eq!(result.bands[0].rate, dec("0.20"));
    }

    /// ED-002: the excess above the ceiling is taxed at 25%.
    #[test]
    fn test_excess_above_ceiling_taxed_at_higher_rate() {
        // 50,000,000 - 3,500,000 = 46,500,000 dutiable:
        // 30,000,000 at 20% + 16,500,000 at 25% = 10,125,000.
        let result = duty("50000000");
        assert_eq!(result.taxable, dec("46500000"));
        assert_eq!(result.tax_due, dec("10125000"));
        assert_eq!(result.bands.len(), 2);
        assert_eq!(result.bands[0].amount, dec("30000000"));
        assert_eq!(result.bands[0].tax, dec("6000000"));
        assert_eq!(result.bands[1].amount, dec("16500000"));
        assert_eq!(result.bands[1].tax, dec("4125000"));
    }

    /// ED-003: a dutiable amount exactly at the ceiling stays in tier one.
    #[test]
    fn test_exactly_at_ceiling_single_band() {
        let result = duty("33500000");
        assert_eq!(result.taxable, dec("30000000"));
        assert_eq!(result.bands.len(), 1);
        assert_eq!(result.tax_due, dec("6000000"));
    }

    #[test]
    fn test_estate_below_abatement_owes_nothing() {
        let result = duty("2000000");
        assert_eq!(result.taxable, Decimal::ZERO);
        assert_eq!(result.tax_due, Decimal::ZERO);
        assert!(result.bands.is_empty());
        // The abatement only absorbs what exists.
        assert_eq!(result.reliefs[0].applied, dec("2000000"));
    }

    #[test]
    fn test_zero_estate_returns_zero_result() {
        let result = duty("0");
        assert_eq!(result, LiabilityResult::zero(TaxCharge::SaEstateDuty));
    }

    #[test]
    fn test_negative_estate_rejected() {
        let policy = policy_2024_25();
        let result = calculate_sa_estate_duty(
            &SaEstateInput {
                estate_value: dec("-100"),
            },
            &policy.sa.estate_duty,
        );
        assert!(matches!(result, Err(TaxError::Validation { .. })));
    }
}
