//! UK dividend tax.
//!
//! Wrapper-held dividends are excluded first; the remainder is reduced
//! by whatever is left of the dividend allowance, then taxed at the
//! rate for the caller's marginal band.

use rust_decimal::Decimal;

use crate::config::UkDividendPolicy;
use crate::error::{TaxError, TaxResult};
use crate::models::{
    AllowanceBalance, AllowanceKind, BandLine, LiabilityResult, ReliefKind, ReliefLine, TaxBand,
    TaxCharge,
};

/// Inputs to a UK dividend tax calculation.
#[derive(Debug, Clone)]
pub struct UkDividendInput {
    /// Total dividends received, wrapper-held included.
    pub total_dividends: Decimal,
    /// Dividends received inside a wrapper (e.g. an ISA).
    pub wrapper_dividends: Decimal,
    /// The caller's marginal tax band.
    pub band: TaxBand,
}

/// Calculates UK dividend tax.
///
/// # Arguments
///
/// * `input` - Dividend figures and the marginal band
/// * `allowance` - The dividend allowance balance from the ledger; only
///   its remaining headroom is consumed
/// * `policy` - The dividend parameters for the tax year
pub fn calculate_uk_dividend_tax(
    input: &UkDividendInput,
    allowance: &AllowanceBalance,
    policy: &UkDividendPolicy,
) -> TaxResult<LiabilityResult> {
    validate_amounts(input.total_dividends, input.wrapper_dividends)?;
    if allowance.kind != AllowanceKind::DividendAllowance {
        return Err(TaxError::Validation {
            field: "allowance".to_string(),
            message: format!(
                "expected a dividend_allowance balance, got {}",
                allowance.kind
            ),
        });
    }

    if input.total_dividends.is_zero() {
        return Ok(LiabilityResult::zero(TaxCharge::UkDividend));
    }

    let base = input.total_dividends - input.wrapper_dividends;
    let allowance_applied = allowance.remaining.min(base);
    let taxable = base - allowance_applied;
    let rate = policy.rates.for_band(input.band);
    let tax_due = taxable * rate;

    let bands = if taxable > Decimal::ZERO {
        vec![BandLine {
            label: format!("dividends at {:?} rate", input.band).to_lowercase(),
            amount: taxable,
            rate,
            tax: tax_due,
        }]
    } else {
        vec![]
    };

    Ok(LiabilityResult {
        charge: TaxCharge::UkDividend,
        gross: input.total_dividends,
        tax_free: input.wrapper_dividends,
        reliefs: vec![ReliefLine {
            kind: ReliefKind::DividendAllowance,
            statute_ref: "ITA 2007 s.13A".to_string(),
            applied: allowance_applied,
        }],
        taxable,
        bands,
        tax_due,
    })
}

fn validate_amounts(total: Decimal, wrapper: Decimal) -> TaxResult<()> {
    if total < Decimal::ZERO {
        return Err(TaxError::Validation {
            field: "total_dividends".to_string(),
            message: format!("must not be negative, got {total}"),
        });
    }
    if wrapper < Decimal::ZERO {
        return Err(TaxError::Validation {
            field: "wrapper_dividends".to_string(),
            message: format!("must not be negative, got {wrapper}"),
        });
    }
    if wrapper > total {
        return Err(TaxError::Validation {
            field: "wrapper_dividends".to_string(),
            message: format!("wrapper portion {wrapper} exceeds the total {total}"),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_fixtures::policy_2024_25;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn allowance_balance(remaining: &str) -> AllowanceBalance {
        let limit = dec("500");
        AllowanceBalance::from_usage(
            AllowanceKind::DividendAllowance,
            "2024/25",
            limit,
            limit - dec(remaining),
        )
    }

    fn input(total: &str, wrapper: &str, band: TaxBand) -> UkDividendInput {
        UkDividendInput {
            total_dividends: dec(total),
            wrapper_dividends: dec(wrapper),
            band,
        }
    }

    /// DV-001: allowance then basic rate.
    #[test]
    fn test_basic_rate_after_allowance() {
        let policy = policy_2024_25();
        let result = calculate_uk_dividend_tax(
            &input("2500", "0", TaxBand::Basic),
            &allowance_balance("500"),
            &policy.uk.dividend,
        )
        .unwrap();

        assert_eq!(result.taxable, dec("2000"));
        assert_eq!(result.tax_due, dec("175"));
        assert_eq!(result.reliefs[0].applied, dec("500"));
    }

    /// DV-002: band selects the rate.
    #[test]
    fn test_band_selects_rate() {
        let policy = policy_2024_25();
        let higher = calculate_uk_dividend_tax(
            &input("2500", "0", TaxBand::Higher),
            &allowance_balance("500"),
            &policy.uk.dividend,
        )
        .unwrap();
        assert_eq!(higher.tax_due, dec("675"));

        let additional = calculate_uk_dividend_tax(
            &input("2500", "0", TaxBand::Additional),
            &allowance_balance("500"),
            &policy.uk.dividend,
        )
        .unwrap();
        assert_eq!(additional.tax_due, dec("787"));
    }

    /// DV-003: wrapper dividends never touch the allowance.
    #[test]
    fn test_wrapper_dividends_excluded() {
        let policy = policy_2024_25();
        let result = calculate_uk_dividend_tax(
            &input("10000", "10000", TaxBand::Higher),
            &allowance_balance("500"),
            &policy.uk.dividend,
        )
        .unwrap();

        assert_eq!(result.tax_free, dec("10000"));
        assert_eq!(result.tax_due, Decimal::ZERO);
        assert_eq!(result.reliefs[0].applied, Decimal::ZERO);
    }

    #[test]
    fn test_exhausted_allowance_taxes_whole_base() {
        let policy = policy_2024_25();
        let result = calculate_uk_dividend_tax(
            &input("2000", "0", TaxBand::Basic),
            &allowance_balance("0"),
            &policy.uk.dividend,
        )
        .unwrap();
        assert_eq!(result.taxable, dec("2000"));
        assert_eq!(result.tax_due, dec("175"));
    }

    #[test]
    fn test_zero_dividends_return_zero_result() {
        let policy = policy_2024_25();
        let result = calculate_uk_dividend_tax(
            &input("0", "0", TaxBand::Basic),
            &allowance_balance("500"),
            &policy.uk.dividend,
        )
        .unwrap();
        assert_eq!(result, LiabilityResult::zero(TaxCharge::UkDividend));
    }

    #[test]
    fn test_wrong_balance_kind_rejected() {
        let policy = policy_2024_25();
        let wrong = AllowanceBalance::from_usage(
            AllowanceKind::CgtExemptAmount,
            "2024/25",
            dec("3000"),
            Decimal::ZERO,
        );
        let result = calculate_uk_dividend_tax(
            &input("2500", "0", TaxBand::Basic),
            &wrong,
            &policy.uk.dividend,
        );
        assert!(matches!(result, Err(TaxError::Validation { .. })));
    }

    #[test]
    fn test_negative_dividends_rejected() {
        let policy = policy_2024_25();
        let result = calculate_uk_dividend_tax(
            &input("-1", "0", TaxBand::Basic),
            &allowance_balance("500"),
            &policy.uk.dividend,
        );
        assert!(matches!(result, Err(TaxError::Validation { .. })));
    }
}
