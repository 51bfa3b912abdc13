//! Liability result models.
//!
//! Every calculator returns a [`LiabilityResult`]: a pure value object
//! carrying the gross figure, the itemized reliefs applied, the taxable
//! remainder, the rate band lines and the tax due. Intermediate
//! arithmetic keeps full precision; [`LiabilityResult::rounded`] applies
//! round-half-up to two decimal places at the reporting boundary only.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::Jurisdiction;

/// UK marginal income tax band supplied by the caller as context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxBand {
    /// Basic rate band.
    #[default]
    Basic,
    /// Higher rate band.
    Higher,
    /// Additional rate band.
    Additional,
}

/// The eight liabilities the engine computes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxCharge {
    /// UK inheritance tax on an estate.
    UkInheritanceTax,
    /// SA estate duty on an estate.
    SaEstateDuty,
    /// UK capital gains tax.
    UkCapitalGains,
    /// SA capital gains tax via the inclusion-rate method.
    SaCapitalGains,
    /// UK dividend tax.
    UkDividend,
    /// SA dividends withholding tax.
    SaDividendWithholding,
    /// UK tax on savings interest.
    UkSavingsInterest,
    /// SA tax on savings interest.
    SaSavingsInterest,
}

impl TaxCharge {
    /// The jurisdiction that levies the charge.
    pub fn jurisdiction(&self) -> Jurisdiction {
        match self {
            TaxCharge::UkInheritanceTax
            | TaxCharge::UkCapitalGains
            | TaxCharge::UkDividend
            | TaxCharge::UkSavingsInterest => Jurisdiction::Uk,
            TaxCharge::SaEstateDuty
            | TaxCharge::SaCapitalGains
            | TaxCharge::SaDividendWithholding
            | TaxCharge::SaSavingsInterest => Jurisdiction::Sa,
        }
    }
}

/// The relief or exemption a [`ReliefLine`] records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReliefKind {
    /// UK inheritance tax nil-rate band.
    NilRateBand,
    /// UK residence nil-rate band.
    ResidenceNilRateBand,
    /// Nil-rate band transferred from a deceased spouse.
    TransferableNilRateBand,
    /// SA estate duty abatement.
    EstateAbatement,
    /// UK capital gains annual exempt amount.
    AnnualExemptAmount,
    /// UK dividend allowance.
    DividendAllowance,
    /// UK starting rate band for savings.
    StartingRateBand,
    /// UK personal savings allowance.
    PersonalSavingsAllowance,
    /// SA interest exemption.
    InterestExemption,
    /// The portion of an SA gain outside the inclusion rate.
    GainExclusion,
}

/// One relief applied against a taxable base.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReliefLine {
    /// Which relief was applied.
    pub kind: ReliefKind,
    /// Reference to the statute granting the relief.
    pub statute_ref: String,
    /// The amount of base the relief absorbed.
    pub applied: Decimal,
}

/// One slice of the taxable remainder taxed at a single rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandLine {
    /// A human-readable description of the slice.
    pub label: String,
    /// The amount taxed in this slice.
    pub amount: Decimal,
    /// The rate applied, as a fraction (0.20 = 20%).
    pub rate: Decimal,
    /// The tax arising on this slice.
    pub tax: Decimal,
}

/// The complete result of one liability calculation.
///
/// Amounts realized inside a tax-advantaged wrapper are excluded from
/// the taxable base and reported in `tax_free`, never merged into the
/// relief lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiabilityResult {
    /// The liability this result describes.
    pub charge: TaxCharge,
    /// The gross figure before any exclusion or relief.
    pub gross: Decimal,
    /// The portion realized inside a tax-advantaged wrapper.
    pub tax_free: Decimal,
    /// The reliefs applied, itemized in application order.
    pub reliefs: Vec<ReliefLine>,
    /// The taxable remainder after exclusions and reliefs.
    pub taxable: Decimal,
    /// The rate slices making up the tax due.
    pub bands: Vec<BandLine>,
    /// The total tax due.
    pub tax_due: Decimal,
}

impl LiabilityResult {
    /// An all-zero result for the given charge.
    ///
    /// Calculators return this for zero-valued inputs instead of
    /// raising.
    pub fn zero(charge: TaxCharge) -> Self {
        LiabilityResult {
            charge,
            gross: Decimal::ZERO,
            tax_free: Decimal::ZERO,
            reliefs: vec![],
            taxable: Decimal::ZERO,
            bands: vec![],
            tax_due: Decimal::ZERO,
        }
    }

    /// The jurisdiction levying the charge.
    pub fn jurisdiction(&self) -> Jurisdiction {
        self.charge.jurisdiction()
    }

    /// Total of all relief lines.
    pub fn reliefs_total(&self) -> Decimal {
        self.reliefs.iter().map(|line| line.applied).sum()
    }

    /// The effective rate on the non-wrapper base, if any base exists.
    pub fn effective_rate(&self) -> Option<Decimal> {
        let base = self.gross - self.tax_free;
        if base > Decimal::ZERO {
            Some(self.tax_due / base)
        } else {
            None
        }
    }

    /// A copy with every monetary figure rounded for external reporting.
    ///
    /// Rates are left untouched; only amounts are rounded.
    pub fn rounded(&self) -> Self {
        LiabilityResult {
            charge: self.charge,
            gross: round_money(self.gross),
            tax_free: round_money(self.tax_free),
            reliefs: self
                .reliefs
                .iter()
                .map(|line| ReliefLine {
                    kind: line.kind,
                    statute_ref: line.statute_ref.clone(),
                    applied: round_money(line.applied),
                })
                .collect(),
            taxable: round_money(self.taxable),
            bands: self
                .bands
                .iter()
                .map(|line| BandLine {
                    label: line.label.clone(),
                    amount: round_money(line.amount),
                    rate: line.rate,
                    tax: round_money(line.tax),
                })
                .collect(),
            tax_due: round_money(self.tax_due),
        }
    }
}

/// Rounds a monetary amount to two decimal places, half away from zero.
///
/// This is the only rounding the engine performs; everything upstream of
/// external reporting keeps full precision.
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_round_money_is_half_up() {
        assert_eq!(round_money(dec("1.005")), dec("1.01"));
        assert_eq!(round_money(dec("1.004")), dec("1.00"));
        assert_eq!(round_money(dec("2.675")), dec("2.68"));
        assert_eq!(round_money(dec("-1.005")), dec("-1.01"));
    }

    #[test]
    fn test_zero_result_has_all_zero_fields() {
        let result = LiabilityResult::zero(TaxCharge::UkCapitalGains);
        assert_eq!(result.gross, Decimal::ZERO);
        assert_eq!(result.tax_free, Decimal::ZERO);
        assert_eq!(result.taxable, Decimal::ZERO);
        assert_eq!(result.tax_due, Decimal::ZERO);
        assert!(result.reliefs.is_empty());
        assert!(result.bands.is_empty());
        assert_eq!(result.effective_rate(), None);
    }

    #[test]
    fn test_charge_jurisdictions() {
        assert_eq!(
            TaxCharge::UkInheritanceTax.jurisdiction(),
            Jurisdiction::Uk
        );
        assert_eq!(TaxCharge::SaEstateDuty.jurisdiction(), Jurisdiction::Sa);
        assert_eq!(
            TaxCharge::SaDividendWithholding.jurisdiction(),
            Jurisdiction::Sa
        );
    }

    #[test]
    fn test_rounded_rounds_amounts_but_not_rates() {
        let result = LiabilityResult {
            charge: TaxCharge::UkDividend,
            gross: dec("1000.005"),
            tax_free: Decimal::ZERO,
            reliefs: vec![ReliefLine {
                kind: ReliefKind::DividendAllowance,
                statute_ref: "ITA 2007 s.13A".to_string(),
                applied: dec("500.005"),
            }],
            taxable: dec("499.995"),
            bands: vec![BandLine {
                label: "dividends at basic rate".to_string(),
                amount: dec("499.995"),
                rate: dec("0.0875"),
                tax: dec("43.7495625"),
            }],
            tax_due: dec("43.7495625"),
        };

        let rounded = result.rounded();
        assert_eq!(rounded.gross, dec("1000.01"));
        assert_eq!(rounded.reliefs[0].applied, dec("500.01"));
        assert_eq!(rounded.bands[0].rate, dec("0.0875"));
        assert_eq!(rounded.tax_due, dec("43.75"));
    }

    #[test]
    fn test_effective_rate_uses_non_wrapper_base() {
        let mut result = LiabilityResult::zero(TaxCharge::SaCapitalGains);
        result.gross = dec("3000");
        result.tax_due = dec("540");
        assert_eq!(result.effective_rate(), Some(dec("0.18")));

        result.tax_free = dec("3000");
        assert_eq!(result.effective_rate(), None);
    }

    #[test]
    fn test_result_round_trips_through_json() {
        let result = LiabilityResult {
            charge: TaxCharge::SaEstateDuty,
            gross: dec("20000000"),
            tax_free: Decimal::ZERO,
            reliefs: vec![ReliefLine {
                kind: ReliefKind::EstateAbatement,
                statute_ref: "Estate Duty Act 45 of 1955 s.4A".to_string(),
                applied: dec("3500000"),
            }],
            taxable: dec("16500000"),
            bands: vec![BandLine {
                label: "dutiable amount at lower rate".to_string(),
                amount: dec("16500000"),
                rate: dec("0.20"),
                tax: dec("3300000"),
            }],
            tax_due: dec("3300000"),
        };

        let json = serde_json::to_string(&result).unwrap();
        let back: LiabilityResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, result);
    }
}
