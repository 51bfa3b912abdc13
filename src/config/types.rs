//! Policy table types.
//!
//! Every rate, threshold, band table and allowance limit that changes
//! from one tax year to the next lives here, deserialized from a YAML
//! policy file. Nothing in the calculation modules hard-codes a figure:
//! the resolved [`TaxYearPolicy`] is threaded explicitly through every
//! calculator call.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::models::{AllowanceKind, TaxBand};

/// One day-count band of the UK sufficient-ties table.
#[derive(Debug, Clone, Deserialize)]
pub struct TieBand {
    /// Lowest day count in the band (inclusive).
    pub min_days: u32,
    /// Highest day count in the band (inclusive).
    pub max_days: u32,
    /// Ties required for residence within the band.
    pub ties_required: u32,
}

/// Thresholds and band tables for the UK statutory residence test.
#[derive(Debug, Clone, Deserialize)]
pub struct SrtPolicy {
    /// Automatic overseas day threshold for leavers (resident in the
    /// prior year).
    pub automatic_overseas_days_leaver: u32,
    /// Automatic overseas day threshold for arrivers.
    pub automatic_overseas_days_arriver: u32,
    /// Day count at or above which residence is automatic.
    pub automatic_resident_days: u32,
    /// Sufficient-ties bands for leavers.
    pub leaver_bands: Vec<TieBand>,
    /// Sufficient-ties bands for arrivers.
    pub arriver_bands: Vec<TieBand>,
}

impl SrtPolicy {
    /// Ties required for the given day count, if any band covers it.
    pub fn ties_required(&self, day_count: u32, leaver: bool) -> Option<u32> {
        let bands = if leaver {
            &self.leaver_bands
        } else {
            &self.arriver_bands
        };
        bands
            .iter()
            .find(|band| day_count >= band.min_days && day_count <= band.max_days)
            .map(|band| band.ties_required)
    }
}

/// Deemed-domicile qualification thresholds.
#[derive(Debug, Clone, Deserialize)]
pub struct DeemedDomicilePolicy {
    /// How many years of residency history are examined.
    pub lookback_years: u32,
    /// Resident years within the lookback that trigger deemed domicile.
    pub resident_years_required: u32,
}

/// UK ISA subscription policy.
#[derive(Debug, Clone, Deserialize)]
pub struct IsaPolicy {
    /// Annual subscription limit.
    pub annual_limit: Decimal,
}

/// UK pension annual allowance with its graduated income taper.
#[derive(Debug, Clone, Deserialize)]
pub struct PensionTaperPolicy {
    /// Full annual allowance before any taper.
    pub annual_allowance: Decimal,
    /// Adjusted income above which the allowance tapers.
    pub taper_threshold: Decimal,
    /// The floor the allowance never tapers below.
    pub taper_floor: Decimal,
}

/// A figure that varies by UK marginal tax band: one tax rate per band.
#[derive(Debug, Clone, Deserialize)]
pub struct BandedRates {
    /// Rate in the basic band.
    pub basic: Decimal,
    /// Rate in the higher band.
    pub higher: Decimal,
    /// Rate in the additional band.
    pub additional: Decimal,
}

impl BandedRates {
    /// The rate for the given band.
    pub fn for_band(&self, band: TaxBand) -> Decimal {
        match band {
            TaxBand::Basic => self.basic,
            TaxBand::Higher => self.higher,
            TaxBand::Additional => self.additional,
        }
    }
}

/// An allowance amount that varies by UK marginal tax band.
#[derive(Debug, Clone, Deserialize)]
pub struct BandedAllowances {
    /// Allowance in the basic band.
    pub basic: Decimal,
    /// Allowance in the higher band.
    pub higher: Decimal,
    /// Allowance in the additional band.
    pub additional: Decimal,
}

impl BandedAllowances {
    /// The allowance for the given band.
    pub fn for_band(&self, band: TaxBand) -> Decimal {
        match band {
            TaxBand::Basic => self.basic,
            TaxBand::Higher => self.higher,
            TaxBand::Additional => self.additional,
        }
    }
}

/// UK dividend taxation policy.
#[derive(Debug, Clone, Deserialize)]
pub struct UkDividendPolicy {
    /// Dividend allowance for the tax year.
    pub allowance: Decimal,
    /// Dividend tax rates by band.
    pub rates: BandedRates,
}

/// UK capital gains taxation policy.
#[derive(Debug, Clone, Deserialize)]
pub struct UkCgtPolicy {
    /// Annual exempt amount.
    pub exempt_amount: Decimal,
    /// The single configured CGT rate for the tax year.
    pub rate: Decimal,
}

/// UK savings interest taxation policy.
#[derive(Debug, Clone, Deserialize)]
pub struct SavingsPolicy {
    /// The personal allowance used when computing the starting rate band.
    pub personal_allowance: Decimal,
    /// The starting rate band for savings before any reduction.
    pub starting_rate_band: Decimal,
    /// Personal savings allowance by band.
    pub personal_savings_allowance: BandedAllowances,
    /// Savings income tax rates by band.
    pub rates: BandedRates,
}

/// UK inheritance tax policy.
#[derive(Debug, Clone, Deserialize)]
pub struct InheritancePolicy {
    /// Nil-rate band.
    pub nil_rate_band: Decimal,
    /// Residence nil-rate band.
    pub residence_nil_rate_band: Decimal,
    /// Standard rate on the chargeable estate.
    pub standard_rate: Decimal,
    /// Reduced rate where the charitable threshold is met.
    pub reduced_rate: Decimal,
    /// Fraction of the baseline that must pass to charity for the
    /// reduced rate (0.10 = 10%).
    pub charitable_threshold: Decimal,
}

/// All UK policy parameters for one tax year.
#[derive(Debug, Clone, Deserialize)]
pub struct UkPolicy {
    /// Statutory residence test thresholds and bands.
    pub srt: SrtPolicy,
    /// Deemed-domicile thresholds.
    pub deemed_domicile: DeemedDomicilePolicy,
    /// ISA subscription policy.
    pub isa: IsaPolicy,
    /// Pension annual allowance and taper.
    pub pension: PensionTaperPolicy,
    /// Dividend taxation.
    pub dividend: UkDividendPolicy,
    /// Capital gains taxation.
    pub cgt: UkCgtPolicy,
    /// Savings interest taxation.
    pub savings: SavingsPolicy,
    /// Inheritance tax.
    pub inheritance: InheritancePolicy,
}

/// SA physical presence test thresholds.
#[derive(Debug, Clone, Deserialize)]
pub struct PresencePolicy {
    /// Days required in the current tax year.
    pub current_year_days: u32,
    /// Rolling-average days required across the window.
    pub average_days: Decimal,
    /// Size of the rolling window, current year included.
    pub window_years: u32,
}

/// SA tax-free savings account caps.
#[derive(Debug, Clone, Deserialize)]
pub struct TfsaPolicy {
    /// Annual contribution limit.
    pub annual_limit: Decimal,
    /// Lifetime contribution limit.
    pub lifetime_limit: Decimal,
}

/// SA age-tiered interest exemption.
#[derive(Debug, Clone, Deserialize)]
pub struct InterestExemptionPolicy {
    /// Exemption below the age boundary.
    pub under_age_limit: Decimal,
    /// Exemption at or above the age boundary.
    pub over_age_limit: Decimal,
    /// Age at which the higher exemption starts.
    pub age_boundary: u32,
}

/// SA estate duty parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct EstateDutyPolicy {
    /// Abatement deducted before duty is charged.
    pub abatement: Decimal,
    /// Rate on the dutiable amount up to the ceiling.
    pub lower_rate: Decimal,
    /// Rate on the dutiable amount above the ceiling.
    pub higher_rate: Decimal,
    /// The dutiable amount up to which the lower rate applies.
    pub lower_rate_ceiling: Decimal,
}

/// SA capital gains parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct SaCgtPolicy {
    /// Fraction of a gain included in taxable income.
    pub inclusion_rate: Decimal,
}

/// All SA policy parameters for one tax year.
#[derive(Debug, Clone, Deserialize)]
pub struct SaPolicy {
    /// Physical presence test thresholds.
    pub presence: PresencePolicy,
    /// Tax-free savings account caps.
    pub tfsa: TfsaPolicy,
    /// Interest exemption tiers.
    pub interest_exemption: InterestExemptionPolicy,
    /// Estate duty parameters.
    pub estate_duty: EstateDutyPolicy,
    /// Capital gains parameters.
    pub cgt: SaCgtPolicy,
    /// Flat dividends withholding rate.
    pub dividend_withholding_rate: Decimal,
}

/// Extra context some allowance limits depend on.
///
/// The pension annual allowance tapers with adjusted income; the SA
/// interest exemption steps up with age. When the context is absent the
/// untapered / under-age figure is used.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowanceContext {
    /// Adjusted income, for the pension taper.
    pub adjusted_income: Option<Decimal>,
    /// Age at the end of the tax year, for the interest exemption.
    pub age: Option<u32>,
}

/// Every policy parameter for one tax year, both jurisdictions.
#[derive(Debug, Clone, Deserialize)]
pub struct TaxYearPolicy {
    /// Tax year label (`YYYY/YY`).
    pub label: String,
    /// UK parameters.
    pub uk: UkPolicy,
    /// SA parameters.
    pub sa: SaPolicy,
}

impl TaxYearPolicy {
    /// The annual limit in force for an allowance kind.
    pub fn allowance_limit(&self, kind: AllowanceKind, ctx: &AllowanceContext) -> Decimal {
        match kind {
            AllowanceKind::IsaSubscription => self.uk.isa.annual_limit,
            AllowanceKind::TfsaContribution => self.sa.tfsa.annual_limit,
            AllowanceKind::PensionContribution => match ctx.adjusted_income {
                Some(income) => self.tapered_pension_allowance(income),
                None => self.uk.pension.annual_allowance,
            },
            AllowanceKind::DividendAllowance => self.uk.dividend.allowance,
            AllowanceKind::CgtExemptAmount => self.uk.cgt.exempt_amount,
            AllowanceKind::SavingsStartingRate => self.uk.savings.starting_rate_band,
            AllowanceKind::InterestExemption => match ctx.age {
                Some(age) if age >= self.sa.interest_exemption.age_boundary => {
                    self.sa.interest_exemption.over_age_limit
                }
                _ => self.sa.interest_exemption.under_age_limit,
            },
        }
    }

    /// The lifetime cap for an allowance kind, where one applies.
    pub fn lifetime_limit(&self, kind: AllowanceKind) -> Option<Decimal> {
        match kind {
            AllowanceKind::TfsaContribution => Some(self.sa.tfsa.lifetime_limit),
            AllowanceKind::IsaSubscription
            | AllowanceKind::PensionContribution
            | AllowanceKind::DividendAllowance
            | AllowanceKind::CgtExemptAmount
            | AllowanceKind::SavingsStartingRate
            | AllowanceKind::InterestExemption => None,
        }
    }

    /// The pension annual allowance after the income taper.
    ///
    /// The allowance reduces by one unit for every two units of adjusted
    /// income above the taper threshold, and never below the floor.
    pub fn tapered_pension_allowance(&self, adjusted_income: Decimal) -> Decimal {
        let pension = &self.uk.pension;
        let excess = (adjusted_income - pension.taper_threshold).max(Decimal::ZERO);
        let reduction = excess / Decimal::from(2);
        (pension.annual_allowance - reduction).max(pension.taper_floor)
    }
}
