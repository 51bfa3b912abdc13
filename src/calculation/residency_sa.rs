//! SA physical presence test.
//!
//! Residence requires enough days in the current tax year and a rolling
//! five-year average across the window of the current year plus the four
//! prior years. Missing history years count as zero days; the verdict
//! carries a structured warning when that fallback fires so the caller
//! can surface it rather than discover it silently.

use rust_decimal::Decimal;

use crate::config::PresencePolicy;
use crate::error::{TaxError, TaxResult};
use crate::models::{Jurisdiction, ResidencyTest, ResidencyVerdict, TaxYear, VerdictWarning};

/// Maximum day count accepted for a single tax year.
const MAX_YEAR_DAYS: u32 = 366;

/// Warning code attached when fewer than the full window of history
/// years was supplied.
pub const PARTIAL_HISTORY_WARNING: &str = "partial_presence_history";

/// Inputs to the SA physical presence test for one tax year.
#[derive(Debug, Clone)]
pub struct SaResidencyInput {
    /// Tax year label (`YYYY/YY`) being assessed.
    pub tax_year: String,
    /// Days spent in SA during the tax year.
    pub days_in_sa: u32,
    /// Days spent in SA in prior years, most recent first. Up to four
    /// entries; years beyond the supplied history count as zero days.
    pub prior_year_days: Vec<u32>,
}

/// Applies the SA physical presence test.
///
/// Residence requires the current-year day count to meet the current
/// threshold and the window average to meet the average threshold.
/// Ordinary residence is the stricter qualification: every year of the
/// window must individually meet the current-year threshold.
///
/// # Arguments
///
/// * `input` - Current and historical day counts
/// * `policy` - The presence thresholds for the tax year
pub fn assess_sa_residency(
    input: &SaResidencyInput,
    policy: &PresencePolicy,
) -> TaxResult<ResidencyVerdict> {
    TaxYear::parse(Jurisdiction::Sa, &input.tax_year)?;
    if input.days_in_sa > MAX_YEAR_DAYS {
        return Err(TaxError::Validation {
            field: "days_in_sa".to_string(),
            message: format!(
                "day count {} exceeds the {MAX_YEAR_DAYS} days in a tax year",
                input.days_in_sa
            ),
        });
    }
    for (index, days) in input.prior_year_days.iter().enumerate() {
        if *days > MAX_YEAR_DAYS {
            return Err(TaxError::Validation {
                field: "prior_year_days".to_string(),
                message: format!(
                    "day count {days} for prior year {} exceeds {MAX_YEAR_DAYS}",
                    index + 1
                ),
            });
        }
    }
    let window = policy.window_years as usize;
    if window == 0 {
        return Err(TaxError::Validation {
            field: "window_years".to_string(),
            message: "the presence window must cover at least one year".to_string(),
        });
    }
    if input.prior_year_days.len() > window - 1 {
        return Err(TaxError::Validation {
            field: "prior_year_days".to_string(),
            message: format!(
                "{} prior years supplied; the presence window covers at most {}",
                input.prior_year_days.len(),
                window - 1
            ),
        });
    }

    // Pad missing history years with zero days.
    let mut window_days: Vec<u32> = Vec::with_capacity(window);
    window_days.push(input.days_in_sa);
    window_days.extend(&input.prior_year_days);
    window_days.resize(window, 0);

    let total: u32 = window_days.iter().sum();
    let average = Decimal::from(total) / Decimal::from(policy.window_years);

    let resident =
        input.days_in_sa >= policy.current_year_days && average >= policy.average_days;
    let ordinarily_resident = window_days
        .iter()
        .all(|days| *days >= policy.current_year_days);

    let mut warnings = vec![];
    let supplied = 1 + input.prior_year_days.len();
    if supplied < window {
        tracing::warn!(
            supplied,
            window,
            "partial presence history; missing years counted as zero days"
        );
        warnings.push(VerdictWarning {
            code: PARTIAL_HISTORY_WARNING.to_string(),
            message: format!(
                "{supplied} of {window} window years supplied; missing years counted as zero days"
            ),
        });
    }

    Ok(ResidencyVerdict {
        jurisdiction: Jurisdiction::Sa,
        tax_year: input.tax_year.clone(),
        resident,
        ordinarily_resident: Some(ordinarily_resident),
        deciding_test: ResidencyTest::PhysicalPresence,
        day_count: input.days_in_sa,
        tie_count: None,
        five_year_average: Some(average),
        warnings,
    })
}
