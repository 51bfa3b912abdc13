//! Residency verdict models.
//!
//! A [`ResidencyVerdict`] is produced fresh per request from day-count and
//! tie inputs and is never mutated. It records which test decided the
//! result and the supporting counters so a verdict can be audited after
//! the fact.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Jurisdiction;

/// The residency test that decided a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResidencyTest {
    /// UK automatic overseas test: too few days and no ties.
    AutomaticOverseas,
    /// UK automatic residence test: day count at or above the automatic
    /// threshold.
    AutomaticUk,
    /// UK sufficient-ties test: banded day count against tie count.
    SufficientTies,
    /// SA physical presence test: current-year days plus rolling average.
    PhysicalPresence,
}

/// The five UK connection ties considered by the sufficient-ties test.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UkTies {
    /// Spouse, partner or minor child resident in the UK.
    pub family: bool,
    /// Accessible UK accommodation used during the year.
    pub accommodation: bool,
    /// 40 or more days of more-than-3-hours work in the UK.
    pub work: bool,
    /// 90+ days spent in the UK in either of the two prior years.
    pub ninety_day: bool,
    /// More days in the UK than in any other single country.
    /// Counted for leavers only.
    pub country: bool,
}

impl UkTies {
    /// Counts the ties that apply.
    ///
    /// The country tie is only counted when `include_country` is set:
    /// it applies to leavers, not arrivers.
    pub fn count(&self, include_country: bool) -> u32 {
        [
            self.family,
            self.accommodation,
            self.work,
            self.ninety_day,
            include_country && self.country,
        ]
        .iter()
        .filter(|tie| **tie)
        .count() as u32
    }
}

/// A warning attached to a verdict when a policy fallback fired.
///
/// Warnings indicate conditions that did not prevent assessment but
/// that the caller should surface (e.g. partial presence history).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerdictWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
}

/// The outcome of a residency assessment for one tax year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResidencyVerdict {
    /// The jurisdiction the verdict applies to.
    pub jurisdiction: Jurisdiction,
    /// The tax year label the verdict covers.
    pub tax_year: String,
    /// Whether the individual is tax-resident for the year.
    pub resident: bool,
    /// Whether the individual is ordinarily resident.
    /// Only populated for SA verdicts.
    pub ordinarily_resident: Option<bool>,
    /// The test that decided the result.
    pub deciding_test: ResidencyTest,
    /// Days spent in the jurisdiction during the tax year.
    pub day_count: u32,
    /// Ties counted toward the sufficient-ties test (UK only).
    pub tie_count: Option<u32>,
    /// The five-year rolling average of presence days (SA only).
    pub five_year_average: Option<Decimal>,
    /// Warnings raised while assessing (e.g. partial history).
    #[serde(default)]
    pub warnings: Vec<VerdictWarning>,
}
