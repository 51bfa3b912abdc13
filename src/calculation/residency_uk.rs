//! UK statutory residence test.
//!
//! The test applies three stages in order: the automatic overseas test,
//! the automatic residence test, then the sufficient-ties test against a
//! banded day-count table. The verdict records which stage decided the
//! result and the tie count so the outcome can be audited.

use crate::config::SrtPolicy;
use crate::error::{TaxError, TaxResult};
use crate::models::{Jurisdiction, ResidencyTest, ResidencyVerdict, TaxYear, UkTies};

/// Maximum day count accepted for a single tax year.
const MAX_YEAR_DAYS: u32 = 366;

/// Inputs to the UK statutory residence test for one tax year.
#[derive(Debug, Clone)]
pub struct UkResidencyInput {
    /// Tax year label (`YYYY/YY`) being assessed.
    pub tax_year: String,
    /// Days spent in the UK during the tax year.
    pub days_in_uk: u32,
    /// The five connection ties.
    pub ties: UkTies,
    /// Whether the individual was UK-resident in the prior tax year.
    /// Residents-last-year are "leavers" and face tighter thresholds.
    pub resident_in_prior_year: bool,
}

/// Applies the UK statutory residence test.
///
/// # Arguments
///
/// * `input` - Day count, ties and leaver/arriver status for the year
/// * `policy` - The statutory residence thresholds for the tax year
///
/// # Returns
///
/// A [`ResidencyVerdict`] naming the deciding test, or a validation
/// error for a malformed tax year label or an impossible day count.
pub fn assess_uk_residency(
    input: &UkResidencyInput,
    policy: &SrtPolicy,
) -> TaxResult<ResidencyVerdict> {
    TaxYear::parse(Jurisdiction::Uk, &input.tax_year)?;
    if input.days_in_uk > MAX_YEAR_DAYS {
        return Err(TaxError::Validation {
            field: "days_in_uk".to_string(),
            message: format!(
                "day count {} exceeds the {MAX_YEAR_DAYS} days in a tax year",
                input.days_in_uk
            ),
        });
    }

    let leaver = input.resident_in_prior_year;
    // The country tie only counts for leavers.
    let tie_count = input.ties.count(leaver);

    let overseas_threshold = if leaver {
        policy.automatic_overseas_days_leaver
    } else {
        policy.automatic_overseas_days_arriver
    };

    let verdict = |resident: bool, deciding_test: ResidencyTest| ResidencyVerdict {
        jurisdiction: Jurisdiction::Uk,
        tax_year: input.tax_year.clone(),
        resident,
        ordinarily_resident: None,
        deciding_test,
        day_count: input.days_in_uk,
        tie_count: Some(tie_count),
        five_year_average: None,
        warnings: vec![],
    };

    // 1. Automatic overseas test: terminal non-residence.
    if input.days_in_uk < overseas_threshold && tie_count == 0 {
        tracing::debug!(
            days = input.days_in_uk,
            threshold = overseas_threshold,
            "automatic overseas test met"
        );
        return Ok(verdict(false, ResidencyTest::AutomaticOverseas));
    }

    // 2. Automatic residence test: terminal residence.
    if input.days_in_uk >= policy.automatic_resident_days {
        tracing::debug!(days = input.days_in_uk, "automatic residence test met");
        return Ok(verdict(true, ResidencyTest::AutomaticUk));
    }

    // 3. Sufficient ties against the banded table. A day count below the
    // lowest band cannot establish residence however many ties exist.
    let resident = match policy.ties_required(input.days_in_uk, leaver) {
        Some(required) => tie_count >= required,
        None => false,
    };
    tracing::debug!(
        days = input.days_in_uk,
        ties = tie_count,
        leaver,
        resident,
        "sufficient ties test applied"
    );
    Ok(verdict(resident, ResidencyTest::SufficientTies))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_fixtures::policy_2024_25;

    fn input(days: u32, ties: UkTies, prior: bool) -> UkResidencyInput {
        UkResidencyInput {
            tax_year: "2024/25".to_string(),
            days_in_uk: days,
            ties,
            resident_in_prior_year: prior,
        }
    }

    fn ties(n: u32) -> UkTies {
        UkTies {
            family: n >= 1,
            accommodation: n >= 2,
            work: n >= 3,
            ninety_day: n >= 4,
            country: false,
        }
    }

    /// RU-001: few days and no ties is automatically overseas.
    #[test]
    fn test_automatic_overseas_for_leaver() {
        let policy = policy_2024_25();
        let verdict = assess_uk_residency(&input(10, ties(0), true), &policy.uk.srt).unwrap();
        assert!(!verdict.resident);
        assert_eq!(verdict.deciding_test, ResidencyTest::AutomaticOverseas);
        assert_eq!(verdict.tie_count, Some(0));
    }

    /// RU-002: arrivers get the wider overseas threshold.
    #[test]
    fn test_automatic_overseas_threshold_differs_for_arrivers() {
        let policy = policy_2024_25();
        // 30 days, no ties: overseas for an arriver (threshold 46)...
        let arriver = assess_uk_residency(&input(30, ties(0), false), &policy.uk.srt).unwrap();
        assert_eq!(arriver.deciding_test, ResidencyTest::AutomaticOverseas);

        // ...but 30 days is past the leaver threshold of 16, so the
        // sufficient-ties test decides instead.
        let leaver = assess_uk_residency(&input(30, ties(0), true), &policy.uk.srt).unwrap();
        assert_eq!(leaver.deciding_test, ResidencyTest::SufficientTies);
        assert!(!leaver.resident);
    }

    /// RU-003: 183 days is automatic residence.
    #[test]
    fn test_automatic_residence_at_183_days() {
        let policy = policy_2024_25();
        let verdict = assess_uk_residency(&input(183, ties(0), false), &policy.uk.srt).unwrap();
        assert!(verdict.resident);
        assert_eq!(verdict.deciding_test, ResidencyTest::AutomaticUk);

        let below = assess_uk_residency(&input(182, ties(0), false), &policy.uk.srt).unwrap();
        assert_ne!(below.deciding_test, ResidencyTest::AutomaticUk);
    }

    /// RU-004: leaver banding, 91-120 days needs two ties.
    #[test]
    fn test_leaver_band_91_to_120_needs_two_ties() {
        let policy = policy_2024_25();
        let enough = assess_uk_residency(&input(100, ties(2), true), &policy.uk.srt).unwrap();
        assert!(enough.resident);
        assert_eq!(enough.deciding_test, ResidencyTest::SufficientTies);
        assert_eq!(enough.tie_count, Some(2));

        let short = assess_uk_residency(&input(100, ties(1), true), &policy.uk.srt).unwrap();
        assert!(!short.resident);
    }

    /// RU-005: the same day count needs more ties for an arriver.
    #[test]
    fn test_arriver_needs_more_ties_than_leaver() {
        let policy = policy_2024_25();
        let verdict = assess_uk_residency(&input(100, ties(2), false), &policy.uk.srt).unwrap();
        assert!(!verdict.resident);

        let with_three = assess_uk_residency(&input(100, ties(3), false), &policy.uk.srt).unwrap();
        assert!(with_three.resident);
    }

    /// RU-006: the country tie is ignored for arrivers.
    #[test]
    fn test_country_tie_counts_for_leavers_only() {
        let policy = policy_2024_25();
        let country_ties = UkTies {
            family: true,
            accommodation: false,
            work: false,
            ninety_day: false,
            country: true,
        };

        // Leaver at 121-182 days needs one tie; country alone would do.
        let leaver = assess_uk_residency(&input(150, country_ties, true), &policy.uk.srt).unwrap();
        assert_eq!(leaver.tie_count, Some(2));
        assert!(leaver.resident);

        // Arriver at 121-182 days needs two; country is not counted.
        let arriver =
            assess_uk_residency(&input(150, country_ties, false), &policy.uk.srt).unwrap();
        assert_eq!(arriver.tie_count, Some(1));
        assert!(!arriver.resident);
    }

    /// RU-007: below the lowest band, ties cannot establish residence.
    #[test]
    fn test_days_below_lowest_band_is_non_resident() {
        let policy = policy_2024_25();
        let verdict = assess_uk_residency(&input(15, ties(4), true), &policy.uk.srt).unwrap();
        assert!(!verdict.resident);
        assert_eq!(verdict.deciding_test, ResidencyTest::SufficientTies);
    }

    #[test]
    fn test_impossible_day_count_rejected() {
        let policy = policy_2024_25();
        let result = assess_uk_residency(&input(400, ties(0), true), &policy.uk.srt);
        assert!(matches!(result, Err(TaxError::Validation { .. })));
    }

    #[test]
    fn test_malformed_tax_year_rejected() {
        let policy = policy_2024_25();
        let mut bad = input(100, ties(2), true);
        bad.tax_year = "2024-25".to_string();
        let result = assess_uk_residency(&bad, &policy.uk.srt);
        assert!(matches!(result, Err(TaxError::Validation { .. })));
    }

    #[test]
    fn test_verdict_is_deterministic() {
        let policy = policy_2024_25();
        let a = assess_uk_residency(&input(100, ties(2), true), &policy.uk.srt).unwrap();
        let b = assess_uk_residency(&input(100, ties(2), true), &policy.uk.srt).unwrap();
        assert_eq!(a, b);
    }
}
