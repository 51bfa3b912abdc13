//! Deemed-domicile evaluation and remittance basis validation.

use chrono::NaiveDate;

use crate::config::DeemedDomicilePolicy;
use crate::error::{TaxError, TaxResult};
use crate::models::{Domicile, Jurisdiction, ResidencyVerdict, TaxYear};

/// One year of UK residency history fed to the evaluator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResidencyYear {
    /// Tax year label (`YYYY/YY`).
    pub tax_year: String,
    /// Whether the individual was UK-resident that year.
    pub resident: bool,
}

impl From<&ResidencyVerdict> for ResidencyYear {
    fn from(verdict: &ResidencyVerdict) -> Self {
        ResidencyYear {
            tax_year: verdict.tax_year.clone(),
            resident: verdict.resident,
        }
    }
}

/// The outcome of a domicile evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomicileAssessment {
    /// The status in force after applying the deemed-domicile rule.
    pub status: Domicile,
    /// Start of the tax year in which deemed domicile was reached.
    pub deemed_from: Option<NaiveDate>,
    /// Resident years counted within the lookback window.
    pub qualifying_years: u32,
}

/// Evaluates domicile from an elected status and residency history.
///
/// A non-UK-domiciled individual becomes deemed UK-domiciled once they
/// were resident in at least the required number of the last
/// `lookback_years` tax years; the deemed status starts with the tax
/// year in which the qualifying year count was reached. An elected UK
/// domicile passes through unchanged.
///
/// # Arguments
///
/// * `elected` - The individual's elected domicile; must not itself be
///   the deemed status
/// * `history` - UK residency history, oldest year first
/// * `policy` - Lookback and threshold parameters
pub fn evaluate_domicile(
    elected: Domicile,
    history: &[ResidencyYear],
    policy: &DeemedDomicilePolicy,
) -> TaxResult<DomicileAssessment> {
    if elected == Domicile::DeemedUkDomiciled {
        return Err(TaxError::Validation {
            field: "elected".to_string(),
            message: "deemed domicile is imposed by the residency rule, not elected".to_string(),
        });
    }
    for year in history {
        TaxYear::parse(Jurisdiction::Uk, &year.tax_year)?;
    }

    let window_start = history.len().saturating_sub(policy.lookback_years as usize);
    let window = &history[window_start..];

    let mut qualifying_years = 0u32;
    let mut reached_in: Option<&str> = None;
    for year in window {
        if year.resident {
            qualifying_years += 1;
            if qualifying_years == policy.resident_years_required {
                reached_in = Some(&year.tax_year);
            }
        }
    }

    if elected == Domicile::UkDomiciled {
        return Ok(DomicileAssessment {
            status: Domicile::UkDomiciled,
            deemed_from: None,
            qualifying_years,
        });
    }

    match reached_in {
        Some(label) => {
            let deemed_from = TaxYear::parse(Jurisdiction::Uk, label)?.start;
            tracing::debug!(%label, qualifying_years, "deemed domicile reached");
            Ok(DomicileAssessment {
                status: Domicile::DeemedUkDomiciled,
                deemed_from: Some(deemed_from),
                qualifying_years,
            })
        }
        None => Ok(DomicileAssessment {
            status: Domicile::NonUkDomiciled,
            deemed_from: None,
            qualifying_years,
        }),
    }
}

/// Validates a remittance basis election against a domicile status.
///
/// The election is only open to the non-UK-domiciled; electing while
/// UK-domiciled or deemed UK-domiciled is rejected, never ignored.
pub fn validate_remittance_election(status: Domicile) -> TaxResult<()> {
    match status {
        Domicile::NonUkDomiciled => Ok(()),
        Domicile::UkDomiciled | Domicile::DeemedUkDomiciled => Err(TaxError::Validation {
            field: "remittance_basis".to_string(),
            message: format!(
                "the remittance basis cannot be elected with domicile status {status:?}"
            ),
        }),
    }
}
