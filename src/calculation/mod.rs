//! Calculation logic for the tax engine.
//!
//! This module contains the rule functions: the UK statutory residence
//! test, the SA physical presence test, deemed-domicile evaluation,
//! gift taper relief, and the eight liability calculators (estate,
//! capital gains, dividend and savings interest for each jurisdiction).
//! Every function is pure: identical inputs give bit-identical results,
//! with no clock or randomness inside any calculator.

mod cgt_sa;
mod cgt_uk;
mod dividend_sa;
mod dividend_uk;
mod domicile;
mod estate_duty_sa;
mod inheritance_uk;
mod interest_sa;
mod interest_uk;
mod residency_sa;
mod residency_uk;
mod taper_relief;

pub use cgt_sa::{SaGainsInput, calculate_sa_cgt};
pub use cgt_uk::{UkGainsInput, calculate_uk_cgt};
pub use dividend_sa::{SaDividendInput, calculate_sa_dividend_withholding};
pub use dividend_uk::{UkDividendInput, calculate_uk_dividend_tax};
pub use domicile::{
    DomicileAssessment, ResidencyYear, evaluate_domicile, validate_remittance_election,
};
pub use estate_duty_sa::{SaEstateInput, calculate_sa_estate_duty};
pub use inheritance_uk::{UkEstateInput, calculate_uk_inheritance_tax};
pub use interest_sa::{SaInterestInput, calculate_sa_interest_tax};
pub use interest_uk::{UkInterestInput, calculate_uk_savings_tax};
pub use residency_sa::{PARTIAL_HISTORY_WARNING, SaResidencyInput, assess_sa_residency};
pub use residency_uk::{UkResidencyInput, assess_uk_residency};
pub use taper_relief::{TaperStatus, taper_relief_fraction, taper_status};
