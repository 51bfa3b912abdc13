//! Versioned policy tables for the tax engine.
//!
//! Rates, thresholds and allowance limits change every tax year, so they
//! are never hard-coded: each tax year has one YAML policy file carrying
//! every parameter for both jurisdictions, loaded once and threaded
//! explicitly through every calculator call.
//!
//! # Example
//!
//! ```no_run
//! use tax_engine::config::PolicyLoader;
//!
//! let loader = PolicyLoader::load("./config/policies").unwrap();
//! let policy = loader.for_label("2024/25").unwrap();
//! assert_eq!(policy.uk.srt.automatic_resident_days, 183);
//! ```

mod loader;
mod types;

pub use loader::PolicyLoader;
pub use types::{
    AllowanceContext, BandedAllowances, BandedRates, DeemedDomicilePolicy, EstateDutyPolicy,
    InheritancePolicy, InterestExemptionPolicy, IsaPolicy, PensionTaperPolicy, PresencePolicy,
    SaCgtPolicy, SaPolicy, SavingsPolicy, SrtPolicy, TaxYearPolicy, TfsaPolicy, TieBand,
    UkCgtPolicy, UkDividendPolicy, UkPolicy,
};
