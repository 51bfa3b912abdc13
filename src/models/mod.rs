//! Core data models for the tax engine.
//!
//! This module contains all the domain value types used throughout the
//! engine: tax years, residency verdicts, domicile records, allowance
//! entries and balances, gift records and liability results.

mod allowance;
mod domicile;
mod estate;
mod gift;
mod liability;
mod residency;
mod tax_year;

pub use allowance::{AllowanceBalance, AllowanceKind, AllowanceLedgerEntry, CapKind};
pub use domicile::{Domicile, DomicileHistory, DomicileRecord};
pub use estate::{BeneficiaryShare, validate_beneficiary_shares};
pub use gift::{ExemptionKind, GiftKind, GiftRecord, RELIEF_PERIOD_YEARS};
pub use liability::{
    BandLine, LiabilityResult, ReliefKind, ReliefLine, TaxBand, TaxCharge, round_money,
};
pub use residency::{ResidencyTest, ResidencyVerdict, UkTies, VerdictWarning};
pub use tax_year::{Jurisdiction, TaxYear};
