//! Lifetime gift records.
//!
//! A gift's taper-relief position is always derived from its date and
//! type (see `calculation::taper_relief`); nothing derived is stored on
//! the record itself. Records are soft-deletable: the storage layer keeps
//! them, the engine refuses to derive from them.

use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{TaxError, TaxResult};

/// Number of years a potentially-exempt transfer takes to fall out of
/// the estate.
pub const RELIEF_PERIOD_YEARS: u32 = 7;

/// The estate-tax classification of a lifetime gift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GiftKind {
    /// Becomes fully exempt if the giver survives seven years.
    PotentiallyExempt,
    /// Exempt from the outset (spouse, charity, small gifts).
    Exempt,
    /// Immediately chargeable to lifetime tax (e.g. into certain trusts).
    Chargeable,
}

/// Why an exempt gift is exempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExemptionKind {
    /// Transfer to a spouse or civil partner.
    Spouse,
    /// Gift to a registered charity.
    Charity,
    /// Within the annual gifting exemption.
    AnnualExemption,
    /// Within the small-gift exemption.
    SmallGift,
}

/// A recorded lifetime gift.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GiftRecord {
    /// Unique identifier for the gift.
    pub id: Uuid,
    /// Who received the gift.
    pub recipient: String,
    /// The date the gift was made.
    pub date: NaiveDate,
    /// The value of the gift at the date it was made.
    pub value: Decimal,
    /// The estate-tax classification.
    pub kind: GiftKind,
    /// The exemption relied upon, for exempt gifts only.
    #[serde(default)]
    pub exemption: Option<ExemptionKind>,
    /// Soft-delete marker; deleted gifts are never derived from.
    #[serde(default)]
    pub deleted: bool,
}

impl GiftRecord {
    /// Validates the record's internal consistency.
    pub fn validate(&self) -> TaxResult<()> {
        if self.value < Decimal::ZERO {
            return Err(TaxError::Validation {
                field: "value".to_string(),
                message: format!("gift value must not be negative, got {}", self.value),
            });
        }
        if self.exemption.is_some() && self.kind != GiftKind::Exempt {
            return Err(TaxError::Validation {
                field: "exemption".to_string(),
                message: "an exemption subtype is only valid on an exempt gift".to_string(),
            });
        }
        Ok(())
    }

    /// The date a potentially-exempt transfer becomes fully exempt.
    ///
    /// `None` for exempt and chargeable gifts: the former is already
    /// exempt, the latter never becomes so.
    pub fn becomes_exempt(&self) -> Option<NaiveDate> {
        match self.kind {
            GiftKind::PotentiallyExempt => self
                .date
                .checked_add_months(Months::new(12 * RELIEF_PERIOD_YEARS)),
            GiftKind::Exempt | GiftKind::Chargeable => None,
        }
    }
}
