//! Gift taper relief.
//!
//! Taper relief reduces the tax otherwise due on a potentially-exempt
//! transfer when the giver dies within the seven-year period. The relief
//! fraction is banded by whole years survived, measured on anniversary
//! dates so that "exactly seven years" is fully exempt and "one day
//! short" still sits in the final band.

use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::{TaxError, TaxResult};
use crate::models::{GiftKind, GiftRecord, RELIEF_PERIOD_YEARS};

/// Days per year used for the fractional years-elapsed figure.
/// Reporting only; banding is decided on anniversary dates.
const DAYS_PER_YEAR_CENTI: i64 = 36525;

/// The derived taper position of one gift.
#[derive(Debug, Clone, PartialEq)]
pub struct TaperStatus {
    /// The gift the status describes.
    pub gift_id: Uuid,
    /// The gift's classification.
    pub kind: GiftKind,
    /// Fractional years since the gift date.
    pub years_elapsed: Decimal,
    /// Whole anniversary years since the gift date, capped at seven.
    pub full_years_elapsed: u32,
    /// The taper relief fraction (0 to 1) applicable on death now.
    pub relief_fraction: Decimal,
    /// Whether the gift is still inside the seven-year relief period.
    pub in_relief_period: bool,
    /// When the gift becomes fully exempt (potentially-exempt only).
    pub becomes_exempt: Option<NaiveDate>,
    /// Fractional years until the gift is fully exempt.
    pub years_remaining: Decimal,
}

/// The taper relief fraction for a number of whole years survived.
///
/// # Example
///
/// ```
/// use tax_engine::calculation::taper_relief_fraction;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// assert_eq!(taper_relief_fraction(3), Decimal::from_str("0.20").unwrap());
/// assert_eq!(taper_relief_fraction(7), Decimal::ONE);
/// ```
pub fn taper_relief_fraction(full_years: u32) -> Decimal {
    match full_years {
        0..=2 => Decimal::ZERO,
        3 => Decimal::new(20, 2),
        4 => Decimal::new(40, 2),
        5 => Decimal::new(60, 2),
        6 => Decimal::new(80, 2),
        _ => Decimal::ONE,
    }
}

/// Derives the taper position of a gift as of a given date.
///
/// Exempt gifts always report full relief and are never in period;
/// chargeable transfers report no relief regardless of elapsed time,
/// since taper only reduces tax arising on death, not the immediate
/// chargeable status.
///
/// # Errors
///
/// - `NotFound` if the gift is soft-deleted
/// - `Validation` if the gift is dated after `as_of` or fails its own
///   validation
pub fn taper_status(gift: &GiftRecord, as_of: NaiveDate) -> TaxResult<TaperStatus> {
    if gift.deleted {
        return Err(TaxError::NotFound {
            entity: "gift".to_string(),
            id: gift.id.to_string(),
        });
    }
    gift.validate()?;
    if as_of < gift.date {
        return Err(TaxError::Validation {
            field: "date".to_string(),
            message: format!("gift is dated {} which is after {}", gift.date, as_of),
        });
    }

    let full_years_elapsed = full_years_between(gift.date, as_of);
    let days_elapsed = (as_of - gift.date).num_days();
    let years_elapsed =
        Decimal::from(days_elapsed) * Decimal::from(100) / Decimal::from(DAYS_PER_YEAR_CENTI);

    let (relief_fraction, in_relief_period, years_remaining) = match gift.kind {
        GiftKind::PotentiallyExempt => {
            let in_period = full_years_elapsed < RELIEF_PERIOD_YEARS;
            let remaining = if in_period {
                (Decimal::from(RELIEF_PERIOD_YEARS) - years_elapsed).max(Decimal::ZERO)
            } else {
                Decimal::ZERO
            };
            (
                taper_relief_fraction(full_years_elapsed),
                in_period,
                remaining,
            )
        }
        // Already exempt from the outset.
        GiftKind::Exempt => (Decimal::ONE, false, Decimal::ZERO),
        // Never becomes exempt; taper does not apply.
        GiftKind::Chargeable => (Decimal::ZERO, false, Decimal::ZERO),
    };

    Ok(TaperStatus {
        gift_id: gift.id,
        kind: gift.kind,
        years_elapsed,
        full_years_elapsed,
        relief_fraction,
        in_relief_period,
        becomes_exempt: gift.becomes_exempt(),
        years_remaining,
    })
}

/// Whole anniversary years from `from` to `to`, capped at the relief
/// period. Anniversaries are computed with calendar-month arithmetic so
/// a 29 February date clamps to 28 February in ordinary years.
fn full_years_between(from: NaiveDate, to: NaiveDate) -> u32 {
    let mut years = 0u32;
    while years < RELIEF_PERIOD_YEARS {
        let anniversary = from.checked_add_months(Months::new(12 * (years + 1)));
        match anniversary {
            Some(date) if date <= to => years += 1,
            _ => break,
        }
    }
    years
}
