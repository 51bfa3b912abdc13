//! Tax year resolution for both jurisdictions.
//!
//! The two fiscal calendars differ: the UK tax year runs 6 April to
//! 5 April of the following year, while the South African tax year runs
//! 1 March to the last day of February. Both share the `YYYY/YY` label
//! format even though the underlying date ranges differ.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{TaxError, TaxResult};

/// A tax jurisdiction the engine computes for.
///
/// Every calculator matches this enum exhaustively, so adding a
/// jurisdiction is a compile-time-detected gap rather than a silent
/// fallthrough.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Jurisdiction {
    /// The United Kingdom.
    Uk,
    /// South Africa.
    Sa,
}

impl Jurisdiction {
    /// Returns the two-letter display code for the jurisdiction.
    pub fn code(&self) -> &'static str {
        match self {
            Jurisdiction::Uk => "UK",
            Jurisdiction::Sa => "SA",
        }
    }
}

impl std::fmt::Display for Jurisdiction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A single tax year in one jurisdiction.
///
/// Derived on demand from a reference date, never persisted. Exactly one
/// tax year contains any given date per jurisdiction.
///
/// # Example
///
/// ```
/// use tax_engine::models::{Jurisdiction, TaxYear};
/// use chrono::NaiveDate;
///
/// let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
/// let year = TaxYear::containing(Jurisdiction::Uk, date);
/// assert_eq!(year.label, "2024/25");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxYear {
    /// The jurisdiction whose fiscal calendar this year follows.
    pub jurisdiction: Jurisdiction,
    /// Display label in `YYYY/YY` form (e.g. "2024/25").
    pub label: String,
    /// First day of the tax year.
    pub start: NaiveDate,
    /// Last day of the tax year (inclusive).
    pub end: NaiveDate,
}

fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid calendar date")
}

fn label_for(start_year: i32) -> String {
    format!("{}/{:02}", start_year, (start_year + 1).rem_euclid(100))
}

impl TaxYear {
    /// Constructs the tax year that starts in the given calendar year.
    ///
    /// The SA year end is computed as the day before the next 1 March so
    /// that leap-year Februaries are handled without a hard-coded day.
    pub fn starting(jurisdiction: Jurisdiction, start_year: i32) -> Self {
        let (start, end) = match jurisdiction {
            Jurisdiction::Uk => (ymd(start_year, 4, 6), ymd(start_year + 1, 4, 5)),
            Jurisdiction::Sa => (
                ymd(start_year, 3, 1),
                ymd(start_year + 1, 3, 1)
                    .pred_opt()
                    .expect("1 March always has a predecessor"),
            ),
        };
        TaxYear {
            jurisdiction,
            label: label_for(start_year),
            start,
            end,
        }
    }

    /// Resolves the unique tax year containing `date`.
    pub fn containing(jurisdiction: Jurisdiction, date: NaiveDate) -> Self {
        let year = date.year();
        let boundary = match jurisdiction {
            Jurisdiction::Uk => ymd(year, 4, 6),
            Jurisdiction::Sa => ymd(year, 3, 1),
        };
        let start_year = if date >= boundary { year } else { year - 1 };
        Self::starting(jurisdiction, start_year)
    }

    /// Parses a `YYYY/YY` label into the corresponding tax year.
    ///
    /// The two-digit suffix must be the start year plus one, modulo 100
    /// (e.g. "2024/25", "1999/00"). Anything else is a validation error.
    pub fn parse(jurisdiction: Jurisdiction, label: &str) -> TaxResult<Self> {
        let invalid = || TaxError::Validation {
            field: "tax_year".to_string(),
            message: format!("'{label}' is not a valid YYYY/YY tax year label"),
        };

        let (lead, tail) = label.split_once('/').ok_or_else(invalid)?;
        if lead.len() != 4 || tail.len() != 2 {
            return Err(invalid());
        }
        let start_year: i32 = lead.parse().map_err(|_| invalid())?;
        let suffix: i32 = tail.parse().map_err(|_| invalid())?;
        if suffix != (start_year + 1).rem_euclid(100) {
            return Err(invalid());
        }
        Ok(Self::starting(jurisdiction, start_year))
    }

    /// The calendar year in which this tax year starts.
    pub fn start_year(&self) -> i32 {
        self.start.year()
    }

    /// The tax year immediately after this one.
    pub fn next(&self) -> Self {
        Self::starting(self.jurisdiction, self.start_year() + 1)
    }

    /// The tax year immediately before this one.
    pub fn previous(&self) -> Self {
        Self::starting(self.jurisdiction, self.start_year() - 1)
    }

    /// Returns true if `date` falls within this tax year (inclusive).
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

impl std::fmt::Display for TaxYear {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.jurisdiction, self.label)
    }
}
