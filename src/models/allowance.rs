//! Allowance types, ledger entries and derived balances.
//!
//! Ledger entries are append-only; an [`AllowanceBalance`] is always
//! derived by summing entries for a (user, kind, tax year) key and is
//! never stored mutably.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{TaxError, TaxResult};

use super::Jurisdiction;

/// A statutory allowance tracked by the ledger.
///
/// The first three kinds accept contributions; the rest are per-tax-year
/// caps consumed by the relevant liability calculator and are read-only
/// from the ledger's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllowanceKind {
    /// UK ISA subscriptions: fixed annual limit, no carry-forward,
    /// no lifetime cap.
    IsaSubscription,
    /// SA tax-free savings account contributions: annual limit and a
    /// separate lifetime cap.
    TfsaContribution,
    /// UK pension contributions: annual allowance with a graduated
    /// income taper.
    PensionContribution,
    /// UK dividend allowance, consumed by the dividend calculator.
    DividendAllowance,
    /// UK capital gains annual exempt amount, consumed by the CGT
    /// calculator.
    CgtExemptAmount,
    /// UK starting rate band for savings, consumed by the savings
    /// interest calculator.
    SavingsStartingRate,
    /// SA age-tiered interest exemption, consumed by the interest
    /// calculator.
    InterestExemption,
}

impl AllowanceKind {
    /// The jurisdiction whose policy defines this allowance.
    pub fn jurisdiction(&self) -> Jurisdiction {
        match self {
            AllowanceKind::IsaSubscription
            | AllowanceKind::PensionContribution
            | AllowanceKind::DividendAllowance
            | AllowanceKind::CgtExemptAmount
            | AllowanceKind::SavingsStartingRate => Jurisdiction::Uk,
            AllowanceKind::TfsaContribution | AllowanceKind::InterestExemption => Jurisdiction::Sa,
        }
    }

    /// Whether the ledger accepts contributions against this kind.
    pub fn is_contributable(&self) -> bool {
        matches!(
            self,
            AllowanceKind::IsaSubscription
                | AllowanceKind::TfsaContribution
                | AllowanceKind::PensionContribution
        )
    }

    /// Whether a lifetime cap applies in addition to the annual limit.
    pub fn has_lifetime_cap(&self) -> bool {
        matches!(self, AllowanceKind::TfsaContribution)
    }

    /// Stable snake_case name, matching the serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            AllowanceKind::IsaSubscription => "isa_subscription",
            AllowanceKind::TfsaContribution => "tfsa_contribution",
            AllowanceKind::PensionContribution => "pension_contribution",
            AllowanceKind::DividendAllowance => "dividend_allowance",
            AllowanceKind::CgtExemptAmount => "cgt_exempt_amount",
            AllowanceKind::SavingsStartingRate => "savings_starting_rate",
            AllowanceKind::InterestExemption => "interest_exemption",
        }
    }
}

impl std::fmt::Display for AllowanceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which cap a contribution breached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapKind {
    /// The per-tax-year limit.
    Annual,
    /// The whole-of-life limit.
    Lifetime,
}

impl std::fmt::Display for CapKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CapKind::Annual => write!(f, "annual"),
            CapKind::Lifetime => write!(f, "lifetime"),
        }
    }
}

/// One append-only ledger entry recording a contribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllowanceLedgerEntry {
    /// Unique identifier for the entry.
    pub id: Uuid,
    /// The user the entry belongs to.
    pub user_id: String,
    /// The allowance the contribution counts against.
    pub kind: AllowanceKind,
    /// Tax year label (`YYYY/YY`) the contribution falls in.
    pub tax_year: String,
    /// Contribution amount; always positive.
    pub amount: Decimal,
    /// The date the contribution was made.
    pub entry_date: NaiveDate,
    /// Optional free-text note.
    #[serde(default)]
    pub note: Option<String>,
}

impl AllowanceLedgerEntry {
    /// Validates the entry before it is appended.
    pub fn validate(&self) -> TaxResult<()> {
        if self.amount <= Decimal::ZERO {
            return Err(TaxError::Validation {
                field: "amount".to_string(),
                message: format!("contribution must be positive, got {}", self.amount),
            });
        }
        Ok(())
    }
}

/// A derived balance for one (user, allowance, tax year) key.
///
/// Computed by summing entries at read time; full precision is retained,
/// rounding happens only at the reporting boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllowanceBalance {
    /// The allowance the balance describes.
    pub kind: AllowanceKind,
    /// Tax year label the balance covers.
    pub tax_year: String,
    /// The limit in force for the tax year.
    pub limit: Decimal,
    /// Total of recorded usage.
    pub used: Decimal,
    /// Headroom left under the limit, floored at zero.
    pub remaining: Decimal,
    /// Percentage of the limit consumed (0 when the limit is zero).
    pub percentage_used: Decimal,
}

impl AllowanceBalance {
    /// Derives a balance from a limit and summed usage.
    pub fn from_usage(kind: AllowanceKind, tax_year: &str, limit: Decimal, used: Decimal) -> Self {
        let remaining = (limit - used).max(Decimal::ZERO);
        let percentage_used = if limit > Decimal::ZERO {
            used / limit * Decimal::from(100)
        } else {
            Decimal::ZERO
        };
        AllowanceBalance {
            kind,
            tax_year: tax_year.to_string(),
            limit,
            used,
            remaining,
            percentage_used,
        }
    }
}
