//! Effective-dated domicile records.
//!
//! Domicile status follows the "current record" pattern: an append-only
//! sequence of effective-dated records in which at most one record per
//! user is open (`effective_to` unset). Superseding a status closes the
//! old record at the new record's `effective_from`; nothing is ever
//! updated in place.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{TaxError, TaxResult};

/// A domicile status for tax purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domicile {
    /// Domiciled in the UK.
    UkDomiciled,
    /// Domiciled outside the UK.
    NonUkDomiciled,
    /// Deemed UK-domiciled after the threshold number of resident years,
    /// overriding an elected foreign domicile.
    DeemedUkDomiciled,
}

impl Domicile {
    /// Returns true for statuses treated as UK-domiciled for tax.
    pub fn is_uk_for_tax(&self) -> bool {
        matches!(self, Domicile::UkDomiciled | Domicile::DeemedUkDomiciled)
    }
}

/// One effective-dated domicile record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomicileRecord {
    /// Unique identifier for the record.
    pub id: Uuid,
    /// The user the record belongs to.
    pub user_id: String,
    /// The domicile status in force over the record's date range.
    pub status: Domicile,
    /// When deemed domicile began, if the status is deemed.
    pub deemed_from: Option<NaiveDate>,
    /// First day the record is in force.
    pub effective_from: NaiveDate,
    /// Day the record was superseded; unset for the current record.
    pub effective_to: Option<NaiveDate>,
}

impl DomicileRecord {
    /// Validates the record's internal consistency.
    ///
    /// `effective_to`, when present, must be strictly after
    /// `effective_from`; a deemed status must carry its start date.
    pub fn validate(&self) -> TaxResult<()> {
        if let Some(effective_to) = self.effective_to {
            if effective_to <= self.effective_from {
                return Err(TaxError::InvariantViolation {
                    message: format!(
                        "effective_to {} does not follow effective_from {}",
                        effective_to, self.effective_from
                    ),
                });
            }
        }
        if self.status == Domicile::DeemedUkDomiciled && self.deemed_from.is_none() {
            return Err(TaxError::Validation {
                field: "deemed_from".to_string(),
                message: "deemed domicile requires a start date".to_string(),
            });
        }
        Ok(())
    }

    /// Returns true if this is the open (current) record.
    pub fn is_current(&self) -> bool {
        self.effective_to.is_none()
    }
}

/// An append-only sequence of domicile records for one user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomicileHistory {
    records: Vec<DomicileRecord>,
}

impl DomicileHistory {
    /// Creates an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a history from stored records, validating each record and
    /// the at-most-one-open-record invariant.
    pub fn from_records(records: Vec<DomicileRecord>) -> TaxResult<Self> {
        for record in &records {
            record.validate()?;
        }
        let open = records.iter().filter(|r| r.is_current()).count();
        if open > 1 {
            return Err(TaxError::InvariantViolation {
                message: format!("{open} domicile records are open; at most one is allowed"),
            });
        }
        Ok(Self { records })
    }

    /// The record currently in force, if any.
    pub fn current(&self) -> Option<&DomicileRecord> {
        self.records.iter().find(|r| r.is_current())
    }

    /// All records, oldest first.
    pub fn records(&self) -> &[DomicileRecord] {
        &self.records
    }

    /// Supersedes the current record with a new open record.
    ///
    /// The old record is closed at the new record's `effective_from` and
    /// the new record is appended, mirroring an insert-new-plus-close-old
    /// transaction in the storage layer.
    pub fn supersede(&mut self, new: DomicileRecord) -> TaxResult<()> {
        new.validate()?;
        if !new.is_current() {
            return Err(TaxError::Validation {
                field: "effective_to".to_string(),
                message: "a superseding record must be open".to_string(),
            });
        }
        if let Some(open) = self.records.iter_mut().find(|r| r.is_current()) {
            if new.effective_from <= open.effective_from {
                return Err(TaxError::InvariantViolation {
                    message: format!(
                        "superseding record effective {} does not follow the current record \
                         effective {}",
                        new.effective_from, open.effective_from
                    ),
                });
            }
            open.effective_to = Some(new.effective_from);
        }
        tracing::debug!(
            user = %new.user_id,
            status = ?new.status,
            effective_from = %new.effective_from,
            "domicile record superseded"
        );
        self.records.push(new);
        Ok(())
    }
}
