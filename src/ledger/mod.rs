//! The allowance ledger.
//!
//! The ledger is the only stateful component in the engine. Entries are
//! append-only; balances are derived by summing entries at read time.
//!
//! # Concurrency
//!
//! Reading a balance and later writing a contribution is a
//! read-validate-write sequence: two concurrent requests that both read
//! the same starting balance could both pass the cap check and together
//! breach the legal limit. [`AllowanceLedger::record_contribution`]
//! therefore holds one lock per (user, allowance kind) account and
//! re-validates against the freshest balance inside that lock before
//! appending. The account lock also covers the lifetime cap, which spans
//! tax years within one account. There is no cross-user contention, and
//! the engine never retries: the typed error lets the caller distinguish
//! a genuine cap breach from a stale read.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::config::{AllowanceContext, PolicyLoader};
use crate::error::{TaxError, TaxResult};
use crate::models::{AllowanceBalance, AllowanceKind, AllowanceLedgerEntry, CapKind, TaxYear};

/// One (user, allowance kind) account: the serialization boundary for
/// contributions.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct AccountKey {
    user_id: String,
    kind: AllowanceKind,
}

type Account = Arc<Mutex<Vec<AllowanceLedgerEntry>>>;

/// Effective-dated allowance ledger shared across concurrent requests.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
/// use tax_engine::config::{AllowanceContext, PolicyLoader};
/// use tax_engine::ledger::AllowanceLedger;
/// use tax_engine::models::AllowanceKind;
///
/// let policies = Arc::new(PolicyLoader::load("./config/policies").unwrap());
/// let ledger = AllowanceLedger::new(policies);
/// let balance = ledger
///     .record_contribution(
///         "user_001",
///         AllowanceKind::IsaSubscription,
///         "2024/25",
///         Decimal::from(5000),
///         NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
///         None,
///         &AllowanceContext::default(),
///     )
///     .unwrap();
/// assert_eq!(balance.remaining, Decimal::from(15000));
/// ```
#[derive(Debug)]
pub struct AllowanceLedger {
    policies: Arc<PolicyLoader>,
    accounts: RwLock<HashMap<AccountKey, Account>>,
}

impl AllowanceLedger {
    /// Creates an empty ledger resolving limits from the given policies.
    pub fn new(policies: Arc<PolicyLoader>) -> Self {
        AllowanceLedger {
            policies,
            accounts: RwLock::new(HashMap::new()),
        }
    }

    /// The derived balance for a (user, kind, tax year) key.
    ///
    /// Limits that depend on context (the pension taper, the age-tiered
    /// interest exemption) resolve from `ctx`; without context the
    /// untapered / under-age figure is used.
    pub fn balance(
        &self,
        user_id: &str,
        kind: AllowanceKind,
        tax_year: &str,
        ctx: &AllowanceContext,
    ) -> TaxResult<AllowanceBalance> {
        TaxYear::parse(kind.jurisdiction(), tax_year)?;
        let policy = self.policies.for_label(tax_year)?;
        let limit = policy.allowance_limit(kind, ctx);

        let used = match self.existing_account(user_id, kind) {
            Some(account) => {
                let entries = account.lock().expect("ledger account lock poisoned");
                year_total(&entries, tax_year)
            }
            None => Decimal::ZERO,
        };
        Ok(AllowanceBalance::from_usage(kind, tax_year, limit, used))
    }

    /// Records a contribution, re-validating under the account lock.
    ///
    /// The contribution is rejected, never clamped and never partially
    /// applied, if it would push usage above the annual limit or (for
    /// kinds with one) the lifetime cap. On success the freshly derived
    /// balance is returned.
    #[allow(clippy::too_many_arguments)]
    pub fn record_contribution(
        &self,
        user_id: &str,
        kind: AllowanceKind,
        tax_year: &str,
        amount: Decimal,
        entry_date: NaiveDate,
        note: Option<String>,
        ctx: &AllowanceContext,
    ) -> TaxResult<AllowanceBalance> {
        if !kind.is_contributable() {
            return Err(TaxError::Validation {
                field: "kind".to_string(),
                message: format!("{kind} is a read-only cap consumed by its calculator"),
            });
        }
        TaxYear::parse(kind.jurisdiction(), tax_year)?;

        let entry = AllowanceLedgerEntry {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            kind,
            tax_year: tax_year.to_string(),
            amount,
            entry_date,
            note,
        };
        entry.validate()?;

        let policy = self.policies.for_label(tax_year)?;
        let annual_limit = policy.allowance_limit(kind, ctx);
        let lifetime_limit = policy.lifetime_limit(kind);

        let account = self.account(user_id, kind);
        let mut entries = account.lock().expect("ledger account lock poisoned");

        // Re-read under the lock: the balance checked here is the
        // freshest one, not whatever the caller saw earlier.
        let used = year_total(&entries, tax_year);
        if used + amount > annual_limit {
            let remaining = (annual_limit - used).max(Decimal::ZERO);
            return Err(TaxError::AllowanceExceeded {
                kind,
                cap: CapKind::Annual,
                requested: amount,
                remaining,
                shortfall: amount - remaining,
            });
        }

        if let Some(lifetime_limit) = lifetime_limit {
            let lifetime_used: Decimal = entries.iter().map(|e| e.amount).sum();
            if lifetime_used + amount > lifetime_limit {
                let remaining = (lifetime_limit - lifetime_used).max(Decimal::ZERO);
                return Err(TaxError::AllowanceExceeded {
                    kind,
                    cap: CapKind::Lifetime,
                    requested: amount,
                    remaining,
                    shortfall: amount - remaining,
                });
            }
        }

        tracing::debug!(
            user = user_id,
            %kind,
            tax_year,
            %amount,
            "contribution recorded"
        );
        entries.push(entry);
        let used = year_total(&entries, tax_year);
        Ok(AllowanceBalance::from_usage(
            kind,
            tax_year,
            annual_limit,
            used,
        ))
    }

    /// All entries for a (user, kind, tax year) key, in entry order.
    pub fn entries(
        &self,
        user_id: &str,
        kind: AllowanceKind,
        tax_year: &str,
    ) -> Vec<AllowanceLedgerEntry> {
        match self.existing_account(user_id, kind) {
            Some(account) => {
                let entries = account.lock().expect("ledger account lock poisoned");
                entries
                    .iter()
                    .filter(|entry| entry.tax_year == tax_year)
                    .cloned()
                    .collect()
            }
            None => vec![],
        }
    }

    /// Total contributions across all tax years for a (user, kind) pair.
    pub fn lifetime_used(&self, user_id: &str, kind: AllowanceKind) -> Decimal {
        match self.existing_account(user_id, kind) {
            Some(account) => {
                let entries = account.lock().expect("ledger account lock poisoned");
                entries.iter().map(|entry| entry.amount).sum()
            }
            None => Decimal::ZERO,
        }
    }

    fn existing_account(&self, user_id: &str, kind: AllowanceKind) -> Option<Account> {
        let accounts = self.accounts.read().expect("ledger map lock poisoned");
        accounts
            .get(&AccountKey {
                user_id: user_id.to_string(),
                kind,
            })
            .cloned()
    }

    fn account(&self, user_id: &str, kind: AllowanceKind) -> Account {
        if let Some(account) = self.existing_account(user_id, kind) {
            return account;
        }
        let mut accounts = self.accounts.write().expect("ledger map lock poisoned");
        accounts
            .entry(AccountKey {
                user_id: user_id.to_string(),
                kind,
            })
            .or_default()
            .clone()
    }
}

fn year_total(entries: &[AllowanceLedgerEntry], tax_year: &str) -> Decimal {
    entries
        .iter()
        .filter(|entry| entry.tax_year == tax_year)
        .map(|entry| entry.amount)
        .sum()
}
