//! Policy loading functionality.
//!
//! This module provides the [`PolicyLoader`] type for loading versioned
//! tax policy tables from YAML files.

use std::fs;
use std::path::Path;

use chrono::NaiveDate;

use crate::error::{TaxError, TaxResult};
use crate::models::{Jurisdiction, TaxYear};

use super::types::TaxYearPolicy;

/// Loads and resolves per-tax-year policy tables.
///
/// # Directory Structure
///
/// The policy directory holds one YAML file per tax year:
/// ```text
/// config/policies/
/// ├── 2023-24.yaml
/// └── 2024-25.yaml
/// ```
/// The file name is informational; the authoritative label is the
/// `label` field inside each file.
///
/// # Example
///
/// ```no_run
/// use tax_engine::config::PolicyLoader;
/// use tax_engine::models::Jurisdiction;
/// use chrono::NaiveDate;
///
/// let loader = PolicyLoader::load("./config/policies").unwrap();
/// let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
/// let policy = loader.for_date(Jurisdiction::Uk, date).unwrap();
/// assert_eq!(policy.label, "2024/25");
/// ```
#[derive(Debug, Clone)]
pub struct PolicyLoader {
    policies: Vec<TaxYearPolicy>,
}

impl PolicyLoader {
    /// Loads every `*.yaml` policy file from the given directory.
    ///
    /// # Returns
    ///
    /// Returns a `PolicyLoader` on success, or an error if:
    /// - the directory is missing or holds no policy files
    ///   (`ConfigNotFound`)
    /// - any file contains invalid YAML (`ConfigParse`)
    /// - two files carry the same tax year label
    ///   (`InvariantViolation`)
    pub fn load<P: AsRef<Path>>(dir: P) -> TaxResult<Self> {
        let dir = dir.as_ref();
        let dir_str = dir.display().to_string();

        if !dir.exists() {
            return Err(TaxError::ConfigNotFound { path: dir_str });
        }

        let entries = fs::read_dir(dir).map_err(|_| TaxError::ConfigNotFound {
            path: dir_str.clone(),
        })?;

        let mut policies = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|_| TaxError::ConfigNotFound {
                path: dir_str.clone(),
            })?;
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "yaml") {
                policies.push(Self::load_yaml(&path)?);
            }
        }

        if policies.is_empty() {
            return Err(TaxError::ConfigNotFound { path: dir_str });
        }

        Self::from_policies(policies)
    }

    /// Builds a loader from already-constructed policies.
    ///
    /// Used by callers that source policy data somewhere other than the
    /// YAML directory (e.g. a database). Labels must be unique.
    pub fn from_policies(mut policies: Vec<TaxYearPolicy>) -> TaxResult<Self> {
        policies.sort_by(|a, b| a.label.cmp(&b.label));
        for window in policies.windows(2) {
            if window[0].label == window[1].label {
                return Err(TaxError::InvariantViolation {
                    message: format!("duplicate policy for tax year {}", window[0].label),
                });
            }
        }
        Ok(Self { policies })
    }

    fn load_yaml(path: &Path) -> TaxResult<TaxYearPolicy> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| TaxError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| TaxError::ConfigParse {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// The policy for a tax year label.
    pub fn for_label(&self, label: &str) -> TaxResult<&TaxYearPolicy> {
        self.policies
            .iter()
            .find(|policy| policy.label == label)
            .ok_or_else(|| TaxError::NotFound {
                entity: "tax year policy".to_string(),
                id: label.to_string(),
            })
    }

    /// The policy for the tax year containing `date` in `jurisdiction`.
    pub fn for_date(&self, jurisdiction: Jurisdiction, date: NaiveDate) -> TaxResult<&TaxYearPolicy> {
        let tax_year = TaxYear::containing(jurisdiction, date);
        self.for_label(&tax_year.label)
    }

    /// The labels of every loaded policy, oldest first.
    pub fn labels(&self) -> Vec<&str> {
        self.policies.iter().map(|p| p.label.as_str()).collect()
    }

    /// The most recent loaded policy.
    pub fn latest(&self) -> Option<&TaxYearPolicy> {
        self.policies.last()
    }
}
