//! Error types for the tax engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all rejection paths in the engine. Every message carries the
//! specific numeric shortfall or threshold that was breached rather than a
//! generic failure.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::{AllowanceKind, CapKind};

/// The main error type for the tax engine.
///
/// All operations in the engine return this error type, making it easy
/// to handle errors consistently throughout the application.
///
/// # Example
///
/// ```
/// use tax_engine::error::TaxError;
///
/// let error = TaxError::Validation {
///     field: "amount".to_string(),
///     message: "must be positive".to_string(),
/// };
/// assert_eq!(error.to_string(), "invalid amount: must be positive");
/// ```
#[derive(Debug, Error)]
pub enum TaxError {
    /// Malformed or out-of-range input.
    #[error("invalid {field}: {message}")]
    Validation {
        /// The input field that failed validation.
        field: String,
        /// What made the value invalid, including the offending value.
        message: String,
    },

    /// A contribution would breach an annual or lifetime cap.
    ///
    /// The message names the cap breached and the exact excess over the
    /// remaining headroom, so callers can distinguish a genuine breach
    /// from a stale-read race and retry with a corrected amount.
    #[error(
        "contribution of {requested} would breach the {cap} cap for {kind}: \
         over by {shortfall} ({remaining} remaining)"
    )]
    AllowanceExceeded {
        /// The allowance the contribution was recorded against.
        kind: AllowanceKind,
        /// Which cap was breached (annual or lifetime).
        cap: CapKind,
        /// The contribution amount that was rejected.
        requested: Decimal,
        /// The headroom that was still available under the cap.
        remaining: Decimal,
        /// How far the contribution overshot the remaining headroom.
        shortfall: Decimal,
    },

    /// An identifier resolved to nothing.
    ///
    /// Ownership and existence failures belong to the external storage
    /// collaborator; this core raises them only when it is handed an
    /// identifier that resolves to nothing (e.g. a soft-deleted gift).
    #[error("{entity} not found: {id}")]
    NotFound {
        /// The kind of record that was looked up.
        entity: String,
        /// The identifier that failed to resolve.
        id: String,
    },

    /// The caller does not own the record it addressed.
    #[error("permission denied for {entity} {id}")]
    Permission {
        /// The kind of record that was addressed.
        entity: String,
        /// The identifier of the record.
        id: String,
    },

    /// A structural invariant on stored records was violated.
    #[error("invariant violated: {message}")]
    InvariantViolation {
        /// A description of the violated invariant, with the actual values.
        message: String,
    },

    /// Policy configuration file or directory was not found.
    #[error("policy configuration not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Policy configuration file could not be parsed.
    #[error("failed to parse policy file '{path}': {message}")]
    ConfigParse {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },
}

/// A type alias for Results that return [`TaxError`].
pub type TaxResult<T> = Result<T, TaxError>;
