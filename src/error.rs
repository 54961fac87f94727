//! Error types for the workforce compliance engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every failure the engine can surface. Data absence (no active policy,
//! no employees in scope) is never an error: it flows through results as
//! `None` targets or zero-valued aggregates.

use thiserror::Error;

/// The main error type for the workforce compliance engine.
///
/// # Example
///
/// ```
/// use workforce_compliance::error::EngineError;
///
/// let error = EngineError::MissingScope {
///     field: "company".to_string(),
/// };
/// assert_eq!(error.to_string(), "company is required");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// A configuration or dataset file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// A configuration or dataset file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A required scope field was not supplied.
    #[error("{field} is required")]
    MissingScope {
        /// The name of the missing field (e.g. `company`).
        field: String,
    },

    /// A query parameter was outside its accepted range.
    #[error("Invalid parameter '{name}': {message}")]
    InvalidParameter {
        /// The parameter name.
        name: String,
        /// Why the value was rejected.
        message: String,
    },

    /// The requested company does not exist in the store.
    #[error("Company not found: {company}")]
    CompanyNotFound {
        /// The company identifier that was not found.
        company: String,
    },

    /// The record store failed to answer a read for a company.
    #[error("Store read failed for company '{company}': {message}")]
    StoreError {
        /// The company whose records could not be read.
        company: String,
        /// A description of the failure.
        message: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

/// Returns the trimmed value of a required scope field.
///
/// Blank strings are treated the same as a missing value.
pub fn require_scope(field: &str, value: Option<&str>) -> EngineResult<String> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(EngineError::MissingScope {
            field: field.to_string(),
        }),
    }
}
