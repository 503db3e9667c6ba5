//! Error types for the dataset pipeline.
//!
//! Filtering, bucketing and aggregation are total and have no error
//! type. Errors only arise while building inputs (criteria, threshold
//! tables), loading datasets, and applying admin actions.

use std::path::PathBuf;
use thiserror::Error;

/// Invalid filter criteria supplied by the caller.
#[derive(Debug, Error, PartialEq)]
pub enum CriteriaError {
    #[error("Invalid date '{0}': expected YYYY-MM-DD or an ISO timestamp")]
    InvalidDate(String),

    #[error("Invalid range '{0}': expected field=min..max")]
    InvalidRange(String),

    #[error("Invalid condition '{0}': expected field=value")]
    InvalidCondition(String),

    #[error("Range for '{field}' has min {min} greater than max {max}")]
    InvertedRange { field: String, min: f64, max: f64 },
}

/// Invalid risk threshold table.
#[derive(Debug, Error, PartialEq)]
pub enum ThresholdError {
    #[error("Threshold table must have at least one bound")]
    Empty,

    #[error("Threshold bound {0} is not a finite number")]
    NonFinite(f64),

    #[error("Threshold bounds must be strictly ascending ({previous} then {next})")]
    NotAscending { previous: f64, next: f64 },

    #[error("Threshold levels must not decrease in risk")]
    LevelsDecrease,

    #[error("Expected {expected} bounds, got {actual}")]
    WrongArity { expected: usize, actual: usize },
}

/// Failure applying or reconciling an admin action.
#[derive(Debug, Error, PartialEq)]
pub enum ActionError {
    #[error("Record not found: {0}")]
    RecordNotFound(String),

    #[error("Action '{action}' is not available on the {page} page")]
    Unsupported { action: String, page: String },

    #[error("Enforcement action '{action}' already recorded on {id}")]
    AlreadyEnforced { action: String, id: String },

    #[error("Enforcement action '{0}' cannot be rolled back")]
    Irreversible(String),

    #[error("Unknown action '{0}'")]
    UnknownAction(String),

    #[error("Invalid action '{0}': expected kind:id[:reason]")]
    InvalidAction(String),
}

/// Failure loading a dataset from disk.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Dataset not found: {0}")]
    NotFound(PathBuf),

    #[error("No dataset for page '{page}' in {dir}")]
    MissingPage { page: String, dir: PathBuf },

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
