//! Error types for the LED configuration core

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Errors produced while editing, validating or persisting LED options
#[derive(Debug, Error)]
pub enum LedConfigError {
    /// Malformed hex colour string
    #[error("invalid color format: '{0}'")]
    InvalidColorFormat(String),

    /// One or more fields failed validation; nothing was saved
    #[error("validation failed: {0}")]
    Validation(ValidationErrors),

    /// The load or save collaborator reported a failure
    #[error("persistence failure: {0}")]
    Persistence(String),

    /// Assigned LED indices are no longer contiguous
    #[error("invariant violation: {0}")]
    InvariantViolation(String),

    /// A load or save is already outstanding for this session
    #[error("a load or save is already in progress")]
    Busy,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Reason a single field was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Violation {
    #[error("must be between {min} and {max}")]
    OutOfRange { min: i64, max: i64 },

    #[error("must be at least {min}")]
    BelowMinimum { min: i64 },

    #[error("{value} is not a known option")]
    NotInCatalog { value: i32 },

    #[error("pin {pin} is already assigned elsewhere")]
    PinInUse { pin: i32 },

    #[error("pin {pin} is also used by {other}")]
    PinConflict { pin: i32, other: String },

    #[error("'{text}' is not a valid hex color")]
    InvalidColor { text: String },

    #[error("'{text}' is not a non-negative integer")]
    InvalidIndex { text: String },
}

/// Field path → violation, ordered by path
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, Violation>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a violation for a field. The first violation for a path wins.
    pub fn add(&mut self, field: impl Into<String>, violation: Violation) {
        self.0.entry(field.into()).or_insert(violation);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: &str) -> Option<&Violation> {
        self.0.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Violation)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// `Ok(())` when empty, otherwise the collected errors
    pub fn into_result(self) -> std::result::Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, violation) in &self.0 {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{}: {}", field, violation)?;
            first = false;
        }
        Ok(())
    }
}

impl From<ValidationErrors> for LedConfigError {
    fn from(errors: ValidationErrors) -> Self {
        LedConfigError::Validation(errors)
    }
}

pub type Result<T> = std::result::Result<T, LedConfigError>;
