use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single broken rule on a single field.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field: field.into(), message: message.into() }
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Every violation found while validating one input, in rule order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Error)]
#[error("validation failed: {}", display_list(.0))]
pub struct ValidationErrors(Vec<FieldViolation>);

fn display_list(v: &[FieldViolation]) -> String {
    v.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ")
}

impl ValidationErrors {
    pub fn new() -> Self { Self::default() }

    pub fn push(&mut self, field: &str, message: &str) {
        self.0.push(FieldViolation::new(field, message));
    }

    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    pub fn violations(&self) -> &[FieldViolation] { &self.0 }

    pub fn into_violations(self) -> Vec<FieldViolation> { self.0 }

    /// Whether any violation was recorded against `field`.
    pub fn has(&self, field: &str) -> bool {
        self.0.iter().any(|v| v.field == field)
    }

    /// `Ok(())` when nothing was recorded.
    pub fn into_result(self) -> Result<(), Self> {
        if self.0.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl From<FieldViolation> for ValidationErrors {
    fn from(v: FieldViolation) -> Self { Self(vec![v]) }
}
