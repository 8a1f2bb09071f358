//! Rule-based validation for full-record writes.
//!
//! Rules are checked exhaustively: a record with three bad fields yields three
//! violations, in field declaration order.

use serde::Serialize;
use utoipa::ToSchema;

/// One failed rule on one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Violation {
    /// Wire name of the failing field.
    pub field: String,
    /// Rule tag, e.g. `required`, `min`, `max`.
    pub rule: String,
    /// Rule parameter (empty for parameterless rules).
    pub value: String,
}

impl Violation {
    pub fn new(field: &str, rule: &str, value: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            rule: rule.to_string(),
            value: value.into(),
        }
    }
}

/// Accumulates violations across several field checks.
#[derive(Debug, Default)]
pub struct Validator {
    violations: Vec<Violation>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty string fails.
    pub fn required(&mut self, field: &str, value: &str) -> &mut Self {
        if value.is_empty() {
            self.violations.push(Violation::new(field, "required", ""));
        }
        self
    }

    /// Character length bounds. Skipped for empty values so that `required`
    /// reports the problem alone.
    pub fn length(&mut self, field: &str, value: &str, min: usize, max: usize) -> &mut Self {
        if value.is_empty() {
            return self;
        }
        let len = value.chars().count();
        if len < min {
            self.violations
                .push(Violation::new(field, "min", min.to_string()));
        } else if len > max {
            self.violations
                .push(Violation::new(field, "max", max.to_string()));
        }
        self
    }

    pub fn finish(&mut self) -> Result<(), Vec<Violation>> {
        if self.violations.is_empty() {
            Ok(())
        } else {
            Err(std::mem::take(&mut self.violations))
        }
    }
}
