//! Field validation shared by the category and expense inputs.

use std::fmt::Display;

use serde::Serialize;
use time::Date;

/// A single field that failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// The name of the offending field as it appears in the request body.
    pub field: &'static str,
    /// A human readable description of the problem.
    pub message: String,
}

impl Violation {
    /// Create a violation for `field`.
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.field, self.message)
    }
}

impl std::error::Error for Violation {}

/// Check that an expense amount is a finite number strictly greater than zero.
pub fn validate_amount(amount: f64) -> Result<f64, Violation> {
    if amount.is_finite() && amount > 0.0 {
        Ok(amount)
    } else {
        Err(Violation::new("amount", "must be greater than zero"))
    }
}

/// Check that `date` is no later than `today`.
///
/// Expenses record money that has already been spent, so future dates are not allowed.
pub fn validate_date(date: Date, today: Date) -> Result<Date, Violation> {
    if date > today {
        Err(Violation::new(
            "date",
            format!("{date} is in the future, which is not allowed"),
        ))
    } else {
        Ok(date)
    }
}
