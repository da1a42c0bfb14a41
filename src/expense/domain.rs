//! Core expense domain types and the validation applied before they are saved.

use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    category::CategoryId,
    user::UserId,
    validation::{Violation, validate_amount, validate_date},
};

/// Database identifier for an expense.
pub type ExpenseId = i64;

/// Money that a user spent on a given day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    /// The ID of the expense.
    pub id: ExpenseId,
    /// How much was spent, always greater than zero.
    pub amount: f64,
    /// When the money was spent, never later than the day the expense was saved.
    pub date: Date,
    /// A free-text note about what the expense was for.
    pub description: Option<String>,
    /// The category the expense belongs to.
    pub category_id: CategoryId,
    /// The user who spent the money.
    pub user_id: UserId,
}

/// Request body for creating an expense.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseForm {
    /// How much was spent.
    pub amount: f64,
    /// When the money was spent.
    pub date: Date,
    /// A free-text note about the expense.
    #[serde(default)]
    pub description: Option<String>,
    /// The category the expense belongs to.
    pub category_id: CategoryId,
    /// The user who spent the money.
    pub user_id: UserId,
}

/// A validated expense that has not been saved yet.
///
/// Create one with [NewExpense::validate].
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    /// How much was spent.
    pub amount: f64,
    /// When the money was spent.
    pub date: Date,
    /// A free-text note about the expense.
    pub description: Option<String>,
    /// The category the expense belongs to.
    pub category_id: CategoryId,
    /// The user who spent the money.
    pub user_id: UserId,
}

impl NewExpense {
    /// Check every field of `form`, with `today` as the latest allowed date.
    ///
    /// # Errors
    /// Returns all the violations found, not just the first.
    pub fn validate(form: ExpenseForm, today: Date) -> Result<Self, Vec<Violation>> {
        let amount = validate_amount(form.amount);
        let date = validate_date(form.date, today);

        match (amount, date) {
            (Ok(amount), Ok(date)) => Ok(Self {
                amount,
                date,
                description: form.description,
                category_id: form.category_id,
                user_id: form.user_id,
            }),
            (amount, date) => Err([amount.err(), date.err()].into_iter().flatten().collect()),
        }
    }
}

/// Request body for a partial update of an expense.
///
/// Fields that are absent or `null` are left unchanged, so a description can
/// be replaced but not removed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExpenseUpdate {
    /// How much was spent.
    #[serde(default)]
    pub amount: Option<f64>,
    /// When the money was spent.
    #[serde(default)]
    pub date: Option<Date>,
    /// Replaces the note, if given.
    #[serde(default)]
    pub description: Option<String>,
    /// The category the expense belongs to.
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    /// The user who spent the money.
    #[serde(default)]
    pub user_id: Option<UserId>,
}

impl ExpenseUpdate {
    /// Apply the fields that are set to `expense`.
    ///
    /// Only the fields being set are validated, with `today` as the latest allowed date.
    ///
    /// # Errors
    /// Returns all the violations found, `expense` is not modified.
    pub fn merge(self, expense: Expense, today: Date) -> Result<Expense, Vec<Violation>> {
        let mut expense = expense;
        let mut violations = Vec::new();

        if let Some(amount) = self.amount {
            match validate_amount(amount) {
                Ok(amount) => expense.amount = amount,
                Err(violation) => violations.push(violation),
            }
        }

        if let Some(date) = self.date {
            match validate_date(date, today) {
                Ok(date) => expense.date = date,
                Err(violation) => violations.push(violation),
            }
        }

        if !violations.is_empty() {
            return Err(violations);
        }

        if let Some(description) = self.description {
            expense.description = Some(description);
        }

        if let Some(category_id) = self.category_id {
            expense.category_id = category_id;
        }

        if let Some(user_id) = self.user_id {
            expense.user_id = user_id;
        }

        Ok(expense)
    }
}
