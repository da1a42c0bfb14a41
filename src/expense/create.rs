//! Expense creation endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State, rejection::JsonRejection},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    db::lock_connection,
    expense::{Expense, ExpenseForm, NewExpense, create_expense},
    timezone::today_in,
};

/// The state needed for creating an expense.
#[derive(Debug, Clone)]
pub struct CreateExpenseEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
    pub local_timezone: String,
}

impl FromRef<AppState> for CreateExpenseEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Validate and save a new expense.
///
/// Nothing is saved if any field is invalid.
pub async fn create_expense_endpoint(
    State(state): State<CreateExpenseEndpointState>,
    body: Result<Json<ExpenseForm>, JsonRejection>,
) -> Result<Json<Expense>, Error> {
    let Json(form) = body?;
    let today = today_in(&state.local_timezone)?;
    let new_expense = NewExpense::validate(form, today).map_err(Error::Validation)?;

    let connection = lock_connection(&state.db_connection)?;
    let expense = create_expense(new_expense, &connection)?;
    tracing::info!("Created expense {} for user {}", expense.id, expense.user_id);

    Ok(Json(expense))
}
