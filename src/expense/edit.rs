//! Expense update endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{
        FromRef, Path, State,
        rejection::{JsonRejection, PathRejection},
    },
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    db::lock_connection,
    expense::{Expense, ExpenseId, ExpenseUpdate, get_expense, update_expense},
    timezone::today_in,
};

/// The state needed for updating an expense.
#[derive(Debug, Clone)]
pub struct UpdateExpenseEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
    pub local_timezone: String,
}

impl FromRef<AppState> for UpdateExpenseEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Apply a partial update to an expense and respond with the updated expense.
pub async fn update_expense_endpoint(
    State(state): State<UpdateExpenseEndpointState>,
    path: Result<Path<ExpenseId>, PathRejection>,
    body: Result<Json<ExpenseUpdate>, JsonRejection>,
) -> Result<Json<Expense>, Error> {
    let Path(expense_id) = path?;
    let Json(update) = body?;
    let today = today_in(&state.local_timezone)?;

    let connection = lock_connection(&state.db_connection)?;

    let expense = match get_expense(expense_id, &connection) {
        Ok(expense) => expense,
        Err(Error::NotFound) => return Err(Error::UpdateMissingExpense),
        Err(error) => return Err(error),
    };
    let expense = update.merge(expense, today).map_err(Error::Validation)?;

    update_expense(&expense, &connection)?;
    tracing::info!("Updated expense {}", expense.id);

    Ok(Json(expense))
}
