//! Expense deletion endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State, rejection::PathRejection},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    db::lock_connection,
    expense::{Expense, ExpenseId, delete_expense},
};

/// The state needed for deleting an expense.
#[derive(Debug, Clone)]
pub struct DeleteExpenseEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteExpenseEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Handle expense deletion. Responds with the deleted expense.
pub async fn delete_expense_endpoint(
    path: Result<Path<ExpenseId>, PathRejection>,
    State(state): State<DeleteExpenseEndpointState>,
) -> Result<Json<Expense>, Error> {
    let Path(expense_id) = path?;
    let connection = lock_connection(&state.db_connection)?;

    let expense = delete_expense(expense_id, &connection)?;
    tracing::info!("Deleted expense {expense_id}");

    Ok(Json(expense))
}
