//! Endpoint for fetching a single expense.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State, rejection::PathRejection},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    db::lock_connection,
    expense::{Expense, ExpenseId, get_expense},
};

/// The state needed for fetching an expense.
#[derive(Debug, Clone)]
pub struct GetExpenseEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for GetExpenseEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Get an expense by its ID.
pub async fn get_expense_endpoint(
    State(state): State<GetExpenseEndpointState>,
    path: Result<Path<ExpenseId>, PathRejection>,
) -> Result<Json<Expense>, Error> {
    let Path(expense_id) = path?;
    let connection = lock_connection(&state.db_connection)?;

    get_expense(expense_id, &connection).map(Json)
}
