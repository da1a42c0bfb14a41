//! The endpoint for listing expenses with filters and pagination.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, OriginalUri, Query, State, rejection::QueryRejection},
    http::HeaderMap,
};
use rusqlite::Connection;
use serde::Deserialize;
use time::Date;

use crate::{
    AppState, Error,
    category::CategoryId,
    db::lock_connection,
    expense::{Expense, ExpenseFilter, list_expenses},
    pagination::{Page, PaginationConfig, request_base_url},
    user::UserId,
};

/// The state needed for listing expenses.
#[derive(Debug, Clone)]
pub struct ListExpensesState {
    pub db_connection: Arc<Mutex<Connection>>,
    pub pagination_config: PaginationConfig,
}

impl FromRef<AppState> for ListExpensesState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            pagination_config: state.pagination_config.clone(),
        }
    }
}

/// The query string for listing expenses.
///
/// `skip` and `limit` are unsigned, so negative values are rejected before
/// the handler runs.
#[derive(Debug, Default, Deserialize)]
pub struct ListExpensesParams {
    pub skip: Option<u64>,
    pub limit: Option<u64>,
    pub user_id: Option<UserId>,
    pub category_id: Option<CategoryId>,
    pub date_from: Option<Date>,
    pub date_to: Option<Date>,
}

/// List a page of expenses matching the filters in the query string.
pub async fn list_expenses_endpoint(
    State(state): State<ListExpensesState>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
    params: Result<Query<ListExpensesParams>, QueryRejection>,
) -> Result<Json<Page<Expense>>, Error> {
    let Query(params) = params?;
    let skip = params.skip.unwrap_or(state.pagination_config.default_skip);
    let limit = params.limit.unwrap_or(state.pagination_config.default_limit);
    let filter = ExpenseFilter {
        user_id: params.user_id,
        category_id: params.category_id,
        date_from: params.date_from,
        date_to: params.date_to,
    };
    let base_url = request_base_url(&uri, &headers);

    let connection = lock_connection(&state.db_connection)?;

    list_expenses(skip, limit, &filter, &base_url, &connection).map(Json)
}
