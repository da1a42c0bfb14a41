//! Endpoints for listing categories and fetching a single category.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{
        FromRef, Path, Query, State,
        rejection::{PathRejection, QueryRejection},
    },
};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    category::{Category, CategoryId, get_category, list_categories},
    db::lock_connection,
    pagination::PaginationConfig,
};

/// The state needed for reading categories.
#[derive(Debug, Clone)]
pub struct CategoriesState {
    pub db_connection: Arc<Mutex<Connection>>,
    pub pagination_config: PaginationConfig,
}

impl FromRef<AppState> for CategoriesState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            pagination_config: state.pagination_config.clone(),
        }
    }
}

/// Query parameters for paging through categories.
#[derive(Debug, Default, Deserialize)]
pub struct ListCategoriesParams {
    pub skip: Option<u64>,
    pub limit: Option<u64>,
}

/// List categories in ID order.
pub async fn list_categories_endpoint(
    State(state): State<CategoriesState>,
    params: Result<Query<ListCategoriesParams>, QueryRejection>,
) -> Result<Json<Vec<Category>>, Error> {
    let Query(params) = params?;
    let skip = params.skip.unwrap_or(state.pagination_config.default_skip);
    let limit = params.limit.unwrap_or(state.pagination_config.default_limit);

    let connection = lock_connection(&state.db_connection)?;

    list_categories(skip, limit, &connection).map(Json)
}

/// Get a single category by its ID.
pub async fn get_category_endpoint(
    State(state): State<CategoriesState>,
    path: Result<Path<CategoryId>, PathRejection>,
) -> Result<Json<Category>, Error> {
    let Path(category_id) = path?;
    let connection = lock_connection(&state.db_connection)?;

    get_category(category_id, &connection).map(Json)
}
