//! Category deletion endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State, rejection::PathRejection},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    category::{Category, CategoryId, db::delete_category},
    db::lock_connection,
};

/// The state needed for deleting a category.
#[derive(Debug, Clone)]
pub struct DeleteCategoryEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteCategoryEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Handle category deletion. Responds with the deleted category.
pub async fn delete_category_endpoint(
    path: Result<Path<CategoryId>, PathRejection>,
    State(state): State<DeleteCategoryEndpointState>,
) -> Result<Json<Category>, Error> {
    let Path(category_id) = path?;
    let connection = lock_connection(&state.db_connection)?;

    match delete_category(category_id, &connection) {
        Ok(category) => {
            tracing::info!("Deleted category {category_id}");
            Ok(Json(category))
        }
        Err(Error::CategoryInUse(category_id)) => {
            tracing::warn!("Refused to delete category {category_id}, it is still in use");
            Err(Error::CategoryInUse(category_id))
        }
        Err(error) => Err(error),
    }
}
