//! Category update endpoint.

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
    category::{Category, CategoryId, CategoryUpdate, get_category, update_category},
    db::lock_connection,
};

/// The state needed for updating a category.
#[derive(Debug, Clone)]
pub struct UpdateCategoryEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for UpdateCategoryEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Apply a partial update to a category and respond with the updated category.
///
/// Unlike creation, renaming a category to a name that is already used is allowed.
pub async fn update_category_endpoint(
    State(state): State<UpdateCategoryEndpointState>,
    path: Result<Path<CategoryId>, PathRejection>,
    body: Result<Json<CategoryUpdate>, JsonRejection>,
) -> Result<Json<Category>, Error> {
    let Path(category_id) = path?;
    let Json(update) = body?;

    let connection = lock_connection(&state.db_connection)?;

    let category = match get_category(category_id, &connection) {
        Ok(category) => category,
        Err(Error::NotFound) => return Err(Error::UpdateMissingCategory),
        Err(error) => return Err(error),
    };
    let category = update.merge(category).map_err(Error::Validation)?;

    update_category(&category, &connection)?;
    tracing::info!("Updated category {}", category.id);

    Ok(Json(category))
}
