//! Category creation endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State, rejection::JsonRejection},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    category::{Category, CategoryForm, NewCategory, create_category, get_category_by_name},
    db::lock_connection,
};

/// The state needed for creating a category.
#[derive(Debug, Clone)]
pub struct CreateCategoryEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateCategoryEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Handle a request to create a category.
///
/// Responds with the created category, or a conflict if a category with the
/// same name already exists.
pub async fn create_category_endpoint(
    State(state): State<CreateCategoryEndpointState>,
    body: Result<Json<CategoryForm>, JsonRejection>,
) -> Result<Json<Category>, Error> {
    let Json(form) = body?;
    let new_category = NewCategory::validate(form).map_err(Error::Validation)?;

    let connection = lock_connection(&state.db_connection)?;

    if get_category_by_name(&new_category.name, &connection)?.is_some() {
        return Err(Error::DuplicateCategoryName(new_category.name.to_string()));
    }

    let category = create_category(new_category, &connection)?;
    tracing::info!("Created category {} \"{}\"", category.id, category.name);

    Ok(Json(category))
}
