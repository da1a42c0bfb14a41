//! Expense Tracker is a small web service for recording expenses and the
//! categories they belong to.
//!
//! This library provides a JSON REST API over a SQLite database, including a
//! filtered and paginated expense listing.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde_json::json;
use tokio::signal;

mod app_state;
mod category;
mod db;
mod endpoints;
mod expense;
mod logging;
mod pagination;
mod routing;
mod timezone;
mod user;
mod validation;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use category::{
    Category, CategoryForm, CategoryId, CategoryName, CategoryUpdate, NewCategory,
    create_category, delete_category, get_category, get_category_by_name, list_categories,
    update_category,
};
pub use db::initialize as initialize_db;
pub use expense::{
    Expense, ExpenseFilter, ExpenseForm, ExpenseId, ExpenseUpdate, NewExpense, Predicate,
    ScanResult, create_expense, delete_expense, get_expense, list_expenses, scan_expenses,
    update_expense,
};
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use pagination::{Page, PaginationConfig};
pub use routing::build_router;
pub use timezone::{get_local_offset, today_in};
pub use user::{User, UserId, create_user, get_user, get_user_by_username};
pub use validation::Violation;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {error}");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut terminate) => {
                terminate.recv().await;
            }
            Err(error) => {
                tracing::error!("failed to install signal handler: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// One or more fields failed validation.
    ///
    /// Validation happens before anything is written to the database, so
    /// nothing is persisted when this error is returned.
    #[error("invalid input: {}", join_violations(.0))]
    Validation(Vec<Violation>),

    /// The request body, path or query string could not be parsed, e.g. a
    /// required field is missing or a value has the wrong type.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The category ID used for an expense did not match a category.
    #[error("the category ID {0} does not refer to a valid category")]
    InvalidCategory(CategoryId),

    /// The user ID used for an expense or category did not match a user.
    #[error("the user ID {0} does not refer to a valid user")]
    InvalidUser(UserId),

    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// A category with the same name already exists.
    ///
    /// Only checked when creating a category, renaming a category to an
    /// existing name is allowed.
    #[error("a category named \"{0}\" already exists")]
    DuplicateCategoryName(String),

    /// The username is already taken by another user.
    #[error("the username \"{0}\" already exists")]
    DuplicateUsername(String),

    /// Tried to delete a category that expenses still refer to.
    #[error("category {0} is still used by one or more expenses")]
    CategoryInUse(CategoryId),

    /// Tried to update a category that does not exist
    #[error("tried to update a category that is not in the database")]
    UpdateMissingCategory,

    /// Tried to delete a category that does not exist
    #[error("tried to delete a category that is not in the database")]
    DeleteMissingCategory,

    /// Tried to update an expense that does not exist
    #[error("tried to update an expense that is not in the database")]
    UpdateMissingExpense,

    /// Tried to delete an expense that does not exist
    #[error("tried to delete an expense that is not in the database")]
    DeleteMissingExpense,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// The configured timezone is not a valid, canonical timezone name.
    #[error("invalid timezone {0}")]
    InvalidTimezone(String),

    /// A navigation link could not be encoded as a query string.
    #[error("could not encode navigation link: {0}")]
    LinkEncodingError(String),
}

fn join_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|violation| violation.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Error::InvalidRequest(rejection.body_text())
    }
}

impl From<PathRejection> for Error {
    fn from(rejection: PathRejection) -> Self {
        Error::InvalidRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for Error {
    fn from(rejection: QueryRejection) -> Self {
        Error::InvalidRequest(rejection.body_text())
    }
}

impl Error {
    /// The HTTP status code the client receives for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Validation(_)
            | Error::InvalidRequest(_)
            | Error::InvalidCategory(_)
            | Error::InvalidUser(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Error::NotFound
            | Error::UpdateMissingCategory
            | Error::DeleteMissingCategory
            | Error::UpdateMissingExpense
            | Error::DeleteMissingExpense => StatusCode::NOT_FOUND,
            Error::DuplicateCategoryName(_)
            | Error::DuplicateUsername(_)
            | Error::CategoryInUse(_) => StatusCode::CONFLICT,
            // Unexpected persistence failures are reported as a client fault
            // with the underlying message attached.
            Error::SqlError(_) => StatusCode::BAD_REQUEST,
            Error::DatabaseLockError
            | Error::InvalidTimezone(_)
            | Error::LinkEncodingError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!("An unexpected error occurred: {}", self);
        }

        let body = match &self {
            Error::Validation(violations) => json!({
                "detail": self.to_string(),
                "errors": violations,
            }),
            error => json!({ "detail": error.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}
