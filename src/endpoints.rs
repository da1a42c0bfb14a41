//! The API endpoints URIs.
//!
//! Endpoints that take a parameter use axum's path syntax, e.g. '/expenses/{expense_id}'.

/// The root route which responds with a welcome message.
pub const ROOT: &str = "/";
/// The route to list and create categories.
pub const CATEGORIES: &str = "/categories";
/// The route to get, update and delete a single category.
pub const CATEGORY: &str = "/categories/{category_id}";
/// The route to list and create expenses.
pub const EXPENSES: &str = "/expenses";
/// The route to get, update and delete a single expense.
pub const EXPENSE: &str = "/expenses/{expense_id}";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// For example, `format_endpoint("/expenses/{expense_id}", 1)` gives "/expenses/1".
#[cfg(test)]
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    match (endpoint_path.find('{'), endpoint_path.find('}')) {
        (Some(start), Some(end)) if start < end => format!(
            "{}{id}{}",
            &endpoint_path[..start],
            &endpoint_path[end + 1..]
        ),
        _ => endpoint_path.to_owned(),
    }
}
