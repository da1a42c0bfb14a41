//! Category management for grouping expenses.

mod create;
mod db;
mod delete;
mod domain;
mod edit;
mod list;

pub use create::create_category_endpoint;
pub use db::{
    create_category, create_category_table, delete_category, get_category, get_category_by_name,
    list_categories, update_category,
};
pub use delete::delete_category_endpoint;
pub use domain::{Category, CategoryForm, CategoryId, CategoryName, CategoryUpdate, NewCategory};
pub use edit::update_category_endpoint;
pub use list::{get_category_endpoint, list_categories_endpoint};
