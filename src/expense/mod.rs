//! Expenses: storage, validation, the filtered listing and the CRUD endpoints.

mod create;
mod db;
mod delete;
mod domain;
mod edit;
mod get;
mod list;
mod query;

pub use create::create_expense_endpoint;
pub use db::{create_expense, create_expense_table, delete_expense, get_expense, update_expense};
pub use delete::delete_expense_endpoint;
pub use domain::{Expense, ExpenseForm, ExpenseId, ExpenseUpdate, NewExpense};
pub use edit::update_expense_endpoint;
pub use get::get_expense_endpoint;
pub use list::list_expenses_endpoint;
pub use query::{ExpenseFilter, Predicate, ScanResult, list_expenses, scan_expenses};
