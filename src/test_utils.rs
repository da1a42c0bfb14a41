#![allow(missing_docs)]

use std::sync::{Arc, Mutex};

use rusqlite::Connection;
use time::{Date, Duration, OffsetDateTime};

use crate::{
    AppState,
    category::{Category, CategoryName, NewCategory, create_category},
    db::initialize,
    expense::{Expense, NewExpense, create_expense},
    pagination::PaginationConfig,
    user::{User, create_user, get_user_by_username},
};

pub(crate) const TEST_TIMEZONE: &str = "Etc/UTC";

pub(crate) fn get_test_connection() -> Connection {
    let connection =
        Connection::open_in_memory().expect("Could not open in-memory SQLite database");
    initialize(&connection).expect("Could not initialize database");
    connection
}

pub(crate) fn get_test_app_state() -> AppState {
    AppState {
        local_timezone: TEST_TIMEZONE.to_owned(),
        pagination_config: PaginationConfig::default(),
        db_connection: Arc::new(Mutex::new(get_test_connection())),
    }
}

pub(crate) fn today() -> Date {
    OffsetDateTime::now_utc().date()
}

pub(crate) fn days_ago(days: i64) -> Date {
    today() - Duration::days(days)
}

/// Get the user called "test", creating it on first use.
pub(crate) fn test_user(connection: &Connection) -> User {
    if let Some(user) = get_user_by_username("test", connection).expect("Could not query users") {
        return user;
    }

    create_user("test", connection).expect("Could not create test user")
}

pub(crate) fn insert_test_category(name: &str, connection: &Connection) -> Category {
    create_category(
        NewCategory {
            name: CategoryName::new_unchecked(name),
            user_id: None,
        },
        connection,
    )
    .expect("Could not create test category")
}

pub(crate) fn insert_test_expense(
    amount: f64,
    category_id: i64,
    connection: &Connection,
) -> Expense {
    let user = test_user(connection);

    create_expense(
        NewExpense {
            amount,
            date: today(),
            description: None,
            category_id,
            user_id: user.id,
        },
        connection,
    )
    .expect("Could not create test expense")
}
