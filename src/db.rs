//! Database initialization and connection helpers.

use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::{Connection, Transaction, TransactionBehavior};

use crate::{
    Error, category::create_category_table, expense::create_expense_table,
    user::create_user_table,
};

/// A table in the application database and the function that creates it.
pub struct Table {
    /// The SQL name of the table.
    pub name: &'static str,
    create: fn(&Connection) -> Result<(), rusqlite::Error>,
}

/// Every table in the application database.
///
/// Tables are created in order, so a table must come after the tables its
/// foreign keys refer to.
pub const SCHEMA: &[Table] = &[
    Table {
        name: "user",
        create: create_user_table,
    },
    Table {
        name: "category",
        create: create_category_table,
    },
    Table {
        name: "expense",
        create: create_expense_table,
    },
];

/// Create all the tables in [SCHEMA] and enable foreign key checks.
///
/// # Errors
/// Returns an error if a table cannot be created or if there is an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    // Has no effect inside a transaction, so it must be set first.
    connection.pragma_update(None, "foreign_keys", true)?;

    let transaction = Transaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    for table in SCHEMA {
        tracing::debug!("Creating table {}", table.name);
        (table.create)(&transaction)?;
    }

    transaction.commit()?;

    Ok(())
}

/// Lock the shared database connection.
///
/// # Errors
/// Returns [Error::DatabaseLockError] if the lock is poisoned.
pub fn lock_connection(
    db_connection: &Arc<Mutex<Connection>>,
) -> Result<MutexGuard<'_, Connection>, Error> {
    db_connection.lock().map_err(|error| {
        tracing::error!("could not acquire database lock: {error}");
        Error::DatabaseLockError
    })
}

/// Convert a row count or offset to the integer type SQLite uses.
///
/// Values too large for an `i64` are clamped, which is far beyond any real table size.
pub fn to_sql_int(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}
