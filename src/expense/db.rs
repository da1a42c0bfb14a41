//! Database operations for expenses.

use rusqlite::{Connection, Row};

use crate::{
    Error,
    category::{CategoryId, get_category},
    expense::{Expense, ExpenseId, NewExpense},
    user::UserId,
};

/// Create a new expense in the database.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidCategory] if the category ID does not refer to a real category,
/// - [Error::InvalidUser] if the user ID does not refer to a real user,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_expense(expense: NewExpense, connection: &Connection) -> Result<Expense, Error> {
    connection
        .prepare(
            "INSERT INTO expense (amount, date, description, category_id, user_id)
             VALUES (?1, ?2, ?3, ?4, ?5)
             RETURNING id, amount, date, description, category_id, user_id",
        )?
        .query_row(
            (
                expense.amount,
                expense.date,
                &expense.description,
                expense.category_id,
                expense.user_id,
            ),
            map_expense_row,
        )
        .map_err(|error| {
            map_foreign_key_error(error, expense.category_id, expense.user_id, connection)
        })
}

/// Retrieve an expense from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid expense,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_expense(id: ExpenseId, connection: &Connection) -> Result<Expense, Error> {
    let expense = connection
        .prepare(
            "SELECT id, amount, date, description, category_id, user_id FROM expense WHERE id = :id",
        )?
        .query_row(&[(":id", &id)], map_expense_row)?;

    Ok(expense)
}

/// Save the fields of `expense` over the stored expense with the same ID.
///
/// # Errors
/// This function will return a:
/// - [Error::UpdateMissingExpense] if the expense does not exist,
/// - [Error::InvalidCategory] or [Error::InvalidUser] if a reference is dangling,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn update_expense(expense: &Expense, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection
        .execute(
            "UPDATE expense
             SET amount = ?1, date = ?2, description = ?3, category_id = ?4, user_id = ?5
             WHERE id = ?6",
            (
                expense.amount,
                expense.date,
                &expense.description,
                expense.category_id,
                expense.user_id,
                expense.id,
            ),
        )
        .map_err(|error| {
            map_foreign_key_error(error, expense.category_id, expense.user_id, connection)
        })?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingExpense);
    }

    Ok(())
}

/// Delete an expense by ID and return the deleted expense.
///
/// # Errors
/// Returns [Error::DeleteMissingExpense] if the expense does not exist.
pub fn delete_expense(id: ExpenseId, connection: &Connection) -> Result<Expense, Error> {
    connection
        .prepare(
            "DELETE FROM expense WHERE id = ?1
             RETURNING id, amount, date, description, category_id, user_id",
        )?
        .query_row([id], map_expense_row)
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::DeleteMissingExpense,
            error => error.into(),
        })
}

/// Create the expense table in the database.
///
/// Categories cannot be deleted while an expense refers to them.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_expense_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS expense (
                id INTEGER PRIMARY KEY,
                amount REAL NOT NULL CHECK (amount > 0),
                date TEXT NOT NULL,
                description TEXT,
                category_id INTEGER NOT NULL,
                user_id INTEGER NOT NULL,
                FOREIGN KEY(category_id) REFERENCES category(id) ON UPDATE CASCADE ON DELETE RESTRICT,
                FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
                );

        CREATE INDEX IF NOT EXISTS idx_expense_user_date ON expense(user_id, date);
        CREATE INDEX IF NOT EXISTS idx_expense_category_date ON expense(category_id, date);",
    )?;

    Ok(())
}

/// Map a database row to an Expense.
pub fn map_expense_row(row: &Row) -> Result<Expense, rusqlite::Error> {
    let id = row.get(0)?;
    let amount = row.get(1)?;
    let date = row.get(2)?;
    let description = row.get(3)?;
    let category_id = row.get(4)?;
    let user_id = row.get(5)?;

    Ok(Expense {
        id,
        amount,
        date,
        description,
        category_id,
        user_id,
    })
}

/// SQLite does not say which foreign key failed, so check the category to tell them apart.
fn map_foreign_key_error(
    error: rusqlite::Error,
    category_id: CategoryId,
    user_id: UserId,
    connection: &Connection,
) -> Error {
    match error {
        rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error {
                code: _,
                extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY,
            },
            _,
        ) => match get_category(category_id, connection) {
            Err(Error::NotFound) => Error::InvalidCategory(category_id),
            _ => Error::InvalidUser(user_id),
        },
        error => error.into(),
    }
}

#[cfg(test)]
mod database_tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error,
        expense::{Expense, NewExpense, create_expense, delete_expense, get_expense, update_expense},
        test_utils::{get_test_connection, insert_test_category, test_user},
    };

    fn new_expense(amount: f64, category_id: i64, user_id: i64) -> NewExpense {
        NewExpense {
            amount,
            date: date!(2025 - 10 - 05),
            description: Some("Groceries".to_owned()),
            category_id,
            user_id,
        }
    }

    fn setup() -> (Connection, i64, i64) {
        let connection = get_test_connection();
        let category = insert_test_category("Food", &connection);
        let user = test_user(&connection);

        (connection, category.id, user.id)
    }

    #[test]
    fn create_succeeds() {
        let (connection, category_id, user_id) = setup();

        let expense = create_expense(new_expense(12.3, category_id, user_id), &connection)
            .expect("Could not create expense");

        assert!(expense.id > 0);
        assert_eq!(expense.amount, 12.3);
        assert_eq!(expense.date, date!(2025 - 10 - 05));
        assert_eq!(expense.description.as_deref(), Some("Groceries"));
    }

    #[test]
    fn create_without_description() {
        let (connection, category_id, user_id) = setup();
        let mut new = new_expense(1.0, category_id, user_id);
        new.description = None;

        let expense = create_expense(new, &connection).expect("Could not create expense");

        assert_eq!(get_expense(expense.id, &connection), Ok(expense));
    }

    #[test]
    fn create_fails_on_invalid_category() {
        let (connection, _, user_id) = setup();

        let result = create_expense(new_expense(1.0, 42, user_id), &connection);

        assert_eq!(result, Err(Error::InvalidCategory(42)));
    }

    #[test]
    fn create_fails_on_invalid_user() {
        let (connection, category_id, _) = setup();

        let result = create_expense(new_expense(1.0, category_id, 42), &connection);

        assert_eq!(result, Err(Error::InvalidUser(42)));
    }

    #[test]
    fn get_missing_expense_returns_not_found() {
        let (connection, _, _) = setup();

        assert_eq!(get_expense(1, &connection), Err(Error::NotFound));
    }

    #[test]
    fn update_succeeds() {
        let (connection, category_id, user_id) = setup();
        let expense = create_expense(new_expense(1.0, category_id, user_id), &connection).unwrap();
        let other_category = insert_test_category("Other", &connection);
        let want = Expense {
            amount: 99.5,
            category_id: other_category.id,
            ..expense
        };

        update_expense(&want, &connection).expect("Could not update expense");

        assert_eq!(get_expense(want.id, &connection), Ok(want));
    }

    #[test]
    fn update_missing_expense_fails() {
        let (connection, category_id, user_id) = setup();
        let expense = Expense {
            id: 123,
            amount: 1.0,
            date: date!(2025 - 10 - 05),
            description: None,
            category_id,
            user_id,
        };

        assert_eq!(
            update_expense(&expense, &connection),
            Err(Error::UpdateMissingExpense)
        );
    }

    #[test]
    fn update_fails_on_invalid_category() {
        let (connection, category_id, user_id) = setup();
        let mut expense =
            create_expense(new_expense(1.0, category_id, user_id), &connection).unwrap();
        expense.category_id = 404;

        assert_eq!(
            update_expense(&expense, &connection),
            Err(Error::InvalidCategory(404))
        );
    }

    #[test]
    fn delete_returns_deleted_expense() {
        let (connection, category_id, user_id) = setup();
        let expense = create_expense(new_expense(1.0, category_id, user_id), &connection).unwrap();

        assert_eq!(delete_expense(expense.id, &connection), Ok(expense.clone()));
        assert_eq!(get_expense(expense.id, &connection), Err(Error::NotFound));
    }

    #[test]
    fn delete_missing_expense_fails() {
        let (connection, _, _) = setup();

        assert_eq!(delete_expense(1, &connection), Err(Error::DeleteMissingExpense));
    }
}
