//! Database operations for categories.

use rusqlite::{Connection, OptionalExtension, Row};

use crate::{
    Error,
    category::{Category, CategoryId, CategoryName, NewCategory},
    db::to_sql_int,
};

/// Create a category and return it with its generated ID.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidUser] if the owning user does not exist,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_category(category: NewCategory, connection: &Connection) -> Result<Category, Error> {
    connection
        .prepare(
            "INSERT INTO category (name, user_id) VALUES (?1, ?2)
             RETURNING id, name, user_id",
        )?
        .query_row((category.name.as_ref(), category.user_id), map_row)
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY,
                },
                _,
            ) => Error::InvalidUser(category.user_id.unwrap_or_default()),
            error => error.into(),
        })
}

/// Retrieve a single category by ID.
///
/// # Errors
/// Returns [Error::NotFound] if `category_id` does not refer to a category.
pub fn get_category(category_id: CategoryId, connection: &Connection) -> Result<Category, Error> {
    connection
        .prepare("SELECT id, name, user_id FROM category WHERE id = :id;")?
        .query_row(&[(":id", &category_id)], map_row)
        .map_err(|error| error.into())
}

/// Find the first category called `name`, if there is one.
pub fn get_category_by_name(
    name: &CategoryName,
    connection: &Connection,
) -> Result<Option<Category>, Error> {
    connection
        .prepare("SELECT id, name, user_id FROM category WHERE name = :name ORDER BY id LIMIT 1;")?
        .query_row(&[(":name", &name.as_ref())], map_row)
        .optional()
        .map_err(|error| error.into())
}

/// Retrieve at most `limit` categories ordered by ID, after skipping the first `skip`.
pub fn list_categories(
    skip: u64,
    limit: u64,
    connection: &Connection,
) -> Result<Vec<Category>, Error> {
    connection
        .prepare("SELECT id, name, user_id FROM category ORDER BY id ASC LIMIT ?1 OFFSET ?2;")?
        .query_map((to_sql_int(limit), to_sql_int(skip)), map_row)?
        .map(|maybe_category| maybe_category.map_err(|error| error.into()))
        .collect()
}

/// Save the fields of `category` over the stored category with the same ID.
///
/// Names are not checked for uniqueness here.
///
/// # Errors
/// Returns [Error::UpdateMissingCategory] if the category doesn't exist.
pub fn update_category(category: &Category, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE category SET name = ?1, user_id = ?2 WHERE id = ?3",
        (category.name.as_ref(), category.user_id, category.id),
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingCategory);
    }

    Ok(())
}

/// Delete a category by ID and return the deleted category.
///
/// # Errors
/// This function will return a:
/// - [Error::DeleteMissingCategory] if the category doesn't exist,
/// - [Error::CategoryInUse] if expenses still refer to the category
///   (`ON DELETE RESTRICT` reports this as a trigger constraint),
/// - or [Error::SqlError] if there is some other SQL error.
pub fn delete_category(
    category_id: CategoryId,
    connection: &Connection,
) -> Result<Category, Error> {
    connection
        .prepare("DELETE FROM category WHERE id = ?1 RETURNING id, name, user_id")?
        .query_row([category_id], map_row)
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::DeleteMissingCategory,
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code:
                        rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY
                        | rusqlite::ffi::SQLITE_CONSTRAINT_TRIGGER,
                },
                _,
            ) => Error::CategoryInUse(category_id),
            error => error.into(),
        })
}

/// Initialize the category table and indexes.
pub fn create_category_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS category (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            user_id INTEGER,
            FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE SET NULL
        );

        CREATE INDEX IF NOT EXISTS idx_category_name ON category(name);",
    )?;

    Ok(())
}

fn map_row(row: &Row) -> Result<Category, rusqlite::Error> {
    let id = row.get(0)?;
    let raw_name: String = row.get(1)?;
    let name = CategoryName::new_unchecked(&raw_name);
    let user_id = row.get(2)?;

    Ok(Category { id, name, user_id })
}

#[cfg(test)]
mod category_query_tests {
    use std::collections::HashSet;

    use crate::{
        Error,
        category::{
            CategoryName, NewCategory, create_category, delete_category, get_category,
            get_category_by_name, list_categories, update_category,
        },
        test_utils::{get_test_connection, insert_test_category, insert_test_expense},
        user::create_user,
    };

    fn new_category(name: &str) -> NewCategory {
        NewCategory {
            name: CategoryName::new_unchecked(name),
            user_id: None,
        }
    }

    #[test]
    fn create_category_succeeds() {
        let connection = get_test_connection();
        let name = CategoryName::new("Terrifically a category").unwrap();

        let category = create_category(
            NewCategory {
                name: name.clone(),
                user_id: None,
            },
            &connection,
        );

        let got_category = category.expect("Could not create category");
        assert!(got_category.id > 0);
        assert_eq!(got_category.name, name);
        assert_eq!(got_category.user_id, None);
    }

    #[test]
    fn create_category_with_owner() {
        let connection = get_test_connection();
        let user = create_user("alice", &connection).expect("Could not create user");

        let category = create_category(
            NewCategory {
                name: CategoryName::new_unchecked("Mine"),
                user_id: Some(user.id),
            },
            &connection,
        )
        .expect("Could not create category");

        assert_eq!(category.user_id, Some(user.id));
    }

    #[test]
    fn create_category_fails_on_invalid_user() {
        let connection = get_test_connection();

        let result = create_category(
            NewCategory {
                name: CategoryName::new_unchecked("Orphan"),
                user_id: Some(42),
            },
            &connection,
        );

        assert_eq!(result, Err(Error::InvalidUser(42)));
    }

    #[test]
    fn get_category_succeeds() {
        let connection = get_test_connection();
        let inserted = create_category(new_category("Foo"), &connection).unwrap();

        let selected = get_category(inserted.id, &connection);

        assert_eq!(Ok(inserted), selected);
    }

    #[test]
    fn get_category_with_invalid_id_returns_not_found() {
        let connection = get_test_connection();
        let inserted = create_category(new_category("Foo"), &connection).unwrap();

        let selected = get_category(inserted.id + 123, &connection);

        assert_eq!(selected, Err(Error::NotFound));
    }

    #[test]
    fn get_category_by_name_finds_exact_match() {
        let connection = get_test_connection();
        let inserted = create_category(new_category("Foo"), &connection).unwrap();
        create_category(new_category("Bar"), &connection).unwrap();

        let got = get_category_by_name(&CategoryName::new_unchecked("Foo"), &connection);
        let missing = get_category_by_name(&CategoryName::new_unchecked("foo"), &connection);

        assert_eq!(got, Ok(Some(inserted)));
        assert_eq!(missing, Ok(None));
    }

    #[test]
    fn list_categories_returns_all() {
        let connection = get_test_connection();
        let inserted = HashSet::from([
            create_category(new_category("Foo"), &connection).unwrap(),
            create_category(new_category("Bar"), &connection).unwrap(),
        ]);

        let selected = list_categories(0, 100, &connection).expect("Could not list categories");

        assert_eq!(inserted, HashSet::from_iter(selected));
    }

    #[test]
    fn list_categories_applies_skip_and_limit_in_id_order() {
        let connection = get_test_connection();
        let inserted: Vec<_> = (1..=5)
            .map(|i| create_category(new_category(&format!("#{i}")), &connection).unwrap())
            .collect();

        let selected = list_categories(1, 2, &connection).expect("Could not list categories");

        assert_eq!(selected, inserted[1..3].to_vec());
    }

    #[test]
    fn update_category_succeeds() {
        let connection = get_test_connection();
        let mut category = create_category(new_category("Original"), &connection).unwrap();
        category.name = CategoryName::new_unchecked("Updated");

        let result = update_category(&category, &connection);

        assert!(result.is_ok());
        assert_eq!(get_category(category.id, &connection), Ok(category));
    }

    #[test]
    fn update_category_allows_duplicate_names() {
        let connection = get_test_connection();
        create_category(new_category("Taken"), &connection).unwrap();
        let mut category = create_category(new_category("Other"), &connection).unwrap();
        category.name = CategoryName::new_unchecked("Taken");

        let result = update_category(&category, &connection);

        assert_eq!(result, Ok(()));
    }

    #[test]
    fn update_category_with_invalid_id_returns_not_found() {
        let connection = get_test_connection();
        let category = create_category(new_category("Foo"), &connection).unwrap();
        let mut missing = category.clone();
        missing.id = 999999;

        let result = update_category(&missing, &connection);

        assert_eq!(result, Err(Error::UpdateMissingCategory));
    }

    #[test]
    fn delete_category_returns_deleted_category() {
        let connection = get_test_connection();
        let category = create_category(new_category("ToDelete"), &connection).unwrap();

        let result = delete_category(category.id, &connection);

        assert_eq!(result, Ok(category.clone()));
        assert_eq!(get_category(category.id, &connection), Err(Error::NotFound));
    }

    #[test]
    fn delete_category_with_invalid_id_returns_not_found() {
        let connection = get_test_connection();

        let result = delete_category(999999, &connection);

        assert_eq!(result, Err(Error::DeleteMissingCategory));
    }

    #[test]
    fn delete_category_in_use_is_rejected() {
        let connection = get_test_connection();
        let category = insert_test_category("Groceries", &connection);
        insert_test_expense(12.5, category.id, &connection);

        let result = delete_category(category.id, &connection);

        assert_eq!(result, Err(Error::CategoryInUse(category.id)));
        assert_eq!(get_category(category.id, &connection), Ok(category));
    }
}
