//! The filtered scan over expenses and the paginated listing built on top of it.

use rusqlite::{Connection, ToSql};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error,
    category::CategoryId,
    db::to_sql_int,
    expense::{Expense, db::map_expense_row},
    pagination::Page,
    user::UserId,
};

/// A single condition an expense must meet to be included in a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Predicate {
    /// The expense belongs to the user.
    UserIs(UserId),
    /// The expense is in the category.
    CategoryIs(CategoryId),
    /// The expense is dated on or after the date.
    DateFrom(Date),
    /// The expense is dated on or before the date.
    DateTo(Date),
}

impl Predicate {
    fn clause(&self) -> &'static str {
        match self {
            Predicate::UserIs(_) => "user_id = ?",
            Predicate::CategoryIs(_) => "category_id = ?",
            Predicate::DateFrom(_) => "date >= ?",
            Predicate::DateTo(_) => "date <= ?",
        }
    }

    fn value(&self) -> &dyn ToSql {
        match self {
            Predicate::UserIs(user_id) => user_id,
            Predicate::CategoryIs(category_id) => category_id,
            Predicate::DateFrom(date) | Predicate::DateTo(date) => date,
        }
    }
}

/// The optional filters for listing expenses.
///
/// Serializes to the query string that reproduces the filters that are set,
/// which is how navigation links keep the same filters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseFilter {
    /// Only expenses of this user.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
    /// Only expenses in this category.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<CategoryId>,
    /// Only expenses on or after this date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_from: Option<Date>,
    /// Only expenses on or before this date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_to: Option<Date>,
}

impl ExpenseFilter {
    /// One predicate per filter that is set, filters that are not set match everything.
    pub fn predicates(&self) -> Vec<Predicate> {
        [
            self.user_id.map(Predicate::UserIs),
            self.category_id.map(Predicate::CategoryIs),
            self.date_from.map(Predicate::DateFrom),
            self.date_to.map(Predicate::DateTo),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

/// The result of scanning the expense table.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanResult {
    /// The number of expenses matching every predicate.
    pub total: u64,
    /// The matching expenses in ID order, limited by `skip` and `limit`.
    pub items: Vec<Expense>,
}

/// Get the expenses matching all of `predicates`, plus a count of every match.
///
/// Expenses are returned in ID order so that pages are stable across requests.
///
/// # Errors
/// Returns [Error::SqlError] if either query fails.
pub fn scan_expenses(
    predicates: &[Predicate],
    skip: u64,
    limit: u64,
    connection: &Connection,
) -> Result<ScanResult, Error> {
    let where_clause = if predicates.is_empty() {
        String::new()
    } else {
        let clauses: Vec<_> = predicates.iter().map(Predicate::clause).collect();
        format!(" WHERE {}", clauses.join(" AND "))
    };

    let limit = to_sql_int(limit);
    let offset = to_sql_int(skip);
    let mut params: Vec<&dyn ToSql> = predicates.iter().map(Predicate::value).collect();

    let total: i64 = connection.query_row(
        &format!("SELECT COUNT(id) FROM expense{where_clause}"),
        params.as_slice(),
        |row| row.get(0),
    )?;

    params.push(&limit);
    params.push(&offset);

    let items = connection
        .prepare(&format!(
            "SELECT id, amount, date, description, category_id, user_id FROM expense\
            {where_clause} ORDER BY id ASC LIMIT ? OFFSET ?"
        ))?
        .query_map(params.as_slice(), map_expense_row)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ScanResult {
        total: u64::try_from(total).unwrap_or_default(),
        items,
    })
}

/// List one page of the expenses that match `filter`.
///
/// The page carries the total number of matches and, where there is a page
/// before or after it, a link to that page made from `base_url` and the same
/// filters. A `skip` past the end gives an empty page that still links back.
/// A `date_from` later than `date_to` is not an error, nothing matches.
///
/// # Errors
/// Returns an error if the scan fails or the links cannot be encoded.
pub fn list_expenses(
    skip: u64,
    limit: u64,
    filter: &ExpenseFilter,
    base_url: &str,
    connection: &Connection,
) -> Result<Page<Expense>, Error> {
    let ScanResult { total, items } = scan_expenses(&filter.predicates(), skip, limit, connection)?;

    tracing::debug!(
        "Listing {} of {total} expenses matching {filter:?} from {skip}",
        items.len()
    );

    Page::new(items, total, skip, limit, base_url, filter)
}

#[cfg(test)]
mod scan_tests {
    use rusqlite::Connection;
    use time::{Date, macros::date};

    use crate::{
        expense::{Expense, NewExpense, create_expense},
        test_utils::{get_test_connection, insert_test_category, test_user},
        user::create_user,
    };

    use super::{ExpenseFilter, Predicate, scan_expenses};

    fn insert(
        amount: f64,
        date: Date,
        category_id: i64,
        user_id: i64,
        connection: &Connection,
    ) -> Expense {
        create_expense(
            NewExpense {
                amount,
                date,
                description: None,
                category_id,
                user_id,
            },
            connection,
        )
        .expect("Could not create expense")
    }

    #[test]
    fn filter_without_fields_has_no_predicates() {
        assert!(ExpenseFilter::default().predicates().is_empty());
    }

    #[test]
    fn filter_has_one_predicate_per_field() {
        let filter = ExpenseFilter {
            user_id: Some(1),
            category_id: None,
            date_from: Some(date!(2025 - 01 - 01)),
            date_to: Some(date!(2025 - 01 - 31)),
        };

        assert_eq!(
            filter.predicates(),
            vec![
                Predicate::UserIs(1),
                Predicate::DateFrom(date!(2025 - 01 - 01)),
                Predicate::DateTo(date!(2025 - 01 - 31)),
            ]
        );
    }

    #[test]
    fn scan_without_predicates_returns_everything_in_id_order() {
        let connection = get_test_connection();
        let category = insert_test_category("Food", &connection);
        let user = test_user(&connection);
        let want: Vec<_> = (1..=3)
            .map(|i| insert(i as f64, date!(2025 - 10 - 05), category.id, user.id, &connection))
            .collect();

        let got = scan_expenses(&[], 0, 10, &connection).expect("Could not scan expenses");

        assert_eq!(got.total, 3);
        assert_eq!(got.items, want);
    }

    #[test]
    fn total_ignores_skip_and_limit() {
        let connection = get_test_connection();
        let category = insert_test_category("Food", &connection);
        let user = test_user(&connection);
        let all: Vec<_> = (1..=5)
            .map(|i| insert(i as f64, date!(2025 - 10 - 05), category.id, user.id, &connection))
            .collect();

        let got = scan_expenses(&[], 1, 2, &connection).expect("Could not scan expenses");

        assert_eq!(got.total, 5);
        assert_eq!(got.items, all[1..3].to_vec());
    }

    #[test]
    fn scan_applies_every_predicate() {
        let connection = get_test_connection();
        let food = insert_test_category("Food", &connection);
        let rent = insert_test_category("Rent", &connection);
        let alice = create_user("alice", &connection).unwrap();
        let bob = create_user("bob", &connection).unwrap();
        let want = insert(1.0, date!(2025 - 10 - 05), food.id, alice.id, &connection);
        insert(2.0, date!(2025 - 10 - 05), rent.id, alice.id, &connection);
        insert(3.0, date!(2025 - 10 - 05), food.id, bob.id, &connection);
        insert(4.0, date!(2025 - 09 - 05), food.id, alice.id, &connection);

        let predicates = [
            Predicate::UserIs(alice.id),
            Predicate::CategoryIs(food.id),
            Predicate::DateFrom(date!(2025 - 10 - 01)),
        ];
        let got = scan_expenses(&predicates, 0, 10, &connection).expect("Could not scan");

        assert_eq!(got.total, 1);
        assert_eq!(got.items, vec![want]);
    }

    #[test]
    fn date_range_is_inclusive() {
        let connection = get_test_connection();
        let category = insert_test_category("Food", &connection);
        let user = test_user(&connection);
        insert(1.0, date!(2025 - 09 - 30), category.id, user.id, &connection);
        let first = insert(2.0, date!(2025 - 10 - 01), category.id, user.id, &connection);
        let last = insert(3.0, date!(2025 - 10 - 31), category.id, user.id, &connection);
        insert(4.0, date!(2025 - 11 - 01), category.id, user.id, &connection);

        let predicates = [
            Predicate::DateFrom(date!(2025 - 10 - 01)),
            Predicate::DateTo(date!(2025 - 10 - 31)),
        ];
        let got = scan_expenses(&predicates, 0, 10, &connection).expect("Could not scan");

        assert_eq!(got.items, vec![first, last]);
    }

    #[test]
    fn reversed_date_range_matches_nothing() {
        let connection = get_test_connection();
        let category = insert_test_category("Food", &connection);
        let user = test_user(&connection);
        insert(1.0, date!(2025 - 10 - 15), category.id, user.id, &connection);

        let predicates = [
            Predicate::DateFrom(date!(2025 - 10 - 31)),
            Predicate::DateTo(date!(2025 - 10 - 01)),
        ];
        let got = scan_expenses(&predicates, 0, 10, &connection).expect("Could not scan");

        assert_eq!(got.total, 0);
        assert!(got.items.is_empty());
    }

    #[test]
    fn zero_limit_counts_but_returns_nothing() {
        let connection = get_test_connection();
        let category = insert_test_category("Food", &connection);
        let user = test_user(&connection);
        insert(1.0, date!(2025 - 10 - 15), category.id, user.id, &connection);

        let got = scan_expenses(&[], 0, 0, &connection).expect("Could not scan");

        assert_eq!(got.total, 1);
        assert!(got.items.is_empty());
    }
}
