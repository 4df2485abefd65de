//! Defines the core data models and database queries for expenses and the money owed on them.

use rusqlite::{Connection, Row};
use time::Date;

use crate::{Error, tag::TagName, user::UserID};

// ============================================================================
// MODELS
// ============================================================================

/// Database identifier for an expense.
pub type ExpenseId = i64;
/// Database identifier for a receivable.
pub type ReceivableId = i64;

/// Money spent by a user, possibly on behalf of other people.
#[derive(Debug, Clone, PartialEq)]
pub struct Expense {
    /// The ID of the expense.
    pub id: ExpenseId,
    /// The user who paid.
    pub user_id: UserID,
    /// When the money was spent.
    pub date: Date,
    /// What the money was spent on.
    pub description: String,
    /// The full amount paid.
    pub total_amount: f64,
    /// The part of `total_amount` the user paid for themselves.
    pub own_amount: f64,
    /// The category of the expense.
    pub tag: TagName,
}

/// Money another person owes the user for their share of a split expense.
#[derive(Debug, Clone, PartialEq)]
pub struct Receivable {
    /// The ID of the receivable.
    pub id: ReceivableId,
    /// The expense that was split.
    pub expense_id: ExpenseId,
    /// Who owes the money.
    pub person_name: String,
    /// How much they owe.
    pub amount: f64,
    /// Whether they have paid the user back.
    pub is_paid: bool,
}

/// One person's share of a split expense.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitShare {
    /// Who owes the share.
    pub person_name: String,
    /// The size of the share.
    pub amount: f64,
}

/// The validated contents of an expense, used for both creating and editing.
///
/// To get a validated value from user input, use [NewExpense::new].
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    /// When the money was spent.
    pub date: Date,
    /// What the money was spent on.
    pub description: String,
    /// The full amount paid.
    pub total_amount: f64,
    /// The category of the expense.
    pub tag: TagName,
    /// The shares owed by other people, empty if the expense is not split.
    pub splits: Vec<SplitShare>,
}

impl NewExpense {
    /// Create an expense, checking that the split shares leave something for the user.
    ///
    /// # Errors
    ///
    /// Returns an:
    /// - [Error::SharesExceedTotal] if the shares add up to `total_amount` or more,
    /// - [Error::NonPositiveShare] if a share is zero or negative.
    pub fn new(
        date: Date,
        description: &str,
        total_amount: f64,
        tag: TagName,
        splits: Vec<SplitShare>,
    ) -> Result<Self, Error> {
        let share_total: f64 = splits.iter().map(|split| split.amount).sum();

        if !splits.is_empty() && share_total >= total_amount {
            return Err(Error::SharesExceedTotal);
        }

        if splits.iter().any(|split| split.amount <= 0.0) {
            return Err(Error::NonPositiveShare);
        }

        Ok(Self {
            date,
            description: description.to_owned(),
            total_amount,
            tag,
            splits,
        })
    }

    /// The part of the total that the user paid for themselves.
    pub fn own_amount(&self) -> f64 {
        self.total_amount - self.splits.iter().map(|split| split.amount).sum::<f64>()
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create the expense table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_expense_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS expense (
                id INTEGER PRIMARY KEY,
                date TEXT NOT NULL,
                description TEXT NOT NULL,
                total_amount REAL NOT NULL,
                own_amount REAL NOT NULL,
                tag TEXT NOT NULL,
                user_id INTEGER NOT NULL,
                FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
                )",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_expense_user_date ON expense(user_id, date);",
        (),
    )?;

    Ok(())
}

/// Create the receivable table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_receivable_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS receivable (
                id INTEGER PRIMARY KEY,
                person_name TEXT NOT NULL,
                amount REAL NOT NULL,
                is_paid INTEGER NOT NULL DEFAULT 0,
                expense_id INTEGER NOT NULL,
                FOREIGN KEY(expense_id) REFERENCES expense(id) ON UPDATE CASCADE ON DELETE CASCADE
                )",
        (),
    )?;

    Ok(())
}

/// Store a new expense for `user_id` along with an unpaid receivable for each split share.
///
/// The caller is responsible for wrapping this in a transaction so that the expense and its
/// receivables are stored together.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn create_expense(
    user_id: UserID,
    expense: &NewExpense,
    connection: &Connection,
) -> Result<Expense, Error> {
    let created = connection
        .prepare(
            "INSERT INTO expense (date, description, total_amount, own_amount, tag, user_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             RETURNING id, user_id, date, description, total_amount, own_amount, tag",
        )?
        .query_row(
            (
                expense.date,
                &expense.description,
                expense.total_amount,
                expense.own_amount(),
                expense.tag.as_ref(),
                user_id.as_i64(),
            ),
            map_expense_row,
        )?;

    insert_receivables(created.id, &expense.splits, connection)?;

    Ok(created)
}

fn insert_receivables(
    expense_id: ExpenseId,
    splits: &[SplitShare],
    connection: &Connection,
) -> Result<(), Error> {
    let mut statement = connection.prepare(
        "INSERT INTO receivable (person_name, amount, is_paid, expense_id) VALUES (?1, ?2, 0, ?3)",
    )?;

    for split in splits {
        statement.execute((&split.person_name, split.amount, expense_id))?;
    }

    Ok(())
}

/// Retrieve an expense by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid expense,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_expense(id: ExpenseId, connection: &Connection) -> Result<Expense, Error> {
    connection
        .prepare(
            "SELECT id, user_id, date, description, total_amount, own_amount, tag
             FROM expense WHERE id = :id",
        )?
        .query_row(&[(":id", &id)], map_expense_row)
        .map_err(|error| error.into())
}

/// Retrieve an expense that belongs to `user_id`.
///
/// # Errors
/// Returns [Error::NotFound] if the expense does not exist and [Error::Forbidden] if it
/// belongs to another user.
pub fn get_owned_expense(
    user_id: UserID,
    id: ExpenseId,
    connection: &Connection,
) -> Result<Expense, Error> {
    let expense = get_expense(id, connection)?;

    if expense.user_id != user_id {
        tracing::warn!("User {user_id} tried to access expense {id} of user {}", expense.user_id);
        return Err(Error::Forbidden);
    }

    Ok(expense)
}

/// Retrieve all of a user's expenses, most recent first.
pub fn get_user_expenses(user_id: UserID, connection: &Connection) -> Result<Vec<Expense>, Error> {
    connection
        .prepare(
            "SELECT id, user_id, date, description, total_amount, own_amount, tag
             FROM expense WHERE user_id = :user_id
             ORDER BY date DESC, id DESC",
        )?
        .query_map(&[(":user_id", &user_id.as_i64())], map_expense_row)?
        .map(|maybe_expense| maybe_expense.map_err(|error| error.into()))
        .collect()
}

/// Retrieve a user's expenses dated from `start` to `end` inclusive.
pub fn get_expenses_between(
    user_id: UserID,
    start: Date,
    end: Date,
    connection: &Connection,
) -> Result<Vec<Expense>, Error> {
    connection
        .prepare(
            "SELECT id, user_id, date, description, total_amount, own_amount, tag
             FROM expense WHERE user_id = ?1 AND date >= ?2 AND date <= ?3
             ORDER BY date ASC, id ASC",
        )?
        .query_map((user_id.as_i64(), start, end), map_expense_row)?
        .map(|maybe_expense| maybe_expense.map_err(|error| error.into()))
        .collect()
}

/// Replace the contents of the expense `id`.
///
/// All existing receivables are deleted and a new unpaid receivable is created for each split
/// share. The caller is responsible for wrapping this in a transaction.
///
/// # Errors
/// Returns [Error::NotFound] if the expense does not exist.
pub fn update_expense(
    id: ExpenseId,
    expense: &NewExpense,
    connection: &Connection,
) -> Result<Expense, Error> {
    let updated = connection
        .prepare(
            "UPDATE expense
             SET date = ?1, description = ?2, total_amount = ?3, own_amount = ?4, tag = ?5
             WHERE id = ?6
             RETURNING id, user_id, date, description, total_amount, own_amount, tag",
        )?
        .query_row(
            (
                expense.date,
                &expense.description,
                expense.total_amount,
                expense.own_amount(),
                expense.tag.as_ref(),
                id,
            ),
            map_expense_row,
        )?;

    connection.execute("DELETE FROM receivable WHERE expense_id = ?1", [id])?;
    insert_receivables(id, &expense.splits, connection)?;

    Ok(updated)
}

/// Delete an expense and the receivables for it.
///
/// # Errors
/// Returns [Error::NotFound] if the expense does not exist.
pub fn delete_expense(id: ExpenseId, connection: &Connection) -> Result<(), Error> {
    connection.execute("DELETE FROM receivable WHERE expense_id = ?1", [id])?;
    let rows_affected = connection.execute("DELETE FROM expense WHERE id = ?1", [id])?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

/// Retrieve the receivables of one expense in the order they were created.
pub fn get_receivables_for_expense(
    expense_id: ExpenseId,
    connection: &Connection,
) -> Result<Vec<Receivable>, Error> {
    connection
        .prepare(
            "SELECT id, expense_id, person_name, amount, is_paid
             FROM receivable WHERE expense_id = :expense_id ORDER BY id ASC",
        )?
        .query_map(&[(":expense_id", &expense_id)], map_receivable_row)?
        .map(|maybe_receivable| maybe_receivable.map_err(|error| error.into()))
        .collect()
}

/// Retrieve the receivables of all of a user's expenses.
pub fn get_user_receivables(
    user_id: UserID,
    connection: &Connection,
) -> Result<Vec<Receivable>, Error> {
    connection
        .prepare(
            "SELECT receivable.id, receivable.expense_id, receivable.person_name,
                    receivable.amount, receivable.is_paid
             FROM receivable INNER JOIN expense ON receivable.expense_id = expense.id
             WHERE expense.user_id = :user_id
             ORDER BY receivable.id ASC",
        )?
        .query_map(&[(":user_id", &user_id.as_i64())], map_receivable_row)?
        .map(|maybe_receivable| maybe_receivable.map_err(|error| error.into()))
        .collect()
}

/// Retrieve a receivable whose expense belongs to `user_id`.
///
/// # Errors
/// Returns [Error::NotFound] if the receivable does not exist and [Error::Forbidden] if its
/// expense belongs to another user.
pub fn get_owned_receivable(
    user_id: UserID,
    id: ReceivableId,
    connection: &Connection,
) -> Result<Receivable, Error> {
    let (receivable, owner) = connection
        .prepare(
            "SELECT receivable.id, receivable.expense_id, receivable.person_name,
                    receivable.amount, receivable.is_paid, expense.user_id
             FROM receivable INNER JOIN expense ON receivable.expense_id = expense.id
             WHERE receivable.id = :id",
        )?
        .query_row(&[(":id", &id)], |row| {
            Ok((map_receivable_row(row)?, UserID::new(row.get(5)?)))
        })?;

    if owner != user_id {
        tracing::warn!("User {user_id} tried to access receivable {id} of user {owner}");
        return Err(Error::Forbidden);
    }

    Ok(receivable)
}

/// Record that the money for a receivable has been paid back.
///
/// # Errors
/// Returns [Error::NotFound] if the receivable does not exist.
pub fn mark_receivable_paid(id: ReceivableId, connection: &Connection) -> Result<(), Error> {
    let rows_affected =
        connection.execute("UPDATE receivable SET is_paid = 1 WHERE id = ?1", [id])?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

/// The total of the unpaid receivables on the user's expenses.
pub fn get_total_owed(user_id: UserID, connection: &Connection) -> Result<f64, Error> {
    connection
        .query_row(
            "SELECT COALESCE(SUM(receivable.amount), 0.0)
             FROM receivable INNER JOIN expense ON receivable.expense_id = expense.id
             WHERE expense.user_id = ?1 AND receivable.is_paid = 0",
            [user_id.as_i64()],
            |row| row.get(0),
        )
        .map_err(|error| error.into())
}

fn map_expense_row(row: &Row) -> Result<Expense, rusqlite::Error> {
    let raw_tag: String = row.get(6)?;

    Ok(Expense {
        id: row.get(0)?,
        user_id: UserID::new(row.get(1)?),
        date: row.get(2)?,
        description: row.get(3)?,
        total_amount: row.get(4)?,
        own_amount: row.get(5)?,
        tag: TagName::new_unchecked(&raw_tag),
    })
}

fn map_receivable_row(row: &Row) -> Result<Receivable, rusqlite::Error> {
    Ok(Receivable {
        id: row.get(0)?,
        expense_id: row.get(1)?,
        person_name: row.get(2)?,
        amount: row.get(3)?,
        is_paid: row.get(4)?,
    })
}

// ============================================================================
// TESTS
// ============================================================================


#[cfg(test)]
mod database_tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error,
        db::initialize,
        tag::TagName,
        test_utils::create_test_user,
        user::{User, create_user},
    };

    use super::{
        NewExpense, SplitShare, create_expense, delete_expense, get_expense,
        get_expenses_between, get_owned_expense, get_owned_receivable,
        get_receivables_for_expense, get_total_owed, get_user_expenses, mark_receivable_paid,
        update_expense,
    };

    fn get_test_connection() -> (Connection, User) {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        let user = create_test_user(&conn);
        (conn, user)
    }

    fn split_dinner() -> NewExpense {
        NewExpense {
            date: date!(2024 - 03 - 01),
            description: "Dinner".to_owned(),
            total_amount: 100.0,
            tag: TagName::new_unchecked("food"),
            splits: vec![
                SplitShare {
                    person_name: "Sam".to_owned(),
                    amount: 30.0,
                },
                SplitShare {
                    person_name: "Alex".to_owned(),
                    amount: 20.0,
                },
            ],
        }
    }

    fn simple_expense(date: time::Date, total_amount: f64, tag: &str) -> NewExpense {
        NewExpense {
            date,
            description: "Something".to_owned(),
            total_amount,
            tag: TagName::new_unchecked(tag),
            splits: vec![],
        }
    }

    #[test]
    fn create_split_expense_stores_receivables() {
        let (conn, user) = get_test_connection();

        let expense = create_expense(user.id, &split_dinner(), &conn).unwrap();

        assert_eq!(expense.own_amount, 50.0);
        assert_eq!(expense.total_amount, 100.0);
        assert_eq!(get_expense(expense.id, &conn), Ok(expense.clone()));
        let receivables = get_receivables_for_expense(expense.id, &conn).unwrap();
        assert_eq!(receivables.len(), 2);
        assert!(receivables.iter().all(|receivable| !receivable.is_paid));
        assert_eq!(receivables[0].person_name, "Sam");
        assert_eq!(receivables[0].amount, 30.0);
        assert_eq!(receivables[1].person_name, "Alex");
        assert_eq!(receivables[1].amount, 20.0);
    }

    #[test]
    fn expenses_are_listed_most_recent_first() {
        let (conn, user) = get_test_connection();
        create_expense(user.id, &simple_expense(date!(2024 - 01 - 01), 1.0, "food"), &conn)
            .unwrap();
        create_expense(user.id, &simple_expense(date!(2024 - 03 - 01), 2.0, "food"), &conn)
            .unwrap();
        create_expense(user.id, &simple_expense(date!(2024 - 02 - 01), 3.0, "food"), &conn)
            .unwrap();

        let dates: Vec<_> = get_user_expenses(user.id, &conn)
            .unwrap()
            .into_iter()
            .map(|expense| expense.date)
            .collect();

        assert_eq!(
            dates,
            [date!(2024 - 03 - 01), date!(2024 - 02 - 01), date!(2024 - 01 - 01)]
        );
    }

    #[test]
    fn update_replaces_receivables() {
        let (conn, user) = get_test_connection();
        let expense = create_expense(user.id, &split_dinner(), &conn).unwrap();
        let mut edited = split_dinner();
        edited.total_amount = 80.0;
        edited.splits = vec![SplitShare {
            person_name: "Jo".to_owned(),
            amount: 40.0,
        }];

        let updated = update_expense(expense.id, &edited, &conn).unwrap();

        assert_eq!(updated.own_amount, 40.0);
        let receivables = get_receivables_for_expense(expense.id, &conn).unwrap();
        assert_eq!(receivables.len(), 1);
        assert_eq!(receivables[0].person_name, "Jo");
        assert!(!receivables[0].is_paid);
    }

    #[test]
    fn update_without_split_clears_receivables() {
        let (conn, user) = get_test_connection();
        let expense = create_expense(user.id, &split_dinner(), &conn).unwrap();
        let edited = simple_expense(date!(2024 - 03 - 02), 100.0, "food");

        let updated = update_expense(expense.id, &edited, &conn).unwrap();

        assert_eq!(updated.own_amount, 100.0);
        assert_eq!(get_receivables_for_expense(expense.id, &conn), Ok(vec![]));
    }

    #[test]
    fn update_missing_expense_fails() {
        let (conn, _) = get_test_connection();

        let result = update_expense(42, &split_dinner(), &conn);

        assert_eq!(result, Err(Error::NotFound));
    }

    #[test]
    fn delete_removes_receivables() {
        let (conn, user) = get_test_connection();
        let expense = create_expense(user.id, &split_dinner(), &conn).unwrap();

        delete_expense(expense.id, &conn).unwrap();

        assert_eq!(get_expense(expense.id, &conn), Err(Error::NotFound));
        assert_eq!(get_receivables_for_expense(expense.id, &conn), Ok(vec![]));
        assert_eq!(delete_expense(expense.id, &conn), Err(Error::NotFound));
    }

    #[test]
    fn other_users_expense_is_forbidden() {
        let (conn, alice) = get_test_connection();
        let bob = create_user("bob", "password", &conn).unwrap();
        let expense = create_expense(alice.id, &split_dinner(), &conn).unwrap();
        let receivable = &get_receivables_for_expense(expense.id, &conn).unwrap()[0];

        assert_eq!(get_owned_expense(bob.id, expense.id, &conn), Err(Error::Forbidden));
        assert_eq!(
            get_owned_receivable(bob.id, receivable.id, &conn),
            Err(Error::Forbidden)
        );
        assert_eq!(get_owned_expense(alice.id, expense.id, &conn), Ok(expense));
        assert_eq!(get_owned_expense(alice.id, 999, &conn), Err(Error::NotFound));
    }

    #[test]
    fn total_owed_counts_unpaid_receivables() {
        let (conn, user) = get_test_connection();
        let expense = create_expense(user.id, &split_dinner(), &conn).unwrap();
        let receivables = get_receivables_for_expense(expense.id, &conn).unwrap();

        assert_eq!(get_total_owed(user.id, &conn), Ok(50.0));

        mark_receivable_paid(receivables[0].id, &conn).unwrap();

        assert_eq!(get_total_owed(user.id, &conn), Ok(20.0));
        assert!(get_receivables_for_expense(expense.id, &conn).unwrap()[0].is_paid);
    }

    #[test]
    fn total_owed_is_zero_without_receivables() {
        let (conn, user) = get_test_connection();

        assert_eq!(get_total_owed(user.id, &conn), Ok(0.0));
    }

    #[test]
    fn expenses_between_is_inclusive() {
        let (conn, user) = get_test_connection();
        for date in [
            date!(2023 - 12 - 31),
            date!(2024 - 01 - 01),
            date!(2024 - 01 - 31),
            date!(2024 - 02 - 01),
        ] {
            create_expense(user.id, &simple_expense(date, 1.0, "food"), &conn).unwrap();
        }

        let expenses =
            get_expenses_between(user.id, date!(2024 - 01 - 01), date!(2024 - 01 - 31), &conn)
                .unwrap();

        let dates: Vec<_> = expenses.into_iter().map(|expense| expense.date).collect();
        assert_eq!(dates, [date!(2024 - 01 - 01), date!(2024 - 01 - 31)]);
    }
}
