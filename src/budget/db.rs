//! Database functions for a user's budget.

use rusqlite::{Connection, OptionalExtension, Row};
use time::Date;

use crate::{
    Error,
    budget::core::{Budget, BudgetPeriod, BudgetStatus, compute_budget_status},
    expense::get_expenses_between,
    user::UserID,
};

/// Create the budget table in the database.
///
/// Each user has at most one budget.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_budget_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS budget (
                id INTEGER PRIMARY KEY,
                amount REAL NOT NULL,
                period TEXT NOT NULL,
                user_id INTEGER NOT NULL UNIQUE,
                FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
                )",
        (),
    )?;

    Ok(())
}

/// Get the budget of `user_id`, or `None` if they have not set one.
pub fn get_budget(user_id: UserID, connection: &Connection) -> Result<Option<Budget>, Error> {
    connection
        .prepare("SELECT id, user_id, amount, period FROM budget WHERE user_id = :user_id")?
        .query_row(&[(":user_id", &user_id.as_i64())], map_row)
        .optional()
        .map_err(|error| error.into())
}

/// Set the amount and period of the budget of `user_id`, creating it if needed.
pub fn upsert_budget(
    user_id: UserID,
    amount: f64,
    period: BudgetPeriod,
    connection: &Connection,
) -> Result<Budget, Error> {
    connection
        .prepare(
            "INSERT INTO budget (amount, period, user_id) VALUES (?1, ?2, ?3)
             ON CONFLICT(user_id) DO UPDATE SET amount = excluded.amount, period = excluded.period
             RETURNING id, user_id, amount, period",
        )?
        .query_row((amount, period, user_id.as_i64()), map_row)
        .map_err(|error| error.into())
}

/// Delete the budget of `user_id`.
///
/// Returns whether there was a budget to delete.
pub fn delete_budget(user_id: UserID, connection: &Connection) -> Result<bool, Error> {
    let rows_affected =
        connection.execute("DELETE FROM budget WHERE user_id = ?1", [user_id.as_i64()])?;

    Ok(rows_affected > 0)
}

/// A budget along with how much of it has been spent.
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetOverview {
    /// The user's budget.
    pub budget: Budget,
    /// The spending in the current period.
    pub status: BudgetStatus,
}

/// Get the budget of `user_id` and how much of it has been spent in the period containing
/// `today`, or `None` if they have not set a budget.
pub fn get_budget_overview(
    user_id: UserID,
    today: Date,
    connection: &Connection,
) -> Result<Option<BudgetOverview>, Error> {
    let Some(budget) = get_budget(user_id, connection)? else {
        return Ok(None);
    };

    let start = budget.period.start(today);
    let expenses = get_expenses_between(user_id, start, Date::MAX, connection)?;
    let status = compute_budget_status(&budget, &expenses, today);

    Ok(Some(BudgetOverview { budget, status }))
}

fn map_row(row: &Row) -> Result<Budget, rusqlite::Error> {
    Ok(Budget {
        id: row.get(0)?,
        user_id: UserID::new(row.get(1)?),
        amount: row.get(2)?,
        period: row.get(3)?,
    })
}
