//! Database initialisation.

use rusqlite::Connection;

use crate::{
    Error,
    budget::create_budget_table,
    expense::{create_expense_table, create_receivable_table},
    tag::create_tag_table,
    user::create_user_table,
};

/// Create the tables for all the domain models if they do not already exist.
///
/// Foreign key enforcement is switched on for `connection` first, since
/// deleting a user or an expense relies on `ON DELETE CASCADE`.
///
/// # Errors
///
/// Returns an error if a table could not be created.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    // This pragma is a no-op inside a transaction, so it must be set first.
    connection.pragma_update(None, "foreign_keys", "ON")?;

    let transaction = connection.unchecked_transaction()?;

    create_user_table(&transaction)?;
    create_tag_table(&transaction)?;
    create_expense_table(&transaction)?;
    create_receivable_table(&transaction)?;
    create_budget_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}
