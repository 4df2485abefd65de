//! Defines the endpoints used by the edit dialog: one to load an expense as JSON and one to
//! save the changes.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, Path, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::{Form, PrivateCookieJar};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    alert::Alert,
    endpoints,
    expense::{
        ExpenseEndpointState, ExpenseForm, ExpenseId,
        core::{get_owned_expense, get_receivables_for_expense, update_expense},
    },
    flash::set_flash,
    user::UserID,
};

/// The state needed to load an expense for editing.
#[derive(Debug, Clone)]
pub struct GetExpenseState {
    /// The database connection for reading expenses.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for GetExpenseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A person's share of an expense as sent to the edit dialog.
#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct ReceivableJson {
    /// Who owes the share.
    pub person_name: String,
    /// How much they owe.
    pub amount: f64,
}

/// An expense as sent to the edit dialog.
#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct ExpenseJson {
    /// The ID of the expense.
    pub id: ExpenseId,
    /// The date of the expense as `YYYY-MM-DD`.
    pub date: String,
    /// What the money was spent on.
    pub description: String,
    /// The full amount paid.
    pub total_amount: f64,
    /// The name of the expense's tag.
    pub tag: String,
    /// Whether the expense has any receivables.
    pub is_split: bool,
    /// The shares of the other people, in the order they were entered.
    pub receivables: Vec<ReceivableJson>,
}

fn load_expense_json(
    user_id: UserID,
    expense_id: ExpenseId,
    connection: &Connection,
) -> Result<ExpenseJson, Error> {
    let expense = get_owned_expense(user_id, expense_id, connection)?;
    let receivables = get_receivables_for_expense(expense_id, connection)?;

    Ok(ExpenseJson {
        id: expense.id,
        date: expense.date.to_string(),
        description: expense.description,
        total_amount: expense.total_amount,
        tag: expense.tag.to_string(),
        is_split: !receivables.is_empty(),
        receivables: receivables
            .into_iter()
            .map(|receivable| ReceivableJson {
                person_name: receivable.person_name,
                amount: receivable.amount,
            })
            .collect(),
    })
}

/// Return the expense `expense_id` as JSON so the edit dialog can be filled in.
///
/// Responds with 403 if the expense belongs to another user and 404 if it does not exist.
pub async fn get_expense_endpoint(
    State(state): State<GetExpenseState>,
    Extension(user_id): Extension<UserID>,
    Path(expense_id): Path<ExpenseId>,
) -> Response {
    let result = match state.db_connection.lock() {
        Ok(connection) => load_expense_json(user_id, expense_id, &connection),
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            Err(Error::DatabaseLockError)
        }
    };

    match result {
        Ok(expense) => Json(expense).into_response(),
        Err(error) => error.into_json_response(),
    }
}

fn save_expense(
    user_id: UserID,
    expense_id: ExpenseId,
    form: &ExpenseForm,
    connection: &Connection,
) -> Result<(), Error> {
    get_owned_expense(user_id, expense_id, connection)?;

    let expense = form.validate()?;

    let transaction = connection.unchecked_transaction()?;
    update_expense(expense_id, &expense, &transaction)?;
    transaction.commit()?;

    Ok(())
}

/// A route handler for saving the edit dialog, redirects to the dashboard with a flash message.
///
/// The expense's receivables are replaced with the submitted split.
pub async fn edit_expense_endpoint(
    State(state): State<ExpenseEndpointState>,
    Extension(user_id): Extension<UserID>,
    Path(expense_id): Path<ExpenseId>,
    jar: PrivateCookieJar,
    Form(form): Form<ExpenseForm>,
) -> Response {
    let result = match state.db_connection.lock() {
        Ok(connection) => save_expense(user_id, expense_id, &form, &connection),
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            Err(Error::DatabaseLockError)
        }
    };

    let alert = match result {
        Ok(()) => Alert::success("Expense updated successfully!"),
        Err(Error::Forbidden) => Alert::error("You do not have permission to edit this expense."),
        Err(Error::InvalidAmount) => Alert::error("Invalid data provided. Please check the amounts."),
        Err(error) => Alert::error(error.user_message()),
    };

    (set_flash(jar, alert), Redirect::to(endpoints::DASHBOARD_VIEW)).into_response()
}
