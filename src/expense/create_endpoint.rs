//! Defines the endpoint for adding a new expense from the dashboard.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    response::{IntoResponse, Redirect, Response},
};
// axum_extra's Form collects the repeated `split_names[]` and `split_shares[]` fields.
use axum_extra::extract::{Form, PrivateCookieJar, cookie::Key};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    alert::Alert,
    endpoints,
    expense::{ExpenseForm, core::create_expense},
    flash::set_flash,
    user::UserID,
};

/// The state needed by the endpoints that change an expense and then redirect.
#[derive(Debug, Clone)]
pub struct ExpenseEndpointState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The database connection for managing expenses.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ExpenseEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<ExpenseEndpointState> for Key {
    fn from_ref(state: &ExpenseEndpointState) -> Self {
        state.cookie_key.clone()
    }
}

/// A route handler for adding an expense, redirects to the dashboard with a flash message.
///
/// The expense and its receivables are stored in one transaction, so nothing is stored if
/// the form is invalid.
pub async fn add_expense_endpoint(
    State(state): State<ExpenseEndpointState>,
    Extension(user_id): Extension<UserID>,
    jar: PrivateCookieJar,
    Form(form): Form<ExpenseForm>,
) -> Response {
    let result = form.validate().and_then(|expense| {
        let connection = state.db_connection.lock().map_err(|error| {
            tracing::error!("could not acquire database lock: {error}");
            Error::DatabaseLockError
        })?;

        let transaction = connection.unchecked_transaction()?;
        let created = create_expense(user_id, &expense, &transaction)?;
        transaction.commit()?;

        Ok(created)
    });

    let alert = match result {
        Ok(expense) => {
            tracing::debug!("User {user_id} added expense {}", expense.id);
            Alert::success("Expense added successfully!")
        }
        Err(error) => Alert::error(error.user_message()),
    };

    (set_flash(jar, alert), Redirect::to(endpoints::DASHBOARD_VIEW)).into_response()
}
