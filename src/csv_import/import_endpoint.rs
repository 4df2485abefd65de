//! Defines the endpoint for importing expenses from an uploaded CSV file.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Multipart, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    alert::Alert,
    csv_import::csv::parse_expense_csv,
    endpoints,
    expense::{NewExpense, create_expense},
    flash::set_flash,
    user::UserID,
};

/// The name of the form field holding the CSV file.
const CSV_FIELD_NAME: &str = "csv_file";

/// The state needed for importing expenses.
#[derive(Debug, Clone)]
pub struct ImportState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The database connection for storing the imported expenses.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ImportState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<ImportState> for Key {
    fn from_ref(state: &ImportState) -> Self {
        state.cookie_key.clone()
    }
}

/// Find the CSV file in the form and read it as text.
async fn read_csv_field(multipart: &mut Multipart) -> Result<String, Error> {
    while let Some(field) = multipart.next_field().await.map_err(|error| {
        tracing::error!("Could not read multipart form: {error}");
        Error::MultipartError(error.body_text())
    })? {
        if field.name() != Some(CSV_FIELD_NAME) {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_owned();

        if file_name.is_empty() {
            return Err(Error::NoSelectedFile);
        }

        if !file_name.ends_with(".csv") {
            return Err(Error::NotCSV);
        }

        let bytes = field.bytes().await.map_err(|error| {
            tracing::error!("Could not read data from multipart form field: {error}");
            Error::MultipartError(error.body_text())
        })?;

        let text = String::from_utf8(bytes.to_vec()).map_err(|error| {
            tracing::warn!("Rejecting file '{file_name}' that is not valid UTF-8: {error}");
            Error::InvalidCSV(format!("the file is not valid UTF-8 text ({error})"))
        })?;

        tracing::debug!("Received file '{}' that is {} bytes", file_name, text.len());

        return Ok(text);
    }

    Err(Error::MissingFile)
}

/// Store `expenses` for `user_id`, all or nothing.
///
/// Returns the number of expenses imported.
fn import_expenses(
    user_id: UserID,
    expenses: &[NewExpense],
    connection: &Connection,
) -> Result<usize, Error> {
    let transaction = connection.unchecked_transaction()?;

    for expense in expenses {
        create_expense(user_id, expense, &transaction)?;
    }

    transaction.commit()?;

    Ok(expenses.len())
}

/// Route handler for importing expenses from a CSV file, redirects to the dashboard.
///
/// Nothing is imported if any row of the file is invalid.
pub async fn upload_csv_endpoint(
    State(state): State<ImportState>,
    Extension(user_id): Extension<UserID>,
    jar: PrivateCookieJar,
    mut multipart: Multipart,
) -> Response {
    let result = match read_csv_field(&mut multipart).await {
        Ok(text) => parse_expense_csv(&text).and_then(|expenses| {
            let connection = state.db_connection.lock().map_err(|error| {
                tracing::error!("could not acquire database lock: {error}");
                Error::DatabaseLockError
            })?;

            import_expenses(user_id, &expenses, &connection)
        }),
        Err(error) => Err(error),
    };

    let alert = match result {
        Ok(count) => {
            tracing::info!("User {user_id} imported {count} expenses");
            Alert::success(format!(
                "CSV file successfully imported! ({count} expenses)"
            ))
        }
        Err(error) => Alert::error(error.user_message()),
    };

    (set_flash(jar, alert), Redirect::to(endpoints::DASHBOARD_VIEW)).into_response()
}
