//! Expense Tracker is a web app for recording personal expenses, splitting
//! them with friends and keeping an eye on a weekly or monthly budget.
//!
//! This library provides a web server that directly serves HTML pages, plus a
//! few JSON endpoints used by the interactive widgets on those pages.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde_json::json;
use tokio::signal;

mod alert;
mod app_state;
mod auth;
mod budget;
mod csv_import;
mod dashboard;
mod db;
mod endpoints;
mod expense;
mod flash;
mod home;
mod html;
mod internal_server_error;
mod logging;
mod navigation;
mod not_found;
mod report;
mod routing;
mod tag;
mod timezone;
mod user;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use db::initialize as initialize_db;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use routing::build_router;
pub use timezone::get_local_offset;
pub use user::{User, UserID, delete_user, get_user_by_id};

use crate::{internal_server_error::InternalServerError, not_found::get_404_not_found_response};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
///
/// The display text of the variants the client can fix themselves is shown
/// to the user as is, e.g. in a flash message.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The username and password did not match a registered user.
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// The request did not carry a valid, unexpired session cookie.
    #[error("You need to log in to do that.")]
    NoSession,

    /// The session refers to a user that no longer exists.
    #[error("Your session was invalid. Please log in again.")]
    InvalidSession,

    /// An empty string was used as a username.
    #[error("Username cannot be empty.")]
    EmptyUsername,

    /// An empty string was used as a password.
    #[error("Password cannot be empty.")]
    EmptyPassword,

    /// The username is already taken by another user.
    #[error("Username already exists!")]
    DuplicateUsername,

    /// A monetary amount could not be parsed as a finite number.
    #[error("Invalid amount entered. Please enter a valid number.")]
    InvalidAmount,

    /// A date was not in the `YYYY-MM-DD` format.
    #[error("\"{0}\" is not a valid date, expected a date like 2024-01-31.")]
    InvalidDate(String),

    /// An expense was submitted without a tag.
    #[error("Please select a tag for the expense.")]
    MissingTag,

    /// An empty string was used to create a tag name.
    #[error("Tag name cannot be empty.")]
    EmptyTagName,

    /// The user already has a tag with this name.
    #[error("Tag '{0}' already exists.")]
    DuplicateTag(String),

    /// The tag cannot be deleted because one of the user's expenses uses it.
    #[error("Cannot delete tag '{0}' as it's currently in use.")]
    TagInUse(String),

    /// The user does not have a tag with the given name.
    #[error("Tag not found.")]
    TagNotFound,

    /// The shares owed by other people add up to the total amount or more,
    /// leaving nothing for the owner of the expense.
    #[error("Total of friends' shares cannot be greater than or equal to the total amount.")]
    SharesExceedTotal,

    /// A share of a split expense was zero or negative.
    #[error("All shares must be positive amounts.")]
    NonPositiveShare,

    /// A row of a split had a name without a share, or a share without a name.
    #[error("Each split needs both a name and a share.")]
    IncompleteSplit,

    /// The budget amount was negative or the period was not weekly or monthly.
    #[error("Invalid budget amount or period.")]
    InvalidBudget,

    /// One or more of the date range parameters of a comparison were missing.
    #[error("Missing date parameters")]
    MissingDateParameters,

    /// The resource belongs to another user.
    #[error("You do not have permission to modify this item.")]
    Forbidden,

    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("The requested resource could not be found.")]
    NotFound,

    /// The multipart form did not contain the CSV file field.
    #[error("No file part")]
    MissingFile,

    /// The CSV file field was submitted without a file.
    #[error("No selected file")]
    NoSelectedFile,

    /// The uploaded file does not have a `.csv` extension.
    #[error("Invalid file type. Please upload a .csv file.")]
    NotCSV,

    /// The CSV had issues that prevented it from being imported.
    #[error("An error occurred: {0}")]
    InvalidCSV(String),

    /// The multipart form could not be read.
    #[error("Could not read the uploaded file: {0}")]
    MultipartError(String),

    /// The session cookie could not be created.
    #[error("could not create the session cookie: {0}")]
    CookieError(String),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock.
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl Error {
    /// Whether the error was caused by the server rather than by the client's input.
    fn is_internal(&self) -> bool {
        matches!(
            self,
            Error::CookieError(_)
                | Error::SqlError(_)
                | Error::DatabaseLockError
                | Error::InvalidTimezoneError(_)
        )
    }

    /// The text that can be shown to the user for this error.
    ///
    /// Internal errors are logged and replaced with a generic message.
    pub(crate) fn user_message(&self) -> String {
        if self.is_internal() {
            tracing::error!("An unexpected error occurred: {self}");
            "Something went wrong, check the server logs for more details.".to_owned()
        } else {
            self.to_string()
        }
    }

    /// The HTTP status code to use when this error is returned from a JSON endpoint.
    fn status_code(&self) -> StatusCode {
        match self {
            Error::NoSession | Error::InvalidSession | Error::Forbidden => StatusCode::FORBIDDEN,
            Error::NotFound => StatusCode::NOT_FOUND,
            error if error.is_internal() => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }

    /// Convert the error into a JSON response of the form `{"error": "..."}`.
    pub(crate) fn into_json_response(self) -> Response {
        let status_code = self.status_code();
        let message = match self {
            Error::Forbidden => "Unauthorized".to_owned(),
            error => error.user_message(),
        };

        (status_code, Json(json!({ "error": message }))).into_response()
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => get_404_not_found_response(),
            Error::Forbidden => InternalServerError {
                description: "Forbidden",
                fix: "You do not have permission to view this page.",
            }
            .into_response_with_status(StatusCode::FORBIDDEN),
            Error::InvalidTimezoneError(timezone) => InternalServerError {
                description: "Invalid Timezone Settings",
                fix: &format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
            }
            .into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}
