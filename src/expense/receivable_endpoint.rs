//! Defines the endpoint for recording that a friend has paid back their share.

use axum::{
    Extension,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::PrivateCookieJar;
use rusqlite::Connection;

use crate::{
    Error,
    alert::Alert,
    endpoints,
    expense::{
        ExpenseEndpointState, Receivable, ReceivableId,
        core::{get_owned_receivable, mark_receivable_paid},
    },
    flash::set_flash,
    user::UserID,
};

fn mark_owned_receivable_paid(
    user_id: UserID,
    receivable_id: ReceivableId,
    connection: &Connection,
) -> Result<Receivable, Error> {
    let receivable = get_owned_receivable(user_id, receivable_id, connection)?;
    mark_receivable_paid(receivable_id, connection)?;

    Ok(receivable)
}

/// A route handler for marking a receivable as paid, redirects to the dashboard.
///
/// Marking a receivable that is already paid has no further effect.
pub async fn mark_paid_endpoint(
    State(state): State<ExpenseEndpointState>,
    Extension(user_id): Extension<UserID>,
    Path(receivable_id): Path<ReceivableId>,
    jar: PrivateCookieJar,
) -> Response {
    let result = match state.db_connection.lock() {
        Ok(connection) => mark_owned_receivable_paid(user_id, receivable_id, &connection),
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            Err(Error::DatabaseLockError)
        }
    };

    let alert = match result {
        Ok(receivable) => Alert::success(format!(
            "Payment from {} marked as paid!",
            receivable.person_name
        )),
        Err(error) => Alert::error(error.user_message()),
    };

    (set_flash(jar, alert), Redirect::to(endpoints::DASHBOARD_VIEW)).into_response()
}
