//! Defines the endpoint for deleting an expense.

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
        ExpenseEndpointState, ExpenseId,
        core::{delete_expense, get_owned_expense},
    },
    flash::set_flash,
    user::UserID,
};

fn delete_owned_expense(
    user_id: UserID,
    expense_id: ExpenseId,
    connection: &Connection,
) -> Result<(), Error> {
    get_owned_expense(user_id, expense_id, connection)?;

    let transaction = connection.unchecked_transaction()?;
    delete_expense(expense_id, &transaction)?;
    transaction.commit()?;

    Ok(())
}

/// A route handler for deleting an expense and its receivables, redirects to the dashboard.
pub async fn delete_expense_endpoint(
    State(state): State<ExpenseEndpointState>,
    Extension(user_id): Extension<UserID>,
    Path(expense_id): Path<ExpenseId>,
    jar: PrivateCookieJar,
) -> Response {
    let result = match state.db_connection.lock() {
        Ok(connection) => delete_owned_expense(user_id, expense_id, &connection),
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            Err(Error::DatabaseLockError)
        }
    };

    let alert = match result {
        Ok(()) => Alert::success("Expense deleted successfully."),
        Err(Error::Forbidden) => Alert::error("You can only delete your own expenses."),
        Err(error) => Alert::error(error.user_message()),
    };

    (set_flash(jar, alert), Redirect::to(endpoints::DASHBOARD_VIEW)).into_response()
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Extension,
        extract::{Path, State},
        http::StatusCode,
    };
    use axum_extra::extract::PrivateCookieJar;
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error,
        alert::Alert,
        app_state::create_cookie_key,
        db::initialize,
        endpoints,
        expense::{
            ExpenseEndpointState, NewExpense, SplitShare, create_expense, get_expense,
            get_receivables_for_expense,
        },
        tag::TagName,
        test_utils::{create_test_user, get_flash, get_header},
        user::create_user,
    };

    use super::delete_expense_endpoint;

    fn split_dinner() -> NewExpense {
        NewExpense {
            date: date!(2024 - 03 - 01),
            description: "Dinner".to_owned(),
            total_amount: 100.0,
            tag: TagName::new_unchecked("food"),
            splits: vec![SplitShare {
                person_name: "Sam".to_owned(),
                amount: 30.0,
            }],
        }
    }

    fn get_state(connection: Connection) -> ExpenseEndpointState {
        ExpenseEndpointState {
            cookie_key: create_cookie_key("foobar"),
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    #[tokio::test]
    async fn deletes_expense_and_receivables() {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        let user = create_test_user(&connection);
        let expense = create_expense(user.id, &split_dinner(), &connection).unwrap();
        let state = get_state(connection);
        let jar = PrivateCookieJar::new(state.cookie_key.clone());

        let response =
            delete_expense_endpoint(State(state.clone()), Extension(user.id), Path(expense.id), jar)
                .await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(get_header(&response, "location"), endpoints::DASHBOARD_VIEW);
        assert_eq!(
            get_flash(&response, &state.cookie_key),
            Some(Alert::success("Expense deleted successfully."))
        );
        let connection = state.db_connection.lock().unwrap();
        assert_eq!(get_expense(expense.id, &connection), Err(Error::NotFound));
        assert_eq!(get_receivables_for_expense(expense.id, &connection), Ok(vec![]));
    }

    #[tokio::test]
    async fn cannot_delete_other_users_expense() {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        let alice = create_test_user(&connection);
        let bob = create_user("bob", "password", &connection).unwrap();
        let expense = create_expense(alice.id, &split_dinner(), &connection).unwrap();
        let state = get_state(connection);
        let jar = PrivateCookieJar::new(state.cookie_key.clone());

        let response =
            delete_expense_endpoint(State(state.clone()), Extension(bob.id), Path(expense.id), jar)
                .await;

        assert_eq!(
            get_flash(&response, &state.cookie_key),
            Some(Alert::error("You can only delete your own expenses."))
        );
        let connection = state.db_connection.lock().unwrap();
        assert_eq!(get_expense(expense.id, &connection), Ok(expense));
    }

    #[tokio::test]
    async fn deleting_missing_expense_reports_error() {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        let user = create_test_user(&connection);
        let state = get_state(connection);
        let jar = PrivateCookieJar::new(state.cookie_key.clone());

        let response =
            delete_expense_endpoint(State(state.clone()), Extension(user.id), Path(42), jar).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            get_flash(&response, &state.cookie_key),
            Some(Alert::error("The requested resource could not be found."))
        );
    }
}
