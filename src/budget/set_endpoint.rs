//! Defines the endpoint for setting or removing the user's budget.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    http::HeaderMap,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::{Form, PrivateCookieJar, cookie::Key};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    alert::Alert,
    auth::referer_redirect_path,
    budget::{
        core::BudgetPeriod,
        db::{delete_budget, upsert_budget},
    },
    expense::parse_amount,
    flash::set_flash,
    user::UserID,
};

/// The state needed for setting a budget.
#[derive(Debug, Clone)]
pub struct BudgetState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The database connection for managing budgets.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for BudgetState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<BudgetState> for Key {
    fn from_ref(state: &BudgetState) -> Self {
        state.cookie_key.clone()
    }
}

/// The raw data submitted by the budget form.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct BudgetForm {
    /// The budget amount, blank or zero to remove the budget.
    #[serde(default)]
    pub budget_amount: String,
    /// Either "weekly" or "monthly".
    #[serde(default)]
    pub budget_period: String,
}

#[derive(Debug, PartialEq)]
enum BudgetChange {
    Updated,
    Removed,
    Unchanged,
}

fn apply_budget_form(
    user_id: UserID,
    form: &BudgetForm,
    connection: &Connection,
) -> Result<BudgetChange, Error> {
    let amount = match form.budget_amount.trim() {
        "" => 0.0,
        text => parse_amount(text)?,
    };
    let period: BudgetPeriod = form.budget_period.trim().parse()?;

    if amount < 0.0 {
        return Err(Error::InvalidBudget);
    }

    // A zero amount removes the budget.
    if amount == 0.0 {
        return match delete_budget(user_id, connection)? {
            true => Ok(BudgetChange::Removed),
            false => Ok(BudgetChange::Unchanged),
        };
    }

    upsert_budget(user_id, amount, period, connection)?;

    Ok(BudgetChange::Updated)
}

/// A route handler for the budget form.
///
/// Redirects back to the page the form was submitted from, or the dashboard if that is unknown.
pub async fn set_budget_endpoint(
    State(state): State<BudgetState>,
    Extension(user_id): Extension<UserID>,
    headers: HeaderMap,
    jar: PrivateCookieJar,
    Form(form): Form<BudgetForm>,
) -> Response {
    let result = match state.db_connection.lock() {
        Ok(connection) => apply_budget_form(user_id, &form, &connection),
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            Err(Error::DatabaseLockError)
        }
    };

    let alert = match result {
        Ok(BudgetChange::Updated) => Some(Alert::success("Budget updated successfully!")),
        Ok(BudgetChange::Removed) => Some(Alert::success("Budget removed successfully!")),
        Ok(BudgetChange::Unchanged) => None,
        Err(Error::InvalidAmount) => {
            Some(Alert::error("Invalid amount. Please enter a valid number."))
        }
        Err(error) => Some(Alert::error(error.user_message())),
    };

    let jar = match alert {
        Some(alert) => set_flash(jar, alert),
        None => jar,
    };

    (jar, Redirect::to(&referer_redirect_path(&headers))).into_response()
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Extension,
        extract::State,
        http::{HeaderMap, HeaderValue, StatusCode, header::REFERER},
    };
    use axum_extra::extract::{Form, PrivateCookieJar};
    use rusqlite::Connection;

    use crate::{
        Error,
        alert::Alert,
        app_state::create_cookie_key,
        budget::{BudgetPeriod, get_budget, upsert_budget},
        db::initialize,
        endpoints,
        test_utils::{create_test_user, get_flash, get_header},
        user::UserID,
    };

    use super::{BudgetChange, BudgetForm, BudgetState, apply_budget_form, set_budget_endpoint};

    fn get_connection() -> (Connection, UserID) {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        let user = create_test_user(&connection);
        (connection, user.id)
    }

    fn form(amount: &str, period: &str) -> BudgetForm {
        BudgetForm {
            budget_amount: amount.to_owned(),
            budget_period: period.to_owned(),
        }
    }

    #[test]
    fn sets_and_updates_budget() {
        let (connection, user_id) = get_connection();

        assert_eq!(
            apply_budget_form(user_id, &form("200", "monthly"), &connection),
            Ok(BudgetChange::Updated)
        );
        assert_eq!(
            apply_budget_form(user_id, &form("50", "weekly"), &connection),
            Ok(BudgetChange::Updated)
        );

        let budget = get_budget(user_id, &connection).unwrap().unwrap();
        assert_eq!(budget.amount, 50.0);
        assert_eq!(budget.period, BudgetPeriod::Weekly);
    }

    #[test]
    fn zero_or_blank_amount_removes_budget() {
        let (connection, user_id) = get_connection();
        upsert_budget(user_id, 200.0, BudgetPeriod::Monthly, &connection).unwrap();

        assert_eq!(
            apply_budget_form(user_id, &form("0", "monthly"), &connection),
            Ok(BudgetChange::Removed)
        );
        assert_eq!(
            apply_budget_form(user_id, &form("", "monthly"), &connection),
            Ok(BudgetChange::Unchanged)
        );
        assert_eq!(get_budget(user_id, &connection), Ok(None));
    }

    #[test]
    fn rejects_negative_amount_and_unknown_period() {
        let (connection, user_id) = get_connection();

        assert_eq!(
            apply_budget_form(user_id, &form("-5", "monthly"), &connection),
            Err(Error::InvalidBudget)
        );
        assert_eq!(
            apply_budget_form(user_id, &form("100", "daily"), &connection),
            Err(Error::InvalidBudget)
        );
        assert_eq!(get_budget(user_id, &connection), Ok(None));
    }

    #[tokio::test]
    async fn redirects_to_referer() {
        let (connection, user_id) = get_connection();
        let state = BudgetState {
            cookie_key: create_cookie_key("foobar"),
            db_connection: Arc::new(Mutex::new(connection)),
        };
        let mut headers = HeaderMap::new();
        headers.insert(REFERER, HeaderValue::from_static(endpoints::REPORTS_VIEW));
        let jar = PrivateCookieJar::new(state.cookie_key.clone());

        let response = set_budget_endpoint(
            State(state.clone()),
            Extension(user_id),
            headers,
            jar,
            Form(form("200", "monthly")),
        )
        .await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(get_header(&response, "location"), endpoints::REPORTS_VIEW);
        assert_eq!(
            get_flash(&response, &state.cookie_key),
            Some(Alert::success("Budget updated successfully!"))
        );
    }

    #[tokio::test]
    async fn bad_amount_redirects_to_dashboard_with_error() {
        let (connection, user_id) = get_connection();
        let state = BudgetState {
            cookie_key: create_cookie_key("foobar"),
            db_connection: Arc::new(Mutex::new(connection)),
        };
        let jar = PrivateCookieJar::new(state.cookie_key.clone());

        let response = set_budget_endpoint(
            State(state.clone()),
            Extension(user_id),
            HeaderMap::new(),
            jar,
            Form(form("lots", "monthly")),
        )
        .await;

        assert_eq!(get_header(&response, "location"), endpoints::DASHBOARD_VIEW);
        assert_eq!(
            get_flash(&response, &state.cookie_key),
            Some(Alert::error("Invalid amount. Please enter a valid number."))
        );
    }
}
