//! Dashboard HTTP handler and page layout.

use std::{
    collections::{BTreeSet, HashMap},
    sync::{Arc, Mutex},
};

use axum::{
    Extension,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use maud::{Markup, html};
use rusqlite::Connection;
use time::Date;

use crate::{
    AppState, Error,
    alert::Alert,
    budget::{BudgetOverview, budget_card, get_budget_overview},
    dashboard::{
        cards::summary_cards,
        tables::{ExpenseRow, expenses_table},
        widgets::{csv_upload_form, edit_expense_dialog, tag_manager},
    },
    endpoints,
    expense::{ExpenseId, Receivable, add_expense_form, get_total_owed, get_user_expenses, get_user_receivables},
    flash::take_flash,
    html::{CARD_STYLE, base, flash_message},
    navigation::NavBar,
    tag::{TagName, get_tag_names},
    timezone::local_today,
    user::UserID,
};

/// The state needed for displaying the dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The database connection for reading expenses, tags and budgets.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<DashboardState> for Key {
    fn from_ref(state: &DashboardState) -> Self {
        state.cookie_key.clone()
    }
}

struct DashboardData {
    rows: Vec<ExpenseRow>,
    total_spent: f64,
    total_owed: f64,
    tags: Vec<TagName>,
    /// The user's tags plus any tags used by their expenses, e.g. from a CSV import.
    edit_tags: Vec<TagName>,
    budget: Option<BudgetOverview>,
    today: Date,
}

fn load_dashboard_data(
    user_id: UserID,
    local_timezone: &str,
    connection: &Connection,
) -> Result<DashboardData, Error> {
    let today = local_today(local_timezone)?;
    let expenses = get_user_expenses(user_id, connection)?;

    let mut receivables_by_expense: HashMap<ExpenseId, Vec<Receivable>> = HashMap::new();
    for receivable in get_user_receivables(user_id, connection)? {
        receivables_by_expense
            .entry(receivable.expense_id)
            .or_default()
            .push(receivable);
    }

    let tags = get_tag_names(user_id, connection)?;
    let edit_tags: Vec<TagName> = tags
        .iter()
        .chain(expenses.iter().map(|expense| &expense.tag))
        .cloned()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let total_spent = expenses.iter().map(|expense| expense.own_amount).sum();
    let rows = expenses
        .into_iter()
        .map(|expense| ExpenseRow {
            receivables: receivables_by_expense
                .remove(&expense.id)
                .unwrap_or_default(),
            expense,
        })
        .collect();

    Ok(DashboardData {
        rows,
        total_spent,
        total_owed: get_total_owed(user_id, connection)?,
        tags,
        edit_tags,
        budget: get_budget_overview(user_id, today, connection)?,
        today,
    })
}

fn dashboard_view(data: &DashboardData, alert: Option<Alert>) -> Markup {
    let content = html! {
        (NavBar::new(endpoints::DASHBOARD_VIEW).into_html())

        main class="flex flex-col items-center gap-6 px-4 py-6 mx-auto max-w-6xl text-gray-900 dark:text-white"
        {
            (flash_message(alert))

            (summary_cards(data.total_spent, data.total_owed))

            div class="grid w-full grid-cols-1 gap-6 lg:grid-cols-2"
            {
                section id="add-expense" class=(CARD_STYLE)
                {
                    h2 class="mb-3 text-xl font-bold" { "Add expense" }
                    (add_expense_form(endpoints::ADD_EXPENSE, data.today, &data.tags))
                }

                div class="flex flex-col gap-6"
                {
                    (budget_card(data.budget.as_ref()))
                    (tag_manager(&data.tags))
                    (csv_upload_form())
                }
            }

            (expenses_table(&data.rows))
        }

        (edit_expense_dialog(&data.edit_tags))
    };

    base("Dashboard", &[], &content)
}

/// Display the dashboard for the logged-in user.
pub async fn get_dashboard_page(
    State(state): State<DashboardState>,
    Extension(user_id): Extension<UserID>,
    jar: PrivateCookieJar,
) -> Response {
    let data = match state.db_connection.lock() {
        Ok(connection) => load_dashboard_data(user_id, &state.local_timezone, &connection),
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            Err(Error::DatabaseLockError)
        }
    };

    let data = match data {
        Ok(data) => data,
        Err(error) => return error.into_response(),
    };

    let (jar, alert) = take_flash(jar);

    (jar, dashboard_view(&data, alert)).into_response()
}
