//! The reports page: spending per tag, the budget overview and the period comparison widget.

use std::{
    collections::BTreeMap,
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

use crate::{
    AppState, Error,
    budget::{BudgetOverview, budget_card, get_budget_overview},
    endpoints,
    expense::get_user_expenses,
    flash::take_flash,
    html::{
        BUTTON_PRIMARY_STYLE, CARD_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, HeadElement,
        base, flash_message, format_currency,
    },
    navigation::NavBar,
    report::{
        aggregation::aggregate_by_tag,
        charts::{ECHARTS_URL, ReportChart, chart_script, chart_view, spending_by_tag_chart},
    },
    timezone::local_today,
    user::UserID,
};

/// The state needed for the reports page.
#[derive(Debug, Clone)]
pub struct ReportsState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The database connection for reading expenses and budgets.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for ReportsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<ReportsState> for Key {
    fn from_ref(state: &ReportsState) -> Self {
        state.cookie_key.clone()
    }
}

struct ReportData {
    tag_totals: BTreeMap<String, f64>,
    budget: Option<BudgetOverview>,
}

fn load_report_data(
    user_id: UserID,
    local_timezone: &str,
    connection: &Connection,
) -> Result<ReportData, Error> {
    let today = local_today(local_timezone)?;
    let expenses = get_user_expenses(user_id, connection)?;

    Ok(ReportData {
        tag_totals: aggregate_by_tag(&expenses),
        budget: get_budget_overview(user_id, today, connection)?,
    })
}

fn tag_totals_table(tag_totals: &BTreeMap<String, f64>) -> Markup {
    html! {
        table class="w-full mt-4 text-sm text-left" id="tag-totals"
        {
            tbody
            {
                @for (tag, total) in tag_totals {
                    tr class="border-b dark:border-gray-700"
                    {
                        td class="py-2" { (tag) }
                        td class="py-2 text-right" { (format_currency(*total)) }
                    }
                }
            }
        }
    }
}

fn date_input(name: &str, label: &str) -> Markup {
    html! {
        div
        {
            label for=(name) class=(FORM_LABEL_STYLE) { (label) }
            input name=(name) id=(name) type="date" required class=(FORM_TEXT_INPUT_STYLE);
        }
    }
}

fn comparison_widget() -> Markup {
    html! {
        section id="comparison" class=(CARD_STYLE)
        {
            h2 class="mb-3 text-xl font-bold" { "Compare periods" }

            form
                id="comparison-form"
                method="get"
                action=(endpoints::COMPARISON_DATA)
                class="grid grid-cols-1 gap-4 md:grid-cols-2"
            {
                fieldset class="space-y-2"
                {
                    legend class="font-semibold" { "Period 1" }
                    (date_input("p1_start", "Start"))
                    (date_input("p1_end", "End"))
                }

                fieldset class="space-y-2"
                {
                    legend class="font-semibold" { "Period 2" }
                    (date_input("p2_start", "Start"))
                    (date_input("p2_end", "End"))
                }

                div class="md:col-span-2"
                {
                    button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Compare" }
                }
            }

            div id="comparison-results" class="mt-4" {}
        }
    }
}

/// Display the reports page for the logged-in user.
pub async fn get_reports_page(
    State(state): State<ReportsState>,
    Extension(user_id): Extension<UserID>,
    jar: PrivateCookieJar,
) -> Response {
    let data = match state.db_connection.lock() {
        Ok(connection) => load_report_data(user_id, &state.local_timezone, &connection),
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

    let chart = ReportChart {
        id: "spending-by-tag-chart",
        options: spending_by_tag_chart(&data.tag_totals).to_string(),
    };

    let content = html! {
        (NavBar::new(endpoints::REPORTS_VIEW).into_html())

        main class="flex flex-col items-center gap-4 px-4 py-6 mx-auto max-w-5xl"
        {
            (flash_message(alert))

            section id="tag-report" class=(CARD_STYLE)
            {
                h2 class="mb-3 text-xl font-bold" { "Spending by tag" }
                (chart_view(&chart, data.tag_totals.is_empty()))
                (tag_totals_table(&data.tag_totals))
            }

            (budget_card(data.budget.as_ref()))

            (comparison_widget())
        }
    };

    let head_elements = [
        HeadElement::ScriptLink(ECHARTS_URL.to_owned()),
        chart_script(&chart),
    ];

    (jar, base("Reports", &head_elements, &content)).into_response()
}
