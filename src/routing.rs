//! Application router configuration with protected and unprotected route definitions.

use axum::{
    Router, middleware,
    routing::{get, post},
};
use tower_http::services::ServeDir;

use crate::{
    AppState,
    auth::{
        auth_guard, auth_guard_json, get_log_in_page, get_log_out, get_sign_up_page, post_log_in,
        post_sign_up,
    },
    budget::set_budget_endpoint,
    csv_import::upload_csv_endpoint,
    dashboard::get_dashboard_page,
    endpoints,
    expense::{
        add_expense_endpoint, delete_expense_endpoint, edit_expense_endpoint,
        get_expense_endpoint, mark_paid_endpoint,
    },
    home::get_home_page,
    not_found::get_404_not_found,
    report::{get_comparison_data_endpoint, get_reports_page},
    tag::{add_tag_endpoint, delete_tag_endpoint},
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let unprotected_routes = Router::new()
        .route(endpoints::ROOT, get(get_home_page))
        .route(endpoints::LOG_IN, get(get_log_in_page).post(post_log_in))
        .route(endpoints::SIGN_UP, get(get_sign_up_page).post(post_sign_up))
        .route(endpoints::LOG_OUT, get(get_log_out));

    let protected_routes = Router::new()
        .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_page))
        .route(endpoints::REPORTS_VIEW, get(get_reports_page))
        .route(endpoints::ADD_EXPENSE, post(add_expense_endpoint))
        .route(endpoints::DELETE_EXPENSE, get(delete_expense_endpoint))
        .route(endpoints::EDIT_EXPENSE, post(edit_expense_endpoint))
        .route(endpoints::MARK_PAID, post(mark_paid_endpoint))
        .route(endpoints::SET_BUDGET, post(set_budget_endpoint))
        .route(endpoints::UPLOAD_CSV, post(upload_csv_endpoint))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_guard));

    // The widgets that call these routes with `fetch` expect JSON, not a redirect to the log-in page.
    let json_routes = Router::new()
        .route(endpoints::GET_EXPENSE, get(get_expense_endpoint))
        .route(endpoints::ADD_TAG, post(add_tag_endpoint))
        .route(endpoints::DELETE_TAG, post(delete_tag_endpoint))
        .route(endpoints::COMPARISON_DATA, get(get_comparison_data_endpoint))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_guard_json,
        ));

    protected_routes
        .merge(json_routes)
        .merge(unprotected_routes)
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .with_state(state)
}
