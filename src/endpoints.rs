//! The endpoint URIs.
//!
//! For endpoints that take a parameter, e.g., '/delete/{expense_id}', use [format_endpoint].

/// The landing page.
pub const ROOT: &str = "/";
/// The main page for logged in users.
pub const DASHBOARD_VIEW: &str = "/dashboard";
/// The page with charts of spending by tag and the period comparison.
pub const REPORTS_VIEW: &str = "/reports";
/// The route for getting the log in page and logging in.
pub const LOG_IN: &str = "/login";
/// The route for getting the sign up page and creating an account.
pub const SIGN_UP: &str = "/signup";
/// The route for the client to log out the current user.
pub const LOG_OUT: &str = "/logout";
/// The route for static files.
pub const STATIC: &str = "/static";

/// The route to create an expense.
pub const ADD_EXPENSE: &str = "/add";
/// The route to delete an expense.
pub const DELETE_EXPENSE: &str = "/delete/{expense_id}";
/// The route to mark money owed for a split expense as paid.
pub const MARK_PAID: &str = "/mark_paid/{receivable_id}";
/// The route to fetch an expense and its splits as JSON.
pub const GET_EXPENSE: &str = "/expense/get/{expense_id}";
/// The route to update an expense.
pub const EDIT_EXPENSE: &str = "/expense/edit/{expense_id}";
/// The route to add a tag.
pub const ADD_TAG: &str = "/tags/add";
/// The route to delete a tag.
pub const DELETE_TAG: &str = "/tags/delete";
/// The route to set or remove the budget.
pub const SET_BUDGET: &str = "/set_budget";
/// The route to compare spending over two date ranges.
pub const COMPARISON_DATA: &str = "/get_comparison_data";
/// The route to upload a CSV file of expenses.
pub const UPLOAD_CSV: &str = "/upload";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/delete/{expense_id}', '{expense_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_string();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map(|offset| param_start + offset + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}
