//! Reports on the user's spending: totals per tag and the comparison of two periods.

mod aggregation;
mod charts;
mod comparison_endpoint;
mod reports_page;

pub use comparison_endpoint::get_comparison_data_endpoint;
pub use reports_page::get_reports_page;
