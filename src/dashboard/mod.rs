//! The dashboard: the user's expenses, totals, budget and tags on one page.

mod cards;
mod handlers;
mod tables;
mod widgets;

pub use handlers::get_dashboard_page;
