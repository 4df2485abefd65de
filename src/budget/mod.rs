//! Weekly or monthly spending limits and how much of them has been used.

mod core;
mod db;
mod set_endpoint;
mod view;

pub use core::BudgetPeriod;
pub use db::{BudgetOverview, create_budget_table, get_budget_overview};
pub use set_endpoint::set_budget_endpoint;
pub use view::budget_card;

#[cfg(test)]
pub use core::{Budget, BudgetStatus};
#[cfg(test)]
pub use db::{get_budget, upsert_budget};
