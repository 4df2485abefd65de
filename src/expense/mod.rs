//! Expenses, the splitting of an expense among friends and the receivables that track
//! who still owes the user money.

mod core;
mod create_endpoint;
mod delete_endpoint;
mod edit_endpoint;
mod form;
mod receivable_endpoint;

pub use core::{
    Expense, ExpenseId, NewExpense, Receivable, ReceivableId, create_expense,
    create_expense_table, create_receivable_table, get_expenses_between, get_total_owed,
    get_user_expenses, get_user_receivables,
};
pub use create_endpoint::{ExpenseEndpointState, add_expense_endpoint};
pub use delete_endpoint::delete_expense_endpoint;
pub use edit_endpoint::{edit_expense_endpoint, get_expense_endpoint};
pub use form::ExpenseForm;
pub use receivable_endpoint::mark_paid_endpoint;

pub(crate) use form::{add_expense_form, parse_amount, parse_date, split_fields};

#[cfg(test)]
pub use core::{SplitShare, get_expense, get_receivables_for_expense};
