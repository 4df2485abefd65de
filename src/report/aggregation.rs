//! Totals of the user's own spending, overall and per tag.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::expense::Expense;

/// Sum the user's own share of `expenses` for each tag, ordered by tag name.
pub fn aggregate_by_tag(expenses: &[Expense]) -> BTreeMap<String, f64> {
    let mut totals = BTreeMap::new();

    for expense in expenses {
        *totals.entry(expense.tag.to_string()).or_insert(0.0) += expense.own_amount;
    }

    totals
}

/// The spending in one date range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodSummary {
    /// The user's own share of all expenses in the range.
    pub total: f64,
    /// The user's own share of the expenses in the range, per tag.
    pub by_tag: BTreeMap<String, f64>,
}

impl PeriodSummary {
    /// Summarise `expenses`, which are assumed to already be filtered to the range.
    pub fn from_expenses(expenses: &[Expense]) -> Self {
        Self {
            total: expenses.iter().map(|expense| expense.own_amount).sum(),
            by_tag: aggregate_by_tag(expenses),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use time::macros::date;

    use crate::{expense::Expense, tag::TagName, user::UserID};

    use super::{PeriodSummary, aggregate_by_tag};

    fn expense(tag: &str, total_amount: f64, own_amount: f64) -> Expense {
        Expense {
            id: 1,
            user_id: UserID::new(1),
            date: date!(2024 - 01 - 01),
            description: String::new(),
            total_amount,
            own_amount,
            tag: TagName::new_unchecked(tag),
        }
    }

    #[test]
    fn sums_own_amounts_per_tag() {
        let expenses = [
            expense("food", 100.0, 50.0),
            expense("transport", 20.0, 20.0),
            expense("food", 10.0, 10.0),
        ];

        let totals = aggregate_by_tag(&expenses);

        assert_eq!(
            totals,
            BTreeMap::from([("food".to_owned(), 60.0), ("transport".to_owned(), 20.0)])
        );
    }

    #[test]
    fn empty_expenses_give_empty_summary() {
        assert_eq!(
            PeriodSummary::from_expenses(&[]),
            PeriodSummary {
                total: 0.0,
                by_tag: BTreeMap::new()
            }
        );
    }

    #[test]
    fn summary_total_uses_own_amounts() {
        let expenses = [expense("food", 100.0, 50.0), expense("other", 5.0, 5.0)];

        let summary = PeriodSummary::from_expenses(&expenses);

        assert_eq!(summary.total, 55.0);
        assert_eq!(summary.by_tag.len(), 2);
    }
}
