//! The budget model and the calculation of how much of it has been spent.

use std::{fmt::Display, str::FromStr};

use rusqlite::{
    ToSql,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
};
use time::{Date, Duration};

use crate::{Error, expense::Expense, user::UserID};

/// How often a budget resets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetPeriod {
    /// The budget resets every Monday.
    Weekly,
    /// The budget resets on the first day of every month.
    Monthly,
}

impl BudgetPeriod {
    /// The name of the period as used in forms and the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            BudgetPeriod::Weekly => "weekly",
            BudgetPeriod::Monthly => "monthly",
        }
    }

    /// The first day of the period that contains `today`.
    pub fn start(&self, today: Date) -> Date {
        let days_since_start = match self {
            BudgetPeriod::Weekly => today.weekday().number_days_from_monday() as i64,
            BudgetPeriod::Monthly => today.day() as i64 - 1,
        };

        today - Duration::days(days_since_start)
    }
}

impl Display for BudgetPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BudgetPeriod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "weekly" => Ok(BudgetPeriod::Weekly),
            "monthly" => Ok(BudgetPeriod::Monthly),
            _ => Err(Error::InvalidBudget),
        }
    }
}

impl ToSql for BudgetPeriod {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

impl FromSql for BudgetPeriod {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error: Error| FromSqlError::Other(Box::new(error)))
    }
}

/// The spending limit a user has set for themselves.
#[derive(Debug, Clone, PartialEq)]
pub struct Budget {
    /// The ID of the budget.
    pub id: i64,
    /// The user the budget belongs to.
    pub user_id: UserID,
    /// How much the user wants to spend at most each period.
    pub amount: f64,
    /// How often the budget resets.
    pub period: BudgetPeriod,
}

/// How much of a budget has been spent in the current period.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BudgetStatus {
    /// The user's own share of the expenses in the current period.
    pub spent: f64,
    /// The budget amount minus the amount spent, negative when over budget.
    pub remaining: f64,
    /// The amount spent as a percentage of the budget, between 0 and 100.
    pub percent: f64,
}

/// Work out how much of `budget` has been spent in the period containing `today`.
///
/// Only the user's own share of each expense counts. Expenses dated after `today` within
/// the period are included.
pub fn compute_budget_status(budget: &Budget, expenses: &[Expense], today: Date) -> BudgetStatus {
    let start = budget.period.start(today);
    let spent: f64 = expenses
        .iter()
        .filter(|expense| expense.date >= start)
        .map(|expense| expense.own_amount)
        .sum();

    let percent = if budget.amount > 0.0 {
        (spent / budget.amount * 100.0).clamp(0.0, 100.0)
    } else {
        0.0
    };

    BudgetStatus {
        spent,
        remaining: budget.amount - spent,
        percent,
    }
}

#[cfg(test)]
mod tests {
    use time::{Date, macros::date};

    use crate::{expense::Expense, tag::TagName, user::UserID};

    use super::{Budget, BudgetPeriod, BudgetStatus, compute_budget_status};

    fn budget(amount: f64, period: BudgetPeriod) -> Budget {
        Budget {
            id: 1,
            user_id: UserID::new(1),
            amount,
            period,
        }
    }

    fn expense(date: Date, own_amount: f64) -> Expense {
        Expense {
            id: 1,
            user_id: UserID::new(1),
            date,
            description: String::new(),
            total_amount: own_amount,
            own_amount,
            tag: TagName::new_unchecked("food"),
        }
    }

    #[test]
    fn weekly_period_starts_on_monday() {
        // 2024-01-17 is a Wednesday.
        assert_eq!(
            BudgetPeriod::Weekly.start(date!(2024 - 01 - 17)),
            date!(2024 - 01 - 15)
        );
        assert_eq!(
            BudgetPeriod::Weekly.start(date!(2024 - 01 - 15)),
            date!(2024 - 01 - 15)
        );
        assert_eq!(
            BudgetPeriod::Weekly.start(date!(2024 - 01 - 21)),
            date!(2024 - 01 - 15)
        );
    }

    #[test]
    fn monthly_period_starts_on_the_first() {
        assert_eq!(
            BudgetPeriod::Monthly.start(date!(2024 - 02 - 29)),
            date!(2024 - 02 - 01)
        );
        assert_eq!(
            BudgetPeriod::Monthly.start(date!(2024 - 03 - 01)),
            date!(2024 - 03 - 01)
        );
    }

    #[test]
    fn parses_period_names() {
        assert_eq!("weekly".parse(), Ok(BudgetPeriod::Weekly));
        assert_eq!("monthly".parse(), Ok(BudgetPeriod::Monthly));
        assert_eq!(
            "yearly".parse::<BudgetPeriod>(),
            Err(crate::Error::InvalidBudget)
        );
    }

    #[test]
    fn status_counts_expenses_in_current_period() {
        let today = date!(2024 - 03 - 15);
        let expenses = [
            expense(today, 50.0),
            expense(date!(2024 - 02 - 28), 500.0),
        ];

        let status = compute_budget_status(&budget(200.0, BudgetPeriod::Monthly), &expenses, today);

        assert_eq!(
            status,
            BudgetStatus {
                spent: 50.0,
                remaining: 150.0,
                percent: 25.0,
            }
        );
    }

    #[test]
    fn status_counts_later_expenses_in_period() {
        let today = date!(2024 - 03 - 15);
        let expenses = [expense(date!(2024 - 03 - 20), 10.0)];

        let status = compute_budget_status(&budget(100.0, BudgetPeriod::Monthly), &expenses, today);

        assert_eq!(status.spent, 10.0);
    }

    #[test]
    fn percent_is_capped_at_100() {
        let today = date!(2024 - 03 - 15);
        let expenses = [expense(today, 300.0)];

        let status = compute_budget_status(&budget(200.0, BudgetPeriod::Weekly), &expenses, today);

        assert_eq!(status.percent, 100.0);
        assert_eq!(status.remaining, -100.0);
    }

    #[test]
    fn percent_is_zero_for_zero_budget() {
        let today = date!(2024 - 03 - 15);
        let expenses = [expense(today, 30.0)];

        let status = compute_budget_status(&budget(0.0, BudgetPeriod::Weekly), &expenses, today);

        assert_eq!(status.percent, 0.0);
    }

    #[test]
    fn percent_is_never_negative() {
        let today = date!(2024 - 03 - 15);
        let expenses = [expense(today, -30.0)];

        let status = compute_budget_status(&budget(100.0, BudgetPeriod::Weekly), &expenses, today);

        assert_eq!(status.percent, 0.0);
    }
}
