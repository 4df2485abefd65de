//! The budget card shown on the dashboard and the reports page.

use maud::{Markup, html};

use crate::{
    budget::{BudgetOverview, BudgetPeriod},
    endpoints,
    html::{BUTTON_PRIMARY_STYLE, CARD_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, format_currency},
};

fn progress_bar_colour(percent: f64) -> &'static str {
    if percent >= 100.0 {
        "bg-red-600"
    } else if percent >= 75.0 {
        "bg-yellow-400"
    } else {
        "bg-green-600"
    }
}

fn budget_summary(overview: &BudgetOverview) -> Markup {
    let BudgetOverview { budget, status } = overview;
    let percent_label = format!("{:.0}%", status.percent);

    html! {
        dl class="grid grid-cols-3 gap-2 text-sm"
        {
            div
            {
                dt class="text-gray-500 dark:text-gray-400" { "Budget (" (budget.period) ")" }
                dd class="font-semibold" data-budget-amount { (format_currency(budget.amount)) }
            }
            div
            {
                dt class="text-gray-500 dark:text-gray-400" { "Spent" }
                dd class="font-semibold" data-budget-spent { (format_currency(status.spent)) }
            }
            div
            {
                dt class="text-gray-500 dark:text-gray-400" { "Remaining" }
                dd
                    class={ "font-semibold " @if status.remaining < 0.0 { "text-red-600" } }
                    data-budget-remaining
                {
                    (format_currency(status.remaining))
                }
            }
        }

        div
            class="w-full h-3 mt-3 bg-gray-200 rounded-full dark:bg-gray-700"
            role="progressbar"
            aria-valuemin="0"
            aria-valuemax="100"
            aria-valuenow=(format!("{:.0}", status.percent))
        {
            div
                class={ "h-3 rounded-full " (progress_bar_colour(status.percent)) }
                style={ "width: " (percent_label) }
            {}
        }

        p class="mt-1 text-xs text-gray-500 dark:text-gray-400" { (percent_label) " used" }
    }
}

fn budget_form(overview: Option<&BudgetOverview>) -> Markup {
    let amount = overview.map(|overview| format!("{:.2}", overview.budget.amount));
    let period = overview
        .map(|overview| overview.budget.period)
        .unwrap_or(BudgetPeriod::Monthly);

    html! {
        form method="post" action=(endpoints::SET_BUDGET) class="mt-4 space-y-3"
        {
            div
            {
                label for="budget_amount" class=(FORM_LABEL_STYLE) { "Amount" }
                input name="budget_amount" id="budget_amount" type="number" step="0.01" min="0"
                    placeholder="0 removes the budget" value=[amount] class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="budget_period" class=(FORM_LABEL_STYLE) { "Period" }
                select name="budget_period" id="budget_period" class=(FORM_TEXT_INPUT_STYLE)
                {
                    @for option in [BudgetPeriod::Weekly, BudgetPeriod::Monthly] {
                        option value=(option) selected[option == period]
                        {
                            @match option {
                                BudgetPeriod::Weekly => "Weekly",
                                BudgetPeriod::Monthly => "Monthly",
                            }
                        }
                    }
                }
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Set Budget" }
        }
    }
}

/// Render the budget card with the current spending and the form for changing the budget.
pub fn budget_card(overview: Option<&BudgetOverview>) -> Markup {
    html! {
        section id="budget" class=(CARD_STYLE)
        {
            h2 class="mb-3 text-xl font-bold" { "Budget" }

            @match overview {
                Some(overview) => (budget_summary(overview)),
                None => p class="text-sm text-gray-500 dark:text-gray-400" { "No budget set." },
            }

            (budget_form(overview))
        }
    }
}
