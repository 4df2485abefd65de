//! Summary cards at the top of the dashboard.

use maud::{Markup, html};

use crate::html::{CARD_STYLE, format_currency};

fn summary_card(id: &str, title: &str, amount: f64, note: &str) -> Markup {
    html! {
        div id=(id) class=(CARD_STYLE)
        {
            h3 class="text-sm font-medium text-gray-500 dark:text-gray-400" { (title) }
            p class="mt-1 text-2xl font-bold" data-amount { (format_currency(amount)) }
            p class="text-xs text-gray-500 dark:text-gray-400" { (note) }
        }
    }
}

/// Cards for the user's own spending and the money friends still owe them.
pub(super) fn summary_cards(total_spent: f64, total_owed: f64) -> Markup {
    html! {
        section class="grid w-full grid-cols-1 gap-4 md:grid-cols-2"
        {
            (summary_card("total-spent", "Your spending", total_spent, "Your share of all expenses"))
            (summary_card("total-owed", "Owed to you", total_owed, "Unpaid shares of split expenses"))
        }
    }
}
