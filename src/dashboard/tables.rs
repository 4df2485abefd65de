//! The table of the user's expenses and who owes them for each one.

use maud::{Markup, html};

use crate::{
    endpoints::{self, format_endpoint},
    expense::{Expense, Receivable},
    html::{
        BUTTON_DELETE_STYLE, LINK_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
        TAG_BADGE_STYLE, format_currency,
    },
};

/// An expense together with its receivables.
pub(super) struct ExpenseRow {
    pub expense: Expense,
    pub receivables: Vec<Receivable>,
}

fn receivable_item(receivable: &Receivable) -> Markup {
    html! {
        li class="flex items-center gap-2" data-receivable-id=(receivable.id)
        {
            span { (receivable.person_name) ": " (format_currency(receivable.amount)) }

            @if receivable.is_paid {
                span class="text-xs text-green-600 dark:text-green-400" { "Paid" }
            } @else {
                form
                    method="post"
                    action=(format_endpoint(endpoints::MARK_PAID, receivable.id))
                    class="inline"
                {
                    button type="submit" class={ "text-xs " (LINK_STYLE) } { "Mark paid" }
                }
            }
        }
    }
}

fn expense_row(row: &ExpenseRow) -> Markup {
    let expense = &row.expense;

    html! {
        tr class=(TABLE_ROW_STYLE) data-expense-id=(expense.id)
        {
            td class=(TABLE_CELL_STYLE) { (expense.date) }
            td class=(TABLE_CELL_STYLE) { (expense.description) }
            td class=(TABLE_CELL_STYLE) { span class=(TAG_BADGE_STYLE) { (expense.tag) } }
            td class=(TABLE_CELL_STYLE) { (format_currency(expense.total_amount)) }
            td class=(TABLE_CELL_STYLE) { (format_currency(expense.own_amount)) }
            td class=(TABLE_CELL_STYLE)
            {
                @if !row.receivables.is_empty() {
                    ul class="space-y-1"
                    {
                        @for receivable in &row.receivables {
                            (receivable_item(receivable))
                        }
                    }
                }
            }
            td class=(TABLE_CELL_STYLE)
            {
                div class="flex gap-4"
                {
                    button
                        type="button"
                        class=(LINK_STYLE)
                        data-edit-expense=(format_endpoint(endpoints::GET_EXPENSE, expense.id))
                        data-edit-action=(format_endpoint(endpoints::EDIT_EXPENSE, expense.id))
                    {
                        "Edit"
                    }

                    a
                        href=(format_endpoint(endpoints::DELETE_EXPENSE, expense.id))
                        class=(BUTTON_DELETE_STYLE)
                        data-confirm="Delete this expense?"
                    {
                        "Delete"
                    }
                }
            }
        }
    }
}

/// Render the user's expenses, most recent first.
pub(super) fn expenses_table(rows: &[ExpenseRow]) -> Markup {
    html! {
        section id="expenses" class="w-full overflow-x-auto"
        {
            h2 class="mb-3 text-xl font-bold" { "Expenses" }

            @if rows.is_empty() {
                p class="text-gray-500 dark:text-gray-400" { "No expenses yet. Add one above." }
            } @else {
                table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Description" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Tag" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Total" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Your share" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Owed by" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                        }
                    }

                    tbody
                    {
                        @for row in rows {
                            (expense_row(row))
                        }
                    }
                }
            }
        }
    }
}
