//! The expense form shared by the add and edit endpoints, and the parsing of its raw fields.

use maud::{Markup, html};
use serde::{Deserialize, Serialize};
use time::{Date, macros::format_description};

use crate::{
    Error,
    expense::core::{NewExpense, SplitShare},
    html::{BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE},
    tag::TagName,
};

/// The raw data submitted by the add and edit expense forms.
///
/// Every field is kept as text so that bad input can be reported with a friendly message
/// instead of being rejected by the extractor.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct ExpenseForm {
    /// The date of the expense as `YYYY-MM-DD`.
    #[serde(default)]
    pub date: String,
    /// What the money was spent on.
    #[serde(default)]
    pub description: String,
    /// The total amount paid.
    #[serde(default)]
    pub amount: String,
    /// The name of the tag for the expense.
    #[serde(default)]
    pub tag: String,
    /// Present when the split checkbox is ticked.
    #[serde(default)]
    pub is_split: Option<String>,
    /// The names of the people sharing the expense.
    #[serde(rename = "split_names[]", default)]
    pub split_names: Vec<String>,
    /// The shares of the people sharing the expense, in the same order as `split_names`.
    #[serde(rename = "split_shares[]", default)]
    pub split_shares: Vec<String>,
}

impl ExpenseForm {
    /// Validate the form and convert it into an expense ready to be stored.
    ///
    /// # Errors
    ///
    /// Returns an:
    /// - [Error::InvalidAmount] if the amount or a share is not a number,
    /// - [Error::MissingTag] if no tag was given,
    /// - [Error::InvalidDate] if the date is not `YYYY-MM-DD`,
    /// - [Error::IncompleteSplit] if a split row has only a name or only a share,
    /// - or one of the errors from [NewExpense::new].
    pub fn validate(&self) -> Result<NewExpense, Error> {
        let total_amount = parse_amount(&self.amount)?;
        let tag = TagName::new(&self.tag).map_err(|_| Error::MissingTag)?;
        let date = parse_date(&self.date)?;

        let splits = if self.is_split.is_some() {
            parse_splits(&self.split_names, &self.split_shares)?
        } else {
            Vec::new()
        };

        NewExpense::new(date, self.description.trim(), total_amount, tag, splits)
    }
}

/// Parse a monetary amount, ignoring surrounding whitespace.
///
/// # Errors
/// Returns [Error::InvalidAmount] if `text` is not a finite number.
pub(crate) fn parse_amount(text: &str) -> Result<f64, Error> {
    match text.trim().parse::<f64>() {
        Ok(amount) if amount.is_finite() => Ok(amount),
        _ => Err(Error::InvalidAmount),
    }
}

/// Parse a date in the `YYYY-MM-DD` format, ignoring surrounding whitespace.
///
/// # Errors
/// Returns [Error::InvalidDate] if `text` is not a valid date.
pub(crate) fn parse_date(text: &str) -> Result<Date, Error> {
    let text = text.trim();

    Date::parse(text, format_description!("[year]-[month]-[day]"))
        .map_err(|_| Error::InvalidDate(text.to_owned()))
}

fn parse_splits(names: &[String], shares: &[String]) -> Result<Vec<SplitShare>, Error> {
    let row_count = names.len().max(shares.len());
    let mut splits = Vec::new();

    for row in 0..row_count {
        let name = names.get(row).map(|name| name.trim()).unwrap_or_default();
        let share = shares.get(row).map(|share| share.trim()).unwrap_or_default();

        match (name.is_empty(), share.is_empty()) {
            (true, true) => continue,
            (false, false) => splits.push(SplitShare {
                person_name: name.to_owned(),
                amount: parse_amount(share)?,
            }),
            _ => return Err(Error::IncompleteSplit),
        }
    }

    Ok(splits)
}

/// The form for adding an expense, with `today` as the default date.
pub(crate) fn add_expense_form(action: &str, today: Date, tags: &[TagName]) -> Markup {
    html! {
        form method="post" action=(action) id="add-expense-form" class="space-y-4"
        {
            div
            {
                label for="date" class=(FORM_LABEL_STYLE) { "Date" }
                input name="date" id="date" type="date" value=(today) required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="description" class=(FORM_LABEL_STYLE) { "Description" }
                input name="description" id="description" type="text"
                    placeholder="Description" class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="amount" class=(FORM_LABEL_STYLE) { "Amount" }
                input name="amount" id="amount" type="number" step="0.01" min="0.01"
                    placeholder="0.00" required class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="tag" class=(FORM_LABEL_STYLE) { "Tag" }
                select name="tag" id="tag" required class=(FORM_TEXT_INPUT_STYLE) data-tag-select
                {
                    option value="" { "Select a tag" }
                    @for tag in tags {
                        option value=(tag) { (tag) }
                    }
                }
            }

            (split_fields("add"))

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Add Expense" }
        }
    }
}

/// The checkbox and rows for splitting an expense with other people.
///
/// `prefix` keeps the element IDs unique when the add form and the edit dialog are on the
/// same page.
pub(crate) fn split_fields(prefix: &str) -> Markup {
    let checkbox_id = format!("{prefix}-is-split");
    let rows_id = format!("{prefix}-split-rows");

    html! {
        div class="flex items-center gap-2"
        {
            input type="checkbox" name="is_split" id=(checkbox_id) value="on"
                data-split-toggle=(rows_id);
            label for=(checkbox_id) class=(FORM_LABEL_STYLE) { "Split with friends" }
        }

        div id=(rows_id) class="hidden space-y-2" data-split-rows
        {
            (split_row())

            button type="button" class="text-sm text-blue-600 hover:underline" data-add-split=(rows_id)
            {
                "+ Add person"
            }
        }
    }
}

fn split_row() -> Markup {
    html! {
        div class="flex gap-2" data-split-row
        {
            input name="split_names[]" type="text" placeholder="Name"
                class=(FORM_TEXT_INPUT_STYLE);
            input name="split_shares[]" type="number" step="0.01" min="0.01"
                placeholder="Share" class=(FORM_TEXT_INPUT_STYLE);
        }
    }
}
