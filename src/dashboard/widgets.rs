//! The interactive parts of the dashboard: the tag manager, the CSV upload form and the
//! edit dialog. Their behaviour lives in `static/app.js`.

use maud::{Markup, html};

use crate::{
    endpoints,
    expense::split_fields,
    html::{
        BUTTON_DELETE_STYLE, BUTTON_PRIMARY_STYLE, CARD_STYLE, FORM_LABEL_STYLE,
        FORM_TEXT_INPUT_STYLE, TAG_BADGE_STYLE,
    },
    tag::TagName,
};

/// The list of the user's tags with controls for adding and deleting them.
pub(super) fn tag_manager(tags: &[TagName]) -> Markup {
    html! {
        section
            id="tag-manager"
            class=(CARD_STYLE)
            data-add-endpoint=(endpoints::ADD_TAG)
            data-delete-endpoint=(endpoints::DELETE_TAG)
        {
            h2 class="mb-3 text-xl font-bold" { "Tags" }

            ul id="tag-list" class="flex flex-wrap gap-2"
            {
                @for tag in tags {
                    li class=(TAG_BADGE_STYLE) data-tag=(tag)
                    {
                        span { (tag) }
                        button
                            type="button"
                            class={ "ms-1 " (BUTTON_DELETE_STYLE) }
                            aria-label={ "Delete tag " (tag) }
                            data-delete-tag=(tag)
                        {
                            "×"
                        }
                    }
                }
            }

            form id="add-tag-form" class="flex gap-2 mt-4"
            {
                input name="tag_name" type="text" placeholder="New tag" required
                    class=(FORM_TEXT_INPUT_STYLE);
                button type="submit" class="px-4 py-2 text-white bg-blue-500 rounded hover:bg-blue-600"
                {
                    "Add"
                }
            }

            p id="tag-message" class="mt-2 text-sm" {}
        }
    }
}

/// The form for importing expenses from a CSV file.
pub(super) fn csv_upload_form() -> Markup {
    html! {
        section id="csv-upload" class=(CARD_STYLE)
        {
            h2 class="mb-3 text-xl font-bold" { "Import from CSV" }

            p class="mb-3 text-sm text-gray-500 dark:text-gray-400"
            {
                "Columns: date (YYYY-MM-DD), description, amount, tag. The first row is skipped."
            }

            form
                method="post"
                action=(endpoints::UPLOAD_CSV)
                enctype="multipart/form-data"
                class="space-y-3"
            {
                input name="csv_file" id="csv_file" type="file" accept=".csv" required
                    class=(FORM_TEXT_INPUT_STYLE);
                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Upload" }
            }
        }
    }
}

/// The dialog for editing an expense, filled in from the expense JSON endpoint.
pub(super) fn edit_expense_dialog(tags: &[TagName]) -> Markup {
    html! {
        dialog id="edit-expense-dialog" class="w-full max-w-lg p-6 rounded-lg shadow dark:bg-gray-800 dark:text-white"
        {
            h2 class="mb-4 text-xl font-bold" { "Edit expense" }

            form id="edit-expense-form" method="post" class="space-y-4"
            {
                div
                {
                    label for="edit-date" class=(FORM_LABEL_STYLE) { "Date" }
                    input name="date" id="edit-date" type="date" required class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label for="edit-description" class=(FORM_LABEL_STYLE) { "Description" }
                    input name="description" id="edit-description" type="text"
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label for="edit-amount" class=(FORM_LABEL_STYLE) { "Amount" }
                    input name="amount" id="edit-amount" type="number" step="0.01" min="0.01"
                        required class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label for="edit-tag" class=(FORM_LABEL_STYLE) { "Tag" }
                    select name="tag" id="edit-tag" required class=(FORM_TEXT_INPUT_STYLE) data-tag-select
                    {
                        @for tag in tags {
                            option value=(tag) { (tag) }
                        }
                    }
                }

                (split_fields("edit"))

                div class="flex gap-2"
                {
                    button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Save" }
                    button type="button" class="w-full px-4 py-2 border rounded" data-close-dialog
                    {
                        "Cancel"
                    }
                }
            }
        }
    }
}
