//! Alert messages for telling the user whether their last action succeeded.

use maud::{Markup, html};
use serde::{Deserialize, Serialize};

/// A message shown at the top of a page after a redirect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "message", rename_all = "lowercase")]
pub enum Alert {
    /// The action completed.
    Success(String),
    /// The action failed, the message says why.
    Error(String),
}

impl Alert {
    /// A success alert with the message `message`.
    pub fn success(message: impl Into<String>) -> Self {
        Self::Success(message.into())
    }

    /// An error alert with the message `message`.
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error(message.into())
    }

    /// The text of the alert.
    pub fn message(&self) -> &str {
        match self {
            Alert::Success(message) | Alert::Error(message) => message,
        }
    }

    /// Render the alert as a dismissable banner.
    pub fn into_html(self) -> Markup {
        let (kind, style) = match &self {
            Alert::Success(_) => (
                "success",
                "text-green-800 border-green-300 bg-green-50 dark:bg-gray-800 \
                dark:text-green-400 dark:border-green-800",
            ),
            Alert::Error(_) => (
                "error",
                "text-red-800 border-red-300 bg-red-50 dark:bg-gray-800 \
                dark:text-red-400 dark:border-red-800",
            ),
        };

        html! {
            div
                role="alert"
                data-alert=(kind)
                class={ "flash-message flex items-center justify-between p-4 mb-4 text-sm border rounded-lg " (style) }
            {
                span { (self.message()) }

                button
                    type="button"
                    class="ms-4 font-bold"
                    aria-label="Close"
                    onclick="this.parentElement.remove()"
                {
                    "×"
                }
            }
        }
    }
}
