//! The landing page.

use axum::response::{IntoResponse, Response};
use maud::html;

use crate::{
    endpoints,
    html::{BUTTON_PRIMARY_STYLE, PAGE_CONTAINER_STYLE, base, link},
};

/// Display the landing page with links to log in or sign up.
pub async fn get_home_page() -> Response {
    let content = html! {
        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="max-w-xl text-center space-y-6"
            {
                h1 class="text-4xl font-extrabold tracking-tight" { "Expense Tracker" }

                p class="text-lg text-gray-600 dark:text-gray-300"
                {
                    "Record what you spend, split bills with friends and keep track of who still owes you."
                }

                a href=(endpoints::LOG_IN) class={ "inline-block " (BUTTON_PRIMARY_STYLE) }
                {
                    "Log in"
                }

                p
                {
                    "New here? "
                    (link(endpoints::SIGN_UP, "Create an account"))
                }
            }
        }
    };

    base("Welcome", &[], &content).into_response()
}

#[cfg(test)]
mod home_page_tests {
    use axum::http::StatusCode;
    use scraper::Selector;

    use crate::{
        endpoints,
        test_utils::{assert_valid_html, parse_html_document},
    };

    use super::get_home_page;

    #[tokio::test]
    async fn links_to_log_in_and_sign_up() {
        let response = get_home_page().await;

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        let hrefs: Vec<_> = html
            .select(&Selector::parse("a").unwrap())
            .filter_map(|link| link.value().attr("href"))
            .collect();
        assert!(hrefs.contains(&endpoints::LOG_IN));
        assert!(hrefs.contains(&endpoints::SIGN_UP));
    }
}
