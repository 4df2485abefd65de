//! The sign-up page for creating a new account.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use maud::{Markup, html};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    alert::Alert,
    endpoints,
    flash::set_flash,
    html::{BUTTON_PRIMARY_STYLE, base, link, log_in_register, password_input, username_input},
    tag::create_default_tags,
    user::{User, create_user},
};

fn sign_up_form(username: &str) -> Markup {
    html! {
        form
            method="post"
            action=(endpoints::SIGN_UP)
            class="space-y-4 md:space-y-6"
        {
            (username_input(username))
            (password_input(None))

            button type="submit" id="submit-button" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
            {
                "Sign up"
            }

            p class="text-sm font-light text-gray-500 dark:text-gray-400"
            {
                "Already have an account? "
                (link(endpoints::LOG_IN, "Log in here"))
            }
        }
    }
}

fn sign_up_page(username: &str, alert: Option<Alert>) -> Markup {
    let form = sign_up_form(username);
    let content = log_in_register("Create an account", alert, &form);

    base("Sign Up", &[], &content)
}

/// Display the sign-up page.
pub async fn get_sign_up_page() -> Response {
    sign_up_page("", None).into_response()
}

/// The state needed for creating a new user.
#[derive(Debug, Clone)]
pub struct SignUpState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The database connection for storing the new user.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for SignUpState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<SignUpState> for Key {
    fn from_ref(state: &SignUpState) -> Self {
        state.cookie_key.clone()
    }
}

/// The data entered in the sign-up form.
#[derive(Serialize, Deserialize)]
pub struct SignUpForm {
    /// The name to log in with.
    pub username: String,
    /// The password to log in with.
    pub password: String,
}

/// Create a user along with the default tags.
///
/// Either both the user and their tags are stored, or neither is.
///
/// # Errors
///
/// Returns a:
/// - [Error::EmptyUsername] or [Error::EmptyPassword] if either field is blank,
/// - [Error::DuplicateUsername] if the username is taken,
/// - [Error::SqlError] if some other SQL error occurred.
pub fn create_account(
    username: &str,
    password: &str,
    connection: &Connection,
) -> Result<User, Error> {
    let username = username.trim();

    if username.is_empty() {
        return Err(Error::EmptyUsername);
    }

    if password.is_empty() {
        return Err(Error::EmptyPassword);
    }

    let transaction = connection.unchecked_transaction()?;
    let user = create_user(username, password, &transaction)?;
    create_default_tags(user.id, &transaction)?;
    transaction.commit()?;

    Ok(user)
}

/// Handler for sign-up requests.
///
/// On success the client is redirected to the log-in page with a success message,
/// otherwise the sign-up page is shown again with the error.
pub async fn post_sign_up(
    State(state): State<SignUpState>,
    jar: PrivateCookieJar,
    Form(form): Form<SignUpForm>,
) -> Response {
    let result = match state.db_connection.lock() {
        Ok(connection) => create_account(&form.username, &form.password, &connection),
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            Err(Error::DatabaseLockError)
        }
    };

    match result {
        Ok(user) => {
            tracing::info!("Created account for user {}", user.id);
            let jar = set_flash(jar, Alert::success("Account created successfully! Please login."));

            (jar, Redirect::to(endpoints::LOG_IN)).into_response()
        }
        Err(error) => {
            sign_up_page(&form.username, Some(Alert::error(error.user_message()))).into_response()
        }
    }
}

#[cfg(test)]
mod sign_up_tests {
    use std::sync::{Arc, Mutex};

    use axum::{Form, extract::State, http::StatusCode};
    use axum_extra::extract::PrivateCookieJar;
    use rusqlite::Connection;
    use scraper::Selector;

    use crate::{
        Error,
        app_state::create_cookie_key,
        db::initialize,
        endpoints,
        tag::get_tag_names,
        test_utils::{assert_valid_html, get_header, parse_html_document},
        user::{create_user, get_user_by_username},
    };

    use super::{SignUpForm, SignUpState, create_account, get_sign_up_page, post_sign_up};

    fn get_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        connection
    }

    #[test]
    fn create_account_adds_default_tags() {
        let connection = get_connection();

        let user = create_account("alice", "hunter2", &connection).unwrap();

        let names: Vec<String> = get_tag_names(user.id, &connection)
            .unwrap()
            .iter()
            .map(|name| name.to_string())
            .collect();
        assert_eq!(names, ["college", "food", "other", "transport", "utilities"]);
    }

    #[test]
    fn create_account_rejects_taken_username() {
        let connection = get_connection();
        create_user("alice", "hunter2", &connection).unwrap();

        assert_eq!(
            create_account("alice", "other", &connection),
            Err(Error::DuplicateUsername)
        );
    }

    #[test]
    fn create_account_rejects_blank_fields() {
        let connection = get_connection();

        assert_eq!(
            create_account("   ", "hunter2", &connection),
            Err(Error::EmptyUsername)
        );
        assert_eq!(
            create_account("alice", "", &connection),
            Err(Error::EmptyPassword)
        );
        assert_eq!(
            get_user_by_username("alice", &connection),
            Err(Error::NotFound)
        );
    }

    #[tokio::test]
    async fn sign_up_page_has_form() {
        let response = get_sign_up_page().await;

        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        let form = html
            .select(&Selector::parse("form").unwrap())
            .next()
            .expect("No form found");
        assert_eq!(form.value().attr("action"), Some(endpoints::SIGN_UP));
    }

    #[tokio::test]
    async fn sign_up_redirects_to_log_in() {
        let state = SignUpState {
            cookie_key: create_cookie_key("foobar"),
            db_connection: Arc::new(Mutex::new(get_connection())),
        };
        let jar = PrivateCookieJar::new(state.cookie_key.clone());
        let form = Form(SignUpForm {
            username: "alice".to_owned(),
            password: "hunter2".to_owned(),
        });

        let response = post_sign_up(State(state.clone()), jar, form).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(get_header(&response, "location"), endpoints::LOG_IN);
        assert!(get_user_by_username("alice", &state.db_connection.lock().unwrap()).is_ok());
    }

    #[tokio::test]
    async fn duplicate_sign_up_shows_error() {
        let connection = get_connection();
        create_user("alice", "hunter2", &connection).unwrap();
        let state = SignUpState {
            cookie_key: create_cookie_key("foobar"),
            db_connection: Arc::new(Mutex::new(connection)),
        };
        let jar = PrivateCookieJar::new(state.cookie_key.clone());
        let form = Form(SignUpForm {
            username: "alice".to_owned(),
            password: "letmein".to_owned(),
        });

        let response = post_sign_up(State(state), jar, form).await;

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_document(response).await;
        let alert_text = html
            .select(&Selector::parse("div[role=alert] span").unwrap())
            .next()
            .expect("No alert found")
            .text()
            .collect::<String>();
        assert_eq!(alert_text, "Username already exists!");
    }
}
