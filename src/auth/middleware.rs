//! Authentication middleware that validates cookies, extends sessions, and handles redirects.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, FromRequestParts, Request, State},
    http::{StatusCode, header::SET_COOKIE},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use rusqlite::Connection;
use serde_json::json;
use time::Duration;

use crate::{
    AppState, Error,
    alert::Alert,
    auth::cookie::{
        extend_auth_cookie_duration_if_needed, get_user_id_from_auth_cookie,
        invalidate_auth_cookie,
    },
    endpoints,
    flash::set_flash,
    user::{UserID, get_user_by_id},
};

/// The state needed for the auth middleware
#[derive(Debug, Clone)]
pub struct AuthState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The duration for which cookies used for authentication are valid.
    pub cookie_duration: Duration,
    /// The database connection for checking that the session's user still exists.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for AuthState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            cookie_duration: state.cookie_duration,
            db_connection: state.db_connection.clone(),
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<AuthState> for Key {
    fn from_ref(state: &AuthState) -> Self {
        state.cookie_key.clone()
    }
}

/// Check that the user in the session is still registered.
fn check_user_exists(state: &AuthState, jar: &PrivateCookieJar) -> Result<UserID, Error> {
    let user_id = get_user_id_from_auth_cookie(jar)?;

    let connection = state.db_connection.lock().map_err(|error| {
        tracing::error!("could not acquire database lock: {error}");
        Error::DatabaseLockError
    })?;

    match get_user_by_id(user_id, &connection) {
        Ok(_) => Ok(user_id),
        Err(Error::NotFound) => {
            tracing::warn!("Session refers to user {user_id} who does not exist.");
            Err(Error::InvalidSession)
        }
        Err(error) => Err(error),
    }
}

/// Middleware function that checks for a valid authorization cookie.
/// The user ID is placed into request and then the request executed normally if the cookie is
/// valid, otherwise `on_failure` is called with the reason and the cookie jar.
///
/// **Note**: Route handlers can use the function argument `Extension(user_id): Extension<UserID>` to receive the user ID.
#[inline]
async fn auth_guard_internal(
    state: AuthState,
    request: Request,
    next: Next,
    on_failure: impl Fn(Error, PrivateCookieJar) -> Response,
) -> Response {
    let (mut parts, body) = request.into_parts();
    let jar = match PrivateCookieJar::from_request_parts(&mut parts, &state).await {
        Ok(jar) => jar,
        Err(err) => {
            tracing::error!("Error getting cookie jar: {err:?}.");
            return on_failure(Error::NoSession, PrivateCookieJar::new(state.cookie_key));
        }
    };

    let user_id = match check_user_exists(&state, &jar) {
        Ok(user_id) => user_id,
        Err(Error::InvalidSession) => {
            return on_failure(Error::InvalidSession, invalidate_auth_cookie(jar));
        }
        Err(error) => return on_failure(error, jar),
    };

    parts.extensions.insert(user_id);
    let request = Request::from_parts(parts, body);
    let response = next.run(request).await;

    let (mut parts, body) = response.into_parts();
    let jar = match extend_auth_cookie_duration_if_needed(jar.clone(), state.cookie_duration) {
        Ok(updated_jar) => updated_jar,
        Err(err) => {
            tracing::error!("Error extending cookie duration: {err:?}. Rolling back cookie jar.");
            jar
        }
    };
    for (key, val) in jar.into_response().headers().iter() {
        if key != SET_COOKIE {
            continue;
        }

        parts.headers.append(key, val.to_owned());
    }

    Response::from_parts(parts, body)
}

/// Middleware function that checks for a valid authorization cookie.
/// The user ID is placed into request and then the request executed normally if the cookie is
/// valid, otherwise the client is redirected to the log-in page.
///
/// If the session belongs to a user that no longer exists, the session is cleared and an error
/// message is shown on the log-in page.
///
/// **Note**: Route handlers can use the function argument `Extension(user_id): Extension<UserID>` to receive the user ID.
pub async fn auth_guard(State(state): State<AuthState>, request: Request, next: Next) -> Response {
    auth_guard_internal(state, request, next, |error, jar| match error {
        Error::NoSession => Redirect::to(endpoints::LOG_IN).into_response(),
        Error::InvalidSession => {
            let jar = set_flash(jar, Alert::error(Error::InvalidSession.to_string()));
            (jar, Redirect::to(endpoints::LOG_IN)).into_response()
        }
        error => error.into_response(),
    })
    .await
}

/// Middleware function for JSON routes that checks for a valid authorization cookie.
///
/// Unauthenticated requests get a 403 response with a body of the form
/// `{"success": false, "message": "..."}` instead of a redirect.
pub async fn auth_guard_json(
    State(state): State<AuthState>,
    request: Request,
    next: Next,
) -> Response {
    auth_guard_internal(state, request, next, |error, jar| match error {
        Error::NoSession | Error::InvalidSession => (
            StatusCode::FORBIDDEN,
            jar,
            Json(json!({ "success": false, "message": error.to_string() })),
        )
            .into_response(),
        error => error.into_json_response(),
    })
    .await
}
