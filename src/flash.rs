//! One-shot messages that survive a redirect.
//!
//! A handler that redirects stores an [Alert] in a private cookie, and the
//! next page that displays alerts takes it out of the cookie jar again.

use axum_extra::extract::{
    PrivateCookieJar,
    cookie::{Cookie, SameSite},
};

use crate::alert::Alert;

pub(crate) const COOKIE_FLASH: &str = "flash";

/// Store `alert` in `jar` so that it is shown on the next page load.
///
/// Any pending message is replaced.
pub(crate) fn set_flash(jar: PrivateCookieJar, alert: Alert) -> PrivateCookieJar {
    let value = match serde_json::to_string(&alert) {
        Ok(value) => value,
        Err(error) => {
            tracing::error!("Could not serialize flash message {alert:?}: {error}");
            return jar;
        }
    };

    jar.add(
        Cookie::build((COOKIE_FLASH, value))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax),
    )
}

/// Remove the pending message from `jar` and return it.
///
/// A cookie that cannot be decoded is dropped and treated as no message.
pub(crate) fn take_flash(jar: PrivateCookieJar) -> (PrivateCookieJar, Option<Alert>) {
    let Some(cookie) = jar.get(COOKIE_FLASH) else {
        return (jar, None);
    };

    let alert = match serde_json::from_str(cookie.value()) {
        Ok(alert) => Some(alert),
        Err(error) => {
            tracing::warn!("Discarding malformed flash message: {error}");
            None
        }
    };

    let jar = jar.remove(Cookie::build(COOKIE_FLASH).path("/"));

    (jar, alert)
}
