use axum::{
    body::Body,
    http::{
        HeaderMap, HeaderValue,
        header::{COOKIE, SET_COOKIE},
    },
    response::Response,
};
use axum_extra::extract::{
    PrivateCookieJar,
    cookie::{Cookie, Key},
};

use crate::{
    alert::Alert,
    flash::{COOKIE_FLASH, take_flash},
};

#[track_caller]
pub(crate) fn get_header(response: &Response<Body>, header_name: &str) -> String {
    let header_error_message = format!("Headers missing {header_name}");

    response
        .headers()
        .get(header_name)
        .expect(&header_error_message)
        .to_str()
        .expect("Could not convert to str")
        .to_string()
}

pub(crate) async fn parse_json(response: Response<Body>) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Could not get response body");

    serde_json::from_slice(&body).expect("Response body is not JSON")
}

/// Decrypt a flash cookie set by a handler, `None` if it was removed or cannot be read.
pub(crate) fn decrypt_flash(cookie: &Cookie<'_>, key: &Key) -> Option<Alert> {
    let mut headers = HeaderMap::new();
    let header = HeaderValue::from_str(&format!("{}={}", cookie.name(), cookie.value())).ok()?;
    headers.insert(COOKIE, header);

    let jar = PrivateCookieJar::from_headers(&headers, key.clone());
    let (_, alert) = take_flash(jar);

    alert
}

/// The flash message set by `response`, if any.
pub(crate) fn get_flash(response: &Response<Body>, key: &Key) -> Option<Alert> {
    response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|header| Cookie::parse(header.to_str().ok()?.to_owned()).ok())
        .find(|cookie| cookie.name() == COOKIE_FLASH)
        .and_then(|cookie| decrypt_flash(&cookie, key))
}
