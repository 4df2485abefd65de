//! Helpers for choosing where to send the client after a form submission.

use axum::http::{HeaderMap, Uri, header::REFERER};

use crate::endpoints;

fn is_safe_redirect_url(redirect_url: &str) -> bool {
    if !redirect_url.starts_with('/') || redirect_url.starts_with("//") {
        return false;
    }

    let path = redirect_url
        .split_once('?')
        .map(|(path, _)| path)
        .unwrap_or(redirect_url);

    path != endpoints::LOG_IN && path != endpoints::SIGN_UP
}

/// Reduce `raw_url` to a path and query on this site.
///
/// Absolute URLs are accepted as long as they point to `host`, otherwise
/// `None` is returned so that the client cannot be sent to another site.
fn normalize_redirect_url(raw_url: &str, host: Option<&str>) -> Option<String> {
    let uri = raw_url.parse::<Uri>().ok()?;

    if let Some(authority) = uri.authority() {
        if Some(authority.as_str()) != host {
            return None;
        }
    }

    let path_and_query = uri.path_and_query()?.as_str();

    is_safe_redirect_url(path_and_query).then(|| path_and_query.to_owned())
}

/// The page the request was sent from, falling back to the dashboard.
///
/// Only same-site paths taken from the `Referer` header are returned.
pub fn referer_redirect_path(headers: &HeaderMap) -> String {
    let host = headers
        .get(axum::http::header::HOST)
        .and_then(|header| header.to_str().ok());

    let Some(referer) = headers
        .get(REFERER)
        .and_then(|header| header.to_str().ok())
    else {
        return endpoints::DASHBOARD_VIEW.to_owned();
    };

    match normalize_redirect_url(referer, host) {
        Some(path) => path,
        None => {
            tracing::warn!("Ignoring unsafe referer {referer}");
            endpoints::DASHBOARD_VIEW.to_owned()
        }
    }
}

#[cfg(test)]
mod redirect_tests {
    use axum::http::{HeaderMap, HeaderValue, header::HOST, header::REFERER};

    use crate::endpoints;

    use super::referer_redirect_path;

    fn headers(referer: Option<&'static str>) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(HOST, HeaderValue::from_static("localhost:3000"));
        if let Some(referer) = referer {
            headers.insert(REFERER, HeaderValue::from_static(referer));
        }

        headers
    }

    #[test]
    fn no_referer_goes_to_dashboard() {
        assert_eq!(referer_redirect_path(&headers(None)), endpoints::DASHBOARD_VIEW);
    }

    #[test]
    fn same_site_referer_is_kept() {
        assert_eq!(
            referer_redirect_path(&headers(Some("http://localhost:3000/reports"))),
            endpoints::REPORTS_VIEW
        );
        assert_eq!(
            referer_redirect_path(&headers(Some("/dashboard?x=1"))),
            "/dashboard?x=1"
        );
    }

    #[test]
    fn other_site_referer_is_rejected() {
        assert_eq!(
            referer_redirect_path(&headers(Some("https://evil.example.com/dashboard"))),
            endpoints::DASHBOARD_VIEW
        );
        assert_eq!(
            referer_redirect_path(&headers(Some("//evil.example.com"))),
            endpoints::DASHBOARD_VIEW
        );
    }

    #[test]
    fn log_in_page_is_not_a_redirect_target() {
        assert_eq!(
            referer_redirect_path(&headers(Some("http://localhost:3000/login"))),
            endpoints::DASHBOARD_VIEW
        );
    }
}
