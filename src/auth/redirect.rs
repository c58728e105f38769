//! Remembering where to send the user after they log in.

use axum::{extract::Request, http::Uri};

use crate::endpoints;

/// Only local paths other than the log in page itself are followed.
fn is_safe_redirect_url(redirect_url: &str) -> bool {
    if !redirect_url.starts_with('/') || redirect_url.starts_with("//") {
        return false;
    }

    let path = redirect_url
        .split_once('?')
        .map_or(redirect_url, |(path, _)| path);

    path != endpoints::LOG_IN_VIEW && path != endpoints::REGISTER_VIEW
}

/// The path and query of `raw_url` if it is a safe place to redirect to.
///
/// Absolute URLs are rejected so that the log in page cannot be used as an
/// open redirect.
pub fn normalize_redirect_url(raw_url: &str) -> Option<String> {
    let uri = raw_url.parse::<Uri>().ok()?;
    if uri.scheme().is_some() || uri.authority().is_some() {
        return None;
    }
    let path_and_query = uri.path_and_query()?.as_str();

    is_safe_redirect_url(path_and_query).then(|| path_and_query.to_owned())
}

/// Like [normalize_redirect_url], but HTMX sends the full URL of the page.
fn normalize_hx_current_url(raw_url: &str) -> Option<String> {
    let uri = raw_url.parse::<Uri>().ok()?;
    let path_and_query = uri.path_and_query()?.as_str();

    is_safe_redirect_url(path_and_query).then(|| path_and_query.to_owned())
}

/// The log in page URL that sends the user back to the page of `request`.
///
/// API requests are made by HTMX from a page, so the page in the
/// `HX-Current-URL` header is used instead of the API route.
pub fn build_log_in_redirect_url(request: &Request) -> Option<String> {
    let redirect_target = if request.uri().path().starts_with("/api") {
        redirect_target_from_hx_request(request)?
    } else {
        let path_and_query = request.uri().path_and_query()?.as_str();
        normalize_redirect_url(path_and_query)?
    };

    build_log_in_redirect_url_from_target(&redirect_target)
}

/// The log in page URL that sends the user to `redirect_target`.
pub(super) fn build_log_in_redirect_url_from_target(redirect_target: &str) -> Option<String> {
    serde_urlencoded::to_string([("redirect_url", redirect_target)])
        .inspect_err(|error| {
            tracing::error!("Could not encode redirect URL {redirect_target}: {error}")
        })
        .ok()
        .map(|query| format!("{}?{query}", endpoints::LOG_IN_VIEW))
}

fn redirect_target_from_hx_request(request: &Request) -> Option<String> {
    let headers = request.headers();
    let is_hx_request = headers
        .get("hx-request")
        .and_then(|header| header.to_str().ok())
        .is_some_and(|header| header.eq_ignore_ascii_case("true"));

    if !is_hx_request {
        tracing::warn!("Missing HX-Request header for /api request.");
        return None;
    }

    let Some(current_url) = headers
        .get("hx-current-url")
        .and_then(|header| header.to_str().ok())
    else {
        tracing::warn!("Missing HX-Current-URL header for /api request.");
        return None;
    };

    let redirect_url = normalize_hx_current_url(current_url);
    if redirect_url.is_none() {
        tracing::warn!("Invalid HX-Current-URL header value: {current_url}");
    }

    redirect_url
}
