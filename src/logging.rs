//! Middleware for logging requests and responses.

use axum::{
    body::{Body, Bytes},
    extract::Request,
    http::{Method, header::CONTENT_TYPE},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::internal_server_error::InternalServerError;

/// Bodies longer than this many bytes are truncated in the `info` logs.
pub const LOG_BODY_LENGTH_LIMIT: usize = 64;

/// Form fields holding personal data, which are never logged.
const REDACTED_FIELDS: [&str; 2] = ["email", "date_of_birth"];

const REDACTED_VALUE: &str = "********";

/// Log the request and response for each request.
///
/// Both the request and response are logged at the `info` level.
/// If a body is longer than [LOG_BODY_LENGTH_LIMIT] bytes, it is truncated
/// and the full body is logged at the `debug` level. Personal fields in
/// submitted forms are redacted.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let Some(body_bytes) = read_body(body).await else {
        return InternalServerError::default().into_response();
    };
    let body_text = String::from_utf8_lossy(&body_bytes);

    let is_form_post = parts.method != Method::GET
        && parts
            .headers
            .get(CONTENT_TYPE)
            .and_then(|content_type| content_type.to_str().ok())
            .is_some_and(|content_type| {
                content_type.starts_with("application/x-www-form-urlencoded")
            });

    if is_form_post {
        log_body("Received request", &parts, &redact_form(&body_text));
    } else {
        log_body("Received request", &parts, &body_text);
    }

    let request = Request::from_parts(parts, Body::from(body_bytes));
    let response = next.run(request).await;

    let (parts, body) = response.into_parts();
    let Some(body_bytes) = read_body(body).await else {
        return InternalServerError::default().into_response();
    };
    log_body("Sending response", &parts, &String::from_utf8_lossy(&body_bytes));

    Response::from_parts(parts, Body::from(body_bytes))
}

async fn read_body(body: Body) -> Option<Bytes> {
    axum::body::to_bytes(body, usize::MAX)
        .await
        .inspect_err(|error| tracing::error!("could not read body for logging: {error}"))
        .ok()
}

/// Replace the values of personal fields in a urlencoded form.
///
/// Text that is not a valid form is returned unchanged.
fn redact_form(form_text: &str) -> String {
    let Ok(fields) = serde_urlencoded::from_str::<Vec<(String, String)>>(form_text) else {
        return form_text.to_owned();
    };

    let redacted: Vec<(String, String)> = fields
        .into_iter()
        .map(|(name, value)| {
            if REDACTED_FIELDS.contains(&name.as_str()) {
                (name, REDACTED_VALUE.to_owned())
            } else {
                (name, value)
            }
        })
        .collect();

    serde_urlencoded::to_string(&redacted).unwrap_or_else(|_| form_text.to_owned())
}

/// The longest prefix of `text` that fits in `limit` bytes without
/// splitting a character.
fn truncate(text: &str, limit: usize) -> &str {
    if text.len() <= limit {
        return text;
    }

    let end = (0..=limit)
        .rev()
        .find(|&index| text.is_char_boundary(index))
        .unwrap_or(0);

    &text[..end]
}

fn log_body(prefix: &str, parts: &impl std::fmt::Debug, body: &str) {
    if body.len() > LOG_BODY_LENGTH_LIMIT {
        tracing::info!(
            "{prefix}: {parts:#?}\nbody: {}...",
            truncate(body, LOG_BODY_LENGTH_LIMIT)
        );
        tracing::debug!("Full body: {body:?}");
    } else {
        tracing::info!("{prefix}: {parts:#?}\nbody: {body:?}");
    }
}

#[cfg(test)]
mod logging_tests {
    use super::{LOG_BODY_LENGTH_LIMIT, redact_form, truncate};

    #[test]
    fn redacts_personal_fields() {
        let redacted = redact_form("email=maria%40example.com&first_name=Maria&date_of_birth=1990-05-20");

        assert_eq!(
            redacted,
            "email=********&first_name=Maria&date_of_birth=********"
        );
    }

    #[test]
    fn keeps_other_fields() {
        assert_eq!(redact_form("name=Nubank"), "name=Nubank");
    }

    #[test]
    fn truncates_on_char_boundary() {
        let text = "ã".repeat(LOG_BODY_LENGTH_LIMIT);

        let truncated = truncate(&text, LOG_BODY_LENGTH_LIMIT + 1);

        assert_eq!(truncated.len(), LOG_BODY_LENGTH_LIMIT);
        assert_eq!(truncate("curto", LOG_BODY_LENGTH_LIMIT), "curto");
    }
}
