//! This file defines the routes for displaying the log-in page and handling log-in requests.
//! The auth module handles the lower level authentication and cookie auth logic.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use axum::{
    Form,
    extract::{FromRef, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use axum_htmx::HxTriggerName;
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;
use time::Duration;

use crate::{
    AppState, Error,
    auth::{normalize_redirect_url, set_auth_cookie},
    db::lock_connection,
    endpoints,
    form::{
        FieldKind, FieldValue, FormField, FormFields, FormState, ValuesRecord, rules,
        validate_field,
        view::input_field,
    },
    html::{BUTTON_PRIMARY_STYLE, base, link, log_in_register},
    timezone::get_local_offset,
    user::{User, get_user_by_email},
};

/// Headline of the alert shown when logging in fails.
pub(super) const LOG_IN_ERROR_MESSAGE: &str = "Erro ao realizar log in!";

/// The fields of the log in form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogInField {
    Email,
}

impl FormField for LogInField {
    const ALL: &'static [Self] = &[LogInField::Email];

    fn name(self) -> &'static str {
        match self {
            LogInField::Email => "email",
        }
    }

    fn kind(self) -> FieldKind {
        FieldKind::Text
    }
}

/// The details a user logs in with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogInForm {
    pub email: String,
}

impl FormFields for LogInForm {
    type Field = LogInField;

    fn into_record(self) -> ValuesRecord {
        ValuesRecord::from([("email", FieldValue::from(self.email))])
    }

    fn from_record(record: &ValuesRecord) -> Result<Self, Error> {
        Ok(Self {
            email: record.text(LogInField::Email)?,
        })
    }
}

fn validate_log_in(field: LogInField, value: &FieldValue) -> String {
    match field {
        LogInField::Email => rules::required_email(value, "E-mail é obrigatório"),
    }
}

fn log_in_form(form: &FormState<LogInForm>, redirect_url: Option<&str>) -> Markup {
    html! {
        form
            hx-post=(endpoints::LOG_IN_API)
            hx-swap="outerHTML"
            hx-target-error="#alert-container"
            class="space-y-4 md:space-y-6"
        {
            p class="text-sm text-gray-500 dark:text-gray-400"
            {
                "Insira suas informações de acesso"
            }

            @if let Some(redirect_url) = redirect_url {
                input type="hidden" name="redirect_url" value=(redirect_url);
            }

            (input_field("E-mail", LogInField::Email, "email", form, endpoints::VALIDATE_LOG_IN))

            button type="submit" id="submit-button" class=(BUTTON_PRIMARY_STYLE)
            {
                "Entrar"
            }

            p class="text-sm font-light text-gray-500 dark:text-gray-400"
            {
                "Não tem uma conta? "
                (link(endpoints::REGISTER_VIEW, "Registre-se"))
            }
        }
    }
}

fn parse_redirect_url(raw_url: Option<&str>, source: &str) -> Option<String> {
    let redirect_url = raw_url.and_then(normalize_redirect_url);

    if let (None, Some(raw_url)) = (&redirect_url, raw_url) {
        tracing::warn!("Invalid redirect URL from {source}: {raw_url}");
    }

    redirect_url
}

/// Where to go after logging in.
#[derive(Debug, Default, Deserialize)]
pub struct RedirectQuery {
    pub redirect_url: Option<String>,
}

/// Display the log-in page.
pub async fn get_log_in_page(Query(query): Query<RedirectQuery>) -> Response {
    let redirect_url = parse_redirect_url(query.redirect_url.as_deref(), "log-in query");
    let form = FormState::new(LogInForm::default(), Some(validate_log_in));
    let content = log_in_register("Entre no Bills", &log_in_form(&form, redirect_url.as_deref()));

    base("Entrar", &[], &content).into_response()
}

/// The state needed to log in or register a user.
#[derive(Debug, Clone)]
pub struct LogInState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The duration for which cookies used for authentication are valid.
    pub cookie_duration: Duration,
    /// The local timezone as a canonical timezone name, e.g. "America/Sao_Paulo".
    pub local_timezone: String,
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for LogInState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            cookie_duration: state.cookie_duration,
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<LogInState> for Key {
    fn from_ref(state: &LogInState) -> Self {
        state.cookie_key.clone()
    }
}

/// Set the auth cookie for `user` and redirect the client to `redirect_url`.
pub(super) fn start_session(
    state: &LogInState,
    jar: PrivateCookieJar,
    user: &User,
    redirect_url: &str,
) -> Response {
    let Some(local_offset) = get_local_offset(&state.local_timezone) else {
        return Error::InvalidTimezoneError(state.local_timezone.clone()).into_response();
    };

    match set_auth_cookie(jar, user.id, state.cookie_duration, local_offset) {
        Ok(jar) => (
            StatusCode::SEE_OTHER,
            axum_htmx::HxRedirect(redirect_url.to_owned()),
            jar,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("Error setting auth cookie: {error}");
            error.into_alert_response(LOG_IN_ERROR_MESSAGE)
        }
    }
}

/// Handler for log-in requests via the POST method.
///
/// On success the auth cookie is set and the client is redirected to the
/// page it came from, or the home page. An invalid form is returned with its
/// error messages, and an unknown email is reported with an alert.
pub async fn post_log_in(
    State(state): State<LogInState>,
    jar: PrivateCookieJar,
    Form(raw_form): Form<HashMap<String, String>>,
) -> Response {
    let redirect_url = parse_redirect_url(
        raw_form.get("redirect_url").map(String::as_str),
        "log-in form",
    );
    let mut form = FormState::<LogInForm>::from_record(
        ValuesRecord::from_input::<LogInField>(&raw_form),
        Some(validate_log_in),
    );

    if !form.validate() {
        return log_in_form(&form, redirect_url.as_deref()).into_response();
    }

    let user = form.parse().and_then(|log_in| {
        let connection = lock_connection(&state.db_connection)?;

        get_user_by_email(&log_in.email, &connection)
    });

    match user {
        Ok(user) => start_session(
            &state,
            jar,
            &user,
            redirect_url.as_deref().unwrap_or(endpoints::HOME_VIEW),
        ),
        Err(error) => {
            tracing::info!("Failed log in attempt: {error}");
            error.into_alert_response(LOG_IN_ERROR_MESSAGE)
        }
    }
}

/// Validate the log in field that changed.
pub async fn validate_log_in_field(
    HxTriggerName(trigger_name): HxTriggerName,
    Form(raw_form): Form<HashMap<String, String>>,
) -> Response {
    validate_field::<LogInForm>(validate_log_in, trigger_name, &raw_form)
}

#[cfg(test)]
mod log_in_tests {
    use std::sync::{Arc, Mutex};

    use axum::{Router, http::StatusCode, routing::post};
    use axum_extra::extract::cookie::Key;
    use axum_test::TestServer;
    use rusqlite::Connection;
    use sha2::{Digest, Sha512};
    use time::{OffsetDateTime, macros::date};

    use crate::{
        auth::{COOKIE_TOKEN, DEFAULT_COOKIE_DURATION},
        endpoints,
        test_utils::{assert_form_input, assert_valid_html, must_get_form},
        user::{NewUser, create_user, create_user_table},
    };

    use super::{LogInState, post_log_in, validate_log_in_field};

    fn get_state(with_user: bool) -> LogInState {
        let connection = Connection::open_in_memory().expect("Could not open database");
        create_user_table(&connection).expect("Could not create user table");

        if with_user {
            create_user(
                NewUser {
                    first_name: "Maria".to_owned(),
                    last_name: "Silva".to_owned(),
                    email: "maria@example.com".to_owned(),
                    date_of_birth: date!(1990 - 05 - 20),
                },
                &connection,
            )
            .expect("Could not create test user");
        }

        LogInState {
            cookie_key: Key::from(&Sha512::digest("bills")),
            cookie_duration: DEFAULT_COOKIE_DURATION,
            local_timezone: "Etc/UTC".to_owned(),
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    fn get_server(with_user: bool) -> TestServer {
        let app = Router::new()
            .route(endpoints::LOG_IN_API, post(post_log_in))
            .route(endpoints::VALIDATE_LOG_IN, post(validate_log_in_field))
            .with_state(get_state(with_user));

        TestServer::try_new(app).expect("Could not create test server.")
    }

    #[tokio::test]
    async fn log_in_page_displays_form() {
        let response = super::get_log_in_page(axum::extract::Query(Default::default())).await;

        let document = crate::test_utils::parse_html_document(response).await;
        assert_valid_html(&document);
        let form = must_get_form(&document);
        assert_form_input(&form, "email", "email");
        let text = document.root_element().text().collect::<String>();
        assert!(text.contains("Entre no Bills"));
        assert!(text.contains("Não tem uma conta?"));
    }

    #[tokio::test]
    async fn log_in_succeeds_with_registered_email() {
        let server = get_server(true);

        let response = server
            .post(endpoints::LOG_IN_API)
            .form(&[("email", "Maria@Example.com")])
            .await;

        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(response.header("hx-redirect"), endpoints::HOME_VIEW);
        let cookie = response.cookie(COOKIE_TOKEN);
        assert!(cookie.expires_datetime() > Some(OffsetDateTime::now_utc()));
    }

    #[tokio::test]
    async fn log_in_redirects_to_requested_page() {
        let server = get_server(true);

        let response = server
            .post(endpoints::LOG_IN_API)
            .form(&[("email", "maria@example.com"), ("redirect_url", "/budgets")])
            .await;

        assert_eq!(response.header("hx-redirect"), "/budgets");
    }

    #[tokio::test]
    async fn log_in_ignores_external_redirect() {
        let server = get_server(true);

        let response = server
            .post(endpoints::LOG_IN_API)
            .form(&[
                ("email", "maria@example.com"),
                ("redirect_url", "https://example.com"),
            ])
            .await;

        assert_eq!(response.header("hx-redirect"), endpoints::HOME_VIEW);
    }

    #[tokio::test]
    async fn unknown_email_shows_alert() {
        let server = get_server(false);

        let response = server
            .post(endpoints::LOG_IN_API)
            .form(&[("email", "nobody@example.com")])
            .await;

        response.assert_status(StatusCode::UNAUTHORIZED);
        response.assert_text_contains("Erro ao realizar log in!");
        response.assert_text_contains("nobody@example.com");
    }

    #[tokio::test]
    async fn invalid_email_returns_form_with_error() {
        let server = get_server(true);

        let response = server
            .post(endpoints::LOG_IN_API)
            .form(&[("email", "maria")])
            .await;

        response.assert_status_ok();
        let html = scraper::Html::parse_fragment(&response.text());
        let error = html
            .select(&scraper::Selector::parse("#email-error").unwrap())
            .next()
            .expect("No error paragraph found");
        assert_eq!(error.text().collect::<String>(), "Formato de e-mail inválido");
    }

    #[tokio::test]
    async fn validate_endpoint_checks_changed_field() {
        let server = get_server(false);

        let response = server
            .post(endpoints::VALIDATE_LOG_IN)
            .add_header("HX-Trigger-Name", "email")
            .form(&[("email", "")])
            .await;

        response.assert_status_ok();
        response.assert_text_contains("E-mail é obrigatório");
    }
}
