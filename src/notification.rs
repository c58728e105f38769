//! Transient notifications shown in the alert container.

use maud::{Markup, html};
use serde::Deserialize;

use crate::Error;

/// How long a notification stays on screen before it removes itself.
pub const AUTO_DISMISS_MILLIS: u32 = 3000;

/// Shown when a failed operation has no detail of its own to show.
pub const GENERIC_ERROR_DETAILS: &str =
    "Ocorreu um erro inesperado. Tente novamente mais tarde.";

/// The kind of a notification, which decides its colours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// An operation completed.
    Success,
    /// Neutral information.
    Info,
    /// Something may need the user's attention.
    Warning,
    /// An operation failed.
    Error,
}

impl Severity {
    fn style(self) -> &'static str {
        match self {
            Severity::Success => {
                "text-green-800 border-green-300 bg-green-50 \
                dark:bg-gray-800 dark:text-green-400 dark:border-green-800"
            }
            Severity::Info => {
                "text-blue-800 border-blue-300 bg-blue-50 \
                dark:bg-gray-800 dark:text-blue-400 dark:border-blue-800"
            }
            Severity::Warning => {
                "text-yellow-800 border-yellow-300 bg-yellow-50 \
                dark:bg-gray-800 dark:text-yellow-300 dark:border-yellow-800"
            }
            Severity::Error => {
                "text-red-800 border-red-300 bg-red-50 \
                dark:bg-gray-800 dark:text-red-400 dark:border-red-800"
            }
        }
    }

    fn role(self) -> &'static str {
        match self {
            Severity::Error | Severity::Warning => "alert",
            Severity::Success | Severity::Info => "status",
        }
    }
}

/// A message for the user with optional details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// The headline, e.g. "Conta adicionada com sucesso!".
    pub message: String,
    /// An explanation shown below the headline.
    pub details: Option<String>,
    /// The kind of notification.
    pub severity: Severity,
}

impl Notification {
    /// A success notification without details.
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            details: None,
            severity: Severity::Success,
        }
    }

    /// Render the notification so that it removes itself after
    /// [AUTO_DISMISS_MILLIS].
    pub fn into_html(self) -> Markup {
        html! {
            div
                class={ "flex items-start p-4 mb-4 text-sm border rounded-lg " (self.severity.style()) }
                role=(self.severity.role())
                data-auto-dismiss=(AUTO_DISMISS_MILLIS)
            {
                div
                {
                    p class="font-medium" { (self.message) }

                    @if let Some(details) = &self.details {
                        p class="mt-1" { (details) }
                    }
                }

                button
                    type="button"
                    class="ms-auto -mx-1.5 -my-1.5 p-1.5 inline-flex items-center justify-center h-8 w-8 rounded-lg"
                    aria-label="Fechar"
                    onclick="this.parentElement.remove()"
                {
                    "×"
                }
            }
        }
    }

    /// Render the notification wrapped for an out-of-band swap into the
    /// alert container, for responses whose main content goes elsewhere.
    pub fn into_oob_html(self) -> Markup {
        html! {
            div id="alert-container" hx-swap-oob="innerHTML" { (self.into_html()) }
        }
    }
}

/// Turn a failed operation into an error notification with the headline
/// `message`.
///
/// The details come from the error when it has something to tell the user,
/// otherwise a generic explanation is used.
pub fn build_error_message(error: &Error, message: &str) -> Notification {
    Notification {
        message: message.to_owned(),
        details: Some(
            error
                .details()
                .unwrap_or_else(|| GENERIC_ERROR_DETAILS.to_owned()),
        ),
        severity: Severity::Error,
    }
}

/// The success message a page was redirected with, see
/// [crate::endpoints::with_notice].
#[derive(Debug, Default, Deserialize)]
pub struct NoticeQuery {
    /// The message to show as a success notification.
    pub notice: Option<String>,
}

impl NoticeQuery {
    /// The success notification, or nothing when there is no notice.
    pub fn into_html(self) -> Markup {
        match self.notice {
            Some(notice) if !notice.trim().is_empty() => Notification::success(notice).into_html(),
            _ => html!(),
        }
    }
}

#[cfg(test)]
mod notification_tests {
    use scraper::{Html, Selector};

    use crate::{
        Error,
        notification::{
            AUTO_DISMISS_MILLIS, GENERIC_ERROR_DETAILS, NoticeQuery, Notification, Severity,
            build_error_message,
        },
    };

    #[test]
    fn error_message_uses_error_details() {
        let error = Error::DuplicateAccountName("Nubank".to_owned());

        let notification = build_error_message(&error, "Erro ao adicionar conta!");

        assert_eq!(notification.message, "Erro ao adicionar conta!");
        assert_eq!(notification.details, error.details());
        assert_eq!(notification.severity, Severity::Error);
    }

    #[test]
    fn error_message_falls_back_to_generic_details() {
        let notification = build_error_message(&Error::DatabaseLockError, "Erro ao remover conta!");

        assert_eq!(notification.details.as_deref(), Some(GENERIC_ERROR_DETAILS));
    }

    #[test]
    fn renders_auto_dismissing_alert() {
        let markup = Notification::success("Conta adicionada com sucesso!")
            .into_html()
            .into_string();

        let fragment = Html::parse_fragment(&markup);
        let alert = fragment
            .select(&Selector::parse("[data-auto-dismiss]").unwrap())
            .next()
            .expect("No auto-dismissing alert found");

        assert_eq!(
            alert.value().attr("data-auto-dismiss"),
            Some(AUTO_DISMISS_MILLIS.to_string().as_str())
        );
        assert_eq!(alert.value().attr("role"), Some("status"));
        assert!(markup.contains("Conta adicionada com sucesso!"));
    }

    #[test]
    fn oob_html_targets_alert_container() {
        let markup = Notification::success("Conta removida com sucesso!")
            .into_oob_html()
            .into_string();

        assert!(markup.contains(r#"id="alert-container""#));
        assert!(markup.contains(r#"hx-swap-oob="innerHTML""#));
    }

    #[test]
    fn notice_query_renders_success_alert() {
        let markup = NoticeQuery {
            notice: Some("Conta adicionada com sucesso!".to_owned()),
        }
        .into_html()
        .into_string();

        assert!(markup.contains("Conta adicionada com sucesso!"));
        assert!(markup.contains(r#"role="status""#));
        assert_eq!(NoticeQuery::default().into_html().into_string(), "");
    }
}
