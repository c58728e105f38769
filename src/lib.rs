//! Bills is a web app for tracking personal finances: accounts, categorized
//! transactions, monthly budgets and an audit history of every change.
//!
//! This library provides a REST API that directly serves HTML pages. Every
//! screen binds its editable fields through the generic [FormState] container
//! and renders its records through the generic table builder.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use tokio::signal;

mod account;
mod app_state;
mod audit;
mod auth;
mod budget;
mod category;
mod db;
mod endpoints;
pub mod form;
mod format;
mod home;
mod html;
mod internal_server_error;
mod logging;
mod navigation;
mod not_found;
mod notification;
mod routing;
mod table;
mod timezone;
mod transaction;
mod user;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use db::initialize as initialize_db;
pub use form::{FieldChange, FieldValue, FormState, InputEvent};
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use notification::{Notification, Severity, build_error_message};
pub use routing::build_router;
pub use timezone::get_local_offset;
pub use user::{User, UserID};

use crate::{
    internal_server_error::InternalServerError, not_found::get_404_not_found_response,
};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// Nobody has registered with the email used to log in.
    #[error("no user is registered with the email \"{0}\"")]
    UnknownEmail(String),

    /// The email used to register is already taken by another user.
    #[error("the email \"{0}\" is already registered")]
    DuplicateEmail(String),

    /// The auth token cookie is missing from the cookie jar in the request.
    #[error("no auth cookie in the cookie jar")]
    CookieMissing,

    /// The auth token in the cookie jar has expired.
    #[error("the auth token has expired")]
    TokenExpired,

    /// The expiry of the auth cookie could not be computed or formatted.
    #[error("could not create the auth cookie expiry: {0}")]
    InvalidDateFormat(String),

    /// An error occurred while serializing or deserializing a struct as JSON.
    #[error("could not (de)serialize as JSON: {0}")]
    JSONSerializationError(String),

    /// A submitted form field could not be converted into its typed value.
    ///
    /// Forms are validated before they are parsed, so this usually means the
    /// client bypassed the field validation.
    #[error("the form field \"{0}\" has an invalid value")]
    InvalidFormField(&'static str),

    /// The specified account name already exists for the user.
    #[error("the account \"{0}\" already exists in the database")]
    DuplicateAccountName(String),

    /// A budget already exists for the same category and month.
    #[error("a budget for the category and month already exists")]
    DuplicateBudget,

    /// An account or category ID does not refer to a record owned by the user.
    #[error("the account or category ID does not refer to a valid record")]
    InvalidReference,

    /// The type of a transaction or budget differs from the type of its category.
    #[error("the category type does not match the transaction type")]
    CategoryTypeMismatch,

    /// Tried to delete a category that transactions or budgets still refer to.
    #[error("the category is still used by transactions or budgets")]
    CategoryInUse,

    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// Tried to update an account that does not exist
    #[error("tried to update an account that is not in the database")]
    UpdateMissingAccount,

    /// Tried to delete an account that does not exist
    #[error("tried to delete an account that is not in the database")]
    DeleteMissingAccount,

    /// Tried to update a category that does not exist
    #[error("tried to update a category that is not in the database")]
    UpdateMissingCategory,

    /// Tried to delete a category that does not exist
    #[error("tried to delete a category that is not in the database")]
    DeleteMissingCategory,

    /// Tried to update a transaction that does not exist
    #[error("tried to update a transaction that is not in the database")]
    UpdateMissingTransaction,

    /// Tried to delete a transaction that does not exist
    #[error("tried to delete a transaction that is not in the database")]
    DeleteMissingTransaction,

    /// Tried to update a budget that does not exist
    #[error("tried to update a budget that is not in the database")]
    UpdateMissingBudget,

    /// Tried to delete a budget that does not exist
    #[error("tried to delete a budget that is not in the database")]
    DeleteMissingBudget,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),
}

/// Shown to the user for missing records, whichever record it was.
const MISSING_RECORD_DETAILS: &str =
    "O registro não foi encontrado. Atualize a página e tente novamente.";

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            // Code 787 occurs when a FOREIGN KEY constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, _) if sql_error.extended_code == 787 => {
                Error::InvalidReference
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl Error {
    /// The user-facing explanation of the error, if the user can do
    /// something about it.
    ///
    /// Internal errors return `None` so that their details stay in the
    /// server logs.
    pub fn details(&self) -> Option<String> {
        let details = match self {
            Error::UnknownEmail(email) => {
                format!("Nenhum usuário encontrado com o e-mail {email}.")
            }
            Error::DuplicateEmail(email) => format!("O e-mail {email} já está cadastrado."),
            Error::InvalidFormField(field) => {
                format!("O campo \"{field}\" possui um valor inválido.")
            }
            Error::DuplicateAccountName(name) => {
                format!(
                    "Já existe uma conta com o nome \"{name}\". \
                    Escolha outro nome, ou edite a conta existente."
                )
            }
            Error::DuplicateBudget => {
                "Já existe um orçamento para esta categoria neste mês.".to_owned()
            }
            Error::InvalidReference => "A conta ou categoria selecionada não existe.".to_owned(),
            Error::CategoryTypeMismatch => {
                "O tipo da categoria não corresponde ao tipo selecionado.".to_owned()
            }
            Error::CategoryInUse => {
                "A categoria possui transações ou orçamentos associados.".to_owned()
            }
            Error::NotFound
            | Error::UpdateMissingAccount
            | Error::DeleteMissingAccount
            | Error::UpdateMissingCategory
            | Error::DeleteMissingCategory
            | Error::UpdateMissingTransaction
            | Error::DeleteMissingTransaction
            | Error::UpdateMissingBudget
            | Error::DeleteMissingBudget => MISSING_RECORD_DETAILS.to_owned(),
            _ => return None,
        };

        Some(details)
    }

    /// The status code to respond with when the error is shown as an alert.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::UnknownEmail(_) => StatusCode::UNAUTHORIZED,
            Error::DuplicateEmail(_)
            | Error::InvalidFormField(_)
            | Error::DuplicateAccountName(_)
            | Error::DuplicateBudget
            | Error::InvalidReference
            | Error::CategoryTypeMismatch
            | Error::CategoryInUse => StatusCode::BAD_REQUEST,
            Error::NotFound
            | Error::UpdateMissingAccount
            | Error::DeleteMissingAccount
            | Error::UpdateMissingCategory
            | Error::DeleteMissingCategory
            | Error::UpdateMissingTransaction
            | Error::DeleteMissingTransaction
            | Error::UpdateMissingBudget
            | Error::DeleteMissingBudget => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Render the error as a notification with the headline `message`.
    ///
    /// The response is meant to be swapped into the alert container by HTMX.
    fn into_alert_response(self, message: &str) -> Response {
        (
            self.status_code(),
            build_error_message(&self, message).into_html(),
        )
            .into_response()
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => get_404_not_found_response(),
            Error::InvalidTimezoneError(timezone) => InternalServerError {
                description: "Fuso horário inválido",
                fix: &format!(
                    "Não foi possível obter o fuso horário \"{timezone}\". Verifique a \
                    configuração do servidor e use um nome canônico, por exemplo \
                    \"America/Sao_Paulo\"."
                ),
            }
            .into_response(),
            Error::DatabaseLockError => InternalServerError::default().into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}
