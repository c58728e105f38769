//! The endpoint for creating an account.

use std::collections::HashMap;

use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;

use crate::{
    account::{
        AccountState, create_account,
        form::{account_form_from_input, account_form_view},
    },
    audit::record_log,
    auth::Session,
    db::lock_connection,
    endpoints::{self, with_notice},
    form::view::Submit,
};

/// Create an account from the submitted form and redirect to the accounts page.
///
/// An invalid form is returned with its error messages, and a name that is
/// already taken is reported with an alert.
pub async fn create_account_endpoint(
    State(state): State<AccountState>,
    session: Session,
    Form(raw_form): Form<HashMap<String, String>>,
) -> Response {
    let mut form = account_form_from_input(&raw_form);

    if !form.validate() {
        return account_form_view(&form, Submit::Post(endpoints::POST_ACCOUNT), "Adicionar")
            .into_response();
    }

    let account = form.parse().and_then(|account_form| {
        let connection = lock_connection(&state.db_connection)?;
        let transaction = connection.unchecked_transaction()?;

        let account = create_account(session.user_id, &account_form.name, &transaction)?;
        record_log(
            session.user_id,
            &format!("Conta \"{}\" adicionada", account.name),
            &transaction,
        )?;

        transaction.commit()?;

        Ok(account)
    });

    match account {
        Ok(account) => {
            tracing::info!("User {} created account {}", session.user_id, account.id);
            (
                HxRedirect(with_notice(
                    endpoints::ACCOUNTS_VIEW,
                    "Conta adicionada com sucesso!",
                )),
                StatusCode::SEE_OTHER,
            )
                .into_response()
        }
        Err(error) => error.into_alert_response("Erro ao adicionar conta!"),
    }
}
