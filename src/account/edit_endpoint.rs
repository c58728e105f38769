//! The endpoint for renaming an account.

use std::collections::HashMap;

use axum::{
    Form,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;

use crate::{
    account::{
        AccountId, AccountState,
        form::{account_form_from_input, account_form_view},
        update_account,
    },
    audit::record_log,
    auth::Session,
    db::lock_connection,
    endpoints::{self, format_endpoint, with_notice},
    form::view::Submit,
};

/// Rename the account `account_id` and redirect to the accounts page.
pub async fn edit_account_endpoint(
    State(state): State<AccountState>,
    session: Session,
    Path(account_id): Path<AccountId>,
    Form(raw_form): Form<HashMap<String, String>>,
) -> Response {
    let mut form = account_form_from_input(&raw_form);

    if !form.validate() {
        let put_url = format_endpoint(endpoints::PUT_ACCOUNT, account_id);
        return account_form_view(&form, Submit::Put(&put_url), "Salvar").into_response();
    }

    let result = form.parse().and_then(|account_form| {
        let connection = lock_connection(&state.db_connection)?;
        let transaction = connection.unchecked_transaction()?;

        update_account(session.user_id, account_id, &account_form.name, &transaction)?;
        record_log(
            session.user_id,
            &format!("Conta \"{}\" atualizada", account_form.name.trim()),
            &transaction,
        )?;

        transaction.commit()?;

        Ok(())
    });

    match result {
        Ok(()) => (
            HxRedirect(with_notice(
                endpoints::ACCOUNTS_VIEW,
                "Conta atualizada com sucesso!",
            )),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => error.into_alert_response("Erro ao atualizar conta!"),
    }
}
