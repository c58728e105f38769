//! The endpoint for updating a transaction.

use std::collections::HashMap;

use axum::{
    Form,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;

use crate::{
    audit::record_log,
    auth::Session,
    db::lock_connection,
    endpoints::{self, format_endpoint, with_notice},
    form::view::Submit,
    transaction::{
        NewTransaction, TransactionId, TransactionState,
        form::{invalid_transaction_form_response, transaction_form_from_input},
        update_transaction,
    },
};

const UPDATE_ERROR_MESSAGE: &str = "Erro ao atualizar transação!";

/// Update the transaction `transaction_id` from the submitted form and
/// redirect to the transactions page.
pub async fn edit_transaction_endpoint(
    State(state): State<TransactionState>,
    session: Session,
    Path(transaction_id): Path<TransactionId>,
    Form(raw_form): Form<HashMap<String, String>>,
) -> Response {
    let mut form = transaction_form_from_input(&raw_form);

    if !form.validate() {
        let put_url = format_endpoint(endpoints::PUT_TRANSACTION, transaction_id);
        return invalid_transaction_form_response(
            &state.db_connection,
            session.user_id,
            &form,
            Submit::Put(&put_url),
            "Salvar",
            UPDATE_ERROR_MESSAGE,
        );
    }

    let result = form
        .parse()
        .and_then(NewTransaction::try_from)
        .and_then(|new_transaction| {
            let connection = lock_connection(&state.db_connection)?;
            let transaction = connection.unchecked_transaction()?;

            update_transaction(
                session.user_id,
                transaction_id,
                &new_transaction,
                &transaction,
            )?;
            record_log(
                session.user_id,
                &format!(
                    "Transação \"{}\" atualizada",
                    new_transaction.description.trim()
                ),
                &transaction,
            )?;

            transaction.commit()?;

            Ok(())
        });

    match result {
        Ok(()) => (
            HxRedirect(with_notice(
                endpoints::TRANSACTIONS_VIEW,
                "Transação atualizada com sucesso!",
            )),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => error.into_alert_response(UPDATE_ERROR_MESSAGE),
    }
}
