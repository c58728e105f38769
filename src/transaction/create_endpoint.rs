//! The endpoint for creating a transaction.

use std::collections::HashMap;

use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;

use crate::{
    audit::record_log,
    auth::Session,
    db::lock_connection,
    endpoints::{self, with_notice},
    form::view::Submit,
    transaction::{
        NewTransaction, TransactionState, create_transaction,
        form::{invalid_transaction_form_response, transaction_form_from_input},
    },
};

const CREATE_ERROR_MESSAGE: &str = "Erro ao adicionar transação!";

/// Create a transaction from the submitted form and redirect to the
/// transactions page.
///
/// The account and category must belong to the user, and the category must
/// have the transaction's type.
pub async fn create_transaction_endpoint(
    State(state): State<TransactionState>,
    session: Session,
    Form(raw_form): Form<HashMap<String, String>>,
) -> Response {
    let mut form = transaction_form_from_input(&raw_form);

    if !form.validate() {
        return invalid_transaction_form_response(
            &state.db_connection,
            session.user_id,
            &form,
            Submit::Post(endpoints::POST_TRANSACTION),
            "Adicionar",
            CREATE_ERROR_MESSAGE,
        );
    }

    let transaction = form
        .parse()
        .and_then(NewTransaction::try_from)
        .and_then(|new_transaction| {
            let connection = lock_connection(&state.db_connection)?;
            let transaction = connection.unchecked_transaction()?;

            let created = create_transaction(session.user_id, &new_transaction, &transaction)?;
            record_log(
                session.user_id,
                &format!("Transação \"{}\" adicionada", created.description),
                &transaction,
            )?;

            transaction.commit()?;

            Ok(created)
        });

    match transaction {
        Ok(transaction) => {
            tracing::info!(
                "User {} created transaction {}",
                session.user_id,
                transaction.id
            );
            (
                HxRedirect(with_notice(
                    endpoints::TRANSACTIONS_VIEW,
                    "Transação adicionada com sucesso!",
                )),
                StatusCode::SEE_OTHER,
            )
                .into_response()
        }
        Err(error) => error.into_alert_response(CREATE_ERROR_MESSAGE),
    }
}
