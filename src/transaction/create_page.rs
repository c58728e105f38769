//! The page for creating a transaction.

use axum::{
    extract::State,
    response::{IntoResponse, Response},
};

use crate::{
    Error,
    auth::Session,
    db::lock_connection,
    endpoints,
    form::{FormState, view::Submit},
    html::form_page,
    timezone::local_now,
    transaction::{
        TransactionState,
        form::{TransactionForm, TransactionOptions, transaction_form_view, validate_transaction},
    },
};

/// Display an empty transaction form dated today.
pub async fn get_create_transaction_page(
    State(state): State<TransactionState>,
    session: Session,
) -> Result<Response, Error> {
    let today = local_now(&state.local_timezone)?.date();
    let options = TransactionOptions::load(session.user_id, &*lock_connection(&state.db_connection)?)?;
    let form = FormState::new(TransactionForm::new(today), Some(validate_transaction));

    Ok(form_page(
        "Nova Transação",
        endpoints::TRANSACTIONS_VIEW,
        &transaction_form_view(
            &form,
            &options,
            Submit::Post(endpoints::POST_TRANSACTION),
            "Adicionar",
        ),
    )
    .into_response())
}
