//! The endpoint for deleting a transaction.

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
};

use crate::{
    Notification,
    audit::record_log,
    auth::Session,
    db::lock_connection,
    transaction::{TransactionId, TransactionState, delete_transaction},
};

/// Delete the transaction `transaction_id`.
pub async fn delete_transaction_endpoint(
    State(state): State<TransactionState>,
    session: Session,
    Path(transaction_id): Path<TransactionId>,
) -> Response {
    let result = lock_connection(&state.db_connection).and_then(|connection| {
        let transaction = connection.unchecked_transaction()?;

        let deleted = delete_transaction(session.user_id, transaction_id, &transaction)?;
        record_log(
            session.user_id,
            &format!("Transação \"{}\" removida", deleted.description),
            &transaction,
        )?;

        transaction.commit()?;

        Ok(())
    });

    match result {
        // The status code has to be 200 OK or HTMX will not delete the table row.
        Ok(()) => Notification::success("Transação removida com sucesso!")
            .into_oob_html()
            .into_response(),
        Err(error) => error.into_alert_response("Erro ao remover transação!"),
    }
}
