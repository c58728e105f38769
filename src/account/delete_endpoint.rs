//! The endpoint for deleting an account.

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
};

use crate::{
    Notification,
    account::{AccountId, AccountState, delete_account},
    audit::record_log,
    auth::Session,
    db::lock_connection,
};

/// Delete the account `account_id` together with its transactions.
pub async fn delete_account_endpoint(
    State(state): State<AccountState>,
    session: Session,
    Path(account_id): Path<AccountId>,
) -> Response {
    let result = lock_connection(&state.db_connection).and_then(|connection| {
        let transaction = connection.unchecked_transaction()?;

        let account = delete_account(session.user_id, account_id, &transaction)?;
        record_log(
            session.user_id,
            &format!("Conta \"{}\" removida", account.name),
            &transaction,
        )?;

        transaction.commit()?;

        Ok(())
    });

    match result {
        // The status code has to be 200 OK or HTMX will not delete the table row.
        Ok(()) => Notification::success("Conta removida com sucesso!")
            .into_oob_html()
            .into_response(),
        Err(error) => error.into_alert_response("Erro ao remover conta!"),
    }
}
