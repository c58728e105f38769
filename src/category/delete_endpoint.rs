//! The endpoint for deleting a category.

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
};

use crate::{
    Notification,
    audit::record_log,
    auth::Session,
    category::{CategoryId, CategoryState, delete_category},
    db::lock_connection,
};

/// Delete the category `category_id`.
///
/// The table row is removed by the client, so the response only carries the
/// success notification. Categories that are still in use are kept and an
/// alert explains why.
pub async fn delete_category_endpoint(
    State(state): State<CategoryState>,
    session: Session,
    Path(category_id): Path<CategoryId>,
) -> Response {
    let result = lock_connection(&state.db_connection).and_then(|connection| {
        let transaction = connection.unchecked_transaction()?;

        let category = delete_category(session.user_id, category_id, &transaction)?;
        record_log(
            session.user_id,
            &format!("Categoria \"{}\" removida", category.name),
            &transaction,
        )?;

        transaction.commit()?;

        Ok(())
    });

    match result {
        Ok(()) => Notification::success("Categoria removida com sucesso!")
            .into_oob_html()
            .into_response(),
        Err(error) => error.into_alert_response("Erro ao remover categoria!"),
    }
}
