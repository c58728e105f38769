//! The endpoint for creating a category.

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
    category::{
        CategoryState, create_category,
        form::{category_form_from_input, category_form_view},
    },
    db::lock_connection,
    endpoints::{self, with_notice},
    form::view::Submit,
};

/// Create a category from the submitted form and redirect to the categories page.
///
/// An invalid form is returned with its error messages.
pub async fn create_category_endpoint(
    State(state): State<CategoryState>,
    session: Session,
    Form(raw_form): Form<HashMap<String, String>>,
) -> Response {
    let mut form = category_form_from_input(&raw_form);

    if !form.validate() {
        return category_form_view(&form, Submit::Post(endpoints::POST_CATEGORY), "Adicionar")
            .into_response();
    }

    let category = form.parse().and_then(|category_form| {
        let connection = lock_connection(&state.db_connection)?;
        let transaction = connection.unchecked_transaction()?;

        let category = create_category(session.user_id, &category_form.into(), &transaction)?;
        record_log(
            session.user_id,
            &format!("Categoria \"{}\" adicionada", category.name),
            &transaction,
        )?;

        transaction.commit()?;

        Ok(category)
    });

    match category {
        Ok(category) => {
            tracing::info!("User {} created category {}", session.user_id, category.id);
            (
                HxRedirect(with_notice(
                    endpoints::CATEGORIES_VIEW,
                    "Categoria adicionada com sucesso!",
                )),
                StatusCode::SEE_OTHER,
            )
                .into_response()
        }
        Err(error) => error.into_alert_response("Erro ao adicionar categoria!"),
    }
}
