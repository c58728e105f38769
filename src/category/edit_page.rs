//! The page for editing a category.

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
};

use crate::{
    Error,
    auth::Session,
    category::{
        CategoryId, CategoryState,
        form::{CategoryForm, category_form_view, validate_category},
        get_category,
    },
    db::lock_connection,
    endpoints::{self, format_endpoint},
    form::{FormState, view::Submit},
    html::form_page,
};

/// Display the category form filled in with the category `category_id`.
pub async fn get_edit_category_page(
    State(state): State<CategoryState>,
    session: Session,
    Path(category_id): Path<CategoryId>,
) -> Result<Response, Error> {
    let category = get_category(
        session.user_id,
        category_id,
        &*lock_connection(&state.db_connection)?,
    )?;

    let form = FormState::new(CategoryForm::from(&category), Some(validate_category));
    let put_url = format_endpoint(endpoints::PUT_CATEGORY, category_id);

    Ok(form_page(
        "Editar Categoria",
        endpoints::CATEGORIES_VIEW,
        &category_form_view(&form, Submit::Put(&put_url), "Salvar"),
    )
    .into_response())
}
