//! The page for creating a category.

use axum::response::{IntoResponse, Response};

use crate::{
    category::form::{CategoryForm, category_form_view, validate_category},
    endpoints,
    form::{FormState, view::Submit},
    html::form_page,
};

/// Display an empty category form.
pub async fn get_create_category_page() -> Response {
    let form = FormState::new(CategoryForm::default(), Some(validate_category));

    form_page(
        "Nova Categoria",
        endpoints::CATEGORIES_VIEW,
        &category_form_view(&form, Submit::Post(endpoints::POST_CATEGORY), "Adicionar"),
    )
    .into_response()
}
