//! The page for creating an account.

use axum::response::{IntoResponse, Response};

use crate::{
    account::form::{AccountForm, account_form_view, validate_account},
    endpoints,
    form::{FormState, view::Submit},
    html::form_page,
};

/// Display an empty account form.
pub async fn get_create_account_page() -> Response {
    let form = FormState::new(AccountForm::default(), Some(validate_account));

    form_page(
        "Nova Conta",
        endpoints::ACCOUNTS_VIEW,
        &account_form_view(&form, Submit::Post(endpoints::POST_ACCOUNT), "Adicionar"),
    )
    .into_response()
}
