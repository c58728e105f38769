//! The page for renaming an account.

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
};

use crate::{
    Error,
    account::{
        AccountId, AccountState,
        form::{AccountForm, account_form_view, validate_account},
        get_account,
    },
    auth::Session,
    db::lock_connection,
    endpoints::{self, format_endpoint},
    form::{FormState, view::Submit},
    html::form_page,
};

/// Display the account form filled in with the account `account_id`.
pub async fn get_edit_account_page(
    State(state): State<AccountState>,
    session: Session,
    Path(account_id): Path<AccountId>,
) -> Result<Response, Error> {
    let account = get_account(
        session.user_id,
        account_id,
        &*lock_connection(&state.db_connection)?,
    )?;

    let form = FormState::new(AccountForm::from(&account), Some(validate_account));
    let put_url = format_endpoint(endpoints::PUT_ACCOUNT, account_id);

    Ok(form_page(
        "Editar Conta",
        endpoints::ACCOUNTS_VIEW,
        &account_form_view(&form, Submit::Put(&put_url), "Salvar"),
    )
    .into_response())
}
