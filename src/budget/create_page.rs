//! The page for creating a budget.

use axum::{
    extract::State,
    response::{IntoResponse, Response},
};

use crate::{
    Error,
    auth::Session,
    budget::{
        BudgetState,
        form::{BudgetForm, budget_form_view, load_category_options, validate_budget},
    },
    db::lock_connection,
    endpoints,
    form::{FormState, view::Submit},
    html::form_page,
    timezone::local_now,
};

/// Display an empty budget form for the current month.
pub async fn get_create_budget_page(
    State(state): State<BudgetState>,
    session: Session,
) -> Result<Response, Error> {
    let today = local_now(&state.local_timezone)?.date();
    let options = load_category_options(session.user_id, &*lock_connection(&state.db_connection)?)?;
    let form = FormState::new(BudgetForm::new(today), Some(validate_budget));

    Ok(form_page(
        "Novo Orçamento",
        endpoints::BUDGETS_VIEW,
        &budget_form_view(&form, &options, Submit::Post(endpoints::POST_BUDGET), "Adicionar"),
    )
    .into_response())
}
