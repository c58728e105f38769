//! The endpoint for updating a budget.

use std::collections::HashMap;

use axum::{
    Form,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;

use crate::{
    audit::record_log,
    auth::Session,
    budget::{
        BudgetId, BudgetState, NewBudget,
        form::{budget_form_from_input, invalid_budget_form_response},
        get_budget, update_budget,
    },
    db::lock_connection,
    endpoints::{self, format_endpoint, with_notice},
    form::view::Submit,
    format::format_month,
};

const UPDATE_ERROR_MESSAGE: &str = "Erro ao atualizar orçamento!";

/// Update the budget `budget_id` from the submitted form and redirect to the
/// budgets page.
pub async fn edit_budget_endpoint(
    State(state): State<BudgetState>,
    session: Session,
    Path(budget_id): Path<BudgetId>,
    Form(raw_form): Form<HashMap<String, String>>,
) -> Response {
    let mut form = budget_form_from_input(&raw_form);

    if !form.validate() {
        let put_url = format_endpoint(endpoints::PUT_BUDGET, budget_id);
        return invalid_budget_form_response(
            &state.db_connection,
            session.user_id,
            &form,
            Submit::Put(&put_url),
            "Salvar",
            UPDATE_ERROR_MESSAGE,
        );
    }

    let result = form
        .parse()
        .and_then(NewBudget::try_from)
        .and_then(|new_budget| {
            let connection = lock_connection(&state.db_connection)?;
            let transaction = connection.unchecked_transaction()?;

            update_budget(session.user_id, budget_id, &new_budget, &transaction)?;
            let budget = get_budget(session.user_id, budget_id, &transaction)?;
            record_log(
                session.user_id,
                &format!(
                    "Orçamento de \"{}\" para {} atualizado",
                    budget.category_name,
                    format_month(budget.month)
                ),
                &transaction,
            )?;

            transaction.commit()?;

            Ok(())
        });

    match result {
        Ok(()) => (
            HxRedirect(with_notice(
                endpoints::BUDGETS_VIEW,
                "Orçamento atualizado com sucesso!",
            )),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => error.into_alert_response(UPDATE_ERROR_MESSAGE),
    }
}
