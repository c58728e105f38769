//! The page for editing a budget.

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
};

use crate::{
    Error,
    auth::Session,
    budget::{
        BudgetId, BudgetState,
        form::{BudgetForm, budget_form_view, load_category_options, validate_budget},
        get_budget,
    },
    db::lock_connection,
    endpoints::{self, format_endpoint},
    form::{FormState, view::Submit},
    html::form_page,
};

/// Display the budget form filled in with the budget `budget_id`.
pub async fn get_edit_budget_page(
    State(state): State<BudgetState>,
    session: Session,
    Path(budget_id): Path<BudgetId>,
) -> Result<Response, Error> {
    let (budget, options) = {
        let connection = lock_connection(&state.db_connection)?;

        (
            get_budget(session.user_id, budget_id, &connection)?,
            load_category_options(session.user_id, &connection)?,
        )
    };

    let form = FormState::new(BudgetForm::from(&budget), Some(validate_budget));
    let put_url = format_endpoint(endpoints::PUT_BUDGET, budget_id);

    Ok(form_page(
        "Editar Orçamento",
        endpoints::BUDGETS_VIEW,
        &budget_form_view(&form, &options, Submit::Put(&put_url), "Salvar"),
    )
    .into_response())
}

#[cfg(test)]
mod edit_budget_page_tests {
    use std::sync::{Arc, Mutex};

    use axum::extract::{Path, State};
    use rusqlite::Connection;
    use scraper::Selector;
    use time::macros::date;

    use crate::{
        Error,
        auth::Session,
        budget::{BudgetState, NewBudget, create_budget, get_edit_budget_page},
        category::{NewCategory, TransactionType, create_category},
        endpoints::{self, format_endpoint},
        test_utils::{
            assert_form_input_with_value, assert_hx_endpoint, assert_valid_html,
            create_test_user, must_get_form, parse_html_document,
        },
    };

    #[tokio::test]
    async fn fills_form_with_budget() {
        let connection = Connection::open_in_memory().unwrap();
        let user_id = create_test_user(&connection);
        let category_id = create_category(
            user_id,
            &NewCategory {
                name: "Mercado".to_owned(),
                transaction_type: TransactionType::Expense,
            },
            &connection,
        )
        .unwrap()
        .id;
        let budget = create_budget(
            user_id,
            &NewBudget {
                category_id,
                transaction_type: TransactionType::Expense,
                month: date!(2024 - 03 - 01),
                value: 800.0,
            },
            &connection,
        )
        .unwrap();
        let state = BudgetState {
            local_timezone: "America/Sao_Paulo".to_owned(),
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response = get_edit_budget_page(State(state), Session { user_id }, Path(budget.id))
            .await
            .unwrap();

        let document = parse_html_document(response).await;
        assert_valid_html(&document);
        let form = must_get_form(&document);
        assert_hx_endpoint(
            &form,
            &format_endpoint(endpoints::PUT_BUDGET, budget.id),
            "hx-put",
        );
        assert_form_input_with_value(&form, "month", "month", "2024-03");
        let selected = form
            .select(&Selector::parse("select[name=category_id] option[selected]").unwrap())
            .next()
            .expect("No selected category");
        assert_eq!(selected.value().attr("value"), Some(category_id.to_string().as_str()));
    }

    #[tokio::test]
    async fn missing_budget_is_not_found() {
        let connection = Connection::open_in_memory().unwrap();
        let user_id = create_test_user(&connection);
        let state = BudgetState {
            local_timezone: "America/Sao_Paulo".to_owned(),
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let result = get_edit_budget_page(State(state), Session { user_id }, Path(1)).await;

        assert_eq!(result.err(), Some(Error::NotFound));
    }
}
