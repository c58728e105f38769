//! The endpoint for creating a budget.

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
    budget::{
        BudgetState, NewBudget, create_budget,
        form::{budget_form_from_input, invalid_budget_form_response},
    },
    db::lock_connection,
    endpoints::{self, with_notice},
    form::view::Submit,
    format::format_month,
};

const CREATE_ERROR_MESSAGE: &str = "Erro ao adicionar orçamento!";

/// Create a budget from the submitted form and redirect to the budgets page.
pub async fn create_budget_endpoint(
    State(state): State<BudgetState>,
    session: Session,
    Form(raw_form): Form<HashMap<String, String>>,
) -> Response {
    let mut form = budget_form_from_input(&raw_form);

    if !form.validate() {
        return invalid_budget_form_response(
            &state.db_connection,
            session.user_id,
            &form,
            Submit::Post(endpoints::POST_BUDGET),
            "Adicionar",
            CREATE_ERROR_MESSAGE,
        );
    }

    let result = form
        .parse()
        .and_then(NewBudget::try_from)
        .and_then(|new_budget| {
            let connection = lock_connection(&state.db_connection)?;
            let transaction = connection.unchecked_transaction()?;

            let budget = create_budget(session.user_id, &new_budget, &transaction)?;
            record_log(
                session.user_id,
                &format!(
                    "Orçamento de \"{}\" para {} adicionado",
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
                "Orçamento adicionado com sucesso!",
            )),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => error.into_alert_response(CREATE_ERROR_MESSAGE),
    }
}

#[cfg(test)]
mod create_budget_endpoint_tests {
    use std::{
        collections::HashMap,
        sync::{Arc, Mutex},
    };

    use axum::{Form, extract::State, http::StatusCode};
    use rusqlite::Connection;

    use crate::{
        audit::get_logs,
        auth::Session,
        budget::{BudgetFilter, BudgetState, create_budget_endpoint, get_budgets},
        category::{NewCategory, TransactionType, create_category},
        endpoints::{self, with_notice},
        test_utils::{assert_hx_redirect, create_test_user},
    };

    fn form(category_id: i64) -> Form<HashMap<String, String>> {
        Form(HashMap::from([
            ("category_id".to_owned(), category_id.to_string()),
            ("type".to_owned(), "EXPENSE".to_owned()),
            ("month".to_owned(), "2024-03".to_owned()),
            ("value".to_owned(), "800".to_owned()),
        ]))
    }

    #[tokio::test]
    async fn creates_budget_and_rejects_duplicate() {
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
        let state = BudgetState {
            local_timezone: "America/Sao_Paulo".to_owned(),
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response =
            create_budget_endpoint(State(state.clone()), Session { user_id }, form(category_id))
                .await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(
            &response,
            &with_notice(endpoints::BUDGETS_VIEW, "Orçamento adicionado com sucesso!"),
        );

        let response =
            create_budget_endpoint(State(state.clone()), Session { user_id }, form(category_id))
                .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert!(String::from_utf8_lossy(&body).contains("Já existe um orçamento"));

        let connection = state.db_connection.lock().unwrap();
        assert_eq!(
            get_budgets(user_id, &BudgetFilter::default(), &connection)
                .unwrap()
                .len(),
            1
        );
        assert_eq!(
            get_logs(user_id, &connection).unwrap()[0].message,
            "Orçamento de \"Mercado\" para 03/2024 adicionado"
        );
    }

    #[tokio::test]
    async fn missing_month_returns_form_with_error() {
        let connection = Connection::open_in_memory().unwrap();
        let user_id = create_test_user(&connection);
        let state = BudgetState {
            local_timezone: "America/Sao_Paulo".to_owned(),
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response = create_budget_endpoint(
            State(state),
            Session { user_id },
            Form(HashMap::from([
                ("category_id".to_owned(), "1".to_owned()),
                ("type".to_owned(), "EXPENSE".to_owned()),
                ("month".to_owned(), String::new()),
                ("value".to_owned(), "10".to_owned()),
            ])),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert!(String::from_utf8_lossy(&body).contains("Mês do orçamento é obrigatório"));
    }
}
