//! The endpoint for deleting a budget.

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
};

use crate::{
    Notification,
    audit::record_log,
    auth::Session,
    budget::{BudgetId, BudgetState, delete_budget},
    db::lock_connection,
    format::format_month,
};

/// Delete the budget `budget_id`.
pub async fn delete_budget_endpoint(
    State(state): State<BudgetState>,
    session: Session,
    Path(budget_id): Path<BudgetId>,
) -> Response {
    let result = lock_connection(&state.db_connection).and_then(|connection| {
        let transaction = connection.unchecked_transaction()?;

        let budget = delete_budget(session.user_id, budget_id, &transaction)?;
        record_log(
            session.user_id,
            &format!(
                "Orçamento de \"{}\" para {} removido",
                budget.category_name,
                format_month(budget.month)
            ),
            &transaction,
        )?;

        transaction.commit()?;

        Ok(())
    });

    match result {
        // The status code has to be 200 OK or HTMX will not delete the table row.
        Ok(()) => Notification::success("Orçamento removido com sucesso!")
            .into_oob_html()
            .into_response(),
        Err(error) => error.into_alert_response("Erro ao remover orçamento!"),
    }
}

#[cfg(test)]
mod delete_budget_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::{Path, State},
        http::StatusCode,
    };
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error,
        audit::get_logs,
        auth::Session,
        budget::{BudgetState, NewBudget, create_budget, delete_budget_endpoint, get_budget},
        category::{NewCategory, TransactionType, create_category},
        test_utils::create_test_user,
    };

    #[tokio::test]
    async fn deletes_budget_and_logs_it() {
        let connection = Connection::open_in_memory().unwrap();
        let user_id = create_test_user(&connection);
        let category_id = create_category(
            user_id,
            &NewCategory {
                name: "Salário".to_owned(),
                transaction_type: TransactionType::Income,
            },
            &connection,
        )
        .unwrap()
        .id;
        let budget = create_budget(
            user_id,
            &NewBudget {
                category_id,
                transaction_type: TransactionType::Income,
                month: date!(2024 - 01 - 01),
                value: 5000.0,
            },
            &connection,
        )
        .unwrap();
        let state = BudgetState {
            local_timezone: "America/Sao_Paulo".to_owned(),
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response =
            delete_budget_endpoint(State(state.clone()), Session { user_id }, Path(budget.id))
                .await;

        assert_eq!(response.status(), StatusCode::OK);
        let connection = state.db_connection.lock().unwrap();
        assert_eq!(get_budget(user_id, budget.id, &connection), Err(Error::NotFound));
        assert_eq!(
            get_logs(user_id, &connection).unwrap()[0].message,
            "Orçamento de \"Salário\" para 01/2024 removido"
        );
    }

    #[tokio::test]
    async fn missing_budget_is_not_found() {
        let connection = Connection::open_in_memory().unwrap();
        let user_id = create_test_user(&connection);
        let state = BudgetState {
            local_timezone: "America/Sao_Paulo".to_owned(),
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response = delete_budget_endpoint(State(state), Session { user_id }, Path(9)).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
