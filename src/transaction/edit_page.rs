//! The page for editing a transaction.

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
};

use crate::{
    Error,
    auth::Session,
    db::lock_connection,
    endpoints::{self, format_endpoint},
    form::{FormState, view::Submit},
    html::form_page,
    transaction::{
        TransactionId, TransactionState,
        form::{TransactionForm, TransactionOptions, transaction_form_view, validate_transaction},
        get_transaction,
    },
};

/// Display the transaction form filled in with the transaction `transaction_id`.
pub async fn get_edit_transaction_page(
    State(state): State<TransactionState>,
    session: Session,
    Path(transaction_id): Path<TransactionId>,
) -> Result<Response, Error> {
    let (transaction, options) = {
        let connection = lock_connection(&state.db_connection)?;

        (
            get_transaction(session.user_id, transaction_id, &connection)?,
            TransactionOptions::load(session.user_id, &connection)?,
        )
    };

    let form = FormState::new(TransactionForm::from(&transaction), Some(validate_transaction));
    let put_url = format_endpoint(endpoints::PUT_TRANSACTION, transaction_id);

    Ok(form_page(
        "Editar Transação",
        endpoints::TRANSACTIONS_VIEW,
        &transaction_form_view(&form, &options, Submit::Put(&put_url), "Salvar"),
    )
    .into_response())
}

#[cfg(test)]
mod edit_transaction_page_tests {
    use std::sync::{Arc, Mutex};

    use axum::extract::{Path, State};
    use rusqlite::Connection;
    use scraper::Selector;
    use time::macros::date;

    use crate::{
        Error,
        account::create_account,
        auth::Session,
        category::{NewCategory, TransactionType, create_category},
        test_utils::{
            assert_form_input_with_value, assert_valid_html, create_test_user, must_get_form,
            parse_html_document,
        },
        transaction::{
            NewTransaction, TransactionState, create_transaction, get_edit_transaction_page,
        },
    };

    #[tokio::test]
    async fn form_has_transaction_values() {
        let connection = Connection::open_in_memory().unwrap();
        let user_id = create_test_user(&connection);
        let account_id = create_account(user_id, "Nubank", &connection).unwrap().id;
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
        let transaction = create_transaction(
            user_id,
            &NewTransaction {
                account_id,
                category_id,
                transaction_type: TransactionType::Expense,
                description: "Feira".to_owned(),
                transaction_date: date!(2024 - 03 - 02),
                value: 87.5,
            },
            &connection,
        )
        .unwrap();
        let state = TransactionState {
            local_timezone: "America/Sao_Paulo".to_owned(),
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response =
            get_edit_transaction_page(State(state), Session { user_id }, Path(transaction.id))
                .await
                .unwrap();

        let document = parse_html_document(response).await;
        assert_valid_html(&document);
        let form = must_get_form(&document);
        assert_form_input_with_value(&form, "description", "text", "Feira");
        assert_form_input_with_value(&form, "transaction_date", "date", "2024-03-02");
        assert_form_input_with_value(&form, "value", "number", "87.5");
        let selected_category: Vec<String> = form
            .select(&Selector::parse("select[name=category_id] option[selected]").unwrap())
            .map(|option| option.value().attr("value").unwrap_or_default().to_owned())
            .collect();
        assert_eq!(selected_category, vec![category_id.to_string()]);
    }

    #[tokio::test]
    async fn missing_transaction_is_not_found() {
        let connection = Connection::open_in_memory().unwrap();
        let user_id = create_test_user(&connection);
        let state = TransactionState {
            local_timezone: "America/Sao_Paulo".to_owned(),
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let result = get_edit_transaction_page(State(state), Session { user_id }, Path(1)).await;

        assert_eq!(result.err(), Some(Error::NotFound));
    }
}
