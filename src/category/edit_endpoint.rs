//! The endpoint for updating a category.

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
    category::{
        CategoryId, CategoryState,
        form::{category_form_from_input, category_form_view},
        update_category,
    },
    db::lock_connection,
    endpoints::{self, format_endpoint, with_notice},
    form::view::Submit,
};

/// Update the category `category_id` from the submitted form and redirect to
/// the categories page.
pub async fn edit_category_endpoint(
    State(state): State<CategoryState>,
    session: Session,
    Path(category_id): Path<CategoryId>,
    Form(raw_form): Form<HashMap<String, String>>,
) -> Response {
    let mut form = category_form_from_input(&raw_form);

    if !form.validate() {
        let put_url = format_endpoint(endpoints::PUT_CATEGORY, category_id);
        return category_form_view(&form, Submit::Put(&put_url), "Salvar").into_response();
    }

    let result = form.parse().and_then(|category_form| {
        let connection = lock_connection(&state.db_connection)?;
        let transaction = connection.unchecked_transaction()?;

        let name = category_form.name.trim().to_owned();
        update_category(session.user_id, category_id, &category_form.into(), &transaction)?;
        record_log(
            session.user_id,
            &format!("Categoria \"{name}\" atualizada"),
            &transaction,
        )?;

        transaction.commit()?;

        Ok(())
    });

    match result {
        Ok(()) => (
            HxRedirect(with_notice(
                endpoints::CATEGORIES_VIEW,
                "Categoria atualizada com sucesso!",
            )),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => error.into_alert_response("Erro ao atualizar categoria!"),
    }
}

#[cfg(test)]
mod edit_category_endpoint_tests {
    use std::{
        collections::HashMap,
        sync::{Arc, Mutex},
    };

    use axum::{
        Form,
        extract::{Path, State},
        http::StatusCode,
    };
    use rusqlite::Connection;

    use crate::{
        auth::Session,
        category::{
            CategoryState, NewCategory, TransactionType, create_category, edit_category_endpoint,
            get_category,
        },
        endpoints::{self, with_notice},
        test_utils::{assert_hx_redirect, create_test_user},
    };

    fn form(name: &str, transaction_type: &str) -> Form<HashMap<String, String>> {
        Form(HashMap::from([
            ("name".to_owned(), name.to_owned()),
            ("type".to_owned(), transaction_type.to_owned()),
        ]))
    }

    #[tokio::test]
    async fn updates_category() {
        let connection = Connection::open_in_memory().unwrap();
        let user_id = create_test_user(&connection);
        let category = create_category(
            user_id,
            &NewCategory {
                name: "Mercado".to_owned(),
                transaction_type: TransactionType::Expense,
            },
            &connection,
        )
        .unwrap();
        let state = CategoryState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response = edit_category_endpoint(
            State(state.clone()),
            Session { user_id },
            Path(category.id),
            form("Supermercado", "EXPENSE"),
        )
        .await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(
            &response,
            &with_notice(endpoints::CATEGORIES_VIEW, "Categoria atualizada com sucesso!"),
        );
        let connection = state.db_connection.lock().unwrap();
        let got = get_category(user_id, category.id, &connection).unwrap();
        assert_eq!(got.name, "Supermercado");
    }

    #[tokio::test]
    async fn missing_category_shows_alert() {
        let connection = Connection::open_in_memory().unwrap();
        let user_id = create_test_user(&connection);
        let state = CategoryState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response = edit_category_endpoint(
            State(state),
            Session { user_id },
            Path(7),
            form("Mercado", "EXPENSE"),
        )
        .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert!(String::from_utf8_lossy(&body).contains("Erro ao atualizar categoria!"));
    }
}
