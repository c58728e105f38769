//! The page listing the user's categories.

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use maud::html;
use serde::Deserialize;

use crate::{
    Error,
    auth::Session,
    category::{Category, CategoryFilter, CategoryState, TransactionType, get_categories},
    db::lock_connection,
    endpoints::{self, format_endpoint},
    html::{app_page, filter_form, filter_input, filter_select},
    notification::NoticeQuery,
    table::{HeadCell, RowDelete, Table, parse_filter},
};

/// The filters of the categories page, as sent by the filter form.
#[derive(Debug, Default, Deserialize)]
pub struct CategoriesQuery {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub transaction_type: Option<String>,
}

impl CategoriesQuery {
    fn to_filter(&self) -> CategoryFilter {
        CategoryFilter {
            name: parse_filter(self.name.as_deref()),
            transaction_type: parse_filter(self.transaction_type.as_deref()),
        }
    }
}

const CATEGORY_HEAD_CELLS: &[HeadCell] = &[
    HeadCell {
        id: "name",
        text: "Nome",
    },
    HeadCell {
        id: "type",
        text: "Tipo",
    },
];

/// Display the user's categories that match the filters in the query.
pub async fn get_categories_page(
    State(state): State<CategoryState>,
    session: Session,
    Query(query): Query<CategoriesQuery>,
    Query(notice): Query<NoticeQuery>,
) -> Result<Response, Error> {
    let categories = get_categories(
        session.user_id,
        &query.to_filter(),
        &*lock_connection(&state.db_connection)?,
    )?;

    let filter = filter_form(
        endpoints::CATEGORIES_VIEW,
        &html! {
            (filter_input("Nome", "name", "text", query.name.as_deref()))
            (filter_select("Tipo", "type", &TransactionType::options(), query.transaction_type.as_deref()))
        },
    );

    let table = Table::new("Suas Categorias", CATEGORY_HEAD_CELLS, &categories)
        .add_url(endpoints::NEW_CATEGORY_VIEW)
        .filter(filter)
        .edit_url(|category: &Category| format_endpoint(endpoints::EDIT_CATEGORY_VIEW, category.id))
        .delete(|category: &Category| RowDelete {
            url: format_endpoint(endpoints::DELETE_CATEGORY, category.id),
            confirm_message: format!("Deseja remover a categoria \"{}\"?", category.name),
        })
        .into_html();

    let content = html! {
        (notice.into_html())
        (table)
    };

    Ok(app_page("Categorias", endpoints::CATEGORIES_VIEW, &content).into_response())
}

#[cfg(test)]
mod categories_page_tests {
    use std::sync::{Arc, Mutex};

    use axum::extract::{Query, State};
    use rusqlite::Connection;
    use scraper::Selector;

    use crate::{
        auth::Session,
        category::{
            CategoryState, NewCategory, TransactionType, categories_page::CategoriesQuery,
            create_category, get_categories_page,
        },
        notification::NoticeQuery,
        table::EMPTY_TABLE_MESSAGE,
        test_utils::{assert_valid_html, create_test_user, parse_html_document},
    };

    fn row_texts(document: &scraper::Html) -> Vec<String> {
        document
            .select(&Selector::parse("tbody tr td:first-child").unwrap())
            .map(|cell| cell.text().collect::<String>())
            .collect()
    }

    #[tokio::test]
    async fn lists_filtered_categories() {
        let connection = Connection::open_in_memory().unwrap();
        let user_id = create_test_user(&connection);
        for (name, transaction_type) in [
            ("Mercado", TransactionType::Expense),
            ("Salário", TransactionType::Income),
        ] {
            create_category(
                user_id,
                &NewCategory {
                    name: name.to_owned(),
                    transaction_type,
                },
                &connection,
            )
            .unwrap();
        }
        let state = CategoryState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response = get_categories_page(
            State(state),
            Session { user_id },
            Query(CategoriesQuery {
                name: None,
                transaction_type: Some("INCOME".to_owned()),
            }),
            Query(NoticeQuery::default()),
        )
        .await
        .unwrap();

        let document = parse_html_document(response).await;
        assert_valid_html(&document);
        assert_eq!(row_texts(&document), vec!["Salário"]);
    }

    #[tokio::test]
    async fn shows_empty_message_and_notice() {
        let connection = Connection::open_in_memory().unwrap();
        let user_id = create_test_user(&connection);
        let state = CategoryState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response = get_categories_page(
            State(state),
            Session { user_id },
            Query(CategoriesQuery::default()),
            Query(NoticeQuery {
                notice: Some("Categoria removida com sucesso!".to_owned()),
            }),
        )
        .await
        .unwrap();

        let document = parse_html_document(response).await;
        let text = document.root_element().text().collect::<String>();
        assert!(text.contains(EMPTY_TABLE_MESSAGE));
        assert!(text.contains("Categoria removida com sucesso!"));
    }
}
