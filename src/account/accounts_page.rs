//! The page listing the user's accounts and their balances.

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use maud::html;
use serde::Deserialize;

use crate::{
    Error,
    account::{Account, AccountFilter, AccountState, get_accounts},
    auth::Session,
    db::lock_connection,
    endpoints::{self, format_endpoint},
    html::{app_page, filter_form, filter_input},
    notification::NoticeQuery,
    table::{HeadCell, RowDelete, Table, parse_filter},
};

/// The filters of the accounts page, as sent by the filter form.
#[derive(Debug, Default, Deserialize)]
pub struct AccountsQuery {
    pub name: Option<String>,
}

const ACCOUNT_HEAD_CELLS: &[HeadCell] = &[
    HeadCell {
        id: "name",
        text: "Nome",
    },
    HeadCell {
        id: "balance",
        text: "Saldo",
    },
];

/// Display the user's accounts that match the filters in the query.
pub async fn get_accounts_page(
    State(state): State<AccountState>,
    session: Session,
    Query(query): Query<AccountsQuery>,
    Query(notice): Query<NoticeQuery>,
) -> Result<Response, Error> {
    let filter = AccountFilter {
        name: parse_filter(query.name.as_deref()),
    };
    let accounts = get_accounts(
        session.user_id,
        &filter,
        &*lock_connection(&state.db_connection)?,
    )?;

    let filter_html = filter_form(
        endpoints::ACCOUNTS_VIEW,
        &filter_input("Nome", "name", "text", query.name.as_deref()),
    );

    let table = Table::new("Suas Contas", ACCOUNT_HEAD_CELLS, &accounts)
        .add_url(endpoints::NEW_ACCOUNT_VIEW)
        .filter(filter_html)
        .edit_url(|account: &Account| format_endpoint(endpoints::EDIT_ACCOUNT_VIEW, account.id))
        .delete(|account: &Account| RowDelete {
            url: format_endpoint(endpoints::DELETE_ACCOUNT, account.id),
            confirm_message: format!(
                "Deseja remover a conta \"{}\"? As transações da conta também serão removidas.",
                account.name
            ),
        })
        .into_html();

    let content = html! {
        (notice.into_html())
        (table)
    };

    Ok(app_page("Contas", endpoints::ACCOUNTS_VIEW, &content).into_response())
}

#[cfg(test)]
mod accounts_page_tests {
    use std::sync::{Arc, Mutex};

    use axum::extract::{Query, State};
    use rusqlite::Connection;
    use scraper::{Html, Selector};

    use crate::{
        account::{AccountState, accounts_page::AccountsQuery, create_account, get_accounts_page},
        auth::Session,
        endpoints,
        notification::NoticeQuery,
        test_utils::{assert_valid_html, create_test_user, parse_html_document},
    };

    fn rows(document: &Html) -> Vec<Vec<String>> {
        let row_selector = Selector::parse("tbody tr").unwrap();
        let cell_selector = Selector::parse("td").unwrap();

        document
            .select(&row_selector)
            .map(|row| {
                row.select(&cell_selector)
                    .map(|cell| cell.text().collect::<String>().trim().to_owned())
                    .collect()
            })
            .collect()
    }

    #[tokio::test]
    async fn lists_accounts_with_balance_and_actions() {
        let connection = Connection::open_in_memory().unwrap();
        let user_id = create_test_user(&connection);
        let account = create_account(user_id, "Nubank", &connection).unwrap();
        let state = AccountState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response = get_accounts_page(
            State(state),
            Session { user_id },
            Query(AccountsQuery::default()),
            Query(NoticeQuery::default()),
        )
        .await
        .unwrap();

        let document = parse_html_document(response).await;
        assert_valid_html(&document);
        let rows = rows(&document);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0][0], "Nubank");
        assert_eq!(rows[0][1], "R$ 0,00");

        let edit_link = document
            .select(&Selector::parse("tbody a").unwrap())
            .next()
            .expect("No edit link found");
        assert_eq!(
            edit_link.value().attr("href"),
            Some(format!("/accounts/{}/edit", account.id).as_str())
        );
        let add_link = document
            .select(&Selector::parse("section header a").unwrap())
            .next()
            .expect("No add link found");
        assert_eq!(add_link.value().attr("href"), Some(endpoints::NEW_ACCOUNT_VIEW));
    }

    #[tokio::test]
    async fn filters_by_name() {
        let connection = Connection::open_in_memory().unwrap();
        let user_id = create_test_user(&connection);
        create_account(user_id, "Nubank", &connection).unwrap();
        create_account(user_id, "Carteira", &connection).unwrap();
        let state = AccountState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response = get_accounts_page(
            State(state),
            Session { user_id },
            Query(AccountsQuery {
                name: Some("cart".to_owned()),
            }),
            Query(NoticeQuery::default()),
        )
        .await
        .unwrap();

        let document = parse_html_document(response).await;
        let rows = rows(&document);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0][0], "Carteira");
    }
}
