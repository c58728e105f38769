//! The page listing the user's budgets.

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use serde::Deserialize;

use crate::{
    Error,
    auth::Session,
    budget::{Budget, BudgetFilter, BudgetState, form::load_category_options, get_budgets},
    category::TransactionType,
    db::lock_connection,
    endpoints::{self, format_endpoint},
    format::format_month,
    html::{app_page, filter_form, filter_select, value_style},
    notification::NoticeQuery,
    table::{HeadCell, RowDelete, Table, TableRecord, parse_filter},
};

/// The filters of the budgets page, as sent by the filter form.
#[derive(Debug, Default, Deserialize)]
pub struct BudgetsQuery {
    #[serde(rename = "type")]
    pub transaction_type: Option<String>,
    pub category_id: Option<String>,
}

impl BudgetsQuery {
    fn to_filter(&self) -> BudgetFilter {
        BudgetFilter {
            transaction_type: parse_filter(self.transaction_type.as_deref()),
            category_id: parse_filter(self.category_id.as_deref()),
        }
    }
}

const BUDGET_HEAD_CELLS: &[HeadCell] = &[
    HeadCell {
        id: "category",
        text: "Categoria",
    },
    HeadCell {
        id: "type",
        text: "Tipo",
    },
    HeadCell {
        id: "month",
        text: "Mês",
    },
    HeadCell {
        id: "value",
        text: "Valor Planejado",
    },
    HeadCell {
        id: "usage",
        text: "Valor Atual",
    },
    HeadCell {
        id: "remaining",
        text: "Restante",
    },
];

/// An exceeded budget shows its remaining amount in red.
fn format_budget_cell(budget: &Budget, id: &str) -> Markup {
    match id {
        "type" => {
            let style = value_style(budget.transaction_type == TransactionType::Income);
            html!(span class=(style) { (budget.cell(id)) })
        }
        "remaining" => {
            html!(span class=(value_style(budget.remaining() >= 0.0)) { (budget.cell(id)) })
        }
        _ => html!((budget.cell(id))),
    }
}

/// Display the user's budgets that match the filters in the query.
pub async fn get_budgets_page(
    State(state): State<BudgetState>,
    session: Session,
    Query(query): Query<BudgetsQuery>,
    Query(notice): Query<NoticeQuery>,
) -> Result<Response, Error> {
    let (budgets, category_options) = {
        let connection = lock_connection(&state.db_connection)?;

        (
            get_budgets(session.user_id, &query.to_filter(), &connection)?,
            load_category_options(session.user_id, &connection)?,
        )
    };

    let filter = filter_form(
        endpoints::BUDGETS_VIEW,
        &html! {
            (filter_select("Tipo", "type", &TransactionType::options(), query.transaction_type.as_deref()))
            (filter_select("Categoria", "category_id", &category_options, query.category_id.as_deref()))
        },
    );

    let table = Table::new("Seus Orçamentos", BUDGET_HEAD_CELLS, &budgets)
        .format(format_budget_cell)
        .add_url(endpoints::NEW_BUDGET_VIEW)
        .filter(filter)
        .edit_url(|budget: &Budget| format_endpoint(endpoints::EDIT_BUDGET_VIEW, budget.id))
        .delete(|budget: &Budget| RowDelete {
            url: format_endpoint(endpoints::DELETE_BUDGET, budget.id),
            confirm_message: format!(
                "Deseja remover o orçamento de \"{}\" para {}?",
                budget.category_name,
                format_month(budget.month)
            ),
        })
        .into_html();

    let content = html! {
        (notice.into_html())
        (table)
    };

    Ok(app_page("Orçamentos", endpoints::BUDGETS_VIEW, &content).into_response())
}

#[cfg(test)]
mod budgets_page_tests {
    use std::sync::{Arc, Mutex};

    use axum::extract::{Query, State};
    use rusqlite::Connection;
    use scraper::{Html, Selector};
    use time::macros::date;

    use crate::{
        account::create_account,
        auth::Session,
        budget::{BudgetState, NewBudget, budgets_page::BudgetsQuery, create_budget, get_budgets_page},
        category::{NewCategory, TransactionType, create_category},
        html::NEGATIVE_VALUE_STYLE,
        notification::NoticeQuery,
        test_utils::{assert_valid_html, create_test_user, parse_html_document},
        transaction::{NewTransaction, create_transaction},
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
    async fn shows_planned_used_and_remaining() {
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
        create_budget(
            user_id,
            &NewBudget {
                category_id,
                transaction_type: TransactionType::Expense,
                month: date!(2024 - 03 - 01),
                value: 100.0,
            },
            &connection,
        )
        .unwrap();
        create_transaction(
            user_id,
            &NewTransaction {
                account_id,
                category_id,
                transaction_type: TransactionType::Expense,
                description: "Feira".to_owned(),
                transaction_date: date!(2024 - 03 - 10),
                value: 150.0,
            },
            &connection,
        )
        .unwrap();
        let state = BudgetState {
            local_timezone: "America/Sao_Paulo".to_owned(),
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response = get_budgets_page(
            State(state),
            Session { user_id },
            Query(BudgetsQuery::default()),
            Query(NoticeQuery::default()),
        )
        .await
        .unwrap();

        let document = parse_html_document(response).await;
        assert_valid_html(&document);
        let rows = rows(&document);
        assert_eq!(rows.len(), 1);
        assert_eq!(
            rows[0][..6],
            ["Mercado", "Despesa", "03/2024", "R$ 100,00", "R$ 150,00", "-R$ 50,00"]
        );
        let remaining = document
            .select(&Selector::parse("tbody tr td:nth-child(6) span").unwrap())
            .next()
            .expect("No remaining value found");
        assert!(
            remaining
                .value()
                .attr("class")
                .is_some_and(|class| class.contains(NEGATIVE_VALUE_STYLE))
        );
    }

    #[tokio::test]
    async fn filters_by_type() {
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
        create_budget(
            user_id,
            &NewBudget {
                category_id,
                transaction_type: TransactionType::Expense,
                month: date!(2024 - 03 - 01),
                value: 100.0,
            },
            &connection,
        )
        .unwrap();
        let state = BudgetState {
            local_timezone: "America/Sao_Paulo".to_owned(),
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response = get_budgets_page(
            State(state),
            Session { user_id },
            Query(BudgetsQuery {
                transaction_type: Some("INCOME".to_owned()),
                category_id: None,
            }),
            Query(NoticeQuery::default()),
        )
        .await
        .unwrap();

        let document = parse_html_document(response).await;
        let text = document.root_element().text().collect::<String>();
        assert!(text.contains(crate::table::EMPTY_TABLE_MESSAGE));
    }
}
