//! The page listing the user's transactions.

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use serde::Deserialize;
use time::Date;

use crate::{
    Error,
    auth::Session,
    category::TransactionType,
    db::lock_connection,
    endpoints::{self, format_endpoint},
    form::{FieldKind, FieldValue},
    format::format_currency,
    html::{app_page, filter_form, filter_input, filter_select, value_style},
    notification::NoticeQuery,
    table::{HeadCell, RowDelete, Table, TableRecord, parse_filter},
    transaction::{
        Transaction, TransactionFilter, TransactionState, form::TransactionOptions,
        get_transactions,
    },
};

/// The filters of the transactions page, as sent by the filter form.
#[derive(Debug, Default, Deserialize)]
pub struct TransactionsQuery {
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub transaction_type: Option<String>,
    pub account_id: Option<String>,
    pub category_id: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
}

fn parse_date_filter(raw: Option<&str>) -> Option<Date> {
    raw.and_then(|raw| FieldValue::from_input(FieldKind::Date, raw).as_date())
}

impl TransactionsQuery {
    fn to_filter(&self) -> TransactionFilter {
        TransactionFilter {
            description: parse_filter(self.description.as_deref()),
            transaction_type: parse_filter(self.transaction_type.as_deref()),
            account_id: parse_filter(self.account_id.as_deref()),
            category_id: parse_filter(self.category_id.as_deref()),
            date_from: parse_date_filter(self.date_from.as_deref()),
            date_to: parse_date_filter(self.date_to.as_deref()),
        }
    }

    fn filter_fields(&self, options: &TransactionOptions) -> Markup {
        html! {
            (filter_input("Descrição", "description", "text", self.description.as_deref()))
            (filter_select("Tipo", "type", &TransactionType::options(), self.transaction_type.as_deref()))
            (filter_select("Conta", "account_id", &options.accounts, self.account_id.as_deref()))
            (filter_select("Categoria", "category_id", &options.categories, self.category_id.as_deref()))
            (filter_input("De", "date_from", "date", self.date_from.as_deref()))
            (filter_input("Até", "date_to", "date", self.date_to.as_deref()))
        }
    }
}

const TRANSACTION_HEAD_CELLS: &[HeadCell] = &[
    HeadCell {
        id: "transaction_date",
        text: "Data",
    },
    HeadCell {
        id: "description",
        text: "Descrição",
    },
    HeadCell {
        id: "type",
        text: "Tipo",
    },
    HeadCell {
        id: "category",
        text: "Categoria",
    },
    HeadCell {
        id: "account",
        text: "Conta",
    },
    HeadCell {
        id: "value",
        text: "Valor",
    },
];

/// Income is shown in green and expenses in red.
fn format_transaction_cell(transaction: &Transaction, id: &str) -> Markup {
    let style = value_style(transaction.transaction_type == TransactionType::Income);

    match id {
        "type" | "category" => html!(span class=(style) { (transaction.cell(id)) }),
        "value" => html!(span class=(style) { (format_currency(transaction.value)) }),
        _ => html!((transaction.cell(id))),
    }
}

/// Display the user's transactions that match the filters in the query.
pub async fn get_transactions_page(
    State(state): State<TransactionState>,
    session: Session,
    Query(query): Query<TransactionsQuery>,
    Query(notice): Query<NoticeQuery>,
) -> Result<Response, Error> {
    let (transactions, options) = {
        let connection = lock_connection(&state.db_connection)?;

        (
            get_transactions(session.user_id, &query.to_filter(), &connection)?,
            TransactionOptions::load(session.user_id, &connection)?,
        )
    };

    let table = Table::new("Suas Transações", TRANSACTION_HEAD_CELLS, &transactions)
        .format(format_transaction_cell)
        .add_url(endpoints::NEW_TRANSACTION_VIEW)
        .filter(filter_form(
            endpoints::TRANSACTIONS_VIEW,
            &query.filter_fields(&options),
        ))
        .edit_url(|transaction: &Transaction| {
            format_endpoint(endpoints::EDIT_TRANSACTION_VIEW, transaction.id)
        })
        .delete(|transaction: &Transaction| RowDelete {
            url: format_endpoint(endpoints::DELETE_TRANSACTION, transaction.id),
            confirm_message: "Você tem certeza que deseja excluir essa transação? \
                Esta operação não poderá ser desfeita."
                .to_owned(),
        })
        .into_html();

    let content = html! {
        (notice.into_html())
        (table)
    };

    Ok(app_page("Transações", endpoints::TRANSACTIONS_VIEW, &content).into_response())
}
