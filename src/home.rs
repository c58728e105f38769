//! The landing page: a greeting, the total balance and the balance of the current month.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use time::Date;

use crate::{
    AppState, Error, UserID,
    account::get_total_balance,
    auth::Session,
    build_error_message,
    db::lock_connection,
    endpoints,
    format::{format_currency, format_date},
    html::{app_page, value_style},
    timezone::local_now,
    user::get_user_by_id,
};

/// The state needed by the home page.
#[derive(Debug, Clone)]
pub struct HomeState {
    /// The local timezone as a canonical timezone name, e.g. "America/Sao_Paulo".
    pub local_timezone: String,
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for HomeState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Income minus expenses over one calendar month.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthBalance {
    pub value: f64,
    /// The first day of the month.
    pub period_from: Date,
    /// The last day of the month.
    pub period_to: Date,
}

/// The balance of `user_id` over the month containing `today`.
pub fn get_month_balance(
    user_id: UserID,
    today: Date,
    connection: &Connection,
) -> Result<MonthBalance, Error> {
    let period_from = today
        .replace_day(1)
        .map_err(|_| Error::InvalidDateFormat(today.to_string()))?;
    let period_to = today
        .replace_day(today.month().length(today.year()))
        .map_err(|_| Error::InvalidDateFormat(today.to_string()))?;

    let value = connection.query_row(
        "SELECT COALESCE(SUM(CASE type WHEN 'INCOME' THEN value ELSE -value END), 0.0)
        FROM \"transaction\"
        WHERE user_id = ?1 AND transaction_date >= ?2 AND transaction_date <= ?3",
        (user_id.as_i64(), period_from, period_to),
        |row| row.get(0),
    )?;

    Ok(MonthBalance {
        value,
        period_from,
        period_to,
    })
}

struct HomeData {
    full_name: String,
    total_balance: f64,
    month_balance: MonthBalance,
}

fn load_home_data(state: &HomeState, user_id: UserID) -> Result<HomeData, Error> {
    let today = local_now(&state.local_timezone)?.date();
    let connection = lock_connection(&state.db_connection)?;

    Ok(HomeData {
        full_name: get_user_by_id(user_id, &connection)?.full_name(),
        total_balance: get_total_balance(user_id, &connection)?,
        month_balance: get_month_balance(user_id, today, &connection)?,
    })
}

fn balance_card(title: &str, value: f64, subtitle: Option<String>) -> Markup {
    html! {
        div class="p-6 bg-white rounded-lg shadow dark:bg-gray-800 flex flex-col gap-4"
        {
            h2 class="text-xl font-semibold" { (title) }

            @if let Some(subtitle) = subtitle {
                p class="text-sm text-gray-500 dark:text-gray-400" { (subtitle) }
            }

            p class={ "text-4xl " (value_style(value >= 0.0)) } data-balance { (format_currency(value)) }
        }
    }
}

/// Display the greeting and the user's balances.
///
/// If the balances cannot be loaded, the page shows an error notification instead.
pub async fn get_home_page(State(state): State<HomeState>, session: Session) -> Response {
    let content = match load_home_data(&state, session.user_id) {
        Ok(data) => html! {
            section class="w-full max-w-4xl space-y-6"
            {
                h1 class="text-2xl font-bold" { "Bem vindo(a), " br; (data.full_name) }

                div class="grid gap-6 md:grid-cols-2"
                {
                    (balance_card("Saldo Total", data.total_balance, None))
                    (balance_card(
                        "Saldo do Mês",
                        data.month_balance.value,
                        Some(format!(
                            "De {} até {}",
                            format_date(data.month_balance.period_from),
                            format_date(data.month_balance.period_to)
                        )),
                    ))
                }
            }
        },
        Err(error) => {
            tracing::error!("could not load the home page for user {}: {error}", session.user_id);
            build_error_message(&error, "Erro ao carregar informações!").into_html()
        }
    };

    app_page("Início", endpoints::HOME_VIEW, &content).into_response()
}

#[cfg(test)]
mod home_tests {
    use std::sync::{Arc, Mutex};

    use axum::extract::State;
    use rusqlite::Connection;
    use scraper::Selector;
    use time::macros::date;

    use crate::{
        account::create_account,
        auth::Session,
        category::{NewCategory, TransactionType, create_category},
        home::{HomeState, MonthBalance, get_home_page, get_month_balance},
        html::{NEGATIVE_VALUE_STYLE, POSITIVE_VALUE_STYLE},
        test_utils::{assert_valid_html, create_test_user, parse_html_document},
        transaction::{NewTransaction, create_transaction},
    };

    fn add_transaction(
        connection: &Connection,
        user_id: crate::UserID,
        transaction_type: TransactionType,
        transaction_date: time::Date,
        value: f64,
    ) {
        let account_id = match create_account(user_id, "Nubank", connection) {
            Ok(account) => account.id,
            Err(_) => connection
                .query_row("SELECT id FROM account WHERE name = 'Nubank'", [], |row| {
                    row.get(0)
                })
                .unwrap(),
        };
        let category_id = create_category(
            user_id,
            &NewCategory {
                name: "Geral".to_owned(),
                transaction_type,
            },
            connection,
        )
        .unwrap()
        .id;
        create_transaction(
            user_id,
            &NewTransaction {
                account_id,
                category_id,
                transaction_type,
                description: "Teste".to_owned(),
                transaction_date,
                value,
            },
            connection,
        )
        .unwrap();
    }

    #[test]
    fn month_balance_covers_whole_month() {
        let connection = Connection::open_in_memory().unwrap();
        let user_id = create_test_user(&connection);
        add_transaction(&connection, user_id, TransactionType::Income, date!(2024 - 02 - 01), 1000.0);
        add_transaction(&connection, user_id, TransactionType::Expense, date!(2024 - 02 - 29), 300.0);
        add_transaction(&connection, user_id, TransactionType::Expense, date!(2024 - 03 - 01), 50.0);

        let balance = get_month_balance(user_id, date!(2024 - 02 - 10), &connection).unwrap();

        assert_eq!(
            balance,
            MonthBalance {
                value: 700.0,
                period_from: date!(2024 - 02 - 01),
                period_to: date!(2024 - 02 - 29),
            }
        );
    }

    #[tokio::test]
    async fn greets_user_and_colors_balances() {
        let connection = Connection::open_in_memory().unwrap();
        let user_id = create_test_user(&connection);
        add_transaction(&connection, user_id, TransactionType::Expense, date!(2020 - 01 - 10), 25.0);
        let state = HomeState {
            local_timezone: "America/Sao_Paulo".to_owned(),
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response = get_home_page(State(state), Session { user_id }).await;

        let document = parse_html_document(response).await;
        assert_valid_html(&document);
        let text = document.root_element().text().collect::<String>();
        assert!(text.contains("Bem vindo(a), "));
        assert!(text.contains("Maria Silva"));
        assert!(text.contains("Saldo Total"));
        assert!(text.contains("Saldo do Mês"));

        let balances: Vec<_> = document
            .select(&Selector::parse("p[data-balance]").unwrap())
            .collect();
        assert_eq!(balances.len(), 2);
        assert_eq!(balances[0].text().collect::<String>(), "-R$ 25,00");
        assert!(
            balances[0]
                .value()
                .attr("class")
                .is_some_and(|class| class.contains(NEGATIVE_VALUE_STYLE))
        );
        // The only transaction is years old, so this month is empty.
        assert_eq!(balances[1].text().collect::<String>(), "R$ 0,00");
        assert!(
            balances[1]
                .value()
                .attr("class")
                .is_some_and(|class| class.contains(POSITIVE_VALUE_STYLE))
        );
    }

    #[tokio::test]
    async fn invalid_timezone_shows_error_notification() {
        let connection = Connection::open_in_memory().unwrap();
        let user_id = create_test_user(&connection);
        let state = HomeState {
            local_timezone: "Mars/Olympus_Mons".to_owned(),
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response = get_home_page(State(state), Session { user_id }).await;

        let document = parse_html_document(response).await;
        let text = document.root_element().text().collect::<String>();
        assert!(text.contains("Erro ao carregar informações!"));
    }
}
