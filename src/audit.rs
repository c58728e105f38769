//! The history of changes a user made, and the page that lists it.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use rusqlite::{Connection, Row};
use time::OffsetDateTime;

use crate::{
    AppState, Error, UserID,
    auth::Session,
    db::lock_connection,
    endpoints,
    format::format_date_time,
    html::app_page,
    table::{HeadCell, Table, TableRecord},
    timezone::get_local_offset,
};

/// One entry of the change history.
#[derive(Debug, Clone, PartialEq)]
pub struct Log {
    pub id: i64,
    pub user_id: UserID,
    /// What changed, e.g. "Conta \"Nubank\" adicionada".
    pub message: String,
    pub created_at: OffsetDateTime,
}

impl TableRecord for Log {
    fn cell(&self, id: &str) -> String {
        match id {
            "created_at" => format_date_time(self.created_at),
            "message" => self.message.clone(),
            _ => String::new(),
        }
    }
}

pub fn create_log_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS audit_log (
            id INTEGER PRIMARY KEY,
            user_id INTEGER NOT NULL REFERENCES user(id) ON DELETE CASCADE,
            message TEXT NOT NULL,
            created_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_audit_log_user_created
        ON audit_log(user_id, created_at);",
    )
}

/// Append `message` to the history of `user_id`, timestamped with the current time.
///
/// # Errors
///
/// Returns an [Error::SqlError] if the log could not be inserted.
pub fn record_log(user_id: UserID, message: &str, connection: &Connection) -> Result<(), Error> {
    connection.execute(
        "INSERT INTO audit_log (user_id, message, created_at) VALUES (?1, ?2, ?3)",
        (user_id.as_i64(), message, OffsetDateTime::now_utc()),
    )?;

    tracing::debug!("Recorded \"{message}\" for user {user_id}");

    Ok(())
}

/// The history of `user_id`, newest first.
pub fn get_logs(user_id: UserID, connection: &Connection) -> Result<Vec<Log>, Error> {
    connection
        .prepare(
            "SELECT id, user_id, message, created_at FROM audit_log
            WHERE user_id = :user_id
            ORDER BY created_at DESC, id DESC",
        )?
        .query_map(&[(":user_id", &user_id.as_i64())], map_row)?
        .map(|maybe_log| maybe_log.map_err(Error::from))
        .collect()
}

fn map_row(row: &Row) -> Result<Log, rusqlite::Error> {
    Ok(Log {
        id: row.get(0)?,
        user_id: UserID::new(row.get(1)?),
        message: row.get(2)?,
        created_at: row.get(3)?,
    })
}

/// The state needed for the history page.
#[derive(Debug, Clone)]
pub struct HistoryState {
    pub local_timezone: String,
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for HistoryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

const HISTORY_HEAD_CELLS: &[HeadCell] = &[
    HeadCell {
        id: "created_at",
        text: "Data",
    },
    HeadCell {
        id: "message",
        text: "Mensagem",
    },
];

/// Display the user's change history in local time.
pub async fn get_history_page(
    State(state): State<HistoryState>,
    session: Session,
) -> Result<Response, Error> {
    let local_offset = get_local_offset(&state.local_timezone)
        .ok_or_else(|| Error::InvalidTimezoneError(state.local_timezone.clone()))?;

    let logs = get_logs(session.user_id, &*lock_connection(&state.db_connection)?)?;
    let logs: Vec<Log> = logs
        .into_iter()
        .map(|log| Log {
            created_at: log.created_at.to_offset(local_offset),
            ..log
        })
        .collect();

    let content = Table::new("Histórico de operações", HISTORY_HEAD_CELLS, &logs).into_html();

    Ok(app_page("Histórico", endpoints::HISTORY_VIEW, &content).into_response())
}


#[cfg(test)]
mod history_page_tests {
    use std::sync::{Arc, Mutex};

    use axum::extract::State;
    use rusqlite::Connection;
    use scraper::Selector;

    use crate::{
        audit::{HistoryState, get_history_page, record_log},
        auth::Session,
        test_utils::{assert_valid_html, create_test_user, parse_html_document},
    };

    #[tokio::test]
    async fn lists_logs_without_actions_column() {
        let connection = Connection::open_in_memory().unwrap();
        let user_id = create_test_user(&connection);
        record_log(user_id, "Orçamento adicionado", &connection).unwrap();
        let state = HistoryState {
            local_timezone: "America/Sao_Paulo".to_owned(),
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response = get_history_page(State(state), Session { user_id })
            .await
            .unwrap();

        let document = parse_html_document(response).await;
        assert_valid_html(&document);
        let headers: Vec<String> = document
            .select(&Selector::parse("th").unwrap())
            .map(|th| th.text().collect())
            .collect();
        assert_eq!(headers, vec!["Data", "Mensagem"]);
        let text = document.root_element().text().collect::<String>();
        assert!(text.contains("Orçamento adicionado"));
    }
}
