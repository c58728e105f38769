//! The account model, its table and the database queries for accounts.

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use rusqlite::{Connection, Row};

use crate::{AppState, Error, UserID, format::format_currency, table::TableRecord};

pub type AccountId = i64;

/// Somewhere money is kept, e.g. a bank account or a wallet.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    pub id: AccountId,
    pub user_id: UserID,
    pub name: String,
    /// Income minus expenses over all of the account's transactions.
    pub balance: f64,
}

impl TableRecord for Account {
    fn cell(&self, id: &str) -> String {
        match id {
            "name" => self.name.clone(),
            "balance" => format_currency(self.balance),
            _ => String::new(),
        }
    }
}

/// Narrows the accounts listed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AccountFilter {
    /// Only accounts with this text in their name, ignoring case.
    pub name: Option<String>,
}

/// The state needed by the account route handlers.
#[derive(Debug, Clone)]
pub struct AccountState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for AccountState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

pub fn create_account_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS account (
            id INTEGER PRIMARY KEY,
            user_id INTEGER NOT NULL REFERENCES user(id) ON DELETE CASCADE,
            name TEXT NOT NULL,
            UNIQUE(user_id, name)
        );",
    )
}

fn map_duplicate_name(error: rusqlite::Error, name: &str) -> Error {
    match error {
        // Code 2067 occurs when a UNIQUE constraint failed.
        rusqlite::Error::SqliteFailure(sql_error, _) if sql_error.extended_code == 2067 => {
            Error::DuplicateAccountName(name.to_owned())
        }
        error => error.into(),
    }
}

/// Create an account named `name` for `user_id`. New accounts have no
/// transactions, so their balance is zero.
///
/// # Errors
///
/// Returns an [Error::DuplicateAccountName] if the user already has an
/// account with the same name.
pub fn create_account(
    user_id: UserID,
    name: &str,
    connection: &Connection,
) -> Result<Account, Error> {
    let name = name.trim();

    connection
        .execute(
            "INSERT INTO account (user_id, name) VALUES (?1, ?2)",
            (user_id.as_i64(), name),
        )
        .map_err(|error| map_duplicate_name(error, name))?;

    Ok(Account {
        id: connection.last_insert_rowid(),
        user_id,
        name: name.to_owned(),
        balance: 0.0,
    })
}

const SELECT_ACCOUNTS: &str = "SELECT account.id, account.user_id, account.name,
        COALESCE(SUM(CASE \"transaction\".type
            WHEN 'INCOME' THEN \"transaction\".value
            ELSE -\"transaction\".value
        END), 0.0)
    FROM account
    LEFT JOIN \"transaction\" ON \"transaction\".account_id = account.id";

/// Get the account `id` of `user_id`, with its balance.
///
/// # Errors
///
/// Returns [Error::NotFound] if the user has no such account.
pub fn get_account(user_id: UserID, id: AccountId, connection: &Connection) -> Result<Account, Error> {
    connection
        .prepare(&format!(
            "{SELECT_ACCOUNTS}
            WHERE account.id = :id AND account.user_id = :user_id
            GROUP BY account.id"
        ))?
        .query_row(
            &[(":id", &id), (":user_id", &user_id.as_i64())],
            map_account_row,
        )
        .map_err(Error::from)
}

/// The accounts of `user_id` that match `filter`, sorted by name.
pub fn get_accounts(
    user_id: UserID,
    filter: &AccountFilter,
    connection: &Connection,
) -> Result<Vec<Account>, Error> {
    connection
        .prepare(&format!(
            "{SELECT_ACCOUNTS}
            WHERE account.user_id = :user_id
                AND (:name IS NULL OR account.name LIKE '%' || :name || '%')
            GROUP BY account.id
            ORDER BY account.name COLLATE NOCASE, account.id"
        ))?
        .query_map(
            rusqlite::named_params! {
                ":user_id": user_id.as_i64(),
                ":name": filter.name,
            },
            map_account_row,
        )?
        .map(|maybe_account| maybe_account.map_err(Error::from))
        .collect()
}

/// The sum of the balances of all accounts of `user_id`.
pub fn get_total_balance(user_id: UserID, connection: &Connection) -> Result<f64, Error> {
    connection
        .query_row(
            "SELECT COALESCE(SUM(CASE \"transaction\".type
                    WHEN 'INCOME' THEN \"transaction\".value
                    ELSE -\"transaction\".value
                END), 0.0)
            FROM \"transaction\"
            INNER JOIN account ON account.id = \"transaction\".account_id
            WHERE account.user_id = ?1",
            [user_id.as_i64()],
            |row| row.get(0),
        )
        .map_err(Error::from)
}

/// Rename the account `id`.
///
/// # Errors
///
/// Returns an:
/// - [Error::UpdateMissingAccount] if the user has no such account.
/// - [Error::DuplicateAccountName] if another account already has the name.
pub fn update_account(
    user_id: UserID,
    id: AccountId,
    name: &str,
    connection: &Connection,
) -> Result<(), Error> {
    let name = name.trim();

    let rows_affected = connection
        .execute(
            "UPDATE account SET name = ?1 WHERE id = ?2 AND user_id = ?3",
            (name, id, user_id.as_i64()),
        )
        .map_err(|error| map_duplicate_name(error, name))?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingAccount);
    }

    Ok(())
}

/// Delete the account `id` and its transactions, returning the deleted account.
///
/// # Errors
///
/// Returns an [Error::DeleteMissingAccount] if the user has no such account.
pub fn delete_account(
    user_id: UserID,
    id: AccountId,
    connection: &Connection,
) -> Result<Account, Error> {
    let account = get_account(user_id, id, connection).map_err(|error| match error {
        Error::NotFound => Error::DeleteMissingAccount,
        error => error,
    })?;

    connection.execute(
        "DELETE FROM account WHERE id = ?1 AND user_id = ?2",
        (id, user_id.as_i64()),
    )?;

    Ok(account)
}

fn map_account_row(row: &Row) -> Result<Account, rusqlite::Error> {
    Ok(Account {
        id: row.get(0)?,
        user_id: UserID::new(row.get(1)?),
        name: row.get(2)?,
        balance: row.get(3)?,
    })
}
