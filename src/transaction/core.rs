//! The transaction model, its table and the database queries for transactions.

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use rusqlite::{Connection, OptionalExtension, Row};
use time::Date;

use crate::{
    AppState, Error, UserID,
    account::AccountId,
    category::{CategoryId, TransactionType},
    format::{format_currency, format_date},
    table::TableRecord,
};

pub type TransactionId = i64;

/// Money moving in or out of an account, e.g. a salary or a grocery bill.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub id: TransactionId,
    pub user_id: UserID,
    pub account_id: AccountId,
    /// The name of the account, for display.
    pub account_name: String,
    pub category_id: CategoryId,
    /// The name of the category, for display.
    pub category_name: String,
    pub transaction_type: TransactionType,
    pub description: String,
    pub transaction_date: Date,
    /// The amount of money, never negative. The type gives the direction.
    pub value: f64,
}

impl TableRecord for Transaction {
    fn cell(&self, id: &str) -> String {
        match id {
            "transaction_date" => format_date(self.transaction_date),
            "description" => self.description.clone(),
            "type" => self.transaction_type.label().to_owned(),
            "category" => self.category_name.clone(),
            "account" => self.account_name.clone(),
            "value" => format_currency(self.value),
            _ => String::new(),
        }
    }
}

/// The details of a transaction to create or update.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub account_id: AccountId,
    pub category_id: CategoryId,
    pub transaction_type: TransactionType,
    pub description: String,
    pub transaction_date: Date,
    pub value: f64,
}

/// Narrows the transactions listed. Every set field must match.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionFilter {
    /// Only transactions with this text in their description, ignoring case.
    pub description: Option<String>,
    pub transaction_type: Option<TransactionType>,
    pub account_id: Option<AccountId>,
    pub category_id: Option<CategoryId>,
    /// The earliest transaction date, inclusive.
    pub date_from: Option<Date>,
    /// The latest transaction date, inclusive.
    pub date_to: Option<Date>,
}

/// The state needed by the transaction route handlers.
#[derive(Debug, Clone)]
pub struct TransactionState {
    /// The local timezone as a canonical timezone name, e.g. "America/Sao_Paulo".
    pub local_timezone: String,
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for TransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
            id INTEGER PRIMARY KEY,
            user_id INTEGER NOT NULL REFERENCES user(id) ON DELETE CASCADE,
            account_id INTEGER NOT NULL REFERENCES account(id) ON DELETE CASCADE,
            category_id INTEGER NOT NULL REFERENCES category(id) ON DELETE RESTRICT,
            type TEXT NOT NULL CHECK (type IN ('INCOME', 'EXPENSE')),
            description TEXT NOT NULL,
            transaction_date TEXT NOT NULL,
            value REAL NOT NULL CHECK (value >= 0)
        );

        CREATE INDEX IF NOT EXISTS idx_transaction_user_date
        ON \"transaction\"(user_id, transaction_date);
        CREATE INDEX IF NOT EXISTS idx_transaction_account ON \"transaction\"(account_id);
        CREATE INDEX IF NOT EXISTS idx_transaction_category ON \"transaction\"(category_id);",
    )
}

/// Check that the category `category_id` belongs to `user_id` and has the
/// type `transaction_type`.
///
/// # Errors
///
/// Returns an:
/// - [Error::InvalidReference] if the user does not own the category.
/// - [Error::CategoryTypeMismatch] if the category is of the other type.
pub(crate) fn check_category_reference(
    user_id: UserID,
    category_id: CategoryId,
    transaction_type: TransactionType,
    connection: &Connection,
) -> Result<(), Error> {
    let category_type: Option<TransactionType> = connection
        .query_row(
            "SELECT type FROM category WHERE id = ?1 AND user_id = ?2",
            (category_id, user_id.as_i64()),
            |row| row.get(0),
        )
        .optional()?;

    match category_type {
        None => Err(Error::InvalidReference),
        Some(category_type) if category_type != transaction_type => {
            Err(Error::CategoryTypeMismatch)
        }
        Some(_) => Ok(()),
    }
}

fn check_references(
    user_id: UserID,
    transaction: &NewTransaction,
    connection: &Connection,
) -> Result<(), Error> {
    let owns_account: bool = connection.query_row(
        "SELECT EXISTS (SELECT 1 FROM account WHERE id = ?1 AND user_id = ?2)",
        (transaction.account_id, user_id.as_i64()),
        |row| row.get(0),
    )?;

    if !owns_account {
        return Err(Error::InvalidReference);
    }

    check_category_reference(
        user_id,
        transaction.category_id,
        transaction.transaction_type,
        connection,
    )
}

/// Create a transaction for `user_id`.
///
/// # Errors
///
/// Returns an:
/// - [Error::InvalidReference] if the user does not own the account or category.
/// - [Error::CategoryTypeMismatch] if the category is of the other type.
pub fn create_transaction(
    user_id: UserID,
    transaction: &NewTransaction,
    connection: &Connection,
) -> Result<Transaction, Error> {
    check_references(user_id, transaction, connection)?;

    connection.execute(
        "INSERT INTO \"transaction\"
        (user_id, account_id, category_id, type, description, transaction_date, value)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        (
            user_id.as_i64(),
            transaction.account_id,
            transaction.category_id,
            transaction.transaction_type,
            transaction.description.trim(),
            transaction.transaction_date,
            transaction.value,
        ),
    )?;

    get_transaction(user_id, connection.last_insert_rowid(), connection)
}

const SELECT_TRANSACTIONS: &str = "SELECT \"transaction\".id, \"transaction\".user_id,
        \"transaction\".account_id, account.name,
        \"transaction\".category_id, category.name,
        \"transaction\".type, \"transaction\".description,
        \"transaction\".transaction_date, \"transaction\".value
    FROM \"transaction\"
    INNER JOIN account ON account.id = \"transaction\".account_id
    INNER JOIN category ON category.id = \"transaction\".category_id";

/// Get the transaction `id` of `user_id`.
///
/// # Errors
///
/// Returns [Error::NotFound] if the user has no such transaction.
pub fn get_transaction(
    user_id: UserID,
    id: TransactionId,
    connection: &Connection,
) -> Result<Transaction, Error> {
    connection
        .prepare(&format!(
            "{SELECT_TRANSACTIONS}
            WHERE \"transaction\".id = :id AND \"transaction\".user_id = :user_id"
        ))?
        .query_row(
            &[(":id", &id), (":user_id", &user_id.as_i64())],
            map_transaction_row,
        )
        .map_err(Error::from)
}

/// The transactions of `user_id` that match `filter`, newest first.
pub fn get_transactions(
    user_id: UserID,
    filter: &TransactionFilter,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    // Sort by date, and then ID to keep transaction order stable after updates
    connection
        .prepare(&format!(
            "{SELECT_TRANSACTIONS}
            WHERE \"transaction\".user_id = :user_id
                AND (:description IS NULL
                    OR \"transaction\".description LIKE '%' || :description || '%')
                AND (:type IS NULL OR \"transaction\".type = :type)
                AND (:account_id IS NULL OR \"transaction\".account_id = :account_id)
                AND (:category_id IS NULL OR \"transaction\".category_id = :category_id)
                AND (:date_from IS NULL OR \"transaction\".transaction_date >= :date_from)
                AND (:date_to IS NULL OR \"transaction\".transaction_date <= :date_to)
            ORDER BY \"transaction\".transaction_date DESC, \"transaction\".id DESC"
        ))?
        .query_map(
            rusqlite::named_params! {
                ":user_id": user_id.as_i64(),
                ":description": filter.description,
                ":type": filter.transaction_type,
                ":account_id": filter.account_id,
                ":category_id": filter.category_id,
                ":date_from": filter.date_from,
                ":date_to": filter.date_to,
            },
            map_transaction_row,
        )?
        .map(|maybe_transaction| maybe_transaction.map_err(Error::from))
        .collect()
}

/// Replace the details of the transaction `id`.
///
/// # Errors
///
/// Returns an:
/// - [Error::UpdateMissingTransaction] if the user has no such transaction.
/// - [Error::InvalidReference] if the user does not own the account or category.
/// - [Error::CategoryTypeMismatch] if the category is of the other type.
pub fn update_transaction(
    user_id: UserID,
    id: TransactionId,
    transaction: &NewTransaction,
    connection: &Connection,
) -> Result<(), Error> {
    check_references(user_id, transaction, connection)?;

    let rows_affected = connection.execute(
        "UPDATE \"transaction\"
        SET account_id = ?1, category_id = ?2, type = ?3, description = ?4,
            transaction_date = ?5, value = ?6
        WHERE id = ?7 AND user_id = ?8",
        (
            transaction.account_id,
            transaction.category_id,
            transaction.transaction_type,
            transaction.description.trim(),
            transaction.transaction_date,
            transaction.value,
            id,
            user_id.as_i64(),
        ),
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingTransaction);
    }

    Ok(())
}

/// Delete the transaction `id`, returning the deleted transaction.
///
/// # Errors
///
/// Returns an [Error::DeleteMissingTransaction] if the user has no such transaction.
pub fn delete_transaction(
    user_id: UserID,
    id: TransactionId,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let transaction = get_transaction(user_id, id, connection).map_err(|error| match error {
        Error::NotFound => Error::DeleteMissingTransaction,
        error => error,
    })?;

    connection.execute(
        "DELETE FROM \"transaction\" WHERE id = ?1 AND user_id = ?2",
        (id, user_id.as_i64()),
    )?;

    Ok(transaction)
}

fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    Ok(Transaction {
        id: row.get(0)?,
        user_id: UserID::new(row.get(1)?),
        account_id: row.get(2)?,
        account_name: row.get(3)?,
        category_id: row.get(4)?,
        category_name: row.get(5)?,
        transaction_type: row.get(6)?,
        description: row.get(7)?,
        transaction_date: row.get(8)?,
        value: row.get(9)?,
    })
}
