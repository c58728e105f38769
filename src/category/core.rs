//! The category model, its table and the database queries for categories.

use std::{
    fmt,
    str::FromStr,
    sync::{Arc, Mutex},
};

use axum::extract::FromRef;
use rusqlite::{
    Connection, Row,
    types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef},
};

use crate::{AppState, Error, UserID, table::TableRecord};

pub type CategoryId = i64;

/// Whether money comes in or goes out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    pub const ALL: [TransactionType; 2] = [TransactionType::Income, TransactionType::Expense];

    /// The name stored in the database and sent by forms.
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionType::Income => "INCOME",
            TransactionType::Expense => "EXPENSE",
        }
    }

    /// The name shown to the user.
    pub fn label(self) -> &'static str {
        match self {
            TransactionType::Income => "Receita",
            TransactionType::Expense => "Despesa",
        }
    }

    /// `(value, text)` pairs for selects and radio buttons.
    pub fn options() -> Vec<(String, String)> {
        Self::ALL
            .iter()
            .map(|transaction_type| {
                (
                    transaction_type.as_str().to_owned(),
                    transaction_type.label().to_owned(),
                )
            })
            .collect()
    }

    /// `+value` for income and `-value` for expenses.
    pub fn signed(self, value: f64) -> f64 {
        match self {
            TransactionType::Income => value,
            TransactionType::Expense => -value,
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TransactionType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "INCOME" => Ok(TransactionType::Income),
            "EXPENSE" => Ok(TransactionType::Expense),
            _ => Err(Error::InvalidFormField("type")),
        }
    }
}

impl ToSql for TransactionType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

impl FromSql for TransactionType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error: Error| FromSqlError::Other(Box::new(error)))
    }
}

/// A user defined group of transactions, e.g. "Mercado".
#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    pub id: CategoryId,
    pub user_id: UserID,
    pub name: String,
    pub transaction_type: TransactionType,
}

impl TableRecord for Category {
    fn cell(&self, id: &str) -> String {
        match id {
            "name" => self.name.clone(),
            "type" => self.transaction_type.label().to_owned(),
            _ => String::new(),
        }
    }
}

/// The details of a category to create or update.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCategory {
    pub name: String,
    pub transaction_type: TransactionType,
}

/// Narrows the categories listed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryFilter {
    /// Only categories with this text in their name, ignoring case.
    pub name: Option<String>,
    pub transaction_type: Option<TransactionType>,
}

/// The state needed by the category route handlers.
#[derive(Debug, Clone)]
pub struct CategoryState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CategoryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

pub fn create_category_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS category (
            id INTEGER PRIMARY KEY,
            user_id INTEGER NOT NULL REFERENCES user(id) ON DELETE CASCADE,
            name TEXT NOT NULL,
            type TEXT NOT NULL CHECK (type IN ('INCOME', 'EXPENSE'))
        );

        CREATE INDEX IF NOT EXISTS idx_category_user ON category(user_id);",
    )
}

pub fn create_category(
    user_id: UserID,
    category: &NewCategory,
    connection: &Connection,
) -> Result<Category, Error> {
    let name = category.name.trim();

    connection.execute(
        "INSERT INTO category (user_id, name, type) VALUES (?1, ?2, ?3)",
        (user_id.as_i64(), name, category.transaction_type),
    )?;

    Ok(Category {
        id: connection.last_insert_rowid(),
        user_id,
        name: name.to_owned(),
        transaction_type: category.transaction_type,
    })
}

/// Get the category `id` of `user_id`.
///
/// # Errors
///
/// Returns [Error::NotFound] if the user has no such category.
pub fn get_category(
    user_id: UserID,
    id: CategoryId,
    connection: &Connection,
) -> Result<Category, Error> {
    connection
        .prepare(
            "SELECT id, user_id, name, type FROM category WHERE id = :id AND user_id = :user_id",
        )?
        .query_row(
            &[(":id", &id), (":user_id", &user_id.as_i64())],
            map_category_row,
        )
        .map_err(Error::from)
}

/// The categories of `user_id` that match `filter`, sorted by name.
pub fn get_categories(
    user_id: UserID,
    filter: &CategoryFilter,
    connection: &Connection,
) -> Result<Vec<Category>, Error> {
    connection
        .prepare(
            "SELECT id, user_id, name, type FROM category
            WHERE user_id = :user_id
                AND (:name IS NULL OR name LIKE '%' || :name || '%')
                AND (:type IS NULL OR type = :type)
            ORDER BY name COLLATE NOCASE, id",
        )?
        .query_map(
            rusqlite::named_params! {
                ":user_id": user_id.as_i64(),
                ":name": filter.name,
                ":type": filter.transaction_type,
            },
            map_category_row,
        )?
        .map(|maybe_category| maybe_category.map_err(Error::from))
        .collect()
}

/// Change the name and type of the category `id`.
///
/// # Errors
///
/// Returns an:
/// - [Error::UpdateMissingCategory] if the user has no such category.
/// - [Error::CategoryInUse] if the type changes while transactions or budgets use the category.
pub fn update_category(
    user_id: UserID,
    id: CategoryId,
    category: &NewCategory,
    connection: &Connection,
) -> Result<(), Error> {
    let current = get_category(user_id, id, connection).map_err(|error| match error {
        Error::NotFound => Error::UpdateMissingCategory,
        error => error,
    })?;

    if current.transaction_type != category.transaction_type && is_category_used(id, connection)? {
        return Err(Error::CategoryInUse);
    }

    let rows_affected = connection.execute(
        "UPDATE category SET name = ?1, type = ?2 WHERE id = ?3 AND user_id = ?4",
        (
            category.name.trim(),
            category.transaction_type,
            id,
            user_id.as_i64(),
        ),
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingCategory);
    }

    Ok(())
}

fn is_category_used(id: CategoryId, connection: &Connection) -> Result<bool, Error> {
    connection
        .query_row(
            "SELECT EXISTS (SELECT 1 FROM \"transaction\" WHERE category_id = ?1)
                OR EXISTS (SELECT 1 FROM budget WHERE category_id = ?1)",
            [id],
            |row| row.get(0),
        )
        .map_err(Error::from)
}

/// Delete the category `id`, returning the deleted category.
///
/// # Errors
///
/// Returns an:
/// - [Error::DeleteMissingCategory] if the user has no such category.
/// - [Error::CategoryInUse] if transactions or budgets use the category.
pub fn delete_category(
    user_id: UserID,
    id: CategoryId,
    connection: &Connection,
) -> Result<Category, Error> {
    let category = get_category(user_id, id, connection).map_err(|error| match error {
        Error::NotFound => Error::DeleteMissingCategory,
        error => error,
    })?;

    connection
        .execute(
            "DELETE FROM category WHERE id = ?1 AND user_id = ?2",
            (id, user_id.as_i64()),
        )
        .map_err(|error| match error {
            // Code 787 occurs when a FOREIGN KEY constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, _) if sql_error.extended_code == 787 => {
                Error::CategoryInUse
            }
            error => error.into(),
        })?;

    Ok(category)
}

fn map_category_row(row: &Row) -> Result<Category, rusqlite::Error> {
    Ok(Category {
        id: row.get(0)?,
        user_id: UserID::new(row.get(1)?),
        name: row.get(2)?,
        transaction_type: row.get(3)?,
    })
}
