//! The budget model, its table and the database queries for budgets.

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use rusqlite::{Connection, Row};
use time::Date;

use crate::{
    AppState, Error, UserID,
    category::{CategoryId, TransactionType},
    format::{format_currency, format_month},
    table::TableRecord,
    transaction::check_category_reference,
};

pub type BudgetId = i64;

/// The amount the user plans to receive or spend in a category over one month.
#[derive(Debug, Clone, PartialEq)]
pub struct Budget {
    pub id: BudgetId,
    pub user_id: UserID,
    pub category_id: CategoryId,
    /// The name of the category, for display.
    pub category_name: String,
    pub transaction_type: TransactionType,
    /// The first day of the month the budget covers.
    pub month: Date,
    /// The planned amount.
    pub value: f64,
    /// The sum of the transactions in the budget's category, type and month.
    pub usage: f64,
}

impl Budget {
    /// How much of the planned amount is left. Negative once the budget is exceeded.
    pub fn remaining(&self) -> f64 {
        self.value - self.usage
    }
}

impl TableRecord for Budget {
    fn cell(&self, id: &str) -> String {
        match id {
            "category" => self.category_name.clone(),
            "type" => self.transaction_type.label().to_owned(),
            "month" => format_month(self.month),
            "value" => format_currency(self.value),
            "usage" => format_currency(self.usage),
            "remaining" => format_currency(self.remaining()),
            _ => String::new(),
        }
    }
}

/// The details of a budget to create or update.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBudget {
    pub category_id: CategoryId,
    pub transaction_type: TransactionType,
    /// Any day of the month; only the month and year are kept.
    pub month: Date,
    pub value: f64,
}

/// Narrows the budgets listed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BudgetFilter {
    pub transaction_type: Option<TransactionType>,
    pub category_id: Option<CategoryId>,
}

/// The state needed by the budget route handlers.
#[derive(Debug, Clone)]
pub struct BudgetState {
    /// The local timezone as a canonical timezone name, e.g. "America/Sao_Paulo".
    pub local_timezone: String,
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for BudgetState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

pub fn create_budget_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS budget (
            id INTEGER PRIMARY KEY,
            user_id INTEGER NOT NULL REFERENCES user(id) ON DELETE CASCADE,
            category_id INTEGER NOT NULL REFERENCES category(id) ON DELETE RESTRICT,
            type TEXT NOT NULL CHECK (type IN ('INCOME', 'EXPENSE')),
            month TEXT NOT NULL,
            value REAL NOT NULL CHECK (value >= 0),
            UNIQUE(user_id, category_id, month)
        );

        CREATE INDEX IF NOT EXISTS idx_budget_user_month ON budget(user_id, month);",
    )
}

fn first_day_of_month(date: Date) -> Result<Date, Error> {
    date.replace_day(1)
        .map_err(|_| Error::InvalidFormField("month"))
}

fn map_duplicate_budget(error: rusqlite::Error) -> Error {
    match error {
        // Code 2067 occurs when a UNIQUE constraint failed.
        rusqlite::Error::SqliteFailure(sql_error, _) if sql_error.extended_code == 2067 => {
            Error::DuplicateBudget
        }
        error => error.into(),
    }
}

/// Create a budget for `user_id`.
///
/// # Errors
///
/// Returns an:
/// - [Error::InvalidReference] if the user does not own the category.
/// - [Error::CategoryTypeMismatch] if the category is of the other type.
/// - [Error::DuplicateBudget] if the category already has a budget that month.
pub fn create_budget(
    user_id: UserID,
    budget: &NewBudget,
    connection: &Connection,
) -> Result<Budget, Error> {
    check_category_reference(
        user_id,
        budget.category_id,
        budget.transaction_type,
        connection,
    )?;

    connection
        .execute(
            "INSERT INTO budget (user_id, category_id, type, month, value)
            VALUES (?1, ?2, ?3, ?4, ?5)",
            (
                user_id.as_i64(),
                budget.category_id,
                budget.transaction_type,
                first_day_of_month(budget.month)?,
                budget.value,
            ),
        )
        .map_err(map_duplicate_budget)?;

    get_budget(user_id, connection.last_insert_rowid(), connection)
}

// Transaction dates are stored as "YYYY-MM-DD", so they compare as text.
const SELECT_BUDGETS: &str = "SELECT budget.id, budget.user_id, budget.category_id,
        category.name, budget.type, budget.month, budget.value,
        (SELECT COALESCE(SUM(\"transaction\".value), 0.0)
            FROM \"transaction\"
            WHERE \"transaction\".user_id = budget.user_id
                AND \"transaction\".category_id = budget.category_id
                AND \"transaction\".type = budget.type
                AND \"transaction\".transaction_date >= budget.month
                AND \"transaction\".transaction_date < date(budget.month, '+1 month'))
    FROM budget
    INNER JOIN category ON category.id = budget.category_id";

/// Get the budget `id` of `user_id`, with its usage.
///
/// # Errors
///
/// Returns [Error::NotFound] if the user has no such budget.
pub fn get_budget(user_id: UserID, id: BudgetId, connection: &Connection) -> Result<Budget, Error> {
    connection
        .prepare(&format!(
            "{SELECT_BUDGETS}
            WHERE budget.id = :id AND budget.user_id = :user_id"
        ))?
        .query_row(
            &[(":id", &id), (":user_id", &user_id.as_i64())],
            map_budget_row,
        )
        .map_err(Error::from)
}

/// The budgets of `user_id` that match `filter`, latest month first.
pub fn get_budgets(
    user_id: UserID,
    filter: &BudgetFilter,
    connection: &Connection,
) -> Result<Vec<Budget>, Error> {
    connection
        .prepare(&format!(
            "{SELECT_BUDGETS}
            WHERE budget.user_id = :user_id
                AND (:type IS NULL OR budget.type = :type)
                AND (:category_id IS NULL OR budget.category_id = :category_id)
            ORDER BY budget.month DESC, category.name COLLATE NOCASE, budget.id"
        ))?
        .query_map(
            rusqlite::named_params! {
                ":user_id": user_id.as_i64(),
                ":type": filter.transaction_type,
                ":category_id": filter.category_id,
            },
            map_budget_row,
        )?
        .map(|maybe_budget| maybe_budget.map_err(Error::from))
        .collect()
}

/// Replace the details of the budget `id`.
///
/// # Errors
///
/// Returns an:
/// - [Error::UpdateMissingBudget] if the user has no such budget.
/// - [Error::InvalidReference] if the user does not own the category.
/// - [Error::CategoryTypeMismatch] if the category is of the other type.
/// - [Error::DuplicateBudget] if the category already has another budget that month.
pub fn update_budget(
    user_id: UserID,
    id: BudgetId,
    budget: &NewBudget,
    connection: &Connection,
) -> Result<(), Error> {
    check_category_reference(
        user_id,
        budget.category_id,
        budget.transaction_type,
        connection,
    )?;

    let rows_affected = connection
        .execute(
            "UPDATE budget SET category_id = ?1, type = ?2, month = ?3, value = ?4
            WHERE id = ?5 AND user_id = ?6",
            (
                budget.category_id,
                budget.transaction_type,
                first_day_of_month(budget.month)?,
                budget.value,
                id,
                user_id.as_i64(),
            ),
        )
        .map_err(map_duplicate_budget)?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingBudget);
    }

    Ok(())
}

/// Delete the budget `id`, returning the deleted budget.
///
/// # Errors
///
/// Returns an [Error::DeleteMissingBudget] if the user has no such budget.
pub fn delete_budget(user_id: UserID, id: BudgetId, connection: &Connection) -> Result<Budget, Error> {
    let budget = get_budget(user_id, id, connection).map_err(|error| match error {
        Error::NotFound => Error::DeleteMissingBudget,
        error => error,
    })?;

    connection.execute(
        "DELETE FROM budget WHERE id = ?1 AND user_id = ?2",
        (id, user_id.as_i64()),
    )?;

    Ok(budget)
}

fn map_budget_row(row: &Row) -> Result<Budget, rusqlite::Error> {
    Ok(Budget {
        id: row.get(0)?,
        user_id: UserID::new(row.get(1)?),
        category_id: row.get(2)?,
        category_name: row.get(3)?,
        transaction_type: row.get(4)?,
        month: row.get(5)?,
        value: row.get(6)?,
        usage: row.get(7)?,
    })
}
