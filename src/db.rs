//! Creating the application's tables in a SQLite database.

use std::sync::{Mutex, MutexGuard};

use rusqlite::Connection;

use crate::{
    Error, account::create_account_table, audit::create_log_table, budget::create_budget_table,
    category::create_category_table, transaction::create_transaction_table,
    user::create_user_table,
};

/// Create all the tables used by the application, if they do not exist yet.
///
/// Foreign keys are switched on for `connection`, which SQLite leaves off by
/// default. Deleting an account deletes its transactions, while a category
/// cannot be deleted as long as a transaction or budget uses it.
///
/// # Errors
///
/// Returns an [Error::SqlError] if a table could not be created.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    connection.pragma_update(None, "foreign_keys", "ON")?;

    let transaction = connection.unchecked_transaction()?;

    create_user_table(&transaction)?;
    create_account_table(&transaction)?;
    create_category_table(&transaction)?;
    create_transaction_table(&transaction)?;
    create_budget_table(&transaction)?;
    create_log_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}

/// Lock the shared database connection for the duration of one operation.
///
/// # Errors
///
/// Returns an [Error::DatabaseLockError] if the lock is poisoned.
pub fn lock_connection(connection: &Mutex<Connection>) -> Result<MutexGuard<'_, Connection>, Error> {
    connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)
}
