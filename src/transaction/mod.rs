//! Transactions move money in or out of an account under a category.

mod core;
mod create_endpoint;
mod create_page;
mod delete_endpoint;
mod edit_endpoint;
mod edit_page;
mod form;
mod transactions_page;

pub(crate) use core::check_category_reference;
pub use core::{
    NewTransaction, Transaction, TransactionFilter, TransactionId, TransactionState,
    create_transaction, create_transaction_table, delete_transaction, get_transaction,
    get_transactions, update_transaction,
};
pub use create_endpoint::create_transaction_endpoint;
pub use create_page::get_create_transaction_page;
pub use delete_endpoint::delete_transaction_endpoint;
pub use edit_endpoint::edit_transaction_endpoint;
pub use edit_page::get_edit_transaction_page;
pub use form::validate_transaction_field;
pub use transactions_page::get_transactions_page;
