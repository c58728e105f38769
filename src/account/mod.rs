//! Accounts hold money, and their balance follows from their transactions.

mod accounts_page;
mod core;
mod create_endpoint;
mod create_page;
mod delete_endpoint;
mod edit_endpoint;
mod edit_page;
mod form;

pub use accounts_page::get_accounts_page;
pub use core::{
    Account, AccountFilter, AccountId, AccountState, create_account, create_account_table,
    delete_account, get_account, get_accounts, get_total_balance, update_account,
};
pub use create_endpoint::create_account_endpoint;
pub use create_page::get_create_account_page;
pub use delete_endpoint::delete_account_endpoint;
pub use edit_endpoint::edit_account_endpoint;
pub use edit_page::get_edit_account_page;
pub use form::validate_account_field;
