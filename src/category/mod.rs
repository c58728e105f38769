//! Categories group transactions and budgets, and are either income or expense.

mod categories_page;
mod core;
mod create_endpoint;
mod create_page;
mod delete_endpoint;
mod edit_endpoint;
mod edit_page;
mod form;

pub use categories_page::get_categories_page;
pub use core::{
    Category, CategoryFilter, CategoryId, CategoryState, NewCategory, TransactionType,
    create_category, create_category_table, delete_category, get_categories, get_category,
    update_category,
};
pub use create_endpoint::create_category_endpoint;
pub use create_page::get_create_category_page;
pub use delete_endpoint::delete_category_endpoint;
pub use edit_endpoint::edit_category_endpoint;
pub use edit_page::get_edit_category_page;
pub use form::validate_category_field;
