//! Budgets plan how much to receive or spend in a category each month.

mod budgets_page;
mod core;
mod create_endpoint;
mod create_page;
mod delete_endpoint;
mod edit_endpoint;
mod edit_page;
mod form;

pub use budgets_page::get_budgets_page;
pub use core::{
    Budget, BudgetFilter, BudgetId, BudgetState, NewBudget, create_budget, create_budget_table,
    delete_budget, get_budget, get_budgets, update_budget,
};
pub use create_endpoint::create_budget_endpoint;
pub use create_page::get_create_budget_page;
pub use delete_endpoint::delete_budget_endpoint;
pub use edit_endpoint::edit_budget_endpoint;
pub use edit_page::get_edit_budget_page;
pub use form::validate_budget_field;
