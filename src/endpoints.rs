//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/accounts/{account_id}/edit', use [format_endpoint].

/// The root route which redirects to the home or log in page.
pub const ROOT: &str = "/";
/// The landing page for logged in users.
pub const HOME_VIEW: &str = "/home";
/// The route for getting the log in page.
pub const LOG_IN_VIEW: &str = "/log_in";
/// The route for getting the registration page.
pub const REGISTER_VIEW: &str = "/register";
/// The page listing the user's accounts.
pub const ACCOUNTS_VIEW: &str = "/accounts";
/// The page for creating an account.
pub const NEW_ACCOUNT_VIEW: &str = "/accounts/new";
/// The page for editing an account.
pub const EDIT_ACCOUNT_VIEW: &str = "/accounts/{account_id}/edit";
/// The page listing the user's categories.
pub const CATEGORIES_VIEW: &str = "/categories";
/// The page for creating a category.
pub const NEW_CATEGORY_VIEW: &str = "/categories/new";
/// The page for editing a category.
pub const EDIT_CATEGORY_VIEW: &str = "/categories/{category_id}/edit";
/// The page listing the user's transactions.
pub const TRANSACTIONS_VIEW: &str = "/transactions";
/// The page for creating a transaction.
pub const NEW_TRANSACTION_VIEW: &str = "/transactions/new";
/// The page for editing a transaction.
pub const EDIT_TRANSACTION_VIEW: &str = "/transactions/{transaction_id}/edit";
/// The page listing the user's budgets.
pub const BUDGETS_VIEW: &str = "/budgets";
/// The page for creating a budget.
pub const NEW_BUDGET_VIEW: &str = "/budgets/new";
/// The page for editing a budget.
pub const EDIT_BUDGET_VIEW: &str = "/budgets/{budget_id}/edit";
/// The page listing the user's change history.
pub const HISTORY_VIEW: &str = "/history";
/// The route for static files.
pub const STATIC: &str = "/static";

/// The route for logging in a user.
pub const LOG_IN_API: &str = "/api/log_in";
/// The route for validating one field of the log in form.
pub const VALIDATE_LOG_IN: &str = "/api/log_in/validate";
/// The route for registering a user.
pub const REGISTER_API: &str = "/api/register";
/// The route for validating one field of the registration form.
pub const VALIDATE_REGISTER: &str = "/api/register/validate";
/// The route for the client to log out the current user.
pub const LOG_OUT: &str = "/api/log_out";
/// The route to create an account.
pub const POST_ACCOUNT: &str = "/api/accounts";
/// The route to update an account.
pub const PUT_ACCOUNT: &str = "/api/accounts/{account_id}";
/// The route to delete an account.
pub const DELETE_ACCOUNT: &str = "/api/accounts/{account_id}";
/// The route for validating one field of the account form.
pub const VALIDATE_ACCOUNT: &str = "/api/accounts/validate";
/// The route to create a category.
pub const POST_CATEGORY: &str = "/api/categories";
/// The route to update a category.
pub const PUT_CATEGORY: &str = "/api/categories/{category_id}";
/// The route to delete a category.
pub const DELETE_CATEGORY: &str = "/api/categories/{category_id}";
/// The route for validating one field of the category form.
pub const VALIDATE_CATEGORY: &str = "/api/categories/validate";
/// The route to create a transaction.
pub const POST_TRANSACTION: &str = "/api/transactions";
/// The route to update a transaction.
pub const PUT_TRANSACTION: &str = "/api/transactions/{transaction_id}";
/// The route to delete a transaction.
pub const DELETE_TRANSACTION: &str = "/api/transactions/{transaction_id}";
/// The route for validating one field of the transaction form.
pub const VALIDATE_TRANSACTION: &str = "/api/transactions/validate";
/// The route to create a budget.
pub const POST_BUDGET: &str = "/api/budgets";
/// The route to update a budget.
pub const PUT_BUDGET: &str = "/api/budgets/{budget_id}";
/// The route to delete a budget.
pub const DELETE_BUDGET: &str = "/api/budgets/{budget_id}";
/// The route for validating one field of the budget form.
pub const VALIDATE_BUDGET: &str = "/api/budgets/validate";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/accounts/{account_id}', '{account_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_owned();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map(|offset| param_start + offset + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}

/// Append a success `notice` to `endpoint_path` as a query parameter, for
/// the page to show after a redirect.
pub fn with_notice(endpoint_path: &str, notice: &str) -> String {
    match serde_urlencoded::to_string([("notice", notice)]) {
        Ok(query) => format!("{endpoint_path}?{query}"),
        Err(error) => {
            tracing::error!("could not encode notice {notice:?}: {error}");
            endpoint_path.to_owned()
        }
    }
}
