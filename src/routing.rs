//! Application router configuration with protected and unprotected route definitions.

use axum::{
    Router, middleware,
    response::Redirect,
    routing::{get, post, put},
};
use tower_http::services::ServeDir;

use crate::{
    AppState,
    account::{
        create_account_endpoint, delete_account_endpoint, edit_account_endpoint,
        get_accounts_page, get_create_account_page, get_edit_account_page,
        validate_account_field,
    },
    audit::get_history_page,
    auth::{
        auth_guard, auth_guard_hx, get_log_in_page, get_log_out, get_register_page, post_log_in,
        register_user, validate_log_in_field, validate_register_field,
    },
    budget::{
        create_budget_endpoint, delete_budget_endpoint, edit_budget_endpoint, get_budgets_page,
        get_create_budget_page, get_edit_budget_page, validate_budget_field,
    },
    category::{
        create_category_endpoint, delete_category_endpoint, edit_category_endpoint,
        get_categories_page, get_create_category_page, get_edit_category_page,
        validate_category_field,
    },
    endpoints,
    home::get_home_page,
    not_found::get_404_not_found,
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint, edit_transaction_endpoint,
        get_create_transaction_page, get_edit_transaction_page, get_transactions_page,
        validate_transaction_field,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let unprotected_routes = Router::new()
        .route(endpoints::LOG_IN_VIEW, get(get_log_in_page))
        .route(endpoints::LOG_IN_API, post(post_log_in))
        .route(endpoints::VALIDATE_LOG_IN, post(validate_log_in_field))
        .route(endpoints::LOG_OUT, get(get_log_out))
        .route(endpoints::REGISTER_VIEW, get(get_register_page))
        .route(endpoints::REGISTER_API, post(register_user))
        .route(endpoints::VALIDATE_REGISTER, post(validate_register_field));

    let protected_routes = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::HOME_VIEW, get(get_home_page))
        .route(endpoints::ACCOUNTS_VIEW, get(get_accounts_page))
        .route(endpoints::NEW_ACCOUNT_VIEW, get(get_create_account_page))
        .route(endpoints::EDIT_ACCOUNT_VIEW, get(get_edit_account_page))
        .route(endpoints::CATEGORIES_VIEW, get(get_categories_page))
        .route(endpoints::NEW_CATEGORY_VIEW, get(get_create_category_page))
        .route(endpoints::EDIT_CATEGORY_VIEW, get(get_edit_category_page))
        .route(endpoints::TRANSACTIONS_VIEW, get(get_transactions_page))
        .route(
            endpoints::NEW_TRANSACTION_VIEW,
            get(get_create_transaction_page),
        )
        .route(
            endpoints::EDIT_TRANSACTION_VIEW,
            get(get_edit_transaction_page),
        )
        .route(endpoints::BUDGETS_VIEW, get(get_budgets_page))
        .route(endpoints::NEW_BUDGET_VIEW, get(get_create_budget_page))
        .route(endpoints::EDIT_BUDGET_VIEW, get(get_edit_budget_page))
        .route(endpoints::HISTORY_VIEW, get(get_history_page))
        .layer(middleware::from_fn_with_state(state.clone(), auth_guard));

    // These API routes need to use the HX-REDIRECT header for auth redirects to work properly for HTMX requests.
    let protected_routes = protected_routes.merge(
        Router::new()
            .route(endpoints::POST_ACCOUNT, post(create_account_endpoint))
            .route(
                endpoints::PUT_ACCOUNT,
                put(edit_account_endpoint).delete(delete_account_endpoint),
            )
            .route(endpoints::VALIDATE_ACCOUNT, post(validate_account_field))
            .route(endpoints::POST_CATEGORY, post(create_category_endpoint))
            .route(
                endpoints::PUT_CATEGORY,
                put(edit_category_endpoint).delete(delete_category_endpoint),
            )
            .route(endpoints::VALIDATE_CATEGORY, post(validate_category_field))
            .route(
                endpoints::POST_TRANSACTION,
                post(create_transaction_endpoint),
            )
            .route(
                endpoints::PUT_TRANSACTION,
                put(edit_transaction_endpoint).delete(delete_transaction_endpoint),
            )
            .route(
                endpoints::VALIDATE_TRANSACTION,
                post(validate_transaction_field),
            )
            .route(endpoints::POST_BUDGET, post(create_budget_endpoint))
            .route(
                endpoints::PUT_BUDGET,
                put(edit_budget_endpoint).delete(delete_budget_endpoint),
            )
            .route(endpoints::VALIDATE_BUDGET, post(validate_budget_field))
            .layer(middleware::from_fn_with_state(state.clone(), auth_guard_hx)),
    );

    protected_routes
        .merge(unprotected_routes)
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' redirects to the home page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::HOME_VIEW)
}


#[cfg(test)]
mod router_tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use rusqlite::Connection;

    use crate::{AppState, build_router, endpoints};

    fn server() -> TestServer {
        let state = AppState::new(
            Connection::open_in_memory().unwrap(),
            "foobar",
            "America/Sao_Paulo",
        )
        .unwrap();

        TestServer::try_new(build_router(state)).unwrap()
    }

    #[tokio::test]
    async fn pages_redirect_to_log_in_without_session() {
        let server = server();

        for page in [
            endpoints::HOME_VIEW,
            endpoints::ACCOUNTS_VIEW,
            endpoints::CATEGORIES_VIEW,
            endpoints::TRANSACTIONS_VIEW,
            endpoints::BUDGETS_VIEW,
            endpoints::HISTORY_VIEW,
        ] {
            let response = server.get(page).await;

            response.assert_status(StatusCode::SEE_OTHER);
            assert!(
                response.header("location").to_str().unwrap().starts_with(endpoints::LOG_IN_VIEW),
                "{page} did not redirect to the log in page"
            );
        }
    }

    #[tokio::test]
    async fn api_routes_send_hx_redirect_without_session() {
        let response = server().post(endpoints::POST_BUDGET).await;

        response.assert_status_ok();
        assert!(
            response
                .header("hx-redirect")
                .to_str()
                .unwrap()
                .starts_with(endpoints::LOG_IN_VIEW)
        );
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        server()
            .get("/does/not/exist")
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn log_in_page_is_public() {
        server().get(endpoints::LOG_IN_VIEW).await.assert_status_ok();
    }
}
