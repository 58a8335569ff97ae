//! Wires the route handlers into the application router.

use axum::{
    Router,
    extract::FromRef,
    http::StatusCode,
    middleware,
    response::Response,
    routing::{get, patch, post},
};

use crate::{
    AppState,
    auth::{AuthState, auth_guard, log_in_endpoint, register_user_endpoint},
    budget::{
        create_budget_endpoint, delete_budget_endpoint, list_budgets_endpoint,
        update_budget_endpoint,
    },
    category::{
        create_category_endpoint, delete_category_endpoint, list_categories_endpoint,
        update_category_endpoint,
    },
    dashboard::dashboard_overview_endpoint,
    endpoints,
    response::error_response,
    settings::{get_settings_endpoint, update_settings_endpoint},
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint, delete_transactions_endpoint,
        list_transactions_endpoint, update_transaction_endpoint,
    },
};

/// Create the router for the application.
pub fn build_router(state: AppState) -> Router {
    let auth_state = AuthState::from_ref(&state);

    let protected_routes = Router::new()
        .route(
            endpoints::TRANSACTIONS,
            post(create_transaction_endpoint)
                .get(list_transactions_endpoint)
                .delete(delete_transactions_endpoint),
        )
        .route(
            endpoints::TRANSACTION,
            patch(update_transaction_endpoint).delete(delete_transaction_endpoint),
        )
        .route(
            endpoints::BUDGETS,
            post(create_budget_endpoint).get(list_budgets_endpoint),
        )
        .route(
            endpoints::BUDGET,
            patch(update_budget_endpoint).delete(delete_budget_endpoint),
        )
        .route(
            endpoints::CATEGORIES,
            post(create_category_endpoint).get(list_categories_endpoint),
        )
        .route(
            endpoints::CATEGORY,
            patch(update_category_endpoint).delete(delete_category_endpoint),
        )
        .route(endpoints::DASHBOARD_OVERVIEW, get(dashboard_overview_endpoint))
        .route(
            endpoints::USER_SETTINGS,
            get(get_settings_endpoint).patch(update_settings_endpoint),
        )
        .layer(middleware::from_fn_with_state(auth_state, auth_guard));

    let unprotected_routes = Router::new()
        .route(endpoints::LOG_IN, post(log_in_endpoint))
        .route(endpoints::USERS, post(register_user_endpoint));

    Router::new()
        .merge(protected_routes)
        .merge(unprotected_routes)
        .fallback(not_found)
        .with_state(state)
}

async fn not_found() -> Response {
    error_response(
        StatusCode::NOT_FOUND,
        "The requested resource could not be found",
        None,
    )
}
