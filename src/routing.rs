//! Application router configuration.
//!
//! There is no route-level auth middleware: protected handlers take a
//! [Claims](crate::auth::Claims) argument, which rejects requests without a
//! valid bearer token before the handler body runs.

use axum::{
    Router,
    http::StatusCode,
    middleware,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};

use crate::{
    auth::log_in,
    endpoints,
    logging::logging_middleware,
    routes::{
        category::{list_categories, list_user_categories},
        transaction::{
            create_transaction, delete_transaction, get_summary, get_transaction,
            list_transactions, update_transaction,
        },
        user::{get_profile, register_user, update_profile},
    },
    state::AppState,
    stores::{CategoryStore, TransactionStore, UserStore},
};

/// Return a router with all the app's routes.
pub fn build_router<C, T, U>(state: AppState<C, T, U>) -> Router
where
    C: CategoryStore + Clone + Send + Sync + 'static,
    T: TransactionStore + Clone + Send + Sync + 'static,
    U: UserStore + Clone + Send + Sync + 'static,
{
    Router::new()
        .route(endpoints::COFFEE, get(get_coffee))
        .route(endpoints::USERS, post(register_user))
        .route(endpoints::LOG_IN, post(log_in))
        .route(endpoints::ME, get(get_profile).put(update_profile))
        .route(endpoints::CATEGORIES, get(list_categories))
        .route(endpoints::USER_CATEGORIES, get(list_user_categories))
        .route(endpoints::TRANSACTION_SUMMARY, get(get_summary))
        .route(
            endpoints::TRANSACTIONS,
            get(list_transactions).post(create_transaction),
        )
        .route(
            endpoints::TRANSACTION,
            get(get_transaction)
                .put(update_transaction)
                .delete(delete_transaction),
        )
        .layer(middleware::from_fn(logging_middleware))
        .with_state(state)
}

/// Attempt to get a cup of coffee from the server.
async fn get_coffee() -> Response {
    (StatusCode::IM_A_TEAPOT, Html("I'm a teapot")).into_response()
}
