//! The route handlers for listing categories.

use axum::{Json, extract::State};

use crate::{
    Error,
    auth::Claims,
    models::Category,
    state::AppState,
    stores::{CategoryStore, TransactionStore, UserStore},
};

/// A route handler for listing the global categories.
pub async fn list_categories<C, T, U>(
    State(state): State<AppState<C, T, U>>,
    _claims: Claims,
) -> Result<Json<Vec<Category>>, Error>
where
    C: CategoryStore + Clone + Send + Sync,
    T: TransactionStore + Clone + Send + Sync,
    U: UserStore + Clone + Send + Sync,
{
    state.category_store.get_all().map(Json)
}

/// A route handler for listing the labels of the categories the logged-in
/// user has transactions in.
///
/// # Errors
///
/// Responds with 404 if the user has no categorized transactions yet.
pub async fn list_user_categories<C, T, U>(
    State(state): State<AppState<C, T, U>>,
    claims: Claims,
) -> Result<Json<Vec<String>>, Error>
where
    C: CategoryStore + Clone + Send + Sync,
    T: TransactionStore + Clone + Send + Sync,
    U: UserStore + Clone + Send + Sync,
{
    let labels = state.category_store.get_labels_by_user(claims.user_id())?;

    if labels.is_empty() {
        return Err(Error::NotFound);
    }

    Ok(Json(labels))
}
