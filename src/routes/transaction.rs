//! The route handlers for creating, reading, updating and deleting the
//! logged-in user's transactions, and for the extract summary.
//!
//! The listing and summary handlers are the two call sites of
//! [crate::summary::aggregate]: both fetch the user's rows and then narrow
//! them with the repeated `filter` query parameter, e.g.
//! `/api/transactions?filter=Groceries&filter=Rent`.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use axum_extra::extract::Query;
use serde::Deserialize;

use crate::{
    Error,
    auth::Claims,
    models::{CategorySummary, DatabaseID, Transaction, TransactionData},
    state::AppState,
    stores::{CategoryStore, TransactionStore, UserStore},
    summary::aggregate,
};

/// The category labels to narrow a listing or summary down to.
///
/// Supplied as a repeated query parameter; the order (and any repetition) of
/// the labels is preserved.
#[derive(Debug, Default, Deserialize)]
pub struct FilterParams {
    /// The category labels, in the order given by the caller.
    #[serde(default)]
    pub filter: Vec<String>,
}

impl FilterParams {
    fn as_filter(&self) -> Option<&[String]> {
        if self.filter.is_empty() {
            None
        } else {
            Some(&self.filter)
        }
    }
}

/// A route handler for listing the logged-in user's transactions, optionally
/// narrowed by category labels.
pub async fn list_transactions<C, T, U>(
    State(state): State<AppState<C, T, U>>,
    claims: Claims,
    Query(params): Query<FilterParams>,
) -> Result<Json<Vec<Transaction>>, Error>
where
    C: CategoryStore + Clone + Send + Sync,
    T: TransactionStore + Clone + Send + Sync,
    U: UserStore + Clone + Send + Sync,
{
    let transactions = state.transaction_store.get_by_user(claims.user_id())?;

    let filtered = aggregate(&transactions, params.as_filter())
        .into_iter()
        .cloned()
        .collect();

    Ok(Json(filtered))
}

/// A route handler for the extract summary: the logged-in user's transaction
/// amounts summed per (category, type) pair, optionally narrowed by category
/// labels.
pub async fn get_summary<C, T, U>(
    State(state): State<AppState<C, T, U>>,
    claims: Claims,
    Query(params): Query<FilterParams>,
) -> Result<Json<Vec<CategorySummary>>, Error>
where
    C: CategoryStore + Clone + Send + Sync,
    T: TransactionStore + Clone + Send + Sync,
    U: UserStore + Clone + Send + Sync,
{
    let summaries = state.transaction_store.summarize(claims.user_id())?;

    let filtered = aggregate(&summaries, params.as_filter())
        .into_iter()
        .cloned()
        .collect();

    Ok(Json(filtered))
}

/// A route handler for getting one of the logged-in user's transactions by
/// its ID.
///
/// # Errors
///
/// Responds with 404 if the transaction does not exist or belongs to another
/// user.
pub async fn get_transaction<C, T, U>(
    State(state): State<AppState<C, T, U>>,
    claims: Claims,
    Path(transaction_id): Path<DatabaseID>,
) -> Result<Json<Transaction>, Error>
where
    C: CategoryStore + Clone + Send + Sync,
    T: TransactionStore + Clone + Send + Sync,
    U: UserStore + Clone + Send + Sync,
{
    state
        .transaction_store
        .get(transaction_id, claims.user_id())
        .map(Json)
}

fn validate_transaction_data<C: CategoryStore>(
    category_store: &C,
    data: &TransactionData,
) -> Result<(), Error> {
    if data.description.trim().is_empty() {
        return Err(Error::EmptyDescription);
    }

    category_store.get(data.category_id).map_err(|e| match e {
        Error::NotFound => Error::InvalidCategory,
        e => e,
    })?;

    Ok(())
}

/// A route handler for creating a new transaction for the logged-in user.
///
/// # Errors
///
/// Returns an error response if the description is empty or the category ID
/// does not refer to a valid category.
pub async fn create_transaction<C, T, U>(
    State(mut state): State<AppState<C, T, U>>,
    claims: Claims,
    Json(data): Json<TransactionData>,
) -> Result<(StatusCode, Json<Transaction>), Error>
where
    C: CategoryStore + Clone + Send + Sync,
    T: TransactionStore + Clone + Send + Sync,
    U: UserStore + Clone + Send + Sync,
{
    validate_transaction_data(&state.category_store, &data)?;

    let transaction = state.transaction_store.create(claims.user_id(), data)?;

    Ok((StatusCode::CREATED, Json(transaction)))
}

/// A route handler for updating one of the logged-in user's transactions.
///
/// # Errors
///
/// Returns an error response if the transaction does not exist or belongs to
/// another user, or if the new fields fail the same validation as creation.
pub async fn update_transaction<C, T, U>(
    State(mut state): State<AppState<C, T, U>>,
    claims: Claims,
    Path(transaction_id): Path<DatabaseID>,
    Json(data): Json<TransactionData>,
) -> Result<StatusCode, Error>
where
    C: CategoryStore + Clone + Send + Sync,
    T: TransactionStore + Clone + Send + Sync,
    U: UserStore + Clone + Send + Sync,
{
    validate_transaction_data(&state.category_store, &data)?;

    state
        .transaction_store
        .update(transaction_id, claims.user_id(), data)?;

    Ok(StatusCode::NO_CONTENT)
}

/// A route handler for deleting one of the logged-in user's transactions.
///
/// # Errors
///
/// Responds with 404 if the transaction does not exist or belongs to another
/// user.
pub async fn delete_transaction<C, T, U>(
    State(mut state): State<AppState<C, T, U>>,
    claims: Claims,
    Path(transaction_id): Path<DatabaseID>,
) -> Result<StatusCode, Error>
where
    C: CategoryStore + Clone + Send + Sync,
    T: TransactionStore + Clone + Send + Sync,
    U: UserStore + Clone + Send + Sync,
{
    state
        .transaction_store
        .delete(transaction_id, claims.user_id())?;

    Ok(StatusCode::NO_CONTENT)
}
