//! Defines the transaction store trait.

use crate::{
    Error,
    models::{CategorySummary, DatabaseID, Transaction, TransactionData, UserID},
};

/// Handles the creation and retrieval of transactions.
///
/// Every retrieval is scoped to a user: a transaction owned by someone else
/// is indistinguishable from one that does not exist.
pub trait TransactionStore {
    /// Create a new transaction for `user_id` in the store.
    fn create(&mut self, user_id: UserID, data: TransactionData) -> Result<Transaction, Error>;

    /// Retrieve the transaction with `id` belonging to `user_id`.
    fn get(&self, id: DatabaseID, user_id: UserID) -> Result<Transaction, Error>;

    /// Retrieve all of `user_id`'s transactions, each joined with its
    /// category label.
    ///
    /// An empty vector is returned if the user has no transactions.
    fn get_by_user(&self, user_id: UserID) -> Result<Vec<Transaction>, Error>;

    /// Replace the fields of the transaction with `id` belonging to
    /// `user_id`.
    fn update(
        &mut self,
        id: DatabaseID,
        user_id: UserID,
        data: TransactionData,
    ) -> Result<(), Error>;

    /// Delete the transaction with `id` belonging to `user_id`.
    fn delete(&mut self, id: DatabaseID, user_id: UserID) -> Result<(), Error>;

    /// Sum `user_id`'s transaction amounts per (category label, type) pair.
    fn summarize(&self, user_id: UserID) -> Result<Vec<CategorySummary>, Error>;
}
