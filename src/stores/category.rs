//! Defines the category store trait.

use crate::{
    Error,
    models::{Category, DatabaseID, UserID},
};

/// Retrieves the global transaction categories.
pub trait CategoryStore {
    /// Get a category by its ID.
    fn get(&self, category_id: DatabaseID) -> Result<Category, Error>;

    /// Get all categories.
    fn get_all(&self) -> Result<Vec<Category>, Error>;

    /// Get the labels of the categories that `user_id` has transactions in.
    ///
    /// Labels appear once each; uncategorized transactions contribute no
    /// label.
    fn get_labels_by_user(&self, user_id: UserID) -> Result<Vec<String>, Error>;
}
