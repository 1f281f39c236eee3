//! Defines the user store trait.

use email_address::EmailAddress;

use crate::{
    Error,
    models::{PasswordHash, User, UserID},
};

/// Handles the creation and retrieval of users.
pub trait UserStore {
    /// Create a new user and add it to the store.
    fn create(
        &mut self,
        name: &str,
        email: EmailAddress,
        password_hash: PasswordHash,
    ) -> Result<User, Error>;

    /// Get a user by their ID.
    fn get(&self, id: UserID) -> Result<User, Error>;

    /// Get a user by their email address.
    fn get_by_email(&self, email: &EmailAddress) -> Result<User, Error>;

    /// Replace the name, email and password of the user with `id`.
    fn update(
        &mut self,
        id: UserID,
        name: &str,
        email: EmailAddress,
        password_hash: PasswordHash,
    ) -> Result<(), Error>;
}
