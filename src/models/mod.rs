//! The domain models: users, passwords, categories and transactions.

mod category;
mod password;
mod transaction;
mod user;

pub use category::{Category, CategoryName};
pub use password::{PasswordHash, ValidatedPassword};
pub use transaction::{
    CategorySummary, ParseTransactionTypeError, Transaction, TransactionData, TransactionType,
};
pub use user::{User, UserID, UserProfile};

/// An alias for the integer type used for database primary keys.
pub type DatabaseID = i64;
