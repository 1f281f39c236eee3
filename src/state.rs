//! Implements a struct that holds the state of the REST server.

use axum::extract::FromRef;
use jsonwebtoken::{DecodingKey, EncodingKey};

use crate::stores::{CategoryStore, TransactionStore, UserStore};

/// The keys for signing and verifying JSON Web Tokens.
///
/// Both keys are derived from the same secret; the split exists because
/// `jsonwebtoken` uses distinct types for encoding and decoding.
#[derive(Clone)]
pub struct JwtKeys {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtKeys {
    /// Create the signing and verification keys from a `secret` string.
    pub fn new(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_ref()),
            decoding_key: DecodingKey::from_secret(secret.as_ref()),
        }
    }

    /// The encoding key for JWTs.
    pub fn encoding_key(&self) -> &EncodingKey {
        &self.encoding_key
    }

    /// The decoding key for JWTs.
    pub fn decoding_key(&self) -> &DecodingKey {
        &self.decoding_key
    }
}

/// The state of the REST server.
///
/// Generic over the store implementations so that handlers depend on the
/// store traits rather than on the database.
#[derive(Clone)]
pub struct AppState<C, T, U>
where
    C: CategoryStore + Send + Sync,
    T: TransactionStore + Send + Sync,
    U: UserStore + Send + Sync,
{
    /// The keys for signing and verifying auth tokens.
    pub jwt_keys: JwtKeys,
    /// The store for the global transaction [categories](crate::models::Category).
    pub category_store: C,
    /// The store for managing user [transactions](crate::models::Transaction).
    pub transaction_store: T,
    /// The store for managing [users](crate::models::User).
    pub user_store: U,
}

impl<C, T, U> AppState<C, T, U>
where
    C: CategoryStore + Send + Sync,
    T: TransactionStore + Send + Sync,
    U: UserStore + Send + Sync,
{
    /// Create a new [AppState].
    ///
    /// `jwt_secret` is the secret the server signs auth tokens with; anyone
    /// holding it can forge sessions, so it should come from the environment
    /// and never be logged.
    pub fn new(jwt_secret: &str, category_store: C, transaction_store: T, user_store: U) -> Self {
        Self {
            jwt_keys: JwtKeys::new(jwt_secret),
            category_store,
            transaction_store,
            user_store,
        }
    }
}

// this impl lets the Claims extractor get the verification key from the app
// state
impl<C, T, U> FromRef<AppState<C, T, U>> for JwtKeys
where
    C: CategoryStore + Clone + Send + Sync,
    T: TransactionStore + Clone + Send + Sync,
    U: UserStore + Clone + Send + Sync,
{
    fn from_ref(state: &AppState<C, T, U>) -> Self {
        state.jwt_keys.clone()
    }
}
