//! dindin is a small personal-finance service: users register, log in with a
//! JSON Web Token, record their inflows (`entrada`) and outflows (`saida`)
//! against a shared category table, and pull back listings and
//! per-category/per-type extract summaries, optionally filtered by category
//! label.
//!
//! This library provides the REST API; see the `server` binary for the
//! executable entry point.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde_json::json;
use tokio::signal;

mod auth;
mod db;
mod endpoints;
mod logging;
mod models;
mod routes;
mod routing;
mod state;
mod summary;

pub mod stores;

pub use auth::{AuthError, Claims, LogInResponse, log_in};
pub use db::initialize as initialize_db;
pub use logging::logging_middleware;
pub use models::{
    Category, CategoryName, CategorySummary, DatabaseID, ParseTransactionTypeError, PasswordHash,
    Transaction, TransactionData, TransactionType, User, UserID, UserProfile, ValidatedPassword,
};
pub use routing::build_router;
pub use state::{AppState, JwtKeys};
pub use summary::{CategoryLabel, aggregate};

/// An async task that waits for either the ctrl+c or terminate signal,
/// whichever comes first, and then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The email used to register or update an account is already in use.
    #[error("the email address is already in use")]
    DuplicateEmail,

    /// The string used to register or update an account is not a valid email
    /// address.
    #[error("invalid email address: {0}")]
    InvalidEmail(String),

    /// The user provided a password that is too easy to guess.
    ///
    /// The inner string explains why and suggests how to pick a stronger one.
    #[error("password is too weak: {0}")]
    TooWeak(String),

    /// An empty string was used for an account's display name.
    #[error("name cannot be empty")]
    EmptyName,

    /// An empty string was used for a transaction's description.
    #[error("description cannot be empty")]
    EmptyDescription,

    /// The category ID attached to a transaction does not refer to a valid
    /// category.
    #[error("the category ID does not refer to a valid category")]
    InvalidCategory,

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    /// When communicating with the application client this error should be
    /// replaced with a general error type indicating an internal server error.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            // Code 2067 occurs when a UNIQUE constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.contains("email") =>
            {
                Error::DuplicateEmail
            }
            // Code 787 occurs when a FOREIGN KEY constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(_)) if sql_error.extended_code == 787 => {
                Error::InvalidCategory
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Error::DuplicateEmail => (StatusCode::BAD_REQUEST, self.to_string()),
            Error::InvalidEmail(_)
            | Error::TooWeak(_)
            | Error::EmptyName
            | Error::EmptyDescription => (StatusCode::UNPROCESSABLE_ENTITY, self.to_string()),
            Error::InvalidCategory | Error::NotFound => (StatusCode::NOT_FOUND, self.to_string()),
            // Any errors that are not handled above are not intended to be
            // shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_owned(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
