//! The route handlers for registering a user and reading or updating the
//! logged-in user's profile.

use std::str::FromStr;

use axum::{Json, extract::State, http::StatusCode};
use email_address::EmailAddress;
use serde::Deserialize;

use crate::{
    Error,
    auth::{AuthError, Claims},
    models::{PasswordHash, UserProfile, ValidatedPassword},
    state::AppState,
    stores::{CategoryStore, TransactionStore, UserStore},
};

/// The fields a client supplies to register or update an account.
#[derive(Debug, Deserialize)]
pub struct UserData {
    /// The display name of the account.
    pub name: String,
    /// The email address to log in with.
    pub email: String,
    /// The plain-text password; it is validated and hashed before storage.
    pub password: String,
}

fn validate_user_data(data: &UserData) -> Result<(String, EmailAddress, PasswordHash), Error> {
    let name = data.name.trim();
    if name.is_empty() {
        return Err(Error::EmptyName);
    }

    let email = EmailAddress::from_str(data.email.trim())
        .map_err(|e| Error::InvalidEmail(e.to_string()))?;

    let validated_password = ValidatedPassword::new(&data.password)?;
    let password_hash = PasswordHash::new(validated_password, PasswordHash::DEFAULT_COST)?;

    Ok((name.to_owned(), email, password_hash))
}

/// A route handler for registering a new user.
///
/// # Errors
///
/// Returns an error response if the name is empty, the email is malformed or
/// already registered, or the password is too weak.
pub async fn register_user<C, T, U>(
    State(mut state): State<AppState<C, T, U>>,
    Json(data): Json<UserData>,
) -> Result<(StatusCode, Json<UserProfile>), Error>
where
    C: CategoryStore + Clone + Send + Sync,
    T: TransactionStore + Clone + Send + Sync,
    U: UserStore + Clone + Send + Sync,
{
    let (name, email, password_hash) = validate_user_data(&data)?;

    let user = state.user_store.create(&name, email, password_hash)?;

    Ok((StatusCode::CREATED, Json(UserProfile::from(&user))))
}

/// A route handler for fetching the logged-in user's profile.
///
/// # Errors
///
/// Returns an error response if the user the token was issued to no longer
/// exists.
pub async fn get_profile<C, T, U>(
    State(state): State<AppState<C, T, U>>,
    claims: Claims,
) -> Result<Json<UserProfile>, AuthError>
where
    C: CategoryStore + Clone + Send + Sync,
    T: TransactionStore + Clone + Send + Sync,
    U: UserStore + Clone + Send + Sync,
{
    let user = state.user_store.get(claims.user_id()).map_err(|e| match e {
        Error::NotFound => AuthError::UserNotFound,
        _ => AuthError::InternalError,
    })?;

    Ok(Json(UserProfile::from(&user)))
}

/// A route handler for updating the logged-in user's name, email and
/// password.
///
/// # Errors
///
/// Returns an error response if the new fields fail the same validation as
/// registration, or if the new email belongs to another user.
pub async fn update_profile<C, T, U>(
    State(mut state): State<AppState<C, T, U>>,
    claims: Claims,
    Json(data): Json<UserData>,
) -> Result<StatusCode, Error>
where
    C: CategoryStore + Clone + Send + Sync,
    T: TransactionStore + Clone + Send + Sync,
    U: UserStore + Clone + Send + Sync,
{
    let (name, email, password_hash) = validate_user_data(&data)?;

    state
        .user_store
        .update(claims.user_id(), &name, email, password_hash)?;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod user_route_tests {
    use std::sync::{Arc, Mutex};

    use axum::http::StatusCode;
    use axum_test::TestServer;
    use rusqlite::Connection;
    use serde_json::json;

    use crate::{
        AppState, build_router,
        auth::LogInResponse,
        db::initialize,
        endpoints,
        models::UserProfile,
        stores::sqlite::{SQLiteCategoryStore, SQLiteTransactionStore, SQLiteUserStore},
    };

    fn get_test_server() -> TestServer {
        let connection = Connection::open_in_memory().expect("Could not open database in memory.");
        initialize(&connection).expect("Could not initialize database.");
        let connection = Arc::new(Mutex::new(connection));

        let state = AppState::new(
            "foobar",
            SQLiteCategoryStore::new(connection.clone()),
            SQLiteTransactionStore::new(connection.clone()),
            SQLiteUserStore::new(connection),
        );

        TestServer::try_new(build_router(state)).expect("Could not create test server.")
    }

    async fn register(server: &TestServer, email: &str) -> UserProfile {
        let response = server
            .post(endpoints::USERS)
            .content_type("application/json")
            .json(&json!({
                "name": "Test",
                "email": email,
                "password": "averysafeandsecurepassword",
            }))
            .await;

        response.assert_status(StatusCode::CREATED);
        response.json::<UserProfile>()
    }

    async fn log_in(server: &TestServer, email: &str) -> String {
        let response = server
            .post(endpoints::LOG_IN)
            .content_type("application/json")
            .json(&json!({
                "email": email,
                "password": "averysafeandsecurepassword",
            }))
            .await;

        response.assert_status_ok();
        response.json::<LogInResponse>().token
    }

    #[tokio::test]
    async fn register_user_succeeds() {
        let server = get_test_server();

        let profile = register(&server, "foo@bar.baz").await;

        assert!(profile.id.as_i64() > 0);
        assert_eq!(profile.name, "Test");
        assert_eq!(profile.email, "foo@bar.baz");
    }

    #[tokio::test]
    async fn register_user_fails_with_duplicate_email() {
        let server = get_test_server();
        register(&server, "foo@bar.baz").await;

        server
            .post(endpoints::USERS)
            .content_type("application/json")
            .json(&json!({
                "name": "Other",
                "email": "foo@bar.baz",
                "password": "anotherverysafeandsecurepassword",
            }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn register_user_fails_with_weak_password() {
        let server = get_test_server();

        server
            .post(endpoints::USERS)
            .content_type("application/json")
            .json(&json!({
                "name": "Test",
                "email": "foo@bar.baz",
                "password": "hunter2",
            }))
            .await
            .assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn register_user_fails_with_empty_name() {
        let server = get_test_server();

        server
            .post(endpoints::USERS)
            .content_type("application/json")
            .json(&json!({
                "name": "  ",
                "email": "foo@bar.baz",
                "password": "averysafeandsecurepassword",
            }))
            .await
            .assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn register_user_fails_with_malformed_email() {
        let server = get_test_server();

        server
            .post(endpoints::USERS)
            .content_type("application/json")
            .json(&json!({
                "name": "Test",
                "email": "not-an-email",
                "password": "averysafeandsecurepassword",
            }))
            .await
            .assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn get_profile_returns_the_logged_in_user() {
        let server = get_test_server();
        let registered = register(&server, "foo@bar.baz").await;
        let token = log_in(&server, "foo@bar.baz").await;

        let response = server.get(endpoints::ME).authorization_bearer(token).await;

        response.assert_status_ok();
        assert_eq!(response.json::<UserProfile>(), registered);
    }

    #[tokio::test]
    async fn get_profile_fails_without_a_token() {
        let server = get_test_server();

        server
            .get(endpoints::ME)
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn update_profile_replaces_the_user_fields() {
        let server = get_test_server();
        register(&server, "foo@bar.baz").await;
        let token = log_in(&server, "foo@bar.baz").await;

        server
            .put(endpoints::ME)
            .authorization_bearer(&token)
            .content_type("application/json")
            .json(&json!({
                "name": "Renamed",
                "email": "new@bar.baz",
                "password": "averysafeandsecurepassword",
            }))
            .await
            .assert_status(StatusCode::NO_CONTENT);

        let profile = server
            .get(endpoints::ME)
            .authorization_bearer(&token)
            .await
            .json::<UserProfile>();

        assert_eq!(profile.name, "Renamed");
        assert_eq!(profile.email, "new@bar.baz");
    }

    #[tokio::test]
    async fn update_profile_fails_when_email_belongs_to_another_user() {
        let server = get_test_server();
        register(&server, "taken@bar.baz").await;
        register(&server, "foo@bar.baz").await;
        let token = log_in(&server, "foo@bar.baz").await;

        server
            .put(endpoints::ME)
            .authorization_bearer(token)
            .content_type("application/json")
            .json(&json!({
                "name": "Test",
                "email": "taken@bar.baz",
                "password": "averysafeandsecurepassword",
            }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }
}
