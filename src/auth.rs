//! This module defines the data structures, response handlers and functions
//! for authenticating a user with JSON Web Tokens.
//!
//! Log-in exchanges an email/password pair for a signed token; every
//! protected handler then takes a [Claims] argument, which extracts and
//! verifies the bearer token from the `Authorization` header.

use axum::{
    Json, RequestPartsExt,
    extract::{FromRef, FromRequestParts, State},
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, TokenData, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use serde_json::json;
use time::{Duration, OffsetDateTime};

use crate::{
    Error,
    models::{UserID, UserProfile},
    state::{AppState, JwtKeys},
    stores::{CategoryStore, TransactionStore, UserStore},
};

/// How long a session token stays valid after it is issued.
const TOKEN_DURATION: Duration = Duration::hours(1);

/// The contents of a JSON Web Token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// The ID of the user the token was issued to.
    pub sub: i64,
    /// The expiry time of the token as a unix timestamp.
    pub exp: usize,
    /// The time the token was issued as a unix timestamp.
    pub iat: usize,
}

impl Claims {
    /// The ID of the user the token was issued to.
    pub fn user_id(&self) -> UserID {
        UserID::new(self.sub)
    }
}

impl<S> FromRequestParts<S> for Claims
where
    JwtKeys: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|_| AuthError::InvalidToken)?;

        let jwt_keys = JwtKeys::from_ref(state);

        let token_data = decode_jwt(bearer.token(), jwt_keys.decoding_key())?;

        Ok(token_data.claims)
    }
}

/// The email/password pair a client logs in with.
#[derive(Debug, Deserialize)]
pub struct Credentials {
    /// Email entered during log-in.
    pub email: String,
    /// Password entered during log-in.
    pub password: String,
}

/// The body returned on a successful log-in.
#[derive(Debug, Serialize, Deserialize)]
pub struct LogInResponse {
    /// The profile of the logged-in user.
    pub user: UserProfile,
    /// The signed session token to send as a bearer token on protected
    /// routes.
    pub token: String,
}

/// The errors that may occur while authenticating a request.
#[derive(Debug, PartialEq)]
pub enum AuthError {
    /// The email/password pair did not match a registered user.
    WrongCredentials,
    /// The session token could not be signed.
    TokenCreation,
    /// The bearer token was missing, malformed, expired or signed with the
    /// wrong key.
    InvalidToken,
    /// The token was valid but the user it was issued to no longer exists.
    UserNotFound,
    /// Something unexpected went wrong; details are in the server log.
    InternalError,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AuthError::WrongCredentials => (StatusCode::UNAUTHORIZED, "invalid email or password"),
            AuthError::TokenCreation => (StatusCode::INTERNAL_SERVER_ERROR, "token creation error"),
            AuthError::InvalidToken => (StatusCode::BAD_REQUEST, "invalid token"),
            AuthError::UserNotFound => (StatusCode::FORBIDDEN, "not authorized"),
            AuthError::InternalError => (StatusCode::INTERNAL_SERVER_ERROR, "internal server error"),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

/// Handler for log-in requests.
///
/// On success the response carries the user's profile and a session token.
///
/// # Errors
///
/// This function will return an error in a few situations.
/// - The email does not belong to a registered user.
/// - The password is not correct.
/// - An internal error occurred when verifying the password or signing the
///   token.
///
/// Unknown emails and wrong passwords produce the same response so that the
/// log-in endpoint cannot be used to probe which emails are registered.
pub async fn log_in<C, T, U>(
    State(state): State<AppState<C, T, U>>,
    Json(credentials): Json<Credentials>,
) -> Result<Json<LogInResponse>, AuthError>
where
    C: CategoryStore + Clone + Send + Sync,
    T: TransactionStore + Clone + Send + Sync,
    U: UserStore + Clone + Send + Sync,
{
    let email = credentials
        .email
        .parse()
        .map_err(|_| AuthError::WrongCredentials)?;

    let user = state.user_store.get_by_email(&email).map_err(|e| match e {
        Error::NotFound => AuthError::WrongCredentials,
        _ => {
            tracing::error!("Error matching user: {e:?}");
            AuthError::InternalError
        }
    })?;

    let password_is_correct = user
        .password_hash()
        .verify(&credentials.password)
        .map_err(|e| {
            tracing::error!("Error verifying password: {}", e);
            AuthError::InternalError
        })?;

    if !password_is_correct {
        return Err(AuthError::WrongCredentials);
    }

    let token = encode_jwt(user.id(), state.jwt_keys.encoding_key())?;

    Ok(Json(LogInResponse {
        user: UserProfile::from(&user),
        token,
    }))
}

fn encode_jwt(user_id: UserID, encoding_key: &EncodingKey) -> Result<String, AuthError> {
    let now = OffsetDateTime::now_utc();
    let claims = Claims {
        sub: user_id.as_i64(),
        exp: (now + TOKEN_DURATION).unix_timestamp() as usize,
        iat: now.unix_timestamp() as usize,
    };

    encode(&Header::default(), &claims, encoding_key).map_err(|_| AuthError::TokenCreation)
}

fn decode_jwt(jwt_token: &str, decoding_key: &DecodingKey) -> Result<TokenData<Claims>, AuthError> {
    decode(jwt_token, decoding_key, &Validation::default()).map_err(|_| AuthError::InvalidToken)
}


#[cfg(test)]
mod log_in_tests {
    use std::{
        str::FromStr,
        sync::{Arc, Mutex},
    };

    use axum::{
        Json, Router,
        http::StatusCode,
        routing::{get, post},
    };
    use axum_test::TestServer;
    use email_address::EmailAddress;
    use rusqlite::Connection;
    use serde_json::json;

    use crate::{
        AppState,
        auth::{Claims, LogInResponse, log_in},
        db::initialize,
        models::PasswordHash,
        stores::UserStore,
        stores::sqlite::{SQLiteCategoryStore, SQLiteTransactionStore, SQLiteUserStore},
    };

    type TestState = AppState<SQLiteCategoryStore, SQLiteTransactionStore, SQLiteUserStore>;

    fn get_test_state() -> TestState {
        let connection = Connection::open_in_memory().expect("Could not open database in memory.");
        initialize(&connection).expect("Could not initialize database.");
        let connection = Arc::new(Mutex::new(connection));

        AppState::new(
            "foobar",
            SQLiteCategoryStore::new(connection.clone()),
            SQLiteTransactionStore::new(connection.clone()),
            SQLiteUserStore::new(connection),
        )
    }

    fn create_test_user(state: &mut TestState, email: &str, password: &str) {
        state
            .user_store
            .create(
                "Test",
                EmailAddress::from_str(email).unwrap(),
                PasswordHash::from_raw_password(password, 4).unwrap(),
            )
            .unwrap();
    }

    async fn handler_with_auth(claims: Claims) -> Json<i64> {
        Json(claims.sub)
    }

    fn get_test_server(state: TestState) -> TestServer {
        let app = Router::new()
            .route("/log_in", post(log_in))
            .route("/protected", get(handler_with_auth))
            .with_state(state);

        TestServer::try_new(app).expect("Could not create test server.")
    }

    #[tokio::test]
    async fn log_in_succeeds_with_valid_credentials() {
        let mut state = get_test_state();
        create_test_user(&mut state, "foo@bar.baz", "averysafeandsecurepassword");
        let server = get_test_server(state);

        let response = server
            .post("/log_in")
            .content_type("application/json")
            .json(&json!({
                "email": "foo@bar.baz",
                "password": "averysafeandsecurepassword",
            }))
            .await;

        response.assert_status_ok();

        let body = response.json::<LogInResponse>();
        assert_eq!(body.user.email, "foo@bar.baz");
        assert!(!body.token.is_empty());
    }

    #[tokio::test]
    async fn log_in_fails_with_missing_credentials() {
        let server = get_test_server(get_test_state());

        server
            .post("/log_in")
            .content_type("application/json")
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn log_in_fails_with_wrong_password() {
        let mut state = get_test_state();
        create_test_user(&mut state, "foo@bar.baz", "averysafeandsecurepassword");
        let server = get_test_server(state);

        server
            .post("/log_in")
            .content_type("application/json")
            .json(&json!({
                "email": "foo@bar.baz",
                "password": "definitelyNotTheCorrectPassword",
            }))
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn log_in_fails_with_unknown_email() {
        let server = get_test_server(get_test_state());

        server
            .post("/log_in")
            .content_type("application/json")
            .json(&json!({
                "email": "wrongemail@gmail.com",
                "password": "definitelyNotTheCorrectPassword",
            }))
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn get_protected_route_with_valid_jwt() {
        let mut state = get_test_state();
        create_test_user(&mut state, "foo@bar.baz", "averysafeandsecurepassword");
        let server = get_test_server(state);

        let response = server
            .post("/log_in")
            .content_type("application/json")
            .json(&json!({
                "email": "foo@bar.baz",
                "password": "averysafeandsecurepassword",
            }))
            .await;

        response.assert_status_ok();
        let token = response.json::<LogInResponse>().token;

        server
            .get("/protected")
            .authorization_bearer(token)
            .await
            .assert_status_ok();
    }

    #[tokio::test]
    async fn get_protected_route_with_missing_header() {
        let server = get_test_server(get_test_state());

        server
            .get("/protected")
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn get_protected_route_with_invalid_token() {
        let server = get_test_server(get_test_state());

        server
            .get("/protected")
            .authorization_bearer("not.a.token")
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }
}
