//! Implements bearer token authentication.
//!
//! Log-in verifies a user's credentials and issues a signed JSON Web Token.
//! Handlers for protected routes take a [Claims] argument, which rejects the
//! request before the handler runs if the token is missing, malformed,
//! expired, or signed with the wrong key.

use std::str::FromStr;

use axum::{
    Form, Json, RequestPartsExt,
    extract::{FromRef, FromRequestParts, State},
    http::request::Parts,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use email_address::EmailAddress;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, TokenData, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

use crate::{AppState, Error, models::User, stores::UserStore};

/// How long a bearer token stays valid after it is issued.
pub const TOKEN_DURATION: Duration = Duration::minutes(15);

/// The contents of a JSON Web Token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// The expiry time of the token as a unix timestamp.
    pub exp: usize,
    /// The time the token was issued as a unix timestamp.
    pub iat: usize,
    /// Email of the account the token was issued to.
    pub email: EmailAddress,
}

impl<S> FromRequestParts<S> for Claims
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|_| Error::InvalidToken)?;

        let state = AppState::from_ref(state);
        let token_data = decode_token(bearer.token(), state.decoding_key())?;

        Ok(token_data.claims)
    }
}

/// The form fields submitted when logging in.
///
/// `username` holds the account's email address.
#[derive(Debug, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// The response body returned from a successful log-in.
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    /// The signed JSON Web Token.
    pub access_token: String,
    /// Always "bearer".
    pub token_type: String,
}

/// Handler for log-in requests.
///
/// # Errors
///
/// Returns [Error::InvalidCredentials] when the username is not a registered
/// email address or the password does not match.
pub async fn log_in(
    State(state): State<AppState>,
    Form(credentials): Form<Credentials>,
) -> Result<Json<TokenResponse>, Error> {
    let email =
        EmailAddress::from_str(&credentials.username).map_err(|_| Error::InvalidCredentials)?;

    let user = state.user_store().get_by_email(&email).map_err(|error| {
        match error {
            Error::NotFound => Error::InvalidCredentials,
            error => error,
        }
    })?;

    if !user.password_hash().verify(&credentials.password)? {
        return Err(Error::InvalidCredentials);
    }

    let access_token = issue_token(user.email(), state.encoding_key())?;

    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer".to_string(),
    }))
}

/// Create a signed token for `email` that expires in [TOKEN_DURATION].
pub fn issue_token(email: &EmailAddress, encoding_key: &EncodingKey) -> Result<String, Error> {
    let now = OffsetDateTime::now_utc();
    let claims = Claims {
        exp: (now + TOKEN_DURATION).unix_timestamp() as usize,
        iat: now.unix_timestamp() as usize,
        email: email.to_owned(),
    };

    encode(&Header::default(), &claims, encoding_key)
        .map_err(|error| Error::TokenCreation(error.to_string()))
}

/// Validate `token` and extract its claims.
pub fn decode_token(token: &str, decoding_key: &DecodingKey) -> Result<TokenData<Claims>, Error> {
    decode(token, decoding_key, &Validation::default()).map_err(|_| Error::InvalidToken)
}

/// Look up the account a token's claims refer to.
///
/// A token can outlive its account, so a valid signature with no matching
/// user is still an invalid token.
pub fn resolve_user(claims: &Claims, store: &impl UserStore) -> Result<User, Error> {
    store.get_by_email(&claims.email).map_err(|error| match error {
        Error::NotFound => Error::InvalidToken,
        error => error,
    })
}


#[cfg(test)]
mod log_in_tests {
    use axum::{
        Router,
        http::StatusCode,
        routing::{get, post},
    };
    use axum_test::TestServer;
    use rusqlite::Connection;
    use serde_json::Value;

    use crate::{AppState, auth, endpoints};

    const TEST_HASH_COST: u32 = 4;

    fn get_test_state() -> AppState {
        let db_connection =
            Connection::open_in_memory().expect("Could not open database in memory.");

        AppState::new(db_connection, "foobar")
            .expect("Could not create app state.")
            .with_hash_cost(TEST_HASH_COST)
    }

    fn new_test_server(state: AppState) -> TestServer {
        let app = Router::new()
            .route(endpoints::REGISTER, post(crate::register_user::register))
            .route(endpoints::LOG_IN, post(auth::log_in))
            .route("/protected", get(handler_with_auth))
            .with_state(state);

        TestServer::new(app)
    }

    async fn handler_with_auth(_: auth::Claims) -> StatusCode {
        StatusCode::OK
    }

    async fn register_test_user(server: &TestServer) {
        server
            .post(endpoints::REGISTER)
            .json(&serde_json::json!({
                "email": "foo@bar.baz",
                "password": "averysafeandsecurepassword",
            }))
            .await
            .assert_status_ok();
    }

    #[tokio::test]
    async fn log_in_succeeds_with_valid_credentials() {
        let server = new_test_server(get_test_state());
        register_test_user(&server).await;

        let response = server
            .post(endpoints::LOG_IN)
            .form(&[
                ("username", "foo@bar.baz"),
                ("password", "averysafeandsecurepassword"),
            ])
            .await;

        response.assert_status_ok();

        let body = response.json::<Value>();
        assert_eq!(body["token_type"], "bearer");
        assert!(!body["access_token"].as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn log_in_fails_with_wrong_password() {
        let server = new_test_server(get_test_state());
        register_test_user(&server).await;

        server
            .post(endpoints::LOG_IN)
            .form(&[
                ("username", "foo@bar.baz"),
                ("password", "definitelyNotTheCorrectPassword"),
            ])
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn log_in_fails_with_unknown_email() {
        let server = new_test_server(get_test_state());

        server
            .post(endpoints::LOG_IN)
            .form(&[
                ("username", "nobody@nowhere.com"),
                ("password", "averysafeandsecurepassword"),
            ])
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn log_in_fails_with_malformed_email() {
        let server = new_test_server(get_test_state());

        server
            .post(endpoints::LOG_IN)
            .form(&[
                ("username", "not an email"),
                ("password", "averysafeandsecurepassword"),
            ])
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn protected_route_accepts_valid_token() {
        let server = new_test_server(get_test_state());
        register_test_user(&server).await;

        let response = server
            .post(endpoints::LOG_IN)
            .form(&[
                ("username", "foo@bar.baz"),
                ("password", "averysafeandsecurepassword"),
            ])
            .await;

        let token = response.json::<auth::TokenResponse>().access_token;

        server
            .get("/protected")
            .authorization_bearer(token)
            .await
            .assert_status_ok();
    }

    #[tokio::test]
    async fn protected_route_rejects_missing_header() {
        let server = new_test_server(get_test_state());

        server
            .get("/protected")
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn protected_route_rejects_garbage_token() {
        let server = new_test_server(get_test_state());

        server
            .get("/protected")
            .authorization_bearer("not.a.token")
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }
}
