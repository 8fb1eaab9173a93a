//! The route handler for creating a new user account.

use axum::{Json, extract::State};
use email_address::EmailAddress;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    models::{PasswordHash, UserProfile},
    stores::UserStore,
};

/// The request body for creating a new user account.
#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterRequest {
    /// The email address to register. Must not belong to an existing account.
    pub email: EmailAddress,
    /// The plaintext password. Only its bcrypt hash is stored.
    pub password: String,
}

/// Handler for registration requests.
///
/// Responds with the new account's profile. The password hash is never
/// included in the response.
///
/// # Errors
///
/// Returns [Error::DuplicateEmail] when the email address is already
/// registered.
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<UserProfile>, Error> {
    let password_hash = PasswordHash::from_raw_password(&request.password, state.hash_cost())?;

    let user = state.user_store().create(request.email, password_hash)?;

    Ok(Json(UserProfile::from(user)))
}

#[cfg(test)]
mod register_tests {
    use axum::{Router, http::StatusCode, routing::post};
    use axum_test::TestServer;
    use rusqlite::Connection;
    use serde_json::{Value, json};

    use crate::{AppState, endpoints};

    use super::register;

    fn new_test_server() -> TestServer {
        let db_connection =
            Connection::open_in_memory().expect("Could not open database in memory.");
        let state = AppState::new(db_connection, "foobar")
            .expect("Could not create app state.")
            .with_hash_cost(4);

        let app = Router::new()
            .route(endpoints::REGISTER, post(register))
            .with_state(state);

        TestServer::new(app)
    }

    #[tokio::test]
    async fn register_returns_profile_without_password() {
        let server = new_test_server();

        let response = server
            .post(endpoints::REGISTER)
            .json(&json!({
                "email": "foo@bar.baz",
                "password": "averysafeandsecurepassword",
            }))
            .await;

        response.assert_status_ok();

        let body = response.json::<Value>();
        assert_eq!(body["email"], "foo@bar.baz");
        assert!(body["id"].as_i64().unwrap() > 0);
        assert!(body.get("password").is_none());
        assert!(body.get("password_hash").is_none());
    }

    #[tokio::test]
    async fn register_fails_with_duplicate_email() {
        let server = new_test_server();

        let request_body = json!({
            "email": "foo@bar.baz",
            "password": "averysafeandsecurepassword",
        });

        server
            .post(endpoints::REGISTER)
            .json(&request_body)
            .await
            .assert_status_ok();

        server
            .post(endpoints::REGISTER)
            .json(&request_body)
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn register_fails_with_malformed_email() {
        let server = new_test_server();

        server
            .post(endpoints::REGISTER)
            .json(&json!({
                "email": "not an email",
                "password": "averysafeandsecurepassword",
            }))
            .await
            .assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn register_allows_same_password_for_different_emails() {
        let server = new_test_server();

        for email in ["foo@bar.baz", "qux@bar.baz"] {
            server
                .post(endpoints::REGISTER)
                .json(&json!({
                    "email": email,
                    "password": "averysafeandsecurepassword",
                }))
                .await
                .assert_status_ok();
        }
    }
}
