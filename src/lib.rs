//! Cashflow is a multi-tenant backend for tracking personal finances.
//!
//! Users register with an email address and password, authenticate to receive
//! a bearer token, and then manage their own spending categories and
//! income/expense transactions. The dashboard endpoints aggregate a user's
//! transactions into income/expense totals, optionally over a date range.
//!
//! This library provides a JSON REST API backed by SQLite.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde_json::json;
use time::Date;
use tokio::signal;

mod app_state;
mod auth;
mod category;
mod dashboard;
mod db;
mod endpoints;
mod logging;
mod models;
mod pagination;
mod profile;
mod register_user;
mod routing;
mod stores;
mod transaction;

pub use app_state::AppState;
pub use db::initialize as initialize_db;
pub use logging::logging_middleware;
pub use routing::build_router;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
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
    /// The email used to register is already in use. The client should try
    /// again with a different email address.
    #[error("the email is already registered")]
    DuplicateEmail,

    /// The user already has a category with the given name.
    #[error("a category with this name already exists")]
    DuplicateCategoryName,

    /// An empty string was used to create a category name.
    #[error("category name cannot be empty")]
    EmptyCategoryName,

    /// The email/password combination did not match a registered user.
    #[error("incorrect email or password")]
    InvalidCredentials,

    /// The bearer token is missing, malformed, expired, or its signature is
    /// invalid.
    #[error("invalid bearer token")]
    InvalidToken,

    /// An unexpected error occurred while signing a token.
    ///
    /// The error string should only be logged for debugging on the server.
    #[error("token creation failed: {0}")]
    TokenCreation(String),

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// A category ID did not refer to a category owned by the caller.
    #[error("the category does not exist or does not belong to the user")]
    CategoryNotFound,

    /// A date range had a start date later than its end date.
    #[error("start date {0} must not be after end date {1}")]
    InvalidDateRange(Date, Date),

    /// A string from the database could not be parsed as a transaction type.
    #[error("{0:?} is not a valid transaction type")]
    InvalidTransactionType(String),

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// Could not acquire the database lock.
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            // Code 2067 occurs when a UNIQUE constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.contains("user.email") =>
            {
                Error::DuplicateEmail
            }
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.contains("category.") =>
            {
                Error::DuplicateCategoryName
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
        let status = match self {
            Error::DuplicateEmail
            | Error::DuplicateCategoryName
            | Error::EmptyCategoryName
            | Error::InvalidDateRange(_, _) => StatusCode::BAD_REQUEST,
            Error::InvalidCredentials | Error::InvalidToken => StatusCode::UNAUTHORIZED,
            Error::NotFound | Error::CategoryNotFound => StatusCode::NOT_FOUND,
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);

                let body = Json(json!({
                    "error": "internal server error",
                }));

                return (StatusCode::INTERNAL_SERVER_ERROR, body).into_response();
            }
        };

        let body = Json(json!({
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod error_tests {
    use axum::{http::StatusCode, response::IntoResponse};
    use time::macros::date;

    use crate::Error;

    #[test]
    fn duplicate_email_maps_to_bad_request() {
        let response = Error::DuplicateEmail.into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn invalid_token_maps_to_unauthorized() {
        let response = Error::InvalidToken.into_response();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn not_found_maps_to_not_found() {
        let response = Error::NotFound.into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn invalid_date_range_maps_to_bad_request() {
        let error = Error::InvalidDateRange(date!(2024 - 02 - 01), date!(2024 - 01 - 01));

        let response = error.into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn sql_error_maps_to_internal_server_error() {
        let response = Error::SqlError(rusqlite::Error::QueryReturnedNoRows).into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
