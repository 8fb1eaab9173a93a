//! Application router configuration with protected and unprotected route
//! definitions.
//!
//! Protected routes authenticate per handler through the [crate::auth::Claims]
//! extractor rather than a middleware guard, so an unauthenticated request is
//! rejected before the handler body runs.

use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use crate::{
    AppState,
    auth::log_in,
    category::{create_category, get_categories},
    dashboard::{get_summary_by_date, get_summary_total},
    endpoints,
    logging::logging_middleware,
    profile::get_profile,
    register_user::register,
    transaction::{
        create_transaction, delete_transaction, get_transactions, update_transaction,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let unprotected_routes = Router::new()
        .route(endpoints::REGISTER, post(register))
        .route(endpoints::LOG_IN, post(log_in));

    let protected_routes = Router::new()
        .route(endpoints::USERS_ME, get(get_profile))
        .route(
            endpoints::CATEGORIES,
            post(create_category).get(get_categories),
        )
        .route(
            endpoints::TRANSACTIONS,
            post(create_transaction).get(get_transactions),
        )
        .route(
            endpoints::TRANSACTION,
            put(update_transaction).delete(delete_transaction),
        )
        .route(endpoints::SUMMARY_TOTAL, get(get_summary_total))
        .route(endpoints::SUMMARY_BY_DATE, get(get_summary_by_date));

    protected_routes
        .merge(unprotected_routes)
        .layer(middleware::from_fn(logging_middleware))
        .with_state(state)
}

#[cfg(test)]
mod router_tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use rusqlite::Connection;
    use serde_json::json;

    use crate::{AppState, endpoints};

    use super::build_router;

    fn new_test_server() -> TestServer {
        let db_connection =
            Connection::open_in_memory().expect("Could not open database in memory.");
        let state = AppState::new(db_connection, "foobar")
            .expect("Could not create app state.")
            .with_hash_cost(4);

        TestServer::new(build_router(state))
    }

    #[tokio::test]
    async fn unknown_route_returns_not_found() {
        let server = new_test_server();

        server
            .get("/does-not-exist")
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn protected_routes_reject_unauthenticated_requests() {
        let server = new_test_server();

        let get_routes = [
            endpoints::USERS_ME,
            endpoints::CATEGORIES,
            endpoints::TRANSACTIONS,
            endpoints::SUMMARY_TOTAL,
            endpoints::SUMMARY_BY_DATE,
        ];

        for route in get_routes {
            server
                .get(route)
                .await
                .assert_status(StatusCode::UNAUTHORIZED);
        }
    }

    #[tokio::test]
    async fn register_and_log_in_through_the_full_router() {
        let server = new_test_server();

        server
            .post(endpoints::REGISTER)
            .json(&json!({
                "email": "foo@bar.baz",
                "password": "averysafeandsecurepassword",
            }))
            .await
            .assert_status_ok();

        server
            .post(endpoints::LOG_IN)
            .form(&[
                ("username", "foo@bar.baz"),
                ("password", "averysafeandsecurepassword"),
            ])
            .await
            .assert_status_ok();
    }
}
