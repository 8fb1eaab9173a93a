//! Defines the endpoint paths for the REST server.
//!
//! Storing the endpoints in one module avoids inconsistencies between the
//! router and the handler tests.

/// Create a new user account.
pub const REGISTER: &str = "/register";

/// Exchange credentials for a bearer token.
pub const LOG_IN: &str = "/login";

/// The profile of the authenticated user.
pub const USERS_ME: &str = "/users/me";

/// Create a category or list the authenticated user's categories.
pub const CATEGORIES: &str = "/categories/";

/// Create a transaction or list the authenticated user's transactions.
pub const TRANSACTIONS: &str = "/transactions/";

/// Update or delete a single transaction.
pub const TRANSACTION: &str = "/transactions/{transaction_id}";

/// Income and expense totals across all of the user's transactions.
pub const SUMMARY_TOTAL: &str = "/dashboard/summary_total";

/// Income and expense totals within a date range.
pub const SUMMARY_BY_DATE: &str = "/dashboard/summary_by_date";
