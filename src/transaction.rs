//! The route handlers for creating, listing, updating, and deleting
//! transactions.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

use crate::{
    AppState, Error,
    auth::{Claims, resolve_user},
    models::{DatabaseID, NewTransaction, Transaction, TransactionUpdate, UserID},
    pagination::Pagination,
    stores::{CategoryStore, TransactionStore},
};

/// Check that `category_id` refers to a category owned by `user_id`.
///
/// Transactions may reference another user's category neither at creation nor
/// through an update.
fn validate_category(
    state: &AppState,
    category_id: Option<DatabaseID>,
    user_id: UserID,
) -> Result<(), Error> {
    match category_id {
        Some(category_id) => state
            .category_store()
            .get(category_id, user_id)
            .map(|_| ())
            .map_err(|error| match error {
                Error::NotFound => Error::CategoryNotFound,
                error => error,
            }),
        None => Ok(()),
    }
}

/// Handler for creating a transaction owned by the authenticated user.
///
/// # Errors
///
/// Returns [Error::CategoryNotFound] when the referenced category does not
/// exist or belongs to a different user.
pub async fn create_transaction(
    State(state): State<AppState>,
    claims: Claims,
    Json(new_transaction): Json<NewTransaction>,
) -> Result<Json<Transaction>, Error> {
    let user = resolve_user(&claims, &state.user_store())?;

    validate_category(&state, new_transaction.category_id, user.id())?;

    let transaction = state.transaction_store().create(new_transaction, user.id())?;

    Ok(Json(transaction))
}

/// Handler for listing the authenticated user's transactions, newest first.
pub async fn get_transactions(
    State(state): State<AppState>,
    claims: Claims,
    Query(pagination): Query<Pagination>,
) -> Result<Json<Vec<Transaction>>, Error> {
    let user = resolve_user(&claims, &state.user_store())?;

    let transactions = state
        .transaction_store()
        .get_by_user(user.id(), &pagination)?;

    Ok(Json(transactions))
}

/// Handler for partially updating one of the authenticated user's
/// transactions.
///
/// Fields absent from the request body keep their stored values. An explicit
/// JSON `null` for `description` or `category_id` clears the stored value.
///
/// # Errors
///
/// Returns [Error::NotFound] when the transaction does not exist or belongs
/// to a different user, and [Error::CategoryNotFound] when the new category
/// is not the user's.
pub async fn update_transaction(
    State(state): State<AppState>,
    claims: Claims,
    Path(transaction_id): Path<DatabaseID>,
    Json(update): Json<TransactionUpdate>,
) -> Result<Json<Transaction>, Error> {
    let user = resolve_user(&claims, &state.user_store())?;

    // Clearing the category (`Some(None)`) needs no ownership check.
    validate_category(&state, update.category_id.flatten(), user.id())?;

    let transaction = state
        .transaction_store()
        .update(transaction_id, update, user.id())?;

    Ok(Json(transaction))
}

/// Handler for deleting one of the authenticated user's transactions.
///
/// # Errors
///
/// Returns [Error::NotFound] when the transaction does not exist or belongs
/// to a different user.
pub async fn delete_transaction(
    State(state): State<AppState>,
    claims: Claims,
    Path(transaction_id): Path<DatabaseID>,
) -> Result<StatusCode, Error> {
    let user = resolve_user(&claims, &state.user_store())?;

    state.transaction_store().delete(transaction_id, user.id())?;

    Ok(StatusCode::NO_CONTENT)
}
