//! The route handlers for the dashboard summary endpoints.

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use time::Date;

use crate::{
    AppState, Error,
    auth::{Claims, resolve_user},
    models::FinancialSummary,
    stores::TransactionStore,
};

/// The query parameters selecting the date window to summarize.
///
/// Both bounds are inclusive.
#[derive(Debug, Deserialize)]
pub struct DateRangeParams {
    pub start_date: Date,
    pub end_date: Date,
}

/// Handler for summarizing all of the authenticated user's transactions.
pub async fn get_summary_total(
    State(state): State<AppState>,
    claims: Claims,
) -> Result<Json<FinancialSummary>, Error> {
    let user = resolve_user(&claims, &state.user_store())?;

    let summary = state.transaction_store().summarize(user.id(), None)?;

    Ok(Json(summary))
}

/// Handler for summarizing the authenticated user's transactions within a
/// date range.
///
/// # Errors
///
/// Returns [Error::InvalidDateRange] when the start date is after the end
/// date.
pub async fn get_summary_by_date(
    State(state): State<AppState>,
    claims: Claims,
    Query(params): Query<DateRangeParams>,
) -> Result<Json<FinancialSummary>, Error> {
    let user = resolve_user(&claims, &state.user_store())?;

    if params.start_date > params.end_date {
        return Err(Error::InvalidDateRange(params.start_date, params.end_date));
    }

    let summary = state
        .transaction_store()
        .summarize(user.id(), Some(params.start_date..=params.end_date))?;

    Ok(Json(summary))
}
