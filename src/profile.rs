//! The route handler for fetching the authenticated user's profile.

use axum::{Json, extract::State};

use crate::{AppState, Error, auth::Claims, auth::resolve_user, models::UserProfile};

/// Handler for fetching the profile of the account the bearer token was
/// issued to.
///
/// # Errors
///
/// Returns [Error::InvalidToken] if the account no longer exists.
pub async fn get_profile(
    State(state): State<AppState>,
    claims: Claims,
) -> Result<Json<UserProfile>, Error> {
    let user = resolve_user(&claims, &state.user_store())?;

    Ok(Json(UserProfile::from(user)))
}
