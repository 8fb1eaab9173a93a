//! The route handlers for creating and listing transaction categories.

use axum::{
    Json,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    auth::{Claims, resolve_user},
    models::{Category, CategoryName},
    pagination::Pagination,
    stores::CategoryStore,
};

/// The request body for creating a new category.
#[derive(Debug, Serialize, Deserialize)]
pub struct CategoryData {
    /// The name of the category. Must be unique among the user's categories.
    pub name: String,
}

/// Handler for creating a category owned by the authenticated user.
///
/// # Errors
///
/// Returns [Error::EmptyCategoryName] when the name is empty and
/// [Error::DuplicateCategoryName] when the user already has a category with
/// this name.
pub async fn create_category(
    State(state): State<AppState>,
    claims: Claims,
    Json(category_data): Json<CategoryData>,
) -> Result<Json<Category>, Error> {
    let user = resolve_user(&claims, &state.user_store())?;
    let name = CategoryName::new(&category_data.name)?;

    let category = state.category_store().create(name, user.id())?;

    Ok(Json(category))
}

/// Handler for listing the authenticated user's categories.
pub async fn get_categories(
    State(state): State<AppState>,
    claims: Claims,
    Query(pagination): Query<Pagination>,
) -> Result<Json<Vec<Category>>, Error> {
    let user = resolve_user(&claims, &state.user_store())?;

    let categories = state.category_store().get_by_user(user.id(), &pagination)?;

    Ok(Json(categories))
}
