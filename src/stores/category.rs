//! Defines the category store trait.

use crate::{
    Error,
    models::{Category, CategoryName, DatabaseID, UserID},
    pagination::Pagination,
};

/// Creates and retrieves transaction categories.
pub trait CategoryStore {
    /// Create a new category and add it the store.
    ///
    /// Fails with [Error::DuplicateCategoryName] if the user already has a
    /// category with this name. Names are only unique per user, so two
    /// different users may use the same name.
    fn create(&self, name: CategoryName, user_id: UserID) -> Result<Category, Error>;

    /// Get a category owned by `user_id` by its ID.
    ///
    /// Returns [Error::NotFound] if the category does not exist or belongs to
    /// a different user.
    fn get(&self, category_id: DatabaseID, user_id: UserID) -> Result<Category, Error>;

    /// Get a category owned by `user_id` by its name.
    ///
    /// Returns [Error::NotFound] if the user has no category with this name.
    fn get_by_name(&self, name: &CategoryName, user_id: UserID) -> Result<Category, Error>;

    /// Get a page of the categories owned by `user_id`.
    fn get_by_user(&self, user_id: UserID, pagination: &Pagination)
    -> Result<Vec<Category>, Error>;
}
