//! Defines the user store trait.

use email_address::EmailAddress;

use crate::{
    Error,
    models::{PasswordHash, User, UserID},
};

/// Handles the creation and retrieval of User objects.
pub trait UserStore {
    /// Create a new user.
    ///
    /// Fails with [Error::DuplicateEmail] if the email is already registered.
    /// Uniqueness is guaranteed by the database schema, so concurrent
    /// registrations with the same email cannot both succeed.
    fn create(&self, email: EmailAddress, password_hash: PasswordHash) -> Result<User, Error>;

    /// Get a user by their ID.
    ///
    /// Returns [Error::NotFound] if no user with the given ID exists.
    fn get(&self, id: UserID) -> Result<User, Error>;

    /// Get a user by their email.
    ///
    /// Returns [Error::NotFound] if no user with the given email exists.
    fn get_by_email(&self, email: &EmailAddress) -> Result<User, Error>;
}
