//! This file defines a user of the application and its supporting types.

use std::fmt::Display;

use email_address::EmailAddress;
use serde::{Deserialize, Serialize};

use crate::models::PasswordHash;

/// A newtype wrapper for integer user IDs.
/// This helps disambiguate user IDs from other types of IDs, leading to better compile time
/// errors, and more flexible generics that can have distinct implementations for multiple ID types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserID(i64);

impl UserID {
    /// Create a user ID from an integer.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// The underlying integer ID.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for UserID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A user of the application.
///
/// Users are created at registration and own all the categories and
/// transactions they create. They are never updated or deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    id: UserID,
    email: EmailAddress,
    password_hash: PasswordHash,
}

impl User {
    /// Create a new user.
    pub fn new(id: UserID, email: EmailAddress, password_hash: PasswordHash) -> Self {
        Self {
            id,
            email,
            password_hash,
        }
    }

    /// The user's ID in the database.
    pub fn id(&self) -> UserID {
        self.id
    }

    /// The email address associated with the user.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// The user's password hash.
    pub fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }
}

/// The client-facing view of a [User].
///
/// This is what the API returns: it omits the password hash, which must never
/// leave the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// The user's ID in the database.
    pub id: UserID,
    /// The email address associated with the user.
    pub email: EmailAddress,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
        }
    }
}

#[cfg(test)]
mod user_profile_tests {
    use std::str::FromStr;

    use email_address::EmailAddress;

    use crate::models::{PasswordHash, User, UserID, UserProfile};

    #[test]
    fn profile_does_not_contain_password_hash() {
        let user = User::new(
            UserID::new(1),
            EmailAddress::from_str("foo@bar.baz").unwrap(),
            PasswordHash::new_unchecked("hunter2"),
        );

        let profile = UserProfile::from(user);
        let json = serde_json::to_string(&profile).unwrap();

        assert!(!json.contains("hunter2"));
        assert!(json.contains("foo@bar.baz"));
    }
}
