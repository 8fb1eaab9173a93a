//! This file defines the type that handles password hashing and verification.
//! `PasswordHash` wraps a salted bcrypt hash so that raw passwords and stored
//! hashes cannot be mixed up.

use std::fmt::Display;

use bcrypt::{hash, verify};
use serde::{Deserialize, Serialize};

use crate::Error;

/// A salted and hashed password.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// An alias for the default encryption cost for hashing passwords.
    pub const DEFAULT_COST: u32 = bcrypt::DEFAULT_COST;

    /// Create a hashed password from a raw password string.
    ///
    /// `cost` increases the rounds of hashing and therefore the time needed to verify a password.
    /// A value of at least 12 is recommended. Pass in [PasswordHash::DEFAULT_COST] to use the recommended cost.
    ///
    /// The hash is salted, so hashing the same password twice produces two
    /// different strings.
    ///
    /// # Errors
    ///
    /// This function will return an error if the password could not be hashed.
    pub fn from_raw_password(raw_password: &str, cost: u32) -> Result<Self, Error> {
        match hash(raw_password, cost) {
            Ok(password_hash) => Ok(Self(password_hash)),
            Err(e) => Err(Error::HashingError(e.to_string())),
        }
    }

    /// Create a new `PasswordHash` without any validation.
    ///
    /// The caller should ensure that `raw_password_hash` is a valid password hash.
    ///
    /// This function has `_unchecked` in the name but is not `unsafe`, because if an invalid hash is provided it will cause incorrect behaviour but not affect memory safety.
    pub fn new_unchecked(raw_password_hash: &str) -> Self {
        Self(raw_password_hash.to_string())
    }

    /// Check that `raw_password` matches the stored password.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored string is not a valid bcrypt hash.
    pub fn verify(&self, raw_password: &str) -> Result<bool, Error> {
        verify(raw_password, &self.0).map_err(|e| Error::HashingError(e.to_string()))
    }
}

impl Display for PasswordHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod password_hash_tests {
    use crate::models::PasswordHash;

    /// Tests use a low cost to avoid slowing down the test suite.
    const TEST_COST: u32 = 4;

    #[test]
    fn verify_password_succeeds_for_valid_password() {
        let hash = PasswordHash::new_unchecked(
            "$2b$12$Gwf0uvxH3L7JLfo0CC/NCOoijK2vQ/wbgP.LeNup8vj6gg31IiFkm",
        );
        let password = "okon";

        assert!(hash.verify(password).unwrap());
    }

    #[test]
    fn verify_password_fails_for_invalid_password() {
        let hash = PasswordHash::new_unchecked(
            "$2b$12$Gwf0uvxH3L7JLfo0CC/NCOoijK2vQ/wbgP.LeNup8vj6gg31IiFkm",
        );
        let password = "thewrongpassword";

        assert!(!hash.verify(password).unwrap());
    }

    #[test]
    fn hash_password_produces_verifiable_hash() {
        let password = "roostersgocockledoodledoo";
        let wrong_password = "the_wrong_password";
        let hash = PasswordHash::from_raw_password(password, TEST_COST).unwrap();

        assert!(hash.verify(password).unwrap());
        assert!(!hash.verify(wrong_password).unwrap());
    }

    #[test]
    fn hash_duplicate_password_produces_unique_hash() {
        let password = "turkeysgogobblegobble";
        let hash = PasswordHash::from_raw_password(password, TEST_COST).unwrap();
        let dupe_hash = PasswordHash::from_raw_password(password, TEST_COST).unwrap();

        assert_ne!(hash, dupe_hash);
    }

    #[test]
    fn verify_fails_on_invalid_stored_hash() {
        let hash = PasswordHash::new_unchecked("not a bcrypt hash");

        assert!(hash.verify("hunter2").is_err());
    }
}
