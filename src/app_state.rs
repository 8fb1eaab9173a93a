//! Implements a struct that holds the state of the REST server.

use std::sync::{Arc, Mutex};

use jsonwebtoken::{DecodingKey, EncodingKey};
use rusqlite::Connection;

use crate::{
    Error,
    db::initialize,
    stores::sqlite::{SQLiteCategoryStore, SQLiteTransactionStore, SQLiteUserStore},
};

/// The keys used to sign and validate bearer tokens.
#[derive(Clone)]
struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl JwtKeys {
    fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }
}

/// The state of the REST server.
#[derive(Clone)]
pub struct AppState {
    db_connection: Arc<Mutex<Connection>>,
    jwt_keys: JwtKeys,
    hash_cost: u32,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the tables for the
    /// domain models. `jwt_secret` signs the bearer tokens issued at log-in.
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn new(db_connection: Connection, jwt_secret: &str) -> Result<Self, Error> {
        initialize(&db_connection)?;

        Ok(Self {
            db_connection: Arc::new(Mutex::new(db_connection)),
            jwt_keys: JwtKeys::new(jwt_secret),
            hash_cost: crate::models::PasswordHash::DEFAULT_COST,
        })
    }

    /// Override the bcrypt cost used when hashing new passwords.
    ///
    /// Tests use a low cost to keep hashing fast.
    pub fn with_hash_cost(mut self, hash_cost: u32) -> Self {
        self.hash_cost = hash_cost;
        self
    }

    /// A store for querying user accounts.
    pub fn user_store(&self) -> SQLiteUserStore {
        SQLiteUserStore::new(self.db_connection.clone())
    }

    /// A store for querying transaction categories.
    pub fn category_store(&self) -> SQLiteCategoryStore {
        SQLiteCategoryStore::new(self.db_connection.clone())
    }

    /// A store for querying transactions.
    pub fn transaction_store(&self) -> SQLiteTransactionStore {
        SQLiteTransactionStore::new(self.db_connection.clone())
    }

    /// The key for signing bearer tokens.
    pub fn encoding_key(&self) -> &EncodingKey {
        &self.jwt_keys.encoding
    }

    /// The key for validating bearer tokens.
    pub fn decoding_key(&self) -> &DecodingKey {
        &self.jwt_keys.decoding
    }

    /// The bcrypt cost for hashing new passwords.
    pub fn hash_cost(&self) -> u32 {
        self.hash_cost
    }
}
