//! This module defines traits for interacting with the application's SQLite
//! database and the function for creating the schema.

use rusqlite::{Connection, Error, Row};

use crate::stores::sqlite::{SQLiteCategoryStore, SQLiteTransactionStore, SQLiteUserStore};

/// A trait for adding an object schema to a database.
pub trait CreateTable {
    /// Create a table for the model.
    ///
    /// # Errors
    /// Returns an error if the table already exists or if there is an SQL error.
    fn create_table(connection: &Connection) -> Result<(), Error>;
}

/// A trait for mapping from a `rusqlite::Row` from a SQLite database to a concrete rust type.
pub trait MapRow {
    /// The type that a row is converted into.
    type ReturnType;

    /// Convert a row into a concrete type.
    ///
    /// **Note:** This function expects that the row object contains all the table columns in the order they were defined.
    ///
    /// # Errors
    /// Returns an error if a row item cannot be converted into the corresponding rust type, or if an invalid column index was used.
    fn map_row(row: &Row) -> Result<Self::ReturnType, Error> {
        Self::map_row_with_offset(row, 0)
    }

    /// Convert a row into a concrete type.
    ///
    /// The `offset` indicates which column the row should be read from.
    /// This is useful in cases where tables have been joined and you want to construct two different types from the one query.
    ///
    /// # Errors
    /// Returns an error if a row item cannot be converted into the corresponding rust type, or if an invalid column index was used.
    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, Error>;
}

/// Create the tables for the application's domain models.
///
/// Tables that already exist are left untouched, so this is safe to run on
/// every server start against the same database file.
///
/// Uniqueness of user emails and per-user category names is enforced here,
/// at the schema level, so that concurrent writes cannot bypass the checks
/// performed by the request handlers.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    connection.pragma_update(None, "foreign_keys", true)?;

    SQLiteUserStore::create_table(connection)?;
    SQLiteCategoryStore::create_table(connection)?;
    SQLiteTransactionStore::create_table(connection)?;

    Ok(())
}
