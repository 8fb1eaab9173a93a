//! Implements a SQLite backed category store.

use std::sync::{Arc, Mutex};

use rusqlite::{Connection, Row, named_params};

use crate::{
    Error,
    db::{CreateTable, MapRow},
    models::{Category, CategoryName, DatabaseID, UserID},
    pagination::Pagination,
    stores::CategoryStore,
};

/// Handles the creation and retrieval of categories.
#[derive(Debug, Clone)]
pub struct SQLiteCategoryStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteCategoryStore {
    /// Create a new category store.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

impl CategoryStore for SQLiteCategoryStore {
    /// Create and insert a new category into the database.
    ///
    /// # Errors
    ///
    /// Returns [Error::DuplicateCategoryName] if `user_id` already has a
    /// category named `name`, or [Error::SqlError] if an SQL related error
    /// occurred.
    fn create(&self, name: CategoryName, user_id: UserID) -> Result<Category, Error> {
        let connection = self.connection.lock().map_err(|_| Error::DatabaseLockError)?;

        connection.execute(
            "INSERT INTO category (name, user_id) VALUES (?1, ?2)",
            (name.as_ref(), user_id.as_i64()),
        )?;

        let id = connection.last_insert_rowid();

        Ok(Category::new(id, name, user_id))
    }

    /// Get the category with `category_id` owned by `user_id`.
    ///
    /// # Errors
    ///
    /// Returns [Error::NotFound] if the category does not exist or belongs to
    /// a different user.
    fn get(&self, category_id: DatabaseID, user_id: UserID) -> Result<Category, Error> {
        self.connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?
            .prepare("SELECT id, name, user_id FROM category WHERE id = :id AND user_id = :user_id")?
            .query_row(
                named_params! {":id": category_id, ":user_id": user_id.as_i64()},
                SQLiteCategoryStore::map_row,
            )
            .map_err(|e| e.into())
    }

    /// Get the category named `name` owned by `user_id`.
    ///
    /// # Errors
    ///
    /// Returns [Error::NotFound] if the user has no category with this name.
    fn get_by_name(&self, name: &CategoryName, user_id: UserID) -> Result<Category, Error> {
        self.connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?
            .prepare(
                "SELECT id, name, user_id FROM category WHERE name = :name AND user_id = :user_id",
            )?
            .query_row(
                named_params! {":name": name.as_ref(), ":user_id": user_id.as_i64()},
                SQLiteCategoryStore::map_row,
            )
            .map_err(|e| e.into())
    }

    /// Get a page of the categories owned by `user_id`.
    ///
    /// # Errors
    ///
    /// Returns [Error::SqlError] if an SQL related error occurred.
    fn get_by_user(
        &self,
        user_id: UserID,
        pagination: &Pagination,
    ) -> Result<Vec<Category>, Error> {
        self.connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?
            .prepare(
                "SELECT id, name, user_id FROM category WHERE user_id = :user_id
                    ORDER BY id LIMIT :limit OFFSET :skip",
            )?
            .query_map(
                named_params! {
                    ":user_id": user_id.as_i64(),
                    ":limit": pagination.limit,
                    ":skip": pagination.skip,
                },
                SQLiteCategoryStore::map_row,
            )?
            .map(|maybe_category| maybe_category.map_err(|error| error.into()))
            .collect()
    }
}

impl CreateTable for SQLiteCategoryStore {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS category (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                user_id INTEGER NOT NULL,
                FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE,
                UNIQUE(user_id, name)
                )",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for SQLiteCategoryStore {
    type ReturnType = Category;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        let id = row.get(offset)?;

        let raw_name: String = row.get(offset + 1)?;
        let name = CategoryName::new_unchecked(&raw_name);

        let raw_user_id = row.get(offset + 2)?;
        let user_id = UserID::new(raw_user_id);

        Ok(Category::new(id, name, user_id))
    }
}
