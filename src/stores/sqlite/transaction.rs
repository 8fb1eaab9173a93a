//! Implements a SQLite backed transaction store, including the dashboard
//! summary aggregation.

use std::{
    ops::RangeInclusive,
    sync::{Arc, Mutex},
};

use rusqlite::{Connection, Row, named_params};
use time::{Date, OffsetDateTime};

use crate::{
    Error,
    db::{CreateTable, MapRow},
    models::{
        DatabaseID, FinancialSummary, NewTransaction, Transaction, TransactionType,
        TransactionUpdate, UserID,
    },
    pagination::Pagination,
    stores::TransactionStore,
};

/// Handles the creation, retrieval, and aggregation of transactions.
#[derive(Debug, Clone)]
pub struct SQLiteTransactionStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteTransactionStore {
    /// Create a new transaction store.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

const SELECT_COLUMNS: &str = "id, amount, kind, date, description, category_id, user_id";

impl TransactionStore for SQLiteTransactionStore {
    /// Create and insert a new transaction into the database.
    ///
    /// When `new_transaction.date` is `None` the transaction is dated today
    /// (UTC).
    ///
    /// # Errors
    ///
    /// Returns [Error::SqlError] if an SQL related error occurred.
    fn create(
        &self,
        new_transaction: NewTransaction,
        user_id: UserID,
    ) -> Result<Transaction, Error> {
        let date = new_transaction
            .date
            .unwrap_or_else(|| OffsetDateTime::now_utc().date());

        let connection = self.connection.lock().map_err(|_| Error::DatabaseLockError)?;

        connection.execute(
            "INSERT INTO \"transaction\" (amount, kind, date, description, category_id, user_id)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            (
                new_transaction.amount,
                new_transaction.kind,
                date,
                &new_transaction.description,
                new_transaction.category_id,
                user_id.as_i64(),
            ),
        )?;

        let id = connection.last_insert_rowid();

        Ok(Transaction::new(
            id,
            new_transaction.amount,
            new_transaction.kind,
            date,
            new_transaction.description,
            new_transaction.category_id,
            user_id,
        ))
    }

    /// Get the transaction with `id` owned by `user_id`.
    ///
    /// # Errors
    ///
    /// Returns [Error::NotFound] if the transaction does not exist or belongs
    /// to a different user.
    fn get(&self, id: DatabaseID, user_id: UserID) -> Result<Transaction, Error> {
        self.connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?
            .prepare(&format!(
                "SELECT {SELECT_COLUMNS} FROM \"transaction\" WHERE id = :id AND user_id = :user_id"
            ))?
            .query_row(
                named_params! {":id": id, ":user_id": user_id.as_i64()},
                SQLiteTransactionStore::map_row,
            )
            .map_err(|e| e.into())
    }

    /// Get a page of the transactions owned by `user_id`, newest date first.
    ///
    /// # Errors
    ///
    /// Returns [Error::SqlError] if an SQL related error occurred.
    fn get_by_user(
        &self,
        user_id: UserID,
        pagination: &Pagination,
    ) -> Result<Vec<Transaction>, Error> {
        self.connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?
            .prepare(&format!(
                "SELECT {SELECT_COLUMNS} FROM \"transaction\" WHERE user_id = :user_id
                    ORDER BY date DESC, id DESC LIMIT :limit OFFSET :skip"
            ))?
            .query_map(
                named_params! {
                    ":user_id": user_id.as_i64(),
                    ":limit": pagination.limit,
                    ":skip": pagination.skip,
                },
                SQLiteTransactionStore::map_row,
            )?
            .map(|maybe_transaction| maybe_transaction.map_err(|error| error.into()))
            .collect()
    }

    /// Apply the fields present in `update`, leaving absent fields unchanged.
    ///
    /// The nullable fields carry their presence in the outer `Option`, so a
    /// present `None` clears the stored value instead of keeping it.
    ///
    /// # Errors
    ///
    /// Returns [Error::NotFound] if the transaction does not exist or belongs
    /// to a different user.
    fn update(
        &self,
        id: DatabaseID,
        update: TransactionUpdate,
        user_id: UserID,
    ) -> Result<Transaction, Error> {
        {
            let set_description = update.description.is_some();
            let description = update.description.flatten();
            let set_category_id = update.category_id.is_some();
            let category_id = update.category_id.flatten();

            let connection = self.connection.lock().map_err(|_| Error::DatabaseLockError)?;

            let rows_changed = connection.execute(
                "UPDATE \"transaction\" SET
                    amount = COALESCE(:amount, amount),
                    kind = COALESCE(:kind, kind),
                    date = COALESCE(:date, date),
                    description = CASE WHEN :set_description THEN :description ELSE description END,
                    category_id = CASE WHEN :set_category_id THEN :category_id ELSE category_id END
                    WHERE id = :id AND user_id = :user_id",
                named_params! {
                    ":amount": update.amount,
                    ":kind": update.kind,
                    ":date": update.date,
                    ":set_description": set_description,
                    ":description": description,
                    ":set_category_id": set_category_id,
                    ":category_id": category_id,
                    ":id": id,
                    ":user_id": user_id.as_i64(),
                },
            )?;

            if rows_changed == 0 {
                return Err(Error::NotFound);
            }
        }

        self.get(id, user_id)
    }

    /// Hard delete the transaction with `id` owned by `user_id`.
    ///
    /// # Errors
    ///
    /// Returns [Error::NotFound] if the transaction does not exist or belongs
    /// to a different user.
    fn delete(&self, id: DatabaseID, user_id: UserID) -> Result<(), Error> {
        let rows_changed = self
            .connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?
            .execute(
                "DELETE FROM \"transaction\" WHERE id = :id AND user_id = :user_id",
                named_params! {":id": id, ":user_id": user_id.as_i64()},
            )?;

        if rows_changed == 0 {
            return Err(Error::NotFound);
        }

        Ok(())
    }

    /// Sum income and expense amounts for `user_id`, optionally restricted to
    /// a date range (inclusive on both ends).
    ///
    /// The transaction type decides which total an amount contributes to; the
    /// sign of the amount is not consulted.
    ///
    /// # Errors
    ///
    /// Returns [Error::SqlError] if an SQL related error occurred.
    fn summarize(
        &self,
        user_id: UserID,
        date_range: Option<RangeInclusive<Date>>,
    ) -> Result<FinancialSummary, Error> {
        let connection = self.connection.lock().map_err(|_| Error::DatabaseLockError)?;

        let map_totals = |row: &Row| {
            let total_income: f64 = row.get(0)?;
            let total_expense: f64 = row.get(1)?;

            Ok(FinancialSummary::new(total_income, total_expense))
        };

        let summary = match date_range {
            Some(range) => connection
                .prepare(
                    "SELECT
                        COALESCE(SUM(CASE WHEN kind = :income THEN amount ELSE 0 END), 0.0),
                        COALESCE(SUM(CASE WHEN kind = :expense THEN amount ELSE 0 END), 0.0)
                        FROM \"transaction\"
                        WHERE user_id = :user_id AND date BETWEEN :start_date AND :end_date",
                )?
                .query_row(
                    named_params! {
                        ":income": TransactionType::Income,
                        ":expense": TransactionType::Expense,
                        ":user_id": user_id.as_i64(),
                        ":start_date": range.start(),
                        ":end_date": range.end(),
                    },
                    map_totals,
                )?,
            None => connection
                .prepare(
                    "SELECT
                        COALESCE(SUM(CASE WHEN kind = :income THEN amount ELSE 0 END), 0.0),
                        COALESCE(SUM(CASE WHEN kind = :expense THEN amount ELSE 0 END), 0.0)
                        FROM \"transaction\"
                        WHERE user_id = :user_id",
                )?
                .query_row(
                    named_params! {
                        ":income": TransactionType::Income,
                        ":expense": TransactionType::Expense,
                        ":user_id": user_id.as_i64(),
                    },
                    map_totals,
                )?,
        };

        Ok(summary)
    }
}

impl CreateTable for SQLiteTransactionStore {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS \"transaction\" (
                    id INTEGER PRIMARY KEY,
                    amount REAL NOT NULL,
                    kind TEXT NOT NULL,
                    date TEXT NOT NULL,
                    description TEXT,
                    category_id INTEGER,
                    user_id INTEGER NOT NULL,
                    FOREIGN KEY(category_id) REFERENCES category(id) ON UPDATE CASCADE ON DELETE SET NULL,
                    FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
                    )",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for SQLiteTransactionStore {
    type ReturnType = Transaction;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        Ok(Transaction::new(
            row.get(offset)?,
            row.get(offset + 1)?,
            row.get(offset + 2)?,
            row.get(offset + 3)?,
            row.get(offset + 4)?,
            row.get(offset + 5)?,
            UserID::new(row.get(offset + 6)?),
        ))
    }
}
