//! Defines the transaction store trait.

use std::ops::RangeInclusive;

use time::Date;

use crate::{
    Error,
    models::{DatabaseID, FinancialSummary, NewTransaction, Transaction, TransactionUpdate, UserID},
    pagination::Pagination,
};

/// Handles the creation, retrieval, and aggregation of transactions.
pub trait TransactionStore {
    /// Create a new transaction owned by `user_id`.
    ///
    /// When the payload has no date, the transaction is dated today (UTC).
    ///
    /// The caller is responsible for checking that `new_transaction.category_id`,
    /// if present, refers to a category owned by `user_id`.
    fn create(&self, new_transaction: NewTransaction, user_id: UserID)
    -> Result<Transaction, Error>;

    /// Retrieve a transaction owned by `user_id`.
    ///
    /// Returns [Error::NotFound] if the transaction does not exist or belongs
    /// to a different user.
    fn get(&self, id: DatabaseID, user_id: UserID) -> Result<Transaction, Error>;

    /// Get a page of the transactions owned by `user_id`, ordered by date
    /// descending (newest first).
    fn get_by_user(
        &self,
        user_id: UserID,
        pagination: &Pagination,
    ) -> Result<Vec<Transaction>, Error>;

    /// Apply the fields present in `update` to the transaction `id` owned by
    /// `user_id`, leaving absent fields unchanged.
    ///
    /// Returns [Error::NotFound] if the transaction does not exist or belongs
    /// to a different user.
    fn update(
        &self,
        id: DatabaseID,
        update: TransactionUpdate,
        user_id: UserID,
    ) -> Result<Transaction, Error>;

    /// Hard delete the transaction `id` owned by `user_id`.
    ///
    /// Returns [Error::NotFound] if the transaction does not exist or belongs
    /// to a different user.
    fn delete(&self, id: DatabaseID, user_id: UserID) -> Result<(), Error>;

    /// Sum the income and expense amounts of the transactions owned by
    /// `user_id`, optionally restricted to dates within `date_range`
    /// (inclusive on both ends).
    ///
    /// Sums with no matching transactions are 0.0 rather than absent.
    fn summarize(
        &self,
        user_id: UserID,
        date_range: Option<RangeInclusive<Date>>,
    ) -> Result<FinancialSummary, Error>;
}
