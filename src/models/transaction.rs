//! This file defines the type `Transaction`, the core type of the finance
//! tracking part of the application, along with the payload types for creating
//! and updating transactions.

use std::{fmt::Display, str::FromStr};

use rusqlite::{
    ToSql,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error,
    models::{DatabaseID, UserID},
};

/// Whether a transaction adds to or subtracts from a user's balance.
///
/// The type alone decides which dashboard total a transaction contributes to.
/// The amount is a signed number but its sign is not constrained by the type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money earned, e.g. wages.
    Income,
    /// Money spent, e.g. groceries.
    Expense,
}

impl TransactionType {
    /// The string stored in the database for this transaction type.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            other => Err(Error::InvalidTransactionType(other.to_string())),
        }
    }
}

impl ToSql for TransactionType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TransactionType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()
            .and_then(|text| text.parse().map_err(|_| FromSqlError::InvalidType))
    }
}

/// An expense or income, i.e. an event where money was either spent or earned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    id: DatabaseID,
    amount: f64,
    #[serde(rename = "type")]
    kind: TransactionType,
    date: Date,
    description: Option<String>,
    category_id: Option<DatabaseID>,
    user_id: UserID,
}

impl Transaction {
    /// Create a new transaction.
    pub fn new(
        id: DatabaseID,
        amount: f64,
        kind: TransactionType,
        date: Date,
        description: Option<String>,
        category_id: Option<DatabaseID>,
        user_id: UserID,
    ) -> Self {
        Self {
            id,
            amount,
            kind,
            date,
            description,
            category_id,
            user_id,
        }
    }

    /// The ID of the transaction.
    pub fn id(&self) -> DatabaseID {
        self.id
    }

    /// The amount of money spent or earned in this transaction.
    pub fn amount(&self) -> f64 {
        self.amount
    }

    /// Whether this transaction is an income or an expense.
    pub fn kind(&self) -> TransactionType {
        self.kind
    }

    /// When the transaction happened.
    pub fn date(&self) -> &Date {
        &self.date
    }

    /// A text description of what the transaction was for.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// A user-defined category that describes the type of the transaction.
    pub fn category_id(&self) -> Option<DatabaseID> {
        self.category_id
    }

    /// The ID of the user that created this transaction.
    pub fn user_id(&self) -> UserID {
        self.user_id
    }
}

/// The payload for creating a transaction.
///
/// The owner is never part of the payload: it is taken from the caller's
/// bearer token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTransaction {
    /// The amount of money spent or earned.
    pub amount: f64,
    /// Whether the transaction is an income or an expense.
    #[serde(rename = "type")]
    pub kind: TransactionType,
    /// An optional text description of the transaction.
    #[serde(default)]
    pub description: Option<String>,
    /// An optional category owned by the caller.
    #[serde(default)]
    pub category_id: Option<DatabaseID>,
    /// When the transaction happened. Defaults to today (UTC) when omitted.
    #[serde(default)]
    pub date: Option<Date>,
}

/// The payload for partially updating a transaction.
///
/// Fields that are absent from the payload are left unchanged. For the
/// nullable fields an explicit JSON `null` is distinct from an absent field:
/// the outer `Option` tracks presence in the payload and the inner `Option`
/// the new value, so `"category_id": null` clears the category.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionUpdate {
    /// The new amount, if present.
    #[serde(default)]
    pub amount: Option<f64>,
    /// The new transaction type, if present.
    #[serde(rename = "type", default)]
    pub kind: Option<TransactionType>,
    /// The new description, if present. `Some(None)` clears the description.
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    /// The new category, if present. Must be owned by the caller.
    /// `Some(None)` clears the category.
    #[serde(default, deserialize_with = "double_option")]
    pub category_id: Option<Option<DatabaseID>>,
    /// The new date, if present.
    #[serde(default)]
    pub date: Option<Date>,
}

/// Deserialize a field so that an explicit JSON `null` becomes `Some(None)`
/// while an absent field stays `None` (via `#[serde(default)]`).
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: serde::Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod transaction_type_tests {
    use serde_json::json;

    use crate::{Error, models::TransactionType};

    #[test]
    fn serializes_to_lowercase() {
        assert_eq!(
            serde_json::to_value(TransactionType::Income).unwrap(),
            json!("income")
        );
        assert_eq!(
            serde_json::to_value(TransactionType::Expense).unwrap(),
            json!("expense")
        );
    }

    #[test]
    fn parses_from_stored_string() {
        assert_eq!("income".parse(), Ok(TransactionType::Income));
        assert_eq!("expense".parse(), Ok(TransactionType::Expense));
    }

    #[test]
    fn parse_fails_on_unknown_string() {
        let result: Result<TransactionType, Error> = "transfer".parse();

        assert_eq!(
            result,
            Err(Error::InvalidTransactionType("transfer".to_string()))
        );
    }
}
