//! This module defines the domain data types.

pub use category::{Category, CategoryName};
pub use password::PasswordHash;
pub use summary::FinancialSummary;
pub use transaction::{NewTransaction, Transaction, TransactionType, TransactionUpdate};
pub use user::{User, UserID, UserProfile};

mod category;
mod password;
mod summary;
mod transaction;
mod user;

/// Alias for the integer type used for mapping to database IDs.
pub type DatabaseID = i64;
