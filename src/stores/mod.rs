//! Contains traits and implementations for objects that store the domain [models](crate::models).
//!
//! Every store operation that touches user-owned data takes the owner's
//! [UserID](crate::models::UserID) and injects it into the query, so rows
//! belonging to one user can never be read or written on behalf of another.

mod category;
mod transaction;
mod user;

pub mod sqlite;

pub use category::CategoryStore;
pub use transaction::TransactionStore;
pub use user::UserStore;
