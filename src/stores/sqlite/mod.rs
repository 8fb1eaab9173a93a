//! SQLite-backed implementations of the store traits.
//!
//! All stores share a single [rusqlite::Connection] behind a mutex; the
//! connection is created and the schema initialized by
//! [AppState::new](crate::AppState::new).

mod category;
mod transaction;
mod user;

pub use category::SQLiteCategoryStore;
pub use transaction::SQLiteTransactionStore;
pub use user::SQLiteUserStore;
