//! Implementations of the stores backed by SQLite.

mod transaction;

pub use transaction::SQLiteTransactionStore;
