//! Contains the store trait and implementations for persisting [transactions](crate::transaction::Transaction).

mod transaction;

pub mod sqlite;

pub use sqlite::SQLiteTransactionStore;
pub use transaction::{SortOrder, TransactionQuery, TransactionStore};
