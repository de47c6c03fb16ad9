//! Database ID type definition.

/// Alias for the integer type used for mapping to database IDs.
///
/// IDs are assigned by SQLite's `AUTOINCREMENT` and are never reused, even
/// after the row they belonged to has been deleted.
pub type TransactionId = i64;
