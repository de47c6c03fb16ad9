//! Defines the core data models for transactions and how they map to database rows.

use std::{fmt, str::FromStr};

use rusqlite::{
    Connection, Row,
    types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::database_id::TransactionId;

// ============================================================================
// MODELS
// ============================================================================

/// An expense or income, i.e. an event where money was either spent or earned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// A short description of what the transaction was for.
    pub title: String,
    /// The amount of money spent or earned in this transaction.
    pub amount: f64,
    /// The category of the transaction, e.g. "Food", "Salary".
    pub category: String,
    /// Whether money was earned or spent.
    #[serde(rename = "type")]
    pub kind: TransactionType,
    /// When the transaction happened.
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
    /// When the transaction was recorded.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// When the transaction was last changed.
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Whether a transaction is money coming in or going out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money earned.
    Income,
    /// Money spent.
    Expense,
}

impl TransactionType {
    /// The name used in JSON and in the database.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = String;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        match text {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            other => Err(format!(
                "\"{other}\" is not a valid transaction type, expected \"income\" or \"expense\""
            )),
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
            .as_str()?
            .parse()
            .map_err(|error: String| FromSqlError::Other(error.into()))
    }
}

/// The validated fields needed to record a new transaction.
///
/// The ID and the created/updated timestamps are assigned by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    /// A short description of what the transaction was for.
    pub title: String,
    /// The amount of money spent or earned.
    pub amount: f64,
    /// The category of the transaction.
    pub category: String,
    /// Whether money was earned or spent.
    pub kind: TransactionType,
    /// When the transaction happened.
    pub date: OffsetDateTime,
}

impl NewTransaction {
    /// Create a new transaction dated `date`.
    ///
    /// Shortcut for filling in the struct when the fields are already known to be valid.
    pub fn new(
        title: &str,
        amount: f64,
        category: &str,
        kind: TransactionType,
        date: OffsetDateTime,
    ) -> Self {
        Self {
            title: title.to_owned(),
            amount,
            category: category.to_owned(),
            kind,
            date: truncate_to_millis(date),
        }
    }
}

/// A partial update to a transaction.
///
/// Fields set to `None` are left as they are.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionPatch {
    /// The new title.
    pub title: Option<String>,
    /// The new amount.
    pub amount: Option<f64>,
    /// The new category.
    pub category: Option<String>,
    /// The new transaction type.
    pub kind: Option<TransactionType>,
    /// The new date.
    pub date: Option<OffsetDateTime>,
}

/// The labels accepted when categories are restricted to a fixed set.
pub const FIXED_CATEGORIES: [&str; 8] = [
    "Food",
    "Outing",
    "Salary",
    "Travel",
    "Income Mom",
    "Shopping",
    "Mobile Recharge",
    "Expense",
];

/// Controls which category names are accepted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CategoryPolicy {
    /// Any non-empty category name.
    #[default]
    FreeForm,
    /// Only the names in [FIXED_CATEGORIES].
    Fixed,
}

impl CategoryPolicy {
    /// Whether `category` is allowed under this policy.
    ///
    /// `category` should already be trimmed.
    pub fn allows(self, category: &str) -> bool {
        match self {
            Self::FreeForm => !category.is_empty(),
            Self::Fixed => FIXED_CATEGORIES.contains(&category),
        }
    }
}

// ============================================================================
// TIMESTAMPS
// ============================================================================

/// Drop any precision finer than a millisecond, the resolution timestamps are stored at.
pub fn truncate_to_millis(date_time: OffsetDateTime) -> OffsetDateTime {
    let nanos = date_time.nanosecond();

    date_time
        .replace_nanosecond(nanos - nanos % 1_000_000)
        .unwrap_or(date_time)
}

/// The number of milliseconds between the Unix epoch and `date_time`.
pub fn to_unix_millis(date_time: OffsetDateTime) -> i64 {
    (date_time.unix_timestamp_nanos().div_euclid(1_000_000)) as i64
}

/// The UTC instant `millis` milliseconds after the Unix epoch.
pub fn from_unix_millis(millis: i64) -> Result<OffsetDateTime, time::error::ComponentRange> {
    OffsetDateTime::from_unix_timestamp_nanos(i128::from(millis) * 1_000_000)
}

fn get_timestamp(row: &Row, index: usize) -> Result<OffsetDateTime, rusqlite::Error> {
    let millis: i64 = row.get(index)?;

    from_unix_millis(millis).map_err(|error| {
        rusqlite::Error::FromSqlConversionFailure(
            index,
            rusqlite::types::Type::Integer,
            Box::new(error),
        )
    })
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// The columns selected by every transaction query, in the order [map_transaction_row] expects.
pub const TRANSACTION_COLUMNS: &str =
    "id, title, amount, category, type, date, created_at, updated_at";

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                amount REAL NOT NULL,
                category TEXT NOT NULL,
                type TEXT NOT NULL CHECK (type IN ('income', 'expense')),
                date INTEGER NOT NULL,
                created_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL
                )",
        (),
    )?;

    // Used by the date range queries.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_date ON \"transaction\"(date);",
        (),
    )?;

    Ok(())
}

/// Map a database row to a Transaction.
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    Ok(Transaction {
        id: row.get(0)?,
        title: row.get(1)?,
        amount: row.get(2)?,
        category: row.get(3)?,
        kind: row.get(4)?,
        date: get_timestamp(row, 5)?,
        created_at: get_timestamp(row, 6)?,
        updated_at: get_timestamp(row, 7)?,
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use time::macros::datetime;

    use crate::transaction::{
        CategoryPolicy, Transaction, TransactionType, from_unix_millis, to_unix_millis,
        truncate_to_millis,
    };

    #[test]
    fn transaction_serializes_with_camel_case_keys() {
        let transaction = Transaction {
            id: 1,
            title: "Coffee".to_owned(),
            amount: 5.0,
            category: "Food".to_owned(),
            kind: TransactionType::Expense,
            date: datetime!(2024-01-05 00:00:00 UTC),
            created_at: datetime!(2024-01-05 08:30:00.250 UTC),
            updated_at: datetime!(2024-01-05 08:30:00.250 UTC),
        };

        let value = serde_json::to_value(&transaction).unwrap();

        assert_eq!(
            value,
            json!({
                "id": 1,
                "title": "Coffee",
                "amount": 5.0,
                "category": "Food",
                "type": "expense",
                "date": "2024-01-05T00:00:00Z",
                "createdAt": "2024-01-05T08:30:00.25Z",
                "updatedAt": "2024-01-05T08:30:00.25Z",
            })
        );
    }

    #[test]
    fn parses_transaction_types() {
        assert_eq!("income".parse(), Ok(TransactionType::Income));
        assert_eq!("expense".parse(), Ok(TransactionType::Expense));
        assert!("Income".parse::<TransactionType>().is_err());
        assert!("refund".parse::<TransactionType>().is_err());
    }

    #[test]
    fn free_form_categories_allow_any_non_empty_name() {
        assert!(CategoryPolicy::FreeForm.allows("Groceries"));
        assert!(!CategoryPolicy::FreeForm.allows(""));
    }

    #[test]
    fn fixed_categories_only_allow_known_labels() {
        assert!(CategoryPolicy::Fixed.allows("Mobile Recharge"));
        assert!(!CategoryPolicy::Fixed.allows("Groceries"));
        assert!(!CategoryPolicy::Fixed.allows("food"));
    }

    #[test]
    fn millis_round_trip_before_and_after_epoch() {
        for date_time in [
            datetime!(2024-01-05 23:59:59.999 UTC),
            datetime!(1969-12-31 23:59:59.999 UTC),
        ] {
            assert_eq!(from_unix_millis(to_unix_millis(date_time)), Ok(date_time));
        }
    }

    #[test]
    fn truncates_sub_millisecond_precision() {
        let date_time = datetime!(2024-01-05 12:00:00.123_456_789 UTC);

        assert_eq!(
            truncate_to_millis(date_time),
            datetime!(2024-01-05 12:00:00.123 UTC)
        );
    }
}
