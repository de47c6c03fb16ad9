//! Implements a SQLite backed transaction store.
use std::{
    path::Path,
    sync::{Arc, Mutex, MutexGuard},
};

use rusqlite::{Connection, params, params_from_iter, types::Value};
use time::OffsetDateTime;

use crate::{
    Error,
    database_id::TransactionId,
    db::initialize,
    stores::{SortOrder, TransactionQuery, TransactionStore},
    transaction::{
        NewTransaction, TRANSACTION_COLUMNS, Transaction, TransactionPatch, map_transaction_row,
        to_unix_millis, truncate_to_millis,
    },
};

/// Stores transactions in a SQLite database.
///
/// Cloning the store is cheap: all clones share the same connection. The
/// connection is locked for the duration of each statement, so every operation
/// is atomic for the single record it touches.
#[derive(Debug, Clone)]
pub struct SQLiteTransactionStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteTransactionStore {
    /// Open the SQLite database at `path`, creating the file and the schema if needed.
    ///
    /// # Errors
    /// Returns an [Error::SqlError] if the database cannot be opened or initialized.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        Self::from_connection(Connection::open(path)?)
    }

    /// Open a new, empty in-memory database.
    ///
    /// # Errors
    /// Returns an [Error::SqlError] if the database cannot be opened or initialized.
    pub fn open_in_memory() -> Result<Self, Error> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    /// Create a new store for the SQLite `connection`, creating the schema if needed.
    ///
    /// # Errors
    /// Returns an [Error::SqlError] if the schema cannot be created.
    pub fn from_connection(connection: Connection) -> Result<Self, Error> {
        initialize(&connection)?;

        Ok(Self {
            connection: Arc::new(Mutex::new(connection)),
        })
    }

    /// Close the database connection.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::StoreInUse] if other clones of this store are still alive,
    /// - [Error::DatabaseLockError] if the lock was poisoned,
    /// - or [Error::SqlError] if SQLite could not close the connection.
    pub fn close(self) -> Result<(), Error> {
        let connection = Arc::try_unwrap(self.connection)
            .map_err(|_| Error::StoreInUse)?
            .into_inner()
            .map_err(|_| Error::DatabaseLockError)?;

        connection
            .close()
            .map_err(|(_, error)| Error::SqlError(error))
    }

    fn connection(&self) -> Result<MutexGuard<'_, Connection>, Error> {
        self.connection.lock().map_err(|error| {
            tracing::error!("Could not acquire database lock: {error}");
            Error::DatabaseLockError
        })
    }
}

fn now() -> OffsetDateTime {
    truncate_to_millis(OffsetDateTime::now_utc())
}

impl TransactionStore for SQLiteTransactionStore {
    /// Create a new transaction in the database.
    ///
    /// # Errors
    /// This function will return a [Error::SqlError] if there is some SQL error.
    fn create(&self, transaction: NewTransaction) -> Result<Transaction, Error> {
        let now = to_unix_millis(now());

        let transaction = self
            .connection()?
            .prepare(&format!(
                "INSERT INTO \"transaction\" (title, amount, category, type, date, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
                 RETURNING {TRANSACTION_COLUMNS}"
            ))?
            .query_row(
                params![
                    transaction.title,
                    transaction.amount,
                    transaction.category,
                    transaction.kind,
                    to_unix_millis(transaction.date),
                    now,
                ],
                map_transaction_row,
            )?;

        Ok(transaction)
    }

    /// Retrieve a transaction in the database by its `id`.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if `id` does not refer to a valid transaction,
    /// - or [Error::SqlError] there is some other SQL error.
    fn get(&self, id: TransactionId) -> Result<Transaction, Error> {
        let transaction = self
            .connection()?
            .prepare(&format!(
                "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\" WHERE id = :id"
            ))?
            .query_row(&[(":id", &id)], map_transaction_row)?;

        Ok(transaction)
    }

    /// Query for transactions in the database.
    ///
    /// # Errors
    /// This function will return a [Error::SqlError] there is a SQL error.
    fn get_query(&self, filter: TransactionQuery) -> Result<Vec<Transaction>, Error> {
        let mut query_string_parts = vec![format!(
            "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\""
        )];
        let mut query_parameters = vec![];

        if let Some(date_range) = filter.date_range {
            query_string_parts.push("WHERE date BETWEEN ?1 AND ?2".to_string());
            query_parameters.push(Value::Integer(to_unix_millis(*date_range.start())));
            query_parameters.push(Value::Integer(to_unix_millis(*date_range.end())));
        }

        match filter.sort_date {
            Some(SortOrder::Ascending) => {
                query_string_parts.push("ORDER BY date ASC, id ASC".to_string())
            }
            Some(SortOrder::Descending) => {
                query_string_parts.push("ORDER BY date DESC, id DESC".to_string())
            }
            None => {}
        }

        let query_string = query_string_parts.join(" ");
        let params = params_from_iter(query_parameters.iter());

        self.connection()?
            .prepare(&query_string)?
            .query_map(params, map_transaction_row)?
            .map(|maybe_transaction| maybe_transaction.map_err(Error::from))
            .collect()
    }

    /// Update the fields of a transaction that are set in `patch`.
    ///
    /// The update is a single statement, so a concurrent delete either happens
    /// before it (and the update fails with [Error::NotFound]) or after it.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if `id` does not refer to a valid transaction,
    /// - or [Error::SqlError] there is some other SQL error.
    fn update(&self, id: TransactionId, patch: TransactionPatch) -> Result<Transaction, Error> {
        let transaction = self
            .connection()?
            .prepare(&format!(
                "UPDATE \"transaction\"
                 SET title = COALESCE(?1, title),
                     amount = COALESCE(?2, amount),
                     category = COALESCE(?3, category),
                     type = COALESCE(?4, type),
                     date = COALESCE(?5, date),
                     updated_at = ?6
                 WHERE id = ?7
                 RETURNING {TRANSACTION_COLUMNS}"
            ))?
            .query_row(
                params![
                    patch.title,
                    patch.amount,
                    patch.category,
                    patch.kind,
                    patch.date.map(to_unix_millis),
                    to_unix_millis(now()),
                    id,
                ],
                map_transaction_row,
            )?;

        Ok(transaction)
    }

    /// Delete a transaction by its `id`.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if `id` does not refer to a valid transaction,
    /// - or [Error::SqlError] there is some other SQL error.
    fn delete(&self, id: TransactionId) -> Result<(), Error> {
        let rows_affected = self
            .connection()?
            .execute("DELETE FROM \"transaction\" WHERE id = :id", &[(":id", &id)])?;

        match rows_affected {
            0 => Err(Error::NotFound),
            _ => Ok(()),
        }
    }
}
