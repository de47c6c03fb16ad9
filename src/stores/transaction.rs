//! Defines the transaction store trait.

use std::ops::RangeInclusive;

use time::{Date, OffsetDateTime};

use crate::{
    Error,
    database_id::TransactionId,
    timezone::LocalTimezone,
    transaction::{NewTransaction, Transaction, TransactionPatch},
};

/// Handles the creation, retrieval, modification and removal of transactions.
///
/// Implementers are cheap to clone handles to a shared collection, so that a
/// copy can be handed to each request handler.
pub trait TransactionStore: Clone + Send + Sync + 'static {
    /// Record a new transaction, assigning it an ID and timestamps.
    fn create(&self, transaction: NewTransaction) -> Result<Transaction, Error>;

    /// Retrieve a transaction from the store.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if there is no transaction with `id`.
    fn get(&self, id: TransactionId) -> Result<Transaction, Error>;

    /// Retrieve transactions from the store in the way defined by `query`.
    fn get_query(&self, query: TransactionQuery) -> Result<Vec<Transaction>, Error>;

    /// Overwrite the fields of the transaction `id` that are set in `patch`.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if there is no transaction with `id`.
    fn update(&self, id: TransactionId, patch: TransactionPatch) -> Result<Transaction, Error>;

    /// Remove the transaction `id`.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if there is no transaction with `id`.
    fn delete(&self, id: TransactionId) -> Result<(), Error>;

    /// All transactions, most recent first.
    fn list(&self) -> Result<Vec<Transaction>, Error> {
        self.get_query(TransactionQuery {
            date_range: None,
            sort_date: Some(SortOrder::Descending),
        })
    }

    /// The transactions dated on the calendar day `date` in `local_timezone`,
    /// most recent first.
    fn list_by_date(
        &self,
        date: Date,
        local_timezone: &LocalTimezone,
    ) -> Result<Vec<Transaction>, Error> {
        self.get_query(TransactionQuery {
            date_range: Some(local_timezone.day_bounds(date)),
            sort_date: Some(SortOrder::Descending),
        })
    }
}

/// Defines how transactions should be fetched from [TransactionStore::get_query].
#[derive(Debug, Clone, Default)]
pub struct TransactionQuery {
    /// Include transactions within `date_range` (inclusive).
    pub date_range: Option<RangeInclusive<OffsetDateTime>>,
    /// Orders transactions by date in the order `sort_date`. None returns transactions in the
    /// order they are stored.
    pub sort_date: Option<SortOrder>,
}

/// The order to sort transactions in a [TransactionQuery].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Sort in order of increasing value.
    Ascending,
    /// Sort in order of decreasing value.
    Descending,
}
