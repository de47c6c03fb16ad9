//! Route handlers for reading transactions.

use axum::{
    Json,
    extract::{Path, State, rejection::PathRejection},
};

use crate::{
    Error,
    app_state::TransactionState,
    database_id::TransactionId,
    stores::TransactionStore,
    timezone::parse_iso_date,
    transaction::Transaction,
};

/// A route handler for listing every transaction, most recent first.
pub async fn get_transactions_endpoint<S>(
    State(state): State<TransactionState<S>>,
) -> Result<Json<Vec<Transaction>>, Error>
where
    S: TransactionStore,
{
    state.store.list().map(Json)
}

/// A route handler for listing the transactions on one calendar day, most recent first.
///
/// Responds with a validation error if `date` is not a `YYYY-MM-DD` date.
pub async fn get_transactions_by_date_endpoint<S>(
    State(state): State<TransactionState<S>>,
    Path(date): Path<String>,
) -> Result<Json<Vec<Transaction>>, Error>
where
    S: TransactionStore,
{
    let date = parse_iso_date(&date)?;

    state
        .store
        .list_by_date(date, &state.local_timezone)
        .map(Json)
}

/// A route handler for getting a single transaction by its ID.
///
/// An ID that is not an integer cannot refer to a transaction, so it is
/// answered with not found rather than a bad request.
pub async fn get_transaction_endpoint<S>(
    State(state): State<TransactionState<S>>,
    transaction_id: Result<Path<TransactionId>, PathRejection>,
) -> Result<Json<Transaction>, Error>
where
    S: TransactionStore,
{
    let Path(transaction_id) = transaction_id.map_err(|_| Error::NotFound)?;

    state.store.get(transaction_id).map(Json)
}
