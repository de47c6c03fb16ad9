use axum::{
    Json,
    extract::{Path, State, rejection::PathRejection},
};
use serde_json::{Value, json};

use crate::{
    Error, app_state::TransactionState, database_id::TransactionId, stores::TransactionStore,
};

/// A route handler for deleting a transaction, responds with a confirmation message.
pub async fn delete_transaction_endpoint<S>(
    State(state): State<TransactionState<S>>,
    transaction_id: Result<Path<TransactionId>, PathRejection>,
) -> Result<Json<Value>, Error>
where
    S: TransactionStore,
{
    let Path(transaction_id) = transaction_id.map_err(|_| Error::NotFound)?;
    state.store.delete(transaction_id)?;
    tracing::debug!("Deleted transaction {transaction_id}");

    Ok(Json(json!({ "message": "Transaction deleted" })))
}

#[cfg(test)]
mod tests {
    use axum::{
        Json,
        extract::{Path, State},
    };
    use serde_json::json;
    use time::macros::datetime;

    use crate::{
        Error,
        app_state::TransactionState,
        stores::{SQLiteTransactionStore, TransactionStore},
        timezone::LocalTimezone,
        transaction::{NewTransaction, TransactionType, ValidationContext},
    };

    use super::delete_transaction_endpoint;

    fn get_test_state() -> TransactionState<SQLiteTransactionStore> {
        TransactionState {
            store: SQLiteTransactionStore::open_in_memory().unwrap(),
            local_timezone: LocalTimezone::utc(),
            validation: ValidationContext::default(),
        }
    }

    #[tokio::test]
    async fn test_deletes_transaction() {
        let state = get_test_state();
        let transaction = state
            .store
            .create(NewTransaction::new(
                "Coffee",
                5.0,
                "Food",
                TransactionType::Expense,
                datetime!(2024-01-05 08:00:00 UTC),
            ))
            .unwrap();

        let Json(confirmation) =
            delete_transaction_endpoint(State(state.clone()), Ok(Path(transaction.id)))
                .await
                .expect("Could not delete transaction");

        assert_eq!(confirmation, json!({ "message": "Transaction deleted" }));
        assert_eq!(state.store.get(transaction.id), Err(Error::NotFound));
    }

    #[tokio::test]
    async fn delete_of_missing_transaction_is_not_found() {
        let state = get_test_state();

        let result = delete_transaction_endpoint(State(state), Ok(Path(1))).await;

        assert_eq!(result.map(|Json(value)| value), Err(Error::NotFound));
    }
}
