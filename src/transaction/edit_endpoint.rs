use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
};

use crate::{
    Error,
    app_state::TransactionState,
    database_id::TransactionId,
    stores::TransactionStore,
    transaction::{Transaction, TransactionPayload},
};

/// A route handler for updating some or all of the fields of a transaction.
///
/// Fields missing from the body keep their current values.
pub async fn edit_transaction_endpoint<S>(
    State(state): State<TransactionState<S>>,
    transaction_id: Result<Path<TransactionId>, PathRejection>,
    payload: Result<Json<TransactionPayload>, JsonRejection>,
) -> Result<Json<Transaction>, Error>
where
    S: TransactionStore,
{
    let Path(transaction_id) = transaction_id.map_err(|_| Error::NotFound)?;
    let Json(payload) = payload?;
    let patch = payload.into_patch(state.validation)?;

    let transaction = state.store.update(transaction_id, patch)?;
    tracing::debug!("Updated transaction {transaction_id}");

    Ok(Json(transaction))
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
        transaction::{NewTransaction, TransactionPayload, TransactionType, ValidationContext},
    };

    use super::edit_transaction_endpoint;

    fn get_test_state() -> TransactionState<SQLiteTransactionStore> {
        TransactionState {
            store: SQLiteTransactionStore::open_in_memory().unwrap(),
            local_timezone: LocalTimezone::utc(),
            validation: ValidationContext::default(),
        }
    }

    fn payload(body: serde_json::Value) -> TransactionPayload {
        serde_json::from_value(body).unwrap()
    }

    #[tokio::test]
    async fn can_update_transaction() {
        let state = get_test_state();
        let original = state
            .store
            .create(NewTransaction::new(
                "Coffee",
                5.0,
                "Food",
                TransactionType::Expense,
                datetime!(2024-01-05 08:00:00 UTC),
            ))
            .unwrap();

        let Json(updated) = edit_transaction_endpoint(
            State(state.clone()),
            Ok(Path(original.id)),
            Ok(Json(payload(json!({ "amount": 6, "category": "Outing" })))),
        )
        .await
        .expect("Could not update transaction");

        assert_eq!(updated.amount, 6.0);
        assert_eq!(updated.category, "Outing");
        assert_eq!(updated.title, original.title);
        assert_eq!(updated.date, original.date);
        assert_eq!(state.store.get(original.id), Ok(updated));
    }

    #[tokio::test]
    async fn update_of_missing_transaction_is_not_found() {
        let state = get_test_state();

        let result = edit_transaction_endpoint(
            State(state),
            Ok(Path(99)),
            Ok(Json(payload(json!({ "amount": 6 })))),
        )
        .await;

        assert_eq!(result.map(|Json(transaction)| transaction), Err(Error::NotFound));
    }
}
