use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use time::OffsetDateTime;

use crate::{
    Error,
    app_state::TransactionState,
    stores::TransactionStore,
    transaction::{Transaction, TransactionPayload},
};

/// A route handler for creating a new transaction, responds with the stored transaction.
pub async fn create_transaction_endpoint<S>(
    State(state): State<TransactionState<S>>,
    payload: Result<Json<TransactionPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<Transaction>), Error>
where
    S: TransactionStore,
{
    let Json(payload) = payload?;
    let new_transaction =
        payload.into_new_transaction(state.validation, OffsetDateTime::now_utc())?;

    let transaction = state.store.create(new_transaction)?;
    tracing::debug!("Created transaction {}", transaction.id);

    Ok((StatusCode::CREATED, Json(transaction)))
}

#[cfg(test)]
mod tests {
    use axum::{Json, extract::State, http::StatusCode};
    use serde_json::json;
    use time::macros::datetime;

    use crate::{
        Error,
        app_state::TransactionState,
        stores::{SQLiteTransactionStore, TransactionStore},
        timezone::LocalTimezone,
        transaction::{TransactionType, ValidationContext},
    };

    use super::create_transaction_endpoint;

    fn get_test_state() -> TransactionState<SQLiteTransactionStore> {
        TransactionState {
            store: SQLiteTransactionStore::open_in_memory().unwrap(),
            local_timezone: LocalTimezone::utc(),
            validation: ValidationContext::default(),
        }
    }

    #[tokio::test]
    async fn creates_transaction() {
        let state = get_test_state();
        let payload = serde_json::from_value(json!({
            "title": "Coffee",
            "amount": 5,
            "category": "Food",
            "type": "expense",
            "date": "2024-01-05",
        }))
        .unwrap();

        let (status, Json(transaction)) =
            create_transaction_endpoint(State(state.clone()), Ok(Json(payload)))
                .await
                .expect("Could not create transaction");

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(transaction.title, "Coffee");
        assert_eq!(transaction.kind, TransactionType::Expense);
        assert_eq!(transaction.date, datetime!(2024-01-05 00:00:00 UTC));
        assert_eq!(state.store.get(transaction.id), Ok(transaction));
    }

    #[tokio::test]
    async fn invalid_transaction_is_not_stored() {
        let state = get_test_state();
        let payload = serde_json::from_value(json!({
            "title": "Coffee",
            "category": "Food",
            "type": "expense",
        }))
        .unwrap();

        let result = create_transaction_endpoint(State(state.clone()), Ok(Json(payload))).await;

        assert_eq!(
            result.map(|(status, _)| status),
            Err(Error::Validation("`amount` is required".to_owned()))
        );
        assert!(state.store.list().unwrap().is_empty());
    }
}
