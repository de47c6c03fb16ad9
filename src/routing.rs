//! Application router configuration.

use axum::{
    Json, Router,
    http::{HeaderValue, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::get,
};
use serde_json::json;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::{
    AppState, Error, endpoints,
    logging::logging_middleware,
    stores::TransactionStore,
    summary::{get_daily_summary, get_summary},
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint, edit_transaction_endpoint,
        get_transaction_endpoint, get_transactions_by_date_endpoint, get_transactions_endpoint,
    },
};

/// Return a router with all the app's routes.
///
/// Every request and response passes through the logging middleware and `cors`.
pub fn build_router<S>(state: AppState<S>, cors: CorsLayer) -> Router
where
    S: TransactionStore,
{
    Router::new()
        .route(endpoints::HEALTH, get(get_health))
        .route(
            endpoints::TRANSACTIONS,
            get(get_transactions_endpoint::<S>).post(create_transaction_endpoint::<S>),
        )
        .route(
            endpoints::TRANSACTIONS_BY_DATE,
            get(get_transactions_by_date_endpoint::<S>),
        )
        .route(
            endpoints::TRANSACTION,
            get(get_transaction_endpoint::<S>)
                .put(edit_transaction_endpoint::<S>)
                .delete(delete_transaction_endpoint::<S>),
        )
        .route(endpoints::SUMMARY, get(get_summary::<S>))
        .route(endpoints::SUMMARY_BY_DATE, get(get_daily_summary::<S>))
        .fallback(get_404_not_found)
        .layer(middleware::from_fn(logging_middleware))
        .layer(cors)
        .with_state(state)
}

/// Build the CORS layer for the API.
///
/// With no `allowed_origin` any origin may call the API, otherwise only
/// `allowed_origin` may.
///
/// # Errors
///
/// Returns [Error::InvalidOrigin] if `allowed_origin` cannot be used as a header value.
pub fn cors_layer(allowed_origin: Option<&str>) -> Result<CorsLayer, Error> {
    let allow_origin = match allowed_origin {
        None => AllowOrigin::from(Any),
        Some(origin) => HeaderValue::from_str(origin)
            .map(AllowOrigin::exact)
            .map_err(|_| Error::InvalidOrigin(origin.to_owned()))?,
    };

    Ok(CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any))
}

async fn get_health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn get_404_not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "message": "Route not found" })),
    )
        .into_response()
}

#[cfg(test)]
mod cors_tests {
    use crate::Error;

    use super::cors_layer;

    #[test]
    fn accepts_missing_origin() {
        assert!(cors_layer(None).is_ok());
    }

    #[test]
    fn accepts_valid_origin() {
        assert!(cors_layer(Some("http://localhost:3000")).is_ok());
    }

    #[test]
    fn rejects_origin_with_invalid_characters() {
        let result = cors_layer(Some("http://local\nhost"));

        assert!(matches!(result, Err(Error::InvalidOrigin(_))));
    }
}
