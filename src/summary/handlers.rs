//! Route handlers for the global and daily summaries.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::{
    Error,
    app_state::SummaryState,
    stores::{TransactionQuery, TransactionStore},
    summary::{DailySummary, Summary},
    timezone::parse_iso_date,
};

/// A route handler for the totals over every transaction in the store.
pub async fn get_summary<S>(State(state): State<SummaryState<S>>) -> Result<Json<Summary>, Error>
where
    S: TransactionStore,
{
    let transactions = state.store.get_query(TransactionQuery::default())?;

    Ok(Json(Summary::from_transactions(&transactions)))
}

/// A route handler for the totals over the transactions on one calendar day.
///
/// Responds with a validation error if `date` is not a `YYYY-MM-DD` date.
pub async fn get_daily_summary<S>(
    State(state): State<SummaryState<S>>,
    Path(date): Path<String>,
) -> Result<Json<DailySummary>, Error>
where
    S: TransactionStore,
{
    let date = parse_iso_date(&date)?;
    let transactions = state.store.list_by_date(date, &state.local_timezone)?;

    Ok(Json(DailySummary::new(date, &transactions)))
}
