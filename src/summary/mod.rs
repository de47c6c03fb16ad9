//! Income, expense and balance totals over sets of transactions.
//!
//! This module contains:
//! - The pure aggregation from transactions to a [Summary]
//! - Route handlers for the global and daily summaries

mod aggregation;
mod handlers;

pub use aggregation::{DailySummary, Summary};
pub use handlers::{get_daily_summary, get_summary};
