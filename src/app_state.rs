//! Implements a struct that holds the state of the REST server.

use axum::extract::FromRef;

use crate::{
    stores::TransactionStore,
    timezone::LocalTimezone,
    transaction::{CategoryPolicy, ValidationContext},
};

/// The state of the REST server.
#[derive(Debug, Clone)]
pub struct AppState<S>
where
    S: TransactionStore,
{
    /// The store for managing [transactions](crate::transaction::Transaction).
    pub store: S,
    /// The timezone used to work out which transactions fall on a calendar day.
    pub local_timezone: LocalTimezone,
    /// Which category names are accepted for new and updated transactions.
    pub category_policy: CategoryPolicy,
}

impl<S> AppState<S>
where
    S: TransactionStore,
{
    /// Create a new [AppState] around an already opened `store`.
    pub fn new(store: S, local_timezone: LocalTimezone, category_policy: CategoryPolicy) -> Self {
        Self {
            store,
            local_timezone,
            category_policy,
        }
    }

    /// The settings for validating transaction request bodies.
    pub fn validation_context(&self) -> ValidationContext {
        ValidationContext {
            category_policy: self.category_policy,
            local_timezone: self.local_timezone,
        }
    }
}

/// The state needed to validate and record transactions.
#[derive(Debug, Clone)]
pub struct TransactionState<S>
where
    S: TransactionStore,
{
    /// The store for managing [transactions](crate::transaction::Transaction).
    pub store: S,
    /// The timezone used to interpret calendar dates.
    pub local_timezone: LocalTimezone,
    /// The settings for validating request bodies.
    pub validation: ValidationContext,
}

impl<S> FromRef<AppState<S>> for TransactionState<S>
where
    S: TransactionStore,
{
    fn from_ref(state: &AppState<S>) -> Self {
        Self {
            store: state.store.clone(),
            local_timezone: state.local_timezone,
            validation: state.validation_context(),
        }
    }
}

/// The state needed for displaying summaries.
#[derive(Debug, Clone)]
pub struct SummaryState<S>
where
    S: TransactionStore,
{
    /// The store for reading [transactions](crate::transaction::Transaction).
    pub store: S,
    /// The timezone used to work out which transactions fall on a calendar day.
    pub local_timezone: LocalTimezone,
}

impl<S> FromRef<AppState<S>> for SummaryState<S>
where
    S: TransactionStore,
{
    fn from_ref(state: &AppState<S>) -> Self {
        Self {
            store: state.store.clone(),
            local_timezone: state.local_timezone,
        }
    }
}
