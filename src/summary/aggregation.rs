//! Reduces transactions into income, expense and balance totals.

use serde::{Deserialize, Serialize};
use time::Date;

use crate::transaction::{Transaction, TransactionType};

/// The totals of a set of transactions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    /// The sum of the amounts of income transactions.
    pub total_income: f64,
    /// The sum of the amounts of expense transactions.
    pub total_expense: f64,
    /// Total income minus total expense.
    pub balance: f64,
}

impl Summary {
    /// Sum the income and expense amounts in `transactions`.
    pub fn from_transactions<'a>(transactions: impl IntoIterator<Item = &'a Transaction>) -> Self {
        let (total_income, total_expense) = transactions.into_iter().fold(
            (0.0, 0.0),
            |(income, expense), transaction| match transaction.kind {
                TransactionType::Income => (income + transaction.amount, expense),
                TransactionType::Expense => (income, expense + transaction.amount),
            },
        );

        Self {
            total_income,
            total_expense,
            balance: total_income - total_expense,
        }
    }
}

/// The totals of the transactions on a single calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySummary {
    /// The totals for the day.
    #[serde(flatten)]
    pub summary: Summary,
    /// The day that was summarised.
    pub date: Date,
}

impl DailySummary {
    /// Sum the transactions that happened on `date`.
    ///
    /// The caller is responsible for passing only the transactions from `date`.
    pub fn new<'a>(date: Date, transactions: impl IntoIterator<Item = &'a Transaction>) -> Self {
        Self {
            summary: Summary::from_transactions(transactions),
            date,
        }
    }
}
