//! Transaction management for the ledger.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and the validated inputs for creating and updating it
//! - Validation of JSON request bodies
//! - Route handlers for the transaction endpoints

mod core;
mod create_endpoint;
mod delete_endpoint;
mod edit_endpoint;
mod list_endpoint;
mod payload;

pub use core::{
    CategoryPolicy, FIXED_CATEGORIES, NewTransaction, TRANSACTION_COLUMNS, Transaction,
    TransactionPatch, TransactionType, create_transaction_table, from_unix_millis,
    map_transaction_row, to_unix_millis, truncate_to_millis,
};
pub use create_endpoint::create_transaction_endpoint;
pub use delete_endpoint::delete_transaction_endpoint;
pub use edit_endpoint::edit_transaction_endpoint;
pub use list_endpoint::{
    get_transaction_endpoint, get_transactions_by_date_endpoint, get_transactions_endpoint,
};
pub use payload::{TransactionPayload, ValidationContext};
