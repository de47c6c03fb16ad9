//! Request bodies for creating and updating transactions, and their validation.

use serde::Deserialize;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

use crate::{
    Error,
    timezone::{LocalTimezone, parse_iso_date},
    transaction::{
        CategoryPolicy, NewTransaction, TransactionPatch, TransactionType, from_unix_millis,
        truncate_to_millis,
    },
};

/// The JSON body sent to create or update a transaction.
///
/// Every field is optional here. [TransactionPayload::into_new_transaction]
/// checks that the fields required for a new transaction are present, while
/// [TransactionPayload::into_patch] only validates the fields that were sent.
#[derive(Debug, Default, Deserialize)]
pub struct TransactionPayload {
    title: Option<String>,
    amount: Option<AmountInput>,
    category: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    date: Option<DateInput>,
}

/// Amounts may be sent as JSON numbers or as numeric strings from form inputs.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum AmountInput {
    Number(f64),
    Text(String),
}

/// Dates may be sent as calendar dates, RFC 3339 timestamps or Unix milliseconds.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum DateInput {
    UnixMillis(i64),
    Text(String),
}

/// Settings that affect how payloads are validated.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidationContext {
    /// Which category names are accepted.
    pub category_policy: CategoryPolicy,
    /// The timezone calendar dates are interpreted in.
    pub local_timezone: LocalTimezone,
}

impl TransactionPayload {
    /// Validate the payload as a new transaction.
    ///
    /// `now` is used as the transaction date if the payload does not have one.
    ///
    /// # Errors
    /// Returns [Error::Validation] if the title, amount, category or type is
    /// missing or malformed, or if the date is malformed.
    pub fn into_new_transaction(
        self,
        context: ValidationContext,
        now: OffsetDateTime,
    ) -> Result<NewTransaction, Error> {
        let title = validate_title(self.title.ok_or_else(|| required("title"))?)?;
        let amount = validate_amount(self.amount.ok_or_else(|| required("amount"))?)?;
        let category = validate_category(
            self.category.ok_or_else(|| required("category"))?,
            context.category_policy,
        )?;
        let kind = validate_kind(&self.kind.ok_or_else(|| required("type"))?)?;
        let date = match self.date {
            Some(date) => validate_date(date, context.local_timezone)?,
            None => now,
        };

        Ok(NewTransaction::new(&title, amount, &category, kind, date))
    }

    /// Validate the fields present in the payload as a partial update.
    ///
    /// # Errors
    /// Returns [Error::Validation] if any field that is present is malformed.
    pub fn into_patch(self, context: ValidationContext) -> Result<TransactionPatch, Error> {
        Ok(TransactionPatch {
            title: self.title.map(validate_title).transpose()?,
            amount: self.amount.map(validate_amount).transpose()?,
            category: self
                .category
                .map(|category| validate_category(category, context.category_policy))
                .transpose()?,
            kind: self.kind.as_deref().map(validate_kind).transpose()?,
            date: self
                .date
                .map(|date| validate_date(date, context.local_timezone))
                .transpose()?
                .map(truncate_to_millis),
        })
    }
}

fn required(field: &str) -> Error {
    Error::Validation(format!("`{field}` is required"))
}

fn validate_title(title: String) -> Result<String, Error> {
    let title = title.trim();

    if title.is_empty() {
        return Err(Error::Validation("`title` cannot be empty".to_owned()));
    }

    Ok(title.to_owned())
}

fn validate_amount(amount: AmountInput) -> Result<f64, Error> {
    let amount = match amount {
        AmountInput::Number(number) => number,
        AmountInput::Text(text) => text.trim().parse().map_err(|_| {
            Error::Validation(format!("`amount` must be a number, got \"{text}\""))
        })?,
    };

    if !amount.is_finite() {
        return Err(Error::Validation(
            "`amount` must be a finite number".to_owned(),
        ));
    }

    Ok(amount)
}

fn validate_category(category: String, policy: CategoryPolicy) -> Result<String, Error> {
    let category = category.trim();

    if category.is_empty() {
        return Err(Error::Validation("`category` cannot be empty".to_owned()));
    }

    if !policy.allows(category) {
        return Err(Error::Validation(format!(
            "\"{category}\" is not one of the allowed categories"
        )));
    }

    Ok(category.to_owned())
}

fn validate_kind(kind: &str) -> Result<TransactionType, Error> {
    kind.parse().map_err(Error::Validation)
}

fn validate_date(date: DateInput, local_timezone: LocalTimezone) -> Result<OffsetDateTime, Error> {
    match date {
        DateInput::UnixMillis(millis) => from_unix_millis(millis)
            .map_err(|error| Error::Validation(format!("`date` is out of range: {error}"))),
        DateInput::Text(text) => {
            let text = text.trim();

            if let Ok(date_time) = OffsetDateTime::parse(text, &Rfc3339) {
                return Ok(date_time);
            }

            parse_iso_date(text)
                .map(|date| local_timezone.start_of_day(date))
                .map_err(|_| {
                    Error::Validation(format!(
                        "`date` must be a YYYY-MM-DD date or an RFC 3339 timestamp, got \"{text}\""
                    ))
                })
        }
    }
}
