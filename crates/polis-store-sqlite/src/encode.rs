//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Calendar dates are stored as ISO 8601 strings (`YYYY-MM-DD`). UUIDs are
//! stored as hyphenated lowercase strings. Amounts are stored as INTEGER.

use chrono::NaiveDate;
use polis_core::{
  customer::Customer, quotation::Quotation, subscription::Subscription,
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── NaiveDate ───────────────────────────────────────────────────────────────

pub fn encode_date(d: NaiveDate) -> String { d.to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  s.parse().map_err(|e: chrono::ParseError| Error::DateParse(e.to_string()))
}

fn decode_date_opt(s: Option<String>) -> Result<Option<NaiveDate>> {
  s.as_deref().map(decode_date).transpose()
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `customers` row.
pub struct RawCustomer {
  pub customer_id:  String,
  pub first_name:   String,
  pub last_name:    String,
  pub middle_name:  Option<String>,
  pub email:        Option<String>,
  pub phone_number: Option<String>,
  pub birth_date:   Option<String>,
}

impl RawCustomer {
  pub fn into_customer(self) -> Result<Customer> {
    Ok(Customer {
      id:           decode_uuid(&self.customer_id)?,
      first_name:   self.first_name,
      last_name:    self.last_name,
      middle_name:  self.middle_name,
      email:        self.email,
      phone_number: self.phone_number,
      birth_date:   decode_date_opt(self.birth_date)?,
    })
  }
}

/// Raw strings read directly from a `quotations` row.
pub struct RawQuotation {
  pub quotation_id:             String,
  pub beginning_of_insurance:   Option<String>,
  pub insured_amount:           Option<i64>,
  pub date_of_signing_mortgage: Option<String>,
  pub customer_id:              String,
}

impl RawQuotation {
  pub fn into_quotation(self) -> Result<Quotation> {
    Ok(Quotation {
      id: decode_uuid(&self.quotation_id)?,
      beginning_of_insurance: decode_date_opt(self.beginning_of_insurance)?,
      insured_amount: self.insured_amount,
      date_of_signing_mortgage: decode_date_opt(
        self.date_of_signing_mortgage,
      )?,
      customer_id: decode_uuid(&self.customer_id)?,
    })
  }
}

/// Raw strings read directly from a `subscriptions` row.
pub struct RawSubscription {
  pub subscription_id: String,
  pub quotation_id:    String,
  pub start_date:      Option<String>,
  pub valid_until:     Option<String>,
}

impl RawSubscription {
  pub fn into_subscription(self) -> Result<Subscription> {
    Ok(Subscription {
      id:           decode_uuid(&self.subscription_id)?,
      quotation_id: decode_uuid(&self.quotation_id)?,
      start_date:   decode_date_opt(self.start_date)?,
      valid_until:  decode_date_opt(self.valid_until)?,
    })
  }
}
