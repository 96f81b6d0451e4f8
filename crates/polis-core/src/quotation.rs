//! Quotation — a priced insurance offer tied to one customer.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::validate::{ValidationError, Violation};

/// A persisted quotation. The customer reference is never null once stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quotation {
  pub id: Uuid,
  pub beginning_of_insurance: Option<NaiveDate>,
  /// The insured amount in a currency subunit, to prevent rounding errors
  /// and accommodate varying decimal precision.
  pub insured_amount: Option<i64>,
  pub date_of_signing_mortgage: Option<NaiveDate>,
  pub customer_id: Uuid,
}

/// A validated quotation awaiting an identifier from the store.
#[derive(Debug, Clone)]
pub struct NewQuotation {
  pub beginning_of_insurance: Option<NaiveDate>,
  pub insured_amount: Option<i64>,
  pub date_of_signing_mortgage: Option<NaiveDate>,
  pub customer_id: Uuid,
}

/// The write-side shape of a quotation: every field optional.
#[derive(Debug, Clone, Default)]
pub struct QuotationDraft {
  pub beginning_of_insurance: Option<NaiveDate>,
  pub insured_amount: Option<i64>,
  pub date_of_signing_mortgage: Option<NaiveDate>,
  pub customer_id: Option<Uuid>,
}

impl From<Quotation> for QuotationDraft {
  fn from(q: Quotation) -> Self {
    Self {
      beginning_of_insurance:   q.beginning_of_insurance,
      insured_amount:           q.insured_amount,
      date_of_signing_mortgage: q.date_of_signing_mortgage,
      customer_id:              Some(q.customer_id),
    }
  }
}

impl QuotationDraft {
  /// Overlay the fields present in `patch` onto this draft. Absent fields
  /// are left untouched.
  pub fn apply(&mut self, patch: QuotationDraft) {
    if patch.beginning_of_insurance.is_some() {
      self.beginning_of_insurance = patch.beginning_of_insurance;
    }
    if patch.insured_amount.is_some() {
      self.insured_amount = patch.insured_amount;
    }
    if patch.date_of_signing_mortgage.is_some() {
      self.date_of_signing_mortgage = patch.date_of_signing_mortgage;
    }
    if patch.customer_id.is_some() {
      self.customer_id = patch.customer_id;
    }
  }

  /// Validate and lower into a [`NewQuotation`], or report every violation.
  pub fn into_new(self) -> Result<NewQuotation, ValidationError> {
    let mut violations = Vec::new();

    if let Some(amount) = self.insured_amount
      && amount < 0
    {
      violations.push(Violation::new(
        "insuredAmount",
        "insuredAmount.negative",
        "must be greater than or equal to 0",
      ));
    }

    // Placeholder never escapes: the check below fails whenever a
    // required-field violation was pushed.
    let customer_id = self.customer_id.unwrap_or_else(|| {
      violations.push(Violation::required("customer"));
      Uuid::nil()
    });

    ValidationError::check(violations)?;

    Ok(NewQuotation {
      beginning_of_insurance: self.beginning_of_insurance,
      insured_amount: self.insured_amount,
      date_of_signing_mortgage: self.date_of_signing_mortgage,
      customer_id,
    })
  }
}

impl NewQuotation {
  /// Attach a store-issued identifier.
  pub fn with_id(self, id: Uuid) -> Quotation {
    Quotation {
      id,
      beginning_of_insurance:   self.beginning_of_insurance,
      insured_amount:           self.insured_amount,
      date_of_signing_mortgage: self.date_of_signing_mortgage,
      customer_id:              self.customer_id,
    }
  }
}
