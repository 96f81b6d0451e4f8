//! Customer — the person an insurance quotation is issued for.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::ValidateEmail as _;

use crate::validate::{ValidationError, Violation};

/// A persisted customer. `first_name` and `last_name` are always present;
/// everything else is optional free text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
  pub id:           Uuid,
  pub first_name:   String,
  pub last_name:    String,
  pub middle_name:  Option<String>,
  pub email:        Option<String>,
  pub phone_number: Option<String>,
  pub birth_date:   Option<NaiveDate>,
}

/// A validated customer awaiting an identifier from the store.
#[derive(Debug, Clone)]
pub struct NewCustomer {
  pub first_name:   String,
  pub last_name:    String,
  pub middle_name:  Option<String>,
  pub email:        Option<String>,
  pub phone_number: Option<String>,
  pub birth_date:   Option<NaiveDate>,
}

/// The write-side shape of a customer: every field optional.
///
/// A create or replace payload lowers into a draft directly; a partial
/// update lowers the stored record into a draft and overlays the supplied
/// fields with [`CustomerDraft::apply`] before validating.
#[derive(Debug, Clone, Default)]
pub struct CustomerDraft {
  pub first_name:   Option<String>,
  pub last_name:    Option<String>,
  pub middle_name:  Option<String>,
  pub email:        Option<String>,
  pub phone_number: Option<String>,
  pub birth_date:   Option<NaiveDate>,
}

impl From<Customer> for CustomerDraft {
  fn from(c: Customer) -> Self {
    Self {
      first_name:   Some(c.first_name),
      last_name:    Some(c.last_name),
      middle_name:  c.middle_name,
      email:        c.email,
      phone_number: c.phone_number,
      birth_date:   c.birth_date,
    }
  }
}

impl CustomerDraft {
  /// Overlay the fields present in `patch` onto this draft. Absent fields
  /// are left untouched.
  pub fn apply(&mut self, patch: CustomerDraft) {
    if patch.first_name.is_some() {
      self.first_name = patch.first_name;
    }
    if patch.last_name.is_some() {
      self.last_name = patch.last_name;
    }
    if patch.middle_name.is_some() {
      self.middle_name = patch.middle_name;
    }
    if patch.email.is_some() {
      self.email = patch.email;
    }
    if patch.phone_number.is_some() {
      self.phone_number = patch.phone_number;
    }
    if patch.birth_date.is_some() {
      self.birth_date = patch.birth_date;
    }
  }

  /// Validate and lower into a [`NewCustomer`], or report every violation.
  ///
  /// `today` is the comparison date for the birth-date rule; a birth date
  /// equal to `today` passes, a strictly later one fails.
  pub fn into_new(
    self,
    today: NaiveDate,
  ) -> Result<NewCustomer, ValidationError> {
    let mut violations = Vec::new();

    // Placeholders never escape: the check below fails whenever a
    // required-field violation was pushed.
    let first_name = self.first_name.unwrap_or_else(|| {
      violations.push(Violation::required("firstName"));
      String::new()
    });
    let last_name = self.last_name.unwrap_or_else(|| {
      violations.push(Violation::required("lastName"));
      String::new()
    });

    if let Some(email) = &self.email
      && !email.validate_email()
    {
      violations.push(Violation::new(
        "email",
        "email.invalid",
        "must be a well-formed email address",
      ));
    }

    if let Some(birth_date) = self.birth_date
      && birth_date > today
    {
      violations.push(Violation::new(
        "birthDate",
        "birthDate.inFuture",
        "must be a date in the past or in the present",
      ));
    }

    ValidationError::check(violations)?;

    Ok(NewCustomer {
      first_name,
      last_name,
      middle_name: self.middle_name,
      email: self.email,
      phone_number: self.phone_number,
      birth_date: self.birth_date,
    })
  }
}

impl NewCustomer {
  /// Attach a store-issued identifier.
  pub fn with_id(self, id: Uuid) -> Customer {
    Customer {
      id,
      first_name:   self.first_name,
      last_name:    self.last_name,
      middle_name:  self.middle_name,
      email:        self.email,
      phone_number: self.phone_number,
      birth_date:   self.birth_date,
    }
  }
}
