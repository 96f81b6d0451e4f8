//! Subscription — a quotation that matured into a running contract.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::validate::{ValidationError, Violation};

/// A persisted subscription. The quotation reference is never null once
/// stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
  pub id: Uuid,
  pub quotation_id: Uuid,
  pub start_date: Option<NaiveDate>,
  pub valid_until: Option<NaiveDate>,
}

/// A validated subscription awaiting an identifier from the store.
#[derive(Debug, Clone)]
pub struct NewSubscription {
  pub quotation_id: Uuid,
  pub start_date: Option<NaiveDate>,
  pub valid_until: Option<NaiveDate>,
}

/// The write-side shape of a subscription: every field optional.
#[derive(Debug, Clone, Default)]
pub struct SubscriptionDraft {
  pub quotation_id: Option<Uuid>,
  pub start_date: Option<NaiveDate>,
  pub valid_until: Option<NaiveDate>,
}

impl From<Subscription> for SubscriptionDraft {
  fn from(s: Subscription) -> Self {
    Self {
      quotation_id: Some(s.quotation_id),
      start_date:   s.start_date,
      valid_until:  s.valid_until,
    }
  }
}

impl SubscriptionDraft {
  /// Overlay the fields present in `patch` onto this draft. Absent fields
  /// are left untouched.
  pub fn apply(&mut self, patch: SubscriptionDraft) {
    if patch.quotation_id.is_some() {
      self.quotation_id = patch.quotation_id;
    }
    if patch.start_date.is_some() {
      self.start_date = patch.start_date;
    }
    if patch.valid_until.is_some() {
      self.valid_until = patch.valid_until;
    }
  }

  /// Validate and lower into a [`NewSubscription`], or report every
  /// violation.
  ///
  /// The date-ordering rule only applies when both dates are set; equal
  /// dates are valid. A draft missing one of the two dates vacuously
  /// satisfies the rule.
  pub fn into_new(self) -> Result<NewSubscription, ValidationError> {
    let mut violations = Vec::new();

    // Placeholder never escapes: the check below fails whenever a
    // required-field violation was pushed.
    let quotation_id = self.quotation_id.unwrap_or_else(|| {
      violations.push(Violation::required("quotation"));
      Uuid::nil()
    });

    if let (Some(start_date), Some(valid_until)) =
      (self.start_date, self.valid_until)
      && start_date > valid_until
    {
      violations.push(Violation::new(
        "validUntil",
        "validUntil.beforeStartDate",
        format!(
          "The <validUntil> field must be after startDate <{start_date}> \
           but is <{valid_until}>"
        ),
      ));
    }

    ValidationError::check(violations)?;

    Ok(NewSubscription {
      quotation_id,
      start_date: self.start_date,
      valid_until: self.valid_until,
    })
  }
}

impl NewSubscription {
  /// Attach a store-issued identifier.
  pub fn with_id(self, id: Uuid) -> Subscription {
    Subscription {
      id,
      quotation_id: self.quotation_id,
      start_date:   self.start_date,
      valid_until:  self.valid_until,
    }
  }
}
