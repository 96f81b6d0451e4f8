//! Field-scoped validation primitives.
//!
//! A draft either survives its lowering into a validated `New*` value or the
//! caller gets every [`Violation`] at once. There is no way to persist a
//! record without going through that lowering, so validation always runs
//! against the full candidate — for partial updates, the merged state.

use serde::Serialize;
use thiserror::Error;

/// A single field-scoped rule violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
  /// Path of the offending field, e.g. `validUntil`.
  pub property: String,
  /// Machine-readable reason code, e.g. `validUntil.beforeStartDate`.
  pub code:     String,
  /// Human-readable message.
  pub message:  String,
}

impl Violation {
  pub fn new(
    property: impl Into<String>,
    code: impl Into<String>,
    message: impl Into<String>,
  ) -> Self {
    Self {
      property: property.into(),
      code:     code.into(),
      message:  message.into(),
    }
  }

  /// Violation for a required field that is absent.
  pub fn required(property: &str) -> Self {
    Self::new(property, format!("{property}.required"), "must not be null")
  }
}

/// One or more violations produced while validating a single candidate.
#[derive(Debug, Clone, Error)]
#[error("validation failed with {} violation(s)", .0.len())]
pub struct ValidationError(pub Vec<Violation>);

impl ValidationError {
  /// `Ok(())` when `violations` is empty, `Err(Self)` otherwise.
  pub fn check(violations: Vec<Violation>) -> Result<(), Self> {
    if violations.is_empty() {
      Ok(())
    } else {
      Err(Self(violations))
    }
  }
}
