//! Hypermedia (HAL) rendering and reference-URI parsing.
//!
//! Items carry a `_links.self` entry plus one link per reference field;
//! collections nest their items under `_embedded.{plural}`. Reference
//! fields never appear as plain identifier fields in response bodies — the
//! link is the representation.

use axum::{
  http::{StatusCode, header},
  response::{IntoResponse, Response},
};
use polis_core::{
  customer::Customer, quotation::Quotation, subscription::Subscription,
};
use serde_json::{Value, json};
use uuid::Uuid;

pub const HAL_MEDIA_TYPE: &str = "application/hal+json";

/// A JSON body served with the `application/hal+json` content type.
pub struct Hal(pub StatusCode, pub Value);

impl IntoResponse for Hal {
  fn into_response(self) -> Response {
    (
      self.0,
      [(header::CONTENT_TYPE, HAL_MEDIA_TYPE)],
      self.1.to_string(),
    )
      .into_response()
  }
}

// ─── Resource rendering ──────────────────────────────────────────────────────

pub fn customer_resource(c: &Customer) -> Value {
  json!({
    "id": c.id,
    "firstName": c.first_name,
    "lastName": c.last_name,
    "middleName": c.middle_name,
    "email": c.email,
    "phoneNumber": c.phone_number,
    "birthDate": c.birth_date,
    "_links": {
      "self": { "href": format!("/customers/{}", c.id) },
    },
  })
}

pub fn quotation_resource(q: &Quotation) -> Value {
  json!({
    "id": q.id,
    "beginningOfInsurance": q.beginning_of_insurance,
    "insuredAmount": q.insured_amount,
    "dateOfSigningMortgage": q.date_of_signing_mortgage,
    "_links": {
      "self": { "href": format!("/quotations/{}", q.id) },
      "customer": { "href": format!("/customers/{}", q.customer_id) },
    },
  })
}

pub fn subscription_resource(s: &Subscription) -> Value {
  json!({
    "id": s.id,
    "startDate": s.start_date,
    "validUntil": s.valid_until,
    "_links": {
      "self": { "href": format!("/subscriptions/{}", s.id) },
      "quotation": { "href": format!("/quotations/{}", s.quotation_id) },
    },
  })
}

/// Wrap rendered items into a HAL collection keyed by the plural entity
/// name, with a collection self link.
pub fn collection(plural: &str, items: Vec<Value>) -> Value {
  json!({
    "_embedded": { plural: items },
    "_links": {
      "self": { "href": format!("/{plural}") },
    },
  })
}

// ─── Reference parsing ───────────────────────────────────────────────────────

/// Parse a reference URI such as `/customers/{id}` — or an absolute URL
/// ending in the same path — into the target identifier. Returns `None`
/// when the URI does not point into `collection`.
pub fn parse_ref(collection: &str, uri: &str) -> Option<Uuid> {
  let mut segments = uri.trim_end_matches('/').rsplit('/');
  let id = segments.next()?;
  let parent = segments.next()?;
  if parent != collection {
    return None;
  }
  Uuid::parse_str(id).ok()
}
