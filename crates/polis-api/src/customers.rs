//! Handlers for `/customers` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/customers` | HAL collection |
//! | `POST`   | `/customers` | 201 + self link; 400 on validation failure |
//! | `GET`    | `/customers/:id` | 404 if not found |
//! | `PUT`    | `/customers/:id` | Full replace; omitted optionals reset |
//! | `PATCH`  | `/customers/:id` | Merge, then validate the merged state |
//! | `DELETE` | `/customers/:id` | 204 on success |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State, rejection::JsonRejection},
  http::StatusCode,
};
use chrono::{NaiveDate, Utc};
use polis_core::{customer::CustomerDraft, store::InsuranceStore};
use serde::Deserialize;
use uuid::Uuid;

use crate::{error::ApiError, hal, hal::Hal};

fn today() -> NaiveDate { Utc::now().date_naive() }

/// JSON body accepted by the customer write endpoints. Every field is
/// optional at the payload level; required-field enforcement happens in
/// validation so the client gets the full violation list.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerBody {
  pub first_name:   Option<String>,
  pub last_name:    Option<String>,
  pub middle_name:  Option<String>,
  pub email:        Option<String>,
  pub phone_number: Option<String>,
  pub birth_date:   Option<NaiveDate>,
}

impl From<CustomerBody> for CustomerDraft {
  fn from(b: CustomerBody) -> Self {
    CustomerDraft {
      first_name:   b.first_name,
      last_name:    b.last_name,
      middle_name:  b.middle_name,
      email:        b.email,
      phone_number: b.phone_number,
      birth_date:   b.birth_date,
    }
  }
}

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /customers`
pub async fn list<S>(State(store): State<Arc<S>>) -> Result<Hal, ApiError>
where
  S: InsuranceStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let customers = store
    .list_customers()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  let items = customers.iter().map(hal::customer_resource).collect();
  Ok(Hal(StatusCode::OK, hal::collection("customers", items)))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /customers`
pub async fn create<S>(
  State(store): State<Arc<S>>,
  body: Result<Json<CustomerBody>, JsonRejection>,
) -> Result<Hal, ApiError>
where
  S: InsuranceStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let Json(body) = body.map_err(|r| ApiError::BadRequest(r.body_text()))?;
  let new = CustomerDraft::from(body).into_new(today())?;
  let customer = store
    .create_customer(new)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Hal(StatusCode::CREATED, hal::customer_resource(&customer)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /customers/:id`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Hal, ApiError>
where
  S: InsuranceStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let customer = store
    .get_customer(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("customer {id} not found")))?;
  Ok(Hal(StatusCode::OK, hal::customer_resource(&customer)))
}

// ─── Replace ──────────────────────────────────────────────────────────────────

/// `PUT /customers/:id` — full replace: the body is the complete
/// representation, and omitted optional fields are cleared.
pub async fn replace<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
  body: Result<Json<CustomerBody>, JsonRejection>,
) -> Result<Hal, ApiError>
where
  S: InsuranceStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let Json(body) = body.map_err(|r| ApiError::BadRequest(r.body_text()))?;
  let new = CustomerDraft::from(body).into_new(today())?;
  let customer = store
    .replace_customer(id, new)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("customer {id} not found")))?;
  Ok(Hal(StatusCode::OK, hal::customer_resource(&customer)))
}

// ─── Patch ────────────────────────────────────────────────────────────────────

/// `PATCH /customers/:id` — loads the stored record, overlays only the
/// supplied fields, and validates the merged state before persisting.
pub async fn patch<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
  body: Result<Json<CustomerBody>, JsonRejection>,
) -> Result<Hal, ApiError>
where
  S: InsuranceStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let Json(body) = body.map_err(|r| ApiError::BadRequest(r.body_text()))?;
  let existing = store
    .get_customer(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("customer {id} not found")))?;

  let mut draft = CustomerDraft::from(existing);
  draft.apply(body.into());
  let new = draft.into_new(today())?;

  let customer = store
    .replace_customer(id, new)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("customer {id} not found")))?;
  Ok(Hal(StatusCode::OK, hal::customer_resource(&customer)))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /customers/:id`
pub async fn delete<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: InsuranceStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let deleted = store
    .delete_customer(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  if !deleted {
    return Err(ApiError::NotFound(format!("customer {id} not found")));
  }
  Ok(StatusCode::NO_CONTENT)
}
