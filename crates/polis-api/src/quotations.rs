//! Handlers for `/quotations` endpoints.
//!
//! The `customer` field in write payloads is a reference URI
//! (`/customers/{id}`), resolved against the store before validation.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State, rejection::JsonRejection},
  http::StatusCode,
};
use chrono::NaiveDate;
use polis_core::{quotation::QuotationDraft, store::InsuranceStore};
use serde::Deserialize;
use uuid::Uuid;

use crate::{error::ApiError, hal, hal::Hal};

/// JSON body accepted by the quotation write endpoints.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotationBody {
  pub beginning_of_insurance: Option<NaiveDate>,
  pub insured_amount: Option<i64>,
  pub date_of_signing_mortgage: Option<NaiveDate>,
  /// Reference URI to the owning customer, e.g. `/customers/{id}`.
  pub customer: Option<String>,
}

impl TryFrom<QuotationBody> for QuotationDraft {
  type Error = ApiError;

  fn try_from(b: QuotationBody) -> Result<Self, ApiError> {
    let customer_id = b
      .customer
      .as_deref()
      .map(|uri| {
        hal::parse_ref("customers", uri).ok_or_else(|| {
          ApiError::BadRequest(format!("malformed customer reference: {uri}"))
        })
      })
      .transpose()?;
    Ok(QuotationDraft {
      beginning_of_insurance: b.beginning_of_insurance,
      insured_amount: b.insured_amount,
      date_of_signing_mortgage: b.date_of_signing_mortgage,
      customer_id,
    })
  }
}

/// Explicit reference lookup: 400 unless the referenced customer exists.
async fn resolve_customer<S>(store: &S, id: Uuid) -> Result<(), ApiError>
where
  S: InsuranceStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  store
    .get_customer(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .map(|_| ())
    .ok_or_else(|| {
      ApiError::BadRequest(format!("customer /customers/{id} does not resolve"))
    })
}

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /quotations`
pub async fn list<S>(State(store): State<Arc<S>>) -> Result<Hal, ApiError>
where
  S: InsuranceStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let quotations = store
    .list_quotations()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  let items = quotations.iter().map(hal::quotation_resource).collect();
  Ok(Hal(StatusCode::OK, hal::collection("quotations", items)))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /quotations`
pub async fn create<S>(
  State(store): State<Arc<S>>,
  body: Result<Json<QuotationBody>, JsonRejection>,
) -> Result<Hal, ApiError>
where
  S: InsuranceStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let Json(body) = body.map_err(|r| ApiError::BadRequest(r.body_text()))?;
  let draft = QuotationDraft::try_from(body)?;
  if let Some(customer_id) = draft.customer_id {
    resolve_customer(store.as_ref(), customer_id).await?;
  }
  let new = draft.into_new()?;
  let quotation = store
    .create_quotation(new)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Hal(StatusCode::CREATED, hal::quotation_resource(&quotation)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /quotations/:id`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Hal, ApiError>
where
  S: InsuranceStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let quotation = store
    .get_quotation(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("quotation {id} not found")))?;
  Ok(Hal(StatusCode::OK, hal::quotation_resource(&quotation)))
}

// ─── Replace ──────────────────────────────────────────────────────────────────

/// `PUT /quotations/:id` — full replace; omitted optional fields are
/// cleared.
pub async fn replace<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
  body: Result<Json<QuotationBody>, JsonRejection>,
) -> Result<Hal, ApiError>
where
  S: InsuranceStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let Json(body) = body.map_err(|r| ApiError::BadRequest(r.body_text()))?;
  let draft = QuotationDraft::try_from(body)?;
  if let Some(customer_id) = draft.customer_id {
    resolve_customer(store.as_ref(), customer_id).await?;
  }
  let new = draft.into_new()?;
  let quotation = store
    .replace_quotation(id, new)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("quotation {id} not found")))?;
  Ok(Hal(StatusCode::OK, hal::quotation_resource(&quotation)))
}

// ─── Patch ────────────────────────────────────────────────────────────────────

/// `PATCH /quotations/:id` — merge, then validate the merged state.
pub async fn patch<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
  body: Result<Json<QuotationBody>, JsonRejection>,
) -> Result<Hal, ApiError>
where
  S: InsuranceStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let Json(body) = body.map_err(|r| ApiError::BadRequest(r.body_text()))?;
  let existing = store
    .get_quotation(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("quotation {id} not found")))?;

  let mut draft = QuotationDraft::from(existing);
  draft.apply(QuotationDraft::try_from(body)?);
  if let Some(customer_id) = draft.customer_id {
    resolve_customer(store.as_ref(), customer_id).await?;
  }
  let new = draft.into_new()?;

  let quotation = store
    .replace_quotation(id, new)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("quotation {id} not found")))?;
  Ok(Hal(StatusCode::OK, hal::quotation_resource(&quotation)))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /quotations/:id`
pub async fn delete<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: InsuranceStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let deleted = store
    .delete_quotation(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  if !deleted {
    return Err(ApiError::NotFound(format!("quotation {id} not found")));
  }
  Ok(StatusCode::NO_CONTENT)
}
