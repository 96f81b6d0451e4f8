//! Handlers for `/subscriptions` endpoints.
//!
//! The `quotation` field in write payloads is a reference URI
//! (`/quotations/{id}`), resolved against the store before validation. The
//! date-ordering rule always runs against the fully merged state, so a
//! partial update that touches only one of the two dates cannot bypass it.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State, rejection::JsonRejection},
  http::StatusCode,
};
use chrono::NaiveDate;
use polis_core::{store::InsuranceStore, subscription::SubscriptionDraft};
use serde::Deserialize;
use uuid::Uuid;

use crate::{error::ApiError, hal, hal::Hal};

/// JSON body accepted by the subscription write endpoints.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionBody {
  /// Reference URI to the underlying quotation, e.g. `/quotations/{id}`.
  pub quotation: Option<String>,
  pub start_date: Option<NaiveDate>,
  pub valid_until: Option<NaiveDate>,
}

impl TryFrom<SubscriptionBody> for SubscriptionDraft {
  type Error = ApiError;

  fn try_from(b: SubscriptionBody) -> Result<Self, ApiError> {
    let quotation_id = b
      .quotation
      .as_deref()
      .map(|uri| {
        hal::parse_ref("quotations", uri).ok_or_else(|| {
          ApiError::BadRequest(format!("malformed quotation reference: {uri}"))
        })
      })
      .transpose()?;
    Ok(SubscriptionDraft {
      quotation_id,
      start_date: b.start_date,
      valid_until: b.valid_until,
    })
  }
}

/// Explicit reference lookup: 400 unless the referenced quotation exists.
async fn resolve_quotation<S>(store: &S, id: Uuid) -> Result<(), ApiError>
where
  S: InsuranceStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  store
    .get_quotation(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .map(|_| ())
    .ok_or_else(|| {
      ApiError::BadRequest(format!(
        "quotation /quotations/{id} does not resolve"
      ))
    })
}

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /subscriptions`
pub async fn list<S>(State(store): State<Arc<S>>) -> Result<Hal, ApiError>
where
  S: InsuranceStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let subscriptions = store
    .list_subscriptions()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  let items = subscriptions
    .iter()
    .map(hal::subscription_resource)
    .collect();
  Ok(Hal(StatusCode::OK, hal::collection("subscriptions", items)))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /subscriptions`
pub async fn create<S>(
  State(store): State<Arc<S>>,
  body: Result<Json<SubscriptionBody>, JsonRejection>,
) -> Result<Hal, ApiError>
where
  S: InsuranceStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let Json(body) = body.map_err(|r| ApiError::BadRequest(r.body_text()))?;
  let draft = SubscriptionDraft::try_from(body)?;
  if let Some(quotation_id) = draft.quotation_id {
    resolve_quotation(store.as_ref(), quotation_id).await?;
  }
  let new = draft.into_new()?;
  let subscription = store
    .create_subscription(new)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Hal(
    StatusCode::CREATED,
    hal::subscription_resource(&subscription),
  ))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /subscriptions/:id`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Hal, ApiError>
where
  S: InsuranceStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let subscription = store
    .get_subscription(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("subscription {id} not found")))?;
  Ok(Hal(StatusCode::OK, hal::subscription_resource(&subscription)))
}

// ─── Replace ──────────────────────────────────────────────────────────────────

/// `PUT /subscriptions/:id` — full replace; omitted optional fields are
/// cleared.
pub async fn replace<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
  body: Result<Json<SubscriptionBody>, JsonRejection>,
) -> Result<Hal, ApiError>
where
  S: InsuranceStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let Json(body) = body.map_err(|r| ApiError::BadRequest(r.body_text()))?;
  let draft = SubscriptionDraft::try_from(body)?;
  if let Some(quotation_id) = draft.quotation_id {
    resolve_quotation(store.as_ref(), quotation_id).await?;
  }
  let new = draft.into_new()?;
  let subscription = store
    .replace_subscription(id, new)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("subscription {id} not found")))?;
  Ok(Hal(StatusCode::OK, hal::subscription_resource(&subscription)))
}

// ─── Patch ────────────────────────────────────────────────────────────────────

/// `PATCH /subscriptions/:id` — merge, then validate the merged state.
pub async fn patch<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
  body: Result<Json<SubscriptionBody>, JsonRejection>,
) -> Result<Hal, ApiError>
where
  S: InsuranceStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let Json(body) = body.map_err(|r| ApiError::BadRequest(r.body_text()))?;
  let existing = store
    .get_subscription(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("subscription {id} not found")))?;

  let mut draft = SubscriptionDraft::from(existing);
  draft.apply(SubscriptionDraft::try_from(body)?);
  if let Some(quotation_id) = draft.quotation_id {
    resolve_quotation(store.as_ref(), quotation_id).await?;
  }
  let new = draft.into_new()?;

  let subscription = store
    .replace_subscription(id, new)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("subscription {id} not found")))?;
  Ok(Hal(StatusCode::OK, hal::subscription_resource(&subscription)))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /subscriptions/:id`
pub async fn delete<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: InsuranceStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let deleted = store
    .delete_subscription(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  if !deleted {
    return Err(ApiError::NotFound(format!("subscription {id} not found")));
  }
  Ok(StatusCode::NO_CONTENT)
}
