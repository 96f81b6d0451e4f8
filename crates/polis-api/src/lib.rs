//! JSON REST API for Polis.
//!
//! Exposes an axum [`Router`] backed by any
//! [`polis_core::store::InsuranceStore`]. Auth, TLS, and transport concerns
//! are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! axum::serve(listener, polis_api::api_router(store.clone())).await?;
//! ```

pub mod customers;
pub mod error;
pub mod hal;
pub mod quotations;
pub mod subscriptions;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  routing::get,
};
use polis_core::store::InsuranceStore;
use serde::Deserialize;

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: InsuranceStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  Router::new()
    // Customers
    .route(
      "/customers",
      get(customers::list::<S>).post(customers::create::<S>),
    )
    .route(
      "/customers/{id}",
      get(customers::get_one::<S>)
        .put(customers::replace::<S>)
        .patch(customers::patch::<S>)
        .delete(customers::delete::<S>),
    )
    // Quotations
    .route(
      "/quotations",
      get(quotations::list::<S>).post(quotations::create::<S>),
    )
    .route(
      "/quotations/{id}",
      get(quotations::get_one::<S>)
        .put(quotations::replace::<S>)
        .patch(quotations::patch::<S>)
        .delete(quotations::delete::<S>),
    )
    // Subscriptions
    .route(
      "/subscriptions",
      get(subscriptions::list::<S>).post(subscriptions::create::<S>),
    )
    .route(
      "/subscriptions/{id}",
      get(subscriptions::get_one::<S>)
        .put(subscriptions::replace::<S>)
        .patch(subscriptions::patch::<S>)
        .delete(subscriptions::delete::<S>),
    )
    .with_state(store)
}

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `POLIS_`-prefixed environment variables. Every field has a default so the
/// server starts without a config file.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:       String,
  #[serde(default = "default_port")]
  pub port:       u16,
  #[serde(default = "default_store_path")]
  pub store_path: PathBuf,
}

fn default_host() -> String { "127.0.0.1".into() }

fn default_port() -> u16 { 8080 }

fn default_store_path() -> PathBuf { PathBuf::from("polis.db") }

#[cfg(test)]
mod tests;
