//! The `InsuranceStore` trait — the persistence gateway contract.
//!
//! The trait is implemented by storage backends (e.g. `polis-store-sqlite`).
//! Higher layers (`polis-api`) depend on this abstraction, not on any
//! concrete backend.

use std::future::Future;

use uuid::Uuid;

use crate::{
  customer::{Customer, NewCustomer},
  quotation::{NewQuotation, Quotation},
  subscription::{NewSubscription, Subscription},
};

/// Abstraction over a Polis storage backend.
///
/// The gateway is a dumb store plus reference resolution: it issues
/// identifiers, performs create/read/replace/delete per aggregate, and
/// fails a quotation or subscription write whose reference target does not
/// exist. Field-level rules are not its concern — a `New*` value has
/// already been validated.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait InsuranceStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Customers ─────────────────────────────────────────────────────────

  /// Persist a new customer under a freshly issued identifier.
  fn create_customer(
    &self,
    new: NewCustomer,
  ) -> impl Future<Output = Result<Customer, Self::Error>> + Send + '_;

  /// Retrieve a customer by identifier. Returns `None` if not found.
  fn get_customer(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Customer>, Self::Error>> + Send + '_;

  /// List all customers.
  fn list_customers(
    &self,
  ) -> impl Future<Output = Result<Vec<Customer>, Self::Error>> + Send + '_;

  /// Overwrite every field of the customer with identifier `id`, keeping
  /// the identifier. Returns `None` if no such customer exists.
  fn replace_customer(
    &self,
    id: Uuid,
    new: NewCustomer,
  ) -> impl Future<Output = Result<Option<Customer>, Self::Error>> + Send + '_;

  /// Delete a customer. Returns `false` if no such customer exists.
  fn delete_customer(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Quotations ────────────────────────────────────────────────────────

  /// Persist a new quotation under a freshly issued identifier.
  ///
  /// Fails if `customer_id` does not resolve to a stored customer.
  fn create_quotation(
    &self,
    new: NewQuotation,
  ) -> impl Future<Output = Result<Quotation, Self::Error>> + Send + '_;

  /// Retrieve a quotation by identifier. Returns `None` if not found.
  fn get_quotation(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Quotation>, Self::Error>> + Send + '_;

  /// List all quotations.
  fn list_quotations(
    &self,
  ) -> impl Future<Output = Result<Vec<Quotation>, Self::Error>> + Send + '_;

  /// Overwrite every field of the quotation with identifier `id`, keeping
  /// the identifier. Returns `None` if no such quotation exists; fails if
  /// `customer_id` does not resolve.
  fn replace_quotation(
    &self,
    id: Uuid,
    new: NewQuotation,
  ) -> impl Future<Output = Result<Option<Quotation>, Self::Error>> + Send + '_;

  /// Delete a quotation. Returns `false` if no such quotation exists.
  fn delete_quotation(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Subscriptions ─────────────────────────────────────────────────────

  /// Persist a new subscription under a freshly issued identifier.
  ///
  /// Fails if `quotation_id` does not resolve to a stored quotation.
  fn create_subscription(
    &self,
    new: NewSubscription,
  ) -> impl Future<Output = Result<Subscription, Self::Error>> + Send + '_;

  /// Retrieve a subscription by identifier. Returns `None` if not found.
  fn get_subscription(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Subscription>, Self::Error>> + Send + '_;

  /// List all subscriptions.
  fn list_subscriptions(
    &self,
  ) -> impl Future<Output = Result<Vec<Subscription>, Self::Error>> + Send + '_;

  /// Overwrite every field of the subscription with identifier `id`,
  /// keeping the identifier. Returns `None` if no such subscription
  /// exists; fails if `quotation_id` does not resolve.
  fn replace_subscription(
    &self,
    id: Uuid,
    new: NewSubscription,
  ) -> impl Future<Output = Result<Option<Subscription>, Self::Error>> + Send + '_;

  /// Delete a subscription. Returns `false` if no such subscription
  /// exists.
  fn delete_subscription(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;
}
