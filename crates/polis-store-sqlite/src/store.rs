//! [`SqliteStore`] — the SQLite implementation of [`InsuranceStore`].

use std::path::Path;

use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use polis_core::{
  customer::{Customer, NewCustomer},
  quotation::{NewQuotation, Quotation},
  store::InsuranceStore,
  subscription::{NewSubscription, Subscription},
};

use crate::{
  Error, Result,
  encode::{
    RawCustomer, RawQuotation, RawSubscription, encode_date, encode_uuid,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Polis insurance store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted. All writes
/// go through the one connection, which serialises per-record updates.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Reference resolution: does a customer row with this id exist?
  async fn customer_exists(&self, id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(id);
    let exists = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT 1 FROM customers WHERE customer_id = ?1",
              rusqlite::params![id_str],
              |_| Ok(true),
            )
            .optional()?
            .unwrap_or(false),
        )
      })
      .await?;
    Ok(exists)
  }

  /// Reference resolution: does a quotation row with this id exist?
  async fn quotation_exists(&self, id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(id);
    let exists = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT 1 FROM quotations WHERE quotation_id = ?1",
              rusqlite::params![id_str],
              |_| Ok(true),
            )
            .optional()?
            .unwrap_or(false),
        )
      })
      .await?;
    Ok(exists)
  }
}

// ─── InsuranceStore impl ─────────────────────────────────────────────────────

impl InsuranceStore for SqliteStore {
  type Error = Error;

  // ── Customers ─────────────────────────────────────────────────────────────

  async fn create_customer(&self, new: NewCustomer) -> Result<Customer> {
    let customer = new.with_id(Uuid::new_v4());

    let id_str       = encode_uuid(customer.id);
    let first_name   = customer.first_name.clone();
    let last_name    = customer.last_name.clone();
    let middle_name  = customer.middle_name.clone();
    let email        = customer.email.clone();
    let phone_number = customer.phone_number.clone();
    let birth_date   = customer.birth_date.map(encode_date);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO customers (
             customer_id, first_name, last_name, middle_name,
             email, phone_number, birth_date
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
          rusqlite::params![
            id_str,
            first_name,
            last_name,
            middle_name,
            email,
            phone_number,
            birth_date,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(customer)
  }

  async fn get_customer(&self, id: Uuid) -> Result<Option<Customer>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawCustomer> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT customer_id, first_name, last_name, middle_name,
                      email, phone_number, birth_date
               FROM customers WHERE customer_id = ?1",
              rusqlite::params![id_str],
              |row| {
                Ok(RawCustomer {
                  customer_id:  row.get(0)?,
                  first_name:   row.get(1)?,
                  last_name:    row.get(2)?,
                  middle_name:  row.get(3)?,
                  email:        row.get(4)?,
                  phone_number: row.get(5)?,
                  birth_date:   row.get(6)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawCustomer::into_customer).transpose()
  }

  async fn list_customers(&self) -> Result<Vec<Customer>> {
    let raws: Vec<RawCustomer> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT customer_id, first_name, last_name, middle_name,
                  email, phone_number, birth_date
           FROM customers",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(RawCustomer {
              customer_id:  row.get(0)?,
              first_name:   row.get(1)?,
              last_name:    row.get(2)?,
              middle_name:  row.get(3)?,
              email:        row.get(4)?,
              phone_number: row.get(5)?,
              birth_date:   row.get(6)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawCustomer::into_customer).collect()
  }

  async fn replace_customer(
    &self,
    id: Uuid,
    new: NewCustomer,
  ) -> Result<Option<Customer>> {
    let customer = new.with_id(id);

    let id_str       = encode_uuid(customer.id);
    let first_name   = customer.first_name.clone();
    let last_name    = customer.last_name.clone();
    let middle_name  = customer.middle_name.clone();
    let email        = customer.email.clone();
    let phone_number = customer.phone_number.clone();
    let birth_date   = customer.birth_date.map(encode_date);

    let updated = self
      .conn
      .call(move |conn| {
        let rows = conn.execute(
          "UPDATE customers SET
             first_name = ?2, last_name = ?3, middle_name = ?4,
             email = ?5, phone_number = ?6, birth_date = ?7
           WHERE customer_id = ?1",
          rusqlite::params![
            id_str,
            first_name,
            last_name,
            middle_name,
            email,
            phone_number,
            birth_date,
          ],
        )?;
        Ok(rows > 0)
      })
      .await?;

    Ok(updated.then_some(customer))
  }

  async fn delete_customer(&self, id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(id);
    let deleted = self
      .conn
      .call(move |conn| {
        let rows = conn.execute(
          "DELETE FROM customers WHERE customer_id = ?1",
          rusqlite::params![id_str],
        )?;
        Ok(rows > 0)
      })
      .await?;
    Ok(deleted)
  }

  // ── Quotations ────────────────────────────────────────────────────────────

  async fn create_quotation(&self, new: NewQuotation) -> Result<Quotation> {
    if !self.customer_exists(new.customer_id).await? {
      return Err(Error::CustomerNotFound(new.customer_id));
    }

    let quotation = new.with_id(Uuid::new_v4());

    let id_str          = encode_uuid(quotation.id);
    let beginning       = quotation.beginning_of_insurance.map(encode_date);
    let insured_amount  = quotation.insured_amount;
    let signing         = quotation.date_of_signing_mortgage.map(encode_date);
    let customer_id_str = encode_uuid(quotation.customer_id);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO quotations (
             quotation_id, beginning_of_insurance, insured_amount,
             date_of_signing_mortgage, customer_id
           ) VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![
            id_str,
            beginning,
            insured_amount,
            signing,
            customer_id_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(quotation)
  }

  async fn get_quotation(&self, id: Uuid) -> Result<Option<Quotation>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawQuotation> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT quotation_id, beginning_of_insurance, insured_amount,
                      date_of_signing_mortgage, customer_id
               FROM quotations WHERE quotation_id = ?1",
              rusqlite::params![id_str],
              |row| {
                Ok(RawQuotation {
                  quotation_id:             row.get(0)?,
                  beginning_of_insurance:   row.get(1)?,
                  insured_amount:           row.get(2)?,
                  date_of_signing_mortgage: row.get(3)?,
                  customer_id:              row.get(4)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawQuotation::into_quotation).transpose()
  }

  async fn list_quotations(&self) -> Result<Vec<Quotation>> {
    let raws: Vec<RawQuotation> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT quotation_id, beginning_of_insurance, insured_amount,
                  date_of_signing_mortgage, customer_id
           FROM quotations",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(RawQuotation {
              quotation_id:             row.get(0)?,
              beginning_of_insurance:   row.get(1)?,
              insured_amount:           row.get(2)?,
              date_of_signing_mortgage: row.get(3)?,
              customer_id:              row.get(4)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawQuotation::into_quotation).collect()
  }

  async fn replace_quotation(
    &self,
    id: Uuid,
    new: NewQuotation,
  ) -> Result<Option<Quotation>> {
    if !self.customer_exists(new.customer_id).await? {
      return Err(Error::CustomerNotFound(new.customer_id));
    }

    let quotation = new.with_id(id);

    let id_str          = encode_uuid(quotation.id);
    let beginning       = quotation.beginning_of_insurance.map(encode_date);
    let insured_amount  = quotation.insured_amount;
    let signing         = quotation.date_of_signing_mortgage.map(encode_date);
    let customer_id_str = encode_uuid(quotation.customer_id);

    let updated = self
      .conn
      .call(move |conn| {
        let rows = conn.execute(
          "UPDATE quotations SET
             beginning_of_insurance = ?2, insured_amount = ?3,
             date_of_signing_mortgage = ?4, customer_id = ?5
           WHERE quotation_id = ?1",
          rusqlite::params![
            id_str,
            beginning,
            insured_amount,
            signing,
            customer_id_str,
          ],
        )?;
        Ok(rows > 0)
      })
      .await?;

    Ok(updated.then_some(quotation))
  }

  async fn delete_quotation(&self, id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(id);
    let deleted = self
      .conn
      .call(move |conn| {
        let rows = conn.execute(
          "DELETE FROM quotations WHERE quotation_id = ?1",
          rusqlite::params![id_str],
        )?;
        Ok(rows > 0)
      })
      .await?;
    Ok(deleted)
  }

  // ── Subscriptions ─────────────────────────────────────────────────────────

  async fn create_subscription(
    &self,
    new: NewSubscription,
  ) -> Result<Subscription> {
    if !self.quotation_exists(new.quotation_id).await? {
      return Err(Error::QuotationNotFound(new.quotation_id));
    }

    let subscription = new.with_id(Uuid::new_v4());

    let id_str           = encode_uuid(subscription.id);
    let quotation_id_str = encode_uuid(subscription.quotation_id);
    let start_date       = subscription.start_date.map(encode_date);
    let valid_until      = subscription.valid_until.map(encode_date);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO subscriptions (
             subscription_id, quotation_id, start_date, valid_until
           ) VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![id_str, quotation_id_str, start_date, valid_until],
        )?;
        Ok(())
      })
      .await?;

    Ok(subscription)
  }

  async fn get_subscription(&self, id: Uuid) -> Result<Option<Subscription>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawSubscription> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT subscription_id, quotation_id, start_date, valid_until
               FROM subscriptions WHERE subscription_id = ?1",
              rusqlite::params![id_str],
              |row| {
                Ok(RawSubscription {
                  subscription_id: row.get(0)?,
                  quotation_id:    row.get(1)?,
                  start_date:      row.get(2)?,
                  valid_until:     row.get(3)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawSubscription::into_subscription).transpose()
  }

  async fn list_subscriptions(&self) -> Result<Vec<Subscription>> {
    let raws: Vec<RawSubscription> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT subscription_id, quotation_id, start_date, valid_until
           FROM subscriptions",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(RawSubscription {
              subscription_id: row.get(0)?,
              quotation_id:    row.get(1)?,
              start_date:      row.get(2)?,
              valid_until:     row.get(3)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws
      .into_iter()
      .map(RawSubscription::into_subscription)
      .collect()
  }

  async fn replace_subscription(
    &self,
    id: Uuid,
    new: NewSubscription,
  ) -> Result<Option<Subscription>> {
    if !self.quotation_exists(new.quotation_id).await? {
      return Err(Error::QuotationNotFound(new.quotation_id));
    }

    let subscription = new.with_id(id);

    let id_str           = encode_uuid(subscription.id);
    let quotation_id_str = encode_uuid(subscription.quotation_id);
    let start_date       = subscription.start_date.map(encode_date);
    let valid_until      = subscription.valid_until.map(encode_date);

    let updated = self
      .conn
      .call(move |conn| {
        let rows = conn.execute(
          "UPDATE subscriptions SET
             quotation_id = ?2, start_date = ?3, valid_until = ?4
           WHERE subscription_id = ?1",
          rusqlite::params![id_str, quotation_id_str, start_date, valid_until],
        )?;
        Ok(rows > 0)
      })
      .await?;

    Ok(updated.then_some(subscription))
  }

  async fn delete_subscription(&self, id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(id);
    let deleted = self
      .conn
      .call(move |conn| {
        let rows = conn.execute(
          "DELETE FROM subscriptions WHERE subscription_id = ?1",
          rusqlite::params![id_str],
        )?;
        Ok(rows > 0)
      })
      .await?;
    Ok(deleted)
  }
}
