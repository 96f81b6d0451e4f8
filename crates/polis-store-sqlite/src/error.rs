//! Error type for `polis-store-sqlite`.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date parse error: {0}")]
  DateParse(String),

  /// A quotation write referenced a customer that does not exist.
  #[error("customer not found: {0}")]
  CustomerNotFound(Uuid),

  /// A subscription write referenced a quotation that does not exist.
  #[error("quotation not found: {0}")]
  QuotationNotFound(Uuid),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
