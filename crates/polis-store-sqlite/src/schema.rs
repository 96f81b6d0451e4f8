//! SQL schema for the Polis SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS customers (
    customer_id  TEXT PRIMARY KEY,
    first_name   TEXT NOT NULL,
    last_name    TEXT NOT NULL,
    middle_name  TEXT,
    email        TEXT,
    phone_number TEXT,
    birth_date   TEXT             -- ISO 8601 calendar date
);

CREATE TABLE IF NOT EXISTS quotations (
    quotation_id             TEXT PRIMARY KEY,
    beginning_of_insurance   TEXT,
    insured_amount           INTEGER,  -- currency subunits
    date_of_signing_mortgage TEXT,
    customer_id              TEXT NOT NULL REFERENCES customers(customer_id)
);

CREATE TABLE IF NOT EXISTS subscriptions (
    subscription_id TEXT PRIMARY KEY,
    quotation_id    TEXT NOT NULL REFERENCES quotations(quotation_id),
    start_date      TEXT,
    valid_until     TEXT
);

CREATE INDEX IF NOT EXISTS quotations_customer_idx     ON quotations(customer_id);
CREATE INDEX IF NOT EXISTS subscriptions_quotation_idx ON subscriptions(quotation_id);

PRAGMA user_version = 1;
";
