//! Router-level tests driving the full API against an in-memory store.

use std::sync::Arc;

use axum::{
  Router,
  body::Body,
  http::{Method, Request, StatusCode, header},
};
use chrono::{Months, NaiveDate, Utc};
use polis_store_sqlite::SqliteStore;
use serde_json::{Value, json};
use tower::ServiceExt as _;

use crate::api_router;

async fn app() -> Router {
  let store = SqliteStore::open_in_memory()
    .await
    .expect("in-memory store");
  api_router(Arc::new(store))
}

fn today() -> NaiveDate { Utc::now().date_naive() }

fn years_ago(n: u32) -> NaiveDate {
  today()
    .checked_sub_months(Months::new(12 * n))
    .expect("date in range")
}

fn years_ahead(n: u32) -> NaiveDate {
  today()
    .checked_add_months(Months::new(12 * n))
    .expect("date in range")
}

/// Fire one request and return `(status, parsed body)`. An empty body
/// parses to `Value::Null`.
async fn send(
  app: &Router,
  method: Method,
  path: &str,
  body: Option<Value>,
) -> (StatusCode, Value) {
  let builder = Request::builder().method(method).uri(path);
  let request = match body {
    Some(v) => builder
      .header(header::CONTENT_TYPE, "application/json")
      .body(Body::from(v.to_string()))
      .expect("request"),
    None => builder.body(Body::empty()).expect("request"),
  };
  let response = app.clone().oneshot(request).await.expect("response");
  let status = response.status();
  let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
    .await
    .expect("body");
  let value = if bytes.is_empty() {
    Value::Null
  } else {
    serde_json::from_slice(&bytes).expect("json body")
  };
  (status, value)
}

fn self_href(resource: &Value) -> String {
  resource["_links"]["self"]["href"]
    .as_str()
    .expect("self link")
    .to_owned()
}

async fn create_customer(app: &Router) -> Value {
  let (status, body) = send(
    app,
    Method::POST,
    "/customers",
    Some(json!({
      "firstName": "Test",
      "lastName": "Tester",
      "email": "test.tester@example.com",
      "phoneNumber": "123456789",
      "birthDate": years_ago(1).to_string(),
    })),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED);
  body
}

async fn create_quotation(app: &Router, customer: &Value) -> Value {
  let (status, body) = send(
    app,
    Method::POST,
    "/quotations",
    Some(json!({
      "beginningOfInsurance": years_ago(1).to_string(),
      "insuredAmount": 1,
      "dateOfSigningMortgage": years_ago(1).to_string(),
      "customer": self_href(customer),
    })),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED);
  body
}

async fn create_subscription(app: &Router, quotation: &Value) -> Value {
  let (status, body) = send(
    app,
    Method::POST,
    "/subscriptions",
    Some(json!({
      "quotation": self_href(quotation),
      "startDate": years_ago(1).to_string(),
      "validUntil": years_ahead(1).to_string(),
    })),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED);
  body
}

// ─── Customers ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn customers_collection_is_hal_json() {
  let app = app().await;
  let response = app
    .clone()
    .oneshot(
      Request::builder()
        .method(Method::GET)
        .uri("/customers")
        .body(Body::empty())
        .expect("request"),
    )
    .await
    .expect("response");
  assert_eq!(response.status(), StatusCode::OK);
  assert_eq!(
    response
      .headers()
      .get(header::CONTENT_TYPE)
      .expect("content type"),
    "application/hal+json"
  );
}

#[tokio::test]
async fn customers_collection_lists_created_customers() {
  let app = app().await;
  create_customer(&app).await;
  create_customer(&app).await;

  let (status, body) = send(&app, Method::GET, "/customers", None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["_embedded"]["customers"].as_array().unwrap().len(), 2);
  assert_eq!(body["_links"]["self"]["href"], "/customers");
}

#[tokio::test]
async fn create_customer_returns_created_with_self_link() {
  let app = app().await;
  let customer = create_customer(&app).await;

  let id = customer["id"].as_str().expect("generated id");
  assert_eq!(self_href(&customer), format!("/customers/{id}"));
}

#[tokio::test]
async fn create_customer_with_future_birth_date_fails() {
  let app = app().await;
  let (status, body) = send(
    &app,
    Method::POST,
    "/customers",
    Some(json!({
      "firstName": "Test",
      "lastName": "Tester",
      "birthDate": years_ahead(1).to_string(),
    })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["errors"][0]["property"], "birthDate");
  assert_eq!(body["errors"][0]["code"], "birthDate.inFuture");
}

#[tokio::test]
async fn create_customer_with_birth_date_today_succeeds() {
  let app = app().await;
  let (status, _) = send(
    &app,
    Method::POST,
    "/customers",
    Some(json!({
      "firstName": "Test",
      "lastName": "Tester",
      "birthDate": today().to_string(),
    })),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn create_customer_with_missing_name_fails() {
  let app = app().await;
  let (status, body) = send(
    &app,
    Method::POST,
    "/customers",
    Some(json!({ "firstName": "Test" })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["errors"][0]["code"], "lastName.required");
}

#[tokio::test]
async fn create_customer_with_malformed_email_fails() {
  let app = app().await;
  let (status, body) = send(
    &app,
    Method::POST,
    "/customers",
    Some(json!({
      "firstName": "Test",
      "lastName": "Tester",
      "email": "not-an-email",
    })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["errors"][0]["code"], "email.invalid");
}

#[tokio::test]
async fn created_customer_round_trips() {
  let app = app().await;
  let customer = create_customer(&app).await;

  let (status, fetched) =
    send(&app, Method::GET, &self_href(&customer), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(fetched["firstName"], "Test");
  assert_eq!(fetched["lastName"], "Tester");
  assert_eq!(fetched["email"], "test.tester@example.com");
  assert_eq!(fetched["phoneNumber"], "123456789");
  assert_eq!(fetched["birthDate"], years_ago(1).to_string());
  assert_eq!(fetched["id"], customer["id"]);
}

#[tokio::test]
async fn get_missing_customer_is_not_found() {
  let app = app().await;
  let (status, _) = send(
    &app,
    Method::GET,
    &format!("/customers/{}", uuid::Uuid::new_v4()),
    None,
  )
  .await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn put_customer_replaces_every_field() {
  let app = app().await;
  let customer = create_customer(&app).await;
  let path = self_href(&customer);

  let updated_birth_date = years_ago(2);
  let (status, _) = send(
    &app,
    Method::PUT,
    &path,
    Some(json!({
      "firstName": "PutTest",
      "lastName": "PutTester",
      "email": "put.test.tester@example.com",
      "phoneNumber": "987654321",
      "birthDate": updated_birth_date.to_string(),
    })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);

  let (_, fetched) = send(&app, Method::GET, &path, None).await;
  assert_eq!(fetched["firstName"], "PutTest");
  assert_eq!(fetched["lastName"], "PutTester");
  assert_eq!(fetched["email"], "put.test.tester@example.com");
  assert_eq!(fetched["phoneNumber"], "987654321");
  assert_eq!(fetched["birthDate"], updated_birth_date.to_string());
  assert_eq!(fetched["id"], customer["id"]);
}

#[tokio::test]
async fn put_customer_clears_omitted_optional_fields() {
  let app = app().await;
  let customer = create_customer(&app).await;
  let path = self_href(&customer);

  // Full replace with only the required fields: the optionals must reset,
  // not survive from the previous representation.
  let (status, _) = send(
    &app,
    Method::PUT,
    &path,
    Some(json!({
      "firstName": "Test",
      "lastName": "Tester",
    })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);

  let (_, fetched) = send(&app, Method::GET, &path, None).await;
  assert_eq!(fetched["email"], Value::Null);
  assert_eq!(fetched["phoneNumber"], Value::Null);
  assert_eq!(fetched["birthDate"], Value::Null);
}

#[tokio::test]
async fn put_missing_customer_is_not_found() {
  let app = app().await;
  let (status, _) = send(
    &app,
    Method::PUT,
    &format!("/customers/{}", uuid::Uuid::new_v4()),
    Some(json!({ "firstName": "Test", "lastName": "Tester" })),
  )
  .await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn patch_customer_merges_single_field() {
  let app = app().await;
  let customer = create_customer(&app).await;
  let path = self_href(&customer);

  let (status, _) = send(
    &app,
    Method::PATCH,
    &path,
    Some(json!({ "firstName": "PatchTest" })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);

  let (_, fetched) = send(&app, Method::GET, &path, None).await;
  assert_eq!(fetched["firstName"], "PatchTest");
  assert_eq!(fetched["lastName"], "Tester");
  assert_eq!(fetched["email"], "test.tester@example.com");
  assert_eq!(fetched["phoneNumber"], "123456789");
  assert_eq!(fetched["birthDate"], years_ago(1).to_string());
}

#[tokio::test]
async fn patch_missing_customer_is_not_found() {
  let app = app().await;
  let (status, _) = send(
    &app,
    Method::PATCH,
    &format!("/customers/{}", uuid::Uuid::new_v4()),
    Some(json!({ "firstName": "UpdatedTest" })),
  )
  .await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_customer_then_get_is_not_found() {
  let app = app().await;
  let customer = create_customer(&app).await;
  let path = self_href(&customer);

  let (status, body) = send(&app, Method::DELETE, &path, None).await;
  assert_eq!(status, StatusCode::NO_CONTENT);
  assert_eq!(body, Value::Null);

  let (status, _) = send(&app, Method::GET, &path, None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_missing_customer_is_not_found() {
  let app = app().await;
  let (status, _) = send(
    &app,
    Method::DELETE,
    &format!("/customers/{}", uuid::Uuid::new_v4()),
    None,
  )
  .await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

// ─── Quotations ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn quotations_collection_lists_created_quotations() {
  let app = app().await;
  let customer = create_customer(&app).await;
  create_quotation(&app, &customer).await;

  let (status, body) = send(&app, Method::GET, "/quotations", None).await;
  assert_eq!(status, StatusCode::OK);
  assert!(body["_embedded"]["quotations"].is_array());
  assert_eq!(body["_embedded"]["quotations"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn create_quotation_links_customer() {
  let app = app().await;
  let customer = create_customer(&app).await;
  let quotation = create_quotation(&app, &customer).await;

  assert_eq!(
    quotation["_links"]["customer"]["href"],
    self_href(&customer)
  );
  assert_eq!(quotation["insuredAmount"], 1);
  // The reference is a link, never a plain id field.
  assert!(quotation.get("customerId").is_none());
}

#[tokio::test]
async fn create_quotation_with_unresolved_customer_fails() {
  let app = app().await;
  let (status, body) = send(
    &app,
    Method::POST,
    "/quotations",
    Some(json!({
      "insuredAmount": 1,
      "customer": format!("/customers/{}", uuid::Uuid::new_v4()),
    })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["error"].as_str().unwrap().contains("does not resolve"));
}

#[tokio::test]
async fn create_quotation_with_malformed_reference_fails() {
  let app = app().await;
  let (status, _) = send(
    &app,
    Method::POST,
    "/quotations",
    Some(json!({
      "insuredAmount": 1,
      "customer": "/nonsense/abc",
    })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn create_quotation_without_customer_fails() {
  let app = app().await;
  let (status, body) = send(
    &app,
    Method::POST,
    "/quotations",
    Some(json!({ "insuredAmount": 1 })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["errors"][0]["property"], "customer");
  assert_eq!(body["errors"][0]["code"], "customer.required");
}

#[tokio::test]
async fn create_quotation_with_negative_amount_fails() {
  let app = app().await;
  let customer = create_customer(&app).await;
  let (status, body) = send(
    &app,
    Method::POST,
    "/quotations",
    Some(json!({
      "insuredAmount": -1,
      "customer": self_href(&customer),
    })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["errors"][0]["code"], "insuredAmount.negative");
}

#[tokio::test]
async fn put_quotation_updates_dates() {
  let app = app().await;
  let customer = create_customer(&app).await;
  let quotation = create_quotation(&app, &customer).await;
  let path = self_href(&quotation);

  let updated_signing = years_ago(2);
  let updated_beginning = years_ahead(1);
  let (status, _) = send(
    &app,
    Method::PUT,
    &path,
    Some(json!({
      "beginningOfInsurance": updated_beginning.to_string(),
      "insuredAmount": 2,
      "dateOfSigningMortgage": updated_signing.to_string(),
      "customer": self_href(&customer),
    })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);

  let (_, fetched) = send(&app, Method::GET, &path, None).await;
  assert_eq!(fetched["beginningOfInsurance"], updated_beginning.to_string());
  assert_eq!(fetched["dateOfSigningMortgage"], updated_signing.to_string());
  assert_eq!(fetched["insuredAmount"], 2);
  assert_eq!(fetched["_links"]["customer"]["href"], self_href(&customer));
}

#[tokio::test]
async fn patch_quotation_keeps_customer() {
  let app = app().await;
  let customer = create_customer(&app).await;
  let quotation = create_quotation(&app, &customer).await;
  let path = self_href(&quotation);

  let (status, _) = send(
    &app,
    Method::PATCH,
    &path,
    Some(json!({ "insuredAmount": 5 })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);

  let (_, fetched) = send(&app, Method::GET, &path, None).await;
  assert_eq!(fetched["insuredAmount"], 5);
  assert_eq!(fetched["beginningOfInsurance"], years_ago(1).to_string());
  assert_eq!(fetched["_links"]["customer"]["href"], self_href(&customer));
}

#[tokio::test]
async fn delete_quotation_then_get_is_not_found() {
  let app = app().await;
  let customer = create_customer(&app).await;
  let quotation = create_quotation(&app, &customer).await;
  let path = self_href(&quotation);

  let (status, _) = send(&app, Method::DELETE, &path, None).await;
  assert_eq!(status, StatusCode::NO_CONTENT);

  let (status, _) = send(&app, Method::GET, &path, None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

// ─── Subscriptions ───────────────────────────────────────────────────────────

#[tokio::test]
async fn subscriptions_collection_lists_created_subscriptions() {
  let app = app().await;
  let customer = create_customer(&app).await;
  let quotation = create_quotation(&app, &customer).await;
  create_subscription(&app, &quotation).await;

  let (status, body) = send(&app, Method::GET, "/subscriptions", None).await;
  assert_eq!(status, StatusCode::OK);
  assert!(body["_embedded"]["subscriptions"].is_array());
}

#[tokio::test]
async fn create_subscription_with_equal_dates_succeeds() {
  let app = app().await;
  let customer = create_customer(&app).await;
  let quotation = create_quotation(&app, &customer).await;

  // The ordering rule is non-strict: equal dates are valid.
  let date = years_ago(1).to_string();
  let (status, body) = send(
    &app,
    Method::POST,
    "/subscriptions",
    Some(json!({
      "quotation": self_href(&quotation),
      "startDate": date,
      "validUntil": date,
    })),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(
    body["_links"]["quotation"]["href"],
    self_href(&quotation)
  );
}

#[tokio::test]
async fn create_subscription_with_valid_until_before_start_fails() {
  let app = app().await;
  let customer = create_customer(&app).await;
  let quotation = create_quotation(&app, &customer).await;

  let start = years_ahead(1);
  let until = years_ago(1);
  let (status, body) = send(
    &app,
    Method::POST,
    "/subscriptions",
    Some(json!({
      "quotation": self_href(&quotation),
      "startDate": start.to_string(),
      "validUntil": until.to_string(),
    })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["errors"][0]["property"], "validUntil");
  assert_eq!(body["errors"][0]["code"], "validUntil.beforeStartDate");
  assert_eq!(
    body["errors"][0]["message"],
    format!(
      "The <validUntil> field must be after startDate <{start}> \
       but is <{until}>"
    )
  );
}

#[tokio::test]
async fn create_subscription_with_unresolved_quotation_fails() {
  let app = app().await;
  let (status, _) = send(
    &app,
    Method::POST,
    "/subscriptions",
    Some(json!({
      "quotation": format!("/quotations/{}", uuid::Uuid::new_v4()),
      "startDate": years_ago(1).to_string(),
    })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn put_subscription_replaces_dates() {
  let app = app().await;
  let customer = create_customer(&app).await;
  let quotation = create_quotation(&app, &customer).await;
  let subscription = create_subscription(&app, &quotation).await;
  let path = self_href(&subscription);

  let updated_start = years_ago(2);
  let updated_until = years_ahead(2);
  let (status, _) = send(
    &app,
    Method::PUT,
    &path,
    Some(json!({
      "quotation": self_href(&quotation),
      "startDate": updated_start.to_string(),
      "validUntil": updated_until.to_string(),
    })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);

  let (_, fetched) = send(&app, Method::GET, &path, None).await;
  assert_eq!(fetched["startDate"], updated_start.to_string());
  assert_eq!(fetched["validUntil"], updated_until.to_string());
  assert_eq!(
    fetched["_links"]["quotation"]["href"],
    self_href(&quotation)
  );
}

#[tokio::test]
async fn put_subscription_without_quotation_fails() {
  let app = app().await;
  let customer = create_customer(&app).await;
  let quotation = create_quotation(&app, &customer).await;
  let subscription = create_subscription(&app, &quotation).await;

  let (status, body) = send(
    &app,
    Method::PUT,
    &self_href(&subscription),
    Some(json!({ "startDate": years_ago(1).to_string() })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["errors"][0]["code"], "quotation.required");
}

#[tokio::test]
async fn patch_valid_until_against_stored_start_date_fails() {
  let app = app().await;
  let customer = create_customer(&app).await;
  let quotation = create_quotation(&app, &customer).await;
  let subscription = create_subscription(&app, &quotation).await;

  // The stored startDate is one year ago. Patching only validUntil must
  // validate against the merged state and trip the ordering rule.
  let (status, body) = send(
    &app,
    Method::PATCH,
    &self_href(&subscription),
    Some(json!({ "validUntil": years_ago(2).to_string() })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["errors"][0]["code"], "validUntil.beforeStartDate");
}

#[tokio::test]
async fn patch_valid_until_extends_subscription() {
  let app = app().await;
  let customer = create_customer(&app).await;
  let quotation = create_quotation(&app, &customer).await;
  let subscription = create_subscription(&app, &quotation).await;
  let path = self_href(&subscription);

  let updated_until = years_ahead(2);
  let (status, _) = send(
    &app,
    Method::PATCH,
    &path,
    Some(json!({ "validUntil": updated_until.to_string() })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);

  let (_, fetched) = send(&app, Method::GET, &path, None).await;
  assert_eq!(fetched["validUntil"], updated_until.to_string());
  assert_eq!(fetched["startDate"], years_ago(1).to_string());
}

#[tokio::test]
async fn delete_subscription_then_get_is_not_found() {
  let app = app().await;
  let customer = create_customer(&app).await;
  let quotation = create_quotation(&app, &customer).await;
  let subscription = create_subscription(&app, &quotation).await;
  let path = self_href(&subscription);

  let (status, _) = send(&app, Method::DELETE, &path, None).await;
  assert_eq!(status, StatusCode::NO_CONTENT);

  let (status, _) = send(&app, Method::GET, &path, None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);

  let (status, _) = send(&app, Method::DELETE, &path, None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}
