//! End-to-end tests for the HTTP interface
//!
//! Each test builds a fresh router over a funded ledger and drives it with
//! `tower::ServiceExt::oneshot`, so no socket is opened.

use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use rust_transfer_service::api::{router, AppState, ServiceResponse};
use rust_transfer_service::core::{AccountService, Ledger};
use rust_transfer_service::types::{Currency, Transfer, TransferStatus};
use rust_decimal::Decimal;
use serde_json::{json, Value};
use std::str::FromStr;
use std::sync::Arc;
use tower::ServiceExt;

const PL_ACCOUNT: &str = "PL61109010140000071219812874";
const CZ_ACCOUNT: &str = "CZ6508000000192000145399";
const US_ACCOUNT: &str = "US122000103040445550000000";

fn create_body() -> Value {
    json!({
        "source": PL_ACCOUNT,
        "destination": CZ_ACCOUNT,
        "amount": "340.23",
        "currency": "PLN",
        "title": "przełew własny"
    })
}

fn create2_body() -> Value {
    json!({
        "source": US_ACCOUNT,
        "destination": PL_ACCOUNT,
        "amount": "1200.00",
        "currency": "USD",
        "title": "rent"
    })
}

fn create3_body() -> Value {
    json!({
        "source": CZ_ACCOUNT,
        "destination": US_ACCOUNT,
        "amount": "999.99",
        "currency": "SEK",
        "title": "zakupy"
    })
}

struct TestApp {
    router: Router,
    ledger: Arc<Ledger>,
}

impl TestApp {
    fn new() -> Self {
        let ledger = Arc::new(Ledger::new());
        let pln: Currency = "PLN".parse().unwrap();
        for account in [PL_ACCOUNT, CZ_ACCOUNT, US_ACCOUNT] {
            ledger.create_account(account, &pln);
            ledger.deposit(account, Decimal::new(10_000, 0), &pln, "seed");
        }
        let state = AppState::new(Arc::clone(&ledger));
        Self {
            router: router(state),
            ledger,
        }
    }

    async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, bytes.to_vec())
    }

    async fn envelope(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, ServiceResponse) {
        let (status, bytes) = self.send(method, uri, body).await;
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    async fn list(&self, query: &str) -> Vec<Transfer> {
        let (status, bytes) = self.send(Method::GET, &format!("/transfer{}", query), None).await;
        assert_eq!(status, StatusCode::OK);
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn create(&self, body: Value) -> Transfer {
        let (status, response) = self.envelope(Method::POST, "/transfer", Some(body)).await;
        assert_eq!(status, StatusCode::CREATED);
        serde_json::from_value(response.data).unwrap()
    }

    async fn create_all(&self) {
        self.create(create_body()).await;
        self.create(create2_body()).await;
        self.create(create3_body()).await;
    }
}

#[tokio::test]
async fn test_create_transfer() {
    let app = TestApp::new();

    let (status, response) = app.envelope(Method::POST, "/transfer", Some(create_body())).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(response.status, TransferStatus::Pending);
    assert_eq!(response.message, "Transfer successfully created");
    let transfer: Transfer = serde_json::from_value(response.data).unwrap();
    assert_eq!(transfer.status, TransferStatus::Pending);
    assert_eq!(transfer.source, PL_ACCOUNT);
    assert_eq!(transfer.destination, CZ_ACCOUNT);
    assert_eq!(transfer.amount, Decimal::from_str("340.23").unwrap());
    assert_eq!(transfer.currency.code(), "PLN");
    assert_eq!(transfer.title, "przełew własny");
}

#[tokio::test]
async fn test_create_serializes_amount_as_text() {
    let app = TestApp::new();
    let (_, bytes) = app.send(Method::POST, "/transfer", Some(create_body())).await;
    let raw: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(raw["data"]["amount"], "340.23");
    assert_eq!(raw["data"]["currency"], "PLN");
    assert_eq!(raw["status"], "PENDING");
}

#[tokio::test]
async fn test_created_ids_are_distinct() {
    let app = TestApp::new();
    let a = app.create(create_body()).await;
    let b = app.create(create_body()).await;
    assert_ne!(a.id, b.id);
}

#[tokio::test]
async fn test_create_with_invalid_amount_fails() {
    let app = TestApp::new();
    let mut body = create_body();
    body["amount"] = json!("34a0.23");

    let (status, response) = app.envelope(Method::POST, "/transfer", Some(body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response.status, TransferStatus::Error);
    assert_eq!(response.message, "Error occurred. Transfer not created.");
    assert!(app.list("").await.is_empty());
}

#[tokio::test]
async fn test_create_with_invalid_currency_fails() {
    let app = TestApp::new();
    let mut body = create_body();
    body["currency"] = json!("XYZ");

    let (status, response) = app.envelope(Method::POST, "/transfer", Some(body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response.status, TransferStatus::Error);
    assert_eq!(response.message, "Error occurred. Transfer not created.");
    assert!(app.list("").await.is_empty());
}

#[tokio::test]
async fn test_create_with_malformed_json_fails() {
    let app = TestApp::new();
    let (status, response) = app
        .envelope(Method::POST, "/transfer", Some(json!({"source": PL_ACCOUNT})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response.status, TransferStatus::Error);
}

#[tokio::test]
async fn test_get_transfer_by_id() {
    let app = TestApp::new();
    let created = app.create(create_body()).await;

    let (status, response) = app
        .envelope(Method::GET, &format!("/transfer/{}", created.id), None)
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(response.status, TransferStatus::Pending);
    assert_eq!(response.message, "Transfer details successfully retrieved");
    let transfer: Transfer = serde_json::from_value(response.data).unwrap();
    assert_eq!(transfer.id, created.id);
    assert_eq!(transfer.amount, Decimal::from_str("340.23").unwrap());
    assert_eq!(transfer.title, "przełew własny");
}

#[tokio::test]
async fn test_get_unknown_transfer_is_not_found() {
    let app = TestApp::new();

    let (status, response) = app.envelope(Method::GET, "/transfer/missing", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(response.status, TransferStatus::Error);
    assert_eq!(response.message, "No transfer with such id found");
    assert_eq!(response.data, Value::Null);
}

#[tokio::test]
async fn test_get_all_transfers() {
    let app = TestApp::new();
    let a = app.create(create_body()).await;
    let b = app.create(create2_body()).await;
    let c = app.create(create3_body()).await;

    let ids: Vec<String> = app.list("").await.into_iter().map(|t| t.id).collect();

    assert_eq!(ids, vec![a.id, b.id, c.id]);
}

#[tokio::test]
async fn test_sorted_by_currency() {
    let app = TestApp::new();
    app.create_all().await;

    let listed = app.list("?sort=currency&order=asc").await;

    assert_eq!(listed[0].currency.code(), "PLN");
}

#[tokio::test]
async fn test_sorted_by_currency_reversed_limited() {
    let app = TestApp::new();
    app.create_all().await;

    let listed = app.list("?sort=currency&order=desc&limit=2").await;

    let currencies: Vec<&str> = listed.iter().map(|t| t.currency.code()).collect();
    assert_eq!(currencies, vec!["USD", "SEK"]);
}

#[tokio::test]
async fn test_sorted_by_amount() {
    let app = TestApp::new();
    app.create_all().await;

    let listed = app.list("?sort=amount&limit=1").await;

    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].amount, Decimal::from_str("340.23").unwrap());
}

#[tokio::test]
async fn test_sorted_by_title() {
    let app = TestApp::new();
    app.create_all().await;

    let listed = app.list("?sort=title&limit=1").await;

    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].title, "przełew własny");
}

#[tokio::test]
async fn test_invalid_sort_field() {
    let app = TestApp::new();
    app.create_all().await;

    let (status, response) = app.envelope(Method::GET, "/transfer?sort=address", None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response.status, TransferStatus::Error);
    assert_eq!(response.message, "Invalid field name in query parameter 'sort'");
}

#[tokio::test]
async fn test_invalid_limit() {
    let app = TestApp::new();
    let (status, response) = app.envelope(Method::GET, "/transfer?limit=1A", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response.message, "Invalid numeric value in query parameter 'limit'");
}

#[tokio::test]
async fn test_filter_by_currency() {
    let app = TestApp::new();
    app.create_all().await;

    let listed = app.list("?currency=USD").await;

    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].currency.code(), "USD");
}

#[tokio::test]
async fn test_filter_by_amount() {
    let app = TestApp::new();
    app.create_all().await;

    let listed = app.list("?amount=340.23").await;

    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].amount, Decimal::from_str("340.23").unwrap());
}

#[tokio::test]
async fn test_filter_by_source_account() {
    let app = TestApp::new();
    app.create_all().await;

    let listed = app.list(&format!("?source={}", US_ACCOUNT)).await;

    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].source, US_ACCOUNT);
}

#[tokio::test]
async fn test_filter_by_status_is_case_insensitive() {
    let app = TestApp::new();
    app.create_all().await;

    let listed = app.list("?status=PeNding").await;

    assert_eq!(listed.len(), 3);
    assert!(listed.iter().all(|t| t.status == TransferStatus::Pending));
}

#[tokio::test]
async fn test_cancel_created_transfer() {
    let app = TestApp::new();
    let created = app.create(create_body()).await;

    let (status, response) = app
        .envelope(Method::DELETE, &format!("/transfer/{}", created.id), None)
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(response.status, TransferStatus::Cancelled);
    assert_eq!(response.message, "Transfer cancelled");
    let transfer: Transfer = serde_json::from_value(response.data).unwrap();
    assert_eq!(transfer.id, created.id);
    assert_eq!(transfer.status, TransferStatus::Cancelled);
}

#[tokio::test]
async fn test_execute_created_transfer() {
    let app = TestApp::new();
    let pln: Currency = "PLN".parse().unwrap();
    let created = app.create(create_body()).await;

    let (status, response) = app
        .envelope(Method::PUT, &format!("/transfer/{}", created.id), None)
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(response.status, TransferStatus::Completed);
    assert_eq!(response.message, "Transfer executed");
    let transfer: Transfer = serde_json::from_value(response.data).unwrap();
    assert_eq!(transfer.id, created.id);
    assert_eq!(transfer.status, TransferStatus::Completed);

    assert_eq!(
        app.ledger.balance(PL_ACCOUNT, &pln),
        Some(Decimal::from_str("9659.77").unwrap())
    );
    assert_eq!(
        app.ledger.balance(CZ_ACCOUNT, &pln),
        Some(Decimal::from_str("10340.23").unwrap())
    );
}

#[tokio::test]
async fn test_cancel_completed_transfer_fails() {
    let app = TestApp::new();
    let created = app.create(create_body()).await;
    let uri = format!("/transfer/{}", created.id);
    app.send(Method::PUT, &uri, None).await;

    let (status, response) = app.envelope(Method::DELETE, &uri, None).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(response.status, TransferStatus::Error);
    assert_eq!(response.message, "Transfer cancellation not possible");
    let transfer: Transfer = serde_json::from_value(response.data).unwrap();
    assert_eq!(transfer.id, created.id);
    assert_eq!(transfer.status, TransferStatus::Completed);
}

#[tokio::test]
async fn test_execute_cancelled_transfer_fails() {
    let app = TestApp::new();
    let created = app.create(create_body()).await;
    let uri = format!("/transfer/{}", created.id);
    app.send(Method::DELETE, &uri, None).await;

    let (status, response) = app.envelope(Method::PUT, &uri, None).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(response.status, TransferStatus::Error);
    assert_eq!(response.message, "Transfer execution not possible");
    let transfer: Transfer = serde_json::from_value(response.data).unwrap();
    assert_eq!(transfer.status, TransferStatus::Cancelled);
}

#[tokio::test]
async fn test_execute_twice_fails() {
    let app = TestApp::new();
    let created = app.create(create_body()).await;
    let uri = format!("/transfer/{}", created.id);

    let (first, _) = app.send(Method::PUT, &uri, None).await;
    let (second, response) = app.envelope(Method::PUT, &uri, None).await;

    assert_eq!(first, StatusCode::OK);
    assert_eq!(second, StatusCode::CONFLICT);
    let transfer: Transfer = serde_json::from_value(response.data).unwrap();
    assert_eq!(transfer.status, TransferStatus::Completed);
}

#[tokio::test]
async fn test_execute_with_insufficient_funds_stays_pending() {
    let app = TestApp::new();
    let mut body = create_body();
    body["amount"] = json!("20000");
    let created = app.create(body).await;

    let (status, response) = app
        .envelope(Method::PUT, &format!("/transfer/{}", created.id), None)
        .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(response.message, "Transfer execution not possible");
    let transfer: Transfer = serde_json::from_value(response.data).unwrap();
    assert_eq!(transfer.status, TransferStatus::Pending);
}

#[rstest::rstest]
#[case::execute(Method::PUT)]
#[case::cancel(Method::DELETE)]
#[tokio::test]
async fn test_transition_on_unknown_id_is_not_found(#[case] method: Method) {
    let app = TestApp::new();

    let (status, response) = app.envelope(method, "/transfer/missing", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(response.message, "No transfer with such id found");
}

#[tokio::test]
async fn test_delete_all_transfers() {
    let app = TestApp::new();
    app.create_all().await;

    let (status, bytes) = app.send(Method::DELETE, "/deleteAllTransfers", None).await;

    assert_eq!(status, StatusCode::OK);
    assert!(bytes.is_empty());
    assert!(app.list("").await.is_empty());
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::new();
    let (status, bytes) = app.send(Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body, json!({"status": "ok"}));
}
