// warikan-client/tests/client_integration.rs
// Integration tests against a mock settle-up backend

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use axum::extract::{Multipart, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use tokio::net::TcpListener;

use shared::models::{SettlementPayload, UserCost};
use shared::{Group, GroupUser, ListResponse, ReceiptItem, ReceiptParseResult};
use warikan_client::{ClientConfig, ClientError, HttpClient, RetryPolicy};

#[derive(Clone, Default)]
struct MockState {
    transaction_attempts: Arc<AtomicU32>,
    fail_first: Arc<AtomicU32>,
}

#[derive(Deserialize)]
struct UsersQuery {
    group_id: i64,
}

async fn list_groups() -> Json<ListResponse<Group>> {
    Json(ListResponse::new(vec![
        Group {
            id: 1,
            name: "Trip to Kyoto".into(),
        },
        Group {
            id: 2,
            name: "Flatmates".into(),
        },
    ]))
}

async fn list_users(
    Query(query): Query<UsersQuery>,
) -> Result<Json<ListResponse<GroupUser>>, StatusCode> {
    if query.group_id != 2 {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(Json(ListResponse::new(vec![
        GroupUser {
            id: 10,
            name: "Aki".into(),
        },
        GroupUser {
            id: 11,
            name: "Ben".into(),
        },
    ])))
}

async fn create_transaction(
    State(state): State<MockState>,
    headers: HeaderMap,
    Json(payload): Json<SettlementPayload>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    if auth != "Bearer test-token" {
        return Err(StatusCode::UNAUTHORIZED);
    }

    let attempt = state.transaction_attempts.fetch_add(1, Ordering::SeqCst) + 1;
    if attempt <= state.fail_first.load(Ordering::SeqCst) {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }

    if payload.group_id != 2 || payload.member_costs.is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }

    Ok(Json(serde_json::json!({ "id": 77 })))
}

async fn upload_receipt(mut multipart: Multipart) -> Result<Json<ReceiptParseResult>, StatusCode> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| StatusCode::BAD_REQUEST)?
    {
        if field.name() == Some("file") {
            let data = field.bytes().await.map_err(|_| StatusCode::BAD_REQUEST)?;
            if data.is_empty() {
                return Err(StatusCode::BAD_REQUEST);
            }
            return Ok(Json(ReceiptParseResult {
                items: vec![ReceiptItem::new("Ramen", "ラーメン", 0, 950.0, 1)],
                total: Some(1045.0),
                receipt_date: chrono::NaiveDate::from_ymd_opt(2024, 5, 12),
                image_url: Some("https://cdn.example.com/receipts/abc.jpg".into()),
            }));
        }
    }
    Err(StatusCode::BAD_REQUEST)
}

/// Start the mock backend on an ephemeral port, return base URL and state
async fn start_mock() -> (String, MockState) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();

    let state = MockState::default();
    let app = Router::new()
        .route("/api/v1/settle-up/groups/", get(list_groups))
        .route("/api/v1/settle-up/users/", get(list_users))
        .route("/api/v1/settle-up/transactions/", post(create_transaction))
        .route("/api/v1/receipts/receipt-items/", post(upload_receipt))
        .with_state(state.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{addr}"), state)
}

fn client(base_url: &str) -> HttpClient {
    ClientConfig::new(base_url)
        .with_token("test-token")
        .with_timeout(5)
        .build_http_client()
        .with_retry_policy(RetryPolicy {
            max_attempts: 3,
            base_delay: Duration::from_millis(10),
            max_delay: Duration::from_millis(40),
        })
}

fn payload() -> SettlementPayload {
    SettlementPayload {
        purpose: "Izakaya dinner".into(),
        group_id: 2,
        paying_member_id: 10,
        tax_percentage: 10.0,
        total_amount: 1045.0,
        member_costs: vec![UserCost {
            user_id: 11,
            amount: 950.0,
        }],
        split_receipt_items: vec![],
        receipt_date: None,
        receipt_image_url: None,
    }
}

#[tokio::test]
async fn test_list_groups() {
    let (url, _) = start_mock().await;
    let groups = client(&url).groups().await.unwrap();

    assert_eq!(groups.count, 2);
    // Default selection is the last returned group
    assert_eq!(groups.last().unwrap().name, "Flatmates");
}

#[tokio::test]
async fn test_list_group_users() {
    let (url, _) = start_mock().await;
    let users = client(&url).group_users(2).await.unwrap();

    assert_eq!(users.count, 2);
    assert_eq!(users.items[0].name, "Aki");
}

#[tokio::test]
async fn test_unknown_group_is_not_found() {
    let (url, _) = start_mock().await;
    let err = client(&url).group_users(99).await.unwrap_err();
    assert!(matches!(err, ClientError::NotFound(_)));
}

#[tokio::test]
async fn test_create_transaction() {
    let (url, state) = start_mock().await;
    let resp = client(&url).create_transaction(&payload()).await.unwrap();

    assert_eq!(resp.id, Some(77));
    assert_eq!(state.transaction_attempts.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    let (url, _) = start_mock().await;
    let client = ClientConfig::new(&url).build_http_client();

    let err = client.create_transaction(&payload()).await.unwrap_err();
    assert!(matches!(err, ClientError::Unauthorized));
}

#[tokio::test]
async fn test_invalid_payload_is_validation_error() {
    let (url, _) = start_mock().await;
    let mut bad = payload();
    bad.member_costs.clear();

    let err = client(&url).create_transaction(&bad).await.unwrap_err();
    assert!(matches!(err, ClientError::Validation(_)));
}

#[tokio::test]
async fn test_sync_retries_transient_failures() {
    let (url, state) = start_mock().await;
    state.fail_first.store(2, Ordering::SeqCst);

    let resp = client(&url).sync_transaction(&payload()).await.unwrap();

    assert_eq!(resp.id, Some(77));
    assert_eq!(state.transaction_attempts.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_sync_gives_up_after_three_attempts() {
    let (url, state) = start_mock().await;
    state.fail_first.store(10, Ordering::SeqCst);

    let err = client(&url).sync_transaction(&payload()).await.unwrap_err();

    assert!(matches!(err, ClientError::Internal(_)));
    assert_eq!(state.transaction_attempts.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_upload_receipt() {
    let (url, _) = start_mock().await;
    let parsed = client(&url)
        .upload_receipt(vec![0xFF, 0xD8, 0xFF, 0xE0], "receipt.jpg")
        .await
        .unwrap();

    assert_eq!(parsed.items.len(), 1);
    assert_eq!(parsed.items[0].display_name(), "Ramen");
    assert_eq!(parsed.total, Some(1045.0));
}
