//! クエリAPIと構成管理APIの統合テスト

mod support;

use app_monitor_common::types::AppSnapshot;
use chrono::Utc;
use reqwest::Client;
use serde_json::{json, Value};
use support::spawn_test_server;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_unknown_application_reports_unmeasured() {
    let (addr, _state) = spawn_test_server().await;
    let client = Client::new();

    let response = client
        .get(format!("http://{}/api/applications/999/health", addr))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["healthy"], Value::Null);
    assert_eq!(body["active_users"], Value::Null);
    assert_eq!(body["last_checked"], Value::Null);
}

#[tokio::test]
async fn test_application_health_served_from_cache() {
    let (addr, state) = spawn_test_server().await;

    // ポーラーが書き込んだ状態を模擬する
    state
        .cache
        .put_application(
            1,
            AppSnapshot {
                healthy: true,
                active_users: 42,
                checked_at: Utc::now(),
            },
        )
        .await;

    let client = Client::new();
    let body: Value = client
        .get(format!("http://{}/api/applications/1/health", addr))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["healthy"], json!(true));
    assert_eq!(body["active_users"], json!(42));
    assert!(body["last_checked"].is_string());
}

#[tokio::test]
async fn test_unknown_interface_reports_unmeasured() {
    let (addr, _state) = spawn_test_server().await;
    let client = Client::new();

    let body: Value = client
        .get(format!("http://{}/api/interfaces/5/health", addr))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["measured"], json!(false));
    assert_eq!(body["inbound"], Value::Null);
    assert_eq!(body["outbound"], Value::Null);
}

#[tokio::test]
async fn test_probe_now_bypasses_cache() {
    let (addr, _state) = spawn_test_server().await;

    let target = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&target)
        .await;

    let client = Client::new();
    let body: Value = client
        .post(format!("http://{}/api/probe", addr))
        .json(&json!({ "url": target.uri() }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["reachable"], json!(true));
    assert_eq!(body["http_status"], json!(200));
}

#[tokio::test]
async fn test_probe_now_strict_mode_rejects_non_200() {
    let (addr, _state) = spawn_test_server().await;

    let target = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(302))
        .mount(&target)
        .await;

    let client = Client::new();
    let body: Value = client
        .post(format!("http://{}/api/probe", addr))
        .json(&json!({ "url": target.uri(), "mode": "strict" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["reachable"], json!(false));
    assert_eq!(body["http_status"], json!(302));
}

#[tokio::test]
async fn test_probe_now_rejects_non_http_url() {
    let (addr, _state) = spawn_test_server().await;
    let client = Client::new();

    let response = client
        .post(format!("http://{}/api/probe", addr))
        .json(&json!({ "url": "ftp://example.com" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn test_application_crud_flow() {
    let (addr, _state) = spawn_test_server().await;
    let client = Client::new();
    let base = format!("http://{}", addr);

    // 登録
    let created = client
        .post(format!("{}/api/applications", base))
        .json(&json!({
            "name": "ERP",
            "environment": "production",
            "app_health_url": "http://erp.local/health",
            "active_users_url": "http://erp.local/users"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(created.status(), 201);
    let created: Value = created.json().await.unwrap();
    let app_id = created["id"].as_i64().unwrap();

    // 一覧（未計測なのでstatusはnull）
    let list: Value = client
        .get(format!("{}/api/applications", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(list.as_array().unwrap().len(), 1);
    assert_eq!(list[0]["name"], json!("ERP"));
    assert_eq!(list[0]["status"], Value::Null);

    // 更新
    let updated: Value = client
        .put(format!("{}/api/applications/{}", base, app_id))
        .json(&json!({
            "name": "ERP v2",
            "environment": "production",
            "app_health_url": "http://erp.local/health",
            "active_users_url": "http://erp.local/users"
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(updated["name"], json!("ERP v2"));

    // 非アクティブ化
    let deactivated: Value = client
        .post(format!("{}/api/applications/{}/deactivate", base, app_id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(deactivated["is_active"], json!(false));
}

#[tokio::test]
async fn test_activate_unknown_application_is_404() {
    let (addr, _state) = spawn_test_server().await;
    let client = Client::new();

    let response = client
        .post(format!("http://{}/api/applications/999/activate", addr))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_create_application_rejects_invalid_url() {
    let (addr, _state) = spawn_test_server().await;
    let client = Client::new();

    let response = client
        .post(format!("http://{}/api/applications", addr))
        .json(&json!({
            "name": "Broken",
            "environment": "dev",
            "app_health_url": "not-a-url",
            "active_users_url": "http://ok.local/users"
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn test_endpoint_upsert_flow_and_invalid_direction() {
    let (addr, _state) = spawn_test_server().await;
    let client = Client::new();
    let base = format!("http://{}", addr);

    let app: Value = client
        .post(format!("{}/api/applications", base))
        .json(&json!({
            "name": "ERP",
            "environment": "dev",
            "app_health_url": "http://erp.local/health",
            "active_users_url": "http://erp.local/users"
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let interface: Value = client
        .post(format!(
            "{}/api/applications/{}/interfaces",
            base,
            app["id"].as_i64().unwrap()
        ))
        .json(&json!({ "target_system_name": "SAP" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let interface_id = interface["id"].as_i64().unwrap();

    // INBOUNDエンドポイントを登録
    let endpoint: Value = client
        .put(format!(
            "{}/api/interfaces/{}/endpoints/INBOUND",
            base, interface_id
        ))
        .json(&json!({
            "connectivity_url": "http://sap.local/ping",
            "transaction_count_url": "http://sap.local/total",
            "error_count_url": "http://sap.local/errors"
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(endpoint["direction"], json!("INBOUND"));

    let endpoints: Value = client
        .get(format!("{}/api/interfaces/{}/endpoints", base, interface_id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(endpoints.as_array().unwrap().len(), 1);

    // 不正な方向は400
    let response = client
        .put(format!(
            "{}/api/interfaces/{}/endpoints/SIDEWAYS",
            base, interface_id
        ))
        .json(&json!({
            "connectivity_url": "http://sap.local/ping",
            "transaction_count_url": "http://sap.local/total",
            "error_count_url": "http://sap.local/errors"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn test_service_health_endpoint() {
    let (addr, _state) = spawn_test_server().await;
    let client = Client::new();

    let body: Value = client
        .get(format!("http://{}/health", addr))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["status"], json!("ok"));
}
