mod common;

use common::*;
use serde_json::Value;

#[tokio::test]
async fn health_reports_ok_without_auth() {
    let base = spawn_app().await;
    let client = reqwest::Client::new();

    let resp = client
        .get(format!("{base}/health"))
        .send()
        .await
        .expect("health request failed");
    assert_eq!(resp.status().as_u16(), 200);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["status"], "ok");
    assert!(body["error"].is_null());
}
