use std::time::Duration;

use tubelist::{error::ServerError, server::CallbackServer};

async fn bind(path: &str) -> (CallbackServer, String) {
    let server = CallbackServer::bind("127.0.0.1:0".parse().unwrap(), path)
        .await
        .unwrap();
    let base = format!("http://{}", server.local_addr().unwrap());
    (server, base)
}

#[tokio::test]
async fn test_callback_hands_params_to_waiter() {
    let (server, base) = bind("/oauth/callback").await;
    let waiter = tokio::spawn(server.wait(Duration::from_secs(5)));

    let response = reqwest::get(format!("{}/oauth/callback?code=4%2Fabc&state=nonce", base))
        .await
        .unwrap();
    assert!(response.status().is_success());
    assert!(response.text().await.unwrap().contains("Authorization received"));

    let params = waiter.await.unwrap().unwrap();
    assert_eq!(params.code.as_deref(), Some("4/abc"));
    assert_eq!(params.state.as_deref(), Some("nonce"));
    assert_eq!(params.error, None);
}

#[tokio::test]
async fn test_denied_callback_is_forwarded() {
    let (server, base) = bind("/callback").await;
    let waiter = tokio::spawn(server.wait(Duration::from_secs(5)));

    let body = reqwest::get(format!("{}/callback?error=access_denied&state=nonce", base))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(body.contains("denied"));

    let params = waiter.await.unwrap().unwrap();
    assert_eq!(params.error.as_deref(), Some("access_denied"));
    assert_eq!(params.code, None);
}

#[tokio::test]
async fn test_request_without_code_keeps_waiting() {
    let (server, base) = bind("/callback").await;
    let waiter = tokio::spawn(server.wait(Duration::from_secs(5)));

    let body = reqwest::get(format!("{}/callback", base))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(body.contains("Missing authorization code"));

    reqwest::get(format!("{}/callback?code=c&state=s", base))
        .await
        .unwrap();
    let params = waiter.await.unwrap().unwrap();
    assert_eq!(params.code.as_deref(), Some("c"));
}

#[tokio::test]
async fn test_health_reports_service() {
    let (server, base) = bind("/callback").await;
    let waiter = tokio::spawn(server.wait(Duration::from_millis(500)));

    let body: serde_json::Value = reqwest::get(format!("{}/health", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "tubelist");

    assert!(matches!(
        waiter.await.unwrap(),
        Err(ServerError::Timeout(_))
    ));
}

#[tokio::test]
async fn test_wait_times_out_without_callback() {
    let (server, _) = bind("/callback").await;

    let result = server.wait(Duration::from_millis(50)).await;

    assert!(matches!(result, Err(ServerError::Timeout(d)) if d == Duration::from_millis(50)));
}
