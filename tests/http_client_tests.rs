//! Integration tests for the HTTP client's interceptor pipeline
//!
//! A wiremock server stands in for the backend so each test can observe
//! exactly which headers went out and control which status comes back.

mod common;

use std::time::Duration;

use common::client_for;
use serde_json::json;
use userdesk_sdk::{
    ApiConfig, ApiConfigOverrides, ApiError, HttpClient, Method, RequestOptions, TokenStore,
};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// Request stage - credential attachment
// ============================================================================

#[tokio::test]
async fn test_bearer_token_attached_when_set() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .and(header("Authorization", "Bearer abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&server)
        .await;

    let (client, tokens) = client_for(&server);
    tokens.set("abc");

    let response = client.get("/users").await.unwrap();
    assert_eq!(response.status, 200);
    assert_eq!(response.data, json!({"ok": true}));
}

#[tokio::test]
async fn test_no_authorization_header_without_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let (client, _tokens) = client_for(&server);
    client.get("/users").await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn test_skip_auth_omits_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/public"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let (client, tokens) = client_for(&server);
    tokens.set("abc");

    let options = RequestOptions::builder().skip_auth(true).build();
    let response = client
        .request(Method::GET, "/public", None, Some(options))
        .await
        .unwrap();
    assert_eq!(response.data, serde_json::Value::Null);

    let requests = server.received_requests().await.unwrap();
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn test_server_context_never_attaches_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 1})))
        .mount(&server)
        .await;

    let tokens = TokenStore::server();
    tokens.set("abc");
    let config = ApiConfig::builder().base_url(server.uri()).build();
    let client = HttpClient::new(config, tokens.clone()).unwrap();

    client.get("/users/1").await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert!(requests[0].headers.get("authorization").is_none());
    assert!(tokens.get().is_none());
}

#[tokio::test]
async fn test_default_and_per_call_headers_and_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/search"))
        .and(query_param("q", "John Doe"))
        .and(header("content-type", "application/json"))
        .and(header("x-trace", "t-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"users": []})))
        .expect(1)
        .mount(&server)
        .await;

    let (client, _tokens) = client_for(&server);
    let options = RequestOptions::builder()
        .query(vec![("q".to_string(), "John Doe".to_string())])
        .headers([("x-trace".to_string(), "t-1".to_string())].into())
        .build();
    client
        .request(Method::GET, "/users/search", None, Some(options))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_json_body_sent() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/users/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 1})))
        .mount(&server)
        .await;

    let (client, _tokens) = client_for(&server);
    client
        .put("/users/1", &json!({"lastName": "Owais"}))
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    let sent: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(sent, json!({"lastName": "Owais"}));
}

// ============================================================================
// Response stage - error normalisation
// ============================================================================

#[tokio::test]
async fn test_401_clears_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/auth/me"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"message": "Token Expired!"})),
        )
        .mount(&server)
        .await;

    let (client, tokens) = client_for(&server);
    tokens.set("expired");

    let err = client.get("/auth/me").await.unwrap_err();
    assert_eq!(err.status, Some(401));
    assert_eq!(err.message, "Authentication required");
    assert_eq!(err.details, Some(json!({"message": "Token Expired!"})));
    assert!(tokens.get().is_none());
}

#[tokio::test]
async fn test_status_specific_messages() {
    let server = MockServer::start().await;
    for (status, route) in [(403u16, "/forbidden"), (404, "/missing"), (503, "/down")] {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(
                ResponseTemplate::new(status).set_body_json(json!({"message": "from server"})),
            )
            .mount(&server)
            .await;
    }

    let (client, tokens) = client_for(&server);
    tokens.set("abc");

    let forbidden = client.get("/forbidden").await.unwrap_err();
    assert_eq!(forbidden.message, "Access denied");
    assert_eq!(forbidden.status, Some(403));

    let missing = client.get("/missing").await.unwrap_err();
    assert_eq!(missing.message, "Resource not found");

    let down = client.get("/down").await.unwrap_err();
    assert_eq!(down.message, "Server error occurred");
    assert_eq!(down.status, Some(503));

    // Only a 401 clears the token
    assert!(tokens.is_set());
}

#[tokio::test]
async fn test_other_status_uses_server_message_and_code() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(400).set_body_json(
            json!({"message": "Invalid credentials", "code": "INVALID_CREDENTIALS"}),
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/teapot"))
        .respond_with(ResponseTemplate::new(418))
        .mount(&server)
        .await;

    let (client, _tokens) = client_for(&server);

    let err = client.post("/auth/login", &json!({})).await.unwrap_err();
    assert_eq!(err.message, "Invalid credentials");
    assert_eq!(err.code.as_deref(), Some("INVALID_CREDENTIALS"));
    assert!(err.is_auth_rejection());

    let teapot = client.get("/teapot").await.unwrap_err();
    assert_eq!(teapot.message, "Request failed with status code 418");
    assert_eq!(teapot.details, None);
}

#[tokio::test]
async fn test_network_error() {
    // Nothing listens on a port freed right after binding it
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let uri = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let tokens = TokenStore::client();
    tokens.set("abc");
    let config = ApiConfig::builder().base_url(uri).build();
    let client = HttpClient::new(config, tokens.clone()).unwrap();

    let err = client.get("/users").await.unwrap_err();
    assert_eq!(err.message, ApiError::NETWORK_MESSAGE);
    assert_eq!(err.status, None);
    // A failure without a response leaves the token alone
    assert!(tokens.is_set());
}

#[tokio::test]
async fn test_per_call_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&server)
        .await;

    let (client, _tokens) = client_for(&server);
    let options = RequestOptions::builder()
        .timeout(Duration::from_millis(100))
        .build();

    let err = client
        .request(Method::GET, "/slow", None, Some(options))
        .await
        .unwrap_err();
    assert_eq!(err.message, ApiError::NETWORK_MESSAGE);
}

// ============================================================================
// Reconfiguration
// ============================================================================

#[tokio::test]
async fn test_reconfigure_lets_in_flight_calls_finish() {
    let old_server = MockServer::start().await;
    let new_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"from": "old"}))
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&old_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"from": "new"})))
        .mount(&new_server)
        .await;

    let (client, _tokens) = client_for(&old_server);

    let in_flight = {
        let client = client.clone();
        tokio::spawn(async move { client.get("/users").await })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;

    let updated = client
        .reconfigure(&ApiConfigOverrides::base_url(new_server.uri()))
        .unwrap();
    assert_eq!(updated.base_url, new_server.uri());

    let first = in_flight.await.unwrap().unwrap();
    assert_eq!(first.data, json!({"from": "old"}));

    let second = client.get("/users").await.unwrap();
    assert_eq!(second.data, json!({"from": "new"}));
}

#[tokio::test]
async fn test_embedded_url_in_query_stays_relative() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/redirect"))
        .and(query_param("to", "https://example.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&server)
        .await;

    let (client, _tokens) = client_for(&server);
    let response = client
        .get("/redirect?to=https://example.com")
        .await
        .unwrap();
    assert_eq!(response.data, json!({"ok": true}));
}

#[tokio::test]
async fn test_absolute_url_bypasses_base() {
    let elsewhere = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .mount(&elsewhere)
        .await;

    let tokens = TokenStore::client();
    let client = HttpClient::new(ApiConfig::default(), tokens).unwrap();

    let response = client
        .get(&format!("{}/health", elsewhere.uri()))
        .await
        .unwrap();
    assert_eq!(response.data, json!("ok"));
}
