use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use pretty_assertions::assert_eq;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use charchat_client::{ApiClient, ClientConfig, TokenStore};
use charchat_models::SessionId;

/// Build an unsigned token whose payload expires at the given epoch second
fn make_token(exp: i64) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(
        serde_json::to_vec(&json!({"sub": "u-1", "username": "alice", "exp": exp})).unwrap(),
    );
    format!("{}.{}.signature", header, payload)
}

fn client_for(server_uri: &str, dir: &TempDir) -> ApiClient {
    let config = ClientConfig::new(server_uri).with_token_path(dir.path().join("token"));
    ApiClient::new(config).unwrap()
}

#[tokio::test]
async fn login_persists_token_and_authorizes_later_requests() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let client = client_for(&server.uri(), &dir);
    let token = make_token(4_000_000_000);

    Mock::given(method("POST"))
        .and(path("/login"))
        .and(body_json(json!({"username": "alice", "password": "secret"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": token})))
        .mount(&server)
        .await;

    // The session listing only answers when the bearer header is present
    Mock::given(method("GET"))
        .and(path("/get_sessions"))
        .and(header("authorization", format!("Bearer {}", token).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"session_id": 1, "character": "revanth-reddy", "message_count": 4}
        ])))
        .mount(&server)
        .await;

    client.login("alice", "secret").await.unwrap();
    assert!(client.is_authenticated());

    let sessions = client.get_sessions().await.unwrap();
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].session_id, SessionId::Number(1));
    assert_eq!(sessions[0].character, "revanth-reddy");
}

#[tokio::test]
async fn unauthorized_response_clears_the_stored_token() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let client = client_for(&server.uri(), &dir);

    let stale = make_token(4_000_000_000);
    TokenStore::new(dir.path().join("token")).save(&stale).unwrap();
    assert!(client.is_authenticated());

    Mock::given(method("GET"))
        .and(path("/get_sessions"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"error": "expired"})))
        .mount(&server)
        .await;

    let err = client.get_sessions().await.unwrap_err();
    assert_eq!(err.kind(), "unauthenticated");
    assert_eq!(err.status(), Some(401));

    // The interceptor-equivalent cleanup already ran
    assert_eq!(client.token_store().load(), None);
    assert!(!client.is_authenticated());
}

#[tokio::test]
async fn expired_token_is_not_authenticated() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let client = client_for(&server.uri(), &dir);

    TokenStore::new(dir.path().join("token"))
        .save(&make_token(1_000_000))
        .unwrap();
    assert!(!client.is_authenticated());

    // Identity is still derivable for display, even though the session is stale
    let info = client.user_info().unwrap();
    assert_eq!(info.username.as_deref(), Some("alice"));
    assert_eq!(info.user_id.as_deref(), Some("u-1"));
}

#[tokio::test]
async fn malformed_token_yields_no_identity_without_erroring() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let client = client_for(&server.uri(), &dir);

    TokenStore::new(dir.path().join("token"))
        .save("not-a-jwt")
        .unwrap();
    assert!(!client.is_authenticated());
    assert!(client.user_info().is_none());
}

#[tokio::test]
async fn rate_limit_maps_to_retry_later() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let client = client_for(&server.uri(), &dir);

    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let err = client
        .send_message("revanth-reddy", "hi", true, None, None)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "rate_limited");
    assert!(err.to_string().contains("try again"));
}

#[tokio::test]
async fn connection_failure_maps_to_network_error() {
    let dir = TempDir::new().unwrap();
    // Nothing listens on the discard port
    let client = client_for("http://127.0.0.1:9", &dir);

    let err = client.get_sessions().await.unwrap_err();
    assert_eq!(err.kind(), "network_error");
    assert_eq!(err.status(), None);
}

#[tokio::test]
async fn bad_request_surfaces_backend_message() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let client = client_for(&server.uri(), &dir);

    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"error": "Character not available"})),
        )
        .mount(&server)
        .await;

    let err = client
        .send_message("nobody", "hi", true, None, None)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "invalid_request");
    assert_eq!(err.to_string(), "Character not available");
}

#[tokio::test]
async fn send_message_sorts_returned_history() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let client = client_for(&server.uri(), &dir);

    Mock::given(method("POST"))
        .and(path("/chat"))
        .and(body_json(json!({
            "character_name": "X",
            "user_input": "hi",
            "new_session": true,
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "chat_history": [
                {"role": "X", "content": "hello", "timestamp": "2024-01-01T00:00:01Z"},
                {"role": "user", "content": "hi", "timestamp": "2024-01-01T00:00:00Z"},
            ],
            "session_id": 12,
        })))
        .mount(&server)
        .await;

    let turn = client.send_message("X", "hi", true, None, None).await.unwrap();
    assert_eq!(turn.session_id, Some(SessionId::Number(12)));

    let pairs: Vec<(&str, &str)> = turn
        .messages
        .iter()
        .map(|m| (m.role.as_str(), m.content.as_str()))
        .collect();
    assert_eq!(pairs, vec![("user", "hi"), ("X", "hello")]);
}

#[tokio::test]
async fn send_message_wraps_plain_reply_as_character_message() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let client = client_for(&server.uri(), &dir);

    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": "Nice to meet you",
            "session_id": "abc",
        })))
        .mount(&server)
        .await;

    let turn = client
        .send_message("revanth-reddy", "hello", false, Some(&SessionId::from("abc")), None)
        .await
        .unwrap();
    assert_eq!(turn.session_id, Some(SessionId::Text("abc".to_string())));
    assert_eq!(turn.messages.len(), 1);
    assert_eq!(turn.messages[0].role, "revanth-reddy");
    assert_eq!(turn.messages[0].content, "Nice to meet you");
}

#[tokio::test]
async fn get_session_messages_sorts_by_timestamp() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let client = client_for(&server.uri(), &dir);

    Mock::given(method("GET"))
        .and(path("/get_session_messages"))
        .and(query_param("session_id", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "chat_history": [
                {"role": "X", "content": "third", "timestamp": "2024-01-01T00:00:03Z"},
                {"role": "user", "content": "first", "timestamp": "2024-01-01T00:00:01Z"},
                {"role": "X", "content": "second", "timestamp": "2024-01-01T00:00:02Z"},
            ]
        })))
        .mount(&server)
        .await;

    let messages = client
        .get_session_messages(&SessionId::Number(5))
        .await
        .unwrap();
    let contents: Vec<&str> = messages.iter().map(|m| m.content.as_str()).collect();
    assert_eq!(contents, vec!["first", "second", "third"]);
}

#[tokio::test]
async fn delete_session_tolerates_empty_body() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let client = client_for(&server.uri(), &dir);

    Mock::given(method("DELETE"))
        .and(path("/sessions/abc"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    client
        .delete_session(&SessionId::from("abc"))
        .await
        .unwrap();
}

#[tokio::test]
async fn get_character_works_without_a_stored_token() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let client = client_for(&server.uri(), &dir);

    Mock::given(method("GET"))
        .and(path("/character/revanth-reddy"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "revanth-reddy",
            "name": "Revanth Reddy",
            "description": "Chief Minister of Telangana",
            "type": "Political Figure",
            "messages": 2100,
        })))
        .mount(&server)
        .await;

    // No token stored; the request must still go out and succeed
    let character = client.get_character("revanth-reddy").await.unwrap();
    assert_eq!(character.name, "Revanth Reddy");
    assert_eq!(character.category.as_deref(), Some("Political Figure"));
    assert_eq!(character.messages.as_deref(), Some("2100"));
}

#[tokio::test]
async fn health_reports_backend_liveness() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let client = client_for(&server.uri(), &dir);

    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    assert!(client.health().await);

    let unreachable = client_for("http://127.0.0.1:9", &dir);
    assert!(!unreachable.health().await);
}

#[tokio::test]
async fn server_error_hides_backend_internals() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let client = client_for(&server.uri(), &dir);

    Mock::given(method("GET"))
        .and(path("/get_sessions"))
        .respond_with(
            ResponseTemplate::new(503).set_body_json(json!({"error": "db pool exhausted"})),
        )
        .mount(&server)
        .await;

    let err = client.get_sessions().await.unwrap_err();
    assert_eq!(err.kind(), "server_error");
    assert_eq!(err.status(), Some(503));
    assert!(!err.to_string().contains("db pool"));
}

#[tokio::test]
async fn update_preferences_returns_stored_object() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let client = client_for(&server.uri(), &dir);

    let prefs = json!({"theme": "dark", "creativity": {"temperature": 0.8}});
    Mock::given(method("PUT"))
        .and(path("/user/preferences"))
        .and(body_json(prefs.clone()))
        .respond_with(ResponseTemplate::new(200).set_body_json(prefs.clone()))
        .mount(&server)
        .await;

    let stored = client.update_preferences(&prefs).await.unwrap();
    assert_eq!(stored, prefs);
}
