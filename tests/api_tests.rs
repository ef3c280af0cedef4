use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use noted::config::Config;
use serde_json::{Value, json};
use tower::ServiceExt;

async fn spawn_app() -> Router {
    let mut config = Config::default();
    config.general.database_path = "sqlite::memory:".to_string();

    let state = noted::api::create_app_state_from_config(config, None)
        .await
        .expect("Failed to create app state");
    noted::api::router(state)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, json)
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn list_request(token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri("/notes");
    if let Some(token) = token {
        builder = builder.header("Authorization", token);
    }
    builder.body(Body::empty()).unwrap()
}

async fn login(app: &Router, username: &str) -> String {
    let (status, body) = send(app, post_json("/auth", &json!({ "username": username }))).await;
    assert_eq!(status, StatusCode::OK);
    body["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_status_endpoint() {
    let app = spawn_app().await;

    let (status, body) = send(&app, Request::builder().uri("/").body(Body::empty()).unwrap()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "Online");
    assert_eq!(body["message"], "Noted Backend is running!");
}

#[tokio::test]
async fn test_auth_is_idempotent_per_username() {
    let app = spawn_app().await;

    let first = login(&app, "alice").await;
    let second = login(&app, "alice").await;
    let other = login(&app, "bob").await;

    assert_eq!(first, second);
    assert_ne!(first, other);
    assert_eq!(first.len(), 32);
    assert!(first.chars().all(|c| c.is_ascii_hexdigit()));
}

#[tokio::test]
async fn test_auth_requires_username() {
    let app = spawn_app().await;

    for body in [json!({}), json!({ "username": "" }), json!({ "username": "   " })] {
        let (status, response) = send(&app, post_json("/auth", &body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response["error"], "Username is required");
    }
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let app = spawn_app().await;

    let request = Request::builder()
        .method("POST")
        .uri("/auth")
        .header("Content-Type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_save_then_list_round_trip() {
    let app = spawn_app().await;
    let token = login(&app, "alice").await;

    let (status, body) = send(
        &app,
        post_json(
            "/notes",
            &json!({ "token": token, "domain": "example.com", "content": "<p>hi</p>" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true, "noteId": 1 }));

    let (status, body) = send(&app, list_request(Some(&token))).await;
    assert_eq!(status, StatusCode::OK);

    let notes = body.as_array().unwrap();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0]["id"], 1);
    assert_eq!(notes[0]["domain"], "example.com");
    assert_eq!(notes[0]["content"], "<p>hi</p>");
    assert!(notes[0]["url"].is_null());
    assert!(notes[0]["userId"].is_number());
    assert!(notes[0]["timestamp"].as_str().unwrap().ends_with('Z'));
}

#[tokio::test]
async fn test_list_is_newest_first_and_scoped_to_owner() {
    let app = spawn_app().await;
    let alice = login(&app, "alice").await;
    let bob = login(&app, "bob").await;

    for content in ["one", "two"] {
        let (status, _) = send(
            &app,
            post_json(
                "/notes",
                &json!({ "token": alice, "domain": "a.com", "content": content }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }
    send(
        &app,
        post_json(
            "/notes",
            &json!({ "token": bob, "domain": "b.com", "content": "bob's", "url": "https://b.com/x" }),
        ),
    )
    .await;

    let (_, body) = send(&app, list_request(Some(&alice))).await;
    let contents: Vec<_> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["content"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(contents, ["two", "one"]);

    let (_, body) = send(&app, list_request(Some(&format!("Bearer {bob}")))).await;
    let notes = body.as_array().unwrap();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0]["url"], "https://b.com/x");
}

#[tokio::test]
async fn test_save_with_bad_token_is_rejected_without_writing() {
    let app = spawn_app().await;
    let token = login(&app, "alice").await;

    let (status, body) = send(
        &app,
        post_json(
            "/notes",
            &json!({ "token": "not-a-real-token", "domain": "example.com", "content": "x" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid token");

    let (_, body) = send(&app, list_request(Some(&token))).await;
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_save_without_token_is_unauthorized() {
    let app = spawn_app().await;

    let (status, body) = send(
        &app,
        post_json("/notes", &json!({ "domain": "example.com", "content": "x" })),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_save_requires_domain_and_content() {
    let app = spawn_app().await;
    let token = login(&app, "alice").await;

    for body in [
        json!({ "token": token, "content": "x" }),
        json!({ "token": token, "domain": "example.com" }),
        json!({ "token": token, "domain": "", "content": "x" }),
    ] {
        let (status, response) = send(&app, post_json("/notes", &body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(response["error"].is_string());
    }

    let (_, body) = send(&app, list_request(Some(&token))).await;
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_list_requires_valid_token() {
    let app = spawn_app().await;

    let (status, body) = send(&app, list_request(None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["error"].is_string());

    let (status, _) = send(&app, list_request(Some("bogus"))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_new_user_has_no_notes() {
    let app = spawn_app().await;
    let token = login(&app, "carol").await;

    let (status, body) = send(&app, list_request(Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}
