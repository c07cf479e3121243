//! End-to-end HTTP tests: router, extractors and repositories over SQLite.

mod common;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use audiobook_api::api::{create_router, AppState};
use audiobook_api::config::Config;

use common::{TestContext, BASE_URL};

const BOUNDARY: &str = "audiobook-test-boundary";

fn app(ctx: &TestContext) -> Router {
    let config = Config {
        storage_root: ctx.storage_root(),
        public_base_url: BASE_URL.to_string(),
        ..Config::default()
    };
    create_router(AppState::new(ctx.uow.clone(), &config))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn delete(uri: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Text fields plus optional file parts as `(field, filename, content)`
fn multipart_request(
    method: &str,
    uri: &str,
    fields: &[(&str, &str)],
    files: &[(&str, &str, &str)],
) -> Request<Body> {
    let mut body = String::new();
    for (name, value) in fields {
        body.push_str(&format!(
            "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
            BOUNDARY, name, value
        ));
    }
    for (name, file_name, content) in files {
        body.push_str(&format!(
            "--{}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: application/octet-stream\r\n\r\n{}\r\n",
            BOUNDARY, name, file_name, content
        ));
    }
    body.push_str(&format!("--{}--\r\n", BOUNDARY));

    Request::builder()
        .method(method)
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn create_catalog(app: &Router) -> (i64, i64, i64) {
    let (_, author) = send(app, json_request("POST", "/api/author", json!({ "authorName": "Frank Herbert" }))).await;
    let (_, category) = send(app, json_request("POST", "/api/category", json!({ "categoryName": "Sci-Fi" }))).await;
    let (_, narrator) = send(app, json_request("POST", "/api/narrator", json!({ "narratorName": "Scott Brick" }))).await;
    (
        author["id"].as_i64().unwrap(),
        category["id"].as_i64().unwrap(),
        narrator["id"].as_i64().unwrap(),
    )
}

#[tokio::test]
async fn test_author_crud_over_http() {
    let ctx = TestContext::new().await;
    let app = app(&ctx);

    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/author", json!({ "authorName": "Ursula K. Le Guin" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let location = response.headers()[header::LOCATION].to_str().unwrap().to_string();

    let (status, body) = send(&app, get(&location)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["authorName"], "Ursula K. Le Guin");
    let id = body["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        json_request("PUT", &location, json!({ "id": id, "authorName": "U. K. Le Guin" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["authorName"], "U. K. Le Guin");

    let (status, body) = send(
        &app,
        get("/api/author?pageNumber=9223372036854775807&pageSize=3"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["items"], json!([]));
    assert_eq!(body["totalCount"], 1);

    let (status, _) = send(&app, delete(&format!("/api/author/soft/{}", id))).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(&app, get(&location)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);

    let (status, _) = send(&app, delete(&location)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let ctx = TestContext::new().await;
    let request = Request::builder()
        .method("POST")
        .uri("/api/category")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let (status, body) = send(&app(&ctx), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_story_upload_and_static_serving() {
    let ctx = TestContext::new().await;
    let app = app(&ctx);
    let (author_id, category_id, narrator_id) = create_catalog(&app).await;

    let (status, story) = send(
        &app,
        multipart_request(
            "POST",
            "/api/story",
            &[
                ("title", "Dune"),
                ("description", "Spice and sand"),
                ("authorId", &author_id.to_string()),
                ("categoryId", &category_id.to_string()),
                ("narratorId", &narrator_id.to_string()),
            ],
            &[("coverImageFile", "cover.jpg", "fake jpeg bytes")],
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(story["authorName"], "Frank Herbert");
    assert_eq!(story["averageRating"], 0.0);

    let cover_url = story["coverImageUrl"].as_str().unwrap();
    let cover_path = cover_url.strip_prefix(BASE_URL).unwrap();
    assert!(cover_path.starts_with("/coverImages/"));

    let response = app.clone().oneshot(get(cover_path)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], b"fake jpeg bytes");

    let story_id = story["id"].as_i64().unwrap().to_string();
    let (status, audio) = send(
        &app,
        multipart_request(
            "POST",
            "/api/audio",
            &[("title", "Chapter 1"), ("storyId", &story_id), ("duration", "1800")],
            &[("audioFile", "ch1.mp3", "fake mp3 bytes")],
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(audio["storyTitle"], "Dune");
    assert_eq!(audio["duration"], 1800);

    let (status, page) = send(&app, get(&format!("/api/audio?storyId={}", story_id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["totalCount"], 1);
    assert_eq!(ctx.staged_uploads(), 0);
}

#[tokio::test]
async fn test_story_form_errors_are_aggregated() {
    let ctx = TestContext::new().await;

    let (status, body) = send(
        &app(&ctx),
        multipart_request(
            "POST",
            "/api/story",
            &[("authorId", "abc"), ("categoryId", "1"), ("narratorId", "1")],
            &[],
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let errors: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(Value::as_str)
        .collect();
    assert!(errors.contains(&"Author ID must be a whole number."));
    assert!(errors.contains(&"Title is required and cannot exceed 255 characters."));
    assert!(errors.contains(&"Description is required and cannot exceed 1000 characters."));
}

#[tokio::test]
async fn test_audio_without_file_is_rejected() {
    let ctx = TestContext::new().await;
    let app = app(&ctx);
    let (author_id, category_id, narrator_id) = create_catalog(&app).await;
    let (_, story) = send(
        &app,
        multipart_request(
            "POST",
            "/api/story",
            &[
                ("title", "Dune"),
                ("description", "Spice and sand"),
                ("authorId", &author_id.to_string()),
                ("categoryId", &category_id.to_string()),
                ("narratorId", &narrator_id.to_string()),
            ],
            &[],
        ),
    )
    .await;
    assert!(story["coverImageUrl"].is_null());

    let (status, body) = send(
        &app,
        multipart_request(
            "POST",
            "/api/audio",
            &[("title", "Chapter 1"), ("storyId", &story["id"].to_string())],
            &[],
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"], json!(["Audio file is required."]));

    let (status, body) = send(
        &app,
        multipart_request(
            "POST",
            "/api/audio",
            &[("title", ""), ("storyId", &story["id"].to_string())],
            &[],
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["errors"],
        json!([
            "Audio file is required.",
            "Title is required and cannot exceed 255 characters."
        ])
    );
}

#[tokio::test]
async fn test_rejected_upload_is_not_kept() {
    let ctx = TestContext::new().await;
    let app = app(&ctx);

    let (status, _) = send(
        &app,
        multipart_request(
            "POST",
            "/api/audio",
            &[("title", ""), ("storyId", "1")],
            &[("audioFile", "ch1.mp3", "fake mp3 bytes")],
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(ctx.staged_uploads(), 0);
    assert!(!ctx.storage_root().join("audio").exists());
}

#[tokio::test]
async fn test_account_password_flow() {
    let ctx = TestContext::new().await;
    let app = app(&ctx);

    let (status, account) = send(
        &app,
        json_request(
            "POST",
            "/api/account",
            json!({
                "username": "alice",
                "email": "alice@example.com",
                "password": "secret-pass",
                "role": "user"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(account.get("password").is_none());
    assert!(account.get("passwordHash").is_none());

    let (status, _) = send(
        &app,
        json_request(
            "POST",
            "/api/account",
            json!({
                "username": "alice2",
                "email": "alice@example.com",
                "password": "secret-pass",
                "role": "user"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let uri = format!("/api/account/{}/password", account["id"]);
    let (status, body) = send(
        &app,
        json_request(
            "PUT",
            &uri,
            json!({
                "currentPassword": "secret-pass",
                "newPassword": "new-secret",
                "confirmPassword": "different"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["errors"].as_array().is_some_and(|e| !e.is_empty()));

    let (status, _) = send(
        &app,
        json_request(
            "PUT",
            &uri,
            json!({
                "currentPassword": "secret-pass",
                "newPassword": "new-secret",
                "confirmPassword": "new-secret"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_rating_out_of_range_is_rejected() {
    let ctx = TestContext::new().await;

    let (status, body) = send(
        &app(&ctx),
        json_request(
            "POST",
            "/api/rating",
            json!({ "accountId": 1, "storyId": 1, "ratingValue": 6 }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_health_and_openapi() {
    let ctx = TestContext::new().await;
    let app = app(&ctx);

    let (status, body) = send(&app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, doc) = send(&app, get("/api-docs/openapi.json")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(doc["paths"]["/api/story"].is_object());
}

