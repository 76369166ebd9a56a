//! End-to-end tests of the HTTP surface against an embedded store

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use std::path::{Path, PathBuf};
use std::time::Duration;

use axum::Router;
use serde_json::{json, Value};
use sqlx::{ConnectOptions, Connection};
use tempfile::TempDir;
use tower::ServiceExt;

use memberhub_server::db::pool::sqlite_options;
use memberhub_server::db::repos::SqliteOptions;
use memberhub_server::db::{Repositories, RetryPolicy, SqliteStore};
use memberhub_server::http::{build_router, ServerConfig};

struct TestApp {
    dir: TempDir,
    router: Router,
}

impl TestApp {
    async fn new() -> Self {
        Self::with_options(SqliteOptions::default()).await
    }

    async fn with_options(options: SqliteOptions) -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = SqliteStore::open_with(&Self::db_path(dir.path()), options)
            .await
            .expect("open store");

        let static_dir = dir.path().join("wwwroot");
        std::fs::create_dir_all(&static_dir).expect("static dir");
        std::fs::write(static_dir.join("index.html"), "<h1>Subscribe</h1>").expect("index");

        let config = ServerConfig {
            static_dir: Some(static_dir),
            ..ServerConfig::default()
        };
        let router = build_router(Repositories::from_store(store), &config);
        Self { dir, router }
    }

    fn db_path(dir: &Path) -> PathBuf {
        dir.join("data.db")
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.expect("request");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Request::get(uri).body(Body::empty()).unwrap()).await
    }

    async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.post_raw(uri, body.to_string()).await
    }

    async fn post_raw(&self, uri: &str, body: String) -> (StatusCode, Value) {
        self.send(
            Request::post(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
    }

    async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.send(
            Request::builder()
                .method(Method::DELETE)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }
}

fn ana() -> Value {
    json!({"name": "Ana", "email": "ana@x.com", "packageType": "Golden"})
}

#[tokio::test]
async fn create_delete_delete_again() {
    let app = TestApp::new().await;

    let (status, body) = app.post("/members", ana()).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Member created successfully");
    assert_eq!(body["member"]["name"], "Ana");
    let id = body["member"]["id"].as_i64().expect("id");

    let (status, body) = app.delete(&format!("/members/{}", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Member deleted successfully");

    let (status, body) = app.delete(&format!("/members/{}", id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Member not found");
}

#[tokio::test]
async fn create_sets_location_header() {
    let app = TestApp::new().await;
    let request = Request::post("/members")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(ana().to_string()))
        .unwrap();

    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let location = response.headers()[header::LOCATION].to_str().unwrap();
    assert!(location.starts_with("/members/"));
}

#[tokio::test]
async fn list_includes_inserted_member() {
    let app = TestApp::new().await;
    app.post("/members", ana()).await;
    app.post(
        "/members",
        json!({"name": "Bo", "email": "bo@x.com", "packageType": "Platinum"}),
    )
    .await;

    let (status, body) = app.get("/members").await;
    assert_eq!(status, StatusCode::OK);
    let members = body.as_array().expect("array");
    assert_eq!(members.len(), 2);
    assert!(members.iter().any(|m| m["name"] == "Ana"
        && m["email"] == "ana@x.com"
        && m["packageType"] == "Golden"));
}

#[tokio::test]
async fn delete_excludes_member_from_list() {
    let app = TestApp::new().await;
    let (_, created) = app.post("/members", ana()).await;
    let id = created["member"]["id"].as_i64().unwrap();

    app.delete(&format!("/members/{}", id)).await;

    let (_, body) = app.get("/members").await;
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn delete_unknown_id_is_404() {
    let app = TestApp::new().await;
    let (status, body) = app.delete("/members/987654").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Member not found");
}

#[tokio::test]
async fn delete_non_numeric_id_is_400() {
    let app = TestApp::new().await;
    let (status, body) = app.delete("/members/abc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("abc"));
}

#[tokio::test]
async fn malformed_member_body_is_400() {
    let app = TestApp::new().await;

    let (status, body) = app.post_raw("/members", "{not json".into()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid request data");

    let (status, _) = app.post("/members", json!({"name": "Ana"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .post(
            "/members",
            json!({"name": "", "email": "a@x", "packageType": "Golden"}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "name cannot be empty");
}

#[tokio::test]
async fn create_while_store_locked_reports_error_with_200() {
    let app = TestApp::with_options(SqliteOptions {
        retry: RetryPolicy::new(5, Duration::from_millis(5)),
        busy_timeout: Duration::ZERO,
    })
    .await;

    let path = TestApp::db_path(app.dir.path());
    let mut locker = sqlite_options(&path, Duration::ZERO)
        .connect()
        .await
        .unwrap();
    sqlx::query("BEGIN EXCLUSIVE")
        .execute(&mut locker)
        .await
        .unwrap();

    let (status, body) = app.post("/members", ana()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["error"], "Database is locked. Please try again later.");
    assert!(body.get("member").is_none());

    sqlx::query("COMMIT").execute(&mut locker).await.unwrap();
    locker.close().await.unwrap();

    let (status, _) = app.post("/members", ana()).await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn admins_list_never_includes_password() {
    let app = TestApp::new().await;
    for name in ["alice", "bob", "carol"] {
        let (status, body) = app
            .post("/add-admin", json!({"username": name, "password": "pw"}))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Admin added successfully");
    }

    let (status, body) = app.get("/admins").await;
    assert_eq!(status, StatusCode::OK);
    let admins = body.as_array().expect("array");
    assert_eq!(admins.len(), 3);
    for admin in admins {
        assert!(admin.get("password").is_none());
        assert!(admin.get("id").is_some());
        assert!(admin.get("username").is_some());
    }
}

#[tokio::test]
async fn add_admin_requires_fields() {
    let app = TestApp::new().await;

    let (status, body) = app
        .post("/add-admin", json!({"username": "root", "password": ""}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "password cannot be empty");

    let (status, body) = app.post("/add-admin", json!({"username": "root"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid request data");
}

#[tokio::test]
async fn login_contract() {
    let app = TestApp::new().await;
    app.post("/add-admin", json!({"username": "root", "password": "hunter2"}))
        .await;

    let (status, body) = app
        .post("/admin/login", json!({"username": "root", "password": "hunter2"}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Login successful");
    assert!(body.get("password").is_none());

    let (status, body) = app
        .post("/admin/login", json!({"username": "root", "password": "wrong"}))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid username or password");

    let (status, body) = app.post_raw("/admin/login", "nope".into()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid request data");
}

#[tokio::test]
async fn login_with_blank_fields_is_400() {
    let app = TestApp::new().await;

    let (status, body) = app
        .post("/admin/login", json!({"username": "", "password": ""}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "username cannot be empty");

    let (status, body) = app
        .post("/admin/login", json!({"username": "root", "password": "  "}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "password cannot be empty");
}

#[tokio::test]
async fn static_fallback_serves_index() {
    let app = TestApp::new().await;

    let response = app
        .router
        .clone()
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"<h1>Subscribe</h1>");
}
