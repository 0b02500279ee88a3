//! HTTP server for the webring.
//!
//! This module implements the HTTP surface that:
//! - Redirects visitors around the ring (next/previous/random)
//! - Handles self-service membership (register/deregister/login)
//! - Serves status posts and the embeddable widget
//!
//! # Endpoints
//!
//! - `POST /register` - Add a site to the ring
//! - `POST /deregister` - Remove a site (credential-checked)
//! - `POST /login` - Check a member credential
//! - `GET /next?site=ID` - 307 to the next valid site
//! - `GET /previous?site=ID` - 307 to the previous valid site
//! - `GET /random` - 307 to a random member
//! - `GET /ring` - Paginated listing of valid sites
//! - `POST /status` - Append a status post
//! - `GET /get_status?site=ID` - Latest status for a site
//! - `GET /widget?url=...` - HTML navigation snippet
//! - `GET /health` - Returns 200 if the server is running

use std::sync::Arc;

use sqlx::sqlite::SqlitePool;

pub mod health;
pub mod listing;
pub mod membership;
pub mod redirect;
pub mod status;
pub mod widget;

pub use health::health_handler;
pub use listing::ring_handler;
pub use membership::{deregister_handler, login_handler, register_handler};
pub use redirect::{next_handler, previous_handler, random_handler};
pub use status::{get_status_handler, post_status_handler};
pub use widget::widget_handler;

/// Shared application state.
///
/// This is passed to all handlers via Axum's `State` extractor. It carries
/// the store pool and the public base URL the widget embeds.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Connection pool for the ring store.
    pool: SqlitePool,

    /// Public base URL of this service, e.g. `https://ring.example`.
    /// Used when rendering widget links.
    public_host: String,
}

impl AppState {
    /// Creates a new `AppState` with the given store pool and public host.
    pub fn new(pool: SqlitePool, public_host: impl Into<String>) -> Self {
        AppState {
            inner: Arc::new(AppStateInner {
                pool,
                public_host: public_host.into(),
            }),
        }
    }

    /// Returns the store pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.inner.pool
    }

    /// Returns the public base URL.
    pub fn public_host(&self) -> &str {
        &self.inner.public_host
    }
}

/// Builds the axum Router with all endpoints.
pub fn build_router(app_state: AppState) -> axum::Router {
    use axum::routing::{get, post};

    axum::Router::new()
        .route("/register", post(register_handler))
        .route("/deregister", post(deregister_handler))
        .route("/login", post(login_handler))
        .route("/next", get(next_handler))
        .route("/previous", get(previous_handler))
        .route("/random", get(random_handler))
        .route("/ring", get(ring_handler))
        .route("/status", post(post_status_handler))
        .route("/get_status", get(get_status_handler))
        .route("/widget", get(widget_handler))
        .route("/health", get(health_handler))
        .with_state(app_state)
}

#[cfg(test)]
mod integration_tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use crate::test_utils::memory_pool;

    const PASSWORD: &str = "password123";

    /// Creates a router over a fresh in-memory store.
    async fn test_app() -> axum::Router {
        let pool = memory_pool().await;
        build_router(AppState::new(pool, "https://ring.example"))
    }

    fn form_request(uri: &str, body: String) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap()
    }

    fn register_request(url: &str, email: &str) -> Request<Body> {
        form_request(
            "/register",
            format!("url={url}&email={email}&password={PASSWORD}"),
        )
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    // ─── Health ───

    #[tokio::test]
    async fn health_returns_200() {
        let app = test_app().await;
        let request = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"OK");
    }

    // ─── Membership ───

    #[tokio::test]
    async fn register_returns_site_id() {
        let app = test_app().await;

        let response = app
            .oneshot(register_request("https://a.example", "a@example.com"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["ok"], true);
        assert!(json["site_id"].is_i64());
    }

    #[tokio::test]
    async fn register_rejects_bad_form_data() {
        let app = test_app().await;

        let response = app
            .oneshot(form_request(
                "/register",
                format!("url=not-a-url&email=a@example.com&password={PASSWORD}"),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["ok"], false);
    }

    #[tokio::test]
    async fn duplicate_registration_returns_409() {
        let app = test_app().await;

        let response = app
            .clone()
            .oneshot(register_request("https://a.example", "a@example.com"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        // Same URL modulo trailing slash.
        let response = app
            .oneshot(register_request("https://a.example/", "b@example.com"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn deregister_with_wrong_password_returns_401() {
        let app = test_app().await;

        app.clone()
            .oneshot(register_request("https://a.example", "a@example.com"))
            .await
            .unwrap();

        let response = app
            .oneshot(form_request(
                "/deregister",
                "url=https://a.example&password=wrongwrong".to_string(),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn deregister_unknown_url_returns_404() {
        let app = test_app().await;

        let response = app
            .oneshot(form_request(
                "/deregister",
                format!("url=https://missing.example&password={PASSWORD}"),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn login_roundtrip() {
        let app = test_app().await;

        let response = app
            .clone()
            .oneshot(register_request("https://a.example", "a@example.com"))
            .await
            .unwrap();
        let registered = body_json(response).await;

        let response = app
            .oneshot(form_request(
                "/login",
                format!("email=a@example.com&password={PASSWORD}"),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["ok"], true);
        assert_eq!(json["site_id"], registered["site_id"]);
    }

    // ─── Navigation ───

    #[tokio::test]
    async fn next_redirects_around_the_ring() {
        let app = test_app().await;

        let response = app
            .clone()
            .oneshot(register_request("https://a.example", "a@example.com"))
            .await
            .unwrap();
        let a = body_json(response).await["site_id"].as_i64().unwrap();
        app.clone()
            .oneshot(register_request("https://b.example", "b@example.com"))
            .await
            .unwrap();

        let request = Request::builder()
            .uri(format!("/next?site={a}"))
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(
            response.headers().get("location").unwrap(),
            "https://b.example"
        );
    }

    #[tokio::test]
    async fn previous_wraps_to_the_tail() {
        let app = test_app().await;

        let response = app
            .clone()
            .oneshot(register_request("https://a.example", "a@example.com"))
            .await
            .unwrap();
        let a = body_json(response).await["site_id"].as_i64().unwrap();
        app.clone()
            .oneshot(register_request("https://b.example", "b@example.com"))
            .await
            .unwrap();

        let request = Request::builder()
            .uri(format!("/previous?site={a}"))
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(
            response.headers().get("location").unwrap(),
            "https://b.example"
        );
    }

    #[tokio::test]
    async fn next_on_empty_ring_returns_404() {
        let app = test_app().await;

        let request = Request::builder()
            .uri("/next?site=1")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn random_on_empty_ring_returns_404() {
        let app = test_app().await;

        let request = Request::builder()
            .uri("/random")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn random_redirects_to_the_sole_member() {
        let app = test_app().await;

        app.clone()
            .oneshot(register_request("https://a.example", "a@example.com"))
            .await
            .unwrap();

        let request = Request::builder()
            .uri("/random")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(
            response.headers().get("location").unwrap(),
            "https://a.example"
        );
    }

    // ─── Listing ───

    #[tokio::test]
    async fn ring_lists_members_in_id_order() {
        let app = test_app().await;

        for (url, email) in [
            ("https://a.example", "a@example.com"),
            ("https://b.example", "b@example.com"),
        ] {
            app.clone()
                .oneshot(register_request(url, email))
                .await
                .unwrap();
        }

        let request = Request::builder()
            .uri("/ring")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        let urls: Vec<&str> = json
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["url"].as_str().unwrap())
            .collect();
        assert_eq!(urls, vec!["https://a.example", "https://b.example"]);
    }

    // ─── Status ───

    #[tokio::test]
    async fn status_post_and_lookup() {
        let app = test_app().await;

        let response = app
            .clone()
            .oneshot(register_request("https://a.example", "a@example.com"))
            .await
            .unwrap();
        let site = body_json(response).await["site_id"].as_i64().unwrap();

        let response = app
            .clone()
            .oneshot(form_request(
                "/status",
                format!("site={site}&status=hello ring"),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let request = Request::builder()
            .uri(format!("/get_status?site={site}"))
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["success"], true);
        assert_eq!(json["status"], "hello ring");
    }

    #[tokio::test]
    async fn get_status_miss_reports_in_band() {
        let app = test_app().await;

        let request = Request::builder()
            .uri("/get_status?site=42")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["success"], false);
        assert!(json["message"].is_string());
    }

    #[tokio::test]
    async fn get_status_with_malformed_site_param_reports_in_band() {
        let app = test_app().await;

        // Widgets only inspect the body, so even a garbage `site` value gets
        // a 200 with `success: false` rather than a bare 400.
        for uri in ["/get_status?site=abc", "/get_status"] {
            let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
            let response = app.clone().oneshot(request).await.unwrap();

            assert_eq!(response.status(), StatusCode::OK);
            let json = body_json(response).await;
            assert_eq!(json["success"], false);
            assert!(json["message"].is_string());
        }
    }

    #[tokio::test]
    async fn status_post_for_unknown_site_returns_404() {
        let app = test_app().await;

        let response = app
            .oneshot(form_request("/status", "site=42&status=hi".to_string()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    // ─── Widget ───

    #[tokio::test]
    async fn widget_for_member_embeds_navigation_links() {
        let app = test_app().await;

        let response = app
            .clone()
            .oneshot(register_request("https://a.example", "a@example.com"))
            .await
            .unwrap();
        let site = body_json(response).await["site_id"].as_i64().unwrap();

        let request = Request::builder()
            .uri("/widget?url=https://a.example")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let html = String::from_utf8(body.to_vec()).unwrap();
        assert!(html.contains(&format!("https://ring.example/next?site={site}")));
    }

    #[tokio::test]
    async fn widget_for_unknown_url_returns_404() {
        let app = test_app().await;

        let request = Request::builder()
            .uri("/widget?url=https://missing.example")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
