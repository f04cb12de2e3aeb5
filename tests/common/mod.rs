#![allow(dead_code)]

use axum::{
    body::Body,
    extract::Path,
    http::{header, Method, Request, StatusCode},
    response::Response,
    routing::post,
    Router,
};
use http_body_util::BodyExt;
use podside::{auth, db, onboarding::OnboardingConfig, router, AppResult, AppState};
use sqlx::SqlitePool;
use tower::ServiceExt;
use tower_sessions::{MemoryStore, Session, SessionManagerLayer};

pub async fn test_pool() -> SqlitePool {
    // one connection, or every connection gets its own in-memory database
    let db_pool = db::connect_pool("sqlite::memory:", 1).await.expect("connect");
    db::run_migrations(&db_pool).await.expect("migrate");
    db_pool
}

async fn test_sign_in(Path(user_id): Path<String>, session: Session) -> AppResult<StatusCode> {
    auth::sign_in(&session, &user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn app(db_pool: SqlitePool, onboarding: OnboardingConfig) -> Router {
    router()
        .route("/test/sign_in/{user_id}", post(test_sign_in))
        .with_state(AppState { db_pool, onboarding })
        .layer(SessionManagerLayer::new(MemoryStore::default()).with_secure(false))
}

/// Drives the router like a browser: keeps the session cookie between requests.
pub struct TestClient {
    app: Router,
    cookie: Option<String>,
}

impl TestClient {
    pub fn new(app: Router) -> Self {
        Self { app, cookie: None }
    }

    pub async fn sign_in(&mut self, user_id: &str) {
        let response = self.send(Method::POST, &format!("/test/sign_in/{user_id}")).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert!(self.cookie.is_some(), "sign in should set a session cookie");
    }

    pub async fn send(&mut self, method: Method, uri: &str) -> Response {
        let mut request = Request::builder().method(method).uri(uri);
        if let Some(cookie) = &self.cookie {
            request = request.header(header::COOKIE, cookie);
        }
        let request = request.body(Body::empty()).unwrap();

        let response = self.app.clone().oneshot(request).await.unwrap();
        if let Some(set_cookie) = response.headers().get(header::SET_COOKIE) {
            let pair = set_cookie.to_str().unwrap().split(';').next().unwrap();
            self.cookie = Some(pair.to_owned());
        }
        response
    }

    pub async fn get(&mut self, uri: &str) -> Response {
        self.send(Method::GET, uri).await
    }
}

pub async fn body_text(response: Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub fn location(response: &Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .expect("redirect without location")
        .to_str()
        .unwrap()
}
