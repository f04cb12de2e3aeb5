pub mod auth;
pub mod config;
pub mod conversations;
pub mod db;
pub mod onboarding;
pub mod res;
pub mod session;
pub mod users;

use std::ops::Deref;

use axum::{extract::{FromRef, State}, http::StatusCode, response::{IntoResponse, Response}, routing::get, Router};
use sqlx::SqlitePool;
use tower_http::trace::TraceLayer;

use onboarding::OnboardingConfig;

#[derive(Clone, FromRef)]
pub struct AppState {
    pub db_pool: SqlitePool,
    pub onboarding: OnboardingConfig,
}

/// Every route of the pod, without the session layer.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .merge(auth::router())
        .merge(conversations::router())
        .merge(onboarding::router())
        .layer(TraceLayer::new_for_http())
}

async fn health(State(db_pool): State<SqlitePool>) -> StatusCode {
    match db_pool.acquire().await {
        Ok(_) => StatusCode::OK,
        Err(err) => {
            tracing::warn!(%err, "health check could not acquire a connection");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::error!(err = %self.0, "request failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("{}\n\n{}", self.0, self.0.backtrace()),
        )
            .into_response()
    }
}

impl From<String> for AppError {
    fn from(err: String) -> Self {
        Self(anyhow::Error::msg(err))
    }
}

impl From<&str> for AppError {
    fn from(err: &str) -> Self {
        Self(anyhow::Error::msg(err.to_owned()))
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self(err)
    }
}

macro_rules! apperr_impl {
    ($E:ty) => {
        impl From<$E> for AppError {
            fn from(err: $E) -> Self {
                Self(anyhow::Error::from(err))
            }
        }
    };
}

apperr_impl!(serde_json::Error);
apperr_impl!(sqlx::Error);
apperr_impl!(tower_sessions::session::Error);

pub struct Markdown<T>(pub T);

const SAFE_URL_SCHEMES: &[&str] = &["http", "https", "mailto"];

/// Keeps relative urls and the schemes in `SAFE_URL_SCHEMES`; anything else becomes `#`.
fn safe_url(url: pulldown_cmark::CowStr<'_>) -> pulldown_cmark::CowStr<'_> {
    // browsers ignore tabs and newlines inside a scheme
    let normalized: String = url
        .chars()
        .filter(|c| !c.is_ascii_whitespace() && !c.is_ascii_control())
        .collect::<String>()
        .to_ascii_lowercase();

    match normalized.find([':', '/', '?', '#']) {
        Some(i) if normalized[i..].starts_with(':') => {
            if SAFE_URL_SCHEMES.contains(&&normalized[..i]) {
                url
            } else {
                "#".into()
            }
        }
        _ => url,
    }
}

impl<T> Markdown<T>
where
    T: Deref<Target = str>
{
    /// Renders to an html fragment; raw html in the source is escaped and
    /// link targets are limited to safe schemes.
    pub fn to_html(&self) -> String {
        use pulldown_cmark::{Event, Parser, Options, Tag};

        let parser = Parser::new_ext(&*self.0, Options::ENABLE_STRIKETHROUGH)
            .map(|event| match event {
                Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
                Event::Start(Tag::Link { link_type, dest_url, title, id }) => {
                    Event::Start(Tag::Link { link_type, dest_url: safe_url(dest_url), title, id })
                }
                Event::Start(Tag::Image { link_type, dest_url, title, id }) => {
                    Event::Start(Tag::Image { link_type, dest_url: safe_url(dest_url), title, id })
                }
                _ => event,
            });

        let mut html_output = String::new();
        pulldown_cmark::html::push_html(&mut html_output, parser);
        html_output
    }
}
