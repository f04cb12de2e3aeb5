mod evaluator;
mod page;

use axum::{routing::{get, post}, Router};

use crate::AppState;

pub use evaluator::{GettingStarted, OnboardingStatus};

/// Service kinds this pod lets users connect, e.g. `twitter`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OnboardingConfig {
    configured_services: Vec<String>,
}

impl OnboardingConfig {
    pub fn new(configured_services: Vec<String>) -> Self {
        Self { configured_services }
    }

    pub fn configured_services(&self) -> &[String] {
        &self.configured_services
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/getting_started", get(page::getting_started))
        .route("/getting_started.json", get(page::getting_started_json))
        .route("/getting_started/complete", post(page::complete))
}
