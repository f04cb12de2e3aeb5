use std::{net::SocketAddr, path::Path};

use anyhow::Context;
use serde::Deserialize;

use crate::onboarding::OnboardingConfig;

/// Process configuration. A JSON file named by `POD_CONFIG` is read first,
/// then individual environment variables override it.
#[derive(Debug, Clone, Deserialize)]
pub struct PodConfig {
    #[serde(default = "default_database_url")]
    pub database_url: String,
    #[serde(default = "default_bind_addr")]
    pub bind_addr: SocketAddr,
    #[serde(default = "default_session_idle_minutes")]
    pub session_idle_minutes: i64,
    #[serde(default)]
    pub configured_services: Vec<String>,
}

fn default_database_url() -> String {
    "sqlite://podside.db?mode=rwc".to_owned()
}

fn default_bind_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8080))
}

fn default_session_idle_minutes() -> i64 {
    30
}

impl Default for PodConfig {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            bind_addr: default_bind_addr(),
            session_idle_minutes: default_session_idle_minutes(),
            configured_services: Vec::new(),
        }
    }
}

impl PodConfig {
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        serde_json::from_str(json).context("parse pod config json")
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("read pod config {}", path.display()))?;
        Self::from_json(&json)
    }

    /// Loads `.env`, the optional `POD_CONFIG` file, then env overrides.
    pub fn load() -> anyhow::Result<Self> {
        let _ = dotenv::dotenv();

        let mut config = match dotenv::var("POD_CONFIG") {
            Ok(path) => Self::from_file(Path::new(&path))?,
            Err(_) => Self::default(),
        };
        config.apply_overrides(|key| dotenv::var(key).ok())?;
        Ok(config)
    }

    pub fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) -> anyhow::Result<()> {
        if let Some(url) = var("DATABASE_URL") {
            self.database_url = url;
        }
        if let Some(addr) = var("BIND_ADDR") {
            self.bind_addr = addr.parse().with_context(|| format!("parse BIND_ADDR {addr}"))?;
        }
        if let Some(minutes) = var("SESSION_IDLE_MINUTES") {
            self.session_idle_minutes = minutes
                .parse()
                .with_context(|| format!("parse SESSION_IDLE_MINUTES {minutes}"))?;
        }
        if let Some(services) = var("CONFIGURED_SERVICES") {
            self.configured_services = services
                .split(',')
                .map(str::trim)
                .filter(|kind| !kind.is_empty())
                .map(str::to_owned)
                .collect();
        }
        Ok(())
    }

    pub fn onboarding(&self) -> OnboardingConfig {
        OnboardingConfig::new(self.configured_services.clone())
    }
}
