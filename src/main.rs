use anyhow::Context;
use podside::{config::PodConfig, db, router, AppState};
use tower_sessions::{cookie::SameSite, Expiry, MemoryStore, SessionManagerLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "podside=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = PodConfig::load().context("load config")?;
    tracing::info!(
        bind_addr = %config.bind_addr,
        configured_services = ?config.configured_services,
        "starting pod"
    );

    let session_store = MemoryStore::default();
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(false)
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(time::Duration::minutes(config.session_idle_minutes)));

    let db_pool = db::connect_pool(&config.database_url, 16).await?;
    db::run_migrations(&db_pool).await.context("run migrations")?;

    let app_state = AppState {
        db_pool,
        onboarding: config.onboarding(),
    };

    let app = router()
        .with_state(app_state)
        .layer(session_layer);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("bind {}", config.bind_addr))?;
    tracing::info!("listening on http://{}", config.bind_addr);
    axum::serve(listener, app).await.context("server shutdown")?;

    Ok(())
}
