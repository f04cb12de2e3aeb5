use axum::{debug_handler, extract::Query, response::Redirect};
use serde::Deserialize;
use tower_sessions::Session;

use crate::{session::USER_ID, AppResult};

#[derive(Deserialize)]
pub struct LogoutQuery {
    pub return_url: Option<String>,
}

#[debug_handler]
pub async fn logout(
    Query(LogoutQuery { return_url }): Query<LogoutQuery>,
    session: Session
) -> AppResult<Redirect> {
    if let Some(user_id) = session.get::<String>(USER_ID).await? {
        tracing::info!(%user_id, "signed out");
    }
    session.flush().await?;

    // only local paths, never an absolute url
    let return_url = return_url
        .filter(|url| url.starts_with('/') && !url.starts_with("//"))
        .unwrap_or("/".to_owned());
    Ok(Redirect::to(&return_url))
}
