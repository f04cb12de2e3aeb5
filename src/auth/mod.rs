use axum::{routing::get, Router};
use tower_sessions::Session;

use crate::{session::USER_ID, AppResult, AppState};

mod current_user;
mod logout;

pub use current_user::{AuthRequired, CurrentUser};
pub use logout::logout;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/logout", get(logout))
}

/// Marks the session as belonging to `user_id`. Called by whatever identity
/// provider fronts the pod once it has verified the user.
pub async fn sign_in(session: &Session, user_id: &str) -> AppResult<()> {
    session.cycle_id().await?;
    session.insert(USER_ID, user_id).await?;

    tracing::info!(user_id, "signed in");
    Ok(())
}
