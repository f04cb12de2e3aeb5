mod listing;
mod visibility;

use axum::{routing::{delete, get, post}, Router};

use crate::AppState;

pub use listing::{visible_conversations, ConversationItem};
pub use visibility::{find_visibility, remove_visibility, ConversationVisibility, VisibilityRemoval, REMOVED_NOTICE, REMOVE_FAILED_ALERT};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/conversations", get(listing::conversations))
        .route("/conversations/{conversation_id}/visibility", delete(visibility::destroy))
        .route("/conversations/{conversation_id}/visibility/delete", post(visibility::destroy))
}
