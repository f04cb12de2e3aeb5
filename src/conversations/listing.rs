use axum::{debug_handler, extract::State, response::{Html, IntoResponse, Response}};
use sqlx::{FromRow, SqlitePool};

use crate::{auth::CurrentUser, include_res, res::{escape_html, flash_html}, session, AppResult};

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct ConversationItem {
    pub id: String,
    pub subject: String,
    pub unread: i64,
}

/// Conversations `person_id` can currently see, newest first.
pub async fn visible_conversations(db_pool: &SqlitePool, person_id: &str) -> Result<Vec<ConversationItem>, sqlx::Error> {
    sqlx::query_as(
        "SELECT conversations.id,conversations.subject,conversation_visibilities.unread \
         FROM conversations JOIN conversation_visibilities ON conversation_visibilities.conversation_id=conversations.id \
         WHERE conversation_visibilities.person_id=? \
         ORDER BY conversations.created_at DESC, conversations.id DESC",
    )
        .bind(person_id)
        .fetch_all(db_pool)
        .await
}

#[debug_handler(state = crate::AppState)]
pub(crate) async fn conversations(
    current_user: CurrentUser,
    State(db_pool): State<SqlitePool>,
) -> AppResult<Response> {
    let person_id = current_user.person_id(&db_pool).await?;
    let flash = session::take_flash(&current_user.session).await?;

    let items = visible_conversations(&db_pool, &person_id).await?;
    let mut conversation_items = String::new();
    for item in &items {
        conversation_items += &include_res!(str, "/pages/conversations/item.html")
            .replace("{id}", &escape_html(&item.id))
            .replace("{unread}", &item.unread.to_string())
            .replace("{subject}", &escape_html(&item.subject));
    }
    if items.is_empty() {
        conversation_items += include_res!(str, "/pages/conversations/empty.html");
    }

    Ok(Html(
        include_res!(str, "/pages/conversations/index.html")
            .replace("{conversation_items}", &conversation_items)
            .replace("{flash}", &flash_html(&flash))
    ).into_response())
}
