use axum::{debug_handler, extract::{Path, State}, response::Redirect};
use sqlx::{FromRow, SqlitePool};

use crate::{auth::CurrentUser, session, AppResult};

pub const REMOVED_NOTICE: &str = "Conversation successfully removed";
pub const REMOVE_FAILED_ALERT: &str = "Conversation could not be removed";

/// A person's view of a conversation. Deleting it hides the conversation
/// for that person only.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct ConversationVisibility {
    pub id: String,
    pub conversation_id: String,
    pub person_id: String,
    pub unread: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisibilityRemoval {
    Removed,
    NotFound,
}

pub async fn find_visibility(
    db_pool: &SqlitePool,
    person_id: &str,
    conversation_id: &str,
) -> Result<Option<ConversationVisibility>, sqlx::Error> {
    sqlx::query_as("SELECT id,conversation_id,person_id,unread FROM conversation_visibilities WHERE person_id=? AND conversation_id=? LIMIT 1")
        .bind(person_id)
        .bind(conversation_id)
        .fetch_optional(db_pool)
        .await
}

/// Deletes the visibility `person_id` has on `conversation_id`, if any.
pub async fn remove_visibility(
    db_pool: &SqlitePool,
    person_id: &str,
    conversation_id: &str,
) -> Result<VisibilityRemoval, sqlx::Error> {
    let Some(visibility) = find_visibility(db_pool, person_id, conversation_id).await? else {
        return Ok(VisibilityRemoval::NotFound);
    };

    let result = sqlx::query("DELETE FROM conversation_visibilities WHERE id=?")
        .bind(&visibility.id)
        .execute(db_pool)
        .await?;

    // lost a race with another removal
    if result.rows_affected() == 0 {
        return Ok(VisibilityRemoval::NotFound);
    }

    Ok(VisibilityRemoval::Removed)
}

#[debug_handler(state = crate::AppState)]
pub(crate) async fn destroy(
    current_user: CurrentUser,
    State(db_pool): State<SqlitePool>,
    Path(conversation_id): Path<String>,
) -> AppResult<Redirect> {
    let person_id = current_user.person_id(&db_pool).await?;

    match remove_visibility(&db_pool, &person_id, &conversation_id).await {
        Ok(VisibilityRemoval::Removed) => {
            tracing::info!(%person_id, %conversation_id, "conversation visibility removed");
            session::flash_notice(&current_user.session, REMOVED_NOTICE).await?;
        }
        Ok(VisibilityRemoval::NotFound) => {
            tracing::debug!(%person_id, %conversation_id, "no conversation visibility to remove");
        }
        Err(err) => {
            tracing::warn!(%person_id, %conversation_id, %err, "failed to remove conversation visibility");
            session::flash_alert(&current_user.session, REMOVE_FAILED_ALERT).await?;
        }
    }

    Ok(Redirect::to("/conversations"))
}
