use axum::{extract::FromRequestParts, http::{request::Parts, StatusCode}, response::{IntoResponse, Response}};
use sqlx::SqlitePool;
use tower_sessions::Session;

use crate::{session::USER_ID, AppError, AppResult};

/// Rejection for requests without a signed-in user.
#[derive(Debug)]
pub struct AuthRequired;

impl IntoResponse for AuthRequired {
    fn into_response(self) -> Response {
        (
            StatusCode::UNAUTHORIZED,
            "You need to sign in or sign up before continuing.",
        )
            .into_response()
    }
}

/// The signed-in user of a request, plus the session it came from.
#[derive(Clone)]
pub struct CurrentUser {
    pub user_id: String,
    pub session: Session,
}

impl CurrentUser {
    /// Id of the person owned by this user.
    pub async fn person_id(&self, db_pool: &SqlitePool) -> AppResult<String> {
        let Some((person_id,)): Option<(String,)> = sqlx::query_as("SELECT id FROM people WHERE owner_id=?")
            .bind(&self.user_id)
            .fetch_optional(db_pool)
            .await?
        else {
            return Err(format!("user {} has no person", self.user_id))?;
        };

        Ok(person_id)
    }
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(IntoResponse::into_response)?;

        let user_id = session
            .get::<String>(USER_ID)
            .await
            .map_err(|err| AppError::from(err).into_response())?;

        match user_id {
            Some(user_id) => Ok(CurrentUser { user_id, session }),
            None => {
                tracing::debug!(path = %parts.uri.path(), "rejecting anonymous request");
                Err(AuthRequired.into_response())
            }
        }
    }
}
