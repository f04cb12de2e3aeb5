use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use crate::AppResult;

pub const USER_ID: &str = "user_id";
pub const FLASH: &str = "flash";

/// One-shot messages carried across a redirect.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub notice: Option<String>,
    pub alert: Option<String>,
}

impl Flash {
    pub fn is_empty(&self) -> bool {
        self.notice.is_none() && self.alert.is_none()
    }
}

pub async fn flash_notice(session: &Session, notice: impl Into<String>) -> AppResult<()> {
    let mut flash = session.get::<Flash>(FLASH).await?.unwrap_or_default();
    flash.notice = Some(notice.into());
    session.insert(FLASH, flash).await?;
    Ok(())
}

pub async fn flash_alert(session: &Session, alert: impl Into<String>) -> AppResult<()> {
    let mut flash = session.get::<Flash>(FLASH).await?.unwrap_or_default();
    flash.alert = Some(alert.into());
    session.insert(FLASH, flash).await?;
    Ok(())
}

/// Returns the pending flash and clears it.
pub async fn take_flash(session: &Session) -> AppResult<Flash> {
    Ok(session.remove::<Flash>(FLASH).await?.unwrap_or_default())
}
