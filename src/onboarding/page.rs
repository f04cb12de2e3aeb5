use axum::{debug_handler, extract::State, response::{Html, IntoResponse, Redirect, Response}, Json};
use sqlx::SqlitePool;

use crate::{auth::CurrentUser, include_res, res::escape_html, users::{self, User}, AppResult, AppState, Markdown};

use super::{GettingStarted, OnboardingConfig, OnboardingStatus};

struct Step {
    done: bool,
    title: &'static str,
    href: &'static str,
}

fn steps(getting_started: &GettingStarted) -> [Step; 5] {
    [
        Step { done: getting_started.has_completed_profile(), title: "Fill out your profile", href: "/profile/edit" },
        Step { done: getting_started.has_connected_services(), title: "Connect to your other services", href: "/services" },
        Step { done: getting_started.has_few_contacts(), title: "Find some people to follow", href: "/people" },
        Step { done: getting_started.has_few_followed_tags(), title: "Follow a few tags", href: "/tags" },
        Step { done: getting_started.has_connected_cubbies(), title: "Connect a cubby", href: "/authorizations" },
    ]
}

#[debug_handler(state = AppState)]
pub(crate) async fn getting_started(
    current_user: CurrentUser,
    State(db_pool): State<SqlitePool>,
    State(config): State<OnboardingConfig>,
) -> AppResult<Response> {
    let user = User::load(&db_pool, &current_user.user_id).await?;
    let getting_started = GettingStarted::new(&config, &user);

    let mut step_items = String::new();
    for step in steps(&getting_started) {
        step_items += &include_res!(str, "/pages/getting_started/step.html")
            .replace("{state}", if step.done { "done" } else { "todo" })
            .replace("{href}", step.href)
            .replace("{title}", step.title);
    }

    let finish = if getting_started.has_completed_getting_started() {
        ""
    } else {
        include_res!(str, "/pages/getting_started/finish.html")
    };

    // braces in user text would otherwise match a later template slot
    let bio = user.person.profile.bio
        .as_deref()
        .map(|bio| Markdown(bio).to_html().replace('{', "&#123;").replace('}', "&#125;"))
        .unwrap_or_default();

    Ok(Html(
        include_res!(str, "/pages/getting_started/index.html")
            .replace("{steps}", &step_items)
            .replace("{finish}", finish)
            .replace("{welcome_text}", &escape_html(&getting_started.welcome_text()))
            .replace("{bio}", &bio)
    ).into_response())
}

#[debug_handler(state = AppState)]
pub(crate) async fn getting_started_json(
    current_user: CurrentUser,
    State(db_pool): State<SqlitePool>,
    State(config): State<OnboardingConfig>,
) -> AppResult<Json<OnboardingStatus>> {
    let user = User::load(&db_pool, &current_user.user_id).await?;
    Ok(Json(GettingStarted::new(&config, &user).status()))
}

#[debug_handler(state = AppState)]
pub(crate) async fn complete(
    current_user: CurrentUser,
    State(db_pool): State<SqlitePool>,
) -> AppResult<Redirect> {
    if users::finish_getting_started(&db_pool, &current_user.user_id).await? {
        tracing::info!(user_id = %current_user.user_id, "getting started completed");
    }
    Ok(Redirect::to("/conversations"))
}
