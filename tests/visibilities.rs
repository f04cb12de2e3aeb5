mod common;

use axum::http::{Method, StatusCode};
use common::{app, body_text, location, test_pool, TestClient};
use podside::{
    conversations::{find_visibility, remove_visibility, visible_conversations, VisibilityRemoval, REMOVED_NOTICE, REMOVE_FAILED_ALERT},
    db,
    onboarding::OnboardingConfig,
};

#[tokio::test]
async fn removing_a_visibility_hides_the_conversation() -> anyhow::Result<()> {
    let db_pool = test_pool().await;
    let (_, alice) = db::create_user(&db_pool, "alice").await?;
    let (_, bob) = db::create_user(&db_pool, "bob").await?;
    let conversation = db::create_conversation(&db_pool, &alice, "lunch?").await?;
    db::share_conversation(&db_pool, &conversation, &alice).await?;
    db::share_conversation(&db_pool, &conversation, &bob).await?;

    assert_eq!(remove_visibility(&db_pool, &alice, &conversation).await?, VisibilityRemoval::Removed);

    assert!(find_visibility(&db_pool, &alice, &conversation).await?.is_none());
    assert!(visible_conversations(&db_pool, &alice).await?.is_empty());
    // only alice stops seeing it
    assert!(find_visibility(&db_pool, &bob, &conversation).await?.is_some());
    Ok(())
}

#[tokio::test]
async fn removing_twice_is_a_no_op() -> anyhow::Result<()> {
    let db_pool = test_pool().await;
    let (_, alice) = db::create_user(&db_pool, "alice").await?;
    let conversation = db::create_conversation(&db_pool, &alice, "lunch?").await?;
    db::share_conversation(&db_pool, &conversation, &alice).await?;

    assert_eq!(remove_visibility(&db_pool, &alice, &conversation).await?, VisibilityRemoval::Removed);
    assert_eq!(remove_visibility(&db_pool, &alice, &conversation).await?, VisibilityRemoval::NotFound);
    assert_eq!(remove_visibility(&db_pool, &alice, "no-such-conversation").await?, VisibilityRemoval::NotFound);
    Ok(())
}

#[tokio::test]
async fn sharing_twice_keeps_one_visibility() -> anyhow::Result<()> {
    let db_pool = test_pool().await;
    let (_, alice) = db::create_user(&db_pool, "alice").await?;
    let conversation = db::create_conversation(&db_pool, &alice, "lunch?").await?;
    db::share_conversation(&db_pool, &conversation, &alice).await?;
    db::share_conversation(&db_pool, &conversation, &alice).await?;

    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM conversation_visibilities WHERE person_id=?")
        .bind(&alice)
        .fetch_one(&db_pool)
        .await?;
    assert_eq!(count, 1);
    Ok(())
}

#[tokio::test]
async fn anonymous_delete_is_rejected() -> anyhow::Result<()> {
    let db_pool = test_pool().await;
    let (_, alice) = db::create_user(&db_pool, "alice").await?;
    let conversation = db::create_conversation(&db_pool, &alice, "lunch?").await?;
    db::share_conversation(&db_pool, &conversation, &alice).await?;

    let mut client = TestClient::new(app(db_pool.clone(), OnboardingConfig::default()));
    let response = client
        .send(Method::DELETE, &format!("/conversations/{conversation}/visibility"))
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(find_visibility(&db_pool, &alice, &conversation).await?.is_some());
    Ok(())
}

#[tokio::test]
async fn delete_redirects_with_a_one_time_notice() -> anyhow::Result<()> {
    let db_pool = test_pool().await;
    let (alice_user, alice) = db::create_user(&db_pool, "alice").await?;
    let hidden = db::create_conversation(&db_pool, &alice, "lunch?").await?;
    let kept = db::create_conversation(&db_pool, &alice, "dinner?").await?;
    db::share_conversation(&db_pool, &hidden, &alice).await?;
    db::share_conversation(&db_pool, &kept, &alice).await?;

    let mut client = TestClient::new(app(db_pool.clone(), OnboardingConfig::default()));
    client.sign_in(&alice_user).await;

    let response = client
        .send(Method::DELETE, &format!("/conversations/{hidden}/visibility"))
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/conversations");
    assert!(find_visibility(&db_pool, &alice, &hidden).await?.is_none());

    let listing = body_text(client.get("/conversations").await).await;
    assert!(listing.contains(REMOVED_NOTICE));
    assert!(listing.contains("dinner?"));
    assert!(!listing.contains("lunch?"));

    let listing = body_text(client.get("/conversations").await).await;
    assert!(!listing.contains(REMOVED_NOTICE));
    Ok(())
}

#[tokio::test]
async fn delete_without_a_visibility_still_redirects() -> anyhow::Result<()> {
    let db_pool = test_pool().await;
    let (alice_user, _) = db::create_user(&db_pool, "alice").await?;

    let mut client = TestClient::new(app(db_pool.clone(), OnboardingConfig::default()));
    client.sign_in(&alice_user).await;

    let response = client
        .send(Method::DELETE, "/conversations/no-such-conversation/visibility")
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/conversations");

    let listing = body_text(client.get("/conversations").await).await;
    assert!(!listing.contains(REMOVED_NOTICE));
    assert!(listing.contains("No conversations"));
    Ok(())
}

#[tokio::test]
async fn cannot_remove_someone_elses_visibility() -> anyhow::Result<()> {
    let db_pool = test_pool().await;
    let (alice_user, alice) = db::create_user(&db_pool, "alice").await?;
    let (_, bob) = db::create_user(&db_pool, "bob").await?;
    let conversation = db::create_conversation(&db_pool, &bob, "secret").await?;
    db::share_conversation(&db_pool, &conversation, &bob).await?;

    let mut client = TestClient::new(app(db_pool.clone(), OnboardingConfig::default()));
    client.sign_in(&alice_user).await;

    let response = client
        .send(Method::DELETE, &format!("/conversations/{conversation}/visibility"))
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert!(find_visibility(&db_pool, &bob, &conversation).await?.is_some());
    assert!(find_visibility(&db_pool, &alice, &conversation).await?.is_none());
    Ok(())
}

#[tokio::test]
async fn form_post_removes_like_delete() -> anyhow::Result<()> {
    let db_pool = test_pool().await;
    let (alice_user, alice) = db::create_user(&db_pool, "alice").await?;
    let conversation = db::create_conversation(&db_pool, &alice, "lunch?").await?;
    db::share_conversation(&db_pool, &conversation, &alice).await?;

    let mut client = TestClient::new(app(db_pool.clone(), OnboardingConfig::default()));
    client.sign_in(&alice_user).await;

    let response = client
        .send(Method::POST, &format!("/conversations/{conversation}/visibility/delete"))
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert!(find_visibility(&db_pool, &alice, &conversation).await?.is_none());
    Ok(())
}

#[tokio::test]
async fn failed_delete_is_reported() -> anyhow::Result<()> {
    let db_pool = test_pool().await;
    let (alice_user, alice) = db::create_user(&db_pool, "alice").await?;
    let conversation = db::create_conversation(&db_pool, &alice, "lunch?").await?;
    db::share_conversation(&db_pool, &conversation, &alice).await?;
    sqlx::query(
        "CREATE TRIGGER keep_visibilities BEFORE DELETE ON conversation_visibilities \
         BEGIN SELECT RAISE(ABORT, 'visibilities are locked'); END;",
    )
        .execute(&db_pool)
        .await?;

    assert!(remove_visibility(&db_pool, &alice, &conversation).await.is_err());

    let mut client = TestClient::new(app(db_pool.clone(), OnboardingConfig::default()));
    client.sign_in(&alice_user).await;

    let response = client
        .send(Method::DELETE, &format!("/conversations/{conversation}/visibility"))
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/conversations");

    let listing = body_text(client.get("/conversations").await).await;
    assert!(listing.contains(REMOVE_FAILED_ALERT));
    assert!(!listing.contains(REMOVED_NOTICE));
    assert!(listing.contains("lunch?"));
    Ok(())
}

#[tokio::test]
async fn sharing_with_an_unknown_person_is_rejected() -> anyhow::Result<()> {
    let db_pool = test_pool().await;
    let (_, alice) = db::create_user(&db_pool, "alice").await?;
    let conversation = db::create_conversation(&db_pool, &alice, "lunch?").await?;

    assert!(db::share_conversation(&db_pool, &conversation, "no-such-person").await.is_err());
    assert!(db::create_conversation(&db_pool, "no-such-person", "ghost").await.is_err());
    Ok(())
}
