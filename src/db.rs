use std::str::FromStr;

use anyhow::Context;
use sqlx::{sqlite::{SqliteConnectOptions, SqlitePoolOptions}, SqlitePool};
use time::OffsetDateTime;
use uuid::Uuid;

pub async fn connect_pool(database_url: &str, max_connections: u32) -> anyhow::Result<SqlitePool> {
    // foreign_keys is a per-connection setting, so it lives on the connect options
    let connect_options = SqliteConnectOptions::from_str(database_url)
        .with_context(|| format!("parse sqlite url {database_url}"))?
        .foreign_keys(true);

    let db_pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(connect_options)
        .await
        .with_context(|| format!("connect to sqlite via {database_url}"))?;
    Ok(db_pool)
}

// unique: (person_id, conversation_id) on conversation_visibilities
// unique: (user_id, person_id) on contacts
// unique: (user_id, tag_id) on tag_followings
const MIGRATIONS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id               TEXT PRIMARY KEY,
        username         TEXT NOT NULL UNIQUE,
        getting_started  BOOLEAN NOT NULL DEFAULT 1
    );"#,
    r#"
    CREATE TABLE IF NOT EXISTS people (
        id        TEXT PRIMARY KEY,
        owner_id  TEXT REFERENCES users(id),
        handle    TEXT NOT NULL UNIQUE
    );"#,
    r#"
    CREATE TABLE IF NOT EXISTS profiles (
        person_id   TEXT PRIMARY KEY REFERENCES people(id),
        first_name  TEXT,
        last_name   TEXT,
        image_url   TEXT,
        birthday    TEXT,
        gender      TEXT,
        location    TEXT,
        tag_string  TEXT,
        bio         TEXT
    );"#,
    r#"
    CREATE TABLE IF NOT EXISTS contacts (
        id         TEXT PRIMARY KEY,
        user_id    TEXT NOT NULL REFERENCES users(id),
        person_id  TEXT NOT NULL REFERENCES people(id),
        sharing    BOOLEAN NOT NULL DEFAULT 0,
        receiving  BOOLEAN NOT NULL DEFAULT 0,
        UNIQUE (user_id, person_id)
    );"#,
    r#"
    CREATE TABLE IF NOT EXISTS tags (
        id    TEXT PRIMARY KEY,
        name  TEXT NOT NULL UNIQUE
    );"#,
    r#"
    CREATE TABLE IF NOT EXISTS tag_followings (
        user_id  TEXT NOT NULL REFERENCES users(id),
        tag_id   TEXT NOT NULL REFERENCES tags(id),
        PRIMARY KEY (user_id, tag_id)
    );"#,
    r#"
    CREATE TABLE IF NOT EXISTS services (
        id       TEXT PRIMARY KEY,
        user_id  TEXT NOT NULL REFERENCES users(id),
        kind     TEXT NOT NULL,
        uid      TEXT NOT NULL
    );"#,
    r#"
    CREATE TABLE IF NOT EXISTS authorizations (
        id          TEXT PRIMARY KEY,
        user_id     TEXT NOT NULL REFERENCES users(id),
        client_name TEXT NOT NULL
    );"#,
    r#"
    CREATE TABLE IF NOT EXISTS conversations (
        id          TEXT PRIMARY KEY,
        author_id   TEXT NOT NULL REFERENCES people(id),
        subject     TEXT NOT NULL,
        created_at  TEXT NOT NULL
    );"#,
    r#"
    CREATE TABLE IF NOT EXISTS conversation_visibilities (
        id               TEXT PRIMARY KEY,
        conversation_id  TEXT NOT NULL REFERENCES conversations(id),
        person_id        TEXT NOT NULL REFERENCES people(id),
        unread           INTEGER NOT NULL DEFAULT 0,
        UNIQUE (person_id, conversation_id)
    );"#,
];

pub async fn run_migrations(db_pool: &SqlitePool) -> anyhow::Result<()> {
    for stmt in MIGRATIONS {
        sqlx::query(stmt)
            .execute(db_pool)
            .await
            .with_context(|| format!("apply migration: {}", stmt.trim().lines().next().unwrap_or_default()))?;
    }
    tracing::debug!(count = MIGRATIONS.len(), "migrations applied");
    Ok(())
}

/// Creates a user with its person and an empty profile.
/// Returns `(user_id, person_id)`.
pub async fn create_user(db_pool: &SqlitePool, username: &str) -> Result<(String, String), sqlx::Error> {
    let user_id = Uuid::now_v7().to_string();
    let person_id = Uuid::now_v7().to_string();

    let mut tx = db_pool.begin().await?;
    sqlx::query("INSERT INTO users (id,username) VALUES (?,?)")
        .bind(&user_id)
        .bind(username)
        .execute(&mut *tx)
        .await?;
    sqlx::query("INSERT INTO people (id,owner_id,handle) VALUES (?,?,?)")
        .bind(&person_id)
        .bind(&user_id)
        .bind(format!("{username}@localhost"))
        .execute(&mut *tx)
        .await?;
    sqlx::query("INSERT INTO profiles (person_id) VALUES (?)")
        .bind(&person_id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;

    tracing::info!(%user_id, username, "user created");
    Ok((user_id, person_id))
}

pub async fn create_conversation(db_pool: &SqlitePool, author_id: &str, subject: &str) -> Result<String, sqlx::Error> {
    let id = Uuid::now_v7().to_string();
    sqlx::query("INSERT INTO conversations (id,author_id,subject,created_at) VALUES (?,?,?,?)")
        .bind(&id)
        .bind(author_id)
        .bind(subject)
        .bind(OffsetDateTime::now_utc())
        .execute(db_pool)
        .await?;
    Ok(id)
}

/// Makes a conversation visible to a person. Sharing twice is a no-op.
pub async fn share_conversation(db_pool: &SqlitePool, conversation_id: &str, person_id: &str) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT OR IGNORE INTO conversation_visibilities (id,conversation_id,person_id) VALUES (?,?,?)")
        .bind(Uuid::now_v7().to_string())
        .bind(conversation_id)
        .bind(person_id)
        .execute(db_pool)
        .await?;
    Ok(())
}
