//! Postgres persistence: pool construction, schema bootstrap and per-table queries.

pub mod projects;
pub mod users;

use crate::config::Config;
use sqlx::{postgres::PgPoolOptions, PgPool};

const SCHEMA: [&str; 3] = [
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id SERIAL PRIMARY KEY,
        email TEXT NOT NULL UNIQUE,
        password_hash TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS projects (
        id SERIAL PRIMARY KEY,
        title TEXT NOT NULL,
        doc_type TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS document_sections (
        id SERIAL PRIMARY KEY,
        project_id INTEGER NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
        sequence_order INTEGER NOT NULL,
        heading TEXT,
        content TEXT NOT NULL,
        is_liked BOOLEAN NOT NULL DEFAULT FALSE,
        is_disliked BOOLEAN NOT NULL DEFAULT FALSE,
        user_notes TEXT
    )
    "#,
];

/// Opens the connection pool. Each request checks out a connection and returns it on drop.
pub async fn connect(config: &Config) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await
}

/// Key for the advisory lock that serialises schema bootstrap across processes.
const SCHEMA_LOCK_KEY: i64 = 0x646f_6366_6f72;

/// Creates the three tables if they do not exist yet.
///
/// Concurrent `CREATE TABLE IF NOT EXISTS` can still collide in Postgres, so the
/// statements run in one transaction holding an advisory lock.
pub async fn init_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;
    sqlx::query("SELECT pg_advisory_xact_lock($1)")
        .bind(SCHEMA_LOCK_KEY)
        .execute(&mut *tx)
        .await?;

    for statement in SCHEMA {
        sqlx::query(statement).execute(&mut *tx).await?;
    }
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_projects_user_id ON projects (user_id)")
        .execute(&mut *tx)
        .await?;
    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_document_sections_project_id ON document_sections (project_id)",
    )
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    log::info!("database schema ready");
    Ok(())
}
