use crate::models::{
    DocumentSection, FeedbackInput, Project, ProjectInput, ProjectSummary, FIRST_SECTION,
};
use sqlx::PgPool;

/// Saves a project and its single section in one transaction. Returns the project id.
pub async fn create_project(
    pool: &PgPool,
    user_id: i32,
    input: &ProjectInput,
) -> Result<i32, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let (project_id,) = sqlx::query_as::<_, (i32,)>(
        "INSERT INTO projects (title, doc_type, user_id) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(&input.title)
    .bind(&input.doc_type)
    .bind(user_id)
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query(
        "INSERT INTO document_sections (project_id, sequence_order, heading, content)
         VALUES ($1, $2, $3, $4)",
    )
    .bind(project_id)
    .bind(FIRST_SECTION)
    .bind(&input.title)
    .bind(&input.content)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(project_id)
}

/// The caller's projects, newest first, each with its first section's content.
pub async fn list_for_user(pool: &PgPool, user_id: i32) -> Result<Vec<ProjectSummary>, sqlx::Error> {
    sqlx::query_as::<_, ProjectSummary>(
        "SELECT p.id, p.title, p.created_at, COALESCE(s.content, '') AS content
         FROM projects p
         LEFT JOIN document_sections s
           ON s.project_id = p.id AND s.sequence_order = $2
         WHERE p.user_id = $1
         ORDER BY p.created_at DESC, p.id DESC",
    )
    .bind(user_id)
    .bind(FIRST_SECTION)
    .fetch_all(pool)
    .await
}

/// Looks a project up by id, but only if `user_id` owns it.
pub async fn find_owned(
    pool: &PgPool,
    project_id: i32,
    user_id: i32,
) -> Result<Option<Project>, sqlx::Error> {
    sqlx::query_as::<_, Project>(
        "SELECT id, title, doc_type, created_at, user_id
         FROM projects WHERE id = $1 AND user_id = $2",
    )
    .bind(project_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

pub async fn sections_for(pool: &PgPool, project_id: i32) -> Result<Vec<DocumentSection>, sqlx::Error> {
    sqlx::query_as::<_, DocumentSection>(
        "SELECT id, project_id, sequence_order, heading, content, is_liked, is_disliked, user_notes
         FROM document_sections WHERE project_id = $1
         ORDER BY sequence_order",
    )
    .bind(project_id)
    .fetch_all(pool)
    .await
}

/// Deletes the project's sections and then the project itself.
///
/// Returns `false` without touching anything when the project is missing or not owned.
pub async fn delete_owned(pool: &PgPool, project_id: i32, user_id: i32) -> Result<bool, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let owned = sqlx::query_as::<_, (i32,)>(
        "SELECT id FROM projects WHERE id = $1 AND user_id = $2 FOR UPDATE",
    )
    .bind(project_id)
    .bind(user_id)
    .fetch_optional(&mut *tx)
    .await?;

    if owned.is_none() {
        tx.rollback().await?;
        return Ok(false);
    }

    sqlx::query("DELETE FROM document_sections WHERE project_id = $1")
        .bind(project_id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM projects WHERE id = $1")
        .bind(project_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(true)
}

/// Writes feedback onto the project's sections after re-checking ownership.
///
/// Returns `false` when the project is missing or not owned.
pub async fn update_feedback(
    pool: &PgPool,
    project_id: i32,
    user_id: i32,
    feedback: &FeedbackInput,
) -> Result<bool, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let owned = sqlx::query_as::<_, (i32,)>(
        "SELECT id FROM projects WHERE id = $1 AND user_id = $2",
    )
    .bind(project_id)
    .bind(user_id)
    .fetch_optional(&mut *tx)
    .await?;

    if owned.is_none() {
        tx.rollback().await?;
        return Ok(false);
    }

    sqlx::query(
        "UPDATE document_sections
         SET is_liked = $1, is_disliked = $2, user_notes = $3
         WHERE project_id = $4",
    )
    .bind(feedback.is_liked)
    .bind(feedback.is_disliked)
    .bind(&feedback.user_notes)
    .bind(project_id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(true)
}
