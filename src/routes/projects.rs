use crate::{
    db,
    error::AppError,
    models::{CurrentUser, FeedbackInput, ProjectDetail, ProjectInput},
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use serde_json::json;
use sqlx::PgPool;

const NOT_FOUND: &str = "Project not found";

/// Saves a project for the authenticated user.
///
/// The project row and its single section are written in one transaction.
///
/// ## Request Body:
/// - `title`: stored as given.
/// - `content`: the document text, stored in section 1.
/// - `doc_type`: a free-form tag such as `docx`, `pptx` or `pdf`.
///
/// ## Responses:
/// - `200 OK`: `{"project_id": <id>}`.
/// - `401 Unauthorized`: missing or invalid bearer token.
#[post("")]
pub async fn create_project(
    pool: web::Data<PgPool>,
    user: CurrentUser,
    project_data: web::Json<ProjectInput>,
) -> Result<impl Responder, AppError> {
    let project_id = db::projects::create_project(&pool, user.id, &project_data).await?;
    log::info!("user {} saved project {}", user.id, project_id);

    Ok(HttpResponse::Ok().json(json!({ "project_id": project_id })))
}

/// Lists the authenticated user's projects, newest first.
///
/// Each entry is `{id, title, created_at, content}` where `content` comes from the
/// first section. No pagination.
#[get("")]
pub async fn list_projects(
    pool: web::Data<PgPool>,
    user: CurrentUser,
) -> Result<impl Responder, AppError> {
    let projects = db::projects::list_for_user(&pool, user.id).await?;
    Ok(HttpResponse::Ok().json(projects))
}

/// Returns one project with all of its sections and their feedback.
///
/// ## Responses:
/// - `404 Not Found`: the project does not exist or belongs to someone else.
#[get("/{id}")]
pub async fn get_project(
    pool: web::Data<PgPool>,
    user: CurrentUser,
    project_id: web::Path<i32>,
) -> Result<impl Responder, AppError> {
    let project = db::projects::find_owned(&pool, project_id.into_inner(), user.id)
        .await?
        .ok_or_else(|| AppError::NotFound(NOT_FOUND.into()))?;
    let sections = db::projects::sections_for(&pool, project.id).await?;

    Ok(HttpResponse::Ok().json(ProjectDetail { project, sections }))
}

/// Deletes a project and its sections.
///
/// ## Responses:
/// - `200 OK`: `{"message": "Project deleted"}`.
/// - `404 Not Found`: the project does not exist or belongs to someone else.
#[delete("/{id}")]
pub async fn delete_project(
    pool: web::Data<PgPool>,
    user: CurrentUser,
    project_id: web::Path<i32>,
) -> Result<impl Responder, AppError> {
    let project_id = project_id.into_inner();

    if !db::projects::delete_owned(&pool, project_id, user.id).await? {
        return Err(AppError::NotFound(NOT_FOUND.into()));
    }

    log::info!("user {} deleted project {}", user.id, project_id);
    Ok(HttpResponse::Ok().json(json!({ "message": "Project deleted" })))
}

/// Records like/dislike flags and notes on the project's sections.
///
/// ## Responses:
/// - `200 OK`: `{"message": "Feedback saved"}`.
/// - `404 Not Found`: the project does not exist or belongs to someone else.
#[put("/{id}/feedback")]
pub async fn update_feedback(
    pool: web::Data<PgPool>,
    user: CurrentUser,
    project_id: web::Path<i32>,
    feedback: web::Json<FeedbackInput>,
) -> Result<impl Responder, AppError> {
    let updated =
        db::projects::update_feedback(&pool, project_id.into_inner(), user.id, &feedback).await?;

    if !updated {
        return Err(AppError::NotFound(NOT_FOUND.into()));
    }

    Ok(HttpResponse::Ok().json(json!({ "message": "Feedback saved" })))
}
