pub mod auth;
pub mod export;
pub mod generate;
pub mod health;
pub mod projects;

use actix_web::web;

/// Registers every route. Handlers pull `PgPool`, `TokenService` and
/// `GenerationClient` from app data, so the caller must register those.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(health::root)
        .service(health::health)
        .service(auth::register)
        .service(auth::login)
        .service(generate::generate)
        .service(generate::refine)
        .service(
            web::scope("/export")
                .service(export::export_docx)
                .service(export::export_pptx)
                .service(export::export_pdf),
        )
        .service(
            web::scope("/projects")
                .service(projects::list_projects)
                .service(projects::create_project)
                .service(projects::get_project)
                .service(projects::delete_project)
                .service(projects::update_feedback),
        );
}
