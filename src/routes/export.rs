use crate::{error::AppError, export::ExportFormat};
use actix_web::{http::header, post, web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct ExportRequest {
    pub content: String,
}

fn attachment(format: ExportFormat, content: &str) -> Result<HttpResponse, AppError> {
    let bytes = format.render(content)?;
    log::debug!("exported {} bytes as {}", bytes.len(), format.filename());

    Ok(HttpResponse::Ok()
        .content_type(format.media_type())
        .insert_header((header::CONTENT_DISPOSITION, format.content_disposition()))
        .body(bytes))
}

/// Word document with a fixed heading and the content as body paragraphs.
#[post("/docx")]
pub async fn export_docx(request: web::Json<ExportRequest>) -> Result<impl Responder, AppError> {
    attachment(ExportFormat::Docx, &request.content)
}

/// Single "Title and Content" slide.
#[post("/pptx")]
pub async fn export_pptx(request: web::Json<ExportRequest>) -> Result<impl Responder, AppError> {
    attachment(ExportFormat::Pptx, &request.content)
}

/// Paginated PDF with the content word-wrapped to the page width.
#[post("/pdf")]
pub async fn export_pdf(request: web::Json<ExportRequest>) -> Result<impl Responder, AppError> {
    attachment(ExportFormat::Pdf, &request.content)
}
