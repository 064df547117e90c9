use crate::{
    error::AppError,
    generation::{refine_prompt, topic_prompt, GenerationClient},
};
use actix_web::{post, web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub topic: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RefineRequest {
    pub content: String,
    pub instruction: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ContentResponse {
    pub content: String,
}

/// Generates an introduction for `topic`.
///
/// Answers 200 with the model's text. On a service failure the body carries
/// `Error generating content: ...` instead, or the route answers 502 when
/// `GENERATION_ERRORS_AS_TEXT=false`.
#[post("/generate")]
pub async fn generate(
    client: web::Data<GenerationClient>,
    request: web::Json<GenerateRequest>,
) -> Result<impl Responder, AppError> {
    let content = client.respond(&topic_prompt(&request.topic)).await?;
    Ok(HttpResponse::Ok().json(ContentResponse { content }))
}

/// Rewrites `content` following `instruction`. Same failure policy as `/generate`.
#[post("/refine")]
pub async fn refine(
    client: web::Data<GenerationClient>,
    request: web::Json<RefineRequest>,
) -> Result<impl Responder, AppError> {
    let prompt = refine_prompt(&request.content, &request.instruction);
    let content = client.respond(&prompt).await?;
    Ok(HttpResponse::Ok().json(ContentResponse { content }))
}
