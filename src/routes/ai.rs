use actix_web::{http::header, web, HttpResponse};
use serde_json::json;

use crate::error::AppError;
use crate::services::ai_service::{ChatRequest, StoryIdeasRequest};
use crate::state::AppState;

/*
    POST /api/chat
*/
pub async fn chat(
    state: web::Data<AppState>,
    input: web::Json<ChatRequest>,
) -> Result<HttpResponse, AppError> {
    let request = input.into_inner();
    request.validate()?;

    let reply = state.assistant.chat(&request).await?;
    Ok(HttpResponse::Ok().json(reply))
}

/*
    POST /api/generateStoryIdeas
*/
pub async fn generate_story_ideas(
    state: web::Data<AppState>,
    input: web::Json<StoryIdeasRequest>,
) -> Result<HttpResponse, AppError> {
    let request = input.into_inner();
    request.validate()?;

    let ideas = state.assistant.story_ideas(&request).await?;
    Ok(HttpResponse::Ok().json(ideas))
}

/// Fallback for any method other than POST on the assistant endpoints.
pub async fn method_not_allowed() -> HttpResponse {
    HttpResponse::MethodNotAllowed()
        .insert_header((header::ALLOW, "POST"))
        .json(json!({
            "error": "Method Not Allowed",
            "details": "only POST is supported"
        }))
}
