use actix_web::{web, HttpResponse, Responder};

use crate::models::chat::ChatRequest;
use crate::services::catalog_service::ReferenceData;
use crate::services::chat_service::{ChatError, ChatOrchestrator};
use crate::services::gemini_service::LanguageModel;

const GENERIC_FAILURE: &str =
    "Sorry, I'm having trouble processing your request right now. Please try again in a moment.";
const NOT_CONFIGURED: &str = "The assistant is not available right now. Please try again later.";

/// Shared application state for the chat route. `None` means the model
/// client could not be constructed at startup (missing API key); the route
/// then refuses requests before doing any work.
pub struct ChatState<M, R> {
    pub orchestrator: Option<ChatOrchestrator<M, R>>,
}

/*
    POST /api/chat
*/
pub async fn chat<M, R>(
    payload: web::Json<ChatRequest>,
    data: web::Data<ChatState<M, R>>,
) -> impl Responder
where
    M: LanguageModel + 'static,
    R: ReferenceData + 'static,
{
    let request = payload.into_inner();

    if request.message.trim().is_empty() {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "error": "Message is required"
        }));
    }

    if request.history.iter().any(|turn| turn.content.is_empty()) {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "error": "History turns must have non-empty content"
        }));
    }

    let Some(orchestrator) = data.orchestrator.as_ref() else {
        eprintln!("Chat request rejected: model client not configured");
        return HttpResponse::InternalServerError().json(serde_json::json!({
            "error": NOT_CONFIGURED
        }));
    };

    match orchestrator.respond(&request.message, &request.history).await {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(err) => {
            // Log sizes rather than message content.
            eprintln!(
                "Chat pipeline failed (message {} chars, history {} turns): {}",
                request.message.len(),
                request.history.len(),
                err
            );

            let mut body = serde_json::json!({ "error": GENERIC_FAILURE });
            if cfg!(debug_assertions) {
                let stage = match err {
                    ChatError::Generation(_) => "model call failed",
                    ChatError::EmptyReply => "model returned empty reply",
                };
                body["details"] = serde_json::json!(format!("{}: {}", stage, err));
            }

            HttpResponse::InternalServerError().json(body)
        }
    }
}
