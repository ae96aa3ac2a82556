#![allow(dead_code)]

use actix_web::{web, App};

use buenavista_api::models::itinerary::ReferenceItinerary;
use buenavista_api::models::spot::SpotContext;
use buenavista_api::routes::chat::{chat, ChatState};
use buenavista_api::services::catalog_service::ReferenceData;
use buenavista_api::services::chat_service::ChatOrchestrator;
use buenavista_api::services::gemini_service::{GeminiError, LanguageModel};
use buenavista_api::services::storage_service::ImageUrlResolver;

pub const TEST_STORAGE_URL: &str = "https://example.supabase.co";

/// Canned language model: replies with a fixed string, or fails every call.
pub struct FakeModel {
    reply: Option<String>,
}

impl FakeModel {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Some(reply.to_string()),
        }
    }

    pub fn failing() -> Self {
        Self { reply: None }
    }
}

impl LanguageModel for FakeModel {
    async fn generate(&self, _prompt: &str) -> Result<String, GeminiError> {
        match &self.reply {
            Some(reply) => Ok(reply.clone()),
            None => Err(GeminiError::ResponseError(
                "simulated model failure".to_string(),
            )),
        }
    }
}

/// In-memory reference data standing in for the hosted database.
#[derive(Default)]
pub struct FakeReference {
    pub spots: Vec<SpotContext>,
    pub itineraries: Vec<ReferenceItinerary>,
}

impl FakeReference {
    pub fn with_spots(spots: Vec<SpotContext>) -> Self {
        Self {
            spots,
            itineraries: Vec::new(),
        }
    }
}

impl ReferenceData for FakeReference {
    async fn fetch_spots(&self) -> Vec<SpotContext> {
        self.spots.clone()
    }

    async fn fetch_reference_itineraries(&self) -> Vec<ReferenceItinerary> {
        self.itineraries.clone()
    }
}

pub fn test_resolver() -> ImageUrlResolver {
    ImageUrlResolver::new(TEST_STORAGE_URL, "images")
}

pub fn spot(id: &str, title: &str, lat: Option<f64>, lng: Option<f64>) -> SpotContext {
    SpotContext {
        id: id.to_string(),
        title: title.to_string(),
        location: Some("Buenavista".to_string()),
        description: Some("A lovely place".to_string()),
        tags: Some(vec!["nature".to_string()]),
        rating: Some(4.5),
        pricing: None,
        amenities: Some(vec!["parking".to_string()]),
        lat,
        lng,
        images: None,
    }
}

pub fn catalog() -> Vec<SpotContext> {
    vec![
        spot("cove-1", "Example Cove", Some(10.95), Some(124.54)),
        spot("falls-1", "Example Falls", Some(10.97), Some(124.58)),
        spot("deck-1", "Example Falls View Deck", Some(10.98), Some(124.59)),
    ]
}

pub fn test_orchestrator(
    model: FakeModel,
    reference: FakeReference,
) -> ChatOrchestrator<FakeModel, FakeReference> {
    ChatOrchestrator::new(model, reference, test_resolver())
}

/// Actix app with the chat route wired to fakes, mirroring the production
/// route table in main.rs.
pub fn test_app(
    state: ChatState<FakeModel, FakeReference>,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .route("/health", web::get().to(|| async { "OK" }))
        .service(
            web::scope("/api").route("/chat", web::post().to(chat::<FakeModel, FakeReference>)),
        )
}

pub fn configured_state(model: FakeModel, reference: FakeReference) -> ChatState<FakeModel, FakeReference> {
    ChatState {
        orchestrator: Some(test_orchestrator(model, reference)),
    }
}

pub fn unconfigured_state() -> ChatState<FakeModel, FakeReference> {
    ChatState { orchestrator: None }
}
