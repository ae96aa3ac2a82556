use std::error::Error;
use std::fmt;

use chrono::Utc;

use crate::models::chat::{ChatResponse, ChatTurn, Role};
use crate::models::itinerary::ReferenceItinerary;
use crate::models::spot::SpotContext;
use crate::services::budget_service::detect_budget;
use crate::services::catalog_service::ReferenceData;
use crate::services::extraction_service::extract_mentioned_spots;
use crate::services::gemini_service::{GeminiError, LanguageModel};
use crate::services::intent_service::is_itinerary_reply;
use crate::services::storage_service::ImageUrlResolver;

/// Sentinel the model is told to append when a reply is a finished, addable
/// plan. Stripped from the visible reply before it reaches the user.
pub const ITINERARY_MARKER: &str = "[ITINERARY_COMPLETE]";

/// Conversation window handed to the model and scanned for a budget.
pub const MAX_HISTORY_TURNS: usize = 12;

#[derive(Debug)]
pub enum ChatError {
    Generation(GeminiError),
    EmptyReply,
}

impl fmt::Display for ChatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatError::Generation(err) => write!(f, "Generation error: {}", err),
            ChatError::EmptyReply => write!(f, "Model returned an empty reply"),
        }
    }
}

impl Error for ChatError {}

impl From<GeminiError> for ChatError {
    fn from(err: GeminiError) -> Self {
        ChatError::Generation(err)
    }
}

/// Drives one conversational turn: window the history, resolve the budget,
/// assemble the prompt, call the model, and decide whether the reply is a
/// plan worth offering an "add to itinerary" action for.
///
/// The model client and reference-data reader are injected so the whole
/// pipeline runs against fakes in tests.
pub struct ChatOrchestrator<M, R> {
    model: M,
    reference: R,
    resolver: ImageUrlResolver,
}

impl<M: LanguageModel, R: ReferenceData> ChatOrchestrator<M, R> {
    pub fn new(model: M, reference: R, resolver: ImageUrlResolver) -> Self {
        Self {
            model,
            reference,
            resolver,
        }
    }

    pub async fn respond(
        &self,
        message: &str,
        history: &[ChatTurn],
    ) -> Result<ChatResponse, ChatError> {
        let window = merge_history(history, message);
        let budget = detect_budget(&window);

        // Independent reads; neither depends on the other.
        let (spots, itineraries) = tokio::join!(
            self.reference.fetch_spots(),
            self.reference.fetch_reference_itineraries()
        );

        let prompt = build_prompt(&window, budget, &spots, &itineraries);
        let raw_reply = self.model.generate(&prompt).await?;

        let has_marker = raw_reply.contains(ITINERARY_MARKER);
        let visible = raw_reply.replace(ITINERARY_MARKER, "");
        let visible = visible.trim();

        if visible.is_empty() {
            return Err(ChatError::EmptyReply);
        }

        let show_add_button = has_marker
            && is_itinerary_reply(visible)
            && budget.map_or(false, |amount| amount > 0.0);

        let mentioned_spots = if show_add_button {
            Some(extract_mentioned_spots(visible, &spots, &self.resolver))
        } else {
            None
        };

        Ok(ChatResponse {
            message: visible.to_string(),
            show_add_button,
            detected_budget: budget,
            mentioned_spots,
            timestamp: Utc::now().to_rfc3339(),
        })
    }
}

/// Appends the new user message to the history, or replaces the trailing turn
/// when the client already included the message there, then keeps only the
/// most recent turns.
pub fn merge_history(history: &[ChatTurn], message: &str) -> Vec<ChatTurn> {
    let mut window: Vec<ChatTurn> = history.to_vec();

    match window.last_mut() {
        Some(last) if last.role == Role::User => {
            last.content = message.to_string();
        }
        _ => window.push(ChatTurn::user(message)),
    }

    if window.len() > MAX_HISTORY_TURNS {
        window.drain(..window.len() - MAX_HISTORY_TURNS);
    }

    window
}

pub fn build_prompt(
    window: &[ChatTurn],
    budget: Option<f64>,
    spots: &[SpotContext],
    itineraries: &[ReferenceItinerary],
) -> String {
    let budget_line = match budget {
        Some(amount) => format!("The visitor's stated budget is ₱{}.", amount),
        None => "The visitor has not shared a budget yet.".to_string(),
    };

    let mut prompt = format!(
        "You are Sean, a friendly travel assistant for Buenavista, a beautiful destination in the Philippines. \
You help visitors discover spots, plan activities, and build day-by-day itineraries.\n\
\n\
IMPORTANT GUIDELINES:\n\
- Ask for the visitor's budget before laying out a detailed plan.\n\
- Only recommend places that exist in the spots list below, using their exact titles.\n\
- Never invent spots, prices, or amenities.\n\
- When presenting a plan, structure it with literal \"Day 1:\", \"Day 2:\" markers and suggest visit times.\n\
- Reply in plain text only, no markdown.\n\
- When, and only when, you present a finished itinerary the visitor could add to their trip, append {marker} at the very end of your reply.\n\
\n\
{budget_line}\n\
\n\
AVAILABLE SPOTS IN BUENAVISTA:\n{spots}\n\
\n\
RECENT ITINERARIES FOR REFERENCE:\n{itineraries}\n",
        marker = ITINERARY_MARKER,
        budget_line = budget_line,
        spots = serialize_spots(spots),
        itineraries = serialize_itineraries(itineraries),
    );

    prompt.push('\n');
    for turn in window {
        let speaker = match turn.role {
            Role::User => "User",
            Role::Assistant => "Assistant",
        };
        prompt.push_str(&format!("{}: {}\n", speaker, turn.content));
    }
    prompt.push_str("Assistant:");

    prompt
}

fn serialize_spots(spots: &[SpotContext]) -> String {
    if spots.is_empty() {
        return "(no spot data available)".to_string();
    }

    spots
        .iter()
        .map(|spot| {
            let mut line = format!(
                "{} ({}): {}. Tags: {}. Rating: {}/5. Amenities: {}.",
                spot.title,
                spot.location.as_deref().unwrap_or("location unknown"),
                spot.description.as_deref().unwrap_or("no description"),
                spot.tags.as_deref().unwrap_or_default().join(", "),
                spot.rating.unwrap_or(0.0),
                spot.amenities.as_deref().unwrap_or_default().join(", "),
            );
            if let Some(price) = spot.price_per_night() {
                line.push_str(&format!(" ₱{}/night.", price));
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn serialize_itineraries(itineraries: &[ReferenceItinerary]) -> String {
    if itineraries.is_empty() {
        return "(no saved itineraries yet)".to_string();
    }

    itineraries
        .iter()
        .map(|itinerary| {
            format!(
                "{}: {} to {}, {} day(s) planned.",
                itinerary.title.as_deref().unwrap_or("Untitled trip"),
                itinerary.start_date.as_deref().unwrap_or("?"),
                itinerary.end_date.as_deref().unwrap_or("?"),
                itinerary.day_count(),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
