use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    #[serde(rename = "user")]
    User,
    #[serde(rename = "assistant")]
    Assistant,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
}

impl ChatTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub history: Vec<ChatTurn>,
}

/// One spot pulled out of an assistant reply, pinned to a day and a clock time.
/// This is what the itinerary widget renders on the map, so coordinates are
/// guaranteed present by the matcher.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ExtractedSpot {
    pub id: String,
    pub title: String,
    pub location: String,
    pub lat: f64,
    pub lng: f64,
    pub rating: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(rename = "pricePerNight", skip_serializing_if = "Option::is_none")]
    pub price_per_night: Option<f64>,
    pub day: u32,
    pub time: String,
}

/// Day number -> spots mentioned for that day, in catalog order.
pub type DaySpots = BTreeMap<u32, Vec<ExtractedSpot>>;

#[derive(Debug, Serialize, Clone)]
pub struct ChatResponse {
    pub message: String,
    #[serde(rename = "showAddButton")]
    pub show_add_button: bool,
    #[serde(rename = "detectedBudget")]
    pub detected_budget: Option<f64>,
    #[serde(rename = "mentionedSpots", skip_serializing_if = "Option::is_none")]
    pub mentioned_spots: Option<DaySpots>,
    pub timestamp: String,
}
