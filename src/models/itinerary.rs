use serde::{Deserialize, Serialize};

/// Recent saved itinerary handed to the model as a reference example of a
/// finished plan. Only the summary columns are fetched.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ReferenceItinerary {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub days: Option<serde_json::Value>,
}

impl ReferenceItinerary {
    /// Number of day buckets in the stored plan, when the days payload is the
    /// expected day-keyed object.
    pub fn day_count(&self) -> usize {
        self.days
            .as_ref()
            .and_then(|days| days.as_object())
            .map(|days| days.len())
            .unwrap_or(0)
    }
}
