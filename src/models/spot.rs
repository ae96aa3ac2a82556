use serde::{Deserialize, Serialize};

/// Catalog record as served by the spots table. Most columns are nullable in
/// the database, so everything beyond the identity fields is optional here.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SpotContext {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub pricing: Option<serde_json::Value>,
    #[serde(default)]
    pub amenities: Option<Vec<String>>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
    #[serde(default)]
    pub images: Option<Vec<String>>,
}

impl SpotContext {
    /// Nightly rate if the pricing payload carries one. The pricing column is
    /// free-form JSON; accept either a bare number or an object keyed
    /// `price_per_night` / `per_night`.
    pub fn price_per_night(&self) -> Option<f64> {
        let pricing = self.pricing.as_ref()?;

        if let Some(amount) = pricing.as_f64() {
            return Some(amount);
        }

        pricing
            .get("price_per_night")
            .or_else(|| pricing.get("per_night"))
            .and_then(|v| v.as_f64())
    }

    pub fn first_image(&self) -> Option<&str> {
        self.images
            .as_ref()
            .and_then(|images| images.first())
            .map(|s| s.as_str())
    }
}
