use std::env;
use std::error::Error;
use std::fmt;

use reqwest::Client;

use crate::models::itinerary::ReferenceItinerary;
use crate::models::spot::SpotContext;

// Caps keep the prompt inside the model's context budget.
const SPOT_LIMIT: usize = 50;
const ITINERARY_LIMIT: usize = 20;

#[derive(Debug)]
pub enum CatalogError {
    EnvironmentError(String),
    HttpError(reqwest::Error),
    ResponseError(String),
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::EnvironmentError(msg) => write!(f, "Environment error: {}", msg),
            CatalogError::HttpError(err) => write!(f, "HTTP error: {}", err),
            CatalogError::ResponseError(msg) => write!(f, "Response error: {}", msg),
        }
    }
}

impl Error for CatalogError {}

impl From<reqwest::Error> for CatalogError {
    fn from(err: reqwest::Error) -> Self {
        CatalogError::HttpError(err)
    }
}

/// Read-only reference data handed to the model as context. Both reads are
/// best-effort: a failure means the assistant answers with less context, not
/// that the chat exchange fails.
pub trait ReferenceData {
    async fn fetch_spots(&self) -> Vec<SpotContext>;
    async fn fetch_reference_itineraries(&self) -> Vec<ReferenceItinerary>;
}

#[derive(Clone)]
pub struct SupabaseReferenceService {
    client: Client,
    base_url: String,
    service_key: String,
}

impl SupabaseReferenceService {
    pub fn new() -> Result<Self, CatalogError> {
        let base_url = env::var("SUPABASE_URL")
            .map_err(|_| CatalogError::EnvironmentError("SUPABASE_URL not set".to_string()))?;

        let service_key = env::var("SUPABASE_SERVICE_ROLE_KEY").map_err(|_| {
            CatalogError::EnvironmentError("SUPABASE_SERVICE_ROLE_KEY not set".to_string())
        })?;

        Ok(Self::with_credentials(&base_url, &service_key))
    }

    /// Used by main to fall back to a reader that degrades every fetch to an
    /// empty list when the database credentials are absent.
    pub fn with_credentials(base_url: &str, service_key: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            service_key: service_key.to_string(),
        }
    }

    async fn get_rows<T: serde::de::DeserializeOwned>(
        &self,
        table: &str,
        query: &str,
    ) -> Result<Vec<T>, CatalogError> {
        let url = format!("{}/rest/v1/{}?{}", self.base_url, table, query);

        let response = self
            .client
            .get(&url)
            .header("apikey", &self.service_key)
            .header("Authorization", format!("Bearer {}", self.service_key))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(CatalogError::ResponseError(format!(
                "Query on '{}' failed with status {}: {}",
                table, status, error_text
            )));
        }

        response
            .json()
            .await
            .map_err(|e| CatalogError::ResponseError(format!("Failed to parse response: {}", e)))
    }
}

impl ReferenceData for SupabaseReferenceService {
    async fn fetch_spots(&self) -> Vec<SpotContext> {
        let query = format!(
            "select=id,title,location,description,tags,rating,pricing,amenities,lat,lng,images&limit={}",
            SPOT_LIMIT
        );

        match self.get_rows("spots", &query).await {
            Ok(spots) => spots,
            Err(err) => {
                eprintln!("Failed to fetch spots context: {}", err);
                Vec::new()
            }
        }
    }

    async fn fetch_reference_itineraries(&self) -> Vec<ReferenceItinerary> {
        let query = format!(
            "select=id,title,start_date,end_date,days&order=created_at.desc&limit={}",
            ITINERARY_LIMIT
        );

        match self.get_rows("itineraries", &query).await {
            Ok(itineraries) => itineraries,
            Err(err) => {
                eprintln!("Failed to fetch reference itineraries: {}", err);
                Vec::new()
            }
        }
    }
}
