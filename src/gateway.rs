// 📡 Search Gateway - places text-search collaborator
// The orchestrator only sees the trait; the HTTP client below is the
// production implementation against the places text-search endpoint.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::env;

const BASE_URL: &str = "https://places.googleapis.com/v1";

const API_KEY_VAR: &str = "GOOGLE_PLACES_API_KEY";

const LANGUAGE_CODE: &str = "en-AU";

/// Response fields requested from the gateway - everything the
/// normalizer and filter consume, nothing more.
const FIELD_MASK: &str = "places.id,places.displayName,places.formattedAddress,\
places.nationalPhoneNumber,places.websiteUri,places.rating,places.userRatingCount,\
places.businessStatus,places.types,places.location,places.regularOpeningHours";

// ============================================================================
// CANDIDATE RECORDS
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalizedText {
    pub text: String,
    #[serde(default)]
    pub language_code: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LatLng {
    pub latitude: f64,
    pub longitude: f64,
}

/// Raw candidate record as returned by the gateway
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceCandidate {
    /// Identity token, stable across searches
    #[serde(default)]
    pub id: Option<String>,

    #[serde(default)]
    pub display_name: Option<LocalizedText>,

    #[serde(default)]
    pub formatted_address: Option<String>,

    #[serde(default)]
    pub national_phone_number: Option<String>,

    #[serde(default)]
    pub website_uri: Option<String>,

    #[serde(default)]
    pub rating: Option<f64>,

    #[serde(default)]
    pub user_rating_count: Option<u32>,

    #[serde(default)]
    pub business_status: Option<String>,

    /// Category tags (e.g. "electrician", "establishment")
    #[serde(default)]
    pub types: Vec<String>,

    #[serde(default)]
    pub location: Option<LatLng>,

    #[serde(default)]
    pub regular_opening_hours: Option<serde_json::Value>,
}

#[derive(Debug, Default, Deserialize)]
struct SearchResponse {
    /// Absent entirely when a query matches nothing - a valid response
    #[serde(default)]
    places: Vec<PlaceCandidate>,
}

// ============================================================================
// GATEWAY TRAIT
// ============================================================================

#[async_trait]
pub trait SearchGateway: Send + Sync {
    /// Run one free-text search, returning at most `page_size` candidates.
    /// Zero results is a valid (non-error) outcome.
    async fn text_search(&self, query: &str, page_size: u32) -> Result<Vec<PlaceCandidate>>;
}

// ============================================================================
// HTTP CLIENT
// ============================================================================

pub struct PlacesClient {
    client: reqwest::Client,
    api_key: String,
}

impl PlacesClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
        }
    }

    /// Build a client from the environment. A missing credential is a
    /// fatal run precondition, reported up to main.
    pub fn from_env() -> Result<Self> {
        let api_key = env::var(API_KEY_VAR)
            .with_context(|| format!("{} is not set - cannot query the places gateway", API_KEY_VAR))?;
        if api_key.trim().is_empty() {
            bail!("{} is empty - cannot query the places gateway", API_KEY_VAR);
        }
        Ok(Self::new(api_key))
    }
}

#[async_trait]
impl SearchGateway for PlacesClient {
    async fn text_search(&self, query: &str, page_size: u32) -> Result<Vec<PlaceCandidate>> {
        let body = serde_json::json!({
            "textQuery": query,
            "pageSize": page_size,
            "languageCode": LANGUAGE_CODE,
        });

        let resp = self
            .client
            .post(format!("{}/places:searchText", BASE_URL))
            .header("X-Goog-Api-Key", &self.api_key)
            .header("X-Goog-FieldMask", FIELD_MASK)
            .json(&body)
            .send()
            .await
            .context("Places search request failed")?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            bail!("Places search returned {}: {}", status, body);
        }

        let parsed: SearchResponse = resp
            .json()
            .await
            .context("Failed to parse places search response")?;

        Ok(parsed.places)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_response_is_zero_candidates() {
        // The gateway omits "places" entirely when nothing matched
        let parsed: SearchResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.places.is_empty());
    }

    #[test]
    fn test_candidate_parses_partial_records() {
        let json = r#"{
            "places": [{
                "id": "ChIJabc123",
                "displayName": { "text": "ABC Electrical Pty Ltd", "languageCode": "en" },
                "nationalPhoneNumber": "0400 000 000",
                "types": ["electrician", "establishment"]
            }]
        }"#;

        let parsed: SearchResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.places.len(), 1);

        let candidate = &parsed.places[0];
        assert_eq!(candidate.id.as_deref(), Some("ChIJabc123"));
        assert_eq!(
            candidate.display_name.as_ref().map(|n| n.text.as_str()),
            Some("ABC Electrical Pty Ltd")
        );
        assert!(candidate.formatted_address.is_none());
        assert_eq!(candidate.types, vec!["electrician", "establishment"]);
    }

    #[test]
    fn test_field_mask_covers_consumed_fields() {
        for field in [
            "places.id",
            "places.displayName",
            "places.formattedAddress",
            "places.nationalPhoneNumber",
            "places.websiteUri",
            "places.rating",
            "places.userRatingCount",
            "places.types",
        ] {
            assert!(FIELD_MASK.contains(field), "field mask missing {}", field);
        }
    }
}
