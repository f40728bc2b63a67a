// 🧭 Record Normalizer - Raw gateway candidate → canonical Business
// The "parser" step of the pipeline: everything downstream (filter,
// dedup, store) works on the canonical shape produced here.

use crate::business::{Business, TradeCategory};
use crate::config::PipelineConfig;
use crate::gateway::PlaceCandidate;
use chrono::Utc;

/// Display name used when the gateway returns a candidate without one
const PLACEHOLDER_NAME: &str = "Unknown Business";

pub struct Normalizer {
    region_abbreviation: String,
    default_region: String,
    metro_area: String,
}

impl Normalizer {
    pub fn new(config: &PipelineConfig) -> Self {
        Normalizer {
            region_abbreviation: config.region_abbreviation.clone(),
            default_region: config.default_region.clone(),
            metro_area: config.metro_area.clone(),
        }
    }

    /// Map a raw candidate into a Business record.
    ///
    /// `provisional_id` is current store size plus in-run position; the
    /// store reassigns final ids at save time.
    pub fn normalize(
        &self,
        candidate: &PlaceCandidate,
        category: TradeCategory,
        location: &str,
        provisional_id: u32,
    ) -> Business {
        let now = Utc::now();

        let name = candidate
            .display_name
            .as_ref()
            .map(|n| n.text.trim().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| PLACEHOLDER_NAME.to_string());

        let address = candidate
            .formatted_address
            .as_ref()
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty());

        Business {
            id: provisional_id,
            name,
            category,
            phone: non_empty(candidate.national_phone_number.as_deref()),
            website: non_empty(candidate.website_uri.as_deref()),
            areas: self.derive_areas(address.as_deref()),
            address,
            rating: candidate.rating.map(|r| r.clamp(0.0, 5.0)),
            review_count: candidate.user_rating_count.unwrap_or(0),
            specialties: category.specialties().to_string(),
            description: format!(
                "Professional {} services in {}",
                category.as_str().replace('_', " "),
                self.default_region
            ),
            licensed: None,
            license_number: None,
            license_type: None,
            license_holder_name: None,
            license_status: None,
            license_verified_at: None,
            external_id: non_empty(candidate.id.as_deref()),
            discovered_location: location.to_string(),
            discovered_date: now,
            last_updated: now,
        }
    }

    /// Service areas from the address: the second comma-delimited
    /// segment is the locality ("123 High St, Fremantle WA 6160, ..."),
    /// with postcode and region tokens stripped. Addresses with fewer
    /// than two segments fall back to the metro area.
    fn derive_areas(&self, address: Option<&str>) -> Vec<String> {
        let fallback = vec![self.metro_area.clone()];

        let Some(address) = address else {
            return fallback;
        };

        let segments: Vec<&str> = address.split(',').collect();
        if segments.len() < 2 {
            return fallback;
        }

        let abbrev = self.region_abbreviation.to_lowercase();
        let locality: Vec<&str> = segments[1]
            .split_whitespace()
            .filter(|token| {
                let lower = token.to_lowercase();
                lower != abbrev && !token.chars().all(|c| c.is_ascii_digit())
            })
            .collect();

        if locality.is_empty() {
            fallback
        } else {
            vec![locality.join(" ")]
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::LocalizedText;

    fn candidate(name: &str, address: Option<&str>) -> PlaceCandidate {
        PlaceCandidate {
            id: Some("place-abc".to_string()),
            display_name: Some(LocalizedText {
                text: name.to_string(),
                language_code: None,
            }),
            formatted_address: address.map(str::to_string),
            ..Default::default()
        }
    }

    fn normalizer() -> Normalizer {
        Normalizer::new(&PipelineConfig::default())
    }

    #[test]
    fn test_areas_from_address_locality_segment() {
        let business = normalizer().normalize(
            &candidate("ABC Electrical", Some("12 High St, Fremantle WA 6160, Australia")),
            TradeCategory::Electrician,
            "Fremantle WA",
            1,
        );
        assert_eq!(business.areas, vec!["Fremantle".to_string()]);
    }

    #[test]
    fn test_areas_fall_back_to_metro_without_comma() {
        // Address-free candidate surfaced by "electrician in Perth WA"
        let business = normalizer().normalize(
            &candidate("ABC Electrical Pty Ltd", None),
            TradeCategory::Electrician,
            "Perth WA",
            1,
        );
        assert_eq!(business.areas, vec!["Perth Metro".to_string()]);
        assert_eq!(business.category, TradeCategory::Electrician);
    }

    #[test]
    fn test_single_segment_address_uses_metro_fallback() {
        let business = normalizer().normalize(
            &candidate("ABC Electrical", Some("12 High Street Perth")),
            TradeCategory::Electrician,
            "Perth WA",
            1,
        );
        assert_eq!(business.areas, vec!["Perth Metro".to_string()]);
    }

    #[test]
    fn test_missing_name_uses_placeholder() {
        let mut c = candidate("", None);
        c.display_name = None;

        let business = normalizer().normalize(&c, TradeCategory::Plumber, "Perth WA", 1);
        assert_eq!(business.name, PLACEHOLDER_NAME);
    }

    #[test]
    fn test_description_spells_out_category() {
        let business = normalizer().normalize(
            &candidate("Gas Co", None),
            TradeCategory::GasFitter,
            "Perth WA",
            1,
        );
        assert_eq!(
            business.description,
            "Professional gas fitter services in Perth"
        );
        assert_eq!(business.specialties, TradeCategory::GasFitter.specialties());
    }

    #[test]
    fn test_blank_contact_fields_become_none() {
        let mut c = candidate("ABC Electrical", None);
        c.national_phone_number = Some("   ".to_string());
        c.website_uri = Some(String::new());

        let business = normalizer().normalize(&c, TradeCategory::Electrician, "Perth WA", 1);
        assert_eq!(business.phone, None);
        assert_eq!(business.website, None);
        assert_eq!(business.review_count, 0);
    }
}
