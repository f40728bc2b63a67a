// 🔧 Business Entity - Canonical tradie record
// One record per real-world trade business, accumulated across runs
//
// Identity: `id` (integer, assigned at first insertion) never changes.
// Values: contact details, rating, areas can be refreshed by later
// discovery passes; license fields are written only by verification.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// TRADE CATEGORY
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TradeCategory {
    Electrician,
    Plumber,
    GasFitter,
}

impl TradeCategory {
    /// All categories in discovery order
    pub fn all() -> [TradeCategory; 3] {
        [
            TradeCategory::Electrician,
            TradeCategory::Plumber,
            TradeCategory::GasFitter,
        ]
    }

    /// Serialized form, matching the dataset's category keys
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeCategory::Electrician => "electrician",
            TradeCategory::Plumber => "plumber",
            TradeCategory::GasFitter => "gas_fitter",
        }
    }

    /// Human-readable name for display
    pub fn display_name(&self) -> &'static str {
        match self {
            TradeCategory::Electrician => "Electrician",
            TradeCategory::Plumber => "Plumber",
            TradeCategory::GasFitter => "Gas Fitter",
        }
    }

    /// Free-text search term used when querying the places gateway
    pub fn query_text(&self) -> &'static str {
        match self {
            TradeCategory::Electrician => "electrician",
            TradeCategory::Plumber => "plumber",
            TradeCategory::GasFitter => "gas fitter",
        }
    }

    /// License class this trade is registered under
    pub fn license_type(&self) -> &'static str {
        match self {
            TradeCategory::Electrician => "Electrical Contractor",
            TradeCategory::Plumber => "Plumbing Contractor",
            TradeCategory::GasFitter => "Gas Fitter",
        }
    }

    /// Fixed specialties blurb shown on the directory page
    pub fn specialties(&self) -> &'static str {
        match self {
            TradeCategory::Electrician => {
                "Switchboards, rewiring, lighting, safety inspections"
            }
            TradeCategory::Plumber => {
                "Blocked drains, hot water systems, leak detection, renovations"
            }
            TradeCategory::GasFitter => {
                "Gas appliance installation, leak repairs, compliance checks"
            }
        }
    }
}

// ============================================================================
// BUSINESS RECORD
// ============================================================================

/// Canonical business record as persisted in the dataset.
///
/// Field names serialize in camelCase to match the published
/// `tradies.json` contract consumed by the directory page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Business {
    /// Stable integer id, unique within the store - assigned at first
    /// insertion and never reassigned by later merges
    pub id: u32,

    /// Display name
    pub name: String,

    /// Trade this business was discovered under
    pub category: TradeCategory,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    /// Gateway rating in [0, 5], absent when the place has none
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,

    #[serde(default)]
    pub review_count: u32,

    /// Localities served, derived from the address (metro fallback)
    pub areas: Vec<String>,

    /// Fixed per-category specialties text
    pub specialties: String,

    /// Templated one-line description
    pub description: String,

    // ========================================================================
    // LICENSE FIELDS - written only by the License Merge Engine, always
    // as one atomic pass (all together or not at all)
    // ========================================================================
    /// None = never verified, Some(true/false) = verification outcome
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub licensed: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license_number: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license_holder_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license_status: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license_verified_at: Option<DateTime<Utc>>,

    // ========================================================================
    // PROVENANCE
    // ========================================================================
    /// Identity token from the search gateway (strong dedup key)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,

    /// Which search location surfaced this business
    pub discovered_location: String,

    pub discovered_date: DateTime<Utc>,

    pub last_updated: DateTime<Utc>,
}

impl Business {
    /// Lowercased name, used as the case-insensitive dedup key
    pub fn name_key(&self) -> String {
        self.name.trim().to_lowercase()
    }

    /// Trimmed phone when present and non-empty
    pub fn phone_key(&self) -> Option<&str> {
        match self.phone.as_deref().map(str::trim) {
            Some(p) if !p.is_empty() => Some(p),
            _ => None,
        }
    }

    /// External id when present and non-empty
    pub fn external_key(&self) -> Option<&str> {
        match self.external_id.as_deref().map(str::trim) {
            Some(e) if !e.is_empty() => Some(e),
            _ => None,
        }
    }

    /// Whether a verification pass has ever run on this record
    pub fn is_verified(&self) -> bool {
        self.licensed.is_some()
    }
}

// ============================================================================
// TESTS
// ============================================================================
