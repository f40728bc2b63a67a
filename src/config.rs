// ⚙️ Pipeline Configuration - Search space and filter lists as data
// Keyword/tag/suffix sets live here, not in the algorithms, so new
// regions or categories need no code changes.

use crate::business::TradeCategory;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

// ============================================================================
// PIPELINE CONFIG
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Search locations, iterated in order
    pub locations: Vec<String>,

    /// Trade categories, iterated in order within each location
    pub categories: Vec<TradeCategory>,

    /// Global gateway call budget per discovery run
    pub max_api_calls: u32,

    /// Desired result count per gateway call
    pub page_size: u32,

    /// Delay applied after every location x category pair
    pub call_delay_ms: u64,

    /// Delay applied between license verification records
    pub verify_delay_ms: u64,

    /// Region marker: abbreviation as it appears in addresses
    pub region_abbreviation: String,

    /// Region marker: full name as it appears in addresses
    pub region_name: String,

    /// Region used in generated descriptions
    pub default_region: String,

    /// Fallback service area when an address yields no locality
    pub metro_area: String,

    /// Businesses whose name contains any of these are rejected
    /// (big-box retail, training institutions, wholesalers)
    pub exclusion_keywords: Vec<String>,

    /// Gateway category tags accepted as in-scope; tags containing
    /// "contractor" or "service" also count as relevant
    pub relevant_tags: Vec<String>,

    /// Trailing legal/trade suffixes stripped when generating license
    /// search-term variants
    pub name_suffixes: Vec<String>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            locations: vec![
                "Perth WA".to_string(),
                "Fremantle WA".to_string(),
                "Joondalup WA".to_string(),
                "Rockingham WA".to_string(),
                "Midland WA".to_string(),
                "Armadale WA".to_string(),
            ],
            categories: TradeCategory::all().to_vec(),
            max_api_calls: 30,
            page_size: 20,
            call_delay_ms: 2000,
            verify_delay_ms: 500,
            region_abbreviation: "WA".to_string(),
            region_name: "Western Australia".to_string(),
            default_region: "Perth".to_string(),
            metro_area: "Perth Metro".to_string(),
            exclusion_keywords: vec![
                "bunnings".to_string(),
                "tafe".to_string(),
                "training".to_string(),
                "college".to_string(),
                "institute".to_string(),
                "wholesale".to_string(),
                "wholesalers".to_string(),
                "supplies".to_string(),
                "warehouse".to_string(),
                "trade centre".to_string(),
            ],
            relevant_tags: vec![
                "electrician".to_string(),
                "plumber".to_string(),
                "gas_installation_service".to_string(),
                "general_contractor".to_string(),
                "home_services".to_string(),
                "establishment".to_string(),
            ],
            name_suffixes: vec![
                "pty ltd".to_string(),
                "pty. ltd.".to_string(),
                "pty".to_string(),
                "ltd".to_string(),
                "p/l".to_string(),
                "group".to_string(),
                "services".to_string(),
                "service".to_string(),
                "electrical".to_string(),
                "plumbing".to_string(),
                "gas".to_string(),
                "wa".to_string(),
                "perth".to_string(),
            ],
        }
    }
}

impl PipelineConfig {
    /// Load configuration from a JSON file
    ///
    /// Missing keys fall back to the defaults above, so a config file
    /// only needs to override what it changes.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;

        let config: PipelineConfig =
            serde_json::from_str(&content).context("Failed to parse config JSON")?;

        Ok(config)
    }

    /// Total number of gateway calls a full iteration would make
    /// (before the budget cuts it off)
    pub fn search_space(&self) -> usize {
        self.locations.len() * self.categories.len()
    }
}

// ============================================================================
// TESTS
// ============================================================================
