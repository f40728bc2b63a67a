// 📋 Licensing Registry - license lookup collaborator
// A real authority integration is supplied by the integrator behind
// this trait. The fixture registry below is the deterministic stand-in
// used by the CLI and tests; outcomes come from its data, never from
// randomness.

use crate::business::TradeCategory;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

// ============================================================================
// LICENSE RECORD
// ============================================================================

/// A positive lookup result from the registry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LicenseRecord {
    pub license_number: String,
    pub license_type: String,
    pub holder_name: String,
    pub status: String,
}

// ============================================================================
// REGISTRY TRAIT
// ============================================================================

#[async_trait]
pub trait LicensingRegistry: Send + Sync {
    /// Answer "is `search_term` licensed for `category`?"
    ///
    /// Ok(None) means not found - a valid, non-error outcome.
    async fn lookup(
        &self,
        search_term: &str,
        category: TradeCategory,
    ) -> Result<Option<LicenseRecord>>;
}

// ============================================================================
// FIXTURE REGISTRY
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixtureEntry {
    /// Term this entry answers to (case-insensitive substring match,
    /// the way registry name searches behave)
    pub match_term: String,

    pub category: TradeCategory,

    #[serde(flatten)]
    pub record: LicenseRecord,
}

/// Deterministic registry backed by a JSON entry list
pub struct FixtureRegistry {
    entries: Vec<FixtureEntry>,
}

impl FixtureRegistry {
    pub fn empty() -> Self {
        FixtureRegistry { entries: Vec::new() }
    }

    pub fn from_entries(entries: Vec<FixtureEntry>) -> Self {
        FixtureRegistry { entries }
    }

    /// Load fixture entries from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read license register: {:?}", path.as_ref()))?;

        let entries: Vec<FixtureEntry> =
            serde_json::from_str(&content).context("Failed to parse license register JSON")?;

        Ok(Self::from_entries(entries))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl LicensingRegistry for FixtureRegistry {
    async fn lookup(
        &self,
        search_term: &str,
        category: TradeCategory,
    ) -> Result<Option<LicenseRecord>> {
        let term = search_term.trim().to_lowercase();
        if term.is_empty() {
            return Ok(None);
        }

        let hit = self.entries.iter().find(|entry| {
            entry.category == category && entry.match_term.to_lowercase().contains(&term)
        });

        Ok(hit.map(|entry| entry.record.clone()))
    }
}

// ============================================================================
// TESTS
// ============================================================================
