// 💾 Tradie Store - the accumulating tradies.json document
// Read once at the start of a run, written once at the end. Save is a
// whole-file replace; every metadata field is recomputed from the
// in-memory records, never independently mutated.

use crate::business::Business;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

// ============================================================================
// PERSISTED DOCUMENT
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LicenseVerificationStats {
    pub total_checked: u32,
    pub licensed: u32,
    pub unlicensed: u32,
    /// Fraction of checked records that turned out licensed
    pub verification_rate: f64,
}

/// Full on-disk document. Everything except `tradies` is derived.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TradieDataset {
    pub last_updated: DateTime<Utc>,
    pub total_tradies: usize,
    pub api_calls_used: u32,
    /// Per-category record counts
    pub breakdown: BTreeMap<String, u32>,
    pub license_verification_stats: LicenseVerificationStats,
    pub tradies: Vec<Business>,
}

impl Default for TradieDataset {
    fn default() -> Self {
        TradieDataset {
            last_updated: Utc::now(),
            total_tradies: 0,
            api_calls_used: 0,
            breakdown: BTreeMap::new(),
            license_verification_stats: LicenseVerificationStats::default(),
            tradies: Vec::new(),
        }
    }
}

// ============================================================================
// STORE
// ============================================================================

pub struct TradieStore {
    path: PathBuf,
    pub tradies: Vec<Business>,
    api_calls_used: u32,
}

impl TradieStore {
    /// Load the store. A missing file is an empty store, not an error;
    /// unparseable JSON is fatal for the operation that needed it.
    pub fn load<P: Into<PathBuf>>(path: P) -> Result<Self> {
        let path = path.into();

        if !path.exists() {
            return Ok(TradieStore {
                path,
                tradies: Vec::new(),
                api_calls_used: 0,
            });
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read store file: {:?}", path))?;
        let dataset: TradieDataset = serde_json::from_str(&content)
            .with_context(|| format!("Malformed store file: {:?}", path))?;

        Ok(TradieStore {
            path,
            tradies: dataset.tradies,
            api_calls_used: dataset.api_calls_used,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.tradies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tradies.is_empty()
    }

    /// Append newly discovered records, finalizing their ids as the
    /// next free integers. Existing records and their ids are never
    /// touched.
    pub fn append_discovered(&mut self, discovered: Vec<Business>) -> usize {
        let mut next_id = self.tradies.iter().map(|b| b.id).max().unwrap_or(0) + 1;
        let appended = discovered.len();

        for mut business in discovered {
            business.id = next_id;
            next_id += 1;
            self.tradies.push(business);
        }

        appended
    }

    /// Record the gateway calls consumed by the latest discovery run
    pub fn set_api_calls_used(&mut self, calls: u32) {
        self.api_calls_used = calls;
    }

    /// Build the full document with all derived metadata recomputed
    /// from the current records.
    pub fn dataset(&self) -> TradieDataset {
        let mut breakdown: BTreeMap<String, u32> = BTreeMap::new();
        for business in &self.tradies {
            *breakdown
                .entry(business.category.as_str().to_string())
                .or_insert(0) += 1;
        }

        let total_checked = self.tradies.iter().filter(|b| b.is_verified()).count() as u32;
        let licensed = self
            .tradies
            .iter()
            .filter(|b| b.licensed == Some(true))
            .count() as u32;
        let unlicensed = self
            .tradies
            .iter()
            .filter(|b| b.licensed == Some(false))
            .count() as u32;
        let verification_rate = if total_checked > 0 {
            licensed as f64 / total_checked as f64
        } else {
            0.0
        };

        TradieDataset {
            last_updated: Utc::now(),
            total_tradies: self.tradies.len(),
            api_calls_used: self.api_calls_used,
            breakdown,
            license_verification_stats: LicenseVerificationStats {
                total_checked,
                licensed,
                unlicensed,
                verification_rate,
            },
            tradies: self.tradies.clone(),
        }
    }

    /// Write the full document as a whole-file replace (temp file +
    /// rename, so a crash mid-write never leaves a truncated store).
    pub fn save(&self) -> Result<()> {
        let dataset = self.dataset();
        let json = serde_json::to_string_pretty(&dataset).context("Failed to serialize store")?;

        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, &json)
            .with_context(|| format!("Failed to write store file: {:?}", tmp_path))?;
        fs::rename(&tmp_path, &self.path)
            .with_context(|| format!("Failed to replace store file: {:?}", self.path))?;

        Ok(())
    }

    /// Export the current records as a CSV snapshot
    pub fn export_csv<P: AsRef<Path>>(&self, path: P) -> Result<usize> {
        let mut writer = csv::Writer::from_path(path.as_ref())
            .with_context(|| format!("Failed to create CSV file: {:?}", path.as_ref()))?;

        writer.write_record([
            "id",
            "name",
            "category",
            "phone",
            "website",
            "address",
            "rating",
            "reviewCount",
            "areas",
            "licensed",
            "licenseNumber",
        ])?;

        for b in &self.tradies {
            writer.write_record([
                b.id.to_string(),
                b.name.clone(),
                b.category.as_str().to_string(),
                b.phone.clone().unwrap_or_default(),
                b.website.clone().unwrap_or_default(),
                b.address.clone().unwrap_or_default(),
                b.rating.map(|r| format!("{:.1}", r)).unwrap_or_default(),
                b.review_count.to_string(),
                b.areas.join("; "),
                match b.licensed {
                    Some(true) => "yes".to_string(),
                    Some(false) => "no".to_string(),
                    None => String::new(),
                },
                b.license_number.clone().unwrap_or_default(),
            ])?;
        }

        writer.flush().context("Failed to flush CSV file")?;
        Ok(self.tradies.len())
    }
}

// ============================================================================
// TESTS
// ============================================================================
