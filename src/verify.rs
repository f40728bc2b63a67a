// ⚖️ License Merge Engine - cross-reference the store with the registry
// Merges verification outcomes into license fields only; every other
// field stays byte-identical. One atomic write per record per pass.

use crate::business::Business;
use crate::config::PipelineConfig;
use crate::licensing::{LicenseRecord, LicensingRegistry};
use chrono::Utc;
use std::time::Duration;

/// Status recorded when every search-term variant misses
const STATUS_NOT_FOUND: &str = "not_found";

// ============================================================================
// VERIFICATION SUMMARY
// ============================================================================

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct VerificationSummary {
    pub checked: u32,
    pub licensed: u32,
    pub unlicensed: u32,
}

// ============================================================================
// LICENSE MERGE ENGINE
// ============================================================================

pub struct LicenseMergeEngine {
    name_suffixes: Vec<String>,
    record_delay_ms: u64,
}

impl LicenseMergeEngine {
    pub fn new(config: &PipelineConfig) -> Self {
        LicenseMergeEngine {
            name_suffixes: config
                .name_suffixes
                .iter()
                .map(|s| s.to_lowercase())
                .collect(),
            record_delay_ms: config.verify_delay_ms,
        }
    }

    /// Verify every record against the registry, merging outcomes into
    /// license fields. A fixed delay between records bounds the request
    /// rate; one record's lookup failure never aborts the pass.
    pub async fn verify_all(
        &self,
        registry: &dyn LicensingRegistry,
        businesses: &mut [Business],
    ) -> VerificationSummary {
        let mut summary = VerificationSummary::default();

        for business in businesses.iter_mut() {
            self.verify_one(registry, business).await;
            summary.checked += 1;
            match business.licensed {
                Some(true) => {
                    summary.licensed += 1;
                    println!(
                        "   ✓ {} - licensed ({})",
                        business.name,
                        business.license_number.as_deref().unwrap_or("?")
                    );
                }
                _ => {
                    summary.unlicensed += 1;
                    println!("   ✗ {} - no license found", business.name);
                }
            }

            tokio::time::sleep(Duration::from_millis(self.record_delay_ms)).await;
        }

        summary
    }

    /// Query the registry with each search-term variant in order,
    /// short-circuiting on the first match. A collaborator error counts
    /// as no-match for that variant.
    async fn verify_one(&self, registry: &dyn LicensingRegistry, business: &mut Business) {
        let mut matched: Option<LicenseRecord> = None;

        for term in self.search_variants(&business.name) {
            match registry.lookup(&term, business.category).await {
                Ok(Some(record)) => {
                    matched = Some(record);
                    break;
                }
                Ok(None) => {}
                Err(e) => {
                    eprintln!("⚠️  License lookup failed for \"{}\": {:#}", term, e);
                }
            }
        }

        // One atomic write: all license fields together, nothing else
        match matched {
            Some(record) => {
                business.licensed = Some(true);
                business.license_number = Some(record.license_number);
                business.license_type = Some(record.license_type);
                business.license_holder_name = Some(record.holder_name);
                business.license_status = Some(record.status);
                business.license_verified_at = Some(Utc::now());
            }
            None => {
                business.licensed = Some(false);
                business.license_number = None;
                business.license_type = None;
                business.license_holder_name = None;
                business.license_status = Some(STATUS_NOT_FOUND.to_string());
                business.license_verified_at = Some(Utc::now());
            }
        }
    }

    /// Ordered search-term variants for a business name:
    /// 1. the full name
    /// 2. the name with trailing legal/trade suffixes stripped
    /// 3. the first word, if longer than 3 characters
    /// 4. the last word of the stripped name, if longer than 3 characters
    /// Deduplicated, order preserved.
    pub fn search_variants(&self, name: &str) -> Vec<String> {
        let name = name.trim();
        let stripped = self.strip_suffixes(name);

        let mut variants: Vec<String> = Vec::new();
        push_unique(&mut variants, name.to_string());
        push_unique(&mut variants, stripped.clone());

        if let Some(first) = name.split_whitespace().next() {
            if first.chars().count() > 3 {
                push_unique(&mut variants, first.to_string());
            }
        }
        if let Some(last) = stripped.split_whitespace().last() {
            if last.chars().count() > 3 {
                push_unique(&mut variants, last.to_string());
            }
        }

        variants
    }

    /// Repeatedly drop trailing suffix word-groups ("Pty Ltd", "Group",
    /// trade words) until none match, keeping at least one word.
    fn strip_suffixes(&self, name: &str) -> String {
        let mut words: Vec<String> = name.split_whitespace().map(normalize_word).collect();

        loop {
            let mut stripped = false;
            for suffix in &self.name_suffixes {
                let suffix_words: Vec<String> =
                    suffix.split_whitespace().map(normalize_word).collect();
                if suffix_words.is_empty() || words.len() <= suffix_words.len() {
                    continue;
                }

                let tail = &words[words.len() - suffix_words.len()..];
                if tail
                    .iter()
                    .zip(&suffix_words)
                    .all(|(w, s)| w.eq_ignore_ascii_case(s))
                {
                    words.truncate(words.len() - suffix_words.len());
                    stripped = true;
                    break;
                }
            }

            if !stripped {
                break;
            }
        }

        words.join(" ")
    }
}

/// Strip the punctuation that varies between trading names and
/// register entries ("Pty." vs "Pty")
fn normalize_word(word: &str) -> String {
    word.trim_matches(|c| c == '.' || c == ',').to_string()
}

fn push_unique(variants: &mut Vec<String>, value: String) {
    let value = value.trim().to_string();
    if value.is_empty() {
        return;
    }
    if !variants.iter().any(|v| v.eq_ignore_ascii_case(&value)) {
        variants.push(value);
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::business::TradeCategory;
    use anyhow::{anyhow, Result};
    use async_trait::async_trait;
    use chrono::Utc;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Registry answering exact (lowercased) terms from a map,
    /// recording every lookup it receives.
    struct MapRegistry {
        records: HashMap<String, LicenseRecord>,
        lookups: Mutex<Vec<String>>,
        fail_terms: Vec<String>,
    }

    impl MapRegistry {
        fn new(entries: &[(&str, &str)]) -> Self {
            let records = entries
                .iter()
                .map(|(term, number)| {
                    (
                        term.to_lowercase(),
                        LicenseRecord {
                            license_number: number.to_string(),
                            license_type: "Electrical Contractor".to_string(),
                            holder_name: term.to_string(),
                            status: "current".to_string(),
                        },
                    )
                })
                .collect();
            MapRegistry {
                records,
                lookups: Mutex::new(Vec::new()),
                fail_terms: Vec::new(),
            }
        }

        fn lookup_log(&self) -> Vec<String> {
            self.lookups.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl LicensingRegistry for MapRegistry {
        async fn lookup(
            &self,
            search_term: &str,
            _category: TradeCategory,
        ) -> Result<Option<LicenseRecord>> {
            let term = search_term.to_lowercase();
            self.lookups.lock().unwrap().push(term.clone());
            if self.fail_terms.contains(&term) {
                return Err(anyhow!("registry unavailable"));
            }
            Ok(self.records.get(&term).cloned())
        }
    }

    fn engine() -> LicenseMergeEngine {
        let config = PipelineConfig {
            verify_delay_ms: 0,
            ..Default::default()
        };
        LicenseMergeEngine::new(&config)
    }

    fn business(name: &str) -> Business {
        Business {
            id: 1,
            name: name.to_string(),
            category: TradeCategory::Electrician,
            phone: Some("0400 000 000".to_string()),
            website: Some("https://example.com.au".to_string()),
            address: Some("1 High St, Perth WA 6000".to_string()),
            rating: Some(4.8),
            review_count: 31,
            areas: vec!["Perth".to_string()],
            specialties: TradeCategory::Electrician.specialties().to_string(),
            description: "Professional electrician services in Perth".to_string(),
            licensed: None,
            license_number: None,
            license_type: None,
            license_holder_name: None,
            license_status: None,
            license_verified_at: None,
            external_id: Some("place-1".to_string()),
            discovered_location: "Perth WA".to_string(),
            discovered_date: Utc::now(),
            last_updated: Utc::now(),
        }
    }

    #[test]
    fn test_variants_strip_legal_and_trade_suffixes() {
        // "ABC Electrical Pty Ltd" strips down to "ABC"; the
        // 3-character first/last word variants are skipped
        let variants = engine().search_variants("ABC Electrical Pty Ltd");
        assert_eq!(variants, vec!["ABC Electrical Pty Ltd", "ABC"]);
    }

    #[test]
    fn test_variants_include_first_and_last_words() {
        let variants = engine().search_variants("Mister Sparky Electrical");
        assert_eq!(
            variants,
            vec!["Mister Sparky Electrical", "Mister Sparky", "Mister", "Sparky"]
        );
    }

    #[test]
    fn test_variants_deduplicate_preserving_order() {
        // Single-word name: full name, stripped name, and first word
        // all collapse into one variant
        let variants = engine().search_variants("Sparktown");
        assert_eq!(variants, vec!["Sparktown"]);
    }

    #[test]
    fn test_suffix_stripping_handles_punctuation() {
        let variants = engine().search_variants("Westside Plumbing Pty. Ltd.");
        assert!(variants.contains(&"Westside".to_string()));
    }

    #[tokio::test]
    async fn test_first_matching_variant_wins() {
        // Both the full name and the stripped name would match; the
        // engine must stop at the first
        let registry = MapRegistry::new(&[
            ("mister sparky electrical", "EC 11111"),
            ("mister sparky", "EC 22222"),
        ]);

        let mut records = vec![business("Mister Sparky Electrical")];
        let summary = engine().verify_all(&registry, &mut records).await;

        assert_eq!(summary.licensed, 1);
        assert_eq!(records[0].license_number.as_deref(), Some("EC 11111"));
        // Short-circuit: only one lookup issued
        assert_eq!(registry.lookup_log(), vec!["mister sparky electrical"]);
    }

    #[tokio::test]
    async fn test_match_via_stripped_variant() {
        let registry = MapRegistry::new(&[("abc", "EC 33333")]);

        let mut records = vec![business("ABC Electrical Pty Ltd")];
        engine().verify_all(&registry, &mut records).await;

        assert_eq!(records[0].licensed, Some(true));
        assert_eq!(records[0].license_number.as_deref(), Some("EC 33333"));
        assert_eq!(records[0].license_status.as_deref(), Some("current"));
        assert!(records[0].license_verified_at.is_some());
    }

    #[tokio::test]
    async fn test_no_match_records_negative_outcome() {
        let registry = MapRegistry::new(&[]);

        let mut records = vec![business("Ghost Electrical Pty Ltd")];
        let summary = engine().verify_all(&registry, &mut records).await;

        assert_eq!(summary.unlicensed, 1);
        let b = &records[0];
        assert_eq!(b.licensed, Some(false));
        assert_eq!(b.license_number, None);
        assert_eq!(b.license_status.as_deref(), Some(STATUS_NOT_FOUND));
        // Verification occurring is itself recorded on a negative result
        assert!(b.license_verified_at.is_some());
    }

    #[tokio::test]
    async fn test_registry_error_treated_as_no_match_for_that_variant() {
        let mut registry = MapRegistry::new(&[("abc", "EC 44444")]);
        registry.fail_terms = vec!["abc electrical pty ltd".to_string()];

        let mut records = vec![business("ABC Electrical Pty Ltd")];
        engine().verify_all(&registry, &mut records).await;

        // First variant errored, second variant still matched
        assert_eq!(records[0].licensed, Some(true));
        assert_eq!(records[0].license_number.as_deref(), Some("EC 44444"));
    }

    #[tokio::test]
    async fn test_merge_touches_only_license_fields() {
        let registry = MapRegistry::new(&[("abc", "EC 55555")]);

        let mut records = vec![business("ABC Electrical Pty Ltd"), business("Ghost Crew")];
        records[1].name = "Ghost Crew Plumbing".to_string();
        let before = records.clone();

        engine().verify_all(&registry, &mut records).await;

        for (after, before) in records.iter().zip(&before) {
            // Copy the license fields over; everything else must then
            // compare byte-identical to the pre-pass record
            let mut scrubbed = after.clone();
            scrubbed.licensed = before.licensed;
            scrubbed.license_number = before.license_number.clone();
            scrubbed.license_type = before.license_type.clone();
            scrubbed.license_holder_name = before.license_holder_name.clone();
            scrubbed.license_status = before.license_status.clone();
            scrubbed.license_verified_at = before.license_verified_at;
            assert_eq!(&scrubbed, before);
        }
    }
}
