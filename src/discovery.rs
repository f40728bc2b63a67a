// 🚚 Discovery Orchestrator - location × category search sweep
// Drives gateway → normalizer → filter → dedup → accumulator under a
// global call budget with uniform inter-call delay.

use crate::business::Business;
use crate::config::PipelineConfig;
use crate::dedup::is_duplicate;
use crate::filter::ValidityFilter;
use crate::gateway::SearchGateway;
use crate::normalizer::Normalizer;
use std::time::Duration;

// ============================================================================
// DISCOVERY OUTCOME
// ============================================================================

#[derive(Debug, Default)]
pub struct DiscoveryOutcome {
    /// Newly discovered valid, non-duplicate businesses (in discovery order)
    pub discovered: Vec<Business>,

    /// Gateway calls consumed, successful or not
    pub calls_made: u32,

    /// Candidates dropped by the validity filter
    pub filtered_out: u32,

    /// Candidates dropped as duplicates
    pub duplicates: u32,
}

// ============================================================================
// ORCHESTRATOR
// ============================================================================

pub struct DiscoveryOrchestrator {
    config: PipelineConfig,
}

impl DiscoveryOrchestrator {
    pub fn new(config: PipelineConfig) -> Self {
        DiscoveryOrchestrator { config }
    }

    /// Sweep the (location × category) search space.
    ///
    /// One gateway call at a time; every call consumes one budget slot
    /// whether it returns candidates, zero results, or an error. An
    /// exhausted budget aborts the whole sweep, remaining locations
    /// included. A per-query failure is logged and treated as zero
    /// results - never fatal to the run.
    pub async fn run(&self, gateway: &dyn SearchGateway, existing: &[Business]) -> DiscoveryOutcome {
        let normalizer = Normalizer::new(&self.config);
        let filter = ValidityFilter::new(&self.config);

        let mut outcome = DiscoveryOutcome::default();

        'locations: for location in &self.config.locations {
            for category in &self.config.categories {
                if outcome.calls_made >= self.config.max_api_calls {
                    println!(
                        "⛔ Call budget exhausted ({}/{}), stopping discovery",
                        outcome.calls_made, self.config.max_api_calls
                    );
                    break 'locations;
                }

                let query = format!("{} in {}", category.query_text(), location);
                println!("🔍 Searching: {}", query);

                let candidates = match gateway.text_search(&query, self.config.page_size).await {
                    Ok(candidates) => candidates,
                    Err(e) => {
                        eprintln!("⚠️  Search failed for \"{}\": {:#}", query, e);
                        Vec::new()
                    }
                };
                outcome.calls_made += 1;

                let mut accepted = 0;
                for candidate in &candidates {
                    let provisional_id = (existing.len() + outcome.discovered.len() + 1) as u32;
                    let business =
                        normalizer.normalize(candidate, *category, location, provisional_id);

                    if let Some(reason) =
                        filter.check(&business.name, business.address.as_deref(), &candidate.types)
                    {
                        println!("   ✗ {} ({})", business.name, reason.describe());
                        outcome.filtered_out += 1;
                        continue;
                    }

                    if is_duplicate(existing, &outcome.discovered, &business) {
                        outcome.duplicates += 1;
                        continue;
                    }

                    accepted += 1;
                    outcome.discovered.push(business);
                }

                println!(
                    "   ✓ {} candidates, {} new ({} calls used)",
                    candidates.len(),
                    accepted,
                    outcome.calls_made
                );

                // Uniform backpressure after every pair, regardless of outcome
                tokio::time::sleep(Duration::from_millis(self.config.call_delay_ms)).await;
            }
        }

        outcome
    }
}

// ============================================================================
// TESTS
// ============================================================================
