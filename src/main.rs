use anyhow::{bail, Result};
use std::env;
use std::path::Path;

use tradie_directory::{
    publish, DiscoveryOrchestrator, FixtureRegistry, LicenseMergeEngine, PipelineConfig,
    PlacesClient, TradieStore,
};

const STORE_FILE: &str = "tradies.json";
const LICENSE_REGISTER_FILE: &str = "license-register.json";
const PAGE_FILE: &str = "web/index.html";
const EXPORT_FILE: &str = "tradies.csv";

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    let command = args.get(1).map(String::as_str).unwrap_or("help");

    match command {
        "discover" => run_discover(args.get(2).map(String::as_str)).await,
        "verify" => run_verify().await,
        "publish" => run_publish(),
        "export" => run_export(),
        "stats" => run_stats(),
        _ => {
            print_usage();
            Ok(())
        }
    }
}

async fn run_discover(config_path: Option<&str>) -> Result<()> {
    println!("🚚 Tradie Discovery - places search sweep");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let config = match config_path {
        Some(path) => PipelineConfig::from_file(path)?,
        None => PipelineConfig::default(),
    };
    println!(
        "\n🗺️  Search space: {} locations × {} categories ({} queries, budget {})",
        config.locations.len(),
        config.categories.len(),
        config.search_space(),
        config.max_api_calls
    );

    // Missing credential is fatal before any work happens
    let gateway = PlacesClient::from_env()?;

    let mut store = TradieStore::load(STORE_FILE)?;
    println!("📂 Store: {} known businesses\n", store.len());

    let orchestrator = DiscoveryOrchestrator::new(config);
    let outcome = orchestrator.run(&gateway, &store.tradies).await;

    let appended = store.append_discovered(outcome.discovered);
    store.set_api_calls_used(outcome.calls_made);
    store.save()?;

    println!("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("✅ Discovery complete");
    println!("   {} gateway calls used", outcome.calls_made);
    println!(
        "   {} new businesses ({} filtered, {} duplicates)",
        appended, outcome.filtered_out, outcome.duplicates
    );
    print_breakdown(&store);

    Ok(())
}

async fn run_verify() -> Result<()> {
    println!("📋 License Verification - registry cross-reference");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    if !Path::new(STORE_FILE).exists() {
        bail!("No store file at {} - run `discover` first", STORE_FILE);
    }
    let mut store = TradieStore::load(STORE_FILE)?;
    println!("\n📂 Store: {} businesses to check\n", store.len());

    let registry = if Path::new(LICENSE_REGISTER_FILE).exists() {
        let registry = FixtureRegistry::from_file(LICENSE_REGISTER_FILE)?;
        println!("📖 License register: {} entries\n", registry.len());
        registry
    } else {
        println!(
            "📖 No license register at {} - all lookups will return not_found\n",
            LICENSE_REGISTER_FILE
        );
        FixtureRegistry::empty()
    };

    let engine = LicenseMergeEngine::new(&PipelineConfig::default());
    let summary = engine.verify_all(&registry, &mut store.tradies).await;
    store.save()?;

    println!("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("✅ Verification complete");
    println!(
        "   {} checked: {} licensed, {} without a license",
        summary.checked, summary.licensed, summary.unlicensed
    );

    Ok(())
}

fn run_publish() -> Result<()> {
    println!("🌐 Publishing directory page...");

    let store = TradieStore::load(STORE_FILE)?;
    publish(&store, PAGE_FILE)?;

    println!("✅ Wrote {} ({} businesses)", PAGE_FILE, store.len());
    Ok(())
}

fn run_export() -> Result<()> {
    println!("📤 Exporting CSV snapshot...");

    let store = TradieStore::load(STORE_FILE)?;
    let written = store.export_csv(EXPORT_FILE)?;

    println!("✅ Wrote {} ({} records)", EXPORT_FILE, written);
    Ok(())
}

fn run_stats() -> Result<()> {
    let store = TradieStore::load(STORE_FILE)?;
    let dataset = store.dataset();

    println!("📊 Tradie Directory stats");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("   Businesses:     {}", dataset.total_tradies);
    println!("   API calls used: {}", dataset.api_calls_used);
    print_breakdown(&store);

    let stats = &dataset.license_verification_stats;
    println!(
        "   Licenses:       {} checked, {} licensed, {} not found ({:.0}%)",
        stats.total_checked,
        stats.licensed,
        stats.unlicensed,
        stats.verification_rate * 100.0
    );

    Ok(())
}

fn print_breakdown(store: &TradieStore) {
    for (category, count) in store.dataset().breakdown {
        println!("   {:<12} {}", category, count);
    }
}

fn print_usage() {
    println!("Tradie Directory v{}", tradie_directory::VERSION);
    println!();
    println!("Usage: tradie-directory <command>");
    println!();
    println!("Commands:");
    println!("  discover [config.json]   Run the places search sweep and grow the store");
    println!("  verify                   Cross-reference the store with the license register");
    println!("  publish                  Render the static directory page");
    println!("  export                   Write a CSV snapshot of the dataset");
    println!("  stats                    Show dataset totals");
}
