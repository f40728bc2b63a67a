// 🌐 Publisher - static directory page generation
// Embeds the store's records verbatim as the page's data block; all
// presentation (grouping, default contact text) happens client-side.

use crate::business::Business;
use crate::store::TradieStore;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

const DATA_PLACEHOLDER: &str = "__TRADIE_DATA__";

const PAGE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en-AU">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Perth Tradie Directory</title>
<style>
  body { font-family: system-ui, sans-serif; margin: 0; background: #f4f5f7; color: #1d2330; }
  header { background: #1d3557; color: #fff; padding: 2rem 1.5rem; }
  header p { margin: 0.4rem 0 0; opacity: 0.85; }
  main { max-width: 960px; margin: 0 auto; padding: 1.5rem; }
  h2 { margin-top: 2rem; border-bottom: 2px solid #1d3557; padding-bottom: 0.3rem; }
  .card { background: #fff; border-radius: 8px; padding: 1rem 1.25rem; margin: 0.75rem 0;
          box-shadow: 0 1px 3px rgba(0,0,0,0.1); }
  .card h3 { margin: 0 0 0.25rem; }
  .badge { font-size: 0.75rem; padding: 0.15rem 0.5rem; border-radius: 999px; margin-left: 0.5rem; }
  .licensed { background: #d8f3dc; color: #1b4332; }
  .unlicensed { background: #ffe3e3; color: #7f1d1d; }
  .meta { color: #5b6372; font-size: 0.9rem; }
</style>
</head>
<body>
<header>
  <h1>Perth Tradie Directory</h1>
  <p id="summary"></p>
</header>
<main id="directory"></main>
<script>
const TRADIES = __TRADIE_DATA__;

const CATEGORY_NAMES = { electrician: "Electricians", plumber: "Plumbers", gas_fitter: "Gas Fitters" };
const DEFAULT_PHONE = { electrician: "Call for electrical quotes", plumber: "Call for plumbing quotes", gas_fitter: "Call for gas fitting quotes" };

document.getElementById("summary").textContent =
  TRADIES.length + " local trade businesses, updated automatically";

const main = document.getElementById("directory");
for (const [category, heading] of Object.entries(CATEGORY_NAMES)) {
  const group = TRADIES.filter(t => t.category === category);
  if (group.length === 0) continue;

  const h2 = document.createElement("h2");
  h2.textContent = heading + " (" + group.length + ")";
  main.appendChild(h2);

  for (const t of group) {
    const card = document.createElement("div");
    card.className = "card";

    const title = document.createElement("h3");
    title.textContent = t.name;
    if (t.licensed === true) {
      const badge = document.createElement("span");
      badge.className = "badge licensed";
      badge.textContent = "Licensed " + (t.licenseNumber || "");
      title.appendChild(badge);
    } else if (t.licensed === false) {
      const badge = document.createElement("span");
      badge.className = "badge unlicensed";
      badge.textContent = "No license found";
      title.appendChild(badge);
    }
    card.appendChild(title);

    const meta = document.createElement("p");
    meta.className = "meta";
    const rating = t.rating ? t.rating.toFixed(1) + "★ (" + t.reviewCount + ")" : "No reviews yet";
    const phone = t.phone || DEFAULT_PHONE[t.category] || "Contact for details";
    const address = t.address || "Servicing " + (t.areas || []).join(", ");
    meta.textContent = [rating, phone, address].join(" · ");
    card.appendChild(meta);

    const blurb = document.createElement("p");
    blurb.textContent = t.description + ". " + t.specialties;
    card.appendChild(blurb);

    main.appendChild(card);
  }
}
</script>
</body>
</html>
"#;

/// Render the directory page with the records embedded verbatim as the
/// data block. No filtering happens here.
pub fn render_page(tradies: &[Business]) -> Result<String> {
    let data = serde_json::to_string(tradies).context("Failed to serialize page data block")?;
    Ok(PAGE_TEMPLATE.replace(DATA_PLACEHOLDER, &data))
}

/// Render and write the page, creating parent directories as needed
pub fn publish<P: AsRef<Path>>(store: &TradieStore, out_path: P) -> Result<()> {
    let page = render_page(&store.tradies)?;

    if let Some(parent) = out_path.as_ref().parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create output directory: {:?}", parent))?;
        }
    }

    fs::write(out_path.as_ref(), page)
        .with_context(|| format!("Failed to write page: {:?}", out_path.as_ref()))?;

    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::business::TradeCategory;
    use chrono::Utc;

    #[test]
    fn test_render_embeds_records_verbatim() {
        let business = Business {
            id: 1,
            name: "ABC Electrical".to_string(),
            category: TradeCategory::Electrician,
            phone: None,
            website: None,
            address: None,
            rating: Some(4.5),
            review_count: 12,
            areas: vec!["Perth Metro".to_string()],
            specialties: TradeCategory::Electrician.specialties().to_string(),
            description: "Professional electrician services in Perth".to_string(),
            licensed: Some(true),
            license_number: Some("EC 12345".to_string()),
            license_type: Some("Electrical Contractor".to_string()),
            license_holder_name: Some("ABC Electrical".to_string()),
            license_status: Some("current".to_string()),
            license_verified_at: Some(Utc::now()),
            external_id: None,
            discovered_location: "Perth WA".to_string(),
            discovered_date: Utc::now(),
            last_updated: Utc::now(),
        };

        let page = render_page(&[business]).unwrap();
        assert!(!page.contains(DATA_PLACEHOLDER));
        assert!(page.contains("\"name\":\"ABC Electrical\""));
        assert!(page.contains("\"licenseNumber\":\"EC 12345\""));
    }

    #[test]
    fn test_render_empty_store() {
        let page = render_page(&[]).unwrap();
        assert!(page.contains("const TRADIES = [];"));
    }
}
