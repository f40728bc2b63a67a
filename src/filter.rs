// ✅ Validity Filter - Keeps genuine in-scope trade businesses
// Three independent checks; any single failing check rejects the
// record. All keyword/tag lists come from configuration.

use crate::config::PipelineConfig;

// ============================================================================
// REJECTION REASON
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum RejectionReason {
    /// Name contains an exclusion keyword (retail chains, trainers, wholesalers)
    ExcludedName { keyword: String },

    /// Address is present but carries no region marker
    OutOfRegion,

    /// Tag set is non-empty but contains no relevant tag
    IrrelevantTags,
}

impl RejectionReason {
    pub fn describe(&self) -> String {
        match self {
            RejectionReason::ExcludedName { keyword } => {
                format!("name matches exclusion keyword \"{}\"", keyword)
            }
            RejectionReason::OutOfRegion => "address has no region marker".to_string(),
            RejectionReason::IrrelevantTags => "no relevant category tag".to_string(),
        }
    }
}

// ============================================================================
// VALIDITY FILTER
// ============================================================================

pub struct ValidityFilter {
    exclusion_keywords: Vec<String>,
    relevant_tags: Vec<String>,
    region_abbreviation: String,
    region_name: String,
}

impl ValidityFilter {
    pub fn new(config: &PipelineConfig) -> Self {
        ValidityFilter {
            exclusion_keywords: config
                .exclusion_keywords
                .iter()
                .map(|k| k.to_lowercase())
                .collect(),
            relevant_tags: config
                .relevant_tags
                .iter()
                .map(|t| t.to_lowercase())
                .collect(),
            region_abbreviation: config.region_abbreviation.clone(),
            region_name: config.region_name.clone(),
        }
    }

    /// Run all three checks. Returns the first failing check's reason,
    /// or None when the record is accepted.
    pub fn check(
        &self,
        name: &str,
        address: Option<&str>,
        tags: &[String],
    ) -> Option<RejectionReason> {
        let name_lower = name.to_lowercase();
        if let Some(keyword) = self
            .exclusion_keywords
            .iter()
            .find(|k| name_lower.contains(k.as_str()))
        {
            return Some(RejectionReason::ExcludedName {
                keyword: keyword.clone(),
            });
        }

        // Address absence is NOT evidence of being out-of-region
        if let Some(address) = address {
            if !address.contains(self.region_abbreviation.as_str())
                && !address.contains(self.region_name.as_str())
            {
                return Some(RejectionReason::OutOfRegion);
            }
        }

        // An empty tag set does not itself cause rejection
        if !tags.is_empty() && !tags.iter().any(|t| self.is_relevant_tag(t)) {
            return Some(RejectionReason::IrrelevantTags);
        }

        None
    }

    pub fn is_valid(&self, name: &str, address: Option<&str>, tags: &[String]) -> bool {
        self.check(name, address, tags).is_none()
    }

    fn is_relevant_tag(&self, tag: &str) -> bool {
        let tag = tag.to_lowercase();
        self.relevant_tags.iter().any(|t| t == &tag)
            || tag.contains("contractor")
            || tag.contains("service")
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn filter() -> ValidityFilter {
        ValidityFilter::new(&PipelineConfig::default())
    }

    fn tags(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_exclusion_keyword_rejects() {
        let rejection = filter().check("Bunnings Warehouse Midland", None, &[]);
        assert!(matches!(
            rejection,
            Some(RejectionReason::ExcludedName { .. })
        ));

        // Case-insensitive
        let rejection = filter().check("PERTH ELECTRICAL TRAINING", None, &[]);
        assert!(matches!(
            rejection,
            Some(RejectionReason::ExcludedName { .. })
        ));
    }

    #[test]
    fn test_address_without_region_marker_rejects() {
        let rejection = filter().check("ABC Electrical", Some("123 X St, Unknown Region"), &[]);
        assert_eq!(rejection, Some(RejectionReason::OutOfRegion));
    }

    #[test]
    fn test_missing_address_passes_region_check() {
        // No address at all is not rejected on the address check
        assert_eq!(filter().check("ABC Electrical", None, &[]), None);
    }

    #[test]
    fn test_region_marker_accepts() {
        let f = filter();
        assert!(f.is_valid("ABC Electrical", Some("1 High St, Fremantle WA 6160"), &[]));
        assert!(f.is_valid(
            "ABC Electrical",
            Some("1 High St, Fremantle, Western Australia"),
            &[]
        ));
    }

    #[test]
    fn test_irrelevant_tags_reject() {
        let rejection = filter().check(
            "ABC Electrical",
            None,
            &tags(&["restaurant", "food"]),
        );
        assert_eq!(rejection, Some(RejectionReason::IrrelevantTags));
    }

    #[test]
    fn test_relevant_tag_variants_accept() {
        let f = filter();
        // Allow-listed tag
        assert!(f.is_valid("ABC", None, &tags(&["electrician", "point_of_interest"])));
        // "contractor" substring counts as relevant
        assert!(f.is_valid("ABC", None, &tags(&["roofing_contractor"])));
        // "service" substring counts as relevant
        assert!(f.is_valid("ABC", None, &tags(&["repair_service"])));
    }

    #[test]
    fn test_empty_tag_set_passes() {
        assert!(filter().is_valid("ABC Electrical", None, &[]));
    }
}
