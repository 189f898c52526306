//! Static per-category metric catalogs.
//!
//! Everything here is configuration data: candidate URLs, keyword sets,
//! plausibility ranges, thresholds, and published fallback headlines. The
//! values are frozen from the upstream publications at configuration time;
//! there is no refresh mechanism.

mod crime;
mod economy;
mod education;
mod employment;
mod healthcare;
mod population;

use crate::config::HttpConfig;
use crate::fetch::Fetcher;
use crate::pipeline::{self, MetricSpec};
use crate::record::{Category, MetricRecord};
use crate::status::{PolicyRegistry, ThresholdPolicy};

/// All metric specs for one dashboard category.
pub fn specs_for(category: Category) -> Vec<MetricSpec> {
    match category {
        Category::Crime => crime::specs(),
        Category::Economy => economy::specs(),
        Category::Education => education::specs(),
        Category::Employment => employment::specs(),
        Category::Healthcare => healthcare::specs(),
        Category::Population => population::specs(),
    }
}

/// Threshold registry across every category. Metrics with no policy
/// (e.g. total population) are deliberately absent and classify as amber.
pub fn registry() -> PolicyRegistry {
    let mut entries: Vec<(&'static str, ThresholdPolicy)> = Vec::new();
    entries.extend_from_slice(crime::THRESHOLDS);
    entries.extend_from_slice(economy::THRESHOLDS);
    entries.extend_from_slice(education::THRESHOLDS);
    entries.extend_from_slice(employment::THRESHOLDS);
    entries.extend_from_slice(healthcare::THRESHOLDS);
    entries.extend_from_slice(population::THRESHOLDS);
    PolicyRegistry::from_entries(&entries)
}

/// Run one category's batch end to end.
pub fn run_category(
    category: Category,
    fetcher: &dyn Fetcher,
    registry: &PolicyRegistry,
    http: &HttpConfig,
    historical: bool,
) -> Vec<MetricRecord> {
    pipeline::run_specs(&specs_for(category), fetcher, registry, http, historical)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::SourceSpec;
    use std::collections::HashSet;

    #[test]
    fn every_category_carries_at_least_three_metrics() {
        for category in Category::ALL {
            assert!(
                specs_for(category).len() >= 3,
                "{category} has too few metrics"
            );
        }
    }

    #[test]
    fn metric_keys_are_unique_across_the_whole_catalog() {
        let mut seen = HashSet::new();
        for category in Category::ALL {
            for spec in specs_for(category) {
                assert!(seen.insert(spec.key), "duplicate metric key {}", spec.key);
                assert_eq!(spec.category, category);
            }
        }
    }

    #[test]
    fn live_sources_always_name_at_least_one_candidate() {
        for category in Category::ALL {
            for spec in specs_for(category) {
                if let SourceSpec::Live(source) = &spec.source {
                    assert!(
                        !source.candidates.is_empty(),
                        "{} has no candidate URLs",
                        spec.key
                    );
                }
            }
        }
    }

    #[test]
    fn every_classified_metric_has_a_registered_policy() {
        // Only total_population is intentionally policy-free.
        let registry = registry();
        for category in Category::ALL {
            for spec in specs_for(category) {
                if spec.key == "total_population" {
                    assert!(registry.get(spec.key).is_none());
                } else {
                    assert!(
                        registry.get(spec.key).is_some(),
                        "{} missing a threshold policy",
                        spec.key
                    );
                }
            }
        }
    }

    #[test]
    fn metrics_with_no_fallback_are_the_documented_ones() {
        let mut without: Vec<&str> = Vec::new();
        for category in Category::ALL {
            for spec in specs_for(category) {
                if matches!(spec.source, SourceSpec::Live(_)) && spec.fallback.is_none() {
                    without.push(spec.key);
                }
            }
        }
        without.sort_unstable();
        assert_eq!(
            without,
            vec![
                "attainment8",
                "business_investment",
                "cpi_inflation",
                "healthy_life_expectancy",
                "inactivity_rate",
                "job_vacancy_ratio",
                "net_migration",
                "old_age_dependency_ratio",
                "output_per_hour",
                "perception_of_safety",
                "public_sector_net_debt",
                "real_gdp_growth",
                "real_wage_growth",
                "total_population",
            ]
        );
    }
}
