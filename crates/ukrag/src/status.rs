//! Status-band policy engine: classifies metric values into RAG bands.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Three-level qualitative classification of a metric value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RagStatus {
    Green,
    Amber,
    Red,
}

/// Threshold shape for one metric. Comparisons are inclusive on both sides
/// for every variant: a value exactly on a boundary resolves to the better
/// of the two adjoining bands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ThresholdPolicy {
    /// Higher is better: `value >= green` is green, `>= amber` is amber.
    Ascending { green: f64, amber: f64 },
    /// Lower is better: `value <= green` is green, `<= amber` is amber.
    Descending { green: f64, amber: f64 },
    /// Target corridor: inside the green range is green, inside the wider
    /// amber range is amber, anything else red.
    Banded {
        green_min: f64,
        green_max: f64,
        amber_min: f64,
        amber_max: f64,
    },
}

impl ThresholdPolicy {
    pub fn classify(&self, value: f64) -> RagStatus {
        match *self {
            ThresholdPolicy::Ascending { green, amber } => {
                if value >= green {
                    RagStatus::Green
                } else if value >= amber {
                    RagStatus::Amber
                } else {
                    RagStatus::Red
                }
            }
            ThresholdPolicy::Descending { green, amber } => {
                if value <= green {
                    RagStatus::Green
                } else if value <= amber {
                    RagStatus::Amber
                } else {
                    RagStatus::Red
                }
            }
            ThresholdPolicy::Banded {
                green_min,
                green_max,
                amber_min,
                amber_max,
            } => {
                if value >= green_min && value <= green_max {
                    RagStatus::Green
                } else if value >= amber_min && value <= amber_max {
                    RagStatus::Amber
                } else {
                    RagStatus::Red
                }
            }
        }
    }
}

/// Immutable threshold registry keyed by metric identifier. Built once at
/// process start and passed by reference into the pipeline; never mutated at
/// runtime.
#[derive(Debug, Clone, Default)]
pub struct PolicyRegistry {
    policies: HashMap<&'static str, ThresholdPolicy>,
}

impl PolicyRegistry {
    pub fn from_entries(entries: &[(&'static str, ThresholdPolicy)]) -> Self {
        Self {
            policies: entries.iter().copied().collect(),
        }
    }

    pub fn get(&self, metric_key: &str) -> Option<ThresholdPolicy> {
        self.policies.get(metric_key).copied()
    }

    /// Unknown metric key classifies as amber: unknown means caution, not an
    /// error.
    pub fn classify(&self, metric_key: &str, value: f64) -> RagStatus {
        match self.get(metric_key) {
            Some(policy) => policy.classify(value),
            None => RagStatus::Amber,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 0.0001;

    #[test]
    fn ascending_boundaries_resolve_to_the_better_band() {
        let policy = ThresholdPolicy::Ascending { green: 2.0, amber: 1.0 };
        assert_eq!(policy.classify(2.0), RagStatus::Green);
        assert_eq!(policy.classify(1.0), RagStatus::Amber);
        assert_eq!(policy.classify(1.0 - EPSILON), RagStatus::Red);
    }

    #[test]
    fn descending_boundaries_resolve_to_the_better_band() {
        let policy = ThresholdPolicy::Descending { green: 80.0, amber: 100.0 };
        assert_eq!(policy.classify(80.0), RagStatus::Green);
        assert_eq!(policy.classify(100.0), RagStatus::Amber);
        assert_eq!(policy.classify(100.0 + EPSILON), RagStatus::Red);
    }

    #[test]
    fn banded_corridor_matches_cpi_target_thresholds() {
        let policy = ThresholdPolicy::Banded {
            green_min: 1.5,
            green_max: 2.5,
            amber_min: 1.0,
            amber_max: 3.5,
        };
        assert_eq!(policy.classify(1.5), RagStatus::Green);
        assert_eq!(policy.classify(2.5), RagStatus::Green);
        assert_eq!(policy.classify(1.0), RagStatus::Amber);
        assert_eq!(policy.classify(3.5), RagStatus::Amber);
        assert_eq!(policy.classify(0.9), RagStatus::Red);
        assert_eq!(policy.classify(3.6), RagStatus::Red);
    }

    #[test]
    fn registry_defaults_unknown_keys_to_amber() {
        let registry = PolicyRegistry::from_entries(&[(
            "charge_rate",
            ThresholdPolicy::Ascending { green: 10.0, amber: 7.0 },
        )]);
        assert_eq!(registry.classify("charge_rate", 11.0), RagStatus::Green);
        assert_eq!(registry.classify("not_registered", 11.0), RagStatus::Amber);
    }

    #[test]
    fn rag_status_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&RagStatus::Green).unwrap(), "\"green\"");
        assert_eq!(serde_json::to_string(&RagStatus::Amber).unwrap(), "\"amber\"");
        assert_eq!(serde_json::to_string(&RagStatus::Red).unwrap(), "\"red\"");
    }
}
