//! The uniform output record and its building blocks.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Utc};
use serde::Serialize;

use crate::status::RagStatus;

/// Dashboard category a metric belongs to; one batch entry point per variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Category {
    Crime,
    Economy,
    Education,
    Employment,
    Healthcare,
    Population,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Crime,
        Category::Economy,
        Category::Education,
        Category::Employment,
        Category::Healthcare,
        Category::Population,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Crime => "Crime",
            Category::Economy => "Economy",
            Category::Education => "Education",
            Category::Employment => "Employment",
            Category::Healthcare => "Healthcare",
            Category::Population => "Population",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "crime" => Ok(Category::Crime),
            "economy" => Ok(Category::Economy),
            "education" => Ok(Category::Education),
            "employment" => Ok(Category::Employment),
            "healthcare" => Ok(Category::Healthcare),
            "population" => Ok(Category::Population),
            other => Err(format!("unknown category '{other}'")),
        }
    }
}

/// Where a record's value came from. Live values were parsed out of the
/// upstream publication; fallbacks are statically configured published
/// headlines; placeholders mark metrics not yet wired to any source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    Live,
    Fallback,
    Placeholder,
}

/// Metric value: numeric, or the literal placeholder sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MetricValue {
    Number(f64),
    Sentinel(&'static str),
}

impl MetricValue {
    pub const PLACEHOLDER: MetricValue = MetricValue::Sentinel("placeholder");

    pub fn as_number(&self) -> Option<f64> {
        match self {
            MetricValue::Number(value) => Some(*value),
            MetricValue::Sentinel(_) => None,
        }
    }
}

/// One uniform output record for a (metric, period) pair. Built fresh on
/// every invocation; the core never persists it.
#[derive(Debug, Clone, Serialize)]
pub struct MetricRecord {
    pub metric_name: &'static str,
    pub metric_key: &'static str,
    pub category: Category,
    pub value: MetricValue,
    pub unit: &'static str,
    pub rag_status: RagStatus,
    pub time_period: String,
    pub data_source: String,
    pub source_url: &'static str,
    pub provenance: Provenance,
    pub last_updated: DateTime<Utc>,
}

/// Statically configured published headline used when live extraction fails.
/// These constants are frozen at configuration time; the upstream sources
/// offer no mechanism to refresh them automatically.
#[derive(Debug, Clone, Copy)]
pub struct Fallback {
    pub value: f64,
    /// Period the headline was published for; `None` means "current quarter".
    pub time_period: Option<&'static str>,
}

/// Quarter label for a timestamp, e.g. `"2025 Q3"`, used when a publication
/// carries no parseable period of its own.
pub fn current_quarter_label(now: DateTime<Utc>) -> String {
    let quarter = (now.month() - 1) / 3 + 1;
    format!("{} Q{}", now.year(), quarter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn quarter_label_covers_all_month_boundaries() {
        let at = |month| Utc.with_ymd_and_hms(2025, month, 15, 0, 0, 0).unwrap();
        assert_eq!(current_quarter_label(at(1)), "2025 Q1");
        assert_eq!(current_quarter_label(at(3)), "2025 Q1");
        assert_eq!(current_quarter_label(at(4)), "2025 Q2");
        assert_eq!(current_quarter_label(at(12)), "2025 Q4");
    }

    #[test]
    fn placeholder_value_serializes_as_the_sentinel_string() {
        assert_eq!(
            serde_json::to_string(&MetricValue::PLACEHOLDER).unwrap(),
            "\"placeholder\""
        );
        assert_eq!(serde_json::to_string(&MetricValue::Number(7.2)).unwrap(), "7.2");
    }

    #[test]
    fn record_serializes_with_dashboard_field_names() {
        let record = MetricRecord {
            metric_name: "Charge Rate",
            metric_key: "charge_rate",
            category: Category::Crime,
            value: MetricValue::Number(7.2),
            unit: "%",
            rag_status: RagStatus::Amber,
            time_period: "2025 Q2".to_string(),
            data_source: "Gov.uk: Crime Outcomes".to_string(),
            source_url: "https://example.test",
            provenance: Provenance::Live,
            last_updated: Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap(),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["metric_key"], "charge_rate");
        assert_eq!(json["category"], "Crime");
        assert_eq!(json["rag_status"], "amber");
        assert_eq!(json["provenance"], "live");
        assert_eq!(json["value"], 7.2);
    }

    #[test]
    fn category_round_trips_through_from_str() {
        for category in Category::ALL {
            let parsed: Category = category.as_str().parse().expect("parse");
            assert_eq!(parsed, category);
        }
        assert!("defence".parse::<Category>().is_err());
    }
}
