//! Crime metrics: ONS crime tables, Gov.uk outcomes, CSEW perceptions, and
//! MoJ court/reoffending statistics.

use std::time::Duration;

use crate::extract::ScalarPattern;
use crate::pipeline::{Extraction, LiveSource, MetricSpec, SourceSpec};
use crate::record::{Category, Fallback};
use crate::status::ThresholdPolicy;
use crate::tabular::FormatHint;

pub(super) const THRESHOLDS: &[(&str, ThresholdPolicy)] = &[
    ("recorded_crime_rate", ThresholdPolicy::Descending { green: 80.0, amber: 100.0 }),
    ("charge_rate", ThresholdPolicy::Ascending { green: 10.0, amber: 7.0 }),
    ("perception_of_safety", ThresholdPolicy::Ascending { green: 70.0, amber: 55.0 }),
    ("crown_court_backlog", ThresholdPolicy::Descending { green: 40_000.0, amber: 60_000.0 }),
    ("reoffending_rate", ThresholdPolicy::Descending { green: 25.0, amber: 30.0 }),
];

pub(super) fn specs() -> Vec<MetricSpec> {
    vec![
        MetricSpec {
            key: "recorded_crime_rate",
            name: "Total Recorded Crime",
            category: Category::Crime,
            unit: "",
            source: SourceSpec::Live(LiveSource {
                candidates: &[
                    "https://www.ons.gov.uk/file?uri=/peoplepopulationandcommunity/crimeandjustice/datasets/crimeinenglandandwalesquarterlydatatables/yearendingmarch2024/quarterlydatatablesyemarch2024.xlsx",
                ],
                format: FormatHint::Excel,
                extraction: Extraction::Scalar(ScalarPattern {
                    keyword_sets: &[&["england"], &["total", "crime"]],
                    // Rate per 1,000 population; recent figures sit well inside this band.
                    value_range: (50.0, 150.0),
                    scan_columns: None,
                    sheet_hints: &["P1", "RECORDED CRIME"],
                }),
                derive: None,
                timeout: Duration::from_secs(60),
                min_bytes: 0,
                period_hint: None,
            }),
            data_source: "ONS: Crime in England & Wales",
            source_url: "https://www.ons.gov.uk/peoplepopulationandcommunity/crimeandjustice/datasets/crimeinenglandandwalesquarterlydatatables",
            fallback: Some(Fallback { value: 89.5, time_period: None }),
        },
        MetricSpec {
            key: "charge_rate",
            name: "Charge Rate",
            category: Category::Crime,
            unit: "%",
            source: SourceSpec::Live(LiveSource {
                candidates: &[
                    // Supplementary outcomes metrics (small summary file) first,
                    // then the full open-data tables.
                    "https://assets.publishing.service.gov.uk/media/68f87963b391b93d5aa39a39/prc-supplementary-crime-outcomes-metrics-231025.xlsx",
                    "https://assets.publishing.service.gov.uk/media/68f1ec061c9076042263efb2/prc-outcomes-open-data-mar2025-tables-231025.xlsx",
                ],
                format: FormatHint::Excel,
                extraction: Extraction::Scalar(ScalarPattern {
                    keyword_sets: &[&["charge"], &["detection"], &["outcome"]],
                    value_range: (5.0, 25.0),
                    scan_columns: None,
                    sheet_hints: &[],
                }),
                derive: None,
                timeout: Duration::from_secs(90),
                min_bytes: 0,
                period_hint: None,
            }),
            data_source: "Gov.uk: Crime Outcomes",
            source_url: "https://www.gov.uk/government/statistical-data-sets/police-recorded-crime-and-outcomes-open-data-tables",
            fallback: Some(Fallback { value: 7.2, time_period: None }),
        },
        MetricSpec {
            key: "perception_of_safety",
            name: "Perception of Safety",
            category: Category::Crime,
            unit: "%",
            source: SourceSpec::Live(LiveSource {
                candidates: &[
                    "https://www.ons.gov.uk/file?uri=/peoplepopulationandcommunity/crimeandjustice/datasets/perceptionsothercsewopendatatable/current/perceptionsotherenglandandwales2025q2.zip",
                ],
                format: FormatHint::Zip,
                extraction: Extraction::Scalar(ScalarPattern {
                    keyword_sets: &[&["safe"], &["perception"], &["walking"]],
                    value_range: (40.0, 95.0),
                    scan_columns: None,
                    sheet_hints: &[],
                }),
                derive: None,
                timeout: Duration::from_secs(90),
                min_bytes: 0,
                period_hint: Some("2025 Q2"),
            }),
            data_source: "ONS: Crime Survey (CSEW)",
            source_url: "https://www.ons.gov.uk/peoplepopulationandcommunity/crimeandjustice/datasets/perceptionsothercsewopendatatable",
            fallback: None,
        },
        MetricSpec {
            key: "crown_court_backlog",
            name: "Crown Court Backlog",
            category: Category::Crime,
            unit: "",
            source: SourceSpec::Live(LiveSource {
                candidates: &[
                    "https://assets.publishing.service.gov.uk/media/68f1a1b12f0fc56403a3cfd9/criminal-court-statistics-quarterly-october-to-december-2024.ods",
                ],
                format: FormatHint::Ods,
                extraction: Extraction::Scalar(ScalarPattern {
                    keyword_sets: &[
                        &["crown", "backlog"],
                        &["crown", "caseload"],
                        &["crown", "open"],
                    ],
                    value_range: (30_000.0, 100_000.0),
                    scan_columns: None,
                    sheet_hints: &[],
                }),
                derive: None,
                timeout: Duration::from_secs(60),
                min_bytes: 1000,
                period_hint: Some("Oct-Dec 2024"),
            }),
            data_source: "MoJ: Criminal Court Stats",
            source_url: "https://www.gov.uk/government/collections/criminal-court-statistics",
            fallback: Some(Fallback { value: 74_651.0, time_period: Some("Dec 2024") }),
        },
        MetricSpec {
            key: "reoffending_rate",
            name: "Reoffending Rate",
            category: Category::Crime,
            unit: "%",
            // The bulletin is PDF-only; the published headline is the source.
            source: SourceSpec::Published { value: 28.3, time_period: Some("Oct-Dec 2023") },
            data_source: "MoJ: Proven Reoffending",
            source_url: "https://www.gov.uk/government/collections/proven-reoffending-statistics",
            fallback: None,
        },
    ]
}
