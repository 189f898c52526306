//! Education metrics: DfE explore-education-statistics API plus published
//! headlines for the datasets with no stable machine-readable endpoint.

use std::time::Duration;

use crate::extract::ScalarPattern;
use crate::pipeline::{Extraction, LiveSource, MetricSpec, SourceSpec};
use crate::record::Category;
use crate::status::ThresholdPolicy;
use crate::tabular::FormatHint;

pub(super) const THRESHOLDS: &[(&str, ThresholdPolicy)] = &[
    ("attainment8", ThresholdPolicy::Ascending { green: 48.0, amber: 44.0 }),
    ("teacher_vacancy_rate", ThresholdPolicy::Descending { green: 1.0, amber: 2.0 }),
    ("neet_rate", ThresholdPolicy::Descending { green: 3.0, amber: 5.0 }),
];

pub(super) fn specs() -> Vec<MetricSpec> {
    vec![
        MetricSpec {
            key: "attainment8",
            name: "Attainment 8 Score",
            category: Category::Education,
            unit: "",
            source: SourceSpec::Live(LiveSource {
                candidates: &[
                    "https://api.education.gov.uk/statistics/v1/data-sets/b3e19901-5d2b-b676-bb4c-e60937d74725/csv?dataSetVersion=1.0",
                ],
                format: FormatHint::Csv,
                extraction: Extraction::Scalar(ScalarPattern {
                    keyword_sets: &[&["national"]],
                    // Attainment 8 national averages hover in the mid-40s.
                    value_range: (35.0, 60.0),
                    scan_columns: None,
                    sheet_hints: &[],
                }),
                derive: None,
                timeout: Duration::from_secs(30),
                min_bytes: 0,
                period_hint: None,
            }),
            data_source: "DfE Key Stage 4 Performance",
            source_url: "https://explore-education-statistics.service.gov.uk/find-statistics/key-stage-4-performance",
            fallback: None,
        },
        MetricSpec {
            key: "teacher_vacancy_rate",
            name: "Teacher Vacancy Rate",
            category: Category::Education,
            unit: "%",
            source: SourceSpec::Published { value: 1.5, time_period: Some("2024") },
            data_source: "DfE School Workforce Census",
            source_url: "https://explore-education-statistics.service.gov.uk/find-statistics/school-workforce-in-england",
            fallback: None,
        },
        MetricSpec {
            key: "neet_rate",
            name: "NEET Rate (16-17)",
            category: Category::Education,
            unit: "%",
            source: SourceSpec::Published { value: 4.2, time_period: Some("2024") },
            data_source: "DfE NEET Statistics",
            source_url: "https://explore-education-statistics.service.gov.uk/find-statistics/neet-statistics-annual-brief",
            fallback: None,
        },
    ]
}
