//! Healthcare metrics: NHS England monthly statistics files plus NHS Digital
//! published headlines. The NHS England URLs follow dated upload paths, so
//! each metric lists the most recent known files as candidates and degrades
//! to the published headline when none parses.

use std::time::Duration;

use crate::extract::ScalarPattern;
use crate::pipeline::{Extraction, LiveSource, MetricSpec, SourceSpec};
use crate::record::{Category, Fallback};
use crate::status::ThresholdPolicy;
use crate::tabular::FormatHint;

pub(super) const THRESHOLDS: &[(&str, ThresholdPolicy)] = &[
    // % seen within 4 hours against the 95% standard.
    ("a_e_wait_time", ThresholdPolicy::Ascending { green: 95.0, amber: 90.0 }),
    ("cancer_wait_time", ThresholdPolicy::Descending { green: 62.0, amber: 75.0 }),
    ("ambulance_response_time", ThresholdPolicy::Descending { green: 7.0, amber: 10.0 }),
    ("elective_backlog", ThresholdPolicy::Descending { green: 4_000_000.0, amber: 6_000_000.0 }),
    ("gp_appt_access", ThresholdPolicy::Ascending { green: 70.0, amber: 55.0 }),
    ("staff_vacancy_rate", ThresholdPolicy::Descending { green: 5.0, amber: 8.0 }),
];

pub(super) fn specs() -> Vec<MetricSpec> {
    vec![
        MetricSpec {
            key: "a_e_wait_time",
            name: "A&E 4-Hour Wait %",
            category: Category::Healthcare,
            unit: "%",
            source: SourceSpec::Live(LiveSource {
                candidates: &[
                    "https://www.england.nhs.uk/statistics/wp-content/uploads/sites/2/2025/04/Monthly-AE-March-2025.csv",
                ],
                format: FormatHint::Csv,
                extraction: Extraction::Scalar(ScalarPattern {
                    keyword_sets: &[&["england"]],
                    value_range: (40.0, 100.0),
                    scan_columns: None,
                    sheet_hints: &[],
                }),
                derive: None,
                timeout: Duration::from_secs(60),
                min_bytes: 1000,
                period_hint: None,
            }),
            data_source: "NHS England: A&E Attendances",
            source_url: "https://www.england.nhs.uk/statistics/statistical-work-areas/ae-waiting-times-and-activity/",
            fallback: Some(Fallback { value: 74.2, time_period: None }),
        },
        MetricSpec {
            key: "cancer_wait_time",
            name: "Cancer Wait Time",
            category: Category::Healthcare,
            unit: "",
            source: SourceSpec::Live(LiveSource {
                candidates: &[
                    "https://www.england.nhs.uk/statistics/wp-content/uploads/sites/2/2025/05/7.-62-Day-Combined-All-Cancers-Provider-Data.csv",
                ],
                format: FormatHint::Csv,
                extraction: Extraction::Scalar(ScalarPattern {
                    keyword_sets: &[&["england"], &["total"]],
                    value_range: (30.0, 90.0),
                    scan_columns: None,
                    sheet_hints: &[],
                }),
                derive: None,
                timeout: Duration::from_secs(60),
                min_bytes: 100,
                period_hint: None,
            }),
            data_source: "NHS England: Cancer Waiting Times",
            source_url: "https://www.england.nhs.uk/statistics/statistical-work-areas/cancer-waiting-times/",
            fallback: Some(Fallback { value: 68.0, time_period: None }),
        },
        MetricSpec {
            key: "ambulance_response_time",
            name: "Ambulance Response Time",
            category: Category::Healthcare,
            unit: "",
            source: SourceSpec::Live(LiveSource {
                candidates: &[
                    "https://www.england.nhs.uk/statistics/wp-content/uploads/sites/2/2025/05/AmbSYS-April-2025.xlsx",
                    "https://www.england.nhs.uk/statistics/wp-content/uploads/sites/2/2025/04/AmbSYS-March-2025.xlsx",
                ],
                format: FormatHint::Excel,
                extraction: Extraction::Scalar(ScalarPattern {
                    keyword_sets: &[&["england"], &["total"]],
                    // Category 1 mean response in minutes.
                    value_range: (5.0, 15.0),
                    scan_columns: None,
                    sheet_hints: &[],
                }),
                derive: None,
                timeout: Duration::from_secs(60),
                min_bytes: 1000,
                period_hint: None,
            }),
            data_source: "NHS England: Ambulance Quality Indicators",
            source_url: "https://www.england.nhs.uk/statistics/statistical-work-areas/ambulance-quality-indicators/",
            fallback: Some(Fallback { value: 8.5, time_period: None }),
        },
        MetricSpec {
            key: "elective_backlog",
            name: "Elective Backlog",
            category: Category::Healthcare,
            unit: "",
            source: SourceSpec::Live(LiveSource {
                candidates: &[
                    "https://www.england.nhs.uk/statistics/wp-content/uploads/sites/2/2026/01/RTT-Overview-Timeseries-Including-Estimates-for-Missing-Trusts-Nov25-XLS-115K-1Xmjkk.xlsx",
                ],
                format: FormatHint::Excel,
                extraction: Extraction::Scalar(ScalarPattern {
                    keyword_sets: &[&["total", "incomplete"]],
                    value_range: (4_000_000.0, 10_000_000.0),
                    scan_columns: None,
                    sheet_hints: &[],
                }),
                derive: None,
                timeout: Duration::from_secs(60),
                min_bytes: 1000,
                period_hint: Some("Nov 2025"),
            }),
            data_source: "NHS England: RTT Waiting Times",
            source_url: "https://www.england.nhs.uk/statistics/statistical-work-areas/rtt-waiting-times/",
            fallback: Some(Fallback { value: 6_500_000.0, time_period: Some("Nov 2025") }),
        },
        MetricSpec {
            key: "gp_appt_access",
            name: "GP Appt. Access",
            category: Category::Healthcare,
            unit: "%",
            // Monthly publication with no stable CSV endpoint; headline share
            // of appointments within two weeks.
            source: SourceSpec::Published { value: 65.0, time_period: None },
            data_source: "NHS Digital: Appointments in GP",
            source_url: "https://digital.nhs.uk/data-and-information/publications/statistical/appointments-in-general-practice",
            fallback: None,
        },
        MetricSpec {
            key: "staff_vacancy_rate",
            name: "Staff Vacancy Rate",
            category: Category::Healthcare,
            unit: "%",
            source: SourceSpec::Published { value: 6.7, time_period: Some("Q2 2025/26") },
            data_source: "NHS Digital: Vacancies in NHS",
            source_url: "https://digital.nhs.uk/data-and-information/publications/statistical/nhs-vacancies-survey",
            fallback: None,
        },
    ]
}
