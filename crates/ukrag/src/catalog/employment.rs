//! Employment metrics: three ONS generator series plus two published
//! estimates with no single-series CSV.

use std::time::Duration;

use crate::pipeline::{Extraction, LiveSource, MetricSpec, SourceSpec};
use crate::record::Category;
use crate::status::ThresholdPolicy;
use crate::tabular::FormatHint;

pub(super) const THRESHOLDS: &[(&str, ThresholdPolicy)] = &[
    ("inactivity_rate", ThresholdPolicy::Descending { green: 20.0, amber: 22.0 }),
    ("real_wage_growth", ThresholdPolicy::Ascending { green: 1.0, amber: 0.0 }),
    ("job_vacancy_ratio", ThresholdPolicy::Ascending { green: 4.0, amber: 2.5 }),
    ("underemployment", ThresholdPolicy::Descending { green: 6.0, amber: 8.0 }),
    ("sickness_absence", ThresholdPolicy::Descending { green: 2.5, amber: 3.5 }),
];

pub(super) fn specs() -> Vec<MetricSpec> {
    const LF2S: &[&str] = &[
        "https://www.ons.gov.uk/generator?format=csv&uri=/employmentandlabourmarket/peoplenotinwork/economicinactivity/timeseries/lf2s/lms",
    ];
    const A3WW: &[&str] = &[
        "https://www.ons.gov.uk/generator?format=csv&uri=/employmentandlabourmarket/peopleinwork/earningsandworkinghours/timeseries/a3ww/lms",
    ];
    const AP2Z: &[&str] = &[
        "https://www.ons.gov.uk/generator?format=csv&uri=/employmentandlabourmarket/peopleinwork/employmentandemployeetypes/timeseries/ap2z/unem",
    ];

    let narrow = |candidates: &'static [&'static str]| {
        SourceSpec::Live(LiveSource {
            candidates,
            format: FormatHint::Csv,
            extraction: Extraction::NarrowSeries,
            derive: None,
            timeout: Duration::from_secs(30),
            min_bytes: 0,
            period_hint: None,
        })
    };

    vec![
        MetricSpec {
            key: "inactivity_rate",
            name: "Inactivity Rate",
            category: Category::Employment,
            unit: "%",
            source: narrow(LF2S),
            data_source: "ONS",
            source_url: LF2S[0],
            fallback: None,
        },
        MetricSpec {
            key: "real_wage_growth",
            name: "Real Wage Growth",
            category: Category::Employment,
            unit: "%",
            source: narrow(A3WW),
            data_source: "ONS",
            source_url: A3WW[0],
            fallback: None,
        },
        MetricSpec {
            key: "job_vacancy_ratio",
            name: "Job Vacancy Ratio",
            category: Category::Employment,
            // AP2Z is vacancies per 100 employee jobs, not a percentage.
            unit: "",
            source: narrow(AP2Z),
            data_source: "ONS",
            source_url: AP2Z[0],
            fallback: None,
        },
        MetricSpec {
            key: "underemployment",
            name: "Underemployment",
            category: Category::Employment,
            unit: "%",
            source: SourceSpec::Published { value: 6.2, time_period: Some("2025 Q3") },
            data_source: "ONS EMP16",
            source_url: "https://www.ons.gov.uk/employmentandlabourmarket/peopleinwork/employmentandemployeetypes/datasets/underemploymentandoveremploymentemp16/current",
            fallback: None,
        },
        MetricSpec {
            key: "sickness_absence",
            name: "Sickness Absence",
            category: Category::Employment,
            unit: "%",
            source: SourceSpec::Published { value: 2.0, time_period: Some("2024") },
            data_source: "ONS",
            source_url: "https://www.ons.gov.uk/employmentandlabourmarket/peopleinwork/employmentandemployeetypes/datasets/sicknessabsenceinthelabourmarket",
            fallback: None,
        },
    ]
}
