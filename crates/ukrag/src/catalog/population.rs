//! Population metrics: the UKPOP series plus ONS reference-table Excel
//! workbooks addressed by sheet-number hints.

use std::time::Duration;

use crate::extract::ScalarPattern;
use crate::pipeline::{Extraction, LiveSource, MetricSpec, SourceSpec};
use crate::record::Category;
use crate::status::ThresholdPolicy;
use crate::tabular::FormatHint;

pub(super) const THRESHOLDS: &[(&str, ThresholdPolicy)] = &[
    // total_population is deliberately absent: a headcount has no
    // good/bad direction, so it always classifies amber.
    (
        "net_migration",
        ThresholdPolicy::Banded {
            green_min: 0.0,
            green_max: 300_000.0,
            amber_min: -500_000.0,
            amber_max: 500_000.0,
        },
    ),
    ("old_age_dependency_ratio", ThresholdPolicy::Descending { green: 300.0, amber: 350.0 }),
    ("healthy_life_expectancy", ThresholdPolicy::Ascending { green: 63.0, amber: 60.0 }),
    // Births minus deaths: any surplus is green, any deficit red.
    ("natural_change", ThresholdPolicy::Ascending { green: 0.0, amber: 0.0 }),
];

pub(super) fn specs() -> Vec<MetricSpec> {
    vec![
        MetricSpec {
            key: "total_population",
            name: "Total Population",
            category: Category::Population,
            unit: "",
            source: SourceSpec::Live(LiveSource {
                candidates: &[
                    "https://www.ons.gov.uk/generator?format=csv&uri=/peoplepopulationandcommunity/populationandmigration/populationestimates/timeseries/ukpop/pop",
                ],
                format: FormatHint::Csv,
                extraction: Extraction::NarrowSeries,
                derive: None,
                timeout: Duration::from_secs(30),
                min_bytes: 0,
                period_hint: None,
            }),
            data_source: "ONS: Total Population",
            source_url: "https://www.ons.gov.uk/peoplepopulationandcommunity/populationandmigration/populationestimates",
            fallback: None,
        },
        MetricSpec {
            key: "net_migration",
            name: "Net Migration (Long-term)",
            category: Category::Population,
            unit: "",
            source: SourceSpec::Live(LiveSource {
                candidates: &[
                    "https://www.ons.gov.uk/file?uri=/peoplepopulationandcommunity/populationandmigration/internationalmigration/datasets/longterminternationalimmigrationemigrationandnetmigrationflowsprovisional/yearendingjune2025/ltimnov25.xlsx",
                ],
                format: FormatHint::Excel,
                extraction: Extraction::Scalar(ScalarPattern {
                    keyword_sets: &[&["net", "migration"]],
                    value_range: (-500_000.0, 800_000.0),
                    scan_columns: Some(2..3),
                    sheet_hints: &["1"],
                }),
                derive: None,
                timeout: Duration::from_secs(60),
                min_bytes: 1000,
                period_hint: Some("Year ending June 2025"),
            }),
            data_source: "ONS Series BBGM",
            source_url: "https://www.ons.gov.uk/peoplepopulationandcommunity/populationandmigration/internationalmigration/datasets/longterminternationalimmigrationemigrationandnetmigrationflowsprovisional",
            fallback: None,
        },
        MetricSpec {
            key: "old_age_dependency_ratio",
            name: "Old-Age Dependency Ratio",
            category: Category::Population,
            unit: " per 1,000",
            source: SourceSpec::Live(LiveSource {
                candidates: &[
                    "https://www.ons.gov.uk/file?uri=/peoplepopulationandcommunity/populationandmigration/populationprojections/datasets/comparisonofoldagedependencyratioestimatesandprojectionsukandconstituentcountries/current/oldagedependencyratiosprojectionsandestimatesuk.xlsx",
                ],
                format: FormatHint::Excel,
                extraction: Extraction::Scalar(ScalarPattern {
                    // Year rows carry no distinguishing keyword; the range
                    // guard on the estimate column does the selection.
                    keyword_sets: &[&[]],
                    value_range: (200.0, 500.0),
                    scan_columns: Some(1..2),
                    sheet_hints: &["UK"],
                }),
                derive: None,
                timeout: Duration::from_secs(60),
                min_bytes: 1000,
                period_hint: None,
            }),
            data_source: "ONS Population Projections",
            source_url: "https://www.ons.gov.uk/peoplepopulationandcommunity/populationandmigration/populationprojections/datasets/comparisonofoldagedependencyratioestimatesandprojectionsukandconstituentcountries",
            fallback: None,
        },
        MetricSpec {
            key: "healthy_life_expectancy",
            name: "Healthy Life Expectancy",
            category: Category::Population,
            unit: " years",
            source: SourceSpec::Live(LiveSource {
                candidates: &[
                    "https://www.ons.gov.uk/file?uri=/peoplepopulationandcommunity/healthandsocialcare/healthandlifeexpectancies/datasets/healthstatelifeexpectancyallagesuk/current/healthylifeexpectancyenglandandwales.xlsx",
                ],
                format: FormatHint::Excel,
                extraction: Extraction::Scalar(ScalarPattern {
                    keyword_sets: &[&["england"]],
                    value_range: (50.0, 70.0),
                    scan_columns: Some(7..8),
                    sheet_hints: &["3"],
                }),
                derive: None,
                timeout: Duration::from_secs(90),
                min_bytes: 1000,
                period_hint: Some("2021-2023"),
            }),
            data_source: "ONS Health State Life Expectancy",
            source_url: "https://www.ons.gov.uk/peoplepopulationandcommunity/healthandsocialcare/healthandlifeexpectancies/datasets/healthstatelifeexpectancyallagesuk",
            fallback: None,
        },
        MetricSpec {
            key: "natural_change",
            name: "Natural Change (Births vs Deaths)",
            category: Category::Population,
            unit: "k",
            // Births-minus-deaths headline in thousands from the vital
            // statistics reference tables.
            source: SourceSpec::Published { value: 27.2, time_period: Some("2021") },
            data_source: "ONS Vital Statistics (VVHM)",
            source_url: "https://www.ons.gov.uk/peoplepopulationandcommunity/populationandmigration/populationestimates/datasets/vitalstatisticspopulationandhealthreferencetables",
            fallback: None,
        },
    ]
}
