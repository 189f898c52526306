//! Economy metrics: ONS time series via the CSV generator, plus the full
//! PRDY/CXNV dataset CSVs for the two series the generator only publishes
//! annually.

use std::time::Duration;

use crate::pipeline::{Derivation, Extraction, LiveSource, MetricSpec, SourceSpec};
use crate::record::Category;
use crate::status::ThresholdPolicy;
use crate::tabular::FormatHint;

pub(super) const THRESHOLDS: &[(&str, ThresholdPolicy)] = &[
    ("real_gdp_growth", ThresholdPolicy::Ascending { green: 2.0, amber: 1.0 }),
    (
        "cpi_inflation",
        ThresholdPolicy::Banded {
            green_min: 1.5,
            green_max: 2.5,
            amber_min: 1.0,
            amber_max: 3.5,
        },
    ),
    ("output_per_hour", ThresholdPolicy::Ascending { green: 1.0, amber: 0.0 }),
    ("public_sector_net_debt", ThresholdPolicy::Descending { green: 90.0, amber: 100.0 }),
    // Classified on YoY % change computed from NPEL levels.
    ("business_investment", ThresholdPolicy::Ascending { green: 2.0, amber: 0.0 }),
];

fn narrow(candidates: &'static [&'static str]) -> SourceSpec {
    SourceSpec::Live(LiveSource {
        candidates,
        format: FormatHint::Csv,
        extraction: Extraction::NarrowSeries,
        derive: None,
        timeout: Duration::from_secs(30),
        min_bytes: 0,
        period_hint: None,
    })
}

pub(super) fn specs() -> Vec<MetricSpec> {
    vec![
        MetricSpec {
            key: "real_gdp_growth",
            name: "Real GDP Growth",
            category: Category::Economy,
            unit: "%",
            source: narrow(&[
                "https://www.ons.gov.uk/generator?format=csv&uri=/economy/grossdomesticproductgdp/timeseries/ihyp/qna",
            ]),
            data_source: "ONS",
            source_url: "https://www.ons.gov.uk/generator?format=csv&uri=/economy/grossdomesticproductgdp/timeseries/ihyp/qna",
            fallback: None,
        },
        MetricSpec {
            key: "cpi_inflation",
            name: "CPI Inflation",
            category: Category::Economy,
            unit: "%",
            source: narrow(&[
                "https://www.ons.gov.uk/generator?format=csv&uri=/economy/inflationandpriceindices/timeseries/d7g7/mm23",
            ]),
            data_source: "ONS",
            source_url: "https://www.ons.gov.uk/generator?format=csv&uri=/economy/inflationandpriceindices/timeseries/d7g7/mm23",
            fallback: None,
        },
        MetricSpec {
            key: "output_per_hour",
            name: "Output per Hour",
            category: Category::Economy,
            unit: "%",
            // The generator serves LZVD annually only; the full PRDY dataset
            // CSV carries the quarterly rows.
            source: SourceSpec::Live(LiveSource {
                candidates: &[
                    "https://www.ons.gov.uk/file?uri=/employmentandlabourmarket/peopleinwork/labourproductivity/datasets/labourproductivity/current/prdy.csv",
                ],
                format: FormatHint::Csv,
                extraction: Extraction::WideSeries { series_code: "LZVD" },
                derive: None,
                timeout: Duration::from_secs(45),
                min_bytes: 0,
                period_hint: None,
            }),
            data_source: "ONS",
            source_url: "https://www.ons.gov.uk/generator?format=csv&uri=/employmentandlabourmarket/peopleinwork/labourproductivity/timeseries/lzvd/prdy",
            fallback: None,
        },
        MetricSpec {
            key: "public_sector_net_debt",
            name: "Public Sector Net Debt",
            category: Category::Economy,
            unit: "%",
            source: narrow(&[
                "https://www.ons.gov.uk/generator?format=csv&uri=/economy/governmentpublicsectorandtaxes/publicsectorfinance/timeseries/hf6x/pusf",
            ]),
            data_source: "ONS",
            source_url: "https://www.ons.gov.uk/generator?format=csv&uri=/economy/governmentpublicsectorandtaxes/publicsectorfinance/timeseries/hf6x/pusf",
            fallback: None,
        },
        MetricSpec {
            key: "business_investment",
            name: "Business Investment",
            category: Category::Economy,
            unit: "%",
            // NPEL is a level in GBP millions; published as YoY % change.
            source: SourceSpec::Live(LiveSource {
                candidates: &[
                    "https://www.ons.gov.uk/file?uri=/economy/grossdomesticproductgdp/datasets/businessinvestment/current/cxnv.csv",
                ],
                format: FormatHint::Csv,
                extraction: Extraction::WideSeries { series_code: "NPEL" },
                derive: Some(Derivation::YoyPctChange),
                timeout: Duration::from_secs(45),
                min_bytes: 0,
                period_hint: None,
            }),
            data_source: "ONS",
            source_url: "https://www.ons.gov.uk/generator?format=csv&uri=/economy/grossdomesticproductgdp/timeseries/npel/cxnv",
            fallback: None,
        },
    ]
}
