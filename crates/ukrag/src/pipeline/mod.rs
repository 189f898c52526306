//! Configuration-driven extraction pipeline.
//!
//! One `MetricSpec` describes everything a metric needs: a prioritized
//! candidate-URL list, the payload format, the matcher or series-extractor
//! configuration, an optional level-to-growth derivation, and the fallback
//! headline. `run_metric` executes the flow raw bytes -> grid -> value(s) ->
//! classification -> record; `run_specs` iterates a batch with per-metric
//! failure isolation.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::config::HttpConfig;
use crate::extract::{self, ScalarPattern, Series};
use crate::fetch::Fetcher;
use crate::record::{
    current_quarter_label, Category, Fallback, MetricRecord, MetricValue, Provenance,
};
use crate::status::{PolicyRegistry, RagStatus};
use crate::tabular::{self, FormatHint, Workbook};

/// How to pull the metric out of a loaded workbook.
#[derive(Debug, Clone)]
pub enum Extraction {
    /// Heuristic single-value match (keyword sets + plausibility range).
    Scalar(ScalarPattern),
    /// ONS-style two-column `period,value` layout behind a preamble.
    NarrowSeries,
    /// Wide column-per-series layout addressed by CDID code.
    WideSeries { series_code: &'static str },
}

/// Post-extraction transform applied to a level series.
#[derive(Debug, Clone, Copy)]
pub enum Derivation {
    YoyPctChange,
}

/// A live upstream endpoint (or several near-identical candidates for it).
#[derive(Debug, Clone)]
pub struct LiveSource {
    /// Prioritized candidate URLs, evaluated lazily and short-circuited at
    /// the first one that yields usable data.
    pub candidates: &'static [&'static str],
    pub format: FormatHint,
    pub extraction: Extraction,
    pub derive: Option<Derivation>,
    pub timeout: Duration,
    /// Responses smaller than this are treated as a miss (error pages from
    /// guessed monthly URLs tend to be tiny).
    pub min_bytes: usize,
    /// Static period label for scalar extractions; `None` means "current
    /// quarter".
    pub period_hint: Option<&'static str>,
}

/// Where the metric's value comes from.
#[derive(Debug, Clone)]
pub enum SourceSpec {
    Live(LiveSource),
    /// Statically published headline; no machine-readable endpoint exists.
    /// A `None` period means "current quarter".
    Published {
        value: f64,
        time_period: Option<&'static str>,
    },
    /// Explicitly not wired to any source yet; emits the sentinel with amber
    /// status unconditionally.
    Placeholder,
}

/// Full configuration for one metric's pipeline run.
#[derive(Debug, Clone)]
pub struct MetricSpec {
    pub key: &'static str,
    pub name: &'static str,
    pub category: Category,
    pub unit: &'static str,
    pub source: SourceSpec,
    pub data_source: &'static str,
    pub source_url: &'static str,
    pub fallback: Option<Fallback>,
}

enum LiveOutcome {
    Scalar(f64),
    Series(Series),
}

/// Run one metric to completion. Always returns records rather than erroring:
/// extraction failure degrades to the configured fallback, or to omission
/// (an empty vec) when none exists.
pub fn run_metric(
    spec: &MetricSpec,
    fetcher: &dyn Fetcher,
    registry: &PolicyRegistry,
    http: &HttpConfig,
    historical: bool,
) -> Vec<MetricRecord> {
    let now = Utc::now();
    match &spec.source {
        SourceSpec::Placeholder => vec![placeholder_record(spec, now)],
        SourceSpec::Published { value, time_period } => {
            let period = time_period
                .map(str::to_string)
                .unwrap_or_else(|| current_quarter_label(now));
            vec![build_record(
                spec,
                *value,
                period,
                Provenance::Fallback,
                spec.data_source.to_string(),
                registry,
                now,
            )]
        }
        SourceSpec::Live(source) => match extract_live(spec, source, fetcher, http) {
            Some(LiveOutcome::Scalar(value)) => {
                let period = source
                    .period_hint
                    .map(str::to_string)
                    .unwrap_or_else(|| current_quarter_label(now));
                vec![build_record(
                    spec,
                    value,
                    period,
                    Provenance::Live,
                    spec.data_source.to_string(),
                    registry,
                    now,
                )]
            }
            Some(LiveOutcome::Series(series)) => series_records(spec, &series, registry, now, historical),
            None => fallback_records(spec, registry, now),
        },
    }
}

/// Run a batch of metrics with partial-failure isolation: one metric's
/// failure (even a panic) never suppresses its siblings' records.
pub fn run_specs(
    specs: &[MetricSpec],
    fetcher: &dyn Fetcher,
    registry: &PolicyRegistry,
    http: &HttpConfig,
    historical: bool,
) -> Vec<MetricRecord> {
    let mut records = Vec::new();
    for spec in specs {
        let outcome = catch_unwind(AssertUnwindSafe(|| {
            run_metric(spec, fetcher, registry, http, historical)
        }));
        match outcome {
            Ok(batch) => records.extend(batch),
            Err(_) => {
                warn!(metric = spec.key, "metric pipeline panicked; continuing with remaining metrics")
            }
        }
    }
    records
}

fn extract_live(
    spec: &MetricSpec,
    source: &LiveSource,
    fetcher: &dyn Fetcher,
    http: &HttpConfig,
) -> Option<LiveOutcome> {
    let timeout = http.effective_timeout(source.timeout);
    for url in source.candidates {
        let bytes = match fetcher.fetch(url, timeout) {
            Ok(bytes) => bytes,
            Err(err) => {
                warn!(metric = spec.key, url, error = %err, "fetch failed, trying next candidate");
                continue;
            }
        };
        if bytes.len() < source.min_bytes {
            warn!(
                metric = spec.key,
                url,
                bytes = bytes.len(),
                "response too small to be a publication, trying next candidate"
            );
            continue;
        }

        let workbook = match tabular::load(&bytes, source.format) {
            Ok(workbook) => workbook,
            Err(err) => {
                warn!(metric = spec.key, url, error = %err, "load failed, trying next candidate");
                continue;
            }
        };

        match &source.extraction {
            Extraction::Scalar(pattern) => {
                if let Some(value) = extract::find_in_workbook(&workbook, pattern) {
                    info!(metric = spec.key, url, value, "extracted scalar value");
                    return Some(LiveOutcome::Scalar(value));
                }
            }
            Extraction::NarrowSeries => {
                if let Some(series) = workbook_series(&workbook, source, |grid| {
                    extract::extract_narrow_series(grid)
                }) {
                    info!(metric = spec.key, url, points = series.len(), "extracted series");
                    return Some(LiveOutcome::Series(series));
                }
            }
            Extraction::WideSeries { series_code } => {
                if let Some(series) = workbook_series(&workbook, source, |grid| {
                    extract::extract_wide_series(grid, series_code)
                }) {
                    info!(metric = spec.key, url, points = series.len(), "extracted series");
                    return Some(LiveOutcome::Series(series));
                }
            }
        }
        warn!(metric = spec.key, url, "no qualifying data in payload, trying next candidate");
    }
    None
}

/// First sheet that yields a non-empty series, with the derivation applied.
/// A level series that derives to nothing still counts as a miss.
fn workbook_series(
    workbook: &Workbook,
    source: &LiveSource,
    extract_one: impl Fn(&tabular::Grid) -> Series,
) -> Option<Series> {
    for (_, grid) in workbook.iter() {
        let series = extract_one(grid);
        if series.is_empty() {
            continue;
        }
        let series = match source.derive {
            Some(Derivation::YoyPctChange) => extract::to_yoy_pct_change(&series),
            None => series,
        };
        if !series.is_empty() {
            return Some(series);
        }
    }
    None
}

fn series_records(
    spec: &MetricSpec,
    series: &Series,
    registry: &PolicyRegistry,
    now: DateTime<Utc>,
    historical: bool,
) -> Vec<MetricRecord> {
    let points: Vec<_> = if historical {
        series.points().iter().collect()
    } else {
        series.latest().into_iter().collect()
    };
    points
        .into_iter()
        .map(|point| {
            build_record(
                spec,
                point.value,
                point.period.clone(),
                Provenance::Live,
                spec.data_source.to_string(),
                registry,
                now,
            )
        })
        .collect()
}

fn fallback_records(
    spec: &MetricSpec,
    registry: &PolicyRegistry,
    now: DateTime<Utc>,
) -> Vec<MetricRecord> {
    match spec.fallback {
        Some(fallback) => {
            let period = fallback
                .time_period
                .map(str::to_string)
                .unwrap_or_else(|| current_quarter_label(now));
            warn!(
                metric = spec.key,
                value = fallback.value,
                "extraction failed, substituting published headline"
            );
            vec![build_record(
                spec,
                fallback.value,
                period,
                Provenance::Fallback,
                format!("{} (published estimate)", spec.data_source),
                registry,
                now,
            )]
        }
        None => {
            warn!(metric = spec.key, "extraction failed and no fallback configured, omitting metric");
            Vec::new()
        }
    }
}

fn build_record(
    spec: &MetricSpec,
    value: f64,
    time_period: String,
    provenance: Provenance,
    data_source: String,
    registry: &PolicyRegistry,
    now: DateTime<Utc>,
) -> MetricRecord {
    MetricRecord {
        metric_name: spec.name,
        metric_key: spec.key,
        category: spec.category,
        value: MetricValue::Number(value),
        unit: spec.unit,
        rag_status: registry.classify(spec.key, value),
        time_period,
        data_source,
        source_url: spec.source_url,
        provenance,
        last_updated: now,
    }
}

fn placeholder_record(spec: &MetricSpec, now: DateTime<Utc>) -> MetricRecord {
    MetricRecord {
        metric_name: spec.name,
        metric_key: spec.key,
        category: spec.category,
        value: MetricValue::PLACEHOLDER,
        unit: spec.unit,
        rag_status: RagStatus::Amber,
        time_period: current_quarter_label(now),
        data_source: "Placeholder".to_string(),
        source_url: spec.source_url,
        provenance: Provenance::Placeholder,
        last_updated: now,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::FetchError;
    use crate::status::ThresholdPolicy;
    use std::cell::RefCell;
    use std::collections::HashMap;

    struct StubFetcher {
        responses: HashMap<&'static str, Vec<u8>>,
        calls: RefCell<Vec<String>>,
    }

    impl StubFetcher {
        fn new(responses: &[(&'static str, &[u8])]) -> Self {
            Self {
                responses: responses
                    .iter()
                    .map(|(url, bytes)| (*url, bytes.to_vec()))
                    .collect(),
                calls: RefCell::new(Vec::new()),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.borrow().len()
        }
    }

    impl Fetcher for StubFetcher {
        fn fetch(&self, url: &str, _timeout: Duration) -> Result<Vec<u8>, FetchError> {
            self.calls.borrow_mut().push(url.to_string());
            self.responses
                .get(url)
                .cloned()
                .ok_or_else(|| FetchError::Status {
                    url: url.to_string(),
                    status: 404,
                })
        }
    }

    fn http() -> HttpConfig {
        HttpConfig {
            user_agent: "test".to_string(),
            timeout_cap: None,
        }
    }

    fn registry() -> PolicyRegistry {
        PolicyRegistry::from_entries(&[
            ("charge_rate", ThresholdPolicy::Ascending { green: 10.0, amber: 7.0 }),
            ("business_investment", ThresholdPolicy::Ascending { green: 2.0, amber: 0.0 }),
        ])
    }

    fn charge_rate_spec(candidates: &'static [&'static str]) -> MetricSpec {
        MetricSpec {
            key: "charge_rate",
            name: "Charge Rate",
            category: Category::Crime,
            unit: "%",
            source: SourceSpec::Live(LiveSource {
                candidates,
                format: FormatHint::Csv,
                extraction: Extraction::Scalar(ScalarPattern {
                    keyword_sets: &[&["charge"]],
                    value_range: (5.0, 25.0),
                    scan_columns: None,
                    sheet_hints: &[],
                }),
                derive: None,
                timeout: Duration::from_secs(30),
                min_bytes: 0,
                period_hint: Some("2025 Q2"),
            }),
            data_source: "Gov.uk: Crime Outcomes",
            source_url: "https://example.test/outcomes",
            fallback: Some(Fallback {
                value: 7.2,
                time_period: Some("2025 Q2"),
            }),
        }
    }

    #[test]
    fn live_scalar_extraction_yields_a_live_record() {
        let fetcher = StubFetcher::new(&[("https://a", b"area,charge rate\nEngland charge,9.1\n")]);
        let spec = charge_rate_spec(&["https://a"]);

        let records = run_metric(&spec, &fetcher, &registry(), &http(), false);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].value, MetricValue::Number(9.1));
        assert_eq!(records[0].rag_status, RagStatus::Amber);
        assert_eq!(records[0].provenance, Provenance::Live);
        assert_eq!(records[0].data_source, "Gov.uk: Crime Outcomes");
        assert_eq!(records[0].time_period, "2025 Q2");
    }

    #[test]
    fn failed_extraction_substitutes_a_distinguishable_fallback() {
        let fetcher = StubFetcher::new(&[]);
        let spec = charge_rate_spec(&["https://down"]);

        let records = run_metric(&spec, &fetcher, &registry(), &http(), false);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].value, MetricValue::Number(7.2));
        assert_eq!(records[0].provenance, Provenance::Fallback);
        assert_ne!(records[0].data_source, spec.data_source);
        assert!(records[0].data_source.starts_with(spec.data_source));
    }

    #[test]
    fn no_fallback_means_the_metric_is_omitted_not_nulled() {
        let fetcher = StubFetcher::new(&[]);
        let mut spec = charge_rate_spec(&["https://down"]);
        spec.fallback = None;

        assert!(run_metric(&spec, &fetcher, &registry(), &http(), false).is_empty());
    }

    #[test]
    fn candidate_list_short_circuits_at_first_success() {
        let fetcher = StubFetcher::new(&[
            ("https://first", b"area,charge rate\nEngland charge,8.0\n" as &[u8]),
            ("https://second", b"area,charge rate\nEngland charge,9.0\n" as &[u8]),
        ]);
        let spec = charge_rate_spec(&["https://first", "https://second"]);

        let records = run_metric(&spec, &fetcher, &registry(), &http(), false);
        assert_eq!(records[0].value, MetricValue::Number(8.0));
        assert_eq!(fetcher.call_count(), 1);
    }

    #[test]
    fn unusable_candidates_are_skipped_until_one_succeeds() {
        let fetcher = StubFetcher::new(&[
            ("https://tiny", b"x" as &[u8]),
            ("https://good", b"area,charge rate\nEngland charge,9.0\n" as &[u8]),
        ]);
        let mut spec = charge_rate_spec(&["https://missing", "https://tiny", "https://good"]);
        if let SourceSpec::Live(source) = &mut spec.source {
            source.min_bytes = 10;
        }

        let records = run_metric(&spec, &fetcher, &registry(), &http(), false);
        assert_eq!(records[0].value, MetricValue::Number(9.0));
        assert_eq!(fetcher.call_count(), 3);
    }

    #[test]
    fn placeholder_metrics_emit_the_sentinel_with_amber_status() {
        let fetcher = StubFetcher::new(&[]);
        let spec = MetricSpec {
            key: "gp_appt_access",
            name: "GP Appt. Access",
            category: Category::Healthcare,
            unit: "%",
            source: SourceSpec::Placeholder,
            data_source: "NHS Digital",
            source_url: "",
            fallback: None,
        };

        let records = run_metric(&spec, &fetcher, &registry(), &http(), false);
        assert_eq!(records[0].value, MetricValue::PLACEHOLDER);
        assert_eq!(records[0].rag_status, RagStatus::Amber);
        assert_eq!(records[0].provenance, Provenance::Placeholder);
        assert_eq!(records[0].data_source, "Placeholder");
        assert_eq!(fetcher.call_count(), 0);
    }

    #[test]
    fn published_headline_is_classified_like_any_value() {
        let fetcher = StubFetcher::new(&[]);
        let spec = MetricSpec {
            key: "charge_rate",
            name: "Charge Rate",
            category: Category::Crime,
            unit: "%",
            source: SourceSpec::Published {
                value: 11.0,
                time_period: Some("2024"),
            },
            data_source: "Gov.uk: Crime Outcomes",
            source_url: "",
            fallback: None,
        };

        let records = run_metric(&spec, &fetcher, &registry(), &http(), false);
        assert_eq!(records[0].rag_status, RagStatus::Green);
        assert_eq!(records[0].provenance, Provenance::Fallback);
        assert_eq!(records[0].time_period, "2024");
    }

    fn investment_csv() -> &'static [u8] {
        b"\"Title\",\"Business investment\"\n\"CDID\",\"NPEL\"\n\"2023 Q1\",\"100\"\n\"2024 Q1\",\"104\"\n"
    }

    fn investment_spec() -> MetricSpec {
        MetricSpec {
            key: "business_investment",
            name: "Business Investment",
            category: Category::Economy,
            unit: "%",
            source: SourceSpec::Live(LiveSource {
                candidates: &["https://cxnv"],
                format: FormatHint::Csv,
                extraction: Extraction::WideSeries { series_code: "NPEL" },
                derive: Some(Derivation::YoyPctChange),
                timeout: Duration::from_secs(60),
                min_bytes: 0,
                period_hint: None,
            }),
            data_source: "ONS",
            source_url: "https://example.test/npel",
            fallback: None,
        }
    }

    #[test]
    fn level_series_is_derived_to_growth_before_classification() {
        let fetcher = StubFetcher::new(&[("https://cxnv", investment_csv())]);
        let records = run_metric(&investment_spec(), &fetcher, &registry(), &http(), false);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].time_period, "2024 Q1");
        assert_eq!(records[0].value, MetricValue::Number(4.0));
        assert_eq!(records[0].rag_status, RagStatus::Green);
    }

    #[test]
    fn historical_mode_yields_one_record_per_period() {
        let csv = b"\"meta\",\"x\"\n\"2024\",\"1.2\"\n\"2025\",\"1.9\"\n";
        let fetcher = StubFetcher::new(&[("https://series", csv)]);
        let mut spec = investment_spec();
        spec.source = SourceSpec::Live(LiveSource {
            candidates: &["https://series"],
            format: FormatHint::Csv,
            extraction: Extraction::NarrowSeries,
            derive: None,
            timeout: Duration::from_secs(30),
            min_bytes: 0,
            period_hint: None,
        });

        let latest = run_metric(&spec, &fetcher, &registry(), &http(), false);
        assert_eq!(latest.len(), 1);
        assert_eq!(latest[0].time_period, "2025");

        let all = run_metric(&spec, &fetcher, &registry(), &http(), true);
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].time_period, "2024");
        assert_eq!(all[1].time_period, "2025");
    }

    struct PanickyFetcher;

    impl Fetcher for PanickyFetcher {
        fn fetch(&self, url: &str, _timeout: Duration) -> Result<Vec<u8>, FetchError> {
            if url.contains("poison") {
                panic!("unexpected fetcher failure");
            }
            Ok(b"area,charge rate\nEngland charge,9.1\n".to_vec())
        }
    }

    #[test]
    fn one_panicking_metric_never_suppresses_its_siblings() {
        let poisoned = charge_rate_spec(&["https://poison"]);
        let healthy = charge_rate_spec(&["https://fine"]);

        let records = run_specs(
            &[poisoned, healthy],
            &PanickyFetcher,
            &registry(),
            &http(),
            false,
        );
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].value, MetricValue::Number(9.1));
        assert_eq!(records[0].provenance, Provenance::Live);
    }
}
