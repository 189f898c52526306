//! Time-series extraction for the two layouts ONS publishes: narrow
//! `period,value` CSVs behind a metadata preamble, and wide datasets with a
//! series-code (CDID) header row and one column per series.

use serde::Serialize;
use tracing::debug;

use crate::tabular::Grid;

/// One observation of a metric. Periods are `"2024"` or `"2024 Q3"` shaped
/// labels; within one series all points share the same shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub period: String,
    pub value: f64,
}

/// Ordered-by-period sequence of points with unique periods. The contract
/// callers rely on: the latest point is the last element.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Series {
    points: Vec<SeriesPoint>,
}

impl Series {
    pub fn from_points(points: Vec<SeriesPoint>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[SeriesPoint] {
        &self.points
    }

    pub fn latest(&self) -> Option<&SeriesPoint> {
        self.points.last()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Whether a first field marks the start of data rows: a bare year, a
/// year-quarter, a date-like dash, or a `YYYY MMM` month label.
fn looks_like_period(field: &str) -> bool {
    let trimmed = field.trim();
    if trimmed.is_empty() {
        return false;
    }
    if trimmed.chars().all(|c| c.is_ascii_digit()) {
        return true;
    }
    if trimmed.contains(" Q") || trimmed.contains('-') {
        return true;
    }
    let mut parts = trimmed.split_whitespace();
    matches!(parts.next(), Some(year) if year.len() == 4 && year.chars().all(|c| c.is_ascii_digit()))
}

/// Narrow layout: scan rows top-down until one starts with a period label;
/// that row and everything after it are `(period, value)` pairs. Rows whose
/// value fails numeric parse are skipped, not fatal. An empty result is a
/// reportable failure for the caller, not an error here.
pub fn extract_narrow_series(grid: &Grid) -> Series {
    let rows = grid.rows();
    let Some(data_start) = rows.iter().position(|row| {
        row.first()
            .and_then(|cell| cell.label())
            .is_some_and(|label| looks_like_period(&label))
    }) else {
        return Series::default();
    };

    let mut points = Vec::new();
    for row in &rows[data_start..] {
        let Some(period) = row.first().and_then(|cell| cell.label()) else {
            continue;
        };
        let Some(value) = row.get(1).and_then(|cell| cell.as_number()) else {
            continue;
        };
        points.push(SeriesPoint { period, value });
    }
    debug!(points = points.len(), data_start, "narrow series extracted");
    Series::from_points(points)
}

/// Wide layout: the second row is the header carrying series codes; find the
/// requested code's column, then take every later row whose first field is a
/// quarterly period label.
pub fn extract_wide_series(grid: &Grid, series_code: &str) -> Series {
    let rows = grid.rows();
    let Some(header) = rows.get(1) else {
        return Series::default();
    };
    let Some(column) = header.iter().position(|cell| {
        cell.as_text()
            .is_some_and(|text| text.trim().eq_ignore_ascii_case(series_code))
    }) else {
        debug!(series_code, "series code not found in header row");
        return Series::default();
    };

    let mut points = Vec::new();
    for row in &rows[2..] {
        let Some(period) = row.first().and_then(|cell| cell.label()) else {
            continue;
        };
        if !period.contains(" Q") {
            continue;
        }
        let Some(value) = row.get(column).and_then(|cell| cell.as_number()) else {
            continue;
        };
        points.push(SeriesPoint { period, value });
    }
    debug!(points = points.len(), series_code, column, "wide series extracted");
    Series::from_points(points)
}
