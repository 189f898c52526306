//! Cell-pattern matcher: locates a single metric value inside a grid by row
//! keyword matching plus a plausibility value-range guard.
//!
//! The range guard is the only defence against false positives in tables with
//! no structural schema. It is deliberately heuristic: values outside the
//! historically observed band are rejected even if genuine.

use std::ops::Range;

use tracing::debug;

use crate::tabular::{Grid, Workbook};

/// Content pattern describing where a metric value plausibly lives.
#[derive(Debug, Clone)]
pub struct ScalarPattern {
    /// A row matches when ALL keywords of ANY one set appear in its
    /// case-folded text (e.g. `["england"]` or `["total", "crime"]`).
    pub keyword_sets: &'static [&'static [&'static str]],
    /// Inclusive plausibility bounds; the first in-range numeric cell on a
    /// matching row wins.
    pub value_range: (f64, f64),
    /// Optional restriction of the cell scan to a column range.
    pub scan_columns: Option<Range<usize>>,
    /// Sheet-name fragments that mark the sheet worth trying first.
    pub sheet_hints: &'static [&'static str],
}

impl ScalarPattern {
    fn row_matches(&self, row_text: &str) -> bool {
        self.keyword_sets
            .iter()
            .any(|set| set.iter().all(|keyword| row_text.contains(keyword)))
    }

    fn in_range(&self, value: f64) -> bool {
        let (min, max) = self.value_range;
        value >= min && value <= max
    }
}

/// Scan grid rows top-down for the first cell satisfying both the keyword
/// and range constraints. First match wins; `None` when nothing qualifies.
pub fn find_scalar(grid: &Grid, pattern: &ScalarPattern) -> Option<f64> {
    for (index, row) in grid.rows().iter().enumerate() {
        let row_text = grid.row_text(index);
        if row_text.is_empty() || !pattern.row_matches(&row_text) {
            continue;
        }

        let columns = match &pattern.scan_columns {
            Some(range) => range.clone(),
            None => 0..row.len(),
        };
        for column in columns {
            let Some(value) = row.get(column).and_then(|cell| cell.as_number()) else {
                continue;
            };
            if pattern.in_range(value) {
                debug!(row = index, column, value, "scalar match");
                return Some(value);
            }
        }
    }
    None
}

/// Apply the pattern across a workbook: the hinted sheet first, then every
/// other sheet in order, mirroring how the publications bury summary tables
/// in unpredictable sheets.
pub fn find_in_workbook(workbook: &Workbook, pattern: &ScalarPattern) -> Option<f64> {
    let mut tried = None;
    if let Some((name, grid)) = workbook.by_hint_entry(pattern.sheet_hints) {
        if let Some(value) = find_scalar(grid, pattern) {
            return Some(value);
        }
        tried = Some(name);
    }
    workbook
        .iter()
        .filter(|(name, _)| Some(*name) != tried)
        .find_map(|(_, grid)| find_scalar(grid, pattern))
}
