//! Heuristic extraction of metric values and time series from cell grids.

mod scalar;
mod series;
mod yoy;

pub use scalar::{find_in_workbook, find_scalar, ScalarPattern};
pub use series::{extract_narrow_series, extract_wide_series, Series, SeriesPoint};
pub use yoy::to_yoy_pct_change;
