//! Level-to-growth derivation: year-over-year percentage change with
//! same-period-prior-year alignment.

use std::collections::BTreeMap;

use super::{Series, SeriesPoint};

/// Convert a level series into year-over-year percentage change. Each period
/// is aligned with the same period one year earlier (`"2024 Q3"` against
/// `"2023 Q3"`, `"2024"` against `"2023"`). Periods without a resolvable
/// prior point, or with a zero prior, are dropped; the first year of any
/// series structurally has no prior. Returns a new series sorted ascending.
pub fn to_yoy_pct_change(levels: &Series) -> Series {
    let mut by_period: BTreeMap<String, f64> = BTreeMap::new();
    for point in levels.points() {
        by_period.insert(point.period.trim().to_string(), point.value);
    }

    let mut points = Vec::new();
    for (period, value) in &by_period {
        let Some(prior_key) = prior_period(period) else {
            continue;
        };
        let Some(prior) = by_period.get(&prior_key) else {
            continue;
        };
        if *prior == 0.0 {
            continue;
        }
        let pct = (value - prior) / prior * 100.0;
        points.push(SeriesPoint {
            period: period.clone(),
            value: round2(pct),
        });
    }
    Series::from_points(points)
}

/// Same-period key one year earlier, or `None` for unrecognized shapes.
fn prior_period(period: &str) -> Option<String> {
    if let Some((year, quarter)) = period.split_once(" Q") {
        let year: i32 = year.trim().parse().ok()?;
        let quarter: u8 = quarter.trim().parse().ok()?;
        return Some(format!("{} Q{}", year - 1, quarter));
    }
    if period.chars().all(|c| c.is_ascii_digit()) {
        let year: i32 = period.parse().ok()?;
        return Some((year - 1).to_string());
    }
    None
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
