//! Sheet-aware 2-D cell grids loaded from raw publication bytes.

mod loader;

pub use loader::{load, FormatHint, LoadError};

/// A single spreadsheet cell after loading.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Number(f64),
    Text(String),
    Empty,
}

impl Cell {
    pub fn text(value: impl Into<String>) -> Self {
        let value = value.into();
        if value.trim().is_empty() {
            Cell::Empty
        } else {
            Cell::Text(value)
        }
    }

    /// Numeric view of the cell. Text is parsed leniently: `%` signs and
    /// thousands separators are stripped first, matching how the upstream
    /// publications format figures.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(value) => Some(*value),
            Cell::Text(raw) => parse_loose_number(raw),
            Cell::Empty => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(raw) => Some(raw.as_str()),
            _ => None,
        }
    }

    /// String form suitable for a period label. Whole numbers render without
    /// a fractional part so a year cell loaded as `2024.0` becomes `"2024"`.
    pub fn label(&self) -> Option<String> {
        match self {
            Cell::Text(raw) => {
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            }
            Cell::Number(value) if value.fract() == 0.0 => Some(format!("{}", *value as i64)),
            Cell::Number(value) => Some(value.to_string()),
            Cell::Empty => None,
        }
    }
}

pub(crate) fn parse_loose_number(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| *c != '%' && *c != ',')
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Read-only grid of cells. Row and column indices are stable for the
/// lifetime of one extraction pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Grid {
    rows: Vec<Vec<Cell>>,
}

impl Grid {
    pub fn from_rows(rows: Vec<Vec<Cell>>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Case-folded concatenation of the non-empty cell text in one row, used
    /// for keyword matching against row content.
    pub fn row_text(&self, index: usize) -> String {
        let Some(row) = self.rows.get(index) else {
            return String::new();
        };
        let mut text = String::new();
        for cell in row {
            let fragment = match cell {
                Cell::Text(raw) => raw.trim().to_string(),
                Cell::Number(value) => value.to_string(),
                Cell::Empty => continue,
            };
            if fragment.is_empty() {
                continue;
            }
            if !text.is_empty() {
                text.push(' ');
            }
            text.push_str(&fragment);
        }
        text.to_lowercase()
    }
}

/// Ordered mapping of sheet names to grids for one loaded publication.
#[derive(Debug, Clone, Default)]
pub struct Workbook {
    sheets: Vec<(String, Grid)>,
}

impl Workbook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: impl Into<String>, grid: Grid) {
        self.sheets.push((name.into(), grid));
    }

    pub fn len(&self) -> usize {
        self.sheets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }

    pub fn first(&self) -> Option<&Grid> {
        self.sheets.first().map(|(_, grid)| grid)
    }

    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Grid)> {
        self.sheets.iter().map(|(name, grid)| (name.as_str(), grid))
    }

    /// Prefer a sheet whose name contains one of the hints (case-insensitive);
    /// fall back to the first sheet when nothing matches.
    pub fn by_hint(&self, hints: &[&str]) -> Option<&Grid> {
        self.by_hint_entry(hints).map(|(_, grid)| grid)
    }

    /// Like `by_hint`, but also yields the chosen sheet's name so callers can
    /// avoid rescanning it.
    pub fn by_hint_entry(&self, hints: &[&str]) -> Option<(&str, &Grid)> {
        for (name, grid) in &self.sheets {
            let upper = name.to_uppercase();
            if hints.iter().any(|hint| upper.contains(&hint.to_uppercase())) {
                return Some((name.as_str(), grid));
            }
        }
        self.sheets
            .first()
            .map(|(name, grid)| (name.as_str(), grid))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_grid() -> Grid {
        Grid::from_rows(vec![
            vec![Cell::text("England"), Cell::text("Total crime"), Cell::text("89.5")],
            vec![Cell::Empty, Cell::Number(12.0), Cell::Empty],
        ])
    }

    #[test]
    fn loose_number_parse_strips_percent_and_commas() {
        assert_eq!(parse_loose_number("74,651"), Some(74651.0));
        assert_eq!(parse_loose_number(" 7.2% "), Some(7.2));
        assert_eq!(parse_loose_number("n/a"), None);
        assert_eq!(parse_loose_number(""), None);
    }

    #[test]
    fn cell_as_number_handles_text_and_numbers() {
        assert_eq!(Cell::text("89.5").as_number(), Some(89.5));
        assert_eq!(Cell::Number(3.5).as_number(), Some(3.5));
        assert_eq!(Cell::Empty.as_number(), None);
        assert_eq!(Cell::text("England").as_number(), None);
    }

    #[test]
    fn cell_label_renders_whole_years_without_fraction() {
        assert_eq!(Cell::Number(2024.0).label().as_deref(), Some("2024"));
        assert_eq!(Cell::text(" 2024 Q3 ").label().as_deref(), Some("2024 Q3"));
        assert_eq!(Cell::Empty.label(), None);
    }

    #[test]
    fn row_text_concatenates_and_case_folds() {
        let grid = sample_grid();
        assert_eq!(grid.row_text(0), "england total crime 89.5");
        assert_eq!(grid.row_text(1), "12");
        assert_eq!(grid.row_text(9), "");
    }

    #[test]
    fn workbook_hint_prefers_matching_sheet_then_first() {
        let mut workbook = Workbook::new();
        workbook.push("Notes", Grid::default());
        workbook.push("Table P1", sample_grid());

        let hinted = workbook.by_hint(&["P1"]).expect("sheet");
        assert!(!hinted.is_empty());

        let fallback = workbook.by_hint(&["missing"]).expect("first sheet");
        assert!(fallback.is_empty());
    }
}
