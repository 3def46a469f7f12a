//! In-process [`SheetStore`] for tests and offline runs.

use std::collections::HashMap;
use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::sheet::{Rows, SheetStore};

static A1_RANGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:'(?P<quoted>[^']+)'|(?P<plain>[^!]+))!(?P<c1>[A-Z]+)(?P<r1>\d*)(?::(?P<c2>[A-Z]+)(?P<r2>\d*))?$")
        .expect("valid A1 range regex")
});

/// A parsed A1 range. Rows and columns are 0-based; `None` ends are open.
#[derive(Debug, Clone, PartialEq, Eq)]
struct A1Range {
    sheet: String,
    first_col: usize,
    last_col: usize,
    first_row: usize,
    last_row: Option<usize>,
}

impl A1Range {
    fn parse(range: &str) -> Result<Self, StoreError> {
        let invalid = |reason: &str| StoreError::InvalidRange {
            range: range.to_string(),
            reason: reason.to_string(),
        };
        let caps = A1_RANGE
            .captures(range)
            .ok_or_else(|| invalid("expected sheet!A1:B2 notation"))?;

        let sheet = caps
            .name("quoted")
            .or_else(|| caps.name("plain"))
            .map(|m| m.as_str().to_string())
            .ok_or_else(|| invalid("missing sheet name"))?;
        let first_col = column_index(&caps["c1"]);
        let last_col = caps.name("c2").map_or(first_col, |m| column_index(m.as_str()));
        let first_row = parse_row(caps.name("r1").map_or("", |m| m.as_str())).unwrap_or(0);
        let last_row = match caps.name("r2") {
            Some(m) => parse_row(m.as_str()),
            // Single-cell reference such as `sheet!B3`.
            None if caps.name("c2").is_none() => parse_row(&caps["r1"]),
            None => None,
        };

        if last_col < first_col || last_row.is_some_and(|last| last < first_row) {
            return Err(invalid("range end precedes range start"));
        }

        Ok(Self {
            sheet,
            first_col,
            last_col,
            first_row,
            last_row,
        })
    }

    fn width(&self) -> usize {
        self.last_col - self.first_col + 1
    }
}

/// `A` → 0, `Z` → 25, `AA` → 26.
fn column_index(letters: &str) -> usize {
    letters
        .bytes()
        .fold(0, |acc, b| acc * 26 + usize::from(b - b'A' + 1))
        - 1
}

/// 1-based row label to 0-based index. Empty or `0` means unbounded.
fn parse_row(digits: &str) -> Option<usize> {
    digits.parse::<usize>().ok().filter(|n| *n > 0).map(|n| n - 1)
}

fn is_blank(row: &[String]) -> bool {
    row.iter().all(String::is_empty)
}

/// Stores each sheet as a dense grid of strings.
///
/// Reads trim trailing empty cells and rows the way the Sheets API does.
#[derive(Debug, Default)]
pub struct MemorySheetStore {
    sheets: RwLock<HashMap<String, Rows>>,
}

impl MemorySheetStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts with `rows` in `sheet`, beginning at row 1.
    #[must_use]
    pub fn with_sheet(sheet: &str, rows: Rows) -> Self {
        Self::with_sheets([(sheet, rows)])
    }

    #[must_use]
    pub fn with_sheets<'a>(sheets: impl IntoIterator<Item = (&'a str, Rows)>) -> Self {
        let sheets = sheets
            .into_iter()
            .map(|(name, rows)| (name.to_string(), rows))
            .collect();
        Self {
            sheets: RwLock::new(sheets),
        }
    }

    /// Snapshot of every stored row of `sheet`, blanks included.
    pub async fn sheet_rows(&self, sheet: &str) -> Rows {
        self.sheets
            .read()
            .await
            .get(sheet)
            .cloned()
            .unwrap_or_default()
    }

    fn write_at(grid: &mut Rows, range: &A1Range, start_row: usize, rows: Rows) {
        for (offset, row) in rows.into_iter().enumerate() {
            let row_idx = start_row + offset;
            if grid.len() <= row_idx {
                grid.resize_with(row_idx + 1, Vec::new);
            }
            let target = &mut grid[row_idx];
            for (col_offset, value) in row.into_iter().take(range.width()).enumerate() {
                let col_idx = range.first_col + col_offset;
                if target.len() <= col_idx {
                    target.resize(col_idx + 1, String::new());
                }
                target[col_idx] = value;
            }
        }
    }
}

#[async_trait]
impl SheetStore for MemorySheetStore {
    async fn get(&self, range: &str) -> Result<Rows, StoreError> {
        let range = A1Range::parse(range)?;
        let sheets = self.sheets.read().await;
        let Some(grid) = sheets.get(&range.sheet) else {
            return Err(StoreError::NotFound {
                url: format!("memory://{}", range.sheet),
            });
        };

        let end = range.last_row.map_or(grid.len(), |last| (last + 1).min(grid.len()));
        let mut rows: Rows = grid
            .get(range.first_row..end)
            .unwrap_or_default()
            .iter()
            .map(|row| {
                let mut cells: Vec<String> = row
                    .iter()
                    .skip(range.first_col)
                    .take(range.width())
                    .cloned()
                    .collect();
                while cells.last().is_some_and(String::is_empty) {
                    cells.pop();
                }
                cells
            })
            .collect();
        while rows.last().is_some_and(|row| is_blank(row)) {
            rows.pop();
        }
        Ok(rows)
    }

    async fn append(&self, range: &str, rows: Rows) -> Result<(), StoreError> {
        let range = A1Range::parse(range)?;
        let mut sheets = self.sheets.write().await;
        let grid = sheets.entry(range.sheet.clone()).or_default();
        let next_row = grid
            .iter()
            .rposition(|row| !is_blank(row))
            .map_or(range.first_row, |last| (last + 1).max(range.first_row));
        Self::write_at(grid, &range, next_row, rows);
        Ok(())
    }

    async fn update(&self, range: &str, rows: Rows) -> Result<(), StoreError> {
        let range = A1Range::parse(range)?;
        let mut sheets = self.sheets.write().await;
        let grid = sheets.entry(range.sheet.clone()).or_default();
        let start = range.first_row;
        Self::write_at(grid, &range, start, rows);
        Ok(())
    }

    async fn clear(&self, range: &str) -> Result<(), StoreError> {
        let range = A1Range::parse(range)?;
        let mut sheets = self.sheets.write().await;
        let Some(grid) = sheets.get_mut(&range.sheet) else {
            return Ok(());
        };
        let end = range.last_row.map_or(grid.len(), |last| (last + 1).min(grid.len()));
        for row in grid.iter_mut().take(end).skip(range.first_row) {
            for cell in row.iter_mut().skip(range.first_col).take(range.width()) {
                cell.clear();
            }
        }
        Ok(())
    }
}
