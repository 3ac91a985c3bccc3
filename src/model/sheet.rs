//! Sheet grid model.

use super::{CellValue, DateSystem};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Rows in an Excel worksheet.
pub const MAX_ROWS: usize = 1_048_576;

/// Columns in an Excel worksheet (A..XFD).
pub const MAX_COLUMNS: usize = 16_384;

/// A named, rectangular grid of cells anchored at A1.
///
/// The grid is dense: memory grows with rows times columns of the used
/// range, so a single value far from A1 allocates every cell before it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sheet {
    /// Sheet name as shown on its tab
    pub name: String,
    rows: Vec<Vec<CellValue>>,
    width: usize,
    #[serde(default)]
    date_system: DateSystem,
}

impl Sheet {
    /// Create an empty sheet.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Build a sheet from rows, padding short rows with empty cells.
    pub fn from_rows<R, C>(name: impl Into<String>, rows: R) -> Self
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator<Item = CellValue>,
    {
        let mut sheet = Self::new(name);
        for row in rows {
            sheet.push_row(row.into_iter().collect());
        }
        sheet
    }

    /// Append a row, widening the grid if needed.
    pub fn push_row(&mut self, mut row: Vec<CellValue>) {
        if row.len() > self.width {
            self.width = row.len();
            for existing in &mut self.rows {
                existing.resize(self.width, CellValue::Empty);
            }
        } else {
            row.resize(self.width, CellValue::Empty);
        }
        self.rows.push(row);
    }

    /// Set the epoch of this sheet's date serials.
    pub fn with_date_system(mut self, date_system: DateSystem) -> Self {
        self.date_system = date_system;
        self
    }

    /// Epoch of this sheet's date serials.
    pub fn date_system(&self) -> DateSystem {
        self.date_system
    }

    /// Place a value at a zero-based position, growing the grid as needed.
    ///
    /// Positions past Excel's worksheet limits are rejected.
    pub fn set(&mut self, row: usize, col: usize, value: CellValue) -> Result<()> {
        if row >= MAX_ROWS || col >= MAX_COLUMNS {
            return Err(Error::Format(format!(
                "cell at row {} column {} is outside the {}x{} worksheet grid",
                row + 1,
                col + 1,
                MAX_ROWS,
                MAX_COLUMNS
            )));
        }
        if row >= self.rows.len() {
            let width = self.width;
            self.rows.resize_with(row + 1, || vec![CellValue::Empty; width]);
        }
        if col >= self.width {
            self.width = col + 1;
            for existing in &mut self.rows {
                existing.resize(self.width, CellValue::Empty);
            }
        }
        self.rows[row][col] = value;
        Ok(())
    }

    /// Get the value at a zero-based position.
    pub fn get(&self, row: usize, col: usize) -> Option<&CellValue> {
        self.rows.get(row).and_then(|r| r.get(col))
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns (the width of every row).
    pub fn column_count(&self) -> usize {
        self.width
    }

    /// Cells of one row, in column order.
    pub fn row(&self, index: usize) -> Option<&[CellValue]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    /// Iterate rows in order.
    pub fn rows(&self) -> impl Iterator<Item = &[CellValue]> {
        self.rows.iter().map(Vec::as_slice)
    }

    /// Check if the sheet has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rows_pads() {
        let sheet = Sheet::from_rows(
            "Data",
            vec![
                vec![CellValue::from("a")],
                vec![CellValue::from("b"), CellValue::from(2.0)],
            ],
        );
        assert_eq!(sheet.row_count(), 2);
        assert_eq!(sheet.column_count(), 2);
        assert_eq!(sheet.row(0).unwrap(), &[CellValue::from("a"), CellValue::Empty]);
    }

    #[test]
    fn test_set_grows_grid() {
        let mut sheet = Sheet::new("Sparse");
        sheet.set(2, 3, CellValue::from(1.0)).unwrap();
        assert_eq!(sheet.row_count(), 3);
        assert_eq!(sheet.column_count(), 4);
        assert_eq!(sheet.get(0, 0), Some(&CellValue::Empty));
        assert_eq!(sheet.get(2, 3), Some(&CellValue::Number(1.0)));
        assert!(sheet.rows().all(|r| r.len() == 4));

        sheet.set(0, 5, CellValue::from("wide")).unwrap();
        assert_eq!(sheet.column_count(), 6);
        assert!(sheet.rows().all(|r| r.len() == 6));
    }

    #[test]
    fn test_set_rejects_positions_past_limits() {
        let mut sheet = Sheet::new("Huge");
        let err = sheet.set(MAX_ROWS, 0, CellValue::from(1.0)).unwrap_err();
        assert!(err.is_format());
        let err = sheet.set(0, MAX_COLUMNS, CellValue::from(1.0)).unwrap_err();
        assert!(err.is_format());
        assert!(sheet.is_empty());
        assert_eq!(sheet.column_count(), 0);
    }

    #[test]
    fn test_date_system() {
        let sheet = Sheet::new("Mac");
        assert_eq!(sheet.date_system(), DateSystem::Excel1900);
        let sheet = sheet.with_date_system(DateSystem::Excel1904);
        assert_eq!(sheet.date_system(), DateSystem::Excel1904);
    }

    #[test]
    fn test_empty_sheet() {
        let sheet = Sheet::new("Blank");
        assert!(sheet.is_empty());
        assert_eq!(sheet.row(0), None);
    }
}
