//! Workbook reader abstraction.

use super::Sheet;
use crate::error::{Error, Result};

/// A readable workbook: an ordered list of sheets addressed by index.
///
/// Implemented by the format readers and by [`MemoryWorkbook`], which lets
/// callers export sheets they built themselves.
pub trait Workbook {
    /// Number of sheets in the workbook.
    fn sheet_count(&self) -> usize;

    /// Sheet names in workbook order.
    fn sheet_names(&self) -> Vec<String>;

    /// Load the sheet at a zero-based index.
    ///
    /// Returns [`Error::SheetOutOfRange`] when `index >= sheet_count()`.
    fn sheet(&mut self, index: usize) -> Result<Sheet>;

    /// Fail with [`Error::SheetOutOfRange`] unless `index` names a sheet.
    fn check_index(&self, index: usize) -> Result<()> {
        let count = self.sheet_count();
        if index >= count {
            return Err(Error::SheetOutOfRange { index, count });
        }
        Ok(())
    }
}

/// A workbook whose sheets are already in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryWorkbook {
    sheets: Vec<Sheet>,
}

impl MemoryWorkbook {
    /// Create a workbook from sheets.
    pub fn new(sheets: Vec<Sheet>) -> Self {
        Self { sheets }
    }

    /// Append a sheet.
    pub fn push(&mut self, sheet: Sheet) {
        self.sheets.push(sheet);
    }
}

impl Workbook for MemoryWorkbook {
    fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    fn sheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|s| s.name.clone()).collect()
    }

    fn sheet(&mut self, index: usize) -> Result<Sheet> {
        self.check_index(index)?;
        Ok(self.sheets[index].clone())
    }
}
