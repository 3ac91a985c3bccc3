//! XLSX (Excel) workbook reader.
//!
//! Reads Office Open XML workbooks (.xlsx, .xlsm) straight from the ZIP
//! package: sheet order from `xl/workbook.xml`, text from the shared strings
//! table, and date detection from the number formats in `xl/styles.xml`.
//!
//! # Example
//!
//! ```no_run
//! use sheetdump::xlsx::XlsxWorkbook;
//! use sheetdump::Workbook;
//!
//! let mut book = XlsxWorkbook::open("planning.xlsx")?;
//! for (idx, name) in book.sheet_names().iter().enumerate() {
//!     println!("{}: {}", idx, name);
//! }
//! let sheet = book.sheet(2)?;
//! println!("{} rows", sheet.row_count());
//! # Ok::<(), sheetdump::Error>(())
//! ```

mod parser;
mod shared_strings;
mod styles;

pub use parser::XlsxWorkbook;
