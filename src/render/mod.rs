//! Output rendering for sheets.
//!
//! Converts a [`Sheet`](crate::model::Sheet) into tab-delimited text, one
//! line per row.
//!
//! # Example
//!
//! ```
//! use sheetdump::model::{CellValue, Sheet};
//! use sheetdump::render::{to_tsv, RenderOptions};
//!
//! let sheet = Sheet::from_rows("Data", vec![vec![CellValue::from("Alpha"), CellValue::from(1.0)]]);
//! let text = to_tsv(&sheet, &RenderOptions::default())?;
//! assert_eq!(text, "Alpha\t1.0\t\n");
//! # Ok::<(), sheetdump::Error>(())
//! ```

mod options;
mod tsv;
mod value;

pub use options::{RenderOptions, ValueStyle};
pub use tsv::{to_tsv, write_sheet, DELIMITER, LINE_END};
pub use value::{float_repr, render_value, serial_to_iso};
