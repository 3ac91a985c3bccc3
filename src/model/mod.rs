//! Format-agnostic workbook model.
//!
//! Readers turn format-specific workbook parts into these structures and the
//! renderer turns them into tab-delimited text.

mod cell;
mod sheet;
mod workbook;

pub use cell::*;
pub use sheet::*;
pub use workbook::*;
