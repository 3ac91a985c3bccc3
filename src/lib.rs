//! # sheetdump
//!
//! Dump spreadsheet workbook sheets to tab-delimited text files.
//!
//! Each export opens a workbook, selects one sheet by zero-based index, and
//! writes every row as a line of tab-separated cell values.
//!
//! ## Quick Start
//!
//! ```no_run
//! use sheetdump::{export, RenderOptions};
//!
//! // Sheet 2 of the workbook, with the original tool's exact output format
//! export("planning.xlsx", "allele_trait_vals.txt", 2, &RenderOptions::default())?;
//!
//! // Integers without ".0", ISO dates, no trailing tab
//! export("planning.xlsx", "tile_trait_vals.txt", 3, &RenderOptions::plain())?;
//! # Ok::<(), sheetdump::Error>(())
//! ```
//!
//! ## Job files
//!
//! ```no_run
//! use sheetdump::{run_plan, ExportPlan};
//!
//! let plan = ExportPlan::from_path("jobs.json")?;
//! let report = run_plan(&plan, false, |outcome| println!("{}", outcome.job));
//! assert!(report.is_success());
//! # Ok::<(), sheetdump::Error>(())
//! ```
//!
//! ## Features
//!
//! - `xlsx` (default): Office Open XML workbooks (.xlsx, .xlsm)
//! - `legacy` (default): Excel 97-2003 (.xls) and OpenDocument (.ods)
//!   workbooks through calamine

pub mod config;
pub mod container;
pub mod detect;
pub mod error;
pub mod export;
pub mod model;
pub mod render;

#[cfg(feature = "xlsx")]
pub mod xlsx;

#[cfg(feature = "legacy")]
pub mod legacy;

// Re-exports
pub use config::{ExportJob, ExportPlan};
pub use detect::{detect_format_from_bytes, detect_format_from_path, FormatType};
pub use error::{Error, Result};
pub use export::{
    export, export_sheet, open_workbook, run_plan, ExportSummary, JobOutcome, PlanReport,
    SheetExporter,
};
pub use model::{CellError, CellValue, DateSystem, MemoryWorkbook, Sheet, Workbook};
pub use render::{RenderOptions, ValueStyle};
