//! Sheet export: workbook sheet in, tab-delimited text file out.

use crate::config::{ExportJob, ExportPlan};
use crate::detect::{detect_format_from_bytes, FormatType};
use crate::error::{Error, Result};
use crate::model::Workbook;
use crate::render::{write_sheet, RenderOptions};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// What a successful export wrote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportSummary {
    /// Name of the exported sheet
    pub sheet_name: String,
    /// Lines written (one per row)
    pub rows: usize,
    /// Fields per line
    pub columns: usize,
}

/// Open a workbook, picking the reader from the file contents.
pub fn open_workbook(path: impl AsRef<Path>) -> Result<Box<dyn Workbook>> {
    let path = path.as_ref();
    let data = std::fs::read(path).map_err(|e| Error::file_access(path, e))?;
    let format = detect_format_from_bytes(&data)?;

    match format {
        #[cfg(feature = "xlsx")]
        FormatType::Xlsx => Ok(Box::new(crate::xlsx::XlsxWorkbook::from_bytes(data)?)),
        #[cfg(feature = "legacy")]
        FormatType::Xls | FormatType::Ods => {
            Ok(Box::new(crate::legacy::LegacyWorkbook::from_bytes(data, format)?))
        }
        #[allow(unreachable_patterns)]
        other => Err(Error::UnsupportedFormat(other.to_string())),
    }
}

/// Write one sheet of an already opened workbook to `writer`.
///
/// The sheet index is checked before anything is written.
pub fn export_sheet<W: Write + ?Sized>(
    workbook: &mut dyn Workbook,
    sheet_index: usize,
    writer: &mut W,
    options: &RenderOptions,
) -> Result<ExportSummary> {
    let sheet = workbook.sheet(sheet_index)?;
    write_sheet(&sheet, writer, options)?;
    Ok(ExportSummary {
        rows: sheet.row_count(),
        columns: sheet.column_count(),
        sheet_name: sheet.name,
    })
}

/// Export the sheet at `sheet_index` of a workbook file to a text file.
///
/// The output file is created or truncated only after the sheet has been
/// read, so a bad index or unreadable workbook leaves an existing output
/// untouched. A write failure part way through leaves a partial file.
///
/// # Example
///
/// ```no_run
/// use sheetdump::{export, RenderOptions};
///
/// let summary = export("planning.xlsx", "allele_trait_vals.txt", 2, &RenderOptions::default())?;
/// println!("{} rows", summary.rows);
/// # Ok::<(), sheetdump::Error>(())
/// ```
pub fn export(
    workbook_path: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
    sheet_index: usize,
    options: &RenderOptions,
) -> Result<ExportSummary> {
    let output_path = output_path.as_ref();
    let mut workbook = open_workbook(workbook_path)?;
    let sheet = workbook.sheet(sheet_index)?;

    let file = File::create(output_path).map_err(|e| Error::file_access(output_path, e))?;
    let mut writer = BufWriter::new(file);
    write_sheet(&sheet, &mut writer, options).map_err(|e| at_path(output_path, e))?;
    writer
        .flush()
        .map_err(|e| Error::file_access(output_path, e))?;

    Ok(ExportSummary {
        rows: sheet.row_count(),
        columns: sheet.column_count(),
        sheet_name: sheet.name,
    })
}

fn at_path(path: &Path, err: Error) -> Error {
    match err {
        Error::Io(source) => Error::file_access(path, source),
        other => other,
    }
}

/// Runs export jobs with a fixed set of render options.
#[derive(Debug, Clone, Default)]
pub struct SheetExporter {
    options: RenderOptions,
}

impl SheetExporter {
    /// Create an exporter.
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    /// Render options in use.
    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Run one job.
    pub fn export(&self, job: &ExportJob) -> Result<ExportSummary> {
        export(&job.workbook, &job.output, job.sheet, &self.options)
    }
}

/// Result of one job in a plan.
#[derive(Debug)]
pub struct JobOutcome {
    /// The job that ran
    pub job: ExportJob,
    /// Its result
    pub result: Result<ExportSummary>,
}

/// Results of a plan run, in job order.
#[derive(Debug, Default)]
pub struct PlanReport {
    /// One entry per attempted job
    pub outcomes: Vec<JobOutcome>,
    /// Jobs not attempted because an earlier job failed in fail-fast mode
    pub skipped: usize,
}

impl PlanReport {
    /// Number of successful jobs.
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    /// Failed jobs in order.
    pub fn failures(&self) -> impl Iterator<Item = &JobOutcome> {
        self.outcomes.iter().filter(|o| o.result.is_err())
    }

    /// Whether every job was attempted and succeeded.
    pub fn is_success(&self) -> bool {
        self.skipped == 0 && self.outcomes.iter().all(|o| o.result.is_ok())
    }
}

/// Run every job of a plan in order.
///
/// Each job opens its workbook afresh. A failed job does not stop later jobs
/// unless `fail_fast` is set. `on_done` is called after each attempted job.
pub fn run_plan<F>(plan: &ExportPlan, fail_fast: bool, mut on_done: F) -> PlanReport
where
    F: FnMut(&JobOutcome),
{
    let exporter = SheetExporter::new(plan.options.clone());
    let mut report = PlanReport::default();

    for (idx, job) in plan.jobs.iter().enumerate() {
        let outcome = JobOutcome {
            job: job.clone(),
            result: exporter.export(job),
        };
        on_done(&outcome);

        let failed = outcome.result.is_err();
        report.outcomes.push(outcome);
        if failed && fail_fast {
            report.skipped = plan.jobs.len() - idx - 1;
            break;
        }
    }

    report
}
