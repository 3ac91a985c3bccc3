//! sheetdump CLI - dump spreadsheet sheets to tab-delimited text
//!
//! Exports one or more sheets of a workbook to text files, either from
//! command-line arguments or from a JSON job file.

use clap::{Args, Parser, Subcommand};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use sheetdump::{
    ExportJob, ExportPlan, JobOutcome, PlanReport, RenderOptions, ValueStyle, Workbook,
};
use std::path::PathBuf;

/// Spreadsheet sheets to tab-delimited text
#[derive(Parser)]
#[command(
    name = "sheetdump",
    version,
    about = "Dump spreadsheet sheets to tab-delimited text files",
    long_about = "sheetdump - export workbook sheets as tab-delimited text.\n\n\
                  Reads XLSX, XLSM, XLS and ODS workbooks and writes one line per row,\n\
                  cells separated by tabs."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export sheets of one workbook
    Export {
        /// Workbook file path
        workbook: PathBuf,

        /// Zero-based sheet index (repeat, paired with --output)
        #[arg(short, long = "sheet", required = true)]
        sheets: Vec<usize>,

        /// Output file path (repeat, paired with --sheet)
        #[arg(short, long = "output", required = true)]
        outputs: Vec<PathBuf>,

        #[command(flatten)]
        render: RenderArgs,

        #[command(flatten)]
        run: RunArgs,
    },

    /// Run the export jobs listed in a JSON job file
    Run {
        /// Job file path
        jobs: PathBuf,

        #[command(flatten)]
        render: RenderArgs,

        #[command(flatten)]
        run: RunArgs,
    },

    /// List the sheets of a workbook
    Sheets {
        /// Workbook file path
        workbook: PathBuf,
    },

    /// Show version information
    Version,
}

/// Output format flags
#[derive(Args, Clone, Default)]
struct RenderArgs {
    /// Integers without ".0", TRUE/FALSE, ISO dates, error text
    #[arg(long)]
    plain: bool,

    /// Do not write a tab after the last cell of each row
    #[arg(long)]
    no_trailing_tab: bool,
}

impl RenderArgs {
    /// Apply the flags that were given on top of `base`.
    fn apply(&self, mut base: RenderOptions) -> RenderOptions {
        if self.plain {
            base = base.with_values(ValueStyle::Plain);
        }
        if self.no_trailing_tab {
            base = base.with_trailing_tab(false);
        }
        base
    }
}

/// Execution flags
#[derive(Args, Clone, Default)]
struct RunArgs {
    /// Stop at the first failed export
    #[arg(long)]
    fail_fast: bool,

    /// Only print errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Export {
            workbook,
            sheets,
            outputs,
            render,
            run,
        } => {
            let plan = plan_from_args(workbook, sheets, outputs, render.apply(RenderOptions::new()))?;
            execute(&plan, &run)?;
        }

        Commands::Run { jobs, render, run } => {
            let mut plan = ExportPlan::from_path(&jobs)?;
            plan.options = render.apply(plan.options);
            execute(&plan, &run)?;
        }

        Commands::Sheets { workbook } => {
            let pb = create_spinner("Reading workbook...");

            let format = sheetdump::detect_format_from_path(&workbook)?;
            let mut book = sheetdump::open_workbook(&workbook)?;
            let names = book.sheet_names();
            let mut rows = Vec::with_capacity(names.len());
            for (idx, name) in names.iter().enumerate() {
                let sheet = book.sheet(idx)?;
                rows.push((idx, name.clone(), sheet.row_count(), sheet.column_count()));
            }

            pb.finish_and_clear();

            println!("{}", "Workbook Sheets".cyan().bold());
            println!("{}", "─".repeat(40));
            println!(
                "{}: {}",
                "File".bold(),
                workbook.file_name().unwrap_or_default().to_string_lossy()
            );
            println!("{}: {}", "Format".bold(), format);
            println!();
            for (idx, name, row_count, column_count) in rows {
                println!(
                    "{:>3}  {}  {}",
                    idx.to_string().bold(),
                    name,
                    format!("{} x {}", row_count, column_count).dimmed()
                );
            }
        }

        Commands::Version => {
            print_version();
        }
    }

    Ok(())
}

/// Pair `--sheet` and `--output` values by position.
fn plan_from_args(
    workbook: PathBuf,
    sheets: Vec<usize>,
    outputs: Vec<PathBuf>,
    options: RenderOptions,
) -> Result<ExportPlan, Box<dyn std::error::Error>> {
    if sheets.len() != outputs.len() {
        return Err(format!(
            "{} --sheet value(s) but {} --output value(s); give one output per sheet",
            sheets.len(),
            outputs.len()
        )
        .into());
    }

    let jobs = sheets
        .into_iter()
        .zip(outputs)
        .map(|(sheet, output)| ExportJob::new(workbook.clone(), sheet, output))
        .collect();

    Ok(ExportPlan::new(jobs, options)?)
}

/// Run a plan, reporting each job, and fail if any job failed.
fn execute(plan: &ExportPlan, args: &RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let total = plan.jobs.len();
    let pb = if args.quiet {
        ProgressBar::hidden()
    } else {
        create_progress(total as u64)
    };

    if !args.quiet {
        pb.println(format!(
            "{} Exporting {} sheet(s)",
            "▶".cyan().bold(),
            total
        ));
    }

    let report = sheetdump::run_plan(plan, args.fail_fast, |outcome| {
        report_outcome(&pb, outcome, args.quiet);
        pb.inc(1);
    });

    pb.finish_and_clear();

    if !args.quiet {
        print_summary(&report);
    }

    if report.is_success() {
        Ok(())
    } else {
        Err(format!(
            "{} of {} export(s) failed",
            report.failures().count(),
            total
        )
        .into())
    }
}

fn report_outcome(pb: &ProgressBar, outcome: &JobOutcome, quiet: bool) {
    match &outcome.result {
        Ok(summary) => {
            if !quiet {
                pb.println(format!(
                    "{} {} ({}: {} rows x {} columns)",
                    "✓".green().bold(),
                    outcome.job,
                    summary.sheet_name,
                    summary.rows,
                    summary.columns
                ));
            }
        }
        Err(e) => {
            pb.suspend(|| {
                eprintln!(
                    "{} {}\n  workbook: {}\n  sheet:    {}\n  output:   {}\n  cause:    {}",
                    "✗".red().bold(),
                    "Export failed".red(),
                    outcome.job.workbook.display(),
                    outcome.job.sheet,
                    outcome.job.output.display(),
                    e
                );
            });
        }
    }
}

fn print_summary(report: &PlanReport) {
    let failed = report.failures().count();
    let status = if failed == 0 {
        "■".green().bold()
    } else {
        "■".red().bold()
    };
    let mut line = format!(
        "{} Done: {} succeeded, {} failed",
        status,
        report.succeeded(),
        failed
    );
    if report.skipped > 0 {
        line.push_str(&format!(", {} skipped", report.skipped));
    }
    println!("{}", line);
}

fn print_version() {
    println!("{} {}", "sheetdump".green().bold(), env!("CARGO_PKG_VERSION"));
    println!("Dump spreadsheet sheets to tab-delimited text files");
    println!();
    println!("Supported formats: XLSX, XLSM, XLS, ODS");
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
            .template("{spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

fn create_progress(len: u64) -> ProgressBar {
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.blue} [{bar:30.cyan/blue}] {pos}/{len}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> "),
    );
    pb
}
