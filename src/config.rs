//! Export job configuration.
//!
//! A job file is a JSON document listing the sheets to dump:
//!
//! ```json
//! {
//!   "jobs": [
//!     { "workbook": "planning.xlsx", "sheet": 2, "output": "gamedata/allele_trait_vals.txt" },
//!     { "workbook": "planning.xlsx", "sheet": 3, "output": "gamedata/tile_trait_vals.txt" }
//!   ],
//!   "options": { "values": "compat", "trailing_tab": true }
//! }
//! ```
//!
//! Relative paths are resolved against the directory holding the job file.

use crate::error::{Error, Result};
use crate::render::RenderOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One sheet to export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportJob {
    /// Workbook to read
    pub workbook: PathBuf,
    /// Zero-based sheet index
    pub sheet: usize,
    /// Text file to create or overwrite
    pub output: PathBuf,
}

impl ExportJob {
    /// Create a job.
    pub fn new(workbook: impl Into<PathBuf>, sheet: usize, output: impl Into<PathBuf>) -> Self {
        Self {
            workbook: workbook.into(),
            sheet,
            output: output.into(),
        }
    }
}

impl std::fmt::Display for ExportJob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} [sheet {}] -> {}",
            self.workbook.display(),
            self.sheet,
            self.output.display()
        )
    }
}

/// An ordered list of jobs sharing one set of render options.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExportPlan {
    /// Jobs, run in order
    pub jobs: Vec<ExportJob>,

    /// Render options applied to every job
    #[serde(default)]
    pub options: RenderOptions,
}

impl ExportPlan {
    /// Create a plan from jobs and options.
    pub fn new(jobs: Vec<ExportJob>, options: RenderOptions) -> Result<Self> {
        let plan = Self { jobs, options };
        plan.validate()?;
        Ok(plan)
    }

    /// Parse a plan from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let plan: Self = serde_json::from_str(json)?;
        plan.validate()?;
        Ok(plan)
    }

    /// Load a job file, resolving relative paths against its directory.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| Error::file_access(path, e))?;
        let mut plan = Self::from_json_str(&json)?;

        if let Some(base) = path.parent() {
            for job in &mut plan.jobs {
                job.workbook = resolve(base, &job.workbook);
                job.output = resolve(base, &job.output);
            }
        }
        Ok(plan)
    }

    /// Reject plans that could not do anything useful.
    pub fn validate(&self) -> Result<()> {
        if self.jobs.is_empty() {
            return Err(Error::Config("no export jobs given".to_string()));
        }
        for job in &self.jobs {
            if job.workbook.as_os_str().is_empty() {
                return Err(Error::Config(format!("job {} has no workbook path", job)));
            }
            if job.output.as_os_str().is_empty() {
                return Err(Error::Config(format!("job {} has no output path", job)));
            }
            if job.workbook == job.output {
                return Err(Error::Config(format!(
                    "job {} would overwrite its own workbook",
                    job
                )));
            }
        }
        Ok(())
    }
}

fn resolve(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
