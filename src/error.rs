//! Error types for the sheetdump library.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for sheetdump operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reading a workbook or writing a sheet dump.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error on an already opened stream.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A workbook or output path could not be opened, created or written.
    #[error("cannot access {}: {source}", path.display())]
    FileAccess {
        /// Path that failed
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// The file format could not be determined.
    #[error("Unknown file format")]
    UnknownFormat,

    /// The file format is recognized but not supported by this build.
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// The workbook is recognized but its contents are corrupt.
    #[error("Invalid workbook: {0}")]
    Format(String),

    /// Error reading ZIP archive.
    #[error("ZIP archive error: {0}")]
    ZipArchive(String),

    /// Error parsing XML content.
    #[error("XML parse error: {0}")]
    XmlParse(String),

    /// A required workbook part is missing.
    #[error("Missing component: {0}")]
    MissingComponent(String),

    /// The requested sheet index does not exist.
    #[error("sheet index {index} out of range (workbook has {count} sheets)")]
    SheetOutOfRange {
        /// Requested zero-based index
        index: usize,
        /// Number of sheets in the workbook
        count: usize,
    },

    /// Error during text encoding conversion.
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// Invalid export job configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Malformed JSON job file.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Wrap an I/O error with the path it occurred on.
    pub fn file_access(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::FileAccess {
            path: path.into(),
            source,
        }
    }

    /// Whether this error means a file could not be read or written.
    pub fn is_file_access(&self) -> bool {
        matches!(self, Error::FileAccess { .. } | Error::Io(_))
    }

    /// Whether this error means the workbook is not a readable spreadsheet.
    pub fn is_format(&self) -> bool {
        matches!(
            self,
            Error::UnknownFormat
                | Error::UnsupportedFormat(_)
                | Error::Format(_)
                | Error::ZipArchive(_)
                | Error::XmlParse(_)
                | Error::MissingComponent(_)
        )
    }

    /// Whether this error is a sheet index range failure.
    pub fn is_out_of_range(&self) -> bool {
        matches!(self, Error::SheetOutOfRange { .. })
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        Error::ZipArchive(err.to_string())
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::XmlParse(err.to_string())
    }
}

#[cfg(feature = "legacy")]
impl From<calamine::Error> for Error {
    fn from(err: calamine::Error) -> Self {
        match err {
            calamine::Error::Io(e) => Error::Io(e),
            other => Error::Format(other.to_string()),
        }
    }
}
