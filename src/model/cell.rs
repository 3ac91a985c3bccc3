//! Cell value model.

use serde::{Deserialize, Serialize};

/// Spreadsheet error values with their BIFF error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellError {
    Null,
    Div0,
    Value,
    Ref,
    Name,
    Num,
    NA,
    GettingData,
}

impl CellError {
    /// BIFF error code stored in legacy workbooks.
    pub fn code(&self) -> u8 {
        match self {
            CellError::Null => 0x00,
            CellError::Div0 => 0x07,
            CellError::Value => 0x0F,
            CellError::Ref => 0x17,
            CellError::Name => 0x1D,
            CellError::Num => 0x24,
            CellError::NA => 0x2A,
            CellError::GettingData => 0x2B,
        }
    }

    /// Error text as displayed in a spreadsheet application.
    pub fn text(&self) -> &'static str {
        match self {
            CellError::Null => "#NULL!",
            CellError::Div0 => "#DIV/0!",
            CellError::Value => "#VALUE!",
            CellError::Ref => "#REF!",
            CellError::Name => "#NAME?",
            CellError::Num => "#NUM!",
            CellError::NA => "#N/A",
            CellError::GettingData => "#GETTING_DATA",
        }
    }

    /// Parse the error text found in OOXML `t="e"` cells.
    pub fn from_text(text: &str) -> Option<Self> {
        let err = match text.trim() {
            "#NULL!" => CellError::Null,
            "#DIV/0!" => CellError::Div0,
            "#VALUE!" => CellError::Value,
            "#REF!" => CellError::Ref,
            "#NAME?" => CellError::Name,
            "#NUM!" => CellError::Num,
            "#N/A" => CellError::NA,
            "#GETTING_DATA" => CellError::GettingData,
            _ => return None,
        };
        Some(err)
    }
}

impl std::fmt::Display for CellError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.text())
    }
}

/// The value held by a single cell.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum CellValue {
    /// No value (missing or blank cell)
    #[default]
    Empty,
    /// Text
    Text(String),
    /// Any numeric value; integers are widened to floating point
    Number(f64),
    /// Boolean
    Bool(bool),
    /// Excel serial date, counted in the sheet's [`DateSystem`]
    DateTime(f64),
    /// Formula error
    Error(CellError),
}

/// Epoch that date serials are counted from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateSystem {
    /// Serial 1 is 1900-01-01 (with the phantom 1900-02-29)
    #[default]
    Excel1900,
    /// Serial 0 is 1904-01-01
    Excel1904,
}

impl DateSystem {
    /// Days between the 1904 and 1900 epochs.
    pub const EPOCH_OFFSET_1904: f64 = 1462.0;

    /// Re-count a serial of this system in the 1900 date system.
    pub fn to_1900_serial(self, serial: f64) -> f64 {
        match self {
            DateSystem::Excel1900 => serial,
            DateSystem::Excel1904 => serial + Self::EPOCH_OFFSET_1904,
        }
    }
}

impl CellValue {
    /// Create a text value.
    pub fn text(s: impl Into<String>) -> Self {
        CellValue::Text(s.into())
    }

    /// Check if the cell holds no value.
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<i64> for CellValue {
    fn from(n: i64) -> Self {
        CellValue::Number(n as f64)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

impl From<CellError> for CellValue {
    fn from(e: CellError) -> Self {
        CellValue::Error(e)
    }
}
