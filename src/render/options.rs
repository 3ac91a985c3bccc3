//! Rendering options configuration.

use serde::{Deserialize, Serialize};

/// How cell values are turned into text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueStyle {
    /// Byte-compatible with the original exporter: every number is a float
    /// (`5.0`), booleans are `1`/`0`, dates are serial numbers and errors
    /// are their numeric codes.
    #[default]
    Compat,
    /// Integers without a decimal point, `TRUE`/`FALSE`, ISO 8601 dates and
    /// error text such as `#DIV/0!`.
    Plain,
}

/// Options for rendering a sheet as tab-delimited text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Value formatting convention
    pub values: ValueStyle,

    /// Write a tab after the last cell of every row
    pub trailing_tab: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            values: ValueStyle::Compat,
            trailing_tab: true,
        }
    }
}

impl RenderOptions {
    /// Create default (compatible) options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Plain values and no trailing tab.
    pub fn plain() -> Self {
        Self {
            values: ValueStyle::Plain,
            trailing_tab: false,
        }
    }

    /// Set the value style.
    pub fn with_values(mut self, values: ValueStyle) -> Self {
        self.values = values;
        self
    }

    /// Set whether rows end with a tab.
    pub fn with_trailing_tab(mut self, trailing_tab: bool) -> Self {
        self.trailing_tab = trailing_tab;
        self
    }
}
