//! Tab-delimited text renderer.

use super::{render_value, RenderOptions};
use crate::error::Result;
use crate::model::Sheet;
use std::io::Write;

/// Field delimiter.
pub const DELIMITER: char = '\t';

/// Line terminator.
pub const LINE_END: char = '\n';

/// Write every row of a sheet as one line of tab-separated values.
///
/// Rows and cells are written in sheet order. With `trailing_tab` every cell,
/// including the last one, is followed by a tab.
pub fn write_sheet<W: Write + ?Sized>(
    sheet: &Sheet,
    writer: &mut W,
    options: &RenderOptions,
) -> Result<()> {
    let mut line = String::new();
    for row in sheet.rows() {
        line.clear();
        for (idx, cell) in row.iter().enumerate() {
            if idx > 0 && !options.trailing_tab {
                line.push(DELIMITER);
            }
            line.push_str(&render_value(cell, options.values, sheet.date_system()));
            if options.trailing_tab {
                line.push(DELIMITER);
            }
        }
        line.push(LINE_END);
        writer.write_all(line.as_bytes())?;
    }
    Ok(())
}

/// Render a sheet to a string.
pub fn to_tsv(sheet: &Sheet, options: &RenderOptions) -> Result<String> {
    let mut out = Vec::new();
    write_sheet(sheet, &mut out, options)?;
    Ok(String::from_utf8_lossy(&out).into_owned())
}
