//! Legacy binary (.xls) and OpenDocument (.ods) workbook reader.
//!
//! These formats are decoded by calamine; this module maps its cell data onto
//! [`CellValue`] and re-anchors each range at A1.

use crate::detect::{detect_format_from_bytes, FormatType};
use crate::error::{Error, Result};
use crate::model::{CellError, CellValue, DateSystem, Sheet, Workbook};
use calamine::{
    open_workbook_from_rs, CellErrorType, Data, ExcelDateTime, ExcelDateTimeType, Ods, Range,
    Reader, Sheets, Xls,
};
use std::io::Cursor;
use std::path::Path;

/// Reader for workbooks decoded through calamine.
pub struct LegacyWorkbook {
    sheets: Sheets<Cursor<Vec<u8>>>,
    names: Vec<String>,
}

impl LegacyWorkbook {
    /// Open a workbook file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path).map_err(|e| Error::file_access(path, e))?;
        let format = detect_format_from_bytes(&data)?;
        Self::from_bytes(data, format)
    }

    /// Create a reader from file contents already identified as `format`.
    pub fn from_bytes(data: Vec<u8>, format: FormatType) -> Result<Self> {
        let reader = Cursor::new(data);
        let sheets = match format {
            FormatType::Xls => Sheets::Xls(
                open_workbook_from_rs::<Xls<_>, _>(reader).map_err(calamine::Error::Xls)?,
            ),
            FormatType::Ods => Sheets::Ods(
                open_workbook_from_rs::<Ods<_>, _>(reader).map_err(calamine::Error::Ods)?,
            ),
            other => return Err(Error::UnsupportedFormat(other.to_string())),
        };
        let names = sheets.sheet_names();
        Ok(Self { sheets, names })
    }
}

impl Workbook for LegacyWorkbook {
    fn sheet_count(&self) -> usize {
        self.names.len()
    }

    fn sheet_names(&self) -> Vec<String> {
        self.names.clone()
    }

    fn sheet(&mut self, index: usize) -> Result<Sheet> {
        self.check_index(index)?;
        let range = self
            .sheets
            .worksheet_range_at(index)
            .ok_or_else(|| Error::MissingComponent(format!("sheet {}", index)))??;
        range_to_sheet(&self.names[index], &range)
    }
}

impl std::fmt::Debug for LegacyWorkbook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LegacyWorkbook")
            .field("sheets", &self.names)
            .finish()
    }
}

/// Copy a calamine range into a sheet grid anchored at A1.
///
/// The sheet takes the 1904 date system when its date cells use it.
fn range_to_sheet(name: &str, range: &Range<Data>) -> Result<Sheet> {
    let mut sheet = Sheet::new(name);
    let (row_offset, col_offset) = range.start().unwrap_or((0, 0));
    let row_offset = row_offset as usize;
    let col_offset = col_offset as usize;

    let mut date_system = DateSystem::Excel1900;
    for (row, col, data) in range.cells() {
        if let Data::DateTime(dt) = data {
            if is_1904(dt) {
                date_system = DateSystem::Excel1904;
            }
        }
        let value = data_to_value(data);
        if value.is_empty() {
            continue;
        }
        sheet.set(row_offset + row, col_offset + col, value)?;
    }

    Ok(sheet.with_date_system(date_system))
}

/// calamine keeps the workbook's 1904 flag on each date but does not expose
/// it; compare against the same serial in the 1900 system.
fn is_1904(dt: &ExcelDateTime) -> bool {
    let kind = if dt.is_duration() {
        ExcelDateTimeType::TimeDelta
    } else {
        ExcelDateTimeType::DateTime
    };
    !dt.as_f64().is_nan() && *dt != ExcelDateTime::new(dt.as_f64(), kind, false)
}

fn data_to_value(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => CellValue::DateTime(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(e) => CellValue::Error(map_error(e)),
    }
}

fn map_error(e: &CellErrorType) -> CellError {
    match e {
        CellErrorType::Null => CellError::Null,
        CellErrorType::Div0 => CellError::Div0,
        CellErrorType::Value => CellError::Value,
        CellErrorType::Ref => CellError::Ref,
        CellErrorType::Name => CellError::Name,
        CellErrorType::Num => CellError::Num,
        CellErrorType::NA => CellError::NA,
        CellErrorType::GettingData => CellError::GettingData,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_offset_is_preserved() {
        let mut range = Range::new((1, 2), (2, 3));
        range.set_value((1, 2), Data::String("C2".to_string()));
        range.set_value((2, 3), Data::Float(5.0));

        let sheet = range_to_sheet("Offset", &range).unwrap();
        assert_eq!(sheet.row_count(), 3);
        assert_eq!(sheet.column_count(), 4);
        assert_eq!(sheet.get(0, 0), Some(&CellValue::Empty));
        assert_eq!(sheet.get(1, 2), Some(&CellValue::text("C2")));
        assert_eq!(sheet.get(2, 3), Some(&CellValue::Number(5.0)));
    }

    #[test]
    fn test_data_mapping() {
        assert_eq!(data_to_value(&Data::Int(3)), CellValue::Number(3.0));
        assert_eq!(data_to_value(&Data::Bool(false)), CellValue::Bool(false));
        assert_eq!(
            data_to_value(&Data::Error(CellErrorType::NA)),
            CellValue::Error(CellError::NA)
        );
        assert_eq!(
            data_to_value(&Data::DateTimeIso("2024-01-02".to_string())),
            CellValue::text("2024-01-02")
        );
    }

    #[test]
    fn test_empty_range() {
        let range: Range<Data> = Range::empty();
        assert!(range_to_sheet("Blank", &range).unwrap().is_empty());
    }

    #[test]
    fn test_1904_dates_mark_sheet() {
        let mut range = Range::new((0, 0), (0, 1));
        range.set_value(
            (0, 0),
            Data::DateTime(ExcelDateTime::new(43000.0, ExcelDateTimeType::DateTime, true)),
        );
        range.set_value((0, 1), Data::Float(1.0));

        let sheet = range_to_sheet("Mac", &range).unwrap();
        assert_eq!(sheet.date_system(), DateSystem::Excel1904);
        assert_eq!(sheet.get(0, 0), Some(&CellValue::DateTime(43000.0)));
    }

    #[test]
    fn test_1900_dates_keep_default() {
        let mut range = Range::new((0, 0), (0, 0));
        range.set_value(
            (0, 0),
            Data::DateTime(ExcelDateTime::new(43000.0, ExcelDateTimeType::DateTime, false)),
        );

        let sheet = range_to_sheet("Win", &range).unwrap();
        assert_eq!(sheet.date_system(), DateSystem::Excel1900);
    }

    #[test]
    fn test_is_1904() {
        assert!(is_1904(&ExcelDateTime::new(1.5, ExcelDateTimeType::DateTime, true)));
        assert!(is_1904(&ExcelDateTime::new(0.5, ExcelDateTimeType::TimeDelta, true)));
        assert!(!is_1904(&ExcelDateTime::new(1.5, ExcelDateTimeType::DateTime, false)));
    }

    #[test]
    fn test_garbage_is_format_error() {
        let err = LegacyWorkbook::from_bytes(b"not a workbook at all".to_vec(), FormatType::Xls)
            .unwrap_err();
        assert!(err.is_format() || err.is_file_access());
    }

    #[test]
    fn test_ods_error_names_reader() {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file("mimetype", zip::write::SimpleFileOptions::default())
            .unwrap();
        std::io::Write::write_all(&mut writer, b"application/vnd.oasis.opendocument.spreadsheet")
            .unwrap();
        let data = writer.finish().unwrap().into_inner();

        let err = LegacyWorkbook::from_bytes(data, FormatType::Ods).unwrap_err();
        assert!(err.is_format());
        assert!(err.to_string().contains("Ods"), "{}", err);
    }

    #[test]
    fn test_xlsx_is_not_legacy() {
        let err = LegacyWorkbook::from_bytes(Vec::new(), FormatType::Xlsx).unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat(_)));
    }
}
