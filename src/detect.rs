//! Workbook format detection.

use crate::container::decode_xml_bytes;
use crate::error::{Error, Result};
use std::io::{Cursor, Read, Seek};
use std::path::Path;

/// ZIP file magic bytes: PK\x03\x04
const ZIP_MAGIC: [u8; 4] = [0x50, 0x4B, 0x03, 0x04];

/// OLE2 compound document magic bytes (legacy .xls).
const OLE_MAGIC: [u8; 8] = [0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

/// Content type for the XLSX workbook part.
const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml";

/// Content type for the macro-enabled workbook part.
const XLSM_CONTENT_TYPE: &str = "application/vnd.ms-excel.sheet.macroEnabled.main+xml";

/// OpenDocument spreadsheet mimetype.
const ODS_MIMETYPE: &str = "application/vnd.oasis.opendocument.spreadsheet";

/// Detected workbook format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatType {
    /// Office Open XML workbook (.xlsx, .xlsm)
    Xlsx,
    /// Legacy binary workbook (.xls)
    Xls,
    /// OpenDocument spreadsheet (.ods)
    Ods,
}

impl FormatType {
    /// Returns the file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            FormatType::Xlsx => "xlsx",
            FormatType::Xls => "xls",
            FormatType::Ods => "ods",
        }
    }

    /// Returns a human-readable name for this format.
    pub fn name(&self) -> &'static str {
        match self {
            FormatType::Xlsx => "Excel Workbook",
            FormatType::Xls => "Excel 97-2003 Workbook",
            FormatType::Ods => "OpenDocument Spreadsheet",
        }
    }
}

impl std::fmt::Display for FormatType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Detect the workbook format of a file.
///
/// # Example
///
/// ```no_run
/// use sheetdump::detect::detect_format_from_path;
///
/// let format = detect_format_from_path("book.xlsx")?;
/// println!("Detected format: {}", format);
/// # Ok::<(), sheetdump::Error>(())
/// ```
pub fn detect_format_from_path(path: impl AsRef<Path>) -> Result<FormatType> {
    let path = path.as_ref();
    let data = std::fs::read(path).map_err(|e| Error::file_access(path, e))?;
    detect_format_from_bytes(&data)
}

/// Detect the workbook format from file contents.
pub fn detect_format_from_bytes(data: &[u8]) -> Result<FormatType> {
    if data.starts_with(&OLE_MAGIC) {
        return Ok(FormatType::Xls);
    }
    if !is_zip_file(data) {
        return Err(Error::UnknownFormat);
    }

    detect_format_from_reader(Cursor::new(data))
}

/// Detect the format of a ZIP-based workbook.
pub fn detect_format_from_reader<R: Read + Seek>(reader: R) -> Result<FormatType> {
    let mut archive = zip::ZipArchive::new(reader)?;

    if let Ok(mut file) = archive.by_name("mimetype") {
        let mut mimetype = String::new();
        file.read_to_string(&mut mimetype)?;
        if mimetype.trim() == ODS_MIMETYPE {
            return Ok(FormatType::Ods);
        }
    }

    let mut bytes = Vec::new();
    if let Ok(mut file) = archive.by_name("[Content_Types].xml") {
        file.read_to_end(&mut bytes)?;
    }

    if !bytes.is_empty() {
        let content_types = decode_xml_bytes(&bytes)?;
        if content_types.contains(XLSX_CONTENT_TYPE) || content_types.contains(XLSM_CONTENT_TYPE)
        {
            return Ok(FormatType::Xlsx);
        }
    }

    detect_by_folder_structure(&mut archive)
}

/// Fallback detection by checking for the workbook part.
fn detect_by_folder_structure<R: Read + Seek>(
    archive: &mut zip::ZipArchive<R>,
) -> Result<FormatType> {
    if archive.file_names().any(|n| n == "xl/workbook.xml") {
        Ok(FormatType::Xlsx)
    } else {
        Err(Error::UnknownFormat)
    }
}

/// Check if data starts with ZIP magic bytes.
pub fn is_zip_file(data: &[u8]) -> bool {
    data.len() >= 4 && data[..4] == ZIP_MAGIC
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    fn zip_with(entries: &[(&str, &str)]) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        for (name, body) in entries {
            writer.start_file(*name, SimpleFileOptions::default()).unwrap();
            writer.write_all(body.as_bytes()).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_format_type_display() {
        assert_eq!(FormatType::Xlsx.to_string(), "Excel Workbook");
        assert_eq!(FormatType::Ods.extension(), "ods");
    }

    #[test]
    fn test_is_zip_file() {
        assert!(is_zip_file(&[0x50, 0x4B, 0x03, 0x04, 0x00]));
        assert!(!is_zip_file(&[0x00, 0x00, 0x00, 0x00]));
        assert!(!is_zip_file(&[0x50, 0x4B])); // Too short
    }

    #[test]
    fn test_detect_invalid_data() {
        let result = detect_format_from_bytes(&[0x00, 0x00, 0x00, 0x00]);
        assert!(matches!(result, Err(Error::UnknownFormat)));
    }

    #[test]
    fn test_detect_ole() {
        let mut data = OLE_MAGIC.to_vec();
        data.extend_from_slice(&[0u8; 32]);
        assert_eq!(detect_format_from_bytes(&data).unwrap(), FormatType::Xls);
    }

    #[test]
    fn test_detect_xlsx_content_type() {
        let content_types = format!(
            r#"<Types><Override PartName="/xl/workbook.xml" ContentType="{}"/></Types>"#,
            XLSX_CONTENT_TYPE
        );
        let data = zip_with(&[("[Content_Types].xml", &content_types)]);
        assert_eq!(detect_format_from_bytes(&data).unwrap(), FormatType::Xlsx);
    }

    #[test]
    fn test_detect_ods_mimetype() {
        let data = zip_with(&[("mimetype", ODS_MIMETYPE), ("content.xml", "<x/>")]);
        assert_eq!(detect_format_from_bytes(&data).unwrap(), FormatType::Ods);
    }

    #[test]
    fn test_detect_other_package() {
        let data = zip_with(&[("word/document.xml", "<w/>")]);
        assert!(matches!(
            detect_format_from_bytes(&data),
            Err(Error::UnknownFormat)
        ));
    }

    #[test]
    fn test_detect_missing_file() {
        let err = detect_format_from_path("does/not/exist.xlsx").unwrap_err();
        assert!(err.is_file_access());
    }
}
