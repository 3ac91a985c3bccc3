//! XLSX workbook reader implementation.

use crate::container::{OoxmlContainer, Relationships};
use crate::error::{Error, Result};
use crate::model::{CellError, CellValue, DateSystem, Sheet, Workbook};
use quick_xml::events::{BytesStart, Event};
use std::path::Path;

use super::shared_strings::SharedStrings;
use super::styles::Styles;

const WORKBOOK_PART: &str = "xl/workbook.xml";

/// Sheet entry from workbook.xml.
#[derive(Debug, Clone)]
struct SheetInfo {
    name: String,
    rel_id: String,
}

/// Reader for XLSX (Excel) workbooks.
pub struct XlsxWorkbook {
    container: OoxmlContainer,
    shared_strings: SharedStrings,
    styles: Styles,
    sheets: Vec<SheetInfo>,
    relationships: Relationships,
    date_system: DateSystem,
}

impl XlsxWorkbook {
    /// Open an XLSX file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let container = OoxmlContainer::open(path)?;
        Self::from_container(container)
    }

    /// Create a reader from file contents.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let container = OoxmlContainer::from_bytes(data)?;
        Self::from_container(container)
    }

    fn from_container(container: OoxmlContainer) -> Result<Self> {
        let workbook_xml = container.read_xml(WORKBOOK_PART)?;
        let (sheets, date_system) = Self::parse_workbook(&workbook_xml)?;
        let relationships = container.read_relationships(WORKBOOK_PART)?;

        let shared_strings = match container.read_xml("xl/sharedStrings.xml") {
            Ok(xml) => SharedStrings::parse(&xml)?,
            Err(Error::MissingComponent(_)) => SharedStrings::default(),
            Err(e) => return Err(e),
        };

        let styles = match container.read_xml("xl/styles.xml") {
            Ok(xml) => Styles::parse(&xml),
            Err(Error::MissingComponent(_)) => Styles::default(),
            Err(e) => return Err(e),
        };

        Ok(Self {
            container,
            shared_strings,
            styles,
            sheets,
            relationships,
            date_system,
        })
    }

    /// Parse workbook.xml for sheet names and relationship ids, in tab order,
    /// and the date system from `workbookPr`.
    fn parse_workbook(xml: &str) -> Result<(Vec<SheetInfo>, DateSystem)> {
        let mut sheets = Vec::new();
        let mut date_system = DateSystem::Excel1900;
        let mut reader = quick_xml::Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut buf = Vec::new();
        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Empty(e)) | Ok(Event::Start(e))
                    if e.local_name().as_ref() == b"workbookPr" =>
                {
                    let date1904 = e
                        .attributes()
                        .flatten()
                        .find(|attr| attr.key.local_name().as_ref() == b"date1904")
                        .is_some_and(|attr| matches!(attr.value.as_ref(), b"1" | b"true"));
                    if date1904 {
                        date_system = DateSystem::Excel1904;
                    }
                }
                Ok(Event::Empty(e)) | Ok(Event::Start(e)) if e.local_name().as_ref() == b"sheet" => {
                    let mut name = String::new();
                    let mut rel_id = String::new();

                    for attr in e.attributes().flatten() {
                        match attr.key.as_ref() {
                            b"name" => {
                                name = attr
                                    .unescape_value()
                                    .map(|v| v.into_owned())
                                    .unwrap_or_else(|_| {
                                        String::from_utf8_lossy(&attr.value).to_string()
                                    });
                            }
                            // r:id under whatever prefix the producer chose
                            key if key.ends_with(b":id") => {
                                rel_id = String::from_utf8_lossy(&attr.value).to_string();
                            }
                            _ => {}
                        }
                    }

                    sheets.push(SheetInfo { name, rel_id });
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(Error::XmlParse(e.to_string())),
                _ => {}
            }
            buf.clear();
        }

        Ok((sheets, date_system))
    }

    /// Locate the worksheet part for a sheet, if it is a worksheet.
    fn worksheet_path(&self, info: &SheetInfo) -> Option<String> {
        let rel = self.relationships.get(&info.rel_id)?;
        if rel.kind() != "worksheet" {
            return None;
        }
        Some(OoxmlContainer::resolve_path(WORKBOOK_PART, &rel.target))
    }

    /// Parse a worksheet part into a sheet grid.
    fn parse_sheet(&self, name: &str, xml: &str) -> Result<Sheet> {
        let mut sheet = Sheet::new(name).with_date_system(self.date_system);
        let mut reader = quick_xml::Reader::from_str(xml);
        reader.config_mut().trim_text(false);

        let mut buf = Vec::new();
        let mut next_row = 0usize;
        let mut next_col = 0usize;
        let mut cell: Option<PendingCell> = None;
        let mut in_value = false;
        let mut in_inline = false;
        let mut phonetic_depth = 0usize;

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) => match e.local_name().as_ref() {
                    b"row" => {
                        let row = row_index_of(e)?.unwrap_or(next_row);
                        next_row = row;
                        next_col = 0;
                    }
                    b"c" => {
                        cell = Some(PendingCell::start(e, next_row, next_col)?);
                    }
                    b"v" if cell.is_some() => {
                        in_value = true;
                        if let Some(c) = cell.as_mut() {
                            c.has_value = true;
                        }
                    }
                    b"is" if cell.is_some() => in_inline = true,
                    b"rPh" if in_inline => phonetic_depth += 1,
                    b"t" if in_inline && phonetic_depth == 0 => {
                        in_value = true;
                        if let Some(c) = cell.as_mut() {
                            c.has_value = true;
                        }
                    }
                    _ => {}
                },
                Ok(Event::Empty(ref e)) => match e.local_name().as_ref() {
                    b"row" => {
                        next_row = row_index_of(e)?.unwrap_or(next_row) + 1;
                    }
                    // A self-closing cell carries no value
                    b"c" => {
                        let pending = PendingCell::start(e, next_row, next_col)?;
                        next_col = pending.col + 1;
                    }
                    b"v" => {
                        if let Some(c) = cell.as_mut() {
                            c.has_value = true;
                        }
                    }
                    _ => {}
                },
                Ok(Event::Text(ref e)) => {
                    if in_value {
                        if let Some(c) = cell.as_mut() {
                            let text = e.unescape().map_err(|e| Error::XmlParse(e.to_string()))?;
                            c.raw.push_str(&text);
                        }
                    }
                }
                Ok(Event::CData(ref e)) => {
                    if in_value {
                        if let Some(c) = cell.as_mut() {
                            c.raw.push_str(&String::from_utf8_lossy(e));
                        }
                    }
                }
                Ok(Event::End(ref e)) => match e.local_name().as_ref() {
                    b"row" => next_row += 1,
                    b"c" => {
                        if let Some(pending) = cell.take() {
                            next_col = pending.col + 1;
                            if pending.has_value {
                                let value = self.resolve_cell_value(&pending)?;
                                sheet.set(pending.row, pending.col, value)?;
                            }
                        }
                        in_value = false;
                        in_inline = false;
                    }
                    b"v" => in_value = false,
                    b"t" => in_value = false,
                    b"rPh" => phonetic_depth = phonetic_depth.saturating_sub(1),
                    b"is" => in_inline = false,
                    _ => {}
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(Error::XmlParse(e.to_string())),
                _ => {}
            }
            buf.clear();
        }

        Ok(sheet)
    }

    /// Turn the raw text of a cell into a typed value.
    fn resolve_cell_value(&self, cell: &PendingCell) -> Result<CellValue> {
        let raw = cell.raw.as_str();
        let value = match cell.cell_type.as_deref() {
            Some("s") => {
                let idx: usize = raw.trim().parse().map_err(|_| {
                    Error::Format(format!(
                        "invalid shared string index {:?} in cell {}",
                        raw,
                        cell.reference()
                    ))
                })?;
                let text = self.shared_strings.get(idx).ok_or_else(|| {
                    Error::Format(format!(
                        "shared string {} missing (table has {}) in cell {}",
                        idx,
                        self.shared_strings.len(),
                        cell.reference()
                    ))
                })?;
                CellValue::text(text)
            }
            Some("b") => CellValue::Bool(matches!(raw.trim(), "1" | "true" | "TRUE")),
            Some("e") => match CellError::from_text(raw) {
                Some(err) => CellValue::Error(err),
                None => CellValue::text(raw),
            },
            Some("str") | Some("inlineStr") | Some("d") => CellValue::text(raw),
            _ => {
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    return Ok(CellValue::Empty);
                }
                let number: f64 = trimmed.parse().map_err(|_| {
                    Error::Format(format!(
                        "invalid number {:?} in cell {}",
                        raw,
                        cell.reference()
                    ))
                })?;
                match cell.style {
                    Some(style) if self.styles.is_date_style(style) => CellValue::DateTime(number),
                    _ => CellValue::Number(number),
                }
            }
        };
        Ok(value)
    }
}

impl Workbook for XlsxWorkbook {
    fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    fn sheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|s| s.name.clone()).collect()
    }

    fn sheet(&mut self, index: usize) -> Result<Sheet> {
        self.check_index(index)?;
        let info = &self.sheets[index];

        let Some(path) = self.worksheet_path(info) else {
            return Ok(Sheet::new(info.name.clone()).with_date_system(self.date_system));
        };
        let xml = self.container.read_xml(&path)?;
        self.parse_sheet(&info.name, &xml)
    }
}

impl std::fmt::Debug for XlsxWorkbook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("XlsxWorkbook")
            .field("sheets", &self.sheet_names())
            .field("shared_strings", &self.shared_strings.len())
            .finish()
    }
}

/// A `<c>` element being read.
#[derive(Debug)]
struct PendingCell {
    row: usize,
    col: usize,
    cell_type: Option<String>,
    style: Option<usize>,
    raw: String,
    has_value: bool,
}

impl PendingCell {
    fn start(e: &BytesStart<'_>, row: usize, col: usize) -> Result<Self> {
        let mut cell = Self {
            row,
            col,
            cell_type: None,
            style: None,
            raw: String::new(),
            has_value: false,
        };

        for attr in e.attributes().flatten() {
            match attr.key.as_ref() {
                b"r" => {
                    let reference = String::from_utf8_lossy(&attr.value);
                    let (ref_row, ref_col) = parse_cell_ref(&reference).ok_or_else(|| {
                        Error::Format(format!("invalid cell reference {:?}", reference))
                    })?;
                    cell.col = ref_col;
                    if let Some(r) = ref_row {
                        cell.row = r;
                    }
                }
                b"t" => cell.cell_type = Some(String::from_utf8_lossy(&attr.value).to_string()),
                b"s" => cell.style = String::from_utf8_lossy(&attr.value).parse().ok(),
                _ => {}
            }
        }

        Ok(cell)
    }

    fn reference(&self) -> String {
        format!("{}{}", column_name(self.col), self.row + 1)
    }
}

/// Zero-based row index from a `<row r="...">` element.
fn row_index_of(e: &BytesStart<'_>) -> Result<Option<usize>> {
    for attr in e.attributes().flatten() {
        if attr.key.as_ref() == b"r" {
            let text = String::from_utf8_lossy(&attr.value);
            return match text.trim().parse::<usize>() {
                Ok(n) if n >= 1 => Ok(Some(n - 1)),
                _ => Err(Error::Format(format!("invalid row number {:?}", text))),
            };
        }
    }
    Ok(None)
}

/// Split an A1-style reference into zero-based (row, column).
///
/// The row part is optional; `"C"` yields `(None, 2)`.
fn parse_cell_ref(reference: &str) -> Option<(Option<usize>, usize)> {
    let reference = reference.trim().trim_start_matches('$');
    let letters_end = reference
        .find(|c: char| !c.is_ascii_alphabetic())
        .unwrap_or(reference.len());
    let (letters, digits) = reference.split_at(letters_end);
    if letters.is_empty() {
        return None;
    }

    let mut col = 0usize;
    for c in letters.chars() {
        col = col
            .checked_mul(26)?
            .checked_add((c.to_ascii_uppercase() as u8 - b'A') as usize + 1)?;
    }

    let digits = digits.trim_start_matches('$');
    let row = if digits.is_empty() {
        None
    } else {
        let n: usize = digits.parse().ok()?;
        Some(n.checked_sub(1)?)
    };

    Some((row, col - 1))
}

/// Column letters for a zero-based column index.
fn column_name(mut col: usize) -> String {
    let mut name = Vec::new();
    loop {
        name.push(b'A' + (col % 26) as u8);
        if col < 26 {
            break;
        }
        col = col / 26 - 1;
    }
    name.reverse();
    String::from_utf8_lossy(&name).into_owned()
}
