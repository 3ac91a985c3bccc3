//! XLSX styles parsing for number formats.

use std::collections::HashMap;

/// Number format information parsed from xl/styles.xml.
#[derive(Debug, Default)]
pub struct Styles {
    /// Custom number formats: numFmtId -> formatCode
    num_fmts: HashMap<u32, String>,
    /// Cell formats: style index -> numFmtId
    cell_xfs: Vec<u32>,
}

impl Styles {
    /// Parse styles from xl/styles.xml content.
    ///
    /// Styles only refine how numbers are classified, so a malformed part
    /// yields whatever was read before the error.
    pub fn parse(xml: &str) -> Self {
        let mut styles = Self::default();
        let mut reader = quick_xml::Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut buf = Vec::new();
        let mut in_num_fmts = false;
        let mut in_cell_xfs = false;

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(quick_xml::events::Event::Start(ref e)) => match e.local_name().as_ref() {
                    b"numFmts" => in_num_fmts = true,
                    b"cellXfs" => in_cell_xfs = true,
                    b"xf" if in_cell_xfs => styles.cell_xfs.push(num_fmt_id_of(e)),
                    b"numFmt" if in_num_fmts => styles.add_num_fmt(e),
                    _ => {}
                },
                Ok(quick_xml::events::Event::Empty(ref e)) => match e.local_name().as_ref() {
                    b"numFmt" if in_num_fmts => styles.add_num_fmt(e),
                    b"xf" if in_cell_xfs => styles.cell_xfs.push(num_fmt_id_of(e)),
                    _ => {}
                },
                Ok(quick_xml::events::Event::End(ref e)) => match e.local_name().as_ref() {
                    b"numFmts" => in_num_fmts = false,
                    b"cellXfs" => in_cell_xfs = false,
                    _ => {}
                },
                Ok(quick_xml::events::Event::Eof) => break,
                Err(_) => break,
                _ => {}
            }
            buf.clear();
        }

        styles
    }

    fn add_num_fmt(&mut self, e: &quick_xml::events::BytesStart<'_>) {
        let mut num_fmt_id: Option<u32> = None;
        let mut format_code = String::new();
        for attr in e.attributes().flatten() {
            match attr.key.as_ref() {
                b"numFmtId" => {
                    num_fmt_id = String::from_utf8_lossy(&attr.value).parse().ok();
                }
                b"formatCode" => {
                    format_code = attr
                        .unescape_value()
                        .map(|v| v.into_owned())
                        .unwrap_or_else(|_| String::from_utf8_lossy(&attr.value).to_string());
                }
                _ => {}
            }
        }
        if let Some(id) = num_fmt_id {
            self.num_fmts.insert(id, format_code);
        }
    }

    /// Get the numFmtId for a cell style index.
    pub fn get_num_fmt_id(&self, style_index: usize) -> Option<u32> {
        self.cell_xfs.get(style_index).copied()
    }

    /// Check if a cell style index formats its number as a date or time.
    pub fn is_date_style(&self, style_index: usize) -> bool {
        self.get_num_fmt_id(style_index)
            .is_some_and(|id| self.is_date_format(id))
    }

    /// Check if a numFmtId represents a date format.
    pub fn is_date_format(&self, num_fmt_id: u32) -> bool {
        // Built-in formats: 14-22 dates, 45-47 times
        if (14..=22).contains(&num_fmt_id) || (45..=47).contains(&num_fmt_id) {
            return true;
        }

        if let Some(format_code) = self.num_fmts.get(&num_fmt_id) {
            return Self::is_date_format_code(format_code);
        }

        false
    }

    /// Check if a format code string represents a date or time format.
    ///
    /// Bracketed sections (`[Red]`, `[$-409]`), quoted literals and escaped
    /// characters are ignored.
    fn is_date_format_code(format_code: &str) -> bool {
        let mut in_bracket = false;
        let mut in_quote = false;
        let mut chars = format_code.chars();

        while let Some(c) = chars.next() {
            match c {
                '"' => in_quote = !in_quote,
                _ if in_quote => {}
                '[' => in_bracket = true,
                ']' => in_bracket = false,
                _ if in_bracket => {}
                // Escapes and fill/padding directives consume the next char
                '\\' | '_' | '*' => {
                    chars.next();
                }
                _ => {
                    if matches!(c.to_ascii_lowercase(), 'd' | 'm' | 'y' | 'h' | 's') {
                        return true;
                    }
                }
            }
        }

        false
    }
}

fn num_fmt_id_of(e: &quick_xml::events::BytesStart<'_>) -> u32 {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == b"numFmtId")
        .and_then(|attr| String::from_utf8_lossy(&attr.value).parse().ok())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_date_formats() {
        let styles = Styles::default();

        assert!(styles.is_date_format(14)); // m/d/yyyy
        assert!(styles.is_date_format(15)); // d-mmm-yy
        assert!(styles.is_date_format(22)); // m/d/yy h:mm
        assert!(styles.is_date_format(46)); // [h]:mm:ss

        assert!(!styles.is_date_format(0)); // General
        assert!(!styles.is_date_format(1)); // 0
        assert!(!styles.is_date_format(2)); // 0.00
    }

    #[test]
    fn test_custom_date_format_detection() {
        assert!(Styles::is_date_format_code("mmmm\\ d\\,\\ yyyy"));
        assert!(Styles::is_date_format_code("yyyy-mm-dd"));
        assert!(Styles::is_date_format_code("d/m/yy"));
        assert!(Styles::is_date_format_code("[$-409]mmmm\\ d\\,\\ yyyy;@"));
        assert!(Styles::is_date_format_code("hh:mm"));

        assert!(!Styles::is_date_format_code("0.00"));
        assert!(!Styles::is_date_format_code("#,##0"));
        assert!(!Styles::is_date_format_code("\"$\"#,##0.00"));
        assert!(!Styles::is_date_format_code("0.0\" days\""));
        assert!(!Styles::is_date_format_code("[Red]0.00"));
        assert!(!Styles::is_date_format_code("General"));
    }

    #[test]
    fn test_parse_styles() {
        let xml = r#"<styleSheet>
  <numFmts count="2">
    <numFmt numFmtId="164" formatCode="yyyy\-mm\-dd"/>
    <numFmt numFmtId="165" formatCode="0.000"/>
  </numFmts>
  <cellStyleXfs count="1"><xf numFmtId="0"/></cellStyleXfs>
  <cellXfs count="4">
    <xf numFmtId="0" fontId="0"/>
    <xf numFmtId="164" fontId="0" applyNumberFormat="1"/>
    <xf numFmtId="165" fontId="0" applyNumberFormat="1"><alignment horizontal="left"/></xf>
    <xf numFmtId="14" fontId="0" applyNumberFormat="1"/>
  </cellXfs>
</styleSheet>"#;

        let styles = Styles::parse(xml);
        assert_eq!(styles.get_num_fmt_id(1), Some(164));
        assert!(!styles.is_date_style(0));
        assert!(styles.is_date_style(1));
        assert!(!styles.is_date_style(2));
        assert!(styles.is_date_style(3));
        assert!(!styles.is_date_style(99));
    }
}
