//! End-to-end exports of a generated OpenDocument spreadsheet.
//!
//! Run with: cargo test --test export_ods

#![cfg(feature = "legacy")]

use sheetdump::{export, FormatType, RenderOptions};
use std::fs;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use zip::write::SimpleFileOptions;
use zip::CompressionMethod;

const MIMETYPE: &str = "application/vnd.oasis.opendocument.spreadsheet";

const MANIFEST: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<manifest:manifest xmlns:manifest="urn:oasis:names:tc:opendocument:xmlns:manifest:1.0" manifest:version="1.2">
  <manifest:file-entry manifest:full-path="/" manifest:media-type="application/vnd.oasis.opendocument.spreadsheet"/>
  <manifest:file-entry manifest:full-path="content.xml" manifest:media-type="text/xml"/>
</manifest:manifest>"#;

const CONTENT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<office:document-content xmlns:office="urn:oasis:names:tc:opendocument:xmlns:office:1.0" xmlns:table="urn:oasis:names:tc:opendocument:xmlns:table:1.0" xmlns:text="urn:oasis:names:tc:opendocument:xmlns:text:1.0" office:version="1.2">
  <office:body>
    <office:spreadsheet>
      <table:table table:name="Intro">
        <table:table-row>
          <table:table-cell office:value-type="string"><text:p>Read me</text:p></table:table-cell>
        </table:table-row>
      </table:table>
      <table:table table:name="Traits">
        <table:table-row>
          <table:table-cell office:value-type="string"><text:p>Name</text:p></table:table-cell>
          <table:table-cell office:value-type="string"><text:p>Value</text:p></table:table-cell>
        </table:table-row>
        <table:table-row>
          <table:table-cell office:value-type="string"><text:p>Alpha</text:p></table:table-cell>
          <table:table-cell office:value-type="float" office:value="1"><text:p>1</text:p></table:table-cell>
        </table:table-row>
        <table:table-row>
          <table:table-cell office:value-type="boolean" office:boolean-value="true"><text:p>TRUE</text:p></table:table-cell>
          <table:table-cell/>
          <table:table-cell office:value-type="date" office:date-value="2024-01-02"><text:p>01/02/24</text:p></table:table-cell>
        </table:table-row>
      </table:table>
    </office:spreadsheet>
  </office:body>
</office:document-content>"#;

fn ods_bytes(parts: &[(&str, &str)]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let stored = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
    for (name, body) in parts {
        let options = if *name == "mimetype" {
            stored
        } else {
            SimpleFileOptions::default()
        };
        writer.start_file(*name, options).unwrap();
        writer.write_all(body.as_bytes()).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

fn write_ods(dir: &Path) -> PathBuf {
    let path = dir.join("planning.ods");
    let data = ods_bytes(&[
        ("mimetype", MIMETYPE),
        ("META-INF/manifest.xml", MANIFEST),
        ("content.xml", CONTENT),
    ]);
    fs::write(&path, data).unwrap();
    path
}

#[test]
fn opens_ods_through_legacy_reader() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_ods(dir.path());

    assert_eq!(
        sheetdump::detect_format_from_path(&path).unwrap(),
        FormatType::Ods
    );

    let mut book = sheetdump::open_workbook(&path).unwrap();
    assert_eq!(book.sheet_count(), 2);
    assert_eq!(book.sheet_names(), vec!["Intro", "Traits"]);
    assert_eq!(book.sheet(0).unwrap().row_count(), 1);
}

#[test]
fn exports_ods_sheet() {
    let dir = tempfile::tempdir().unwrap();
    let workbook = write_ods(dir.path());
    let output = dir.path().join("traits.txt");

    let summary = export(&workbook, &output, 1, &RenderOptions::default()).unwrap();

    assert_eq!(summary.sheet_name, "Traits");
    assert_eq!(summary.rows, 3);
    assert_eq!(summary.columns, 3);
    assert_eq!(
        fs::read_to_string(&output).unwrap(),
        "Name\tValue\t\t\nAlpha\t1.0\t\t\n1\t\t2024-01-02\t\n"
    );
}

#[test]
fn exports_ods_sheet_plain() {
    let dir = tempfile::tempdir().unwrap();
    let workbook = write_ods(dir.path());
    let output = dir.path().join("traits.txt");

    export(&workbook, &output, 1, &RenderOptions::plain()).unwrap();

    assert_eq!(
        fs::read_to_string(&output).unwrap(),
        "Name\tValue\t\nAlpha\t1\t\nTRUE\t\t2024-01-02\n"
    );
}

#[test]
fn ods_out_of_range_leaves_output_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let workbook = write_ods(dir.path());
    let output = dir.path().join("keep.txt");
    fs::write(&output, "keep me").unwrap();

    let err = export(&workbook, &output, 2, &RenderOptions::default()).unwrap_err();

    assert!(err.is_out_of_range());
    assert_eq!(fs::read_to_string(&output).unwrap(), "keep me");
}

#[test]
fn damaged_ods_reports_missing_part() {
    let dir = tempfile::tempdir().unwrap();
    let workbook = dir.path().join("damaged.ods");
    fs::write(
        &workbook,
        ods_bytes(&[("mimetype", MIMETYPE), ("content.xml", CONTENT)]),
    )
    .unwrap();
    let output = dir.path().join("out.txt");

    let err = export(&workbook, &output, 0, &RenderOptions::default()).unwrap_err();

    assert!(err.is_format());
    assert!(err.to_string().contains("manifest.xml"), "{}", err);
    assert!(!output.exists());
}
