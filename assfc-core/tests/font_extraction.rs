mod common;

use std::collections::BTreeSet;
use std::fs;

use assfc_core::collection::{extract_any, extract_collection};
use assfc_core::error::DecodeError;
use assfc_core::sfnt::extract_font;
use common::{write_ttc, write_ttf, TestFace};
use tempfile::tempdir;

fn names(list: &[&str]) -> BTreeSet<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[test]
fn single_font_names_and_style() {
    let tmp = tempdir().expect("tempdir");
    let path = write_ttf(tmp.path(), "jorvik-bi.ttf", "Jorvik", "Bold Italic");

    let record = extract_font(&path).expect("extract");
    assert_eq!(record.names, names(&["Jorvik", "Jorvik Bold Italic"]));
    assert_eq!(record.weight, 700);
    assert!(record.slant);
    assert_eq!(record.path, path);
    assert_eq!(record.face_offset, 0);
}

#[test]
fn collection_yields_one_record_per_face() {
    let tmp = tempdir().expect("tempdir");
    let path = write_ttc(
        tmp.path(),
        "family.ttc",
        &[TestFace::new("Alpha", "Regular"), TestFace::new("Beta", "Italic")],
    );

    let records = extract_collection(&path).expect("extract");
    assert_eq!(records.len(), 2);
    assert!(records.iter().all(|r| r.path == path));
    assert_ne!(records[0].names, records[1].names);
    assert_ne!(records[0].face_offset, records[1].face_offset);

    assert_eq!(records[0].names, names(&["Alpha"]));
    assert!(!records[0].slant);
    assert_eq!(records[1].names, names(&["Beta", "Beta Italic"]));
    assert!(records[1].slant);
    assert_eq!(records[1].weight, 400);
}

#[test]
fn extension_selects_container_kind() {
    let tmp = tempdir().expect("tempdir");
    let ttc = write_ttc(tmp.path(), "pair.TTC", &[TestFace::new("A", "Regular"), TestFace::new("B", "Bold")]);
    let ttf = write_ttf(tmp.path(), "single.otf", "C", "Regular");

    assert_eq!(extract_any(&ttc).expect("ttc").len(), 2);
    assert_eq!(extract_any(&ttf).expect("ttf").len(), 1);
}

#[test]
fn collection_header_is_checked() {
    let tmp = tempdir().expect("tempdir");
    let path = write_ttf(tmp.path(), "renamed.ttc", "A", "Regular");

    let err = extract_any(&path).unwrap_err();
    assert!(matches!(err, DecodeError::NotACollection { .. }));
}

#[test]
fn garbage_is_rejected() {
    let tmp = tempdir().expect("tempdir");
    let path = tmp.path().join("garbage.ttf");
    fs::write(&path, b"this is not a font at all").expect("write");

    let err = extract_font(&path).unwrap_err();
    assert!(matches!(err, DecodeError::BadMagic { .. }));
}

#[test]
fn missing_file_is_an_io_error() {
    let err = extract_font(std::path::Path::new("/nonexistent/assfc/font.ttf")).unwrap_err();
    assert!(matches!(err, DecodeError::Io(_)));
}
