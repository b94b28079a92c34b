//! TrueType/OpenType collections (`.ttc`).

use std::fs;
use std::io::{Cursor, Read};
use std::path::Path;

use crate::error::DecodeError;
use crate::record::FontRecord;
use crate::sfnt::{extract_face, extract_font, read_u16, read_u32};

const TAG_TTCF: [u8; 4] = *b"ttcf";

/// Read every face of a collection file.
pub fn extract_collection(path: &Path) -> Result<Vec<FontRecord>, DecodeError> {
    let data = fs::read(path)?;
    extract_collection_data(&data, path)
}

pub fn extract_collection_data(data: &[u8], path: &Path) -> Result<Vec<FontRecord>, DecodeError> {
    let mut cur = Cursor::new(data);

    let mut tag = [0u8; 4];
    cur.read_exact(&mut tag)
        .map_err(|e| DecodeError::short_read(e, "collection header"))?;
    if tag != TAG_TTCF {
        return Err(DecodeError::NotACollection {
            found: String::from_utf8_lossy(&tag).into_owned(),
        });
    }
    let _major = read_u16(&mut cur, "collection header")?;
    let _minor = read_u16(&mut cur, "collection header")?;
    let count = read_u32(&mut cur, "collection header")?;

    let offsets = (0..count)
        .map(|_| read_u32(&mut cur, "collection offsets"))
        .collect::<Result<Vec<_>, _>>()?;

    offsets
        .into_iter()
        .map(|offset| extract_face(data, path, offset))
        .collect()
}

/// Dispatch on the file extension: `.ttc` is a collection, anything else a
/// single font.
pub fn extract_any(path: &Path) -> Result<Vec<FontRecord>, DecodeError> {
    let is_collection = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("ttc"));

    if is_collection {
        extract_collection(path)
    } else {
        extract_font(path).map(|record| vec![record])
    }
}
