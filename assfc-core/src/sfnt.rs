//! Minimal sfnt reader: just enough of the offset table and `name` table
//! to learn a face's names, weight and slant.

use std::collections::BTreeSet;
use std::fs;
use std::io::{Cursor, Read};
use std::path::Path;

use byteorder::{BigEndian, ReadBytesExt};
use log::debug;

use crate::encoding::decode_name;
use crate::error::DecodeError;
use crate::record::FontRecord;

const VERSION_TRUETYPE: u32 = 0x0001_0000;
const VERSION_CFF: u32 = u32::from_be_bytes(*b"OTTO");
const VERSION_APPLE: u32 = u32::from_be_bytes(*b"true");
const VERSION_TYPE1: u32 = u32::from_be_bytes(*b"typ1");

const TAG_NAME: [u8; 4] = *b"name";

const NAME_FAMILY: u16 = 1;
const NAME_SUBFAMILY: u16 = 2;
const NAME_FULL: u16 = 4;

/// Read a single-face font file.
pub fn extract_font(path: &Path) -> Result<FontRecord, DecodeError> {
    let data = fs::read(path)?;
    extract_face(&data, path, 0)
}

/// Read the face whose offset table starts at `offset` within `data`.
pub fn extract_face(data: &[u8], path: &Path, offset: u32) -> Result<FontRecord, DecodeError> {
    let mut cur = Cursor::new(data);
    cur.set_position(u64::from(offset));

    let version = read_u32(&mut cur, "sfnt version")?;
    if !matches!(
        version,
        VERSION_TRUETYPE | VERSION_CFF | VERSION_APPLE | VERSION_TYPE1
    ) {
        return Err(DecodeError::BadMagic { found: version });
    }
    let num_tables = read_u16(&mut cur, "offset table")?;
    // searchRange, entrySelector, rangeShift
    skip(&mut cur, 6, "offset table")?;

    let mut name_table = None;
    for _ in 0..num_tables {
        let mut tag = [0u8; 4];
        cur.read_exact(&mut tag)
            .map_err(|e| DecodeError::short_read(e, "table directory"))?;
        let _checksum = read_u32(&mut cur, "table directory")?;
        let table_offset = read_u32(&mut cur, "table directory")?;
        let _length = read_u32(&mut cur, "table directory")?;
        if tag == TAG_NAME {
            name_table = Some(table_offset);
            break;
        }
    }
    let table_offset = name_table.ok_or(DecodeError::MissingNameTable)?;

    let info = read_name_table(data, table_offset)?;
    debug!(
        "{}@{offset}: names {:?}, weight {}, slant {}",
        path.display(),
        info.names,
        info.weight,
        info.slant
    );
    Ok(FontRecord::new(
        info.names,
        info.weight,
        info.slant,
        path,
        offset,
    ))
}

#[derive(Debug, Default)]
struct NameInfo {
    names: BTreeSet<String>,
    weight: u16,
    slant: bool,
}

fn read_name_table(data: &[u8], table_offset: u32) -> Result<NameInfo, DecodeError> {
    let mut cur = Cursor::new(data);
    cur.set_position(u64::from(table_offset));

    let _format = read_u16(&mut cur, "name table header")?;
    let count = read_u16(&mut cur, "name table header")?;
    let storage_offset = read_u16(&mut cur, "name table header")?;
    let storage = u64::from(table_offset) + u64::from(storage_offset);

    let mut info = NameInfo {
        weight: 400,
        ..NameInfo::default()
    };

    for _ in 0..count {
        let platform_id = read_u16(&mut cur, "name record")?;
        let encoding_id = read_u16(&mut cur, "name record")?;
        let _language_id = read_u16(&mut cur, "name record")?;
        let name_id = read_u16(&mut cur, "name record")?;
        let length = read_u16(&mut cur, "name record")?;
        let string_offset = read_u16(&mut cur, "name record")?;

        if !matches!(name_id, NAME_FAMILY | NAME_SUBFAMILY | NAME_FULL) {
            continue;
        }

        let start = storage + u64::from(string_offset);
        let bytes = string_bytes(data, start, length)?;
        let Some(value) = decode_name(platform_id, encoding_id, bytes) else {
            debug!(
                "skipping name {name_id} (platform {platform_id}, encoding {encoding_id}): cannot decode"
            );
            continue;
        };

        match name_id {
            NAME_SUBFAMILY => {
                let lower = value.to_lowercase();
                if lower.contains("bold") {
                    info.weight = 700;
                }
                if lower.contains("italic") {
                    info.slant = true;
                }
            }
            _ => {
                let trimmed = value.trim();
                if !trimmed.is_empty() {
                    info.names.insert(trimmed.to_string());
                }
            }
        }
    }

    Ok(info)
}

fn string_bytes(data: &[u8], start: u64, length: u16) -> Result<&[u8], DecodeError> {
    usize::try_from(start)
        .ok()
        .and_then(|start| data.get(start..start.checked_add(usize::from(length))?))
        .ok_or(DecodeError::Truncated {
            what: "name string",
        })
}

pub(crate) fn read_u32(cur: &mut Cursor<&[u8]>, what: &'static str) -> Result<u32, DecodeError> {
    cur.read_u32::<BigEndian>()
        .map_err(|e| DecodeError::short_read(e, what))
}

pub(crate) fn read_u16(cur: &mut Cursor<&[u8]>, what: &'static str) -> Result<u16, DecodeError> {
    cur.read_u16::<BigEndian>()
        .map_err(|e| DecodeError::short_read(e, what))
}

fn skip(cur: &mut Cursor<&[u8]>, n: u64, what: &'static str) -> Result<(), DecodeError> {
    let pos = cur.position() + n;
    if pos > cur.get_ref().len() as u64 {
        return Err(DecodeError::Truncated { what });
    }
    cur.set_position(pos);
    Ok(())
}
