//! Synthetic sfnt fixtures.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use byteorder::{BigEndian, WriteBytesExt};

/// A face with Windows Unicode family, subfamily and full names.
#[derive(Debug, Clone)]
pub struct TestFace {
    pub family: String,
    pub subfamily: String,
}

impl TestFace {
    pub fn new(family: &str, subfamily: &str) -> Self {
        Self {
            family: family.to_string(),
            subfamily: subfamily.to_string(),
        }
    }

    fn full_name(&self) -> String {
        if self.subfamily.eq_ignore_ascii_case("regular") {
            self.family.clone()
        } else {
            format!("{} {}", self.family, self.subfamily)
        }
    }
}

fn utf16be(text: &str) -> Vec<u8> {
    text.encode_utf16().flat_map(|u| u.to_be_bytes()).collect()
}

fn name_table(face: &TestFace) -> Vec<u8> {
    let names = [
        (1u16, utf16be(&face.family)),
        (2u16, utf16be(&face.subfamily)),
        (4u16, utf16be(&face.full_name())),
    ];

    let mut out = Vec::new();
    out.write_u16::<BigEndian>(0).unwrap();
    out.write_u16::<BigEndian>(names.len() as u16).unwrap();
    out.write_u16::<BigEndian>(6 + 12 * names.len() as u16).unwrap();

    let mut storage = Vec::new();
    for (id, bytes) in &names {
        out.write_u16::<BigEndian>(3).unwrap();
        out.write_u16::<BigEndian>(1).unwrap();
        out.write_u16::<BigEndian>(0x409).unwrap();
        out.write_u16::<BigEndian>(*id).unwrap();
        out.write_u16::<BigEndian>(bytes.len() as u16).unwrap();
        out.write_u16::<BigEndian>(storage.len() as u16).unwrap();
        storage.extend_from_slice(bytes);
    }
    out.extend_from_slice(&storage);
    out
}

/// Offset table, one `name` directory entry and the table, with the table
/// placed relative to `base`.
fn face_bytes(face: &TestFace, base: u32) -> Vec<u8> {
    let table = name_table(face);
    let mut out = Vec::new();
    out.write_u32::<BigEndian>(0x0001_0000).unwrap();
    out.write_u16::<BigEndian>(1).unwrap();
    out.write_u16::<BigEndian>(16).unwrap();
    out.write_u16::<BigEndian>(0).unwrap();
    out.write_u16::<BigEndian>(0).unwrap();

    out.extend_from_slice(b"name");
    out.write_u32::<BigEndian>(0).unwrap();
    out.write_u32::<BigEndian>(base + 12 + 16).unwrap();
    out.write_u32::<BigEndian>(table.len() as u32).unwrap();
    out.extend_from_slice(&table);
    out
}

pub fn ttf_bytes(face: &TestFace) -> Vec<u8> {
    face_bytes(face, 0)
}

pub fn ttc_bytes(faces: &[TestFace]) -> Vec<u8> {
    let header_len = 12 + 4 * faces.len() as u32;
    let mut bodies = Vec::new();
    let mut offsets = Vec::new();
    for face in faces {
        let offset = header_len + bodies.len() as u32;
        offsets.push(offset);
        bodies.extend(face_bytes(face, offset));
    }

    let mut out = Vec::new();
    out.extend_from_slice(b"ttcf");
    out.write_u16::<BigEndian>(1).unwrap();
    out.write_u16::<BigEndian>(0).unwrap();
    out.write_u32::<BigEndian>(faces.len() as u32).unwrap();
    for offset in offsets {
        out.write_u32::<BigEndian>(offset).unwrap();
    }
    out.extend(bodies);
    out
}

pub fn write_ttf(dir: &Path, file: &str, family: &str, subfamily: &str) -> PathBuf {
    let path = dir.join(file);
    fs::write(&path, ttf_bytes(&TestFace::new(family, subfamily))).expect("write ttf");
    path
}

pub fn write_ttc(dir: &Path, file: &str, faces: &[TestFace]) -> PathBuf {
    let path = dir.join(file);
    fs::write(&path, ttc_bytes(faces)).expect("write ttc");
    path
}
