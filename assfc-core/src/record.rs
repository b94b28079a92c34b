//! Per-face font metadata.

use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::PathBuf;

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use xxhash_rust::xxh3::Xxh3;

use crate::style::Weight;

/// What the matcher needs to know about one face.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FontRecord {
    /// Family and full names, as found in the name table.
    pub names: BTreeSet<String>,
    /// 400 or 700.
    pub weight: u16,
    pub slant: bool,
    pub path: PathBuf,
    /// Offset of the face's offset table; 0 for single fonts.
    pub face_offset: u32,
    #[serde(skip)]
    content_hash: OnceCell<String>,
}

impl FontRecord {
    pub fn new(
        names: BTreeSet<String>,
        weight: u16,
        slant: bool,
        path: impl Into<PathBuf>,
        face_offset: u32,
    ) -> Self {
        Self {
            names,
            weight,
            slant,
            path: path.into(),
            face_offset,
            content_hash: OnceCell::new(),
        }
    }

    pub fn weight(&self) -> Weight {
        Weight(u32::from(self.weight))
    }

    pub fn is_bold(&self) -> bool {
        self.weight().is_bold()
    }

    /// Upright and not bold.
    pub fn is_plain(&self) -> bool {
        !self.is_bold() && !self.slant
    }

    /// Lower-cased names, deduplicated.
    pub fn folded_names(&self) -> BTreeSet<String> {
        self.names.iter().map(|n| n.to_lowercase()).collect()
    }

    /// 128-bit xxh3 of the whole file, hex encoded.
    ///
    /// Computed on first access; faces of one collection share the value.
    pub fn content_hash(&self) -> io::Result<&str> {
        self.content_hash
            .get_or_try_init(|| {
                let data = fs::read(&self.path)?;
                let mut hasher = Xxh3::new();
                hasher.update(&data);
                Ok::<_, io::Error>(format!("{:032x}", hasher.digest128()))
            })
            .map(String::as_str)
    }
}

impl PartialEq for FontRecord {
    fn eq(&self, other: &Self) -> bool {
        self.names == other.names
            && self.weight == other.weight
            && self.slant == other.slant
            && self.path == other.path
            && self.face_offset == other.face_offset
    }
}

impl Eq for FontRecord {}
