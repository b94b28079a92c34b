//! On-disk font cache: a versioned JSON file of extracted records.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::record::FontRecord;

/// Bumped whenever the record layout changes; older files are ignored.
pub const CACHE_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct CacheFile {
    version: u32,
    #[serde(flatten)]
    contents: CacheContents,
}

/// Everything the cache remembers about a font file set.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheContents {
    pub fonts: Vec<FontRecord>,
    /// Files that yielded no faces, so they are not read again.
    #[serde(default)]
    pub rejected: Vec<PathBuf>,
}

/// Location of the cache file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheStore {
    path: PathBuf,
}

impl CacheStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Previously saved contents.
    ///
    /// A missing, unreadable or outdated file is an empty cache.
    pub fn load(&self) -> CacheContents {
        let raw = match fs::read(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!("no font cache at {}", self.path.display());
                return CacheContents::default();
            }
            Err(err) => {
                warn!("cannot read font cache {}: {err}", self.path.display());
                return CacheContents::default();
            }
        };

        match serde_json::from_slice::<CacheFile>(&raw) {
            Ok(file) if file.version == CACHE_VERSION => file.contents,
            Ok(file) => {
                debug!(
                    "ignoring font cache {} with version {}",
                    self.path.display(),
                    file.version
                );
                CacheContents::default()
            }
            Err(err) => {
                warn!("ignoring corrupt font cache {}: {err}", self.path.display());
                CacheContents::default()
            }
        }
    }

    /// Replace the cache contents, creating parent directories as needed.
    pub fn save(&self, contents: &CacheContents) -> Result<()> {
        let write_err = |source: io::Error| Error::CacheWrite {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(write_err)?;
            }
        }

        let file = CacheFile {
            version: CACHE_VERSION,
            contents: contents.clone(),
        };
        let json = serde_json::to_vec(&file).map_err(|e| write_err(e.into()))?;
        fs::write(&self.path, json).map_err(write_err)?;
        debug!(
            "saved {} records and {} rejected files to {}",
            contents.fonts.len(),
            contents.rejected.len(),
            self.path.display()
        );
        Ok(())
    }

    /// Delete the cache file. Returns whether one existed.
    pub fn discard(&self) -> Result<bool> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(source) => Err(Error::CacheWrite {
                path: self.path.clone(),
                source,
            }),
        }
    }
}
