//! In-memory font index, kept in sync with the on-disk cache.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::{Path, PathBuf};

use log::{debug, error, info, warn};
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;

use crate::cache::{CacheContents, CacheStore};
use crate::collection::extract_any;
use crate::error::{DecodeError, Error, Result};
use crate::record::FontRecord;

#[derive(Debug, Default, Clone)]
pub struct IndexOptions {
    /// Worker threads for extraction; `None` uses the global rayon pool.
    pub jobs: Option<usize>,
}

/// What a build changed relative to the cache.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct IndexDelta {
    /// Files extracted because the cache did not know them.
    pub added: usize,
    /// Cached files no longer present.
    pub removed: usize,
    /// Added files that could not be decoded.
    pub failed: usize,
}

impl IndexDelta {
    pub fn is_unchanged(&self) -> bool {
        self.added == 0 && self.removed == 0
    }
}

/// Font records in path then face-offset order, with a lookup by name.
#[derive(Debug, Default, Clone)]
pub struct FontIndex {
    faces: Vec<FontRecord>,
    /// Lower-cased name to positions in `faces`, ascending.
    by_name: HashMap<String, Vec<usize>>,
    /// Files that produced no faces.
    rejected: BTreeSet<PathBuf>,
    file_count: usize,
}

type ByPath = BTreeMap<PathBuf, Vec<FontRecord>>;

fn group_by_path(records: impl IntoIterator<Item = FontRecord>) -> ByPath {
    let mut by_path = ByPath::new();
    for record in records {
        by_path.entry(record.path.clone()).or_default().push(record);
    }
    by_path
}

impl FontIndex {
    pub fn from_records(records: impl IntoIterator<Item = FontRecord>) -> Self {
        Self::assemble(group_by_path(records), BTreeSet::new())
    }

    fn assemble(by_path: ByPath, rejected: BTreeSet<PathBuf>) -> Self {
        let file_count = by_path.len();
        let mut faces = Vec::new();
        for (_, mut records) in by_path {
            records.sort_by_key(|r| r.face_offset);
            faces.extend(records);
        }

        let mut by_name: HashMap<String, Vec<usize>> = HashMap::new();
        for (i, face) in faces.iter().enumerate() {
            for name in face.folded_names() {
                by_name.entry(name).or_default().push(i);
            }
        }

        Self {
            faces,
            by_name,
            rejected,
            file_count,
        }
    }

    /// Reconcile the cache with `files` and extract whatever is new.
    ///
    /// Files that fail to decode or hold no faces are remembered as rejected
    /// and not read again while they stay in the file set. The cache file is
    /// rewritten only when the file set changed.
    pub fn build(
        files: &[PathBuf],
        store: &CacheStore,
        opts: &IndexOptions,
    ) -> Result<(FontIndex, IndexDelta)> {
        let cached = store.load();
        let mut by_path = group_by_path(cached.fonts);
        let mut rejected: BTreeSet<PathBuf> = cached.rejected.into_iter().collect();
        let wanted: BTreeSet<&Path> = files.iter().map(PathBuf::as_path).collect();

        let removed: Vec<PathBuf> = by_path
            .keys()
            .chain(rejected.iter())
            .filter(|p| !wanted.contains(p.as_path()))
            .cloned()
            .collect();
        let added: Vec<PathBuf> = wanted
            .iter()
            .filter(|p| !by_path.contains_key(**p) && !rejected.contains(**p))
            .map(|p| p.to_path_buf())
            .collect();

        for path in &removed {
            by_path.remove(path);
            rejected.remove(path);
        }

        let mut delta = IndexDelta {
            added: added.len(),
            removed: removed.len(),
            failed: 0,
        };
        debug!(
            "font index: {} cached, {} rejected, {} to add, {} removed",
            by_path.len(),
            rejected.len(),
            delta.added,
            delta.removed
        );

        for (path, outcome) in extract_all(&added, opts) {
            match outcome {
                Ok(records) if records.is_empty() => {
                    warn!("{} contains no font faces", path.display());
                    rejected.insert(path);
                }
                Ok(records) => {
                    by_path.insert(path, records);
                }
                Err(source) => {
                    delta.failed += 1;
                    rejected.insert(path.clone());
                    error!("{}", Error::Decode { path, source });
                }
            }
        }

        let index = FontIndex::assemble(by_path, rejected);
        if !delta.is_unchanged() {
            store.save(&CacheContents {
                fonts: index.faces.clone(),
                rejected: index.rejected.iter().cloned().collect(),
            })?;
            info!(
                "font cache updated: {} faces from {} files",
                index.len(),
                index.file_count()
            );
        }

        Ok((index, delta))
    }

    /// Every face, in path order then face offset.
    pub fn records(&self) -> impl Iterator<Item = &FontRecord> {
        self.faces.iter()
    }

    /// Faces carrying `fontname` (compared without case), in index order.
    pub fn candidates<'a>(&'a self, fontname: &str) -> impl Iterator<Item = &'a FontRecord> + 'a {
        self.by_name
            .get(&fontname.to_lowercase())
            .into_iter()
            .flatten()
            .map(move |&i| &self.faces[i])
    }

    /// Files kept out of the index because they held no usable face.
    pub fn rejected(&self) -> impl Iterator<Item = &Path> {
        self.rejected.iter().map(PathBuf::as_path)
    }

    pub fn file_count(&self) -> usize {
        self.file_count
    }

    pub fn len(&self) -> usize {
        self.faces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }
}

type Extracted = (PathBuf, std::result::Result<Vec<FontRecord>, DecodeError>);

fn extract_all(paths: &[PathBuf], opts: &IndexOptions) -> Vec<Extracted> {
    if paths.is_empty() {
        return Vec::new();
    }

    let run = || -> Vec<Extracted> {
        paths
            .par_iter()
            .map(|path| (path.clone(), extract_any(path)))
            .collect()
    };

    match opts.jobs {
        Some(jobs) => match ThreadPoolBuilder::new().num_threads(jobs).build() {
            Ok(pool) => pool.install(run),
            Err(err) => {
                warn!("cannot start {jobs} extraction threads ({err}), using the default pool");
                run()
            }
        },
        None => run(),
    }
}
