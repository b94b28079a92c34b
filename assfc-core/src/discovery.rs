//! Font file discovery.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use log::debug;
use walkdir::WalkDir;

/// Path to a candidate font file.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct FontFileRef {
    pub path: PathBuf,
}

/// Trait for enumerating font files from some backing store.
pub trait FontDiscovery {
    fn discover(&self) -> Result<Vec<FontFileRef>>;
}

/// Recursive filesystem walker that collects `.ttf`, `.otf` and `.ttc` files.
#[derive(Debug, Clone)]
pub struct PathDiscovery {
    roots: Vec<PathBuf>,
    follow_symlinks: bool,
}

impl PathDiscovery {
    pub fn new<I, P>(roots: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let roots = roots.into_iter().map(Into::into).collect();
        Self {
            roots,
            follow_symlinks: false,
        }
    }

    pub fn follow_symlinks(mut self, follow: bool) -> Self {
        self.follow_symlinks = follow;
        self
    }
}

impl FontDiscovery for PathDiscovery {
    /// Absolute paths, sorted and without duplicates across roots.
    fn discover(&self) -> Result<Vec<FontFileRef>> {
        let mut found = Vec::new();

        for root in &self.roots {
            if !root.exists() {
                return Err(anyhow!("font directory does not exist: {}", root.display()));
            }
            let root = std::path::absolute(root)?;

            let before = found.len();
            for entry in WalkDir::new(&root).follow_links(self.follow_symlinks) {
                let entry = entry?;
                if entry.file_type().is_file() && is_font(entry.path()) {
                    found.push(FontFileRef {
                        path: entry.into_path(),
                    });
                }
            }
            debug!("{}: {} font files", root.display(), found.len() - before);
        }

        found.sort();
        found.dedup();
        Ok(found)
    }
}

const FONT_EXTENSIONS: [&str; 3] = ["ttf", "otf", "ttc"];

fn is_font(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| FONT_EXTENSIONS.iter().any(|f| ext.eq_ignore_ascii_case(f)))
}
