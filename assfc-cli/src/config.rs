//! Persistent settings from `config.toml`, merged with command-line flags.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::debug;
use serde::Deserialize;

pub const CONFIG_FILE: &str = "config.toml";
pub const APP_DIR: &str = "assfc";

/// Settings as written in the config file; every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub font_dirs: Vec<PathBuf>,
    pub include_system_fonts: Option<bool>,
    pub exclude_unused_fonts: Option<bool>,
    pub exclude_comments: Option<bool>,
    pub verbose: Option<bool>,
    pub log_file: Option<PathBuf>,
    pub mkvmerge: Option<PathBuf>,
    pub cache_path: Option<PathBuf>,
    pub jobs: Option<usize>,
}

/// Effective settings after flags have been applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub font_dirs: Vec<PathBuf>,
    pub include_system_fonts: bool,
    pub exclude_unused_fonts: bool,
    pub exclude_comments: bool,
    pub verbose: bool,
    pub log_file: Option<PathBuf>,
    pub mkvmerge: PathBuf,
    pub cache_path: Option<PathBuf>,
    pub jobs: Option<usize>,
}

impl Default for Settings {
    fn default() -> Self {
        FileConfig::default().into_settings()
    }
}

/// Flag values that override the file; `None` keeps the file's choice.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub include: Vec<PathBuf>,
    pub include_system_fonts: Option<bool>,
    pub exclude_unused_fonts: Option<bool>,
    pub exclude_comments: Option<bool>,
    pub verbose: bool,
    pub log_file: Option<PathBuf>,
    pub cache_path: Option<PathBuf>,
    pub jobs: Option<usize>,
}

impl FileConfig {
    pub fn parse(text: &str) -> Result<Self> {
        toml::from_str(text).context("invalid config")
    }

    /// Read `explicit` (which must exist) or the per-user file (which may not).
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            return Self::parse(&text).with_context(|| format!("in {}", path.display()));
        }

        let Some(path) = default_config_path() else {
            return Ok(Self::default());
        };
        match fs::read_to_string(&path) {
            Ok(text) => Self::parse(&text).with_context(|| format!("in {}", path.display())),
            Err(err) => {
                debug!("no config at {}: {err}", path.display());
                Ok(Self::default())
            }
        }
    }

    pub fn into_settings(self) -> Settings {
        Settings {
            font_dirs: self.font_dirs,
            include_system_fonts: self.include_system_fonts.unwrap_or(true),
            exclude_unused_fonts: self.exclude_unused_fonts.unwrap_or(false),
            exclude_comments: self.exclude_comments.unwrap_or(false),
            verbose: self.verbose.unwrap_or(false),
            log_file: self.log_file,
            mkvmerge: self.mkvmerge.unwrap_or_else(|| PathBuf::from("mkvmerge")),
            cache_path: self.cache_path,
            jobs: self.jobs,
        }
    }

    pub fn merge(self, flags: Overrides) -> Settings {
        let mut settings = self.into_settings();
        settings.font_dirs.extend(flags.include);
        if let Some(v) = flags.include_system_fonts {
            settings.include_system_fonts = v;
        }
        if let Some(v) = flags.exclude_unused_fonts {
            settings.exclude_unused_fonts = v;
        }
        if let Some(v) = flags.exclude_comments {
            settings.exclude_comments = v;
        }
        settings.verbose |= flags.verbose;
        if flags.log_file.is_some() {
            settings.log_file = flags.log_file;
        }
        if flags.cache_path.is_some() {
            settings.cache_path = flags.cache_path;
        }
        if flags.jobs.is_some() {
            settings.jobs = flags.jobs;
        }
        settings
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_DIR).join(CONFIG_FILE))
}

/// `<data dir>/assfc/font_cache.json`, or the working directory when the
/// platform has no data directory.
pub fn default_cache_path() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join(APP_DIR))
        .unwrap_or_default()
        .join("font_cache.json")
}
