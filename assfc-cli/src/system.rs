//! Platform font directories.

use std::env;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

pub const SYSTEM_FONT_DIRS_ENV: &str = "ASSFC_SYSTEM_FONT_DIRS";

#[cfg(target_os = "linux")]
const FONTCONFIG_FILE: &str = "/etc/fonts/fonts.conf";

static FONTCONFIG_DIR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<dir(?:\s[^>]*)?>\s*([^<]+?)\s*</dir>").expect("static dir regex"));

/// Existing system font directories, sorted and deduplicated.
pub fn system_font_roots() -> Result<Vec<PathBuf>> {
    if let Ok(raw) = env::var(SYSTEM_FONT_DIRS_ENV) {
        let mut overrides: Vec<PathBuf> = raw
            .split([':', ';'])
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
            .filter(|p| p.exists())
            .collect();

        overrides.sort();
        overrides.dedup();

        return if overrides.is_empty() {
            Err(anyhow!("{SYSTEM_FONT_DIRS_ENV} is set but no paths exist"))
        } else {
            Ok(overrides)
        };
    }

    let mut candidates: Vec<PathBuf> = Vec::new();

    #[cfg(target_os = "macos")]
    {
        candidates.push(PathBuf::from("/System/Library/Fonts"));
        candidates.push(PathBuf::from("/Library/Fonts"));
        if let Some(home) = dirs::home_dir() {
            candidates.push(home.join("Library/Fonts"));
        }
    }

    #[cfg(target_os = "linux")]
    {
        candidates.push(PathBuf::from("/usr/share/fonts"));
        candidates.push(PathBuf::from("/usr/local/share/fonts"));
        if let Some(data) = dirs::data_dir() {
            candidates.push(data.join("fonts"));
        }
        if let Some(home) = dirs::home_dir() {
            candidates.push(home.join(".fonts"));
        }
        match std::fs::read_to_string(FONTCONFIG_FILE) {
            Ok(text) => candidates.extend(fontconfig_dirs(&text, dirs::home_dir().as_deref())),
            Err(err) => debug!("skipping {FONTCONFIG_FILE}: {err}"),
        }
    }

    #[cfg(target_os = "windows")]
    {
        if let Some(system_root) = env::var_os("SYSTEMROOT") {
            candidates.push(PathBuf::from(system_root).join("Fonts"));
        }
        if let Some(local_appdata) = dirs::data_local_dir() {
            candidates.push(local_appdata.join("Microsoft/Windows/Fonts"));
        }
    }

    candidates.retain(|p| p.exists());
    candidates.sort();
    candidates.dedup();

    if candidates.is_empty() {
        return Err(anyhow!("no system font directories found for this platform"));
    }

    Ok(candidates)
}

/// `<dir>` entries of a fontconfig file, with `~` expanded.
pub fn fontconfig_dirs(text: &str, home: Option<&Path>) -> Vec<PathBuf> {
    FONTCONFIG_DIR_RE
        .captures_iter(text)
        .filter_map(|caps| {
            let raw = caps.get(1)?.as_str();
            match raw.strip_prefix('~') {
                Some(rest) => Some(home?.join(rest.trim_start_matches('/'))),
                None => Some(PathBuf::from(raw)),
            }
        })
        .collect()
}
