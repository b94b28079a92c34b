//! Report rendering: missing-font diagnostics and JSON/NDJSON match reports.

use std::collections::BTreeSet;
use std::fmt::Display;
use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::matcher::MatchOutcome;
use crate::style::StyleAttributes;
use crate::usage::UsageRecord;

/// Above this many lines the diagnostic stops listing them.
pub const MAX_LISTED_LINES: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoundFont {
    pub attributes: StyleAttributes,
    pub path: PathBuf,
    pub face_offset: u32,
    pub names: BTreeSet<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingFont {
    pub attributes: StyleAttributes,
    pub usage: UsageRecord,
}

/// Serializable view of a match outcome.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchReport {
    pub found: Vec<FoundFont>,
    pub missing: Vec<MissingFont>,
}

impl From<&MatchOutcome> for MatchReport {
    fn from(outcome: &MatchOutcome) -> Self {
        let found = outcome
            .found
            .iter()
            .map(|(attrs, record)| FoundFont {
                attributes: attrs.clone(),
                path: record.path.clone(),
                face_offset: record.face_offset,
                names: record.names.clone(),
            })
            .collect();
        let missing = outcome
            .not_found
            .iter()
            .map(|(attrs, usage)| MissingFont {
                attributes: attrs.clone(),
                usage: usage.clone(),
            })
            .collect();
        Self { found, missing }
    }
}

/// Multi-line diagnostic for a font that could not be found.
pub fn describe_missing(attrs: &StyleAttributes, usage: &UsageRecord) -> String {
    let mut text = format!("Could not find font '{attrs}'");
    if !usage.styles.is_empty() {
        text.push_str(&format!("\nUsed in styles {}", braced(&usage.styles)));
    }
    if !usage.lines.is_empty() {
        if usage.lines.len() > MAX_LISTED_LINES {
            text.push_str(&format!("\nUsed on more than {MAX_LISTED_LINES} lines"));
        } else {
            text.push_str(&format!("\nUsed on lines {}", braced(&usage.lines)));
        }
    }
    text
}

fn braced<T: Display>(items: &BTreeSet<T>) -> String {
    let inner: Vec<String> = items.iter().map(ToString::to_string).collect();
    format!("{{{}}}", inner.join(", "))
}

/// Write the report as a prettified JSON object.
pub fn write_json_pretty(report: &MatchReport, mut w: impl Write) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    w.write_all(json.as_bytes())?;
    w.write_all(b"\n")?;
    Ok(())
}

/// Write one JSON object per line: found fonts first, then missing ones.
pub fn write_ndjson(report: &MatchReport, mut w: impl Write) -> Result<()> {
    for item in &report.found {
        let line = serde_json::to_string(&NdjsonLine::Found(item))?;
        w.write_all(line.as_bytes())?;
        w.write_all(b"\n")?;
    }
    for item in &report.missing {
        let line = serde_json::to_string(&NdjsonLine::Missing(item))?;
        w.write_all(line.as_bytes())?;
        w.write_all(b"\n")?;
    }
    Ok(())
}

#[derive(Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
enum NdjsonLine<'a> {
    Found(&'a FoundFont),
    Missing(&'a MissingFont),
}
