//! ASS script loading: the style table and the ordered event list.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use log::debug;

use crate::error::{Error, Result};
use crate::style::{StyleAttributes, Weight};

/// Named styles of a script.
pub type StyleTable = HashMap<String, StyleAttributes>;

/// One `Dialogue:` or `Comment:` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    /// 1-based position among dialogue and comment lines.
    pub line_number: u32,
    pub style_name: String,
    pub text: String,
    pub is_comment: bool,
}

impl Event {
    pub fn new(
        line_number: u32,
        style_name: impl Into<String>,
        text: impl Into<String>,
        is_comment: bool,
    ) -> Self {
        Self {
            line_number,
            style_name: style_name.into(),
            text: text.into(),
            is_comment,
        }
    }
}

/// A loaded script. Read-only once built.
#[derive(Debug, Clone, Default)]
pub struct Script {
    pub styles: StyleTable,
    pub events: Vec<Event>,
}

/// Read and parse a script file.
pub fn load_script(path: &Path) -> Result<Script> {
    let raw = fs::read(path).map_err(|source| Error::ScriptRead {
        path: path.to_path_buf(),
        source,
    })?;
    let text = String::from_utf8_lossy(&raw);
    Ok(parse_script(&text))
}

const STYLE_FORMAT: &[&str] = &[
    "Name",
    "Fontname",
    "Fontsize",
    "PrimaryColour",
    "SecondaryColour",
    "OutlineColour",
    "BackColour",
    "Bold",
    "Italic",
    "Underline",
    "StrikeOut",
    "ScaleX",
    "ScaleY",
    "Spacing",
    "Angle",
    "BorderStyle",
    "Outline",
    "Shadow",
    "Alignment",
    "MarginL",
    "MarginR",
    "MarginV",
    "Encoding",
];

const EVENT_FORMAT: &[&str] = &[
    "Layer", "Start", "End", "Style", "Name", "MarginL", "MarginR", "MarginV", "Effect", "Text",
];

/// Column layout taken from a `Format:` line.
#[derive(Debug, Clone)]
struct Columns {
    names: Vec<String>,
}

impl Columns {
    fn from_names(names: &[&str]) -> Self {
        Self {
            names: names.iter().map(|n| n.to_ascii_lowercase()).collect(),
        }
    }

    fn parse(value: &str) -> Self {
        Self {
            names: value
                .split(',')
                .map(|n| n.trim().to_ascii_lowercase())
                .collect(),
        }
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// Split a row; the last column keeps any remaining commas.
    fn split<'a>(&self, value: &'a str) -> Vec<&'a str> {
        value.splitn(self.names.len().max(1), ',').collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Styles,
    Events,
    Other,
}

/// Parse script text into styles and events.
pub fn parse_script(text: &str) -> Script {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut script = Script::default();
    let mut section = Section::Other;
    let mut style_columns = Columns::from_names(STYLE_FORMAT);
    let mut event_columns = Columns::from_names(EVENT_FORMAT);
    let mut event_rows = 0u32;

    for line in text.lines() {
        let line = line.trim_start();
        if line.starts_with('[') {
            section = match line.trim_end().to_ascii_lowercase().as_str() {
                "[v4+ styles]" | "[v4 styles]" | "[v4 styles+]" => Section::Styles,
                "[events]" => Section::Events,
                _ => Section::Other,
            };
            continue;
        }

        let Some((descriptor, value)) = line.split_once(':') else {
            continue;
        };
        let value = value.trim_start();

        match descriptor {
            "Format" if section == Section::Styles => style_columns = Columns::parse(value),
            "Format" if section == Section::Events => event_columns = Columns::parse(value),
            "Style" => {
                if let Some((name, attrs)) = parse_style_row(&style_columns, value) {
                    script.styles.insert(name, attrs);
                }
            }
            "Dialogue" | "Comment" => {
                event_rows += 1;
                if let Some(event) =
                    parse_event_row(&event_columns, value, event_rows, descriptor == "Comment")
                {
                    script.events.push(event);
                }
            }
            _ => {}
        }
    }

    debug!(
        "parsed script: {} styles, {} events",
        script.styles.len(),
        script.events.len()
    );
    script
}

fn parse_style_row(columns: &Columns, value: &str) -> Option<(String, StyleAttributes)> {
    let fields = columns.split(value);
    let field = |name: &str| columns.position(name).and_then(|i| fields.get(i)).map(|f| f.trim());

    let name = field("name")?.to_string();
    let fontname = field("fontname").unwrap_or_default();
    let weight = field("bold").map(parse_weight).unwrap_or(Weight::REGULAR);
    let slant = field("italic").map(parse_flag).unwrap_or(false);

    Some((name, StyleAttributes::new(fontname, weight, slant)))
}

fn parse_event_row(
    columns: &Columns,
    value: &str,
    line_number: u32,
    is_comment: bool,
) -> Option<Event> {
    let fields = columns.split(value);
    let style = columns.position("style").and_then(|i| fields.get(i))?;
    let text = columns
        .position("text")
        .and_then(|i| fields.get(i))
        .copied()
        .unwrap_or_default();

    Some(Event::new(line_number, style.trim(), text.trim(), is_comment))
}

/// `-1` and `1` mean on, `0` off; values of 100 and above are literal weights.
/// Weights too large for `u32` saturate.
fn parse_weight(raw: &str) -> Weight {
    let raw = raw.trim();
    match raw.parse::<i64>() {
        Ok(-1) | Ok(1) => Weight::BOLD,
        Ok(w) if w >= 100 => u32::try_from(w).map(Weight).unwrap_or(Weight(u32::MAX)),
        Err(_) if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) => Weight(u32::MAX),
        _ => Weight::REGULAR,
    }
}

fn parse_flag(raw: &str) -> bool {
    matches!(raw.parse::<i64>(), Ok(-1) | Ok(1))
}
