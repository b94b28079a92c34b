//! Style resolution: which effective font attributes each event uses.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use log::warn;
use serde::{Deserialize, Serialize};

use crate::script::{Event, Script, StyleTable};
use crate::style::{StyleAttributes, Weight};
use crate::tags::{parse_tags, Block, OverrideTag};

/// Where a set of effective attributes is used.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageRecord {
    /// Event lines whose overridden text used these attributes.
    pub lines: BTreeSet<u32>,
    /// Named styles resolving to these attributes.
    pub styles: BTreeSet<String>,
    pub chars: BTreeSet<char>,
}

impl UsageRecord {
    pub fn has_chars(&self) -> bool {
        !self.chars.is_empty()
    }
}

/// Usage keyed by effective attributes, in key order.
pub type UsageMap = BTreeMap<StyleAttributes, UsageRecord>;

#[derive(Debug, Clone, Copy, Default)]
pub struct CollectOptions {
    /// Drop named styles that no event refers to.
    pub exclude_unused_styles: bool,
    /// Skip `Comment:` events.
    pub exclude_comments: bool,
}

/// Build the usage map of a whole script.
pub fn collect_usage(script: &Script, opts: &CollectOptions) -> UsageMap {
    let mut usage = UsageMap::new();

    let referenced: HashSet<&str> = script
        .events
        .iter()
        .map(|e| e.style_name.as_str())
        .collect();

    for (name, attrs) in &script.styles {
        if opts.exclude_unused_styles && !referenced.contains(name.as_str()) {
            continue;
        }
        usage
            .entry(attrs.clone())
            .or_default()
            .styles
            .insert(name.clone());
    }

    for event in &script.events {
        if opts.exclude_comments && event.is_comment {
            continue;
        }
        process_event(event, &script.styles, &mut usage);
    }

    usage
}

/// Apply one event's overrides and record the text it renders.
pub fn process_event(event: &Event, styles: &StyleTable, usage: &mut UsageMap) {
    let Some(base) = event_style(event, styles) else {
        warn!(
            "line {}: unknown style '{}' and no Default style, skipping",
            event.line_number, event.style_name
        );
        return;
    };

    let mut current = base.clone();
    let mut overridden = false;

    for block in parse_tags(&event.text) {
        match block {
            Block::Override(tags) => {
                for tag in tags {
                    match tag {
                        OverrideTag::Reset(name) => {
                            current = reset_target(event, name.as_deref(), styles, base);
                            overridden = false;
                        }
                        OverrideTag::SetWeight(value) => {
                            let weight = value.map(Weight).unwrap_or(base.weight());
                            current = current.with_weight(weight);
                            overridden = true;
                        }
                        OverrideTag::SetSlant(value) => {
                            let slant = value.map(|v| v != 0).unwrap_or(base.slant());
                            current = current.with_slant(slant);
                            overridden = true;
                        }
                        OverrideTag::SetFont(name) => {
                            let fontname = name.as_deref().unwrap_or(base.fontname());
                            current = current.with_fontname(fontname);
                            overridden = true;
                        }
                        // Consumed by the tag parser.
                        OverrideTag::ToggleDrawing(_) => {}
                    }
                }
            }
            Block::PlainText(text) => {
                if text.is_empty() {
                    continue;
                }
                let record = usage.entry(current.clone()).or_default();
                if overridden {
                    record.lines.insert(event.line_number);
                }
                scan_chars(&text, &mut record.chars);
            }
        }
    }
}

fn event_style<'a>(event: &Event, styles: &'a StyleTable) -> Option<&'a StyleAttributes> {
    if let Some(style) = styles.get(&event.style_name) {
        return Some(style);
    }
    let fallback = styles.get("Default")?;
    warn!(
        "line {}: unknown style '{}', using Default",
        event.line_number, event.style_name
    );
    Some(fallback)
}

fn reset_target(
    event: &Event,
    name: Option<&str>,
    styles: &StyleTable,
    base: &StyleAttributes,
) -> StyleAttributes {
    let Some(name) = name else {
        return base.clone();
    };
    match styles.get(name) {
        Some(style) => style.clone(),
        None => {
            warn!(
                "line {}: \\r refers to unknown style '{name}'",
                event.line_number
            );
            base.clone()
        }
    }
}

/// Collect the glyph characters of a plain-text run.
///
/// `\n` and `\N` are line breaks, `\h` is a hard space (U+00A0); any other
/// backslash stands for itself.
pub fn scan_chars(text: &str, chars: &mut BTreeSet<char>) {
    let mut iter = text.chars().peekable();
    while let Some(ch) = iter.next() {
        if ch != '\\' {
            chars.insert(ch);
            continue;
        }
        match iter.peek() {
            Some('n') | Some('N') => {
                iter.next();
            }
            Some('h') => {
                iter.next();
                chars.insert('\u{a0}');
            }
            _ => {
                chars.insert('\\');
            }
        }
    }
}
