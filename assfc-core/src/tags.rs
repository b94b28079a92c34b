//! Override tag parsing for ASS event text.
//!
//! Event text mixes visible glyphs with `{...}` override regions. Only the
//! handful of tags that change which font renders the text matter here:
//! `\b`, `\i`, `\fn`, `\r` and the drawing toggle `\p`. Every other tag is
//! dropped while tokenizing.

use log::warn;
use once_cell::sync::Lazy;
use regex::Regex;

/// A recognized override operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverrideTag {
    /// `\r` or `\r<style>`: back to a named style (the event's own when empty).
    Reset(Option<String>),
    /// `\b`, `\b0`, `\b1`, `\b<weight>`; `None` restores the style default.
    SetWeight(Option<u32>),
    /// `\i`, `\i0`, `\i1`; `None` restores the style default.
    SetSlant(Option<u32>),
    /// `\fn<name>`; `None` restores the style default.
    SetFont(Option<String>),
    /// `\p<n>`: drawing mode on for non-zero `n`.
    ToggleDrawing(u32),
}

impl OverrideTag {
    fn kind(&self) -> TagKind {
        match self {
            OverrideTag::Reset(_) => TagKind::Reset,
            OverrideTag::SetWeight(_) => TagKind::Weight,
            OverrideTag::SetSlant(_) => TagKind::Slant,
            OverrideTag::SetFont(_) => TagKind::Font,
            OverrideTag::ToggleDrawing(_) => TagKind::Drawing,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TagKind {
    Reset,
    Weight,
    Slant,
    Font,
    Drawing,
}

/// One unit of parsed event text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// Tags of one `{...}` region, one per kind, in order of last occurrence.
    Override(Vec<OverrideTag>),
    PlainText(String),
}

impl Block {
    pub fn is_override(&self) -> bool {
        matches!(self, Block::Override(_))
    }
}

static TAG_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:fn(?P<font>.*)|(?P<flag>[bip])(?P<num>[0-9]*)|r(?P<style>.*))$")
        .expect("static tag regex")
});

/// Split event text into override and plain-text blocks.
///
/// Comments (`{...}` without a backslash) and text written while drawing
/// mode is active never become blocks. An unterminated `{` is logged and
/// kept as plain text.
pub fn parse_tags(text: &str) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut drawing = false;
    let mut cur = 0;

    while cur < text.len() {
        let rest = &text[cur..];
        if rest.starts_with('{') {
            match rest.find('}') {
                Some(end) => {
                    parse_override_region(&rest[1..end], &mut drawing, &mut blocks);
                    cur += end + 1;
                }
                None => {
                    warn!("malformed line, unclosed override block: {text}");
                    cur += push_plain(rest, 1, drawing, &mut blocks);
                }
            }
        } else {
            cur += push_plain(rest, 0, drawing, &mut blocks);
        }
    }

    blocks
}

/// Emit the plain run at the start of `rest`, searching for the next `{`
/// from byte `from`. Returns the run length in bytes.
fn push_plain(rest: &str, from: usize, drawing: bool, blocks: &mut Vec<Block>) -> usize {
    let len = rest[from..].find('{').map_or(rest.len(), |i| i + from);
    if !drawing {
        blocks.push(Block::PlainText(rest[..len].to_string()));
    }
    len
}

fn parse_override_region(content: &str, drawing: &mut bool, blocks: &mut Vec<Block>) {
    if !content.contains('\\') {
        return;
    }

    let mut tags = tokenize(content);
    if let Some(pos) = tags.iter().position(|t| t.kind() == TagKind::Drawing) {
        if let OverrideTag::ToggleDrawing(level) = tags.remove(pos) {
            *drawing = level != 0;
        }
    }

    if !tags.is_empty() {
        blocks.push(Block::Override(tags));
    }
}

/// Recognized tags of one region; a repeated tag replaces the earlier one
/// and moves to its new position.
pub fn tokenize(content: &str) -> Vec<OverrideTag> {
    let mut tags: Vec<OverrideTag> = Vec::new();

    for segment in content.split('\\').skip(1) {
        let Some(tag) = recognize(segment) else {
            continue;
        };
        tags.retain(|t| t.kind() != tag.kind());
        tags.push(tag);
    }

    tags
}

fn recognize(segment: &str) -> Option<OverrideTag> {
    let caps = TAG_RE.captures(segment.trim_end())?;

    if let Some(font) = caps.name("font") {
        return Some(OverrideTag::SetFont(non_empty(font.as_str())));
    }
    if let Some(style) = caps.name("style") {
        return Some(OverrideTag::Reset(non_empty(style.as_str())));
    }

    let num = caps.name("num").map(|m| m.as_str()).unwrap_or_default();
    let value = if num.is_empty() {
        None
    } else {
        // Oversized digit runs saturate instead of failing.
        Some(num.parse::<u32>().unwrap_or(u32::MAX))
    };

    match caps.name("flag")?.as_str() {
        "b" => Some(OverrideTag::SetWeight(value)),
        "i" => Some(OverrideTag::SetSlant(value)),
        _ => Some(OverrideTag::ToggleDrawing(value.unwrap_or(0))),
    }
}

fn non_empty(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
