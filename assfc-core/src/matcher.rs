//! Pick one font file per required style.

use std::collections::{BTreeMap, HashSet};

use log::debug;

use crate::index::FontIndex;
use crate::record::FontRecord;
use crate::style::StyleAttributes;
use crate::usage::UsageMap;

#[derive(Debug, Default, Clone)]
pub struct MatchOutcome {
    pub found: BTreeMap<StyleAttributes, FontRecord>,
    pub not_found: UsageMap,
}

/// Resolve every required style against the index.
///
/// Keys are visited in order. A style whose best face has the same file
/// content as a face already chosen for an earlier style is dropped from
/// both maps; the file it needs is already part of the result.
pub fn match_fonts(required: &UsageMap, index: &FontIndex) -> MatchOutcome {
    let mut outcome = MatchOutcome::default();
    let mut seen: HashSet<String> = HashSet::new();

    for (attrs, usage) in required {
        let Some(record) = best_face(attrs, index) else {
            outcome.not_found.insert(attrs.clone(), usage.clone());
            continue;
        };

        if !seen.insert(dedup_key(record)) {
            debug!("{attrs}: {} already selected", record.path.display());
            continue;
        }
        debug!("{attrs}: using {}", record.path.display());
        outcome.found.insert(attrs.clone(), record.clone());
    }

    outcome
}

/// Exact slant with a compatible weight, else the first plain face.
fn best_face<'a>(attrs: &StyleAttributes, index: &'a FontIndex) -> Option<&'a FontRecord> {
    let candidates: Vec<&FontRecord> = index.candidates(attrs.fontname()).collect();

    candidates
        .iter()
        .find(|r| r.slant == attrs.slant() && attrs.weight().satisfies(r.weight()))
        .or_else(|| candidates.iter().find(|r| r.is_plain()))
        .copied()
}

fn dedup_key(record: &FontRecord) -> String {
    match record.content_hash() {
        Ok(hash) => hash.to_string(),
        Err(err) => {
            debug!("cannot hash {}: {err}", record.path.display());
            format!("{}#{}", record.path.display(), record.face_offset)
        }
    }
}
