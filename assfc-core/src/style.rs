//! Style attributes: the (fontname, weight, slant) key every lookup runs on.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// Font weight as written in ASS scripts.
///
/// `0` and `1` follow the boolean convention of the `Bold` column and the
/// `\b0`/`\b1` tags; any other value is a literal weight such as `\b700`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Weight(pub u32);

impl Weight {
    pub const REGULAR: Weight = Weight(0);
    pub const BOLD: Weight = Weight(1);

    /// Lowest literal weight considered bold.
    pub const BOLD_THRESHOLD: u32 = 600;

    /// Whether this weight belongs to the bold class.
    pub fn is_bold(self) -> bool {
        self.0 == 1 || self.0 >= Self::BOLD_THRESHOLD
    }

    /// Weight on the 100..900 scale.
    pub fn numeric(self) -> u32 {
        match self.0 {
            0 => 400,
            1 => 700,
            w => w,
        }
    }

    /// Exact numeric match, or both sides in the same bold class.
    pub fn satisfies(self, other: Weight) -> bool {
        self.numeric() == other.numeric() || self.is_bold() == other.is_bold()
    }
}

impl From<bool> for Weight {
    fn from(bold: bool) -> Self {
        if bold {
            Weight::BOLD
        } else {
            Weight::REGULAR
        }
    }
}

/// Font attributes in effect for a run of text.
///
/// Compared, hashed and ordered by the lower-cased font name together with
/// weight and slant, so `Arial` and `arial` resolve to the same font.
/// Values are never mutated; the `with_*` methods build new ones.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "RawStyleAttributes", into = "RawStyleAttributes")]
pub struct StyleAttributes {
    fontname: String,
    folded: String,
    weight: Weight,
    slant: bool,
}

impl StyleAttributes {
    pub fn new(fontname: impl Into<String>, weight: Weight, slant: bool) -> Self {
        let fontname = fontname.into();
        let folded = fontname.to_lowercase();
        Self {
            fontname,
            folded,
            weight,
            slant,
        }
    }

    pub fn fontname(&self) -> &str {
        &self.fontname
    }

    /// Lower-cased font name used for comparisons.
    pub fn folded_name(&self) -> &str {
        &self.folded
    }

    pub fn weight(&self) -> Weight {
        self.weight
    }

    pub fn slant(&self) -> bool {
        self.slant
    }

    pub fn with_fontname(&self, fontname: impl Into<String>) -> Self {
        Self::new(fontname, self.weight, self.slant)
    }

    pub fn with_weight(&self, weight: Weight) -> Self {
        Self {
            weight,
            ..self.clone()
        }
    }

    pub fn with_slant(&self, slant: bool) -> Self {
        Self {
            slant,
            ..self.clone()
        }
    }

    fn key(&self) -> (&str, Weight, bool) {
        (&self.folded, self.weight, self.slant)
    }
}

impl PartialEq for StyleAttributes {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for StyleAttributes {}

impl Hash for StyleAttributes {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl PartialOrd for StyleAttributes {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for StyleAttributes {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

impl fmt::Display for StyleAttributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (Bold: {}, Italic: {})",
            self.fontname,
            match self.weight.0 {
                0 => "False".to_string(),
                1 => "True".to_string(),
                w => w.to_string(),
            },
            if self.slant { "True" } else { "False" }
        )
    }
}

#[derive(Serialize, Deserialize)]
struct RawStyleAttributes {
    fontname: String,
    weight: Weight,
    slant: bool,
}

impl From<RawStyleAttributes> for StyleAttributes {
    fn from(raw: RawStyleAttributes) -> Self {
        StyleAttributes::new(raw.fontname, raw.weight, raw.slant)
    }
}

impl From<StyleAttributes> for RawStyleAttributes {
    fn from(attrs: StyleAttributes) -> Self {
        RawStyleAttributes {
            fontname: attrs.fontname,
            weight: attrs.weight,
            slant: attrs.slant,
        }
    }
}
