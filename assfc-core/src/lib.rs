//! assfc-core: find the font files an ASS subtitle script needs.
//!
//! The pipeline has three stages.
//!
//! **Usage**: what the script asks for
//! - Parses the style table and every `Dialogue:`/`Comment:` event
//! - Follows `\b`, `\i`, `\fn`, `\r` and drawing-mode `\p` overrides
//! - Records, per (font name, weight, slant), the characters drawn, the
//!   lines that overrode into it and the named styles that resolve to it
//!
//! **Index**: what the machine has
//! - Walks font directories for `.ttf`, `.otf` and `.ttc` files
//! - Decodes family/full names and the subfamily style from `name` tables,
//!   including legacy Windows code pages
//! - Keeps a JSON cache so unchanged directories cost one read
//!
//! **Match**: one file per required style
//! - Exact slant and a compatible weight first, the plain face second
//! - Identical file contents are selected only once
//!
//! ```rust,no_run
//! use std::path::Path;
//! use assfc_core::cache::CacheStore;
//! use assfc_core::discovery::{FontDiscovery, PathDiscovery};
//! use assfc_core::index::{FontIndex, IndexOptions};
//! use assfc_core::matcher::match_fonts;
//! use assfc_core::script::load_script;
//! use assfc_core::usage::{collect_usage, CollectOptions};
//!
//! let script = load_script(Path::new("episode01.ass"))?;
//! let required = collect_usage(&script, &CollectOptions::default());
//!
//! let files: Vec<_> = PathDiscovery::new(["fonts"])
//!     .discover()?
//!     .into_iter()
//!     .map(|f| f.path)
//!     .collect();
//! let store = CacheStore::new("font_cache.json");
//! let (index, _delta) = FontIndex::build(&files, &store, &IndexOptions::default())?;
//!
//! let outcome = match_fonts(&required, &index);
//! for (attrs, record) in &outcome.found {
//!     println!("{attrs}: {}", record.path.display());
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod cache;
pub mod collection;
pub mod discovery;
pub mod encoding;
pub mod error;
pub mod index;
pub mod matcher;
pub mod output;
pub mod record;
pub mod script;
pub mod sfnt;
pub mod style;
pub mod tags;
pub mod usage;
