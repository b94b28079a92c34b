mod common;

use std::fs;
use std::path::PathBuf;

use assfc_core::cache::CacheStore;
use assfc_core::index::{FontIndex, IndexDelta, IndexOptions};
use common::{write_ttc, write_ttf, TestFace};
use tempfile::tempdir;

fn names_in(index: &FontIndex) -> Vec<String> {
    index
        .records()
        .flat_map(|r| r.names.iter().cloned())
        .collect()
}

#[test]
fn first_build_extracts_everything_and_saves() {
    let tmp = tempdir().expect("tempdir");
    let fonts = tmp.path().join("fonts");
    fs::create_dir_all(&fonts).expect("mkdir");
    let a = write_ttf(&fonts, "a.ttf", "Alpha", "Regular");
    let b = write_ttc(&fonts, "b.ttc", &[TestFace::new("Beta", "Regular"), TestFace::new("Gamma", "Bold")]);
    let store = CacheStore::new(tmp.path().join("cache/fonts.json"));

    let (index, delta) = FontIndex::build(&[a, b], &store, &IndexOptions::default()).expect("build");

    assert_eq!(
        delta,
        IndexDelta {
            added: 2,
            removed: 0,
            failed: 0
        }
    );
    assert_eq!(index.file_count(), 2);
    assert_eq!(index.len(), 3);
    assert!(store.path().exists());
    assert_eq!(store.load().fonts.len(), 3);
}

#[test]
fn unchanged_file_set_leaves_cache_untouched() {
    let tmp = tempdir().expect("tempdir");
    let a = write_ttf(tmp.path(), "a.ttf", "Alpha", "Regular");
    let files = vec![a.clone()];
    let store = CacheStore::new(tmp.path().join("fonts.json"));

    FontIndex::build(&files, &store, &IndexOptions::default()).expect("first build");
    let before = fs::read(store.path()).expect("cache bytes");
    let mtime = fs::metadata(store.path()).and_then(|m| m.modified()).expect("mtime");

    // Corrupting the font proves nothing is re-extracted.
    fs::write(&a, b"garbage").expect("overwrite font");

    let (index, delta) = FontIndex::build(&files, &store, &IndexOptions::default()).expect("second build");
    assert_eq!(delta.added, 0);
    assert!(delta.is_unchanged());
    assert_eq!(names_in(&index), vec!["Alpha".to_string()]);
    assert_eq!(fs::read(store.path()).expect("cache bytes"), before);
    assert_eq!(
        fs::metadata(store.path()).and_then(|m| m.modified()).expect("mtime"),
        mtime
    );
}

#[test]
fn removed_and_added_files_are_reconciled() {
    let tmp = tempdir().expect("tempdir");
    let a = write_ttf(tmp.path(), "a.ttf", "Alpha", "Regular");
    let b = write_ttf(tmp.path(), "b.ttf", "Beta", "Regular");
    let store = CacheStore::new(tmp.path().join("fonts.json"));

    FontIndex::build(&[a.clone()], &store, &IndexOptions::default()).expect("first build");
    let (index, delta) = FontIndex::build(&[b], &store, &IndexOptions { jobs: Some(2) }).expect("second build");

    assert_eq!(delta.added, 1);
    assert_eq!(delta.removed, 1);
    assert_eq!(names_in(&index), vec!["Beta".to_string()]);

    let cached: Vec<PathBuf> = store.load().fonts.into_iter().map(|r| r.path).collect();
    assert!(!cached.contains(&a));
}

#[test]
fn undecodable_files_are_excluded() {
    let tmp = tempdir().expect("tempdir");
    let good = write_ttf(tmp.path(), "good.ttf", "Good", "Regular");
    let bad = tmp.path().join("bad.ttf");
    fs::write(&bad, b"nope").expect("write bad");
    let store = CacheStore::new(tmp.path().join("fonts.json"));

    let (index, delta) = FontIndex::build(&[good, bad.clone()], &store, &IndexOptions::default()).expect("build");

    assert_eq!(delta.added, 2);
    assert_eq!(delta.failed, 1);
    assert_eq!(index.file_count(), 1);
    assert_eq!(store.load().fonts.len(), 1);
    assert_eq!(store.load().rejected, vec![bad]);
}

#[test]
fn rejected_files_are_not_read_again() {
    let tmp = tempdir().expect("tempdir");
    let good = write_ttf(tmp.path(), "good.ttf", "Good", "Regular");
    let bad = tmp.path().join("bad.ttf");
    fs::write(&bad, b"nope").expect("write bad");
    let empty = write_ttc(tmp.path(), "empty.ttc", &[]);
    let files = vec![good, bad.clone(), empty.clone()];
    let store = CacheStore::new(tmp.path().join("fonts.json"));

    let (_, first) = FontIndex::build(&files, &store, &IndexOptions::default()).expect("first build");
    assert_eq!(
        first,
        IndexDelta {
            added: 3,
            removed: 0,
            failed: 1
        }
    );
    let before = fs::read(store.path()).expect("cache bytes");

    let (index, second) = FontIndex::build(&files, &store, &IndexOptions::default()).expect("second build");
    assert_eq!(second, IndexDelta::default());
    assert_eq!(index.len(), 1);
    assert_eq!(index.rejected().collect::<Vec<_>>(), vec![bad.as_path(), empty.as_path()]);
    assert_eq!(fs::read(store.path()).expect("cache bytes"), before);
}

#[test]
fn rejected_file_leaving_the_set_is_forgotten() {
    let tmp = tempdir().expect("tempdir");
    let good = write_ttf(tmp.path(), "good.ttf", "Good", "Regular");
    let bad = tmp.path().join("bad.ttf");
    fs::write(&bad, b"nope").expect("write bad");
    let store = CacheStore::new(tmp.path().join("fonts.json"));

    FontIndex::build(&[good.clone(), bad], &store, &IndexOptions::default()).expect("first build");
    let (index, delta) = FontIndex::build(&[good], &store, &IndexOptions::default()).expect("second build");

    assert_eq!(delta.removed, 1);
    assert_eq!(index.rejected().count(), 0);
    assert!(store.load().rejected.is_empty());
}

#[test]
fn corrupt_cache_is_rebuilt() {
    let tmp = tempdir().expect("tempdir");
    let a = write_ttf(tmp.path(), "a.ttf", "Alpha", "Regular");
    let store = CacheStore::new(tmp.path().join("fonts.json"));
    fs::write(store.path(), b"]]]").expect("write corrupt cache");

    let (index, delta) = FontIndex::build(&[a], &store, &IndexOptions::default()).expect("build");
    assert_eq!(delta.added, 1);
    assert_eq!(index.len(), 1);
    assert_eq!(store.load().fonts.len(), 1);
}
