use super::*;
use assfc_core::style::{StyleAttributes, Weight};
use assfc_core::usage::UsageRecord;
use std::collections::BTreeSet;
use std::io::Cursor;
use tempfile::tempdir;

fn collect_args(argv: &[&str]) -> CollectArgs {
    let cli = Cli::try_parse_from(argv).expect("parse cli");
    match cli.command {
        Command::Collect(args) => args,
        other => panic!("expected collect, got {other:?}"),
    }
}

fn record(path: &str, offset: u32) -> FontRecord {
    FontRecord::new(BTreeSet::from(["A".to_string()]), 400, false, path, offset)
}

#[test]
fn parses_collect_flags_into_overrides() {
    let args = collect_args(&[
        "assfc",
        "collect",
        "ep.ass",
        "--include",
        "/fonts/a",
        "--include",
        "/fonts/b",
        "--without-system",
        "--exclude-comments",
        "-v",
        "-j",
        "3",
        "--json",
    ]);

    assert_eq!(args.script, PathBuf::from("ep.ass"));
    assert!(args.json);
    let overrides = args.overrides();
    assert_eq!(overrides.include.len(), 2);
    assert_eq!(overrides.include_system_fonts, Some(false));
    assert_eq!(overrides.exclude_comments, Some(true));
    assert_eq!(overrides.exclude_unused_fonts, None);
    assert!(overrides.verbose);
    assert_eq!(overrides.jobs, Some(3));
}

#[test]
fn paired_flags_conflict() {
    for flags in [
        ["--with-system", "--without-system"],
        ["--exclude-comments", "--include-comments"],
        ["--exclude-unused-fonts", "--include-unused-fonts"],
        ["--json", "--ndjson"],
    ] {
        let parse = Cli::try_parse_from(["assfc", "collect", "ep.ass", flags[0], flags[1]]);
        assert!(parse.is_err(), "{flags:?} should conflict");
    }
}

#[test]
fn script_is_required() {
    assert!(Cli::try_parse_from(["assfc", "collect"]).is_err());
}

#[test]
fn parses_cache_subcommands() {
    let cli = Cli::try_parse_from(["assfc", "cache", "list", "--cache-path", "/tmp/c.json", "--json"])
        .expect("parse");
    match cli.command {
        Command::Cache {
            command: CacheCommand::List(args),
        } => {
            assert!(args.json);
            assert_eq!(args.common.cache_path, Some(PathBuf::from("/tmp/c.json")));
        }
        other => panic!("unexpected {other:?}"),
    }

    let cli = Cli::try_parse_from(["assfc", "cache", "clear"]).expect("parse");
    assert!(matches!(
        cli.command,
        Command::Cache {
            command: CacheCommand::Clear(_)
        }
    ));
}

#[test]
fn flag_pairs_resolve() {
    assert_eq!(pair(true, false), Some(true));
    assert_eq!(pair(false, true), Some(false));
    assert_eq!(pair(false, false), None);
}

#[test]
fn roots_skip_missing_dirs_and_dedup() {
    let tmp = tempdir().expect("tempdir");
    let settings = Settings {
        font_dirs: vec![
            tmp.path().to_path_buf(),
            tmp.path().join("missing"),
            tmp.path().to_path_buf(),
        ],
        include_system_fonts: true,
        ..Settings::default()
    };

    let roots = gather_roots(&settings, || Ok(vec![PathBuf::from("/system/fonts")])).expect("roots");
    assert_eq!(roots.len(), 2);
    assert!(roots.contains(&PathBuf::from("/system/fonts")));
    assert!(roots.contains(&tmp.path().to_path_buf()));
}

#[test]
fn system_roots_are_optional() {
    let settings = Settings {
        include_system_fonts: true,
        ..Settings::default()
    };
    let roots = gather_roots(&settings, || Err(anyhow::anyhow!("none"))).expect("roots");
    assert!(roots.is_empty());

    let settings = Settings {
        include_system_fonts: false,
        ..Settings::default()
    };
    let roots = gather_roots(&settings, || panic!("system roots consulted")).expect("roots");
    assert!(roots.is_empty());
}

#[test]
fn writes_plain_with_offsets_and_missing() {
    let mut outcome = MatchOutcome::default();
    outcome.found.insert(
        StyleAttributes::new("A", Weight::REGULAR, false),
        record("/fonts/A.ttf", 0),
    );
    outcome.found.insert(
        StyleAttributes::new("B", Weight::BOLD, false),
        record("/fonts/B.ttc", 128),
    );
    outcome.not_found.insert(
        StyleAttributes::new("C", Weight::REGULAR, true),
        UsageRecord::default(),
    );

    let mut buf = Cursor::new(Vec::new());
    write_plain(&outcome, &mut buf, false).expect("write");

    let output = String::from_utf8(buf.into_inner()).expect("utf8");
    assert!(output.contains("/fonts/A.ttf  A (Bold: False, Italic: False)"));
    assert!(output.contains("/fonts/B.ttc@128"));
    assert!(output.contains("(missing)  C (Bold: False, Italic: True)"));
}

#[test]
fn colors_only_when_asked() {
    assert_eq!(apply_color("x", false, AnsiColor::Cyan), "x");
    assert_eq!(apply_color("x", true, AnsiColor::Cyan), "\u{1b}[36mx\u{1b}[0m");
}

#[test]
fn found_files_are_unique() {
    let mut outcome = MatchOutcome::default();
    outcome.found.insert(
        StyleAttributes::new("A", Weight::REGULAR, false),
        record("/fonts/pair.ttc", 12),
    );
    outcome.found.insert(
        StyleAttributes::new("A", Weight::BOLD, false),
        record("/fonts/pair.ttc", 400),
    );
    assert_eq!(found_files(&outcome), vec![PathBuf::from("/fonts/pair.ttc")]);
}

#[test]
fn lists_cache_records() {
    let mut buf = Vec::new();
    write_records(&[record("/fonts/A.ttf", 0)], &mut buf).expect("write");
    let text = String::from_utf8(buf).expect("utf8");
    assert_eq!(text, "/fonts/A.ttf  A  weight:400 italic:false\n");
}
