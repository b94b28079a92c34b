//! assfc CLI: collect the fonts an ASS script needs.

use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum, ValueHint};
use log::{debug, info, warn};

use assfc_core::cache::CacheStore;
use assfc_core::discovery::{FontDiscovery, PathDiscovery};
use assfc_core::index::{FontIndex, IndexOptions};
use assfc_core::matcher::{match_fonts, MatchOutcome};
use assfc_core::output::{describe_missing, write_json_pretty, write_ndjson, MatchReport};
use assfc_core::record::FontRecord;
use assfc_core::script::load_script;
use assfc_core::usage::{collect_usage, CollectOptions};

pub mod config;
pub mod deliver;
pub mod logging;
pub mod system;

use config::{default_cache_path, FileConfig, Overrides, Settings};
use deliver::{deliver, unique_files, Delivery};
use logging::init_logging;
use system::system_font_roots;

/// CLI entrypoint for assfc.
#[derive(Debug, Parser)]
#[command(
    name = "assfc",
    version,
    about = "Find and collect the fonts used by an ASS subtitle script"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Resolve every font the script uses and optionally collect the files
    Collect(CollectArgs),
    /// Inspect or clear the font cache
    Cache {
        #[command(subcommand)]
        command: CacheCommand,
    },
}

#[derive(Debug, Subcommand)]
enum CacheCommand {
    /// Print cached font records
    List(CacheListArgs),
    /// Delete the cache file
    Clear(CacheArgs),
}

#[derive(Debug, Args)]
struct CacheArgs {
    /// Cache file to use instead of the default location
    #[arg(long = "cache-path", value_hint = ValueHint::FilePath)]
    cache_path: Option<PathBuf>,

    /// Config file to read instead of the per-user one
    #[arg(long = "config", value_hint = ValueHint::FilePath)]
    config: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct CacheListArgs {
    #[command(flatten)]
    common: CacheArgs,

    /// Emit a single JSON array
    #[arg(long = "json", action = ArgAction::SetTrue)]
    json: bool,
}

#[derive(Debug, Args)]
struct CollectArgs {
    /// Input script
    #[arg(value_hint = ValueHint::FilePath)]
    script: PathBuf,

    /// Additional font directory to include
    #[arg(long = "include", value_name = "DIR", value_hint = ValueHint::DirPath)]
    include: Vec<PathBuf>,

    /// Include system fonts
    #[arg(long = "with-system", action = ArgAction::SetTrue, conflicts_with = "without_system")]
    with_system: bool,

    /// Exclude system fonts
    #[arg(long = "without-system", action = ArgAction::SetTrue)]
    without_system: bool,

    /// Skip commented-out events
    #[arg(long = "exclude-comments", action = ArgAction::SetTrue, conflicts_with = "include_comments")]
    exclude_comments: bool,

    /// Process commented-out events
    #[arg(long = "include-comments", action = ArgAction::SetTrue)]
    include_comments: bool,

    /// Skip styles no event uses
    #[arg(
        long = "exclude-unused-fonts",
        action = ArgAction::SetTrue,
        conflicts_with = "include_unused_fonts"
    )]
    exclude_unused_fonts: bool,

    /// Keep styles no event uses
    #[arg(long = "include-unused-fonts", action = ArgAction::SetTrue)]
    include_unused_fonts: bool,

    /// Print additional log info (debug level)
    #[arg(short = 'v', long = "verbose", action = ArgAction::SetTrue)]
    verbose: bool,

    /// Also write the log to this file
    #[arg(long = "log", value_name = "FILE", value_hint = ValueHint::FilePath)]
    log_file: Option<PathBuf>,

    /// Discard the font cache before indexing
    #[arg(long = "rebuild-cache", action = ArgAction::SetTrue)]
    rebuild_cache: bool,

    /// Cache file to use instead of the default location
    #[arg(long = "cache-path", value_hint = ValueHint::FilePath)]
    cache_path: Option<PathBuf>,

    /// Number of font extraction threads
    #[arg(short = 'j', long = "jobs")]
    jobs: Option<usize>,

    /// Output folder, or an .mks file to mux the script and fonts into
    #[arg(short = 'o', long = "output", value_name = "DIR|FILE.mks", value_hint = ValueHint::AnyPath)]
    output: Option<PathBuf>,

    /// Emit the match report as a JSON object
    #[arg(long = "json", action = ArgAction::SetTrue, conflicts_with = "ndjson")]
    json: bool,

    /// Emit the match report as newline-delimited JSON
    #[arg(long = "ndjson", action = ArgAction::SetTrue)]
    ndjson: bool,

    /// Control colorized output (auto|always|never)
    #[arg(long = "color", default_value_t = ColorChoice::Auto, value_enum)]
    color: ColorChoice,

    /// Config file to read instead of the per-user one
    #[arg(long = "config", value_hint = ValueHint::FilePath)]
    config: Option<PathBuf>,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum ColorChoice {
    Auto,
    Always,
    Never,
}

impl CollectArgs {
    fn overrides(&self) -> Overrides {
        Overrides {
            include: self.include.clone(),
            include_system_fonts: pair(self.with_system, self.without_system),
            exclude_unused_fonts: pair(self.exclude_unused_fonts, self.include_unused_fonts),
            exclude_comments: pair(self.exclude_comments, self.include_comments),
            verbose: self.verbose,
            log_file: self.log_file.clone(),
            cache_path: self.cache_path.clone(),
            jobs: self.jobs,
        }
    }
}

/// Map a `--x`/`--no-x` flag pair to an optional override.
fn pair(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

/// Parse CLI args and execute the selected command.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Collect(args) => run_collect(args),
        Command::Cache { command } => match command {
            CacheCommand::List(args) => run_cache_list(args),
            CacheCommand::Clear(args) => run_cache_clear(args),
        },
    }
}

fn run_collect(args: CollectArgs) -> Result<()> {
    let settings = FileConfig::load(args.config.as_deref())?.merge(args.overrides());
    init_logging(settings.verbose, settings.log_file.as_deref())?;
    debug!("{settings:?}");

    let script_path = std::path::absolute(&args.script)
        .with_context(|| format!("resolving {}", args.script.display()))?;
    let script = load_script(&script_path)?;
    let required = collect_usage(
        &script,
        &CollectOptions {
            exclude_unused_styles: settings.exclude_unused_fonts,
            exclude_comments: settings.exclude_comments,
        },
    );
    debug!("script needs {} font styles", required.len());

    let store = cache_store(settings.cache_path.clone());
    if args.rebuild_cache && store.discard()? {
        info!("discarded font cache {}", store.path().display());
    }

    let files = gather_font_files(&settings)?;
    let (index, delta) = FontIndex::build(&files, &store, &IndexOptions { jobs: settings.jobs })?;
    debug!(
        "index: {} faces, {} added, {} removed, {} failed",
        index.len(),
        delta.added,
        delta.removed,
        delta.failed
    );

    let outcome = match_fonts(&required, &index);
    for (attrs, usage) in &outcome.not_found {
        warn!("{}", describe_missing(attrs, usage));
    }
    info!("Total found: {}", outcome.found.len());
    info!("Total not found: {}", outcome.not_found.len());

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    let use_color = match args.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => handle.is_terminal(),
    };

    if args.ndjson {
        write_ndjson(&MatchReport::from(&outcome), &mut handle)?;
    } else if args.json {
        write_json_pretty(&MatchReport::from(&outcome), &mut handle)?;
    } else {
        write_plain(&outcome, &mut handle, use_color)?;
    }

    if let Some(output) = &args.output {
        let fonts = found_files(&outcome);
        deliver(
            &Delivery::for_output(output),
            &settings.mkvmerge,
            &script_path,
            &fonts,
        )?;
    }

    Ok(())
}

fn run_cache_list(args: CacheListArgs) -> Result<()> {
    let store = cache_store_for(&args.common)?;
    let records = store.load().fonts;

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    if args.json {
        let json = serde_json::to_string_pretty(&records)?;
        writeln!(handle, "{json}")?;
    } else {
        write_records(&records, &mut handle)?;
    }
    Ok(())
}

fn run_cache_clear(args: CacheArgs) -> Result<()> {
    let store = cache_store_for(&args)?;
    if store.discard()? {
        println!("removed {}", store.path().display());
    } else {
        println!("no cache at {}", store.path().display());
    }
    Ok(())
}

fn cache_store_for(args: &CacheArgs) -> Result<CacheStore> {
    let file = FileConfig::load(args.config.as_deref())?;
    Ok(cache_store(args.cache_path.clone().or(file.cache_path)))
}

fn cache_store(path: Option<PathBuf>) -> CacheStore {
    CacheStore::new(path.unwrap_or_else(default_cache_path))
}

/// Font files under the configured directories (and system roots).
fn gather_font_files(settings: &Settings) -> Result<Vec<PathBuf>> {
    let roots = gather_roots(settings, system_font_roots)?;
    if roots.is_empty() {
        warn!("no font directories configured");
        return Ok(Vec::new());
    }
    let found = PathDiscovery::new(roots).discover()?;
    Ok(found.into_iter().map(|f| f.path).collect())
}

fn gather_roots(
    settings: &Settings,
    system_roots: impl FnOnce() -> Result<Vec<PathBuf>>,
) -> Result<Vec<PathBuf>> {
    let mut roots = Vec::new();
    for dir in &settings.font_dirs {
        if dir.exists() {
            roots.push(dir.clone());
        } else {
            warn!("font directory does not exist: {}", dir.display());
        }
    }

    if settings.include_system_fonts {
        match system_roots() {
            Ok(dirs) => roots.extend(dirs),
            Err(err) => warn!("{err}"),
        }
    }

    roots.sort();
    roots.dedup();
    Ok(roots)
}

fn found_files(outcome: &MatchOutcome) -> Vec<PathBuf> {
    unique_files(outcome.found.values().map(|r| r.path.as_path()))
}

fn write_plain(outcome: &MatchOutcome, mut w: impl Write, color: bool) -> Result<()> {
    for (attrs, record) in &outcome.found {
        let path = apply_color(&path_with_offset(record), color, AnsiColor::Cyan);
        writeln!(w, "{path}  {attrs}")?;
    }
    for attrs in outcome.not_found.keys() {
        let missing = apply_color("(missing)", color, AnsiColor::Yellow);
        writeln!(w, "{missing}  {attrs}")?;
    }
    Ok(())
}

fn write_records(records: &[FontRecord], mut w: impl Write) -> Result<()> {
    for record in records {
        let names: Vec<&str> = record.names.iter().map(String::as_str).collect();
        writeln!(
            w,
            "{}  {}  weight:{} italic:{}",
            path_with_offset(record),
            names.join(", "),
            record.weight,
            record.slant
        )?;
    }
    Ok(())
}

#[derive(Copy, Clone)]
enum AnsiColor {
    Cyan,
    Yellow,
}

fn apply_color(text: &str, color: bool, code: AnsiColor) -> String {
    if !color {
        return text.to_string();
    }

    let code_str = match code {
        AnsiColor::Cyan => "36",
        AnsiColor::Yellow => "33",
    };

    format!("\u{1b}[{}m{}\u{1b}[0m", code_str, text)
}

fn path_with_offset(record: &FontRecord) -> String {
    if record.face_offset == 0 {
        record.path.display().to_string()
    } else {
        format!("{}@{}", record.path.display(), record.face_offset)
    }
}

#[cfg(test)]
mod tests;
