//! Logging initialization.
//!
//! `RUST_LOG` takes precedence; otherwise `-v` selects debug and the default
//! is info. With a log file, every line goes to stderr and to the file.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use env_logger::{Builder, Target};
use log::LevelFilter;

pub fn init_logging(verbose: bool, log_file: Option<&Path>) -> Result<()> {
    let mut builder = Builder::new();
    builder.filter_level(level_for(verbose));
    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }

    builder.format(|buf, record| writeln!(buf, "[{}] {}", record.level(), record.args()));

    if let Some(path) = log_file {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("opening log file {}", path.display()))?;
        builder.target(Target::Pipe(Box::new(Tee { file })));
    }

    // A logger may already be installed (tests run several commands per process).
    let _ = builder.try_init();
    Ok(())
}

fn level_for(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

/// Copies log output to stderr and a file.
struct Tee {
    file: File,
}

impl Write for Tee {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        io::stderr().write_all(buf)?;
        self.file.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()?;
        self.file.flush()
    }
}
