// src/log.rs
//
// Tracing setup: human-readable lines on stderr, plus an optional append-only
// debug log with elapsed-time stamps (`.store/debug.log` by default).
// `RUST_LOG` overrides the verbosity flag.

use std::fs::{self, File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn,shelfscan=info",
        1 => "warn,shelfscan=debug",
        _ => "info,shelfscan=trace",
    }
}

fn open_log(path: &Path) -> Option<File> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).ok()?;
        }
    }
    match OpenOptions::new().create(true).append(true).open(path) {
        Ok(f) => Some(f),
        Err(e) => {
            // subscriber is not up yet
            eprintln!("warning: cannot open log file {}: {e}", path.display());
            None
        }
    }
}

/// Install the global subscriber. Safe to call more than once; later calls are ignored.
pub fn init(verbosity: u8, log_file: Option<&Path>) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

    let file_layer = log_file.and_then(open_log).map(|file| {
        fmt::layer()
            .with_ansi(false)
            .with_timer(fmt::time::uptime())
            .with_writer(Mutex::new(file))
    });

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(file_layer)
        .try_init();
}
