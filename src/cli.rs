// src/cli.rs
use std::{env, path::PathBuf};

use clap::{ArgAction, Parser, ValueEnum};
use color_eyre::eyre::Result;
use reqwest::blocking::Client;
use tracing::error;

use crate::{
    config::{consts::{ENV_WEBHOOK, LOG_FILE}, Config},
    core::net::HttpTransport,
    data::{SourceMode, Status},
    error::SetupError,
    notify::{self, Notifier, NullNotifier, WebhookNotifier},
    progress::Progress,
    runner::{self, RunOptions},
};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ModeArg {
    Live,
    Curated,
}

impl From<ModeArg> for SourceMode {
    fn from(m: ModeArg) -> Self {
        match m {
            ModeArg::Live => SourceMode::Live,
            ModeArg::Curated => SourceMode::Curated,
        }
    }
}

/// Fetch best-seller listings and write an ordered, always-complete dataset.
#[derive(Debug, Parser)]
#[command(name = "shelfscan", version, about)]
pub struct Args {
    /// TOML config file (default: ./shelfscan.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Acquisition strategy for this deployment
    #[arg(long, value_enum)]
    mode: Option<ModeArg>,

    /// Directory for products.json and links.md
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Root for the r/ and go/ redirect pages
    #[arg(long)]
    site_dir: Option<PathBuf>,

    /// Curated fallback identifiers (JSON object of lists)
    #[arg(long)]
    seed_file: Option<PathBuf>,

    /// Skip links.md and redirect pages
    #[arg(long)]
    no_publish: bool,

    /// Never post to the webhook, even when configured
    #[arg(long)]
    no_notify: bool,

    /// Resolve everything but write nothing
    #[arg(long)]
    dry_run: bool,

    /// Append-only debug log
    #[arg(long, default_value = LOG_FILE)]
    log_file: PathBuf,

    #[arg(long)]
    no_log_file: bool,

    /// -v debug, -vv trace
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

/// Prints one line per category to stdout.
#[derive(Default)]
struct ConsoleProgress {
    total: usize,
    done: usize,
}

impl Progress for ConsoleProgress {
    fn begin(&mut self, total: usize) {
        self.total = total;
    }

    fn item_done(&mut self, key: &str, status: Status, count: usize) {
        self.done += 1;
        println!("[{}/{}] {key}: {count} ({status})", self.done, self.total);
    }
}

pub fn run() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();
    crate::log::init(args.verbose, (!args.no_log_file).then_some(args.log_file.as_path()));

    let config = match load_config(&args) {
        Ok(c) => c,
        Err(e) => return Err(setup_failed(e, None, args.no_notify)),
    };
    let transport = match check(&config) {
        Ok(t) => t,
        Err(e) => return Err(setup_failed(e, Some(&config), args.no_notify)),
    };

    let notifier: Box<dyn Notifier> = match (&config.notify.webhook_url, args.no_notify) {
        (Some(url), false) => Box::new(WebhookNotifier::new(transport.client().clone(), url.as_str())),
        _ => Box::new(NullNotifier),
    };

    let mut progress = ConsoleProgress::default();
    let opts = RunOptions { dry_run: args.dry_run };
    match runner::run(&config, &transport, notifier.as_ref(), opts, Some(&mut progress)) {
        Ok(summary) => {
            println!("Total: {} items across {} categories", summary.record.totals, summary.record.results.len());
            for p in &summary.files_written {
                tracing::debug!(path = %p.display(), "written");
            }
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "run failed");
            notify::deliver(notifier.as_ref(), &notify::render_failure(&e));
            Err(e.into())
        }
    }
}

/// File, then environment, then flags. Not validated yet.
fn load_config(args: &Args) -> Result<Config, SetupError> {
    let mut config = Config::load(args.config.as_deref())?;
    config.apply_env(|name| env::var(name).ok());

    if let Some(mode) = args.mode {
        config.scrape.mode = mode.into();
    }
    if let Some(dir) = &args.data_dir {
        config.output.data_dir = dir.clone();
    }
    if let Some(dir) = &args.site_dir {
        config.output.site_dir = dir.clone();
    }
    if let Some(path) = &args.seed_file {
        config.output.seed_file = path.clone();
    }
    if args.no_publish {
        config.output.publish = false;
    }
    Ok(config)
}

fn check(config: &Config) -> Result<HttpTransport, SetupError> {
    config.validate()?;
    Ok(HttpTransport::new(&config.net)?)
}

fn setup_failed(err: SetupError, config: Option<&Config>, no_notify: bool) -> color_eyre::Report {
    error!(error = %err, "setup failed");
    if !no_notify {
        if let Some(url) = failure_endpoint(config, |name| env::var(name).ok()) {
            notify_setup_failure(&url, &err);
        }
    }
    err.into()
}

/// Webhook for a setup failure. A loaded config already carries the env
/// override; without one only the environment is left.
fn failure_endpoint<F>(config: Option<&Config>, lookup: F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    let url = match config {
        Some(c) => c.notify.webhook_url.clone(),
        None => lookup(ENV_WEBHOOK),
    };
    url.map(|u| u.trim().to_string()).filter(|u| !u.is_empty())
}

fn notify_setup_failure(url: &str, err: &SetupError) {
    match Client::builder().build() {
        Ok(client) => notify::deliver(&WebhookNotifier::new(client, url), &notify::render_failure(err)),
        Err(e) => error!(error = %e, "cannot build client for failure notification"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn invalid_config_still_reports_to_its_own_webhook() {
        let cfg = Config::from_toml(
            r#"
            [scrape]
            limit = 3
            min_accept = 5

            [notify]
            webhook_url = "https://chat.example/hooks/abc"
            "#,
        )
        .unwrap();
        assert!(check(&cfg).is_err());
        assert_eq!(
            failure_endpoint(Some(&cfg), no_env).as_deref(),
            Some("https://chat.example/hooks/abc")
        );
    }

    #[test]
    fn unloaded_config_falls_back_to_env() {
        let env = |name: &str| (name == ENV_WEBHOOK).then(|| " https://chat.example/env ".to_string());
        assert_eq!(failure_endpoint(None, env).as_deref(), Some("https://chat.example/env"));
        assert_eq!(failure_endpoint(None, no_env), None);
    }

    #[test]
    fn loaded_config_without_webhook_sends_nothing() {
        let cfg = Config::default();
        let env = |_: &str| Some("https://chat.example/env".to_string());
        assert_eq!(failure_endpoint(Some(&cfg), env), None);
    }

    #[test]
    fn flags_override_loaded_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shelfscan.toml");
        std::fs::write(&path, "[scrape]\nmode = \"live\"\nlimit = 7\n").unwrap();
        let path = path.to_string_lossy().into_owned();

        let args = Args::parse_from([
            "shelfscan", "--config", path.as_str(), "--mode", "curated", "--no-publish", "--data-dir", "out",
        ]);
        let cfg = load_config(&args).unwrap();
        assert_eq!(cfg.scrape.mode, SourceMode::Curated);
        assert_eq!(cfg.scrape.limit, 7);
        assert!(!cfg.output.publish);
        assert_eq!(cfg.output.data_dir, PathBuf::from("out"));
    }
}
