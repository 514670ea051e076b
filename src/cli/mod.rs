use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info};

use crate::config::{PreviewConfig, Verbosity, WatchConfig, DEFAULT_CONTENT_SIZE};
use crate::watch;

/// Path watched when none is given
pub const DEFAULT_WATCH_PATH: &str = "./";

/// Watch a file or directory and preview what gets written to it
#[derive(Parser, Debug)]
#[command(name = "fspeek")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// File or directory to watch (defaults to the current directory)
    pub path: Option<PathBuf>,

    /// Show the content of files when they are written
    #[arg(short, long)]
    pub content: bool,

    /// Bytes of content to show per write (at most 10240)
    #[arg(short = 's', long = "size", value_name = "BYTES", default_value_t = DEFAULT_CONTENT_SIZE)]
    pub size: usize,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.verbose, self.quiet)
    }

    /// Build the startup configuration. Logs a warning if `--size` had to be clamped.
    pub fn into_config(self) -> WatchConfig {
        let verbosity = self.verbosity();
        let target = self.path.unwrap_or_else(|| PathBuf::from(DEFAULT_WATCH_PATH));

        WatchConfig::new(target, PreviewConfig::new(self.content, self.size)).with_verbosity(verbosity)
    }
}

/// Exit status for a failed parse: 0 for help and version, 1 for usage errors
pub fn exit_code(err: &clap::Error) -> i32 {
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
        _ => 1,
    }
}

/// Parse the process arguments, exiting on help, version or bad usage
pub fn parse() -> Cli {
    match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // Nothing left to report to if stderr is gone; exit either way
            let _ = e.print();
            std::process::exit(exit_code(&e));
        }
    }
}

/// Log a fatal error and return the exit status for it
pub fn fatal(err: &anyhow::Error) -> i32 {
    error!("{:#}", err);
    1
}

/// Watch the configured path until the process is killed
pub async fn run(config: WatchConfig) -> Result<()> {
    info!(path = %config.target.display(), "The notify path is: {}", config.target.display());
    if config.preview.enabled {
        info!(
            budget = config.preview.byte_budget,
            chunk = config.preview.chunk_size,
            "content preview enabled"
        );
    }

    let handle = watch::start(&config.target)
        .with_context(|| format!("Failed to watch {}", config.target.display()))?;

    watch::run(handle, config.preview).await;

    // Nothing ever signals completion; keep running until an external signal ends the process
    std::future::pending::<()>().await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MAX_CONTENT_SIZE;
    use crate::test_support::capture_logs;
    use tracing::Level;
    use clap::CommandFactory;
    use pretty_assertions::assert_eq;

    fn parse_from(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(args)
    }

    #[test]
    fn test_command_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let config = parse_from(&["fspeek"]).unwrap().into_config();

        assert_eq!(config.target, PathBuf::from("./"));
        assert!(!config.preview.enabled);
        assert_eq!(config.preview.byte_budget, DEFAULT_CONTENT_SIZE);
        assert_eq!(config.verbosity, Verbosity::Normal);
    }

    #[test]
    fn test_content_flags() {
        let config = parse_from(&["fspeek", "-c", "-s", "512", "/var/log/app.log"])
            .unwrap()
            .into_config();

        assert_eq!(config.target, PathBuf::from("/var/log/app.log"));
        assert!(config.preview.enabled);
        assert_eq!(config.preview.byte_budget, 512);
    }

    #[test]
    fn test_size_is_clamped() {
        let config = parse_from(&["fspeek", "--content", "--size", "20000"])
            .unwrap()
            .into_config();
        assert_eq!(config.preview.byte_budget, MAX_CONTENT_SIZE);

        let config = parse_from(&["fspeek", "--size", "10240"]).unwrap().into_config();
        assert_eq!(config.preview.byte_budget, 10240);
    }

    #[test]
    fn test_startup_clamp_warns_once() {
        let cli = parse_from(&["fspeek", "-c", "-s", "20000"]).unwrap();
        let (config, logs) = capture_logs(|| cli.into_config());

        assert_eq!(config.preview.byte_budget, MAX_CONTENT_SIZE);
        assert_eq!(logs.count(Level::WARN), 1);
    }

    #[test]
    fn test_help_exits_zero() {
        let err = parse_from(&["fspeek", "-h"]).unwrap_err();
        assert_eq!(exit_code(&err), 0);

        let err = parse_from(&["fspeek", "--version"]).unwrap_err();
        assert_eq!(exit_code(&err), 0);
    }

    #[test]
    fn test_two_paths_is_usage_error() {
        let err = parse_from(&["fspeek", "a.log", "b.log"]).unwrap_err();
        assert_eq!(exit_code(&err), 1);
    }

    #[test]
    fn test_bad_size_is_usage_error() {
        for size in ["-5", "lots"] {
            let err = parse_from(&["fspeek", "-s", size]).unwrap_err();
            assert_eq!(exit_code(&err), 1);
        }
    }

    #[test]
    fn test_verbosity_flags() {
        assert_eq!(parse_from(&["fspeek", "-v"]).unwrap().verbosity(), Verbosity::Verbose);
        assert_eq!(parse_from(&["fspeek", "-q"]).unwrap().verbosity(), Verbosity::Quiet);
    }

    #[tokio::test]
    async fn test_run_fails_on_missing_path() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = WatchConfig::new(dir.path().join("missing"), PreviewConfig::default());

        let err = run(config).await.unwrap_err();
        assert!(err.to_string().contains("Failed to watch"));

        let (code, logs) = capture_logs(|| fatal(&err));
        assert_eq!(code, 1);
        assert_eq!(logs.count(Level::ERROR), 1);
        assert!(logs.contains(Level::ERROR, "watch path does not exist"));
    }
}
