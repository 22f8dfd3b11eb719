//! CLI argument parsing for openqa-review

use clap::{ArgAction, Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for review reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Markdown review template (default)
    Text,
    /// JSON format for machine parsing
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "openqa-review")]
#[command(version)]
#[command(
    about = "Compare the last two builds of openQA job groups and generate a review report",
    long_about = None
)]
pub struct Cli {
    /// Increase log verbosity, specify multiple times for more
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,

    /// Additional plain text output of arch-specific state results, e.g. all NEW_ISSUE; on in verbose mode
    #[arg(short = 's', long = "output-state-results")]
    pub output_state_results: bool,

    /// openQA host to access [default: https://openqa.opensuse.org]
    #[arg(long)]
    pub host: Option<String>,

    /// openQA base url [default: /]
    #[arg(long = "base-url")]
    pub base_url: Option<String>,

    /// Only handle selected job group(s), comma separated; each entry may be a regex
    #[arg(short = 'j', long = "job-groups", value_name = "PATTERNS")]
    pub job_groups: Option<String>,

    /// Only handle job group(s) given by URL, comma separated; skips the index page
    #[arg(short = 'J', long = "job-group-urls", value_name = "URLS")]
    pub job_group_urls: Option<String>,

    /// Explicit builds to compare as "current,previous" (single job group only)
    #[arg(short = 'b', long = "builds", conflicts_with = "against_reviewed")]
    pub builds: Option<String>,

    /// Compare BUILD (or "last") against the last reviewed build found in comments
    #[arg(short = 'B', long = "against-reviewed", value_name = "BUILD")]
    pub against_reviewed: Option<String>,

    /// Increase test result verbosity, specify up to three times
    #[arg(short = 'T', long = "verbose-test", action = ArgAction::Count)]
    pub verbose_test: u8,

    /// Only a single architecture, e.g. 'x86_64', not all
    #[arg(short = 'a', long = "arch")]
    pub arch: Option<String>,

    /// Percentage of jobs that may still be running for a build to count as finished
    #[arg(long = "running-threshold", value_name = "PERCENT")]
    pub running_threshold: Option<f64>,

    /// Directory with saved page snapshots to read instead of the network
    #[arg(long = "load-dir", default_value = ".")]
    pub load_dir: PathBuf,

    /// TOML configuration file (root_url, running_threshold, [badge])
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Highest still-failing count for a green badge
    #[arg(long = "green-max-still-failing", value_name = "N")]
    pub green_max_still_failing: Option<usize>,

    /// Highest still-failing count for an amber badge
    #[arg(long = "amber-max-still-failing", value_name = "N")]
    pub amber_max_still_failing: Option<usize>,

    /// Output format
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Worker threads for processing job groups
    #[arg(long = "jobs", default_value = "1")]
    pub jobs: usize,
}

pub const DEFAULT_HOST: &str = "https://openqa.opensuse.org";

impl Cli {
    /// Log verbosity level, 1 (errors only) by default
    pub fn log_level(&self) -> u8 {
        self.verbose.saturating_add(1)
    }

    /// Test result verbosity level, 1 (names only) by default
    pub fn test_verbosity(&self) -> u8 {
        self.verbose_test.saturating_add(1)
    }

    /// Root URL from `--host`/`--base-url`, if either was given
    pub fn root_url(&self) -> crate::Result<Option<String>> {
        if self.host.is_none() && self.base_url.is_none() {
            return Ok(None);
        }
        let host = self.host.as_deref().unwrap_or(DEFAULT_HOST);
        let base = self.base_url.as_deref().unwrap_or("/");
        crate::links::join_url(host, base).map(Some)
    }

    pub fn state_results_enabled(&self) -> bool {
        self.output_state_results || self.log_level() > 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["openqa-review"]);
        assert!(cli.root_url().unwrap().is_none());
        assert_eq!(cli.log_level(), 1);
        assert_eq!(cli.test_verbosity(), 1);
        assert_eq!(cli.format, OutputFormat::Text);
        assert_eq!(cli.jobs, 1);
        assert!(!cli.state_results_enabled());
    }

    #[test]
    fn test_cli_root_url() {
        let cli = Cli::parse_from(["openqa-review", "--base-url", "/openqa/"]);
        assert_eq!(
            cli.root_url().unwrap().as_deref(),
            Some("https://openqa.opensuse.org/openqa/")
        );
        let cli = Cli::parse_from(["openqa-review", "--host", "http://localhost:9526"]);
        assert_eq!(cli.root_url().unwrap().as_deref(), Some("http://localhost:9526/"));
    }

    #[test]
    fn test_cli_host_without_scheme_rejected() {
        let cli = Cli::parse_from(["openqa-review", "--host", "openqa.opensuse.org"]);
        assert!(cli.root_url().is_err());
    }

    #[test]
    fn test_cli_verbose_test_counts() {
        let cli = Cli::parse_from(["openqa-review", "-TTT"]);
        assert_eq!(cli.test_verbosity(), 4);
    }

    #[test]
    fn test_cli_verbose_enables_state_results() {
        let cli = Cli::parse_from(["openqa-review", "-v"]);
        assert_eq!(cli.log_level(), 2);
        assert!(cli.state_results_enabled());
    }

    #[test]
    fn test_cli_builds_conflict_with_against_reviewed() {
        let result = Cli::try_parse_from(["openqa-review", "-b", "0002,0001", "-B", "last"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_arch_and_job_groups() {
        let cli = Cli::parse_from([
            "openqa-review",
            "-a",
            "x86_64",
            "-j",
            "Tumbleweed,(Gnome|KDE)",
        ]);
        assert_eq!(cli.arch.as_deref(), Some("x86_64"));
        assert_eq!(cli.job_groups.as_deref(), Some("Tumbleweed,(Gnome|KDE)"));
    }

    #[test]
    fn test_cli_threshold_overrides() {
        let cli = Cli::parse_from([
            "openqa-review",
            "--green-max-still-failing",
            "0",
            "--amber-max-still-failing",
            "3",
            "--running-threshold",
            "12.5",
        ]);
        assert_eq!(cli.green_max_still_failing, Some(0));
        assert_eq!(cli.amber_max_still_failing, Some(3));
        assert_eq!(cli.running_threshold, Some(12.5));
    }
}
