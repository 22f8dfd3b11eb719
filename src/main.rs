use anyhow::Result;
use clap::Parser;
use openqa_review::build_select::{BuildSelection, ReviewTarget};
use openqa_review::cli::{Cli, OutputFormat};
use openqa_review::comparison::{ReviewConfig, Verbosity};
use openqa_review::json_output::JsonReview;
use openqa_review::product::CompareOptions;
use openqa_review::report::{timestamp_now, RenderOptions};
use openqa_review::runner::{ReviewRunner, RunOptions, SnapshotStore};
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber; `-v` count selects the default level
fn init_tracing(log_level: u8) {
    let level = match log_level {
        0 | 1 => Level::ERROR,
        2 => Level::WARN,
        3 => Level::INFO,
        _ => Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .init();
}

/// Resolve the review configuration: file, then command line overrides
fn load_config(args: &Cli) -> Result<ReviewConfig> {
    let mut config = match &args.config {
        Some(path) => ReviewConfig::from_file(path)?,
        None => ReviewConfig::default(),
    };
    if let Some(root_url) = args.root_url()? {
        config.root_url = root_url;
    }
    if let Some(threshold) = args.running_threshold {
        config.running_threshold = threshold;
    }
    if let Some(green) = args.green_max_still_failing {
        config.badge.green_max_still_failing = green;
    }
    if let Some(amber) = args.amber_max_still_failing {
        config.badge.amber_max_still_failing = amber;
    }
    config.validate()?;
    Ok(config)
}

fn build_selection(args: &Cli) -> BuildSelection {
    match (&args.builds, &args.against_reviewed) {
        (Some(builds), _) => BuildSelection::Explicit(builds.clone()),
        (None, Some(target)) => BuildSelection::AgainstReviewed(ReviewTarget::parse(target)),
        (None, None) => BuildSelection::Latest,
    }
}

fn main() -> Result<()> {
    let args = Cli::parse();

    if args.jobs == 0 {
        anyhow::bail!("Invalid value for --jobs: 0 (must be >= 1)");
    }

    init_tracing(args.log_level());
    tracing::debug!("args: {:?}", args);

    let config = load_config(&args)?;

    let options = RunOptions {
        compare: CompareOptions {
            arch_filter: args.arch.clone(),
            thresholds: config.badge,
        },
        selection: build_selection(&args),
        job_groups: args.job_groups.clone(),
        job_group_urls: args
            .job_group_urls
            .as_deref()
            .map(|urls| urls.split(',').map(|u| u.trim().to_string()).collect())
            .unwrap_or_default(),
        jobs: args.jobs,
        config,
    };

    let runner = ReviewRunner::new(SnapshotStore::new(&args.load_dir), options);
    let output = runner.run()?;

    if args.state_results_enabled() {
        println!("{}", output.state_results_dump());
    }

    let now = timestamp_now();
    match args.format {
        OutputFormat::Text => {
            let render = RenderOptions::new(
                Verbosity::new(args.test_verbosity()),
                runner.options().config.root_url.clone(),
            );
            println!("{}", output.to_markdown(&render, &now));
        }
        OutputFormat::Json => {
            println!("{}", JsonReview::new(&output, &now).to_json()?);
        }
    }

    Ok(())
}
