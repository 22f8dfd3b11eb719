//! Multi-job-group review runs
//!
//! For every selected job group: pick the build pair, fetch both build pages,
//! compare them and collect the product report. Recoverable failures of one
//! job group turn into an inline placeholder; everything else aborts the run.

use crate::build_select::{build_label_from_url, select_builds, BuildSelection};
use crate::comparison::ReviewConfig;
use crate::document::{Document, SnapshotDocument};
use crate::error::{ReviewError, Result};
use crate::links::{join_url, url_to_filename};
use crate::product::{build_report, CompareOptions, ProductReport};
use crate::report::{render_product, RenderOptions};
use regex::Regex;
use std::path::PathBuf;
use tracing::{debug, error, info};

/// Provides fully materialized pages by URL
pub trait DocumentSource: Sync {
    type Doc: Document;

    fn fetch(&self, url: &str) -> Result<Self::Doc>;
}

/// Pages previously saved as JSON snapshots, one file per URL
///
/// File names come from [`url_to_filename`].
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    dir: PathBuf,
}

impl SnapshotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl DocumentSource for SnapshotStore {
    type Doc = SnapshotDocument;

    fn fetch(&self, url: &str) -> Result<SnapshotDocument> {
        let filename = url_to_filename(url);
        info!(
            "Loading content instead of URL {} from filename {}",
            url, filename
        );
        SnapshotDocument::from_file(&self.dir.join(filename))
    }
}

/// A job group to review
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobGroup {
    pub name: String,
    pub url: String,
}

/// Options of a whole review run
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub config: ReviewConfig,
    pub compare: CompareOptions,
    pub selection: BuildSelection,
    /// Comma separated job group name patterns
    pub job_groups: Option<String>,
    /// Explicit job group URLs; skips the index page
    pub job_group_urls: Vec<String>,
    /// Worker threads for job groups; 0 or 1 runs sequentially
    pub jobs: usize,
}

/// Result for one job group
#[derive(Debug, Clone)]
pub struct JobGroupOutcome {
    pub name: String,
    /// Report, or the placeholder message of a recoverable failure
    pub report: std::result::Result<ProductReport, String>,
}

/// All job group results of one run, ordered like the job groups
#[derive(Debug, Clone, Default)]
pub struct ReviewOutput {
    pub groups: Vec<JobGroupOutcome>,
}

impl ReviewOutput {
    /// Concatenated markdown: `# <name>` heading, report, `---` rule
    pub fn to_markdown(&self, opts: &RenderOptions, now: &str) -> String {
        let mut out = String::new();
        for group in &self.groups {
            let body = match &group.report {
                Ok(product) => render_product(product, opts, now),
                Err(placeholder) => placeholder.clone(),
            };
            out.push_str(&format!("# {}\n\n{}\n---\n", group.name, body));
        }
        out
    }

    /// Plain-text state listings of all successful job groups
    pub fn state_results_dump(&self) -> String {
        self.groups
            .iter()
            .filter_map(|g| g.report.as_ref().ok())
            .map(ProductReport::state_results_dump)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Placeholder text for a job group whose report could not be generated
pub fn placeholder(err: &ReviewError) -> String {
    format!("report could not be generated: {}", err)
}

/// Drives a review run against a document source
pub struct ReviewRunner<S: DocumentSource> {
    source: S,
    options: RunOptions,
}

impl<S: DocumentSource> ReviewRunner<S> {
    pub fn new(source: S, options: RunOptions) -> Self {
        Self { source, options }
    }

    pub fn options(&self) -> &RunOptions {
        &self.options
    }

    /// Resolve the job groups to review, ordered
    ///
    /// Explicit URLs keep their given order and are named by position; job
    /// groups from the index page are ordered by name.
    pub fn job_groups(&self) -> Result<Vec<JobGroup>> {
        let root = &self.options.config.root_url;
        if !self.options.job_group_urls.is_empty() {
            info!(
                "Acting on specified job group URL(s): {}",
                self.options.job_group_urls.join(", ")
            );
            return Ok(self
                .options
                .job_group_urls
                .iter()
                .enumerate()
                .map(|(i, url)| JobGroup {
                    name: i.to_string(),
                    url: url.clone(),
                })
                .collect());
        }

        let index = self.source.fetch(root)?;
        let mut groups: Vec<JobGroup> = index
            .job_groups()
            .into_iter()
            .map(|link| {
                Ok(JobGroup {
                    url: join_url(root, &link.href)?,
                    name: link.name,
                })
            })
            .collect::<Result<_>>()?;
        debug!(
            "job groups found: {:?}",
            groups.iter().map(|g| g.name.as_str()).collect::<Vec<_>>()
        );

        if let Some(patterns) = &self.options.job_groups {
            let alternatives: Vec<&str> = patterns.split(',').collect();
            let pattern = Regex::new(&format!("({})", alternatives.join("|"))).map_err(|e| {
                ReviewError::InvalidConfig(format!("invalid job group pattern '{}': {}", patterns, e))
            })?;
            groups.retain(|g| pattern.is_match(&g.name));
            info!(
                "Job group URL for {}: {:?}",
                patterns,
                groups.iter().map(|g| g.url.as_str()).collect::<Vec<_>>()
            );
        }

        groups.sort_by(|a, b| a.name.cmp(&b.name));
        groups.dedup_by(|a, b| a.name == b.name);
        Ok(groups)
    }

    /// Compare the build pair of one job group
    pub fn product_report(&self, group: &JobGroup) -> Result<ProductReport> {
        let options = &self.options;
        let root = &options.config.root_url;

        let page = self.source.fetch(&group.url)?;
        let pair = select_builds(&page, &options.selection, options.config.running_threshold)?;

        let current = self.source.fetch(&join_url(root, &pair.current_url)?)?;
        let previous = self.source.fetch(&join_url(root, &pair.previous_url)?)?;
        for details in [&current, &previous] {
            let total = details
                .summary_counts()
                .values()
                .fold(0u64, |sum, count| sum.saturating_add(*count));
            if total == 0 {
                return Err(ReviewError::InvalidBuildSpec(
                    "invalid page with no test results found, make sure you specified valid builds (leading zero missing?)"
                        .to_string(),
                ));
            }
        }

        let mut product = build_report(&current, &previous, &options.compare)?;
        if let Some(label) = build_label_from_url(&pair.current_url) {
            product.build_label = label;
        }
        if let Some(label) = build_label_from_url(&pair.previous_url) {
            product.previous_build_label = label;
        }
        Ok(product)
    }

    fn one_group(&self, group: &JobGroup) -> Result<JobGroupOutcome> {
        info!("Processing '{}'", group.name);
        let report = match self.product_report(group) {
            Ok(product) => Ok(product),
            Err(e) if e.is_recoverable() => {
                error!("Caught error {}, continuing with next job group.", e);
                Err(placeholder(&e))
            }
            Err(e) => return Err(e),
        };
        Ok(JobGroupOutcome {
            name: group.name.clone(),
            report,
        })
    }

    fn run_parallel(&self, groups: &[JobGroup]) -> Result<Vec<JobGroupOutcome>> {
        let mut outcomes = Vec::with_capacity(groups.len());
        for chunk in groups.chunks(self.options.jobs) {
            let results = crossbeam::thread::scope(|scope| {
                let handles: Vec<_> = chunk
                    .iter()
                    .map(|group| scope.spawn(move |_| self.one_group(group)))
                    .collect();
                handles
                    .into_iter()
                    .zip(chunk)
                    .map(|(handle, group)| {
                        handle.join().unwrap_or_else(|_| {
                            Err(ReviewError::Worker(format!("job group '{}' panicked", group.name)))
                        })
                    })
                    .collect::<Vec<_>>()
            })
            .map_err(|_| ReviewError::Worker("worker scope panicked".to_string()))?;

            for result in results {
                outcomes.push(result?);
            }
        }
        Ok(outcomes)
    }

    /// Review all selected job groups
    ///
    /// # Errors
    /// - `NoJobGroups` if nothing matched
    /// - `InvalidBuildSpec` if explicit builds are combined with several job groups
    /// - any non-recoverable error of a single job group
    pub fn run(&self) -> Result<ReviewOutput> {
        let groups = self.job_groups()?;
        if groups.is_empty() {
            return Err(ReviewError::NoJobGroups(
                "maybe misspecified '--job-groups'?".to_string(),
            ));
        }
        if matches!(self.options.selection, BuildSelection::Explicit(_)) && groups.len() > 1 {
            return Err(ReviewError::InvalidBuildSpec(
                "builds option and multiple job groups not supported".to_string(),
            ));
        }

        let groups_out = if self.options.jobs > 1 && groups.len() > 1 {
            self.run_parallel(&groups)?
        } else {
            groups
                .iter()
                .map(|group| self.one_group(group))
                .collect::<Result<Vec<_>>>()?
        };
        Ok(ReviewOutput { groups: groups_out })
    }
}
