//! Selection of the two builds to compare from a job group page
//!
//! Supports:
//! - The two newest finished builds (default)
//! - An explicit pair: `-b 0128,0123`
//! - A build against the last reviewed one found in review comments: `-B 0128` or `-B last`

use crate::document::{BuildRow, Document};
use crate::error::{ReviewError, Result};
use crate::links::{quote, unquote};
use regex::Regex;
use std::sync::OnceLock;
use tracing::{debug, info, warn};

/// Which build to compare against the last reviewed one
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewTarget {
    /// Newest finished build
    Last,
    Build(String),
}

impl ReviewTarget {
    pub fn parse(spec: &str) -> Self {
        match spec.trim() {
            "last" => ReviewTarget::Last,
            other => ReviewTarget::Build(other.to_string()),
        }
    }
}

/// How the current/previous build pair is chosen
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum BuildSelection {
    #[default]
    Latest,
    /// Comma separated `current,previous` labels
    Explicit(String),
    AgainstReviewed(ReviewTarget),
}

/// URLs of the two build pages to compare
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildPair {
    pub current_url: String,
    pub previous_url: String,
}

fn build_param_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"build=([^&]*)").expect("static regex"))
}

fn reviewed_build_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?m)[bB]uild:\** *(?:Build)?([\w@]*)(.*reference.*)?$").expect("static regex")
    })
}

/// Build number without an optional leading `Build`
pub fn build_id(label: &str) -> &str {
    let label = label.trim();
    label.strip_prefix("Build").unwrap_or(label).trim()
}

/// Decoded value of the `build=` query parameter of a build URL
pub fn build_label_from_url(url: &str) -> Option<String> {
    build_param_re()
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| unquote(m.as_str()))
}

/// Replace the `build=` query value of `url` with `label`
fn with_build(url: &str, label: &str) -> String {
    let replacement = format!("build={}", quote(label));
    build_param_re()
        .replace_all(url, regex::NoExpand(&replacement))
        .into_owned()
}

/// Finished, non-empty builds in page order (newest first)
///
/// A build counts as finished when at most `running_threshold` percent of
/// its jobs are still running, and as empty when neither passed nor failed
/// jobs are shown.
pub fn find_finished_builds(rows: &[BuildRow], running_threshold: f64) -> Vec<&BuildRow> {
    let builds: Vec<&BuildRow> = rows
        .iter()
        .filter(|row| row.running_percent <= running_threshold)
        .filter(|row| row.passed_percent > 0.0 || row.failed_percent > 0.0)
        .collect();
    debug!(
        "Found the following finished non-empty builds: {}",
        builds
            .iter()
            .map(|b| build_id(&b.label))
            .collect::<Vec<_>>()
            .join(", ")
    );
    builds
}

/// Last reviewed build number from the most recent matching review comment
///
/// Comments may be rendered text (`Build: 0123`) or the raw markdown of a
/// previous report (`**Build:** 0123 (reference 0120)`).
pub fn last_reviewed_build(comments: &[String]) -> Option<String> {
    comments.iter().find_map(|comment| {
        reviewed_build_re()
            .captures(comment)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
            .filter(|build| !build.is_empty())
    })
}

fn explicit_pair(spec: &str) -> Result<(String, String)> {
    let labels: Vec<&str> = spec.split(',').map(str::trim).collect();
    match labels.as_slice() {
        [current, previous] if !current.is_empty() && !previous.is_empty() => {
            for label in [current, previous] {
                if label.len() < 4 {
                    warn!(
                        "A build number of at least four digits is expected with leading zero, expect weird results."
                    );
                }
            }
            Ok((current.to_string(), previous.to_string()))
        }
        _ => Err(ReviewError::InvalidBuildSpec(format!(
            "expected exactly two comma separated builds, got '{}'",
            spec
        ))),
    }
}

/// Pick the current and previous build page URLs from a job group page
///
/// # Errors
/// - `InsufficientBuilds` when fewer than two finished builds exist for the
///   default selection, or none at all for an explicit one
/// - `InvalidBuildSpec` for malformed or implausible explicit selections
pub fn select_builds(
    page: &dyn Document,
    selection: &BuildSelection,
    running_threshold: f64,
) -> Result<BuildPair> {
    let rows = page.builds();
    let finished = find_finished_builds(&rows, running_threshold);

    let labels = match selection {
        BuildSelection::Latest => None,
        BuildSelection::Explicit(spec) => Some(explicit_pair(spec)?),
        BuildSelection::AgainstReviewed(target) => {
            match last_reviewed_build(&page.review_comments()) {
                None => {
                    info!("No last reviewed build found, reverting to two last finished");
                    None
                }
                Some(last_reviewed) => {
                    let to_review = match target {
                        ReviewTarget::Last => finished
                            .first()
                            .map(|b| build_id(&b.label).to_string())
                            .ok_or_else(|| {
                                ReviewError::InsufficientBuilds("no finished builds found".into())
                            })?,
                        ReviewTarget::Build(build) => build.clone(),
                    };
                    debug!(
                        "Comparing specified build {} against last reviewed {}",
                        to_review, last_reviewed
                    );
                    if to_review.len() > last_reviewed.len() + 1 {
                        return Err(ReviewError::InvalidBuildSpec(format!(
                            "build to review '{}' and last reviewed '{}' differ too much to make sense",
                            to_review, last_reviewed
                        )));
                    }
                    Some((to_review, last_reviewed))
                }
            }
        }
    };

    let pair = match labels {
        Some((current, previous)) => {
            let template = finished.first().ok_or_else(|| {
                ReviewError::InsufficientBuilds("no finished builds found".into())
            })?;
            BuildPair {
                current_url: with_build(&template.url, &current),
                previous_url: with_build(&template.url, &previous),
            }
        }
        None => match finished.as_slice() {
            [current, previous, ..] => {
                debug!(
                    "Comparing build {} against {}",
                    build_id(&current.label),
                    build_id(&previous.label)
                );
                BuildPair {
                    current_url: current.url.clone(),
                    previous_url: previous.url.clone(),
                }
            }
            _ => {
                return Err(ReviewError::InsufficientBuilds(format!(
                    "{} finished build(s) found, need two",
                    finished.len()
                )))
            }
        },
    };

    debug!(
        "Found two build URLs, current: {} previous: {}",
        pair.current_url, pair.previous_url
    );
    Ok(pair)
}
