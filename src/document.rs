//! Dashboard page abstraction
//!
//! The comparison engine never looks at page markup. Everything it needs from
//! a fetched dashboard page goes through the [`Document`] trait; the
//! [`SnapshotDocument`] adapter implements it over a JSON snapshot of a page.

use crate::error::{ReviewError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

/// A failed module as listed on a test entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawFailedModule {
    pub name: String,
    pub href: String,
    #[serde(default)]
    pub needles: Vec<String>,
}

/// One test cell of a build overview page, before status parsing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestEntry {
    /// Cell identifier, e.g. `res_DVD_x86_64_textmode`
    pub id: String,
    /// Status token such as `result_failed`; `None` when the page lacks one
    #[serde(default)]
    pub status: Option<String>,
    pub href: String,
    #[serde(default)]
    pub failed_modules: Vec<RawFailedModule>,
}

/// One build row of a job group overview page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildRow {
    /// Label as displayed, e.g. `Build0123`
    pub label: String,
    pub url: String,
    /// Share of jobs still running, in percent
    #[serde(default)]
    pub running_percent: f64,
    #[serde(default)]
    pub passed_percent: f64,
    #[serde(default)]
    pub failed_percent: f64,
}

/// Link to a job group on the dashboard index page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobGroupLink {
    pub name: String,
    pub href: String,
}

/// Read access to one fetched dashboard page
pub trait Document {
    /// Summary badge counts, category name → count
    fn summary_counts(&self) -> BTreeMap<String, u64>;

    /// Test entries belonging to `arch`
    fn test_entries(&self, arch: &str) -> Vec<TestEntry>;

    /// Distinct architecture labels present on the page
    fn architectures(&self) -> BTreeSet<String>;

    /// Review comments, most recent first
    fn review_comments(&self) -> Vec<String>;

    fn build_label(&self) -> Option<String> {
        None
    }

    /// Build rows of a job group page, newest first
    fn builds(&self) -> Vec<BuildRow> {
        Vec::new()
    }

    fn job_groups(&self) -> Vec<JobGroupLink> {
        Vec::new()
    }
}

/// JSON snapshot of a dashboard page
///
/// All sections are optional so the same format covers the index page, job
/// group overviews and build overviews.
///
/// # Example
/// ```
/// use openqa_review::document::{Document, SnapshotDocument};
///
/// let doc = SnapshotDocument::from_json(r#"{
///     "build": "0042",
///     "architectures": ["x86_64"],
///     "results": [{"id": "res_DVD_x86_64_gnome", "status": "result_passed", "href": "/tests/7"}]
/// }"#).unwrap();
/// assert_eq!(doc.test_entries("x86_64").len(), 1);
/// assert_eq!(doc.build_label().as_deref(), Some("0042"));
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SnapshotDocument {
    #[serde(default)]
    pub build: Option<String>,
    #[serde(default)]
    pub summary: BTreeMap<String, u64>,
    #[serde(default)]
    pub architectures: Vec<String>,
    #[serde(default)]
    pub results: Vec<TestEntry>,
    #[serde(default)]
    pub comments: Vec<String>,
    #[serde(default)]
    pub builds: Vec<BuildRow>,
    #[serde(default)]
    pub job_groups: Vec<JobGroupLink>,
}

impl SnapshotDocument {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Load a snapshot from disk
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw).map_err(|source| ReviewError::InvalidSnapshot {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Normalize a summary badge caption, e.g. `"Passed: "` → `"passed"`
pub fn normalize_category(name: &str) -> String {
    name.trim().trim_end_matches(':').trim().to_lowercase()
}

impl Document for SnapshotDocument {
    fn summary_counts(&self) -> BTreeMap<String, u64> {
        let mut counts = BTreeMap::new();
        for (name, count) in &self.summary {
            let total: &mut u64 = counts.entry(normalize_category(name)).or_insert(0);
            *total = total.saturating_add(*count);
        }
        counts
    }

    fn test_entries(&self, arch: &str) -> Vec<TestEntry> {
        let needle = format!("{}_", arch);
        self.results
            .iter()
            .filter(|entry| entry.id.contains(&needle))
            .cloned()
            .collect()
    }

    fn architectures(&self) -> BTreeSet<String> {
        self.architectures
            .iter()
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty())
            .collect()
    }

    fn review_comments(&self) -> Vec<String> {
        self.comments.clone()
    }

    fn build_label(&self) -> Option<String> {
        self.build.clone()
    }

    fn builds(&self) -> Vec<BuildRow> {
        self.builds.clone()
    }

    fn job_groups(&self) -> Vec<JobGroupLink> {
        self.job_groups.clone()
    }
}
