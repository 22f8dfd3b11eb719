//! Product report orchestration
//!
//! Compares the current and previous build page of one job group across all
//! (or one selected) architectures.

use crate::comparison::{
    aggregate, compare_architecture, extract, ArchitectureReport, BadgeThresholds,
};
use crate::document::Document;
use crate::error::{ReviewError, Result};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info};

/// Options of a single product comparison
#[derive(Debug, Clone, Default)]
pub struct CompareOptions {
    /// Restrict the report to one architecture
    pub arch_filter: Option<String>,
    pub thresholds: BadgeThresholds,
}

/// Comparison of one job group's current build against its previous build
#[derive(Debug, Clone, Serialize)]
pub struct ProductReport {
    pub build_label: String,
    pub previous_build_label: String,
    /// Architectures of the previous build that did not run at all now
    pub missing_architectures: BTreeSet<String>,
    pub architecture_reports: BTreeMap<String, ArchitectureReport>,
}

impl ProductReport {
    /// Plain-text state listing of every architecture
    pub fn state_results_dump(&self) -> String {
        self.architecture_reports
            .values()
            .map(ArchitectureReport::state_results_dump)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Summary badge count changes, current minus previous
///
/// Categories `none` and `incomplete` are skipped; categories only present
/// in the previous build are not reported.
pub fn summary_delta(
    current: &BTreeMap<String, u64>,
    previous: &BTreeMap<String, u64>,
) -> BTreeMap<String, i128> {
    current
        .iter()
        .filter(|(name, _)| name.as_str() != "none" && name.as_str() != "incomplete")
        .map(|(name, count)| {
            let before = previous.get(name).copied().unwrap_or(0);
            (name.clone(), i128::from(*count) - i128::from(before))
        })
        .collect()
}

fn plural(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{} {}", count, singular)
    } else {
        format!("{} {}", count, plural)
    }
}

/// Compare `current` against `previous` and classify every current test
///
/// # Errors
/// - `InvalidArchitecture` if `arch_filter` is not part of the current build
/// - `Extraction` if a test entry of either page is malformed
pub fn build_report(
    current: &dyn Document,
    previous: &dyn Document,
    options: &CompareOptions,
) -> Result<ProductReport> {
    options.thresholds.validate()?;

    let changes = summary_delta(&current.summary_counts(), &previous.summary_counts());
    info!(
        "Changes since last build:\n\t{}",
        changes
            .iter()
            .map(|(name, delta)| format!("{}: {}", name, delta))
            .collect::<Vec<_>>()
            .join("\n\t")
    );

    let current_archs = current.architectures();
    let previous_archs = previous.architectures();

    let selected: Vec<String> = match &options.arch_filter {
        Some(arch) if current_archs.contains(arch) => vec![arch.clone()],
        Some(arch) => {
            return Err(ReviewError::InvalidArchitecture {
                arch: arch.clone(),
                available: current_archs.iter().cloned().collect(),
            })
        }
        None => current_archs.iter().cloned().collect(),
    };

    let missing_architectures: BTreeSet<String> =
        previous_archs.difference(&current_archs).cloned().collect();
    if !missing_architectures.is_empty() {
        info!(
            "{} missing completely from current run: {}",
            plural(
                missing_architectures.len(),
                "architecture is",
                "architectures are"
            ),
            missing_architectures
                .iter()
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(", ")
        );
    }

    let mut architecture_reports = BTreeMap::new();
    for arch in selected {
        let current_tests = extract(current, &arch)?;
        let previous_tests = extract(previous, &arch)?;
        let classified = compare_architecture(&arch, &current_tests, &previous_tests);
        let report = aggregate(&arch, classified, &options.thresholds);
        debug!(
            "arch {}: {} interesting of {} results",
            arch,
            report.interesting().len(),
            report.results.len()
        );
        architecture_reports.insert(arch, report);
    }

    Ok(ProductReport {
        build_label: label_of(current),
        previous_build_label: label_of(previous),
        missing_architectures,
        architecture_reports,
    })
}

fn label_of(document: &dyn Document) -> String {
    document
        .build_label()
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comparison::{Badge, TransitionState};
    use crate::document::SnapshotDocument;

    fn page(json: &str) -> SnapshotDocument {
        SnapshotDocument::from_json(json).unwrap()
    }

    fn current() -> SnapshotDocument {
        page(
            r#"{
            "build": "0123",
            "summary": {"passed": 3, "failed": 2, "softfailed": 0, "none": 4, "incomplete": 1},
            "architectures": ["x86_64", "i586"],
            "results": [
                {"id": "res_DVD_x86_64_a", "status": "result_failed", "href": "/tests/1"},
                {"id": "res_DVD_x86_64_b", "status": "result_passed", "href": "/tests/2"},
                {"id": "res_DVD_i586_a", "status": "result_passed", "href": "/tests/3"}
            ]
        }"#,
        )
    }

    fn previous() -> SnapshotDocument {
        page(
            r#"{
            "build": "0120",
            "summary": {"passed": 5, "failed": 1, "skipped": 2},
            "architectures": ["x86_64", "i586", "aarch64"],
            "results": [
                {"id": "res_DVD_x86_64_a", "status": "result_passed", "href": "/tests/91"},
                {"id": "res_DVD_x86_64_b", "status": "result_failed", "href": "/tests/92"},
                {"id": "res_DVD_aarch64_a", "status": "result_passed", "href": "/tests/93"}
            ]
        }"#,
        )
    }

    #[test]
    fn test_build_report_all_architectures() {
        let report = build_report(&current(), &previous(), &CompareOptions::default()).unwrap();
        assert_eq!(report.build_label, "0123");
        assert_eq!(report.previous_build_label, "0120");
        let archs: Vec<_> = report.architecture_reports.keys().cloned().collect();
        assert_eq!(archs, vec!["i586", "x86_64"]);

        let x86 = &report.architecture_reports["x86_64"];
        assert_eq!(x86.count(TransitionState::NewIssue), 1);
        assert_eq!(x86.count(TransitionState::Fixed), 1);
        assert_eq!(x86.badge, Badge::Red);
        assert_eq!(report.architecture_reports["i586"].badge, Badge::Green);
    }

    #[test]
    fn test_missing_architecture_detected() {
        let report = build_report(&current(), &previous(), &CompareOptions::default()).unwrap();
        assert_eq!(
            report.missing_architectures,
            BTreeSet::from(["aarch64".to_string()])
        );
        assert!(!report.architecture_reports.contains_key("aarch64"));
    }

    #[test]
    fn test_arch_filter() {
        let options = CompareOptions {
            arch_filter: Some("i586".into()),
            ..Default::default()
        };
        let report = build_report(&current(), &previous(), &options).unwrap();
        assert_eq!(report.architecture_reports.len(), 1);
        assert!(report.architecture_reports.contains_key("i586"));
    }

    #[test]
    fn test_arch_filter_unknown_fails() {
        let options = CompareOptions {
            arch_filter: Some("aarch64".into()),
            ..Default::default()
        };
        let err = build_report(&current(), &previous(), &options).unwrap_err();
        assert!(matches!(err, ReviewError::InvalidArchitecture { ref arch, .. } if arch == "aarch64"));
    }

    #[test]
    fn test_invalid_thresholds_rejected() {
        let options = CompareOptions {
            thresholds: BadgeThresholds {
                green_max_still_failing: 3,
                amber_max_still_failing: 2,
            },
            ..Default::default()
        };
        assert!(build_report(&current(), &previous(), &options).is_err());
    }

    #[test]
    fn test_summary_delta_skips_none_and_incomplete() {
        let delta = summary_delta(&current().summary_counts(), &previous().summary_counts());
        assert_eq!(delta.get("passed"), Some(&-2));
        assert_eq!(delta.get("failed"), Some(&1));
        assert_eq!(delta.get("softfailed"), Some(&0));
        assert!(!delta.contains_key("none"));
        assert!(!delta.contains_key("incomplete"));
        assert!(!delta.contains_key("skipped"));
    }

    #[test]
    fn test_huge_summary_counts_do_not_overflow() {
        let huge = page(&format!(
            r#"{{"summary": {{"Passed:": {max}, "passed": {max}}}, "architectures": []}}"#,
            max = u64::MAX
        ));
        let empty = page(r#"{"architectures": []}"#);
        assert!(build_report(&huge, &empty, &CompareOptions::default()).is_ok());

        let delta = summary_delta(&empty.summary_counts(), &huge.summary_counts());
        assert!(delta.is_empty());
        let delta = summary_delta(&huge.summary_counts(), &empty.summary_counts());
        assert_eq!(delta.get("passed"), Some(&i128::from(u64::MAX)));
    }

    #[test]
    fn test_missing_build_label_falls_back() {
        let doc = page(r#"{"architectures": []}"#);
        let report = build_report(&doc, &doc, &CompareOptions::default()).unwrap();
        assert_eq!(report.build_label, "unknown");
        assert!(report.architecture_reports.is_empty());
    }

    #[test]
    fn test_state_results_dump_covers_all_archs() {
        let report = build_report(&current(), &previous(), &CompareOptions::default()).unwrap();
        let dump = report.state_results_dump();
        assert!(dump.contains("arch: i586"));
        assert!(dump.contains("arch: x86_64"));
        assert!(dump.find("arch: i586") < dump.find("arch: x86_64"));
    }
}
