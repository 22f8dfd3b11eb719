// Architecture aggregation: classified results, health badge and ordering

use crate::comparison::classify::{classify, TransitionState};
use crate::comparison::config::BadgeThresholds;
use crate::comparison::extract::{strip_arch_prefix, TestMap};
use crate::comparison::status::TestRecord;
use serde::{Serialize, Serializer};
use std::collections::HashMap;

/// Health summary of one architecture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Badge {
    Green,
    Amber,
    Red,
}

impl Badge {
    /// Evaluate GREEN → AMBER → RED, first match wins
    pub fn from_counts(new_issues: usize, still_failing: usize, thresholds: &BadgeThresholds) -> Self {
        if new_issues == 0 && still_failing <= thresholds.green_max_still_failing {
            Badge::Green
        } else if new_issues == 0 && still_failing <= thresholds.amber_max_still_failing {
            Badge::Amber
        } else {
            Badge::Red
        }
    }

    /// Colored label as embedded in the markdown report
    pub fn label(self) -> &'static str {
        match self {
            Badge::Green => r#"<font color="green">Green</font>"#,
            Badge::Amber => r##"<font color="#FFBF00">Amber</font>"##,
            Badge::Red => r#"<font color="red">Red</font>"#,
        }
    }
}

/// Pointer to the matching entry of the previous build
///
/// Only the link is kept; the previous record itself stays with the
/// previous build's test map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReferenceLink {
    pub test_id: String,
    pub link: String,
}

/// One current-build test with its transition state
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassifiedResult {
    pub test_id: String,
    /// Test id with the architecture prefix stripped
    pub name: String,
    pub state: TransitionState,
    pub current: TestRecord,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous: Option<ReferenceLink>,
}

/// Classify every current test of `arch` against the previous build
///
/// Tests only present in `previous` are not classified.
pub fn compare_architecture(
    arch: &str,
    current: &TestMap,
    previous: &TestMap,
) -> HashMap<String, ClassifiedResult> {
    current
        .values()
        .map(|record| {
            let prev = previous.get(&record.id);
            let state = classify(prev.map(|p| &p.status), &record.status);
            let result = ClassifiedResult {
                test_id: record.id.clone(),
                name: strip_arch_prefix(&record.id, arch).to_string(),
                state,
                current: record.clone(),
                previous: prev.map(|p| ReferenceLink {
                    test_id: p.id.clone(),
                    link: p.link.clone(),
                }),
            };
            (record.id.clone(), result)
        })
        .collect()
}

/// Classified results of one architecture plus its badge
#[derive(Debug, Clone, Serialize)]
pub struct ArchitectureReport {
    pub arch: String,
    #[serde(serialize_with = "serialize_ordered")]
    pub results: HashMap<String, ClassifiedResult>,
    pub badge: Badge,
}

fn serialize_ordered<S: Serializer>(
    results: &HashMap<String, ClassifiedResult>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(sorted(results.values()))
}

fn sorted<'a>(results: impl Iterator<Item = &'a ClassifiedResult>) -> Vec<&'a ClassifiedResult> {
    let mut ordered: Vec<_> = results.collect();
    ordered.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.test_id.cmp(&b.test_id)));
    ordered
}

/// Build the report of one architecture from its classified results
pub fn aggregate(
    arch: &str,
    results: HashMap<String, ClassifiedResult>,
    thresholds: &BadgeThresholds,
) -> ArchitectureReport {
    let count = |state| results.values().filter(|r| r.state == state).count();
    let badge = Badge::from_counts(
        count(TransitionState::NewIssue),
        count(TransitionState::StillFailing),
        thresholds,
    );
    tracing::debug!("arch {}: {} results, badge {:?}", arch, results.len(), badge);
    ArchitectureReport {
        arch: arch.to_string(),
        results,
        badge,
    }
}

impl ArchitectureReport {
    pub fn count(&self, state: TransitionState) -> usize {
        self.results.values().filter(|r| r.state == state).count()
    }

    /// All results, alphabetical by stripped test name
    pub fn ordered(&self) -> Vec<&ClassifiedResult> {
        sorted(self.results.values())
    }

    /// Non-stable results, alphabetical by stripped test name
    pub fn interesting(&self) -> Vec<&ClassifiedResult> {
        sorted(self.results.values().filter(|r| r.state.is_interesting()))
    }

    /// Results in `state`, alphabetical by stripped test name
    pub fn in_state(&self, state: TransitionState) -> Vec<&ClassifiedResult> {
        sorted(self.results.values().filter(|r| r.state == state))
    }

    /// Plain-text listing of interesting results grouped by state
    pub fn state_results_dump(&self) -> String {
        let mut out = format!("arch: {}\n", self.arch);
        for state in TransitionState::INTERESTING {
            let names: Vec<&str> = self.in_state(state).iter().map(|r| r.name.as_str()).collect();
            out.push_str(&format!("\n{}:\n\t{}\n", state, names.join(", ")));
        }
        out
    }
}
