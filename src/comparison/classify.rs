// Transition classification between the previous and the current build
//
// A pure function of (previous status or absent, current status). A test
// missing from the previous build counts as previously passed, so a brand-new
// failing test shows up as a new issue instead of being ignored.

use crate::comparison::status::TestStatus;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a test changed from the previous build to the current one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransitionState {
    NewIssue,
    NewSoftIssue,
    Fixed,
    StillFailing,
    Improved,
    Stable,
    Incomplete,
}

impl TransitionState {
    pub const ALL: [TransitionState; 7] = [
        TransitionState::NewIssue,
        TransitionState::NewSoftIssue,
        TransitionState::Fixed,
        TransitionState::StillFailing,
        TransitionState::Improved,
        TransitionState::Stable,
        TransitionState::Incomplete,
    ];

    /// States worth a reviewer's attention, in dump order
    pub const INTERESTING: [TransitionState; 6] = [
        TransitionState::NewIssue,
        TransitionState::NewSoftIssue,
        TransitionState::Fixed,
        TransitionState::StillFailing,
        TransitionState::Improved,
        TransitionState::Incomplete,
    ];

    pub fn is_interesting(self) -> bool {
        self != TransitionState::Stable
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TransitionState::NewIssue => "NEW_ISSUE",
            TransitionState::NewSoftIssue => "NEW_SOFT_ISSUE",
            TransitionState::Fixed => "FIXED",
            TransitionState::StillFailing => "STILL_FAILING",
            TransitionState::Improved => "IMPROVED",
            TransitionState::Stable => "STABLE",
            TransitionState::Incomplete => "INCOMPLETE",
        }
    }
}

impl fmt::Display for TransitionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a test by its previous (`None` = absent) and current status
///
/// # Example
/// ```
/// use openqa_review::comparison::{classify, TestStatus, TransitionState};
///
/// assert_eq!(
///     classify(Some(&TestStatus::Passed), &TestStatus::Failed),
///     TransitionState::NewIssue
/// );
/// assert_eq!(classify(None, &TestStatus::Failed), TransitionState::NewIssue);
/// ```
pub fn classify(previous: Option<&TestStatus>, current: &TestStatus) -> TransitionState {
    use TestStatus::{Failed, Passed, Softfailed};

    let previous = previous.unwrap_or(&Passed);
    match (previous, current) {
        (Passed, Failed) | (Softfailed, Failed) => TransitionState::NewIssue,
        (Passed, Softfailed) => TransitionState::NewSoftIssue,
        (Failed, Passed) | (Softfailed, Passed) => TransitionState::Fixed,
        (Failed, Failed) | (Softfailed, Softfailed) => TransitionState::StillFailing,
        (Failed, Softfailed) => TransitionState::Improved,
        (Passed, Passed) => TransitionState::Stable,
        _ => TransitionState::Incomplete,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use TestStatus::{Failed, Passed, Softfailed};

    #[test]
    fn test_rule_table() {
        let table = [
            (Passed, Failed, TransitionState::NewIssue),
            (Softfailed, Failed, TransitionState::NewIssue),
            (Passed, Softfailed, TransitionState::NewSoftIssue),
            (Failed, Passed, TransitionState::Fixed),
            (Softfailed, Passed, TransitionState::Fixed),
            (Failed, Failed, TransitionState::StillFailing),
            (Softfailed, Softfailed, TransitionState::StillFailing),
            (Failed, Softfailed, TransitionState::Improved),
            (Passed, Passed, TransitionState::Stable),
        ];
        for (previous, current, expected) in table {
            assert_eq!(
                classify(Some(&previous), &current),
                expected,
                "({}, {})",
                previous,
                current
            );
        }
    }

    #[test]
    fn test_other_status_is_incomplete() {
        let other = TestStatus::Other("result_incomplete".into());
        for status in [Passed, Softfailed, Failed, other.clone()] {
            assert_eq!(classify(Some(&other), &status), TransitionState::Incomplete);
            assert_eq!(classify(Some(&status), &other), TransitionState::Incomplete);
        }
        assert_eq!(classify(None, &other), TransitionState::Incomplete);
    }

    #[test]
    fn test_absent_previous_counts_as_passed() {
        for current in [Passed, Softfailed, Failed] {
            assert_eq!(classify(None, &current), classify(Some(&Passed), &current));
        }
    }

    #[test]
    fn test_stable_is_not_interesting() {
        assert!(!TransitionState::Stable.is_interesting());
        assert!(!TransitionState::INTERESTING.contains(&TransitionState::Stable));
        assert_eq!(TransitionState::INTERESTING.len() + 1, TransitionState::ALL.len());
    }

    #[test]
    fn test_state_names() {
        assert_eq!(TransitionState::NewSoftIssue.to_string(), "NEW_SOFT_ISSUE");
        assert_eq!(
            serde_json::to_string(&TransitionState::StillFailing).unwrap(),
            "\"STILL_FAILING\""
        );
    }
}
