// Per-test records extracted from one architecture of one build

use serde::{Deserialize, Serialize};
use std::fmt;

/// Result status of a single test
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestStatus {
    Passed,
    Softfailed,
    Failed,
    /// Any other status (incomplete, skipped, running, ...), raw token kept
    Other(String),
}

impl TestStatus {
    /// Parse a status token as found on overview pages
    ///
    /// Both the bare names (`failed`) and the result classes
    /// (`result_failed`) are accepted. Unknown tokens become `Other`.
    pub fn from_token(token: &str) -> Self {
        let token = token.trim();
        let bare = token.strip_prefix("result_").unwrap_or(token);
        match bare {
            "passed" => TestStatus::Passed,
            "softfailed" | "softfail" => TestStatus::Softfailed,
            "failed" => TestStatus::Failed,
            _ => TestStatus::Other(token.to_string()),
        }
    }
}

impl fmt::Display for TestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TestStatus::Passed => write!(f, "passed"),
            TestStatus::Softfailed => write!(f, "softfailed"),
            TestStatus::Failed => write!(f, "failed"),
            TestStatus::Other(raw) => write!(f, "{}", raw),
        }
    }
}

/// A module that failed within a test
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedModule {
    pub name: String,
    pub link: String,
    /// Names of reference images that did not match
    pub needles: Vec<String>,
}

/// One test result of one architecture within one build
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestRecord {
    pub id: String,
    pub status: TestStatus,
    pub link: String,
    pub failed_modules: Vec<FailedModule>,
}
