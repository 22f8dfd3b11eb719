//! JSON output format for review runs
//!
//! `--format json` implementation

use crate::product::ProductReport;
use crate::runner::ReviewOutput;
use serde::Serialize;

/// One job group entry
#[derive(Debug, Clone, Serialize)]
pub struct JsonJobGroup<'a> {
    pub name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<&'a ProductReport>,
    /// Placeholder message when the report could not be generated
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'a str>,
}

/// Top-level JSON document
#[derive(Debug, Clone, Serialize)]
pub struct JsonReview<'a> {
    pub version: &'static str,
    pub format: &'static str,
    /// Report timestamp
    pub date: &'a str,
    pub job_groups: Vec<JsonJobGroup<'a>>,
}

impl<'a> JsonReview<'a> {
    pub fn new(output: &'a ReviewOutput, date: &'a str) -> Self {
        let job_groups = output
            .groups
            .iter()
            .map(|g| match &g.report {
                Ok(report) => JsonJobGroup {
                    name: &g.name,
                    report: Some(report),
                    error: None,
                },
                Err(message) => JsonJobGroup {
                    name: &g.name,
                    report: None,
                    error: Some(message.as_str()),
                },
            })
            .collect();
        Self {
            version: env!("CARGO_PKG_VERSION"),
            format: "openqa-review-json-v1",
            date,
            job_groups,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
