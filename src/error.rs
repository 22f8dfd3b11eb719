//! Error taxonomy for build comparison and report generation

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while comparing two builds
#[derive(Error, Debug)]
pub enum ReviewError {
    /// A test entry exists but its status cannot be determined
    #[error("Malformed test entry '{entry}': {reason}")]
    Extraction { entry: String, reason: String },

    #[error("Not enough finished builds: {0}")]
    InsufficientBuilds(String),

    #[error("Selected arch {arch} was not found in test results {available:?}")]
    InvalidArchitecture { arch: String, available: Vec<String> },

    #[error("Invalid build selection: {0}")]
    InvalidBuildSpec(String),

    /// A comparison the job group asks for is not supported yet; reserved
    /// for document sources with partial page support, and recoverable like
    /// `InsufficientBuilds`
    #[error("Comparison mode not implemented: {0}")]
    NotImplemented(String),

    #[error("No job groups found: {0}")]
    NoJobGroups(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Job group worker failed: {0}")]
    Worker(String),

    #[error("Invalid snapshot {path}: {source}")]
    InvalidSnapshot {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A dashboard URL or link that cannot be parsed or resolved
    #[error("Invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config file error: {0}")]
    Config(#[from] toml::de::Error),
}

impl ReviewError {
    /// Whether a multi-job-group run may replace this failure with an inline
    /// placeholder and continue with the next job group
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ReviewError::InsufficientBuilds(_) | ReviewError::NotImplemented(_)
        )
    }
}

/// Result type for review operations
pub type Result<T> = std::result::Result<T, ReviewError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverable_kinds() {
        assert!(ReviewError::InsufficientBuilds("one build".into()).is_recoverable());
        assert!(ReviewError::NotImplemented("diff".into()).is_recoverable());
    }

    #[test]
    fn test_structural_kinds_not_recoverable() {
        let err = ReviewError::InvalidArchitecture {
            arch: "s390x".into(),
            available: vec!["x86_64".into()],
        };
        assert!(!err.is_recoverable());
        assert!(!ReviewError::InvalidBuildSpec("a,b,c".into()).is_recoverable());
        assert!(!ReviewError::Extraction {
            entry: "res_x86_64_foo".into(),
            reason: "no status".into()
        }
        .is_recoverable());
    }

    #[test]
    fn test_not_implemented_message() {
        let err = ReviewError::NotImplemented("against reviewed on an index page".into());
        assert_eq!(
            err.to_string(),
            "Comparison mode not implemented: against reviewed on an index page"
        );
    }

    #[test]
    fn test_invalid_architecture_message() {
        let err = ReviewError::InvalidArchitecture {
            arch: "s390x".into(),
            available: vec!["i586".into(), "x86_64".into()],
        };
        let msg = err.to_string();
        assert!(msg.contains("s390x"));
        assert!(msg.contains("x86_64"));
    }
}
