// Configuration for build comparison and report generation
//
// Badge thresholds are tuning values fitted to one test matrix, so they live
// here as named, overridable settings instead of literals in the aggregator.

use crate::error::{ReviewError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Still-failing limits for the architecture health badge
///
/// Any new issue makes an architecture RED regardless of these values.
///
/// # Example
/// ```
/// use openqa_review::comparison::BadgeThresholds;
///
/// let thresholds = BadgeThresholds::default();
/// assert_eq!(thresholds.green_max_still_failing, 1);
/// assert_eq!(thresholds.amber_max_still_failing, 5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BadgeThresholds {
    /// GREEN while still-failing tests stay at or below this count
    pub green_max_still_failing: usize,
    /// AMBER while still-failing tests stay at or below this count
    pub amber_max_still_failing: usize,
}

impl Default for BadgeThresholds {
    fn default() -> Self {
        Self {
            green_max_still_failing: 1,
            amber_max_still_failing: 5,
        }
    }
}

impl BadgeThresholds {
    pub fn validate(&self) -> Result<()> {
        if self.green_max_still_failing > self.amber_max_still_failing {
            return Err(ReviewError::InvalidConfig(format!(
                "green_max_still_failing ({}) must not exceed amber_max_still_failing ({})",
                self.green_max_still_failing, self.amber_max_still_failing
            )));
        }
        Ok(())
    }
}

/// Per-entry detail level of rendered test results, 1 (name only) to 4
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Verbosity(u8);

impl Verbosity {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 4;

    /// Clamp any requested level into `1..=4`
    pub fn new(level: u8) -> Self {
        Self(level.clamp(Self::MIN, Self::MAX))
    }

    pub fn level(self) -> u8 {
        self.0
    }
}

impl Default for Verbosity {
    fn default() -> Self {
        Self(Self::MIN)
    }
}

/// Settings shared by all job groups of one review run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewConfig {
    /// Dashboard root used to absolutize relative links
    pub root_url: String,
    /// Percentage of jobs that may still be running for a build to count as finished
    pub running_threshold: f64,
    pub badge: BadgeThresholds,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            root_url: "https://openqa.opensuse.org/".to_string(),
            running_threshold: 0.0,
            badge: BadgeThresholds::default(),
        }
    }
}

impl ReviewConfig {
    /// Load from a TOML file; missing keys keep their defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml(&raw)
    }

    pub fn from_toml(raw: &str) -> Result<Self> {
        let config: ReviewConfig = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=100.0).contains(&self.running_threshold) {
            return Err(ReviewError::InvalidConfig(format!(
                "running_threshold must be in [0, 100], got {}",
                self.running_threshold
            )));
        }
        if self.root_url.trim().is_empty() {
            return Err(ReviewError::InvalidConfig(
                "root_url must not be empty".to_string(),
            ));
        }
        if let Err(e) = url::Url::parse(&self.root_url) {
            return Err(ReviewError::InvalidConfig(format!(
                "root_url '{}' is not an absolute URL: {}",
                self.root_url, e
            )));
        }
        self.badge.validate()
    }
}
