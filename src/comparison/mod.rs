// Build comparison and change classification
//
// Two snapshots of the same job group (current and previous build) are
// matched test by test per architecture. Every current test gets exactly one
// transition state from a fixed rule table, and each architecture gets one
// GREEN/AMBER/RED badge from configurable still-failing thresholds.
//
// Pipeline:
// - extract: page → per-architecture map of test records
// - classify: (previous status | absent, current status) → transition state
// - aggregate: classified map → architecture report with badge and ordering
//
// Nothing here performs I/O; documents arrive fully materialized.

mod aggregate;
mod classify;
mod config;
mod extract;
mod status;

pub use aggregate::{
    aggregate, compare_architecture, ArchitectureReport, Badge, ClassifiedResult, ReferenceLink,
};
pub use classify::{classify, TransitionState};
pub use config::{BadgeThresholds, ReviewConfig, Verbosity};
pub use extract::{extract, strip_arch_prefix, TestMap};
pub use status::{FailedModule, TestRecord, TestStatus};
