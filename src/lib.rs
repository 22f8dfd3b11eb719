//! openqa-review - build comparison review reports for openQA dashboards
//!
//! This library compares two snapshots of a job group (the current and the
//! previous build), classifies every test into a transition state, grades each
//! architecture with a GREEN/AMBER/RED badge and renders a markdown review
//! template highlighting regressions, fixes and still-failing tests.

pub mod build_select;
pub mod cli;
pub mod comparison;
pub mod document;
pub mod error;
pub mod json_output;
pub mod links;
pub mod product;
pub mod report;
pub mod runner;

pub use error::{ReviewError, Result};
