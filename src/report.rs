//! Markdown review report rendering
//!
//! The layout is fixed so reviewers can paste the output as a dashboard
//! comment and fill in the placeholder sections by hand. Every placeholder is
//! emitted even when empty.

use crate::comparison::{ArchitectureReport, ClassifiedResult, TransitionState, Verbosity};
use crate::links::join_url;
use crate::product::ProductReport;

/// Rendering settings
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub verbosity: Verbosity,
    /// Base for relative test and module links
    pub root_url: String,
}

impl RenderOptions {
    pub fn new(verbosity: Verbosity, root_url: impl Into<String>) -> Self {
        Self {
            verbosity,
            root_url: root_url.into(),
        }
    }

    /// Absolute link; unresolvable links are shown as given
    fn url(&self, link: &str) -> String {
        join_url(&self.root_url, link).unwrap_or_else(|_| link.to_string())
    }
}

/// Timestamp for the report header, local time
pub fn timestamp_now() -> String {
    chrono::Local::now().format("%Y-%m-%d - %H:%M").to_string()
}

fn failed_modules(result: &ClassifiedResult, opts: &RenderOptions, with_needles: bool) -> String {
    result
        .current
        .failed_modules
        .iter()
        .map(|m| {
            let mut line = format!(" * {}: {}", m.name, opts.url(&m.link));
            if with_needles && !m.needles.is_empty() {
                line.push_str(&format!(" (needles: {})", m.needles.join(", ")));
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// One entry of the new-issues list at the configured verbosity
pub fn render_entry(result: &ClassifiedResult, opts: &RenderOptions) -> String {
    let name = &result.name;
    let url = opts.url(&result.current.link);
    match opts.verbosity.level() {
        1 => name.clone(),
        2 => format!("***{}***: {}", name, url),
        3 => format!(
            "***{}***: {}, failed modules:\n{}\n",
            name,
            url,
            failed_modules(result, opts, false)
        ),
        _ => {
            let reference = result
                .previous
                .as_ref()
                .map_or_else(|| "NONE".to_string(), |p| opts.url(&p.link));
            // The space before ')' keeps comment parsers from reading it as part of the URL
            format!(
                "***{}***: {} (reference {} ), failed modules:\n{}\n",
                name,
                url,
                reference,
                failed_modules(result, opts, true)
            )
        }
    }
}

fn names(results: &[&ClassifiedResult]) -> String {
    results
        .iter()
        .map(|r| r.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Review block of one architecture
pub fn render_architecture(report: &ArchitectureReport, opts: &RenderOptions) -> String {
    let mut new_issues = report
        .in_state(TransitionState::NewIssue)
        .into_iter()
        .map(|r| format!("* {}", render_entry(r, opts)))
        .collect::<Vec<_>>()
        .join("\n");
    new_issues.push('\n');
    new_issues.push_str("* soft fails: ");
    new_issues.push_str(&names(&report.in_state(TransitionState::NewSoftIssue)));

    let existing_issues = format!("* {}", names(&report.in_state(TransitionState::StillFailing)));

    // Product/openQA issue triage is left to the reviewer
    let (new_product, existing_product, new_openqa, existing_openqa) = ("", "", "", "");

    format!(
        "\n**Arch:** {arch}\n**Status: {badge}**\n\n\
         **New Product bugs:**\n\n{new_product}\n\n\
         **Existing Product bugs:**\n\n{existing_product}\n\n\
         **New openQA-issues:**\n\n{new_openqa}\n\n\
         **Existing openQA-issues:**\n\n{existing_openqa}\n\n\
         **TODO: review**\n\n\
         ***new issues***\n\n{new_issues}\n\n\
         ***existing issues***\n\n{existing_issues}\n",
        arch = report.arch,
        badge = report.badge.label(),
    )
}

/// Full report of one product comparison
///
/// Architectures are rendered alphabetically and separated by `<hr>`.
pub fn render_product(product: &ProductReport, opts: &RenderOptions, now: &str) -> String {
    let mut build = product.build_label.clone();
    if opts.verbosity.level() > 1 {
        build.push_str(&format!(" (reference {})", product.previous_build_label));
    }

    let common_issues = if product.missing_architectures.is_empty() {
        "None".to_string()
    } else {
        let missing: Vec<&str> = product.missing_architectures.iter().map(String::as_str).collect();
        format!(" * **Missing architectures**: {}", missing.join(", "))
    };

    let arch_report = product
        .architecture_reports
        .values()
        .map(|report| render_architecture(report, opts))
        .collect::<Vec<_>>()
        .join("<hr>");

    format!(
        "\n**Date:** {now}\n**Build:** {build}\n\n**Common issues:**\n{common_issues}\n<hr>\n{arch_report}\n"
    )
}
