// Result extraction: per-architecture test records from a parsed page

use crate::comparison::status::{FailedModule, TestRecord, TestStatus};
use crate::document::{Document, TestEntry};
use crate::error::{ReviewError, Result};
use std::collections::HashMap;

/// Test records of one architecture, keyed by test id
pub type TestMap = HashMap<String, TestRecord>;

/// Extract all test records for `arch` from `document`
///
/// Entries are deduplicated by id; a later entry wins. An architecture
/// without entries yields an empty map, which callers read as "not run".
///
/// # Errors
/// `ReviewError::Extraction` when an entry has no usable status or id.
pub fn extract(document: &dyn Document, arch: &str) -> Result<TestMap> {
    let mut records = HashMap::new();
    for entry in document.test_entries(arch) {
        let record = to_record(entry)?;
        records.insert(record.id.clone(), record);
    }
    tracing::debug!("Extracted {} test records for arch {}", records.len(), arch);
    Ok(records)
}

fn to_record(entry: TestEntry) -> Result<TestRecord> {
    if entry.id.trim().is_empty() {
        return Err(ReviewError::Extraction {
            entry: entry.href,
            reason: "test entry has no identifier".to_string(),
        });
    }

    let status = match entry.status.as_deref().map(str::trim) {
        Some(token) if !token.is_empty() => TestStatus::from_token(token),
        _ => {
            return Err(ReviewError::Extraction {
                entry: entry.id,
                reason: "no status could be derived".to_string(),
            })
        }
    };

    let failed_modules = entry
        .failed_modules
        .into_iter()
        .map(|m| FailedModule {
            name: m.name.trim().to_string(),
            link: m.href,
            needles: m.needles,
        })
        .collect();

    Ok(TestRecord {
        id: entry.id,
        status,
        link: entry.href,
        failed_modules,
    })
}

/// Test name with everything up to and including `<arch>_` removed
///
/// `res_DVD_x86_64_textmode` → `textmode` for arch `x86_64`.
pub fn strip_arch_prefix<'a>(test_id: &'a str, arch: &str) -> &'a str {
    let marker = format!("{}_", arch);
    match test_id.split_once(&marker) {
        Some((_, name)) => name,
        None => test_id,
    }
}
