#![no_main]

use libfuzzer_sys::fuzz_target;
use openqa_review::comparison::extract;
use openqa_review::document::{Document, SnapshotDocument};

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        // Malformed snapshots must be rejected, never panic
        if let Ok(doc) = SnapshotDocument::from_json(input) {
            for arch in doc.architectures() {
                let _ = extract(&doc, &arch);
            }
        }
    }
});
