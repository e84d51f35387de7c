//! Fuzz target for the CSV structural validator.
//!
//! The validator must return a report for any content, never panic.

#![no_main]

use aqualytics::validation::CsvValidator;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() > 100_000 {
        return;
    }

    let content = String::from_utf8_lossy(data);
    let report = CsvValidator::new().validate(&content);
    assert!((0.0..=100.0).contains(&report.score));
    assert_eq!(report.is_valid, report.errors.is_empty());
});
