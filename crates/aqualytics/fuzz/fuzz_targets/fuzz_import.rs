//! Fuzz target for the batch importer.
//!
//! Every row ends up imported or rejected; nothing panics.

#![no_main]

use aqualytics::import::BatchImporter;
use libfuzzer_sys::fuzz_target;

/// Canonical header so that most inputs reach the parser and the engine.
const HEADER: &str =
    "fecha,nadador,competencia,distancia,estilo,fase,t15_1,brz_1,t25_1,f1,t15_2,brz_2,t25_2,f2,t_total,brz_total\n";

fuzz_target!(|data: &[u8]| {
    if data.len() > 100_000 {
        return;
    }

    let body = String::from_utf8_lossy(data);
    let content = format!("{}{}", HEADER, body);

    let result = BatchImporter::new().run(&content);
    let summary = &result.summary;
    assert!(summary.imported + summary.failed <= summary.total_rows);
});
