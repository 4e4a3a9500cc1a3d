#![no_main]

use libfuzzer_sys::fuzz_target;
use drl::lint::{LintSettings, lint_source};

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let (_, diagnostics) = lint_source(s, &LintSettings::default());
        assert!(diagnostics.len() <= LintSettings::default().max_problems);
    }
});
