#![no_main]

use libfuzzer_sys::fuzz_target;
use drl_syntax::incremental::{ChangedRange, reparse};
use drl_syntax::{ParseOptions, parse};

fuzz_target!(|data: &[u8]| {
    // Convert bytes to UTF-8 string (ignore invalid UTF-8)
    if let Ok(s) = std::str::from_utf8(data) {
        let output = parse(s);
        // Reparse the second half as if it had just been typed
        let mid = (0..=s.len() / 2).rev().find(|&i| s.is_char_boundary(i)).unwrap_or(0);
        let _ = reparse(s, &output.tree, &[ChangedRange::new(mid, s.len())], &ParseOptions::default());
    }
});
