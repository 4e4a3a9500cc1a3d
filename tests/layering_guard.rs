//! Layering guardrails to keep the syntax frontend free of tooling dependencies.
//!
//! `drl_syntax` is shared by the linter, the CLI and editor integrations, so it must not pull in
//! CLI, rendering or protocol crates. This test scans its `Cargo.toml` and fails on anything outside
//! the allowed set in `[dependencies]`.

const ALLOWED: [&str; 3] = ["drl_core", "thiserror", "tracing"];

#[test]
fn syntax_crate_only_depends_on_allowed_crates() {
    let manifest = include_str!("../crates/drl_syntax/Cargo.toml");
    let mut in_dependencies = false;

    for raw_line in manifest.lines() {
        let line = raw_line.trim();
        // Track when we enter/exit the `[dependencies]` table.
        if line.starts_with('[') {
            if line == "[dependencies]" {
                in_dependencies = true;
                continue;
            }
            // Any new section after `[dependencies]` ends the scan window.
            if in_dependencies {
                break;
            }
        }

        if !in_dependencies || line.is_empty() || line.starts_with('#') {
            continue;
        }

        // Strip inline comments for robustness.
        let line_no_comment = line.split('#').next().unwrap_or("").trim();
        let name = line_no_comment.split(['=', ' ']).next().unwrap_or("").trim();
        assert!(
            ALLOWED.contains(&name),
            "`{name}` must not appear in drl_syntax [dependencies]; keep tooling crates in the root crate"
        );
    }
}
