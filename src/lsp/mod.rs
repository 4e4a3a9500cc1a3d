//! Editor protocol support
//!
//! Converts lint diagnostics into Language Server Protocol types. Hosting a server is left to
//! the embedding editor integration.

pub mod diagnostics;

pub use diagnostics::{to_lsp_diagnostic, to_lsp_diagnostics};
