/// Parse a DRL document with default [`ParseOptions`].
///
/// This is the main public entrypoint for parsing. It never panics and always returns a tree.
pub fn parse(text: &str) -> ParseOutput {
    parse_with_options(text, &ParseOptions::default())
}

/// Parse a DRL document.
///
/// ## Parameters
/// - `text`: the full document.
/// - `options`: error cap and nesting cap.
///
/// ## Returns
/// - The tree and every recorded [`ParseError`]. If the parser itself fails, the tree is empty
///   and a single fatal error describes the failure.
#[tracing::instrument(skip_all, fields(len = text.len(), max_errors = options.max_errors))]
pub fn parse_with_options(text: &str, options: &ParseOptions) -> ParseOutput {
    let run = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| Parser::new(text, options).run()));
    match run {
        Ok(output) => {
            tracing::debug!(
                rules = output.tree.rules.len(),
                errors = output.errors.len(),
                "parsed document"
            );
            output
        }
        Err(payload) => {
            let detail = panic_detail(payload.as_ref());
            tracing::error!(%detail, "parser failed; returning an empty tree");
            ParseOutput {
                tree: SyntaxTree::empty(),
                errors: vec![ParseError::error(
                    format!("Internal parser error: {detail}"),
                    Range::default(),
                )],
            }
        }
    }
}

/// Best-effort text of a panic payload.
pub fn panic_detail(payload: &(dyn std::any::Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}
