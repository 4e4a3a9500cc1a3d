/// Error recovery.
///
/// ## Notes
/// - This file is `include!`'d into `crate::parser`.

impl<'a> Parser<'a> {
    /// Skip past the construct that started at `start` and failed at `from`.
    ///
    /// A failure reported on a later line that itself starts a construct resumes there. Otherwise
    /// this advances line by line from the line after `from` until a line starts a top-level
    /// construct (parsing resumes there) or consists of `end` (that line is consumed).
    fn recover(&self, start: Cursor, from: Cursor) -> Cursor {
        if from.line > start.line && self.source.construct_at(from.line).is_some() {
            return Cursor::new(from.line, 0);
        }
        let mut line = from.line + 1;
        while line < self.source.line_count() {
            if self.source.is_end_line(line) {
                return Cursor::new(line + 1, 0);
            }
            if self.source.construct_at(line).is_some() {
                return Cursor::new(line, 0);
            }
            line += 1;
        }
        Cursor::new(line, 0)
    }
}
