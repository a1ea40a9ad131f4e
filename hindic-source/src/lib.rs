//! Source text and shared diagnostics for the hindic pipeline.

use std::{cell::RefCell, fmt};

/// Borrowed source text plus the diagnostic sink every stage reports into.
///
/// The content must outlive every token and AST node that references it by
/// span.
pub struct Source<'a> {
    pub content: &'a str,
    pub errors: ErrorReporter,
}

impl<'a> Source<'a> {
    pub fn new(content: &'a str) -> Self {
        Self {
            content,
            errors: ErrorReporter::new(),
        }
    }

    pub fn has_no_errors(&self) -> bool {
        self.errors.count() == 0
    }

    /// Resolves a byte offset into a 1-based line and column.
    ///
    /// Columns count bytes, not graphemes; a Devanagari character therefore
    /// spans several columns. This is a documented simplification.
    pub fn position(&self, offset: usize) -> Position {
        let offset = offset.min(self.content.len());
        let mut line = 1;
        let mut column = 1;
        for byte in &self.content.as_bytes()[..offset] {
            if *byte == b'\n' {
                line += 1;
                column = 1;
            } else {
                column += 1;
            }
        }
        Position { line, column }
    }
}

impl<'a> From<&'a str> for Source<'a> {
    fn from(content: &'a str) -> Self {
        Source::new(content)
    }
}

/// A 1-based line/column pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

#[derive(Debug, Clone)]
pub struct Diagnostic {
    message: String,
    position: Position,
}

impl Diagnostic {
    pub fn new(message: impl ToString, position: Position) -> Self {
        Self {
            message: message.to_string(),
            position,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn position(&self) -> Position {
        self.position
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Line {line}, Column {column}: Error: {message}",
            line = self.position.line,
            column = self.position.column,
            message = self.message
        )
    }
}

/// Collects diagnostics from all stages in report order.
pub struct ErrorReporter {
    errors: RefCell<Vec<Diagnostic>>,
}

impl ErrorReporter {
    pub fn new() -> Self {
        Self {
            errors: RefCell::new(Vec::new()),
        }
    }

    pub fn add_error(&self, error: Diagnostic) {
        self.errors.borrow_mut().push(error); // this should be the only place where self.errors is borrowed mutably
    }

    pub fn count(&self) -> usize {
        self.errors.borrow().len()
    }
}

impl Default for ErrorReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ErrorReporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let errors = self.errors.borrow();
        for error in errors.iter() {
            writeln!(f, "{}", error)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_counts_bytes() {
        let source = Source::new("ab\nपूर्णांक x");
        assert_eq!(source.position(0), Position { line: 1, column: 1 });
        assert_eq!(source.position(1), Position { line: 1, column: 2 });
        // First byte after the newline.
        assert_eq!(source.position(3), Position { line: 2, column: 1 });
        // "पूर्णांक" is 24 bytes long, so the identifier after it sits at
        // column 26 of line 2.
        assert_eq!(
            source.position(3 + 24 + 1),
            Position { line: 2, column: 26 }
        );
    }

    #[test]
    fn position_clamps_to_end() {
        let source = Source::new("a");
        assert_eq!(source.position(100), Position { line: 1, column: 2 });
    }

    #[test]
    fn reporter_renders_line_column_prefix() {
        let source = Source::new("x");
        source.errors.add_error(Diagnostic::new(
            "Unexpected character.",
            Position { line: 3, column: 7 },
        ));
        assert!(!source.has_no_errors());
        assert_eq!(
            source.errors.to_string(),
            "Line 3, Column 7: Error: Unexpected character.\n"
        );
    }
}
