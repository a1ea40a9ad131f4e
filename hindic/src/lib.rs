//! The hindic compiler as a library: one call runs the whole pipeline.

use hindic_codegen::emit::Emitter;
use hindic_parser::parser::Parser;
use hindic_passes::analyze::Analyzer;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompileError {
    #[error("parsing failed:\n{diagnostics}")]
    Parse { diagnostics: String },
    #[error("semantic analysis failed with {count} errors:\n{diagnostics}")]
    Analyze { count: usize, diagnostics: String },
}

/// Compiles hindic source text to a C translation unit.
///
/// A non-zero error count in the parser or the analyzer aborts the pipeline
/// before emission; the rendered diagnostics ride along in the error.
pub fn compile(source_text: &str) -> Result<String, CompileError> {
    let source = source_text.into();
    let program = Parser::new(&source).parse_program();
    if !source.has_no_errors() {
        return Err(CompileError::Parse {
            diagnostics: source.errors.to_string(),
        });
    }

    let mut analyzer = Analyzer::new(&source);
    if !analyzer.analyze_program(&program) {
        return Err(CompileError::Analyze {
            count: analyzer.error_count(),
            diagnostics: source.errors.to_string(),
        });
    }

    let mut emitter = Emitter::new();
    emitter.emit_program(&program);
    Ok(emitter.into_output())
}
