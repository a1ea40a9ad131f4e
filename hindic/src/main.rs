//! Command-line driver for the hindic compiler.

use std::{env, fs, path::PathBuf, process};

use hindic_codegen::emit::Emitter;
use hindic_parser::lexer::tokenize;
use hindic_parser::parser::Parser;
use hindic_passes::analyze::Analyzer;
use hindic_source::Source;
use log::info;

fn print_usage(program: &str) {
    println!("Usage: {} <input-file> [options]", program);
    println!("Options:");
    println!("  -o <output-file>   Specify output file (default: input-file.c)");
    println!("  -t                 Tokenize only (output tokens to stdout)");
    println!("  -p                 Parse only (no code generation)");
    println!("  -h                 Display this help message");
}

fn main() {
    simple_logger::SimpleLogger::new().env().init().unwrap();
    process::exit(run());
}

fn run() -> i32 {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        print_usage(&args[0]);
        return 1;
    }

    let mut input_path: Option<&str> = None;
    let mut output_path: Option<String> = None;
    let mut tokenize_only = false;
    let mut parse_only = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-o" => {
                if i + 1 < args.len() {
                    i += 1;
                    output_path = Some(args[i].clone());
                } else {
                    eprintln!("Error: -o option requires an argument.");
                    return 1;
                }
            }
            "-t" => tokenize_only = true,
            "-p" => parse_only = true,
            "-h" => {
                print_usage(&args[0]);
                return 0;
            }
            arg => {
                if input_path.is_none() {
                    input_path = Some(arg);
                } else {
                    eprintln!("Error: Unexpected argument '{}'.", arg);
                    return 1;
                }
            }
        }
        i += 1;
    }

    let input_path = match input_path {
        Some(path) => path,
        None => {
            eprintln!("Error: No input file specified.");
            return 1;
        }
    };

    let source_text = match fs::read_to_string(input_path) {
        Ok(text) => text,
        Err(_) => {
            eprintln!("Error: Could not open file '{}'.", input_path);
            return 1;
        }
    };

    info!("compiling {}", input_path);

    if tokenize_only {
        print_tokens(&source_text);
        return 0;
    }

    let source: Source = source_text.as_str().into();
    let program = Parser::new(&source).parse_program();

    if !source.has_no_errors() {
        eprint!("{}", source.errors);
        eprintln!("Error: Parsing failed.");
        return 1;
    }

    if parse_only {
        println!("Parsing successful!");
        return 0;
    }

    let mut analyzer = Analyzer::new(&source);
    if !analyzer.analyze_program(&program) {
        eprint!("{}", source.errors);
        eprintln!(
            "Error: Semantic analysis failed with {} errors.",
            analyzer.error_count()
        );
        return 1;
    }

    let mut emitter = Emitter::new();
    emitter.emit_program(&program);
    let c_source = emitter.into_output();

    let output_path = output_path
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(input_path).with_extension("c"));
    if fs::write(&output_path, &c_source).is_err() {
        eprintln!(
            "Error: Could not open output file '{}'.",
            output_path.display()
        );
        return 1;
    }

    info!("wrote {} bytes of C", c_source.len());
    println!(
        "Code generation successful! Output written to '{}'.",
        output_path.display()
    );
    0
}

/// Prints one line per token, including the final `EOF`. Lexical error
/// tokens print their diagnostic message as the text.
fn print_tokens(source_text: &str) {
    let source = Source::new(source_text);
    for (token, span) in tokenize(source.content) {
        let position = source.position(span.start);
        let text = match token.lexical_error_message() {
            Some(message) => message,
            None => &source.content[span.clone()],
        };
        println!(
            "Token: {}, Line: {}, Column: {}, Text: '{}'",
            token.name(),
            position.line,
            position.column,
            text
        );
    }
}
