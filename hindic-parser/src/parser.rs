mod expr;
mod stmt;

use crate::ast::{Expr, Param, Span, Stmt, Type};
use crate::lexer::Token;
use hindic_source::{Diagnostic, Source};
use logos::{Lexer, Logos};
use std::mem;

/// Binding power for the unary prefix operators, above every binary operator.
const UNARY_BP: u8 = 16;

/// Parameter lists are capped like the reference C target.
const MAX_PARAMS: usize = 8;

pub struct Parser<'a> {
    /// Cached token for peeking.
    current_token: Token,
    current_span: Span,
    /// One extra buffered token so declaration parsing can look past a name
    /// for `(` without touching raw bytes.
    next_token: Token,
    next_span: Span,
    /// The most recently consumed token; `synchronize` stops right after a
    /// `;`.
    previous_token: Token,
    lexer: Lexer<'a, Token>,
    /// Source code
    source: &'a Source<'a>,
    /// Set by the first error; suppresses diagnostics until `synchronize`.
    panic_mode: bool,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a Source<'a>) -> Self {
        let lexer = Token::lexer(source.content);
        let mut parser = Self {
            current_token: Token::Eof,
            current_span: 0..0,
            next_token: Token::Eof,
            next_span: 0..0,
            previous_token: Token::Eof,
            lexer,
            source,
            panic_mode: false,
        };
        // Fill both buffered tokens.
        parser.bump();
        parser.bump();
        parser
    }

    /// Parses a whole program: declarations until end of input.
    pub fn parse_program(&mut self) -> Vec<Stmt> {
        let mut program = Vec::new();
        while self.current_token != Token::Eof {
            program.push(self.parse_declaration());
            if self.panic_mode {
                self.synchronize();
            }
        }
        program
    }
}

/// Parse utilities
impl<'a> Parser<'a> {
    /// Scans the next meaningful token. Lexical error tokens are reported
    /// through the diagnostic sink and skipped; the scanner itself never
    /// aborts.
    fn scan_token(&mut self) -> (Token, Span) {
        loop {
            match self.lexer.next() {
                Some(token) => {
                    let span = self.lexer.span();
                    match token.lexical_error_message() {
                        Some(message) => self.error_at(span, message),
                        None => return (token, span),
                    }
                }
                None => {
                    let end = self.source.content.len();
                    return (Token::Eof, end..end);
                }
            }
        }
    }

    fn bump(&mut self) {
        let (token, span) = self.scan_token();
        self.previous_token = self.current_token.clone();
        self.current_token = mem::replace(&mut self.next_token, token);
        self.current_span = mem::replace(&mut self.next_span, span);
    }

    /// The source text of the current token.
    fn current_slice(&self) -> &'a str {
        &self.source.content[self.current_span.clone()]
    }

    /// Predicate that tests whether the next token has the same discriminant and eats the next token if yes as a side effect.
    fn eat(&mut self, tok: Token) -> bool {
        if mem::discriminant(&self.current_token) == mem::discriminant(&tok) {
            self.bump(); // eat token
            true
        } else {
            false
        }
    }

    fn expect(&mut self, tok: Token, message: &str) {
        if !self.eat(tok) {
            self.error_at_current(message);
        }
    }

    fn error_at_current(&mut self, message: &str) {
        self.error_at(self.current_span.clone(), message);
    }

    /// Reports an error at `span` unless panic mode is already active.
    fn error_at(&mut self, span: Span, message: &str) {
        if self.panic_mode {
            return;
        }
        self.panic_mode = true;
        self.source
            .errors
            .add_error(Diagnostic::new(message, self.source.position(span.start)));
    }

    /// Leaves panic mode, then discards tokens up to a statement boundary: a
    /// just-consumed `;` or a token that can start a declaration.
    fn synchronize(&mut self) {
        self.panic_mode = false;

        while self.current_token != Token::Eof {
            if self.previous_token == Token::Semi {
                return;
            }
            match self.current_token {
                Token::Int
                | Token::Float
                | Token::Char
                | Token::Void
                | Token::If
                | Token::While
                | Token::For
                | Token::Return => return,
                _ => self.bump(),
            }
        }
    }
}
