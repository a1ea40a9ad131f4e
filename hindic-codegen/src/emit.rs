//! Serializes the AST to a C translation unit.

use hindic_parser::ast::{Expr, Stmt, Type};
use hindic_parser::lexer::Token;

/// Standard-library names rewritten to C functions at emission time.
const PRINT_INTRINSIC: &str = "लिखो";
const READ_INTRINSIC: &str = "पढ़ो";

const INDENT: &str = "    ";

/// Generates C source text from an abstract syntax tree.
///
/// The emitter assumes a clean tree: recovery nodes abort the pipeline
/// before code generation, so they are unreachable here.
pub struct Emitter {
    out: String,
    indent: usize,
}

impl Emitter {
    pub fn new() -> Self {
        Self {
            out: String::new(),
            indent: 0,
        }
    }

    /// Consumes `self` and returns the generated C source.
    #[must_use]
    pub fn into_output(self) -> String {
        self.out
    }

    /// Emits the fixed prologue, then every top-level declaration separated
    /// by blank lines.
    pub fn emit_program(&mut self, program: &[Stmt]) {
        self.out.push_str("#include <stdio.h>\n");
        self.out.push_str("#include <stdlib.h>\n\n");

        for stmt in program {
            self.emit_stmt(stmt);
            self.out.push('\n');
        }
    }

    fn write_indent(&mut self) {
        for _i in 0..self.indent {
            self.out.push_str(INDENT);
        }
    }

    fn emit_stmt(&mut self, stmt: &Stmt) {
        self.write_indent();
        self.emit_stmt_bare(stmt);
    }

    /// Emits a statement without leading indentation. Every statement form
    /// ends with a newline.
    fn emit_stmt_bare(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::VarDeclaration {
                ident,
                ty,
                initializer,
                ..
            } => {
                self.emit_var_decl_head(ident, *ty, initializer.as_ref());
                self.out.push_str(";\n");
            }
            Stmt::FnDeclaration {
                ident,
                return_ty,
                params,
                body,
                ..
            } => {
                self.out.push_str(return_ty.as_c());
                self.out.push(' ');
                self.out.push_str(ident);
                self.out.push('(');
                for (i, param) in params.iter().enumerate() {
                    if i > 0 {
                        self.out.push_str(", ");
                    }
                    self.out.push_str(param.ty.as_c());
                    self.out.push(' ');
                    self.out.push_str(&param.ident);
                }
                // No newline between the header and the opening brace.
                self.out.push_str(") ");
                self.emit_block(body);
            }
            Stmt::Block(body) => self.emit_block(body),
            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                self.out.push_str("if (");
                self.emit_expr(condition);
                self.out.push_str(") ");
                self.emit_stmt_bare(then_branch);
                if let Some(else_branch) = else_branch {
                    self.write_indent();
                    self.out.push_str("else ");
                    self.emit_stmt_bare(else_branch);
                }
            }
            Stmt::While { condition, body } => {
                self.out.push_str("while (");
                self.emit_expr(condition);
                self.out.push_str(") ");
                self.emit_stmt_bare(body);
            }
            Stmt::For {
                initializer,
                condition,
                increment,
                body,
            } => {
                self.out.push_str("for (");
                if let Some(initializer) = initializer {
                    self.emit_for_initializer(initializer);
                }
                self.out.push_str("; ");
                if let Some(condition) = condition {
                    self.emit_expr(condition);
                }
                self.out.push_str("; ");
                if let Some(increment) = increment {
                    self.emit_expr(increment);
                }
                self.out.push_str(") ");
                self.emit_stmt_bare(body);
            }
            Stmt::Return { value, .. } => {
                self.out.push_str("return");
                if let Some(value) = value {
                    self.out.push(' ');
                    self.emit_expr(value);
                }
                self.out.push_str(";\n");
            }
            Stmt::ExprStmt(expr) => {
                self.emit_expr(expr);
                self.out.push_str(";\n");
            }
            Stmt::Error => unreachable!(),
        }
    }

    fn emit_block(&mut self, body: &[Stmt]) {
        self.out.push_str("{\n");
        self.indent += 1;
        for stmt in body {
            self.emit_stmt(stmt);
        }
        self.indent -= 1;
        self.write_indent();
        self.out.push_str("}\n");
    }

    /// A `for` initializer prints in declaration or expression form without
    /// its terminating semicolon.
    fn emit_for_initializer(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::VarDeclaration {
                ident,
                ty,
                initializer,
                ..
            } => self.emit_var_decl_head(ident, *ty, initializer.as_ref()),
            Stmt::ExprStmt(expr) => self.emit_expr(expr),
            _ => unreachable!(),
        }
    }

    fn emit_var_decl_head(&mut self, ident: &str, ty: Type, initializer: Option<&Expr>) {
        self.out.push_str(ty.as_c());
        self.out.push(' ');
        self.out.push_str(ident);
        if let Some(initializer) = initializer {
            self.out.push_str(" = ");
            self.emit_expr(initializer);
        }
    }

    fn emit_expr(&mut self, expr: &Expr) {
        match expr {
            // The source spelling is reproduced verbatim, keeping the
            // integer/floating form.
            Expr::NumberLit { raw, .. } => self.out.push_str(raw),
            Expr::StringLit { value, .. } => {
                self.out.push('"');
                self.out.push_str(value);
                self.out.push('"');
            }
            Expr::Identifier { ident, .. } => self.out.push_str(ident),
            Expr::Assignment { ident, value, .. } => {
                self.out.push_str(ident);
                self.out.push_str(" = ");
                self.emit_expr(value);
            }
            Expr::FnCall { ident, args, .. } => {
                let callee: &str = if ident == PRINT_INTRINSIC {
                    "printf"
                } else if ident == READ_INTRINSIC {
                    "scanf"
                } else {
                    ident.as_str()
                };
                self.out.push_str(callee);
                self.out.push('(');
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        self.out.push_str(", ");
                    }
                    self.emit_expr(arg);
                }
                self.out.push(')');
            }
            // Binary expressions are always parenthesized.
            Expr::Binary { lhs, op, rhs } => {
                self.out.push('(');
                self.emit_expr(lhs);
                self.out.push(' ');
                self.out.push_str(binop_c(op));
                self.out.push(' ');
                self.emit_expr(rhs);
                self.out.push(')');
            }
            Expr::Unary { op, arg } => match op {
                Token::Minus => {
                    self.out.push_str("(-");
                    self.emit_expr(arg);
                    self.out.push(')');
                }
                Token::LogicalNot => {
                    self.out.push('!');
                    self.emit_expr(arg);
                }
                _ => unreachable!(),
            },
            Expr::Error => unreachable!(),
        }
    }
}

impl Default for Emitter {
    fn default() -> Self {
        Self::new()
    }
}

/// The C spelling of a binary operator token.
fn binop_c(op: &Token) -> &'static str {
    match op {
        Token::Plus => "+",
        Token::Minus => "-",
        Token::Asterisk => "*",
        Token::Slash => "/",
        Token::Percent => "%",
        Token::EqualsEquals => "==",
        Token::NotEquals => "!=",
        Token::LessThan => "<",
        Token::GreaterThan => ">",
        Token::LessThanEquals => "<=",
        Token::GreaterThanEquals => ">=",
        Token::LogicalAnd => "&&",
        Token::LogicalOr => "||",
        _ => unreachable!(),
    }
}
