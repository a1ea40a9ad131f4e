//! Two-pass semantic analysis: name resolution and type checking.

use hindic_parser::ast::{Expr, Span, Stmt, Type};
use hindic_parser::lexer::Token;
use hindic_parser::visitor::Visitor;
use hindic_source::{Diagnostic, Source};

use crate::symbol::{SymbolKind, SymbolTable};

/// Walks the program with a scoped symbol table, resolving names and
/// checking types.
///
/// Expression inference yields `Option<Type>`; `None` is the error sentinel
/// that an earlier diagnostic already covers, so enclosing checks stay
/// silent instead of cascading.
pub struct Analyzer<'a> {
    table: SymbolTable,
    /// Return type of the function whose body is being analyzed.
    current_return_ty: Type,
    error_count: usize,
    source: &'a Source<'a>,
}

impl<'a> Analyzer<'a> {
    pub fn new(source: &'a Source<'a>) -> Self {
        Self {
            table: SymbolTable::new(),
            current_return_ty: Type::Void,
            error_count: 0,
            source,
        }
    }

    pub fn error_count(&self) -> usize {
        self.error_count
    }

    /// Analyzes a whole program. Returns `true` when no rule was violated.
    pub fn analyze_program(&mut self, program: &[Stmt]) -> bool {
        // First pass: register every top-level function so bodies can call
        // forward and recursively.
        for stmt in program {
            if let Stmt::FnDeclaration {
                ident,
                return_ty,
                params,
                span,
                ..
            } = stmt
            {
                let param_tys = params.iter().map(|param| param.ty).collect();
                if !self.table.define_function(ident, *return_ty, param_tys) {
                    self.error(span.clone(), format!("Function '{}' already defined.", ident));
                }
            }
        }

        // Second pass: walk every declaration.
        for stmt in program {
            self.visit_stmt(stmt);
        }

        self.error_count == 0
    }

    fn error(&mut self, span: Span, message: impl ToString) {
        self.error_count += 1;
        self.source
            .errors
            .add_error(Diagnostic::new(message, self.source.position(span.start)));
    }

    fn analyze_block<'ast>(&mut self, body: &'ast [Stmt]) {
        self.table.begin_scope();
        for stmt in body {
            self.visit_stmt(stmt);
        }
        self.table.end_scope();
    }

    fn check_condition(&mut self, condition: &Expr) {
        if let Some(ty) = self.infer_expr(condition) {
            if ty != Type::Int {
                self.error(condition.span(), "Condition must be a boolean expression.");
            }
        }
    }

    /// Infers the type of an expression, reporting violations along the way.
    /// `None` means an error made the type unknowable.
    fn infer_expr(&mut self, expr: &Expr) -> Option<Type> {
        match expr {
            Expr::NumberLit { is_float, .. } => Some(if *is_float { Type::Float } else { Type::Int }),
            // Strings are modelled as character data; there is no pointer
            // type.
            Expr::StringLit { .. } => Some(Type::Char),
            Expr::Identifier { ident, span } => {
                let resolved = self.table.resolve(ident).map(|s| (s.kind, s.ty));
                match resolved {
                    None => {
                        self.error(span.clone(), "Undefined variable.");
                        None
                    }
                    Some((SymbolKind::Function, _)) => {
                        self.error(span.clone(), "Expected a variable name.");
                        None
                    }
                    Some((SymbolKind::Variable, ty)) => Some(ty),
                }
            }
            Expr::Assignment { ident, span, value } => {
                let value_ty = self.infer_expr(value);
                let resolved = self.table.resolve(ident).map(|s| (s.kind, s.ty));
                match resolved {
                    None => {
                        self.error(span.clone(), "Undefined variable in assignment.");
                        None
                    }
                    Some((SymbolKind::Function, _)) => {
                        self.error(span.clone(), "Cannot assign to a function.");
                        None
                    }
                    Some((SymbolKind::Variable, target_ty)) => match value_ty {
                        Some(value_ty) if value_ty != target_ty => {
                            self.error(span.clone(), "Type mismatch in assignment.");
                            None
                        }
                        _ => value_ty,
                    },
                }
            }
            Expr::FnCall { ident, span, args } => {
                let resolved = self
                    .table
                    .resolve(ident)
                    .map(|s| (s.kind, s.ty, s.param_tys.clone()));
                match resolved {
                    None => {
                        self.error(span.clone(), "Undefined function.");
                        None
                    }
                    Some((SymbolKind::Variable, ..)) => {
                        self.error(span.clone(), "Cannot call a variable.");
                        None
                    }
                    Some((SymbolKind::Function, return_ty, param_tys)) => {
                        if args.len() != param_tys.len() {
                            self.error(span.clone(), "Wrong number of arguments.");
                            return None;
                        }
                        for (arg, param_ty) in args.iter().zip(param_tys) {
                            if let Some(arg_ty) = self.infer_expr(arg) {
                                if arg_ty != param_ty {
                                    self.error(arg.span(), "Argument type mismatch.");
                                }
                            }
                        }
                        Some(return_ty)
                    }
                }
            }
            Expr::Unary { op, arg } => {
                let arg_ty = self.infer_expr(arg)?;
                match op {
                    Token::Minus => {
                        if !arg_ty.is_numeric() {
                            self.error(arg.span(), "Unary negation requires a numeric operand.");
                            return None;
                        }
                        Some(arg_ty)
                    }
                    Token::LogicalNot => {
                        if arg_ty != Type::Int {
                            self.error(arg.span(), "Logical NOT requires a boolean operand.");
                            return None;
                        }
                        Some(Type::Int)
                    }
                    _ => unreachable!("not a unary operator: {:?}", op),
                }
            }
            Expr::Binary { lhs, op, rhs } => {
                // Analyze both sides before short-circuiting on the sentinel.
                let lhs_ty = self.infer_expr(lhs);
                let rhs_ty = self.infer_expr(rhs);
                let (lhs_ty, rhs_ty) = (lhs_ty?, rhs_ty?);
                match op {
                    Token::Plus | Token::Minus | Token::Asterisk | Token::Slash | Token::Percent => {
                        if !lhs_ty.is_numeric() || !rhs_ty.is_numeric() {
                            self.error(
                                lhs.span(),
                                "Arithmetic operators require numeric operands.",
                            );
                            return None;
                        }
                        // Float is contagious.
                        if lhs_ty == Type::Float || rhs_ty == Type::Float {
                            Some(Type::Float)
                        } else {
                            Some(Type::Int)
                        }
                    }
                    Token::EqualsEquals
                    | Token::NotEquals
                    | Token::LessThan
                    | Token::GreaterThan
                    | Token::LessThanEquals
                    | Token::GreaterThanEquals => {
                        if lhs_ty != rhs_ty {
                            self.error(
                                lhs.span(),
                                "Comparison operators require compatible operands.",
                            );
                            return None;
                        }
                        Some(Type::Int)
                    }
                    Token::LogicalAnd | Token::LogicalOr => {
                        if lhs_ty != Type::Int || rhs_ty != Type::Int {
                            self.error(lhs.span(), "Logical operators require boolean operands.");
                            return None;
                        }
                        Some(Type::Int)
                    }
                    _ => unreachable!("not a binary operator: {:?}", op),
                }
            }
            Expr::Error => None,
        }
    }
}

impl<'a, 'ast> Visitor<'ast> for Analyzer<'a> {
    fn visit_expr(&mut self, expr: &'ast Expr) {
        // Statement position: infer for the side effects, discard the type.
        self.infer_expr(expr);
    }

    fn visit_stmt(&mut self, stmt: &'ast Stmt) {
        // Do not use default walking logic.

        match stmt {
            Stmt::VarDeclaration {
                ident,
                ty,
                initializer,
                span,
            } => {
                if let Some(initializer) = initializer {
                    if let Some(init_ty) = self.infer_expr(initializer) {
                        if init_ty != *ty {
                            self.error(span.clone(), "Type mismatch in variable initialization.");
                        }
                    }
                }
                // The name only becomes visible after its initializer.
                if !self.table.define_variable(ident, *ty) {
                    self.error(
                        span.clone(),
                        format!("Variable '{}' already defined in this scope.", ident),
                    );
                }
            }
            Stmt::FnDeclaration {
                return_ty,
                params,
                body,
                ..
            } => {
                // Pass 1 already registered the function itself.
                let previous_return_ty = self.current_return_ty;
                self.current_return_ty = *return_ty;

                self.table.begin_scope();
                for param in params {
                    if !self.table.define_variable(&param.ident, param.ty) {
                        self.error(
                            param.span.clone(),
                            format!("Variable '{}' already defined in this scope.", param.ident),
                        );
                    }
                }
                self.analyze_block(body);
                self.table.end_scope();

                self.current_return_ty = previous_return_ty;
            }
            Stmt::Block(body) => self.analyze_block(body),
            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                self.check_condition(condition);
                self.visit_stmt(then_branch);
                if let Some(else_branch) = else_branch {
                    self.visit_stmt(else_branch);
                }
            }
            Stmt::While { condition, body } => {
                self.check_condition(condition);
                self.visit_stmt(body);
            }
            Stmt::For {
                initializer,
                condition,
                increment,
                body,
            } => {
                self.table.begin_scope();
                if let Some(initializer) = initializer {
                    self.visit_stmt(initializer);
                }
                if let Some(condition) = condition {
                    self.check_condition(condition);
                }
                if let Some(increment) = increment {
                    // The increment's type is ignored.
                    self.infer_expr(increment);
                }
                self.visit_stmt(body);
                self.table.end_scope();
            }
            Stmt::Return { value, span } => match value {
                Some(_) if self.current_return_ty == Type::Void => {
                    self.error(span.clone(), "Cannot return a value from a void function.");
                }
                None if self.current_return_ty != Type::Void => {
                    self.error(span.clone(), "Missing return value in non-void function.");
                }
                Some(value) => {
                    if let Some(value_ty) = self.infer_expr(value) {
                        if value_ty != self.current_return_ty {
                            self.error(value.span(), "Return type mismatch.");
                        }
                    }
                }
                None => {}
            },
            Stmt::ExprStmt(expr) => {
                self.infer_expr(expr);
            }
            Stmt::Error => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hindic_parser::parser::Parser;

    fn analyze(source_text: &str) -> (bool, usize, String) {
        let source = source_text.into();
        let program = Parser::new(&source).parse_program();
        assert!(source.has_no_errors(), "parse errors: {}", source.errors);
        let mut analyzer = Analyzer::new(&source);
        let ok = analyzer.analyze_program(&program);
        (ok, analyzer.error_count(), source.errors.to_string())
    }

    fn assert_clean(source: &str) {
        let (ok, count, errors) = analyze(source);
        assert!(ok, "unexpected errors: {}", errors);
        assert_eq!(count, 0);
    }

    fn assert_error(source: &str, message: &str) {
        let (ok, count, errors) = analyze(source);
        assert!(!ok);
        assert!(count > 0);
        assert!(errors.contains(message), "missing {:?} in {:?}", message, errors);
    }

    #[test]
    fn valid_program() {
        assert_clean(
            "पूर्णांक जोड़(पूर्णांक क, पूर्णांक ख) { वापस क + ख; }\n\
             पूर्णांक मुख्य() { वापस जोड़(2, 3); }",
        );
    }

    #[test]
    fn initializer_type_mismatch() {
        assert_error("पूर्णांक क = 1.5;", "Type mismatch in variable initialization.");
        assert_clean("दशमलव द = 1.5;");
        // A string literal is character data.
        assert_clean("वर्ण नाम = \"नमस्ते\";");
    }

    #[test]
    fn initializer_cannot_see_its_own_name() {
        assert_error("पूर्णांक क = क;", "Undefined variable.");
    }

    #[test]
    fn void_function_cannot_return_a_value() {
        assert_error(
            "शून्य फ() { वापस 1; }",
            "Cannot return a value from a void function.",
        );
    }

    #[test]
    fn non_void_function_must_return_a_value() {
        assert_error(
            "पूर्णांक फ() { वापस; }",
            "Missing return value in non-void function.",
        );
    }

    #[test]
    fn return_type_must_match() {
        assert_error("पूर्णांक फ() { वापस 1.5; }", "Return type mismatch.");
    }

    #[test]
    fn block_scope_is_isolated() {
        assert_error(
            "पूर्णांक मुख्य() { अगर (1) { पूर्णांक य = 2; } वापस य; }",
            "Undefined variable.",
        );
    }

    #[test]
    fn shadowing_in_inner_scope_is_allowed() {
        assert_clean(
            "पूर्णांक मुख्य() { पूर्णांक क = 1; { दशमलव क = 2.5; } वापस क; }",
        );
    }

    #[test]
    fn redeclaration_in_same_scope() {
        assert_error(
            "पूर्णांक मुख्य() { पूर्णांक क = 1; पूर्णांक क = 2; वापस क; }",
            "Variable 'क' already defined in this scope.",
        );
    }

    #[test]
    fn function_redefinition() {
        assert_error(
            "शून्य फ() { } शून्य फ() { }",
            "Function 'फ' already defined.",
        );
    }

    #[test]
    fn parameters_live_in_their_own_scope() {
        // The body block is one scope deeper than the parameters, so a body
        // variable may reuse a parameter name.
        assert_clean("पूर्णांक फ(पूर्णांक क) { पूर्णांक क = 2; वापस क; }");
    }

    #[test]
    fn undefined_names() {
        assert_error("शून्य फ() { क = 1; }", "Undefined variable in assignment.");
        assert_error("शून्य फ() { ग(); }", "Undefined function.");
        assert_error("शून्य फ() { वापस; } शून्य ग() { फ = 1; }", "Cannot assign to a function.");
        assert_error("शून्य फ() { पूर्णांक क = 0; क(); }", "Cannot call a variable.");
        assert_error("शून्य फ() { पूर्णांक क = फ; }", "Expected a variable name.");
    }

    #[test]
    fn call_checking() {
        assert_error(
            "पूर्णांक द(पूर्णांक क) { वापस क; } पूर्णांक मुख्य() { वापस द(1, 2); }",
            "Wrong number of arguments.",
        );
        assert_error(
            "पूर्णांक द(पूर्णांक क) { वापस क; } पूर्णांक मुख्य() { वापस द(1.5); }",
            "Argument type mismatch.",
        );
    }

    #[test]
    fn recursion_and_forward_calls_work() {
        assert_clean(
            "पूर्णांक मुख्य() { वापस बाद(3); }\n\
             पूर्णांक बाद(पूर्णांक न) { अगर (न < 1) वापस 0; वापस बाद(न - 1); }",
        );
    }

    #[test]
    fn conditions_must_be_int() {
        assert_error("शून्य फ() { अगर (1.5) { } }", "Condition must be a boolean expression.");
        assert_error("शून्य फ() { जबतक (\"स\") { } }", "Condition must be a boolean expression.");
        assert_error(
            "शून्य फ() { दौर (; 2.5; ) { } }",
            "Condition must be a boolean expression.",
        );
        assert_clean("शून्य फ() { अगर (1 < 2) { } }");
    }

    #[test]
    fn for_scope_covers_initializer_and_body() {
        assert_clean("शून्य फ() { दौर (पूर्णांक इ = 0; इ < 3; इ = इ + 1) { पूर्णांक द = इ; द = द; } }");
        assert_error(
            "शून्य फ() { दौर (पूर्णांक इ = 0; इ < 3; इ = इ + 1) { } इ = 1; }",
            "Undefined variable in assignment.",
        );
    }

    #[test]
    fn arithmetic_typing() {
        assert_clean("पूर्णांक फ() { वापस 1 + 2 * 3; }");
        // Float is contagious.
        assert_clean("दशमलव फ() { वापस 1 + 2.5; }");
        assert_error("पूर्णांक फ() { वापस 1 + 2.5; }", "Return type mismatch.");
        assert_error(
            "शून्य फ() { \"स\" + 1; }",
            "Arithmetic operators require numeric operands.",
        );
    }

    #[test]
    fn comparison_and_logical_typing() {
        assert_error(
            "शून्य फ() { 1 < 2.5; }",
            "Comparison operators require compatible operands.",
        );
        assert_error(
            "शून्य फ() { 1.5 && 1; }",
            "Logical operators require boolean operands.",
        );
        assert_clean("शून्य फ() { 1 < 2 && 3 != 4 || !1; }");
    }

    #[test]
    fn unary_typing() {
        assert_error(
            "शून्य फ() { -\"स\"; }",
            "Unary negation requires a numeric operand.",
        );
        assert_error("शून्य फ() { !1.5; }", "Logical NOT requires a boolean operand.");
        assert_clean("दशमलव फ() { वापस -1.5; }");
    }

    #[test]
    fn sentinel_suppresses_cascades() {
        // The undefined variable reports once; the enclosing addition and
        // return checks stay silent.
        let (_, count, errors) = analyze("पूर्णांक फ() { वापस अज्ञात + 1; }");
        assert_eq!(count, 1, "errors: {}", errors);
        assert!(errors.contains("Undefined variable."));
    }

    #[test]
    fn analysis_is_idempotent() {
        let source_text = "पूर्णांक मुख्य() { अगर (1) { पूर्णांक य = 2; } वापस य; }";
        let source = source_text.into();
        let program = Parser::new(&source).parse_program();
        assert!(source.has_no_errors());

        let mut first = Analyzer::new(&source);
        first.analyze_program(&program);
        let mut second = Analyzer::new(&source);
        second.analyze_program(&program);
        assert_eq!(first.error_count(), second.error_count());
    }
}
