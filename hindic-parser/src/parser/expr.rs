use super::*;

impl<'a> Parser<'a> {
    /* Expressions */
    /// Parses any expression.
    /// This is equivalent to calling [`Self::parse_expr_bp`] with `min_bp = 0`.
    pub fn parse_expr(&mut self) -> Expr {
        self.parse_expr_bp(0) // 0 to accept any expression
    }

    /// Parses a primary (atom) expression.
    fn parse_primary_expr(&mut self) -> Expr {
        // NOTE: prefix operators are handled here
        match self.current_token.clone() {
            Token::IntLit(_) | Token::FloatLit(_) | Token::StringLit(_) => {
                self.parse_literal_expr()
            }
            Token::Identifier(ident) => {
                let span = self.current_span.clone();
                self.bump();
                Expr::Identifier { ident, span }
            }
            Token::LogicalNot => {
                self.bump();
                Expr::Unary {
                    op: Token::LogicalNot,
                    arg: Box::new(self.parse_expr_bp(UNARY_BP)),
                }
            }
            Token::Minus => {
                self.bump();
                Expr::Unary {
                    op: Token::Minus,
                    arg: Box::new(self.parse_expr_bp(UNARY_BP)),
                }
            }
            Token::OpenParen => {
                self.bump();
                let expr = self.parse_expr();
                self.expect(Token::CloseParen, "Expect ')' after expression.");
                expr
            }
            _ => {
                self.error_at_current("Expect expression.");
                Expr::Error
            }
        }
    }

    /// Parses an expression with the specified `min_bp`.
    /// To parse any expression use, [`Self::parse_expr`].
    fn parse_expr_bp(&mut self, min_bp: u8) -> Expr {
        let mut lhs = self.parse_primary_expr();

        // At most one call suffix; only a plain identifier can be called.
        if self.current_token == Token::OpenParen {
            lhs = self.parse_call_expr(lhs);
        }

        loop {
            let (l_bp, r_bp) = match self.current_token.binop_bp() {
                Some(bp) => bp,
                None => break, // not a valid binop, stop parsing
            };
            if l_bp < min_bp {
                break; // less than the min_bp, stop parsing
            }

            // self.current_token is a valid binop
            let binop = self.current_token.clone();
            self.bump();

            let rhs = self.parse_expr_bp(r_bp);

            lhs = if binop == Token::Equals {
                match lhs {
                    Expr::Identifier { ident, span } => Expr::Assignment {
                        ident,
                        span,
                        value: Box::new(rhs),
                    },
                    _ => {
                        self.error_at_current("Invalid assignment target.");
                        Expr::Error
                    }
                }
            } else {
                Expr::Binary {
                    lhs: Box::new(lhs),
                    op: binop,
                    rhs: Box::new(rhs),
                }
            };
        }

        lhs
    }

    /* Expressions.Literals */
    /// Parses a literal expression: a number (integer or floating flavour,
    /// source spelling preserved) or a string.
    fn parse_literal_expr(&mut self) -> Expr {
        let span = self.current_span.clone();
        let val = match self.current_token.clone() {
            Token::IntLit(_) => Expr::NumberLit {
                raw: self.current_slice().to_string(),
                is_float: false,
                span,
            },
            Token::FloatLit(_) => Expr::NumberLit {
                raw: self.current_slice().to_string(),
                is_float: true,
                span,
            },
            Token::StringLit(value) => Expr::StringLit { value, span },
            _ => {
                self.error_at_current("Expect expression.");
                Expr::Error
            }
        };
        if val != Expr::Error {
            self.bump(); // eat parsed token if not error
        }
        val
    }

    /* Expressions.Call */
    /// Parses the argument list of a call. The callee has already been
    /// parsed; anything but a plain identifier cannot be called.
    fn parse_call_expr(&mut self, callee: Expr) -> Expr {
        match callee {
            Expr::Identifier { ident, span } => {
                self.bump(); // eat `(`
                let mut args = Vec::new();

                if !self.eat(Token::CloseParen) {
                    loop {
                        args.push(self.parse_expr());

                        if self.eat(Token::CloseParen) {
                            break;
                        } else if !self.eat(Token::Comma) {
                            self.error_at_current("Expect ')' after arguments.");
                            break;
                        }
                    }
                }

                Expr::FnCall { ident, span, args }
            }
            _ => {
                self.error_at_current("Can only call functions.");
                callee
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expr(source: &str) -> Expr {
        let source = source.into();
        let ast = Parser::new(&source).parse_expr();
        assert!(source.has_no_errors());
        ast
    }

    fn expr_errors(source: &str) -> String {
        let source = source.into();
        let _ast = Parser::new(&source).parse_expr();
        source.errors.to_string()
    }

    fn ident(name: &str, start: usize) -> Expr {
        Expr::Identifier {
            ident: name.to_string(),
            span: start..start + name.len(),
        }
    }

    fn int(raw: &str, start: usize) -> Expr {
        Expr::NumberLit {
            raw: raw.to_string(),
            is_float: false,
            span: start..start + raw.len(),
        }
    }

    #[test]
    fn test_literal() {
        assert_eq!(expr("1"), int("1", 0));
        assert_eq!(
            expr("2.5"),
            Expr::NumberLit {
                raw: "2.5".to_string(),
                is_float: true,
                span: 0..3,
            }
        );
        assert_eq!(
            expr("\"नमस्ते\""),
            Expr::StringLit {
                value: "नमस्ते".to_string(),
                span: 0..20,
            }
        );
    }

    #[test]
    fn test_binary_expr() {
        assert_eq!(
            expr("1 + 2"),
            Expr::Binary {
                lhs: Box::new(int("1", 0)),
                op: Token::Plus,
                rhs: Box::new(int("2", 4)),
            }
        );
    }

    #[test]
    fn test_binary_left_associativity() {
        // a - b - c should be (a - b) - c
        assert_eq!(
            expr("क - ख - ग"),
            Expr::Binary {
                lhs: Box::new(Expr::Binary {
                    lhs: Box::new(ident("क", 0)),
                    op: Token::Minus,
                    rhs: Box::new(ident("ख", 6)),
                }),
                op: Token::Minus,
                rhs: Box::new(ident("ग", 12)),
            }
        );
    }

    #[test]
    fn test_assignment_right_associativity() {
        // a = b = c should be a = (b = c)
        assert_eq!(
            expr("क = ख = ग"),
            Expr::Assignment {
                ident: "क".to_string(),
                span: 0..3,
                value: Box::new(Expr::Assignment {
                    ident: "ख".to_string(),
                    span: 6..9,
                    value: Box::new(ident("ग", 12)),
                }),
            }
        );
    }

    #[test]
    fn test_precedence() {
        // 1 + 2 * 3 should be 1 + (2 * 3)
        assert_eq!(
            expr("1 + 2 * 3"),
            Expr::Binary {
                lhs: Box::new(int("1", 0)),
                op: Token::Plus,
                rhs: Box::new(Expr::Binary {
                    lhs: Box::new(int("2", 4)),
                    op: Token::Asterisk,
                    rhs: Box::new(int("3", 8)),
                }),
            }
        );
        // 1 == 2 && 3 == 4 should be (1 == 2) && (3 == 4)
        assert_eq!(
            expr("1 == 2 && 3 == 4"),
            Expr::Binary {
                lhs: Box::new(Expr::Binary {
                    lhs: Box::new(int("1", 0)),
                    op: Token::EqualsEquals,
                    rhs: Box::new(int("2", 5)),
                }),
                op: Token::LogicalAnd,
                rhs: Box::new(Expr::Binary {
                    lhs: Box::new(int("3", 10)),
                    op: Token::EqualsEquals,
                    rhs: Box::new(int("4", 15)),
                }),
            }
        );
    }

    #[test]
    fn test_grouping() {
        // (1 + 2) * 3 keeps the addition on the left.
        assert_eq!(
            expr("(1 + 2) * 3"),
            Expr::Binary {
                lhs: Box::new(Expr::Binary {
                    lhs: Box::new(int("1", 1)),
                    op: Token::Plus,
                    rhs: Box::new(int("2", 5)),
                }),
                op: Token::Asterisk,
                rhs: Box::new(int("3", 10)),
            }
        );
    }

    #[test]
    fn test_unary() {
        assert_eq!(
            expr("-1"),
            Expr::Unary {
                op: Token::Minus,
                arg: Box::new(int("1", 1)),
            }
        );
        // -a * b should be (-a) * b
        assert_eq!(
            expr("-क * ख"),
            Expr::Binary {
                lhs: Box::new(Expr::Unary {
                    op: Token::Minus,
                    arg: Box::new(ident("क", 1)),
                }),
                op: Token::Asterisk,
                rhs: Box::new(ident("ख", 7)),
            }
        );
        assert_eq!(
            expr("!!क"),
            Expr::Unary {
                op: Token::LogicalNot,
                arg: Box::new(Expr::Unary {
                    op: Token::LogicalNot,
                    arg: Box::new(ident("क", 2)),
                }),
            }
        );
    }

    #[test]
    fn test_fn_call() {
        assert_eq!(
            expr("जोड़()"),
            Expr::FnCall {
                ident: "जोड़".to_string(),
                span: 0..12,
                args: Vec::new(),
            }
        );
        assert_eq!(
            expr("जोड़(1, क)"),
            Expr::FnCall {
                ident: "जोड़".to_string(),
                span: 0..12,
                args: vec![int("1", 13), ident("क", 16)],
            }
        );
    }

    #[test]
    fn test_call_on_non_identifier() {
        assert!(expr_errors("1(2)").contains("Can only call functions."));
    }

    #[test]
    fn test_invalid_assignment_target() {
        assert!(expr_errors("1 = 2").contains("Invalid assignment target."));
    }
}
