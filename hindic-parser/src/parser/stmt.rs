use super::*;

impl<'a> Parser<'a> {
    /// Parses a declaration (or statement).
    ///
    /// A leading type keyword starts a variable or function declaration; the
    /// two are told apart by peeking past the name for `(`.
    pub fn parse_declaration(&mut self) -> Stmt {
        match Type::from_token(&self.current_token) {
            Some(ty) => {
                self.bump(); // eat the type keyword
                if matches!(self.current_token, Token::Identifier(_))
                    && self.next_token == Token::OpenParen
                {
                    self.parse_fn_declaration(ty)
                } else {
                    self.parse_var_declaration(ty)
                }
            }
            None => self.parse_stmt(),
        }
    }

    /// Parses a statement.
    pub fn parse_stmt(&mut self) -> Stmt {
        match self.current_token {
            Token::If => self.parse_if_stmt(),
            Token::While => self.parse_while_stmt(),
            Token::For => self.parse_for_stmt(),
            Token::Return => self.parse_return_stmt(),
            Token::OpenBrace => {
                self.bump();
                Stmt::Block(self.parse_block_body())
            }
            // Lexed but not part of the accepted grammar.
            Token::Do => self.parse_unsupported_stmt("'do' is not yet supported."),
            Token::Break => self.parse_unsupported_stmt("'break' is not yet supported."),
            Token::Continue => self.parse_unsupported_stmt("'continue' is not yet supported."),
            _ => {
                // expression statement
                let expr = self.parse_expr();
                let stmt = Stmt::ExprStmt(expr);
                self.expect(Token::Semi, "Expect ';' after expression.");
                stmt
            }
        }
    }

    /// Parses the statements of a block. The `{` has already been consumed.
    fn parse_block_body(&mut self) -> Vec<Stmt> {
        let mut body = Vec::new();
        while self.current_token != Token::CloseBrace && self.current_token != Token::Eof {
            body.push(self.parse_declaration());
            if self.panic_mode {
                self.synchronize();
            }
        }
        self.expect(Token::CloseBrace, "Expect '}' after block.");
        body
    }

    fn parse_var_declaration(&mut self, ty: Type) -> Stmt {
        let (ident, span) = match self.current_token.clone() {
            Token::Identifier(ident) => {
                let span = self.current_span.clone();
                self.bump();
                (ident, span)
            }
            _ => {
                self.error_at_current("Expect variable name.");
                return Stmt::Error;
            }
        };

        let initializer = if self.eat(Token::Equals) {
            Some(self.parse_expr())
        } else {
            None
        };
        self.expect(Token::Semi, "Expect ';' after variable declaration.");
        Stmt::VarDeclaration {
            ident,
            ty,
            initializer,
            span,
        }
    }

    fn parse_fn_declaration(&mut self, return_ty: Type) -> Stmt {
        let (ident, span) = match self.current_token.clone() {
            Token::Identifier(ident) => {
                let span = self.current_span.clone();
                self.bump();
                (ident, span)
            }
            _ => {
                self.error_at_current("Expect function name.");
                return Stmt::Error;
            }
        };

        self.expect(Token::OpenParen, "Expect '(' after function name.");
        let mut params = Vec::new();
        if !self.eat(Token::CloseParen) {
            loop {
                if params.len() >= MAX_PARAMS {
                    self.error_at_current("Too many function parameters.");
                    break;
                }
                if let Some(param) = self.parse_param() {
                    params.push(param);
                }
                if !self.eat(Token::Comma) {
                    break;
                }
            }
            self.expect(Token::CloseParen, "Expect ')' after parameters.");
        }

        self.expect(Token::OpenBrace, "Expect '{' before function body.");
        let body = self.parse_block_body();

        Stmt::FnDeclaration {
            ident,
            return_ty,
            params,
            body,
            span,
        }
    }

    /// Parses a single `type name` parameter. `शून्य` is not a parameter
    /// type.
    fn parse_param(&mut self) -> Option<Param> {
        let ty = match self.current_token {
            Token::Int => Type::Int,
            Token::Float => Type::Float,
            Token::Char => Type::Char,
            _ => {
                self.error_at_current("Expect parameter type.");
                return None;
            }
        };
        self.bump();

        match self.current_token.clone() {
            Token::Identifier(ident) => {
                let span = self.current_span.clone();
                self.bump();
                Some(Param { ty, ident, span })
            }
            _ => {
                self.error_at_current("Expect parameter name.");
                None
            }
        }
    }

    fn parse_if_stmt(&mut self) -> Stmt {
        self.bump(); // eat `अगर`
        self.expect(Token::OpenParen, "Expect '(' after 'if'.");
        let condition = self.parse_expr();
        self.expect(Token::CloseParen, "Expect ')' after if condition.");

        let then_branch = Box::new(self.parse_stmt());
        let else_branch = if self.eat(Token::Else) {
            Some(Box::new(self.parse_stmt()))
        } else {
            None
        };

        Stmt::If {
            condition,
            then_branch,
            else_branch,
        }
    }

    fn parse_while_stmt(&mut self) -> Stmt {
        self.bump(); // eat `जबतक`
        self.expect(Token::OpenParen, "Expect '(' after 'while'.");
        let condition = self.parse_expr();
        self.expect(Token::CloseParen, "Expect ')' after while condition.");
        let body = Box::new(self.parse_stmt());

        Stmt::While { condition, body }
    }

    fn parse_for_stmt(&mut self) -> Stmt {
        self.bump(); // eat `दौर`
        self.expect(Token::OpenParen, "Expect '(' after 'for'.");

        let initializer = if self.eat(Token::Semi) {
            None
        } else {
            let decl_ty = match self.current_token {
                Token::Int => Some(Type::Int),
                Token::Float => Some(Type::Float),
                Token::Char => Some(Type::Char),
                _ => None,
            };
            let stmt = match decl_ty {
                Some(ty) => {
                    self.bump();
                    self.parse_var_declaration(ty)
                }
                None => {
                    let expr = self.parse_expr();
                    self.expect(Token::Semi, "Expect ';' after expression.");
                    Stmt::ExprStmt(expr)
                }
            };
            Some(Box::new(stmt))
        };

        let condition = if self.current_token != Token::Semi {
            Some(self.parse_expr())
        } else {
            None
        };
        self.expect(Token::Semi, "Expect ';' after loop condition.");

        let increment = if self.current_token != Token::CloseParen {
            Some(self.parse_expr())
        } else {
            None
        };
        self.expect(Token::CloseParen, "Expect ')' after for clauses.");

        let body = Box::new(self.parse_stmt());

        Stmt::For {
            initializer,
            condition,
            increment,
            body,
        }
    }

    fn parse_return_stmt(&mut self) -> Stmt {
        let span = self.current_span.clone();
        self.bump(); // eat `वापस`
        let value = if self.current_token != Token::Semi {
            Some(self.parse_expr())
        } else {
            None
        };
        self.expect(Token::Semi, "Expect ';' after return value.");
        Stmt::Return { value, span }
    }

    fn parse_unsupported_stmt(&mut self, message: &str) -> Stmt {
        self.error_at_current(message);
        self.bump(); // skip the keyword so recovery makes progress
        Stmt::Error
    }
}
