use logos::{Logos, Span};

/// Identifiers may mix ASCII letters, underscores and characters from the
/// Devanagari block (U+0900..U+097F); digits are only allowed after the
/// first character.
#[derive(Debug, Logos, Clone, PartialEq)]
pub enum Token {
    // literals
    #[regex(r"[0-9]+", |lex| lex.slice().parse())]
    IntLit(i64),
    #[regex(r"[0-9]+\.[0-9]+", |lex| lex.slice().parse())]
    FloatLit(f64),
    #[regex(r#""[^"]*""#, |lex| lex.slice()[1..lex.slice().len() - 1].to_string())]
    StringLit(String),

    // identifiers
    #[regex(r"[a-zA-Z_\u{0900}-\u{097F}][a-zA-Z0-9_\u{0900}-\u{097F}]*", |lex| lex.slice().to_string())]
    Identifier(String),

    // unary operators
    #[token("!")]
    LogicalNot,

    // binary operators
    // - arithmetics
    #[token("+")]
    Plus,
    #[token("-")]
    Minus, // NOTE: can also be unary
    #[token("*")]
    Asterisk,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    // - assignment
    #[token("=")]
    Equals,
    // - equality
    #[token("==")]
    EqualsEquals,
    #[token("!=")]
    NotEquals,
    // - ordering
    #[token(">")]
    GreaterThan,
    #[token(">=")]
    GreaterThanEquals,
    #[token("<")]
    LessThan,
    #[token("<=")]
    LessThanEquals,
    // - logical
    #[token("&&")]
    LogicalAnd,
    #[token("||")]
    LogicalOr,

    // punctuation
    #[token("(")]
    OpenParen,
    #[token(")")]
    CloseParen,
    #[token("{")]
    OpenBrace,
    #[token("}")]
    CloseBrace,
    #[token(",")]
    Comma,
    #[token(";")]
    Semi,

    // keywords
    #[token("पूर्णांक")]
    Int,
    #[token("दशमलव")]
    Float,
    #[token("वर्ण")]
    Char,
    #[token("शून्य")]
    Void,
    #[token("अगर")]
    If,
    #[token("वरना")]
    Else,
    #[token("दौर")]
    For,
    #[token("जबतक")]
    While,
    #[token("करो")]
    Do,
    #[token("रुको")]
    Break,
    #[token("जारी")]
    Continue,
    #[token("वापस")]
    Return,

    // misc
    /// A string literal whose closing quote never arrives.
    #[regex(r#""[^"]*"#)]
    UnterminatedString,
    #[regex(r"[ \t\r\n]+", logos::skip)]
    #[regex(r"//[^\n]*", logos::skip)] // single line comments
    #[error]
    Error,

    /// Only generated in parse phase when `lexer.next()` returns `None`.
    Eof,
}

impl Token {
    /// Returns the binary binding power or `None` if invalid binop token.
    /// Binding power `0` and `1` is reserved for accepting any expression.
    /// Assignment (`Token::Equals`) has the lowest precedence with `(3, 2)`.
    pub fn binop_bp(&self) -> Option<(u8, u8)> {
        match self {
            /* Assignment */
            Token::Equals => Some((3, 2)),
            /* Logical */
            Token::LogicalOr => Some((4, 5)),
            Token::LogicalAnd => Some((6, 7)),
            /* Equality */
            Token::EqualsEquals | Token::NotEquals => Some((8, 9)),
            /* Ordering */
            Token::GreaterThan
            | Token::GreaterThanEquals
            | Token::LessThan
            | Token::LessThanEquals => Some((10, 11)),
            /* Additive */
            Token::Plus | Token::Minus => Some((12, 13)),
            /* Multiplicative */
            Token::Asterisk | Token::Slash | Token::Percent => Some((14, 15)),
            _ => None,
        }
    }

    /// The token name used by the tokenize-only driver output.
    pub fn name(&self) -> &'static str {
        match self {
            Token::IntLit(_) | Token::FloatLit(_) => "NUMBER",
            Token::StringLit(_) => "STRING",
            Token::Identifier(_) => "IDENTIFIER",
            Token::LogicalNot => "NOT",
            Token::Plus => "PLUS",
            Token::Minus => "MINUS",
            Token::Asterisk => "MULTIPLY",
            Token::Slash => "DIVIDE",
            Token::Percent => "MODULO",
            Token::Equals => "ASSIGN",
            Token::EqualsEquals => "EQUALS",
            Token::NotEquals => "NOT_EQUALS",
            Token::GreaterThan => "GREATER",
            Token::GreaterThanEquals => "GREATER_EQ",
            Token::LessThan => "LESS",
            Token::LessThanEquals => "LESS_EQ",
            Token::LogicalAnd => "AND",
            Token::LogicalOr => "OR",
            Token::OpenParen => "LPAREN",
            Token::CloseParen => "RPAREN",
            Token::OpenBrace => "LBRACE",
            Token::CloseBrace => "RBRACE",
            Token::Comma => "COMMA",
            Token::Semi => "SEMICOLON",
            Token::Int => "INT",
            Token::Float => "FLOAT",
            Token::Char => "CHAR",
            Token::Void => "VOID",
            Token::If => "IF",
            Token::Else => "ELSE",
            Token::For => "FOR",
            Token::While => "WHILE",
            Token::Do => "DO",
            Token::Break => "BREAK",
            Token::Continue => "CONTINUE",
            Token::Return => "RETURN",
            Token::UnterminatedString | Token::Error => "ERROR",
            Token::Eof => "EOF",
        }
    }

    /// The diagnostic message carried by a lexical error token.
    pub fn lexical_error_message(&self) -> Option<&'static str> {
        match self {
            Token::UnterminatedString => Some("Unterminated string."),
            Token::Error => Some("Unexpected character."),
            _ => None,
        }
    }
}

/// Tokenizes a whole source, pairing each token with its byte span. The
/// stream always ends with exactly one `Eof` token. Lexical error tokens are
/// passed through; this is the tokenize-only driver mode's view of the
/// input.
pub fn tokenize(source: &str) -> Vec<(Token, Span)> {
    let mut lexer = Token::lexer(source);
    let mut tokens = Vec::new();
    while let Some(token) = lexer.next() {
        tokens.push((token, lexer.span()));
    }
    tokens.push((Token::Eof, source.len()..source.len()));
    tokens
}
