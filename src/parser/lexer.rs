//! Lexer (tokenizer) for Cinder source code
//!
//! Converts raw source text into a flat [`Token`] stream consumed by the
//! parser. Whitespace and `//` line comments are skipped. Multi-character
//! operators are matched greedily, so `<<=` lexes as a single token.

use std::fmt;

/// Source location information for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// All token kinds produced by the lexer.
///
/// The set is closed: every operator the language prints in diagnostics has
/// a kind here even when the grammar does not consume it yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Literals
    Integer,

    // Identifiers
    Identifier,

    // Keywords
    Int,
    Void,
    Char,
    Short,
    Long,
    Unsigned,
    Signed,
    Return,

    // Arithmetic
    Plus,           // +
    Increment,      // ++
    PlusAssign,     // +=
    Minus,          // -
    Decrement,      // --
    MinusAssign,    // -=
    Multiply,       // *
    MultiplyAssign, // *=
    Divide,         // /
    DivideAssign,   // /=
    Modulo,         // %
    ModuloAssign,   // %=

    // Assignment and comparison
    Assign,       // =
    Equal,        // ==
    NotEqual,     // !=
    Greater,      // >
    GreaterEqual, // >=
    Less,         // <
    LessEqual,    // <=

    // Logical
    LogicalAnd, // &&
    LogicalOr,  // ||
    LogicalNot, // !

    // Bitwise
    BitNot,           // ~
    BitAnd,           // &
    BitAndAssign,     // &=
    BitOr,            // |
    BitOrAssign,      // |=
    BitXor,           // ^
    BitXorAssign,     // ^=
    ShiftLeft,        // <<
    ShiftLeftAssign,  // <<=
    ShiftRight,       // >>
    ShiftRightAssign, // >>=

    // Member access
    Dot, // .

    // Punctuation
    Comma,     // ,
    Semicolon, // ;
    LParen,    // (
    RParen,    // )
    LBrace,    // {
    RBrace,    // }
    LBracket,  // [
    RBracket,  // ]

    // End of file
    Eof,
}

/// A single token: kind, verbatim source text, and where it starts.
///
/// Tokens are immutable once produced; the parser only reads them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub location: SourceLocation,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, location: SourceLocation) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            location,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.kind == TokenKind::Eof {
            write!(f, "<end of file>")
        } else {
            write!(f, "\"{}\"", self.lexeme)
        }
    }
}

/// Lexer error type
#[derive(Debug, Clone)]
pub struct LexError {
    pub message: String,
    pub location: SourceLocation,
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Lex error at {}: {}", self.location, self.message)
    }
}

impl std::error::Error for LexError {}

/// Hand-written lexer over a character buffer with line/column tracking.
pub struct Lexer {
    chars: Vec<char>,
    position: usize,
    line: usize,
    column: usize,
}

impl Lexer {
    pub fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
        }
    }

    /// Tokenize the whole input, appending an `Eof` token at the end.
    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();

        loop {
            self.skip_whitespace_and_comments();

            if self.peek().is_none() {
                tokens.push(Token::new(
                    TokenKind::Eof,
                    "",
                    SourceLocation::new(self.line, self.column),
                ));
                return Ok(tokens);
            }

            tokens.push(self.next_token()?);
        }
    }

    fn next_token(&mut self) -> Result<Token, LexError> {
        let loc = SourceLocation::new(self.line, self.column);
        let ch = match self.advance() {
            Some(c) => c,
            None => return Ok(Token::new(TokenKind::Eof, "", loc)),
        };

        if ch.is_ascii_digit() {
            return Ok(self.number(ch, loc));
        }

        if ch.is_ascii_alphabetic() || ch == '_' {
            return Ok(self.identifier_or_keyword(ch, loc));
        }

        let token = |kind: TokenKind, lexeme: &str| Token::new(kind, lexeme, loc);

        match ch {
            '+' => {
                if self.eat('+') {
                    Ok(token(TokenKind::Increment, "++"))
                } else if self.eat('=') {
                    Ok(token(TokenKind::PlusAssign, "+="))
                } else {
                    Ok(token(TokenKind::Plus, "+"))
                }
            }
            '-' => {
                if self.eat('-') {
                    Ok(token(TokenKind::Decrement, "--"))
                } else if self.eat('=') {
                    Ok(token(TokenKind::MinusAssign, "-="))
                } else {
                    Ok(token(TokenKind::Minus, "-"))
                }
            }
            '*' => {
                if self.eat('=') {
                    Ok(token(TokenKind::MultiplyAssign, "*="))
                } else {
                    Ok(token(TokenKind::Multiply, "*"))
                }
            }
            '/' => {
                if self.eat('=') {
                    Ok(token(TokenKind::DivideAssign, "/="))
                } else {
                    Ok(token(TokenKind::Divide, "/"))
                }
            }
            '%' => {
                if self.eat('=') {
                    Ok(token(TokenKind::ModuloAssign, "%="))
                } else {
                    Ok(token(TokenKind::Modulo, "%"))
                }
            }
            '=' => {
                if self.eat('=') {
                    Ok(token(TokenKind::Equal, "=="))
                } else {
                    Ok(token(TokenKind::Assign, "="))
                }
            }
            '!' => {
                if self.eat('=') {
                    Ok(token(TokenKind::NotEqual, "!="))
                } else {
                    Ok(token(TokenKind::LogicalNot, "!"))
                }
            }
            '<' => {
                if self.eat('=') {
                    Ok(token(TokenKind::LessEqual, "<="))
                } else if self.eat('<') {
                    if self.eat('=') {
                        Ok(token(TokenKind::ShiftLeftAssign, "<<="))
                    } else {
                        Ok(token(TokenKind::ShiftLeft, "<<"))
                    }
                } else {
                    Ok(token(TokenKind::Less, "<"))
                }
            }
            '>' => {
                if self.eat('=') {
                    Ok(token(TokenKind::GreaterEqual, ">="))
                } else if self.eat('>') {
                    if self.eat('=') {
                        Ok(token(TokenKind::ShiftRightAssign, ">>="))
                    } else {
                        Ok(token(TokenKind::ShiftRight, ">>"))
                    }
                } else {
                    Ok(token(TokenKind::Greater, ">"))
                }
            }
            '&' => {
                if self.eat('&') {
                    Ok(token(TokenKind::LogicalAnd, "&&"))
                } else if self.eat('=') {
                    Ok(token(TokenKind::BitAndAssign, "&="))
                } else {
                    Ok(token(TokenKind::BitAnd, "&"))
                }
            }
            '|' => {
                if self.eat('|') {
                    Ok(token(TokenKind::LogicalOr, "||"))
                } else if self.eat('=') {
                    Ok(token(TokenKind::BitOrAssign, "|="))
                } else {
                    Ok(token(TokenKind::BitOr, "|"))
                }
            }
            '^' => {
                if self.eat('=') {
                    Ok(token(TokenKind::BitXorAssign, "^="))
                } else {
                    Ok(token(TokenKind::BitXor, "^"))
                }
            }
            '~' => Ok(token(TokenKind::BitNot, "~")),
            '.' => Ok(token(TokenKind::Dot, ".")),
            ',' => Ok(token(TokenKind::Comma, ",")),
            ';' => Ok(token(TokenKind::Semicolon, ";")),
            '(' => Ok(token(TokenKind::LParen, "(")),
            ')' => Ok(token(TokenKind::RParen, ")")),
            '{' => Ok(token(TokenKind::LBrace, "{")),
            '}' => Ok(token(TokenKind::RBrace, "}")),
            '[' => Ok(token(TokenKind::LBracket, "[")),
            ']' => Ok(token(TokenKind::RBracket, "]")),

            _ => Err(LexError {
                message: format!("Unexpected character: '{}'", ch),
                location: loc,
            }),
        }
    }

    fn number(&mut self, first: char, loc: SourceLocation) -> Token {
        let mut lexeme = String::new();
        lexeme.push(first);

        while let Some(ch) = self.peek() {
            if ch.is_ascii_digit() {
                lexeme.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        Token::new(TokenKind::Integer, lexeme, loc)
    }

    fn identifier_or_keyword(&mut self, first: char, loc: SourceLocation) -> Token {
        let mut lexeme = String::new();
        lexeme.push(first);

        while let Some(ch) = self.peek() {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                lexeme.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        let kind = match lexeme.as_str() {
            "int" => TokenKind::Int,
            "void" => TokenKind::Void,
            "char" => TokenKind::Char,
            "short" => TokenKind::Short,
            "long" => TokenKind::Long,
            "unsigned" => TokenKind::Unsigned,
            "signed" => TokenKind::Signed,
            "return" => TokenKind::Return,
            _ => TokenKind::Identifier,
        };

        Token::new(kind, lexeme, loc)
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.peek() {
                Some(ch) if ch.is_whitespace() => {
                    self.advance();
                }
                Some('/') if self.peek_next() == Some('/') => {
                    while let Some(ch) = self.peek() {
                        if ch == '\n' {
                            break;
                        }
                        self.advance();
                    }
                }
                _ => break,
            }
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.position).copied()
    }

    fn peek_next(&self) -> Option<char> {
        self.chars.get(self.position + 1).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.position += 1;
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    /// Consume the next character only if it matches `expected`.
    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        Lexer::new(source)
            .tokenize()
            .expect("lexing failed")
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_declaration_tokens() {
        assert_eq!(
            kinds("unsigned int x = 42;"),
            vec![
                TokenKind::Unsigned,
                TokenKind::Int,
                TokenKind::Identifier,
                TokenKind::Assign,
                TokenKind::Integer,
                TokenKind::Semicolon,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_greedy_operators() {
        assert_eq!(
            kinds("<<= >>= << <= < == ="),
            vec![
                TokenKind::ShiftLeftAssign,
                TokenKind::ShiftRightAssign,
                TokenKind::ShiftLeft,
                TokenKind::LessEqual,
                TokenKind::Less,
                TokenKind::Equal,
                TokenKind::Assign,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_locations_are_one_based() {
        let tokens = Lexer::new("int\n  foo").tokenize().unwrap();
        assert_eq!(tokens[0].location, SourceLocation::new(1, 1));
        assert_eq!(tokens[1].location, SourceLocation::new(2, 3));
        assert_eq!(tokens[1].lexeme, "foo");
    }

    #[test]
    fn test_line_comment_skipped() {
        assert_eq!(
            kinds("1 // comment ; with tokens\n2"),
            vec![TokenKind::Integer, TokenKind::Integer, TokenKind::Eof]
        );
    }

    #[test]
    fn test_unexpected_character() {
        let err = Lexer::new("int @").tokenize().unwrap_err();
        assert_eq!(err.location, SourceLocation::new(1, 5));
    }
}
