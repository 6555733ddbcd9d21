//! Main parser coordinator
//!
//! This module provides the [`Parser`] struct and core parsing
//! infrastructure: the cursor helpers, diagnostic accumulation, and the
//! top-level `block` production.
//!
//! # Parser Architecture
//!
//! The Parser uses recursive descent with the following organization:
//! - This module: Parser struct, helpers, and the parse entry point
//! - `declarations`: variable/function declarations and the type grammar
//! - `statements`: scopes, return statements, expression statements
//! - `expressions`: the expression precedence ladder
//!
//! Parser methods are split across multiple files using `impl Parser`
//! blocks, so each module extends the Parser with related productions while
//! sharing the same cursor and diagnostics.
//!
//! # Failure semantics
//!
//! Productions return `Option`: `None` means the production did not match
//! or could not complete. Errors are accumulated, not thrown; a production
//! that has committed (consumed its first distinguishing token) records an
//! [`Error`] before failing, and the overall parse fails if any error was
//! raised anywhere in the session.

use tracing::{instrument, trace};

use crate::parser::ast::Statement;
use crate::parser::diagnostics::{Diagnostics, Error, Warning};
use crate::parser::lexer::{SourceLocation, Token, TokenKind};

/// Recursive descent parser over a token stream.
pub struct Parser {
    pub(crate) tokens: Vec<Token>,
    pub(crate) position: usize,
    pub(crate) diagnostics: Diagnostics,
}

/// Parse a token stream into a root [`Statement::Block`].
///
/// Convenience wrapper over [`Parser`]; warnings raised by a successful
/// parse are dropped here, use [`Parser`] directly to inspect them.
pub fn parse(tokens: Vec<Token>) -> Result<Statement, Diagnostics> {
    let mut parser = Parser::new(tokens);
    match parser.parse() {
        Some(root) => Ok(root),
        None => Err(parser.into_diagnostics()),
    }
}

impl Parser {
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if tokens.last().map(|t| t.kind) != Some(TokenKind::Eof) {
            let location = tokens
                .last()
                .map(|t| t.location)
                .unwrap_or_else(|| SourceLocation::new(1, 1));
            tokens.push(Token::new(TokenKind::Eof, "", location));
        }
        Self {
            tokens,
            position: 0,
            diagnostics: Diagnostics::new(),
        }
    }

    /// Parse the whole stream.
    ///
    /// Returns the root block only if the entire input was consumed and no
    /// error was raised; otherwise the accumulated diagnostics describe the
    /// failure.
    #[instrument(skip_all)]
    pub fn parse(&mut self) -> Option<Statement> {
        trace!("Parser::parse()");
        self.block()
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Diagnostics {
        self.diagnostics
    }

    /// `block := scope*`, then the stream must be exhausted.
    pub(crate) fn block(&mut self) -> Option<Statement> {
        let mut statements = Vec::new();

        while let Some(statement) = self.scope() {
            statements.push(statement);
        }

        if !self.diagnostics.has_errors() && !self.at_end() {
            self.error_at_current(format!("Unexpected {}", self.current()));
        }

        if self.diagnostics.has_errors() {
            return None;
        }

        let token = statements
            .first()
            .map(|s| s.token().clone())
            .unwrap_or_else(|| self.current().clone());

        Some(Statement::Block { token, statements })
    }

    // ===== Cursor helpers =====

    pub(crate) fn current(&self) -> &Token {
        &self.tokens[self.position]
    }

    pub(crate) fn previous(&self) -> &Token {
        &self.tokens[self.position - 1]
    }

    /// One-token lookahead past the current token.
    pub(crate) fn peek_next(&self) -> &Token {
        match self.tokens.get(self.position + 1) {
            Some(token) => token,
            None => &self.tokens[self.tokens.len() - 1],
        }
    }

    pub(crate) fn at_end(&self) -> bool {
        self.current().kind == TokenKind::Eof
    }

    /// Advance over the current token only if it has the requested kind.
    ///
    /// On a match the consumed token is available via [`Parser::previous`].
    pub(crate) fn accept(&mut self, kind: TokenKind) -> bool {
        if self.current().kind == kind {
            if !self.at_end() {
                self.position += 1;
            }
            true
        } else {
            false
        }
    }

    // ===== Diagnostic helpers =====

    pub(crate) fn error_at_current(&mut self, message: impl Into<String>) {
        let token = self.current().clone();
        self.diagnostics.add_error(Error::new(token, message));
    }

    /// Record an `Expected X, but got "..."` error at the current token.
    pub(crate) fn expected(&mut self, what: &str) {
        let message = format!("Expected {}, but got {}", what, self.current());
        self.error_at_current(message);
    }

    pub(crate) fn warn(&mut self, token: Token, message: impl Into<String>) {
        self.diagnostics.add_warning(Warning::new(token, message));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::lexer::Lexer;

    fn tokens(source: &str) -> Vec<Token> {
        Lexer::new(source).tokenize().expect("lexing failed")
    }

    #[test]
    fn test_accept_advances_only_on_match() {
        let mut parser = Parser::new(tokens("int x"));
        assert!(!parser.accept(TokenKind::Identifier));
        assert_eq!(parser.position, 0);
        assert!(parser.accept(TokenKind::Int));
        assert_eq!(parser.previous().kind, TokenKind::Int);
        assert!(parser.accept(TokenKind::Identifier));
        assert_eq!(parser.previous().lexeme, "x");
    }

    #[test]
    fn test_peek_next_saturates_at_eof() {
        let parser = Parser::new(tokens("x"));
        assert_eq!(parser.peek_next().kind, TokenKind::Eof);
        let empty = Parser::new(Vec::new());
        assert_eq!(empty.current().kind, TokenKind::Eof);
        assert_eq!(empty.peek_next().kind, TokenKind::Eof);
    }

    #[test]
    fn test_empty_stream_parses_to_empty_block() {
        let root = parse(tokens("")).expect("empty input should parse");
        match root {
            Statement::Block { statements, .. } => assert!(statements.is_empty()),
            other => panic!("expected block, got {:?}", other),
        }
    }

    #[test]
    fn test_trailing_garbage_fails() {
        let diagnostics = parse(tokens("int x ; }")).unwrap_err();
        assert_eq!(diagnostics.error_count(), 1);
        assert_eq!(diagnostics.errors()[0].token.lexeme, "}");
    }
}
