//! Statement parsing
//!
//! ```text
//! scope       ::= "{" var_decl* "}" | var_decl
//! return_stmt ::= "return" expr? ";" | expr_stmt
//! expr_stmt   ::= expr ";"
//! ```
//!
//! A braced scope groups zero or more declarations; an unbraced single
//! declaration is permitted as a scope shorthand, which is how function
//! bodies and nested groupings are parsed uniformly.

use tracing::instrument;

use crate::parser::ast::Statement;
use crate::parser::lexer::TokenKind;
use crate::parser::parse::Parser;

impl Parser {
    /// `scope := '{' var_decl* '}' | var_decl`
    #[instrument(skip_all)]
    pub(crate) fn scope(&mut self) -> Option<Statement> {
        if self.accept(TokenKind::LBrace) {
            let token = self.previous().clone();

            let mut statements = Vec::new();
            while let Some(statement) = self.var_decl() {
                statements.push(statement);
            }

            if self.accept(TokenKind::RBrace) {
                return Some(Statement::Scope { token, statements });
            }
            self.expected("'}'");
            return None;
        }

        self.var_decl()
    }

    /// `return_stmt := 'return' expr? ';' | expr_stmt`
    pub(crate) fn return_stmt(&mut self) -> Option<Statement> {
        if self.accept(TokenKind::Return) {
            let token = self.previous().clone();

            // Bare `return;` is valid, so a failed expression is not an
            // error by itself.
            let value = self.expr();

            if self.accept(TokenKind::Semicolon) {
                return Some(Statement::ReturnStatement { token, value });
            }
            self.expected("';'");
            return None;
        }

        self.expr_stmt()
    }

    /// `expr_stmt := expr ';'`
    pub(crate) fn expr_stmt(&mut self) -> Option<Statement> {
        let expr = self.expr()?;
        let token = expr.token().clone();

        if self.accept(TokenKind::Semicolon) {
            return Some(Statement::ExpressionStatement { token, expr });
        }
        self.expected("';'");
        None
    }
}
