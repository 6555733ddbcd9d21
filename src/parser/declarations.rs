//! Declaration parsing
//!
//! Handles type-prefixed declarations and the type grammar:
//!
//! ```text
//! var_decl       ::= type identifier ( ";" | "=" expr ";" | "(" func_decl_tail )
//! func_decl_tail ::= ( param ( "," param )* | "void" )? ")" scope
//! param          ::= type identifier?
//! type           ::= reference_type ( "[" expr "]" )*
//! reference_type ::= simple_type "&"?
//! simple_type    ::= ("unsigned" | "signed") "int"? | "int" | "void"
//! ```
//!
//! A declaration is told apart from a function by one token of lookahead
//! after the identifier: an `(` commits to the function form. If no type
//! matches at all, `var_decl` falls through to `return_stmt`.
//!
//! Only `int` (optionally `unsigned`/`signed`, defaulting to `int` when the
//! size keyword is omitted) and `void` are supported; `char`, `short` and
//! `long` are recognized and rejected with an explicit error.

use tracing::{instrument, trace};

use crate::parser::ast::{FunctionDeclaration, Parameter, Statement, Type};
use crate::parser::diagnostics::Error;
use crate::parser::lexer::{Token, TokenKind};
use crate::parser::parse::Parser;

impl Parser {
    /// `var_decl := type identifier ( ';' | '=' expr ';' | '(' func_decl_tail )`
    #[instrument(skip_all)]
    pub(crate) fn var_decl(&mut self) -> Option<Statement> {
        let errors_before = self.diagnostics.error_count();
        let ty = match self.type_expr() {
            Some(ty) => ty,
            None => {
                // A committed type failure (unsupported size keyword) must
                // not fall through to the statement alternatives.
                if self.diagnostics.error_count() > errors_before {
                    return None;
                }
                return self.return_stmt();
            }
        };
        let start = ty.token().clone();

        // LL(1) disambiguation: identifier followed by '(' is a function.
        if self.current().kind == TokenKind::Identifier
            && self.peek_next().kind == TokenKind::LParen
        {
            self.accept(TokenKind::Identifier);
            let name = self.previous().lexeme.clone();
            self.accept(TokenKind::LParen);
            return self.func_decl(start, ty, name);
        }

        if self.accept(TokenKind::Identifier) {
            let name = self.previous().lexeme.clone();

            if self.accept(TokenKind::Assign) {
                let Some(initializer) = self.expr() else {
                    self.expected("expression");
                    return None;
                };
                if self.accept(TokenKind::Semicolon) {
                    return Some(Statement::VariableDeclaration {
                        token: start,
                        ty,
                        name,
                        initializer: Some(initializer),
                    });
                }
                self.expected("';'");
                return None;
            }

            if self.accept(TokenKind::Semicolon) {
                return Some(Statement::VariableDeclaration {
                    token: start,
                    ty,
                    name,
                    initializer: None,
                });
            }

            self.expected("';', '=' or '('");
            return None;
        }

        self.expected("identifier");
        None
    }

    /// Parameter list and body after `type identifier (` has been consumed.
    ///
    /// `void` alone denotes zero parameters and forbids any further
    /// parameter. A parameter without a name is recorded with `name: None`
    /// and raises a warning.
    #[instrument(skip_all)]
    pub(crate) fn func_decl(
        &mut self,
        start: Token,
        return_type: Type,
        name: String,
    ) -> Option<Statement> {
        trace!("function declaration: {}", name);
        let mut parameters = Vec::new();

        loop {
            let errors_before = self.diagnostics.error_count();
            if let Some(param_ty) = self.type_expr() {
                if param_ty.token().kind == TokenKind::Void {
                    if self.accept(TokenKind::RParen) {
                        break;
                    }
                    self.error_at_current("Unexpected additional parameter in void parameter list");
                    return None;
                }

                let param_token = param_ty.token().clone();
                if self.accept(TokenKind::Identifier) {
                    let param_name = self.previous().lexeme.clone();
                    parameters.push(Parameter {
                        token: param_token,
                        ty: param_ty,
                        name: Some(param_name),
                    });
                } else {
                    self.warn(param_token.clone(), "Parameter has no name");
                    parameters.push(Parameter {
                        token: param_token,
                        ty: param_ty,
                        name: None,
                    });
                }

                if self.accept(TokenKind::Comma) {
                    continue;
                }
                if self.accept(TokenKind::RParen) {
                    break;
                }
                self.expected("',' or ')'");
                return None;
            } else if self.diagnostics.error_count() > errors_before {
                return None;
            } else if self.accept(TokenKind::RParen) {
                break;
            } else {
                self.error_at_current(format!("Unexpected {}", self.current()));
                return None;
            }
        }

        let Some(body) = self.scope() else {
            self.expected("function body");
            return None;
        };

        Some(Statement::FunctionDeclaration(FunctionDeclaration::new(
            start,
            return_type,
            name,
            parameters,
            Box::new(body),
        )))
    }

    // ===== Type grammar =====

    /// `type := reference_type ('[' expr ']')*`
    pub(crate) fn type_expr(&mut self) -> Option<Type> {
        let mut ty = self.reference_type()?;
        let start = ty.token().clone();

        while self.accept(TokenKind::LBracket) {
            let Some(length) = self.expr() else {
                self.expected("expression");
                return None;
            };
            if !self.accept(TokenKind::RBracket) {
                self.expected("']'");
                return None;
            }
            // T[a][b] wraps left-to-right: StaticArray(StaticArray(T, a), b)
            ty = Type::StaticArray {
                token: start.clone(),
                element: Box::new(ty),
                length,
            };
        }

        Some(ty)
    }

    /// `reference_type := simple_type '&'?` — a single reference level only.
    fn reference_type(&mut self) -> Option<Type> {
        let ty = self.simple_type()?;

        if self.accept(TokenKind::BitAnd) {
            let token = ty.token().clone();
            return Some(Type::LValueReference {
                token,
                referent: Box::new(ty),
            });
        }

        Some(ty)
    }

    fn simple_type(&mut self) -> Option<Type> {
        if self.accept(TokenKind::Unsigned) {
            return self.sized_integer(true);
        }
        if self.accept(TokenKind::Signed) {
            return self.sized_integer(false);
        }

        if self.accept(TokenKind::Char)
            || self.accept(TokenKind::Short)
            || self.accept(TokenKind::Long)
        {
            let token = self.previous().clone();
            let message = format!("Type \"{}\" is not supported", token.lexeme);
            self.diagnostics.add_error(Error::new(token, message));
            return None;
        }

        if self.accept(TokenKind::Int) {
            let token = self.previous().clone();
            return Some(Type::SimpleType {
                token,
                identifier: "int".to_string(),
                is_unsigned: false,
            });
        }

        if self.accept(TokenKind::Void) {
            let token = self.previous().clone();
            return Some(Type::SimpleType {
                token,
                identifier: "void".to_string(),
                is_unsigned: false,
            });
        }

        None
    }

    /// Size keyword after `unsigned`/`signed`; a missing keyword defaults
    /// to `int`.
    fn sized_integer(&mut self, is_unsigned: bool) -> Option<Type> {
        let start = self.previous().clone();

        if self.accept(TokenKind::Char)
            || self.accept(TokenKind::Short)
            || self.accept(TokenKind::Long)
        {
            let size = self.previous().clone();
            let message = format!(
                "Type \"{} {}\" is not supported",
                start.lexeme, size.lexeme
            );
            self.diagnostics.add_error(Error::new(size, message));
            return None;
        }

        self.accept(TokenKind::Int);

        Some(Type::SimpleType {
            token: start,
            identifier: "int".to_string(),
            is_unsigned,
        })
    }
}
