//! Expression parsing
//!
//! Precedence is encoded by rule nesting, tightest binding innermost:
//!
//! ```text
//! expr      ::= assign
//! assign    ::= addsub ( "=" addsub )*          (right-associative)
//! addsub    ::= muldiv ( ("+" | "-") muldiv )*  (left-associative)
//! muldiv    ::= unary ( ("*" | "/") unary )*    (left-associative)
//! unary     ::= ("+" | "-") func_call | func_call
//! func_call ::= paren ( "(" arg_list? ")" )*
//! paren     ::= "(" expr ")" | atom
//! atom      ::= integer_literal | identifier
//! ```
//!
//! A prefix sign applies at most once per call site: its operand is a
//! `func_call`, not another `unary`, so `- -x` does not parse. This is
//! defined language behavior, not an implementation accident.

use tracing::instrument;

use crate::parser::ast::Expression;
use crate::parser::diagnostics::Error;
use crate::parser::lexer::TokenKind;
use crate::parser::parse::Parser;

impl Parser {
    /// `expr := assign`
    #[instrument(skip_all)]
    pub(crate) fn expr(&mut self) -> Option<Expression> {
        self.assign()
    }

    /// Operands are collected left-to-right, then folded right-to-left so
    /// `a = b = c` becomes `a = (b = c)`. Every folded node carries the
    /// first operand's start token.
    fn assign(&mut self) -> Option<Expression> {
        let first = self.addsub()?;
        let start = first.token().clone();

        let mut operands = vec![first];
        while self.accept(TokenKind::Assign) {
            let Some(rhs) = self.addsub() else {
                self.expected("expression");
                return None;
            };
            operands.push(rhs);
        }

        let mut result = operands.pop()?;
        for operand in operands.into_iter().rev() {
            result = Expression::BinaryOperation {
                token: start.clone(),
                op: TokenKind::Assign,
                lhs: Box::new(operand),
                rhs: Box::new(result),
            };
        }

        Some(result)
    }

    fn addsub(&mut self) -> Option<Expression> {
        let mut lhs = self.muldiv()?;
        let start = lhs.token().clone();

        while self.accept(TokenKind::Plus) || self.accept(TokenKind::Minus) {
            let op = self.previous().kind;
            let Some(rhs) = self.muldiv() else {
                self.expected("expression");
                return None;
            };
            lhs = Expression::BinaryOperation {
                token: start.clone(),
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }

        Some(lhs)
    }

    fn muldiv(&mut self) -> Option<Expression> {
        let mut lhs = self.unary()?;
        let start = lhs.token().clone();

        while self.accept(TokenKind::Multiply) || self.accept(TokenKind::Divide) {
            let op = self.previous().kind;
            let Some(rhs) = self.unary() else {
                self.expected("expression");
                return None;
            };
            lhs = Expression::BinaryOperation {
                token: start.clone(),
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }

        Some(lhs)
    }

    /// `unary := ('+'|'-') func_call | func_call`
    fn unary(&mut self) -> Option<Expression> {
        if self.accept(TokenKind::Plus) || self.accept(TokenKind::Minus) {
            let token = self.previous().clone();
            let op = token.kind;
            let Some(rhs) = self.func_call() else {
                self.expected("expression");
                return None;
            };
            return Some(Expression::UnaryOperation {
                token,
                op,
                rhs: Box::new(rhs),
            });
        }

        self.func_call()
    }

    /// `func_call := paren ('(' arg_list? ')')*` — postfix and
    /// left-associative, so `f()()` calls the result of `f()`.
    fn func_call(&mut self) -> Option<Expression> {
        let mut callee = self.paren()?;
        let start = callee.token().clone();

        while self.accept(TokenKind::LParen) {
            let mut args = Vec::new();
            loop {
                if let Some(arg) = self.expr() {
                    args.push(arg);
                    if self.accept(TokenKind::RParen) {
                        break;
                    }
                    if self.accept(TokenKind::Comma) {
                        continue;
                    }
                    self.expected("',' or ')'");
                    return None;
                }
                if self.accept(TokenKind::RParen) {
                    break;
                }
                self.expected("expression or ')'");
                return None;
            }

            callee = Expression::FunctionCall {
                token: start.clone(),
                callee: Box::new(callee),
                args,
            };
        }

        Some(callee)
    }

    /// `paren := '(' expr ')' | atom`
    fn paren(&mut self) -> Option<Expression> {
        if self.accept(TokenKind::LParen) {
            let Some(expression) = self.expr() else {
                self.expected("expression");
                return None;
            };
            if self.accept(TokenKind::RParen) {
                return Some(expression);
            }
            self.expected("')'");
            return None;
        }

        self.atom()
    }

    fn atom(&mut self) -> Option<Expression> {
        self.number().or_else(|| self.identifier())
    }

    fn number(&mut self) -> Option<Expression> {
        if !self.accept(TokenKind::Integer) {
            return None;
        }
        let token = self.previous().clone();
        match token.lexeme.parse::<i32>() {
            Ok(value) => Some(Expression::IntegerLiteral { token, value }),
            Err(_) => {
                self.diagnostics
                    .add_error(Error::new(token, "Integer literal out of range"));
                None
            }
        }
    }

    fn identifier(&mut self) -> Option<Expression> {
        if !self.accept(TokenKind::Identifier) {
            return None;
        }
        let token = self.previous().clone();
        let name = token.lexeme.clone();
        Some(Expression::Identifier { token, name })
    }
}
