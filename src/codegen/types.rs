//! Type resolution and constant-expression evaluation
//!
//! A [`Type`] resolves to its backend representation. Static array lengths
//! are arbitrary expressions at parse time; here they must fold to a
//! compile-time integer constant through the minimal evaluator below
//! (integer literals and the language's arithmetic only).

use crate::backend::BackendType;
use crate::codegen::errors::CodegenError;
use crate::codegen::Codegen;
use crate::parser::ast::{operator_symbol, Expression, Type};
use crate::parser::lexer::{Token, TokenKind};

impl Codegen<'_> {
    /// Resolve a type expression to its backend type.
    pub fn resolve_type(&self, ty: &Type) -> Result<BackendType, CodegenError> {
        match ty {
            Type::SimpleType {
                token,
                identifier,
                is_unsigned,
            } => BackendType::from_primitive(identifier, *is_unsigned).ok_or_else(|| {
                CodegenError::UnknownType {
                    name: identifier.clone(),
                    token: token.clone(),
                }
            }),

            Type::StaticArray {
                element, length, ..
            } => {
                let element = self.resolve_type(element)?;
                let value = eval_const_int(length)?;
                if value < 0 {
                    return Err(constant_error(
                        length.token(),
                        "Array length must be non-negative",
                    ));
                }
                Ok(BackendType::Array {
                    element: Box::new(element),
                    length: value as u64,
                })
            }

            Type::LValueReference { referent, .. } => Ok(BackendType::Reference(Box::new(
                self.resolve_type(referent)?,
            ))),
        }
    }
}

fn constant_error(token: &Token, message: impl Into<String>) -> CodegenError {
    CodegenError::ConstantEvaluation {
        message: message.into(),
        token: token.clone(),
    }
}

/// Fold an expression to a compile-time integer constant.
///
/// Supports integer literals, prefix sign, and `+ - * /` with checked
/// arithmetic; everything else is a [`CodegenError::ConstantEvaluation`].
pub fn eval_const_int(expr: &Expression) -> Result<i64, CodegenError> {
    match expr {
        Expression::IntegerLiteral { value, .. } => Ok(i64::from(*value)),

        Expression::UnaryOperation { token, op, rhs } => {
            let value = eval_const_int(rhs)?;
            match op {
                TokenKind::Plus => Ok(value),
                TokenKind::Minus => value
                    .checked_neg()
                    .ok_or_else(|| constant_error(token, "Constant expression overflows")),
                _ => Err(constant_error(
                    token,
                    format!(
                        "Operator '{}' is not a constant operation",
                        operator_symbol(*op)
                    ),
                )),
            }
        }

        Expression::BinaryOperation {
            token,
            op,
            lhs,
            rhs,
        } => {
            let lhs = eval_const_int(lhs)?;
            let rhs = eval_const_int(rhs)?;
            let result = match op {
                TokenKind::Plus => lhs.checked_add(rhs),
                TokenKind::Minus => lhs.checked_sub(rhs),
                TokenKind::Multiply => lhs.checked_mul(rhs),
                TokenKind::Divide => {
                    if rhs == 0 {
                        return Err(constant_error(
                            token,
                            "Division by zero in constant expression",
                        ));
                    }
                    lhs.checked_div(rhs)
                }
                _ => {
                    return Err(constant_error(
                        token,
                        format!(
                            "Operator '{}' is not a constant operation",
                            operator_symbol(*op)
                        ),
                    ))
                }
            };
            result.ok_or_else(|| constant_error(token, "Constant expression overflows"))
        }

        Expression::Identifier { token, name } => Err(constant_error(
            token,
            format!("\"{}\" is not a compile-time constant", name),
        )),

        Expression::FunctionCall { token, .. } => Err(constant_error(
            token,
            "Function call is not a compile-time constant",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::lexer::{Lexer, SourceLocation};
    use crate::parser::parse::Parser;

    fn parse_expr(source: &str) -> Expression {
        let tokens = Lexer::new(source).tokenize().expect("lexing failed");
        let mut parser = Parser::new(tokens);
        parser.expr().expect("expression should parse")
    }

    #[test]
    fn test_literal_and_arithmetic_fold() {
        assert_eq!(eval_const_int(&parse_expr("5")).unwrap(), 5);
        assert_eq!(eval_const_int(&parse_expr("2 + 3 * 4")).unwrap(), 14);
        assert_eq!(eval_const_int(&parse_expr("10 / 2 - 1")).unwrap(), 4);
        assert_eq!(eval_const_int(&parse_expr("-3")).unwrap(), -3);
        assert_eq!(eval_const_int(&parse_expr("+7")).unwrap(), 7);
    }

    #[test]
    fn test_division_by_zero_is_an_error() {
        let err = eval_const_int(&parse_expr("1 / 0")).unwrap_err();
        assert!(matches!(err, CodegenError::ConstantEvaluation { .. }));
    }

    #[test]
    fn test_identifier_is_not_constant() {
        let err = eval_const_int(&parse_expr("n")).unwrap_err();
        match err {
            CodegenError::ConstantEvaluation { token, .. } => {
                assert_eq!(token.lexeme, "n");
                assert_eq!(token.location, SourceLocation::new(1, 1));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_assignment_is_not_constant() {
        let err = eval_const_int(&parse_expr("1 = 2")).unwrap_err();
        assert!(matches!(err, CodegenError::ConstantEvaluation { .. }));
    }
}
