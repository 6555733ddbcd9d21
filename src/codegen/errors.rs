//! Code generation error types
//!
//! Unlike parse diagnostics, which accumulate, code generation stops at the
//! first error: partial backend emission has no defined recovery.

use std::fmt;

use crate::parser::ast::operator_symbol;
use crate::parser::lexer::{SourceLocation, Token, TokenKind};

/// Errors raised while lowering an AST to backend instructions.
#[derive(Debug, Clone)]
pub enum CodegenError {
    /// A binary or unary operator with no lowering reached code generation.
    UnsupportedOperator { op: TokenKind, token: Token },

    /// A call whose callee does not resolve to a declared function.
    NotCallable { token: Token },

    /// An array length that is not a compile-time integer constant.
    ConstantEvaluation { message: String, token: Token },

    /// An identifier in value position; name binding is not implemented.
    UnboundIdentifier { name: String, token: Token },

    /// A primitive type name the backend has no mapping for.
    UnknownType { name: String, token: Token },

    /// A grammatically valid form with no lowering.
    UnsupportedConstruct { message: String, token: Token },
}

impl CodegenError {
    /// Source location of the offending construct.
    pub fn location(&self) -> SourceLocation {
        match self {
            CodegenError::UnsupportedOperator { token, .. }
            | CodegenError::NotCallable { token }
            | CodegenError::ConstantEvaluation { token, .. }
            | CodegenError::UnboundIdentifier { token, .. }
            | CodegenError::UnknownType { token, .. }
            | CodegenError::UnsupportedConstruct { token, .. } => token.location,
        }
    }
}

impl fmt::Display for CodegenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodegenError::UnsupportedOperator { op, token } => {
                write!(
                    f,
                    "Operator '{}' is not supported at {}",
                    operator_symbol(*op),
                    token.location
                )
            }
            CodegenError::NotCallable { token } => {
                write!(
                    f,
                    "Expected callable function expression at {}",
                    token.location
                )
            }
            CodegenError::ConstantEvaluation { message, token } => {
                write!(f, "{} at {}", message, token.location)
            }
            CodegenError::UnboundIdentifier { name, token } => {
                write!(
                    f,
                    "Identifier \"{}\" cannot be resolved to a value at {}",
                    name, token.location
                )
            }
            CodegenError::UnknownType { name, token } => {
                write!(
                    f,
                    "Type \"{}\" has no backend representation at {}",
                    name, token.location
                )
            }
            CodegenError::UnsupportedConstruct { message, token } => {
                write!(f, "{} at {}", message, token.location)
            }
        }
    }
}

impl std::error::Error for CodegenError {}
