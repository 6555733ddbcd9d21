//! Expression lowering
//!
//! Operands are always emitted left-to-right before their instruction, so
//! source order is instruction order. Only `+ - * /` have lowerings;
//! division is a signed divide regardless of operand types, and the prefix
//! sign lowers to a multiply by the constant 1 or -1 with the operand
//! emitted first. Anything else is an explicit error, never a placeholder
//! value.

use crate::backend::{FunctionId, ValueId};
use crate::codegen::errors::CodegenError;
use crate::codegen::Codegen;
use crate::parser::ast::Expression;
use crate::parser::lexer::{Token, TokenKind};

impl Codegen<'_> {
    /// Lower an expression and return the backend value it produces.
    pub fn gen_expression(&mut self, expr: &Expression) -> Result<ValueId, CodegenError> {
        match expr {
            Expression::IntegerLiteral { value, .. } => Ok(self.builder.const_int32(*value)),

            Expression::Identifier { token, name } => Err(CodegenError::UnboundIdentifier {
                name: name.clone(),
                token: token.clone(),
            }),

            Expression::BinaryOperation {
                token,
                op,
                lhs,
                rhs,
            } => {
                let lhs_value = self.gen_expression(lhs)?;
                let rhs_value = self.gen_expression(rhs)?;

                match op {
                    TokenKind::Plus => Ok(self.builder.build_add(lhs_value, rhs_value)),
                    TokenKind::Minus => Ok(self.builder.build_sub(lhs_value, rhs_value)),
                    TokenKind::Multiply => Ok(self.builder.build_mul(lhs_value, rhs_value)),
                    TokenKind::Divide => Ok(self.builder.build_sdiv(lhs_value, rhs_value)),
                    _ => Err(CodegenError::UnsupportedOperator {
                        op: *op,
                        token: token.clone(),
                    }),
                }
            }

            Expression::UnaryOperation { token, op, rhs } => {
                let rhs_value = self.gen_expression(rhs)?;

                match op {
                    TokenKind::Plus => {
                        let one = self.builder.const_int32(1);
                        Ok(self.builder.build_mul(one, rhs_value))
                    }
                    TokenKind::Minus => {
                        let minus_one = self.builder.const_int32(-1);
                        Ok(self.builder.build_mul(minus_one, rhs_value))
                    }
                    _ => Err(CodegenError::UnsupportedOperator {
                        op: *op,
                        token: token.clone(),
                    }),
                }
            }

            Expression::FunctionCall {
                token,
                callee,
                args,
            } => {
                let function = self.resolve_callee(callee, token)?;

                let mut arg_values = Vec::with_capacity(args.len());
                for arg in args {
                    arg_values.push(self.gen_expression(arg)?);
                }

                Ok(self.builder.build_call(function, arg_values))
            }
        }
    }

    /// A callee is callable only if it is an identifier naming a declared
    /// function.
    fn resolve_callee(
        &self,
        callee: &Expression,
        call_token: &Token,
    ) -> Result<FunctionId, CodegenError> {
        if let Expression::Identifier { name, .. } = callee {
            if let Some(&id) = self.functions.get(name) {
                return Ok(id);
            }
        }
        Err(CodegenError::NotCallable {
            token: call_token.clone(),
        })
    }
}
