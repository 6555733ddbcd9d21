//! Code generation: lowering the AST into backend instructions
//!
//! The [`Codegen`] context owns the emission state: a mutable handle to the
//! backend [`Builder`] (whose insertion cursor is shared by every emitted
//! instruction) and the table of declared functions. Nodes are lowered in
//! the exact order they appear; the driver that owns the builder decides
//! which roots to lower and in what order.
//!
//! Lowering is split across:
//! - [`statements`]: statement and declaration lowering
//! - [`expressions`]: expression lowering and callee resolution
//! - [`types`]: type resolution and the constant-expression evaluator
//! - [`errors`]: the [`CodegenError`] type

pub mod errors;
pub mod expressions;
pub mod statements;
pub mod types;

use rustc_hash::FxHashMap;

use crate::backend::{Builder, FunctionId};
use crate::parser::lexer::Token;
use errors::CodegenError;

/// Emission context threaded through every lowering call.
pub struct Codegen<'b> {
    pub(crate) builder: &'b mut Builder,
    pub(crate) functions: FxHashMap<String, FunctionId>,
}

impl<'b> Codegen<'b> {
    pub fn new(builder: &'b mut Builder) -> Self {
        Self {
            builder,
            functions: FxHashMap::default(),
        }
    }

    /// Fail with [`CodegenError::UnsupportedConstruct`] unless the builder
    /// cursor is positioned inside a function body.
    pub(crate) fn require_insert_point(
        &self,
        token: &Token,
        what: &str,
    ) -> Result<(), CodegenError> {
        if self.builder.has_insert_point() {
            Ok(())
        } else {
            Err(CodegenError::UnsupportedConstruct {
                message: format!("{} outside a function body is not supported", what),
                token: token.clone(),
            })
        }
    }
}
