//! Statement lowering
//!
//! Scopes and blocks lower their children in source order. A function
//! declaration declares its backend function exactly once: the declared
//! function id is memoized on the node, so lowering the same tree again
//! refreshes the call table without re-declaring or re-lowering the body.

use tracing::{instrument, trace};

use crate::codegen::errors::CodegenError;
use crate::codegen::Codegen;
use crate::parser::ast::{FunctionDeclaration, Statement};

impl Codegen<'_> {
    /// Lower a statement, emitting instructions at the builder cursor.
    #[instrument(skip_all)]
    pub fn gen_statement(&mut self, statement: &Statement) -> Result<(), CodegenError> {
        match statement {
            Statement::Block { statements, .. } | Statement::Scope { statements, .. } => {
                for statement in statements {
                    self.gen_statement(statement)?;
                }
                Ok(())
            }

            Statement::ExpressionStatement { token, expr } => {
                self.require_insert_point(token, "Expression statement")?;
                self.gen_expression(expr)?;
                Ok(())
            }

            Statement::ReturnStatement { token, value } => {
                self.require_insert_point(token, "Return")?;
                match value {
                    Some(expr) => {
                        let value = self.gen_expression(expr)?;
                        self.builder.build_return(Some(value));
                    }
                    None => self.builder.build_return(None),
                }
                Ok(())
            }

            Statement::VariableDeclaration {
                token,
                ty,
                initializer,
                ..
            } => {
                self.resolve_type(ty)?;
                if let Some(expr) = initializer {
                    self.require_insert_point(token, "Variable initializer")?;
                    self.gen_expression(expr)?;
                }
                Ok(())
            }

            Statement::FunctionDeclaration(func) => self.gen_function(func),
        }
    }

    fn gen_function(&mut self, func: &FunctionDeclaration) -> Result<(), CodegenError> {
        if let Some(id) = func.backend_fn() {
            // Already lowered: make it callable again, nothing to re-emit.
            self.functions.entry(func.name.clone()).or_insert(id);
            return Ok(());
        }

        trace!("lowering function {}", func.name);

        let ret = self.resolve_type(&func.return_type)?;
        let mut params = Vec::with_capacity(func.parameters.len());
        for param in &func.parameters {
            params.push(self.resolve_type(&param.ty)?);
        }

        let id = self.builder.declare_function(&func.name, ret, params);
        let _ = func.backend_fn.set(id);
        self.functions.insert(func.name.clone(), id);

        let entry = self.builder.append_block(id, "entry");
        self.builder.position_at_end(id, entry);

        self.gen_statement(&func.body)
    }
}
