//! AST (Abstract Syntax Tree) definitions for the Cinder front end
//!
//! Three closed node families: [`Expression`], [`Statement`], and [`Type`].
//! Every node owns its children and carries the [`Token`] at which the
//! construct began; the token is used only for diagnostics.
//!
//! Each family supports `tree_dump`, an indented structural rendering that
//! is stable across invocations so it can be compared in golden tests.

use std::cell::OnceCell;

use crate::backend::FunctionId;
use crate::parser::lexer::{Token, TokenKind};

/// Canonical printable form of an operator token kind.
///
/// Total over the operator kinds; every node that renders an operator goes
/// through this table. Non-operator kinds render as the empty string.
pub fn operator_symbol(kind: TokenKind) -> &'static str {
    match kind {
        TokenKind::Plus => "+",
        TokenKind::Increment => "++",
        TokenKind::PlusAssign => "+=",

        TokenKind::Minus => "-",
        TokenKind::Decrement => "--",
        TokenKind::MinusAssign => "-=",

        TokenKind::Multiply => "*",
        TokenKind::MultiplyAssign => "*=",

        TokenKind::Divide => "/",
        TokenKind::DivideAssign => "/=",

        TokenKind::Modulo => "%",
        TokenKind::ModuloAssign => "%=",

        TokenKind::Assign => "=",
        TokenKind::Equal => "==",
        TokenKind::NotEqual => "!=",
        TokenKind::Greater => ">",
        TokenKind::GreaterEqual => ">=",
        TokenKind::Less => "<",
        TokenKind::LessEqual => "<=",

        TokenKind::LogicalAnd => "&&",
        TokenKind::LogicalOr => "||",
        TokenKind::LogicalNot => "!",

        TokenKind::BitNot => "~",
        TokenKind::BitAnd => "&",
        TokenKind::BitAndAssign => "&=",
        TokenKind::BitOr => "|",
        TokenKind::BitOrAssign => "|=",
        TokenKind::BitXor => "^",
        TokenKind::BitXorAssign => "^=",
        TokenKind::ShiftLeft => "<<",
        TokenKind::ShiftLeftAssign => "<<=",
        TokenKind::ShiftRight => ">>",
        TokenKind::ShiftRightAssign => ">>=",

        TokenKind::Dot => ".",

        _ => "",
    }
}

fn tree_prefix(depth: usize) -> String {
    "  ".repeat(depth)
}

/// Expression nodes
#[derive(Debug, Clone)]
pub enum Expression {
    IntegerLiteral {
        token: Token,
        value: i32,
    },
    Identifier {
        token: Token,
        name: String,
    },
    BinaryOperation {
        token: Token,
        op: TokenKind,
        lhs: Box<Expression>,
        rhs: Box<Expression>,
    },
    UnaryOperation {
        token: Token,
        op: TokenKind,
        rhs: Box<Expression>,
    },
    FunctionCall {
        token: Token,
        callee: Box<Expression>,
        args: Vec<Expression>,
    },
}

impl Expression {
    /// The first token consumed while recognizing this construct.
    pub fn token(&self) -> &Token {
        match self {
            Expression::IntegerLiteral { token, .. }
            | Expression::Identifier { token, .. }
            | Expression::BinaryOperation { token, .. }
            | Expression::UnaryOperation { token, .. }
            | Expression::FunctionCall { token, .. } => token,
        }
    }

    /// Indented structural rendering of this subtree.
    pub fn tree_dump(&self, depth: usize) -> String {
        let p = tree_prefix(depth);
        match self {
            Expression::IntegerLiteral { value, .. } => {
                format!("{}IntegerLiteral({})", p, value)
            }
            Expression::Identifier { name, .. } => format!("{}Identifier({})", p, name),
            Expression::BinaryOperation { op, lhs, rhs, .. } => {
                let mut tree = format!("{}BinaryOperation({})\n", p, operator_symbol(*op));
                tree += &format!("{}lhs:\n", tree_prefix(depth + 1));
                tree += &lhs.tree_dump(depth + 2);
                tree += &format!("\n{}rhs:\n", tree_prefix(depth + 1));
                tree += &rhs.tree_dump(depth + 2);
                tree
            }
            Expression::UnaryOperation { op, rhs, .. } => {
                format!(
                    "{}UnaryOperation({})\n{}",
                    p,
                    operator_symbol(*op),
                    rhs.tree_dump(depth + 1)
                )
            }
            Expression::FunctionCall { callee, args, .. } => {
                let mut tree = format!("{}FunctionCall\n", p);
                tree += &format!("{}callee:\n", tree_prefix(depth + 1));
                tree += &callee.tree_dump(depth + 2);
                tree += &format!("\n{}args:", tree_prefix(depth + 1));
                for arg in args {
                    tree.push('\n');
                    tree += &arg.tree_dump(depth + 2);
                }
                tree
            }
        }
    }
}

/// A single function parameter: a type with an optional name.
#[derive(Debug, Clone)]
pub struct Parameter {
    pub token: Token,
    pub ty: Type,
    pub name: Option<String>,
}

/// A function declaration.
///
/// `backend_fn` memoizes the declared backend function so that running code
/// generation twice over the same tree does not re-declare it. It is the
/// only field of any node written after construction.
#[derive(Debug, Clone)]
pub struct FunctionDeclaration {
    pub token: Token,
    pub return_type: Type,
    pub name: String,
    pub parameters: Vec<Parameter>,
    pub body: Box<Statement>,
    pub(crate) backend_fn: OnceCell<FunctionId>,
}

impl FunctionDeclaration {
    pub fn new(
        token: Token,
        return_type: Type,
        name: String,
        parameters: Vec<Parameter>,
        body: Box<Statement>,
    ) -> Self {
        Self {
            token,
            return_type,
            name,
            parameters,
            body,
            backend_fn: OnceCell::new(),
        }
    }

    /// The backend function this declaration lowered to, if any yet.
    pub fn backend_fn(&self) -> Option<FunctionId> {
        self.backend_fn.get().copied()
    }
}

/// Statement nodes
#[derive(Debug, Clone)]
pub enum Statement {
    ExpressionStatement {
        token: Token,
        expr: Expression,
    },
    ReturnStatement {
        token: Token,
        value: Option<Expression>,
    },
    VariableDeclaration {
        token: Token,
        ty: Type,
        name: String,
        initializer: Option<Expression>,
    },
    FunctionDeclaration(FunctionDeclaration),
    /// A braced group of declarations.
    Scope {
        token: Token,
        statements: Vec<Statement>,
    },
    /// The top-level sequence produced by a successful parse.
    Block {
        token: Token,
        statements: Vec<Statement>,
    },
}

impl Statement {
    /// The first token consumed while recognizing this construct.
    pub fn token(&self) -> &Token {
        match self {
            Statement::ExpressionStatement { token, .. }
            | Statement::ReturnStatement { token, .. }
            | Statement::VariableDeclaration { token, .. }
            | Statement::Scope { token, .. }
            | Statement::Block { token, .. } => token,
            Statement::FunctionDeclaration(func) => &func.token,
        }
    }

    /// Indented structural rendering of this subtree.
    pub fn tree_dump(&self, depth: usize) -> String {
        let p = tree_prefix(depth);
        match self {
            Statement::ExpressionStatement { expr, .. } => {
                format!("{}ExpressionStatement\n{}", p, expr.tree_dump(depth + 1))
            }
            Statement::ReturnStatement { value, .. } => match value {
                Some(expr) => format!("{}ReturnStatement\n{}", p, expr.tree_dump(depth + 1)),
                None => format!("{}ReturnStatement", p),
            },
            Statement::VariableDeclaration {
                ty,
                name,
                initializer,
                ..
            } => {
                let mut tree = format!("{}VariableDeclaration({})\n", p, name);
                tree += &format!("{}type:\n", tree_prefix(depth + 1));
                tree += &ty.tree_dump(depth + 2);
                if let Some(expr) = initializer {
                    tree += &format!("\n{}initializer:\n", tree_prefix(depth + 1));
                    tree += &expr.tree_dump(depth + 2);
                }
                tree
            }
            Statement::FunctionDeclaration(func) => {
                let mut tree = format!("{}FunctionDeclaration({})\n", p, func.name);
                tree += &format!("{}return_type:\n", tree_prefix(depth + 1));
                tree += &func.return_type.tree_dump(depth + 2);
                tree += &format!("\n{}parameters:", tree_prefix(depth + 1));
                for param in &func.parameters {
                    let name = param.name.as_deref().unwrap_or("_");
                    tree += &format!("\n{}parameter({}):\n", tree_prefix(depth + 2), name);
                    tree += &param.ty.tree_dump(depth + 3);
                }
                tree += &format!("\n{}body:\n", tree_prefix(depth + 1));
                tree += &func.body.tree_dump(depth + 2);
                tree
            }
            Statement::Scope { statements, .. } => {
                let mut tree = format!("{}Scope", p);
                for statement in statements {
                    tree.push('\n');
                    tree += &statement.tree_dump(depth + 1);
                }
                tree
            }
            Statement::Block { statements, .. } => {
                let mut tree = format!("{}Block", p);
                for statement in statements {
                    tree.push('\n');
                    tree += &statement.tree_dump(depth + 1);
                }
                tree
            }
        }
    }
}

/// Type expression nodes
#[derive(Debug, Clone)]
pub enum Type {
    SimpleType {
        token: Token,
        identifier: String,
        is_unsigned: bool,
    },
    StaticArray {
        token: Token,
        element: Box<Type>,
        /// Arbitrary expression at parse time; resolved to a constant
        /// during code generation.
        length: Expression,
    },
    LValueReference {
        token: Token,
        referent: Box<Type>,
    },
}

impl Type {
    /// The first token consumed while recognizing this construct.
    pub fn token(&self) -> &Token {
        match self {
            Type::SimpleType { token, .. }
            | Type::StaticArray { token, .. }
            | Type::LValueReference { token, .. } => token,
        }
    }

    /// Indented structural rendering of this subtree.
    pub fn tree_dump(&self, depth: usize) -> String {
        let p = tree_prefix(depth);
        match self {
            Type::SimpleType {
                identifier,
                is_unsigned,
                ..
            } => {
                if *is_unsigned {
                    format!("{}SimpleType(unsigned {})", p, identifier)
                } else {
                    format!("{}SimpleType({})", p, identifier)
                }
            }
            Type::StaticArray {
                element, length, ..
            } => {
                let mut tree = format!("{}StaticArray\n", p);
                tree += &format!("{}element:\n", tree_prefix(depth + 1));
                tree += &element.tree_dump(depth + 2);
                tree += &format!("\n{}length:\n", tree_prefix(depth + 1));
                tree += &length.tree_dump(depth + 2);
                tree
            }
            Type::LValueReference { referent, .. } => {
                format!("{}LValueReference\n{}", p, referent.tree_dump(depth + 1))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::lexer::SourceLocation;

    fn tok(kind: TokenKind, lexeme: &str) -> Token {
        Token::new(kind, lexeme, SourceLocation::new(1, 1))
    }

    #[test]
    fn test_operator_symbol_covers_compound_operators() {
        assert_eq!(operator_symbol(TokenKind::Plus), "+");
        assert_eq!(operator_symbol(TokenKind::PlusAssign), "+=");
        assert_eq!(operator_symbol(TokenKind::ShiftLeftAssign), "<<=");
        assert_eq!(operator_symbol(TokenKind::Dot), ".");
        assert_eq!(operator_symbol(TokenKind::Identifier), "");
    }

    #[test]
    fn test_binary_tree_dump_shape() {
        let expr = Expression::BinaryOperation {
            token: tok(TokenKind::Integer, "1"),
            op: TokenKind::Plus,
            lhs: Box::new(Expression::IntegerLiteral {
                token: tok(TokenKind::Integer, "1"),
                value: 1,
            }),
            rhs: Box::new(Expression::IntegerLiteral {
                token: tok(TokenKind::Integer, "2"),
                value: 2,
            }),
        };
        let expected = "\
BinaryOperation(+)
  lhs:
    IntegerLiteral(1)
  rhs:
    IntegerLiteral(2)";
        assert_eq!(expr.tree_dump(0), expected);
    }

    #[test]
    fn test_return_without_value() {
        let statement = Statement::ReturnStatement {
            token: tok(TokenKind::Return, "return"),
            value: None,
        };
        assert_eq!(statement.tree_dump(0), "ReturnStatement");
    }
}
