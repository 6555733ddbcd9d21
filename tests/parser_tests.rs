// Integration tests for the Cinder parser

use pretty_assertions::assert_eq;

use cinderc::parser::ast::{Expression, Statement, Type};
use cinderc::parser::diagnostics::Diagnostics;
use cinderc::parser::lexer::{Lexer, TokenKind};
use cinderc::parser::parse::{parse, Parser};

fn parse_source(source: &str) -> Result<Statement, Diagnostics> {
    let tokens = Lexer::new(source).tokenize().expect("lexing failed");
    parse(tokens)
}

fn first_statement(root: &Statement) -> &Statement {
    match root {
        Statement::Block { statements, .. } => &statements[0],
        other => panic!("expected block root, got {:?}", other),
    }
}

#[test]
fn test_operator_precedence() {
    let root = parse_source("1 + 2 * 3;").expect("parsing failed");
    let expected = "\
Block
  ExpressionStatement
    BinaryOperation(+)
      lhs:
        IntegerLiteral(1)
      rhs:
        BinaryOperation(*)
          lhs:
            IntegerLiteral(2)
          rhs:
            IntegerLiteral(3)";
    assert_eq!(root.tree_dump(0), expected);
}

#[test]
fn test_assignment_is_right_associative() {
    let root = parse_source("a = b = c;").expect("parsing failed");
    let expected = "\
Block
  ExpressionStatement
    BinaryOperation(=)
      lhs:
        Identifier(a)
      rhs:
        BinaryOperation(=)
          lhs:
            Identifier(b)
          rhs:
            Identifier(c)";
    assert_eq!(root.tree_dump(0), expected);
}

#[test]
fn test_addsub_is_left_associative() {
    let root = parse_source("1 - 2 - 3;").expect("parsing failed");
    let expected = "\
Block
  ExpressionStatement
    BinaryOperation(-)
      lhs:
        BinaryOperation(-)
          lhs:
            IntegerLiteral(1)
          rhs:
            IntegerLiteral(2)
      rhs:
        IntegerLiteral(3)";
    assert_eq!(root.tree_dump(0), expected);
}

#[test]
fn test_array_type() {
    let root = parse_source("int[5] x;").expect("parsing failed");
    let expected = "\
Block
  VariableDeclaration(x)
    type:
      StaticArray
        element:
          SimpleType(int)
        length:
          IntegerLiteral(5)";
    assert_eq!(root.tree_dump(0), expected);
}

#[test]
fn test_multi_dimensional_array_wraps_left_to_right() {
    let root = parse_source("int[2][3] m;").expect("parsing failed");
    match first_statement(&root) {
        Statement::VariableDeclaration { ty, .. } => match ty {
            Type::StaticArray {
                element, length, ..
            } => {
                // Outermost length is the rightmost bracket.
                assert!(
                    matches!(length, Expression::IntegerLiteral { value: 3, .. }),
                    "outer length should be 3, got {:?}",
                    length
                );
                match element.as_ref() {
                    Type::StaticArray { length, .. } => {
                        assert!(matches!(length, Expression::IntegerLiteral { value: 2, .. }));
                    }
                    other => panic!("expected nested array, got {:?}", other),
                }
            }
            other => panic!("expected array type, got {:?}", other),
        },
        other => panic!("expected variable declaration, got {:?}", other),
    }
}

#[test]
fn test_unsigned_reference_type() {
    let root = parse_source("unsigned int & r;").expect("parsing failed");
    let expected = "\
Block
  VariableDeclaration(r)
    type:
      LValueReference
        SimpleType(unsigned int)";
    assert_eq!(root.tree_dump(0), expected);
}

#[test]
fn test_unsigned_defaults_to_int() {
    let root = parse_source("unsigned u;").expect("parsing failed");
    match first_statement(&root) {
        Statement::VariableDeclaration { ty, .. } => {
            assert!(matches!(
                ty,
                Type::SimpleType {
                    is_unsigned: true,
                    ..
                }
            ));
        }
        other => panic!("expected variable declaration, got {:?}", other),
    }
}

#[test]
fn test_declaration_disambiguation() {
    let root = parse_source("int f ( void ) { int x ; }").expect("parsing failed");
    match first_statement(&root) {
        Statement::FunctionDeclaration(func) => {
            assert_eq!(func.name, "f");
            assert!(func.parameters.is_empty());
            match func.body.as_ref() {
                Statement::Scope { statements, .. } => {
                    assert_eq!(statements.len(), 1);
                    assert!(matches!(
                        statements[0],
                        Statement::VariableDeclaration { .. }
                    ));
                }
                other => panic!("expected scope body, got {:?}", other),
            }
        }
        other => panic!("expected function declaration, got {:?}", other),
    }

    let root = parse_source("int x ;").expect("parsing failed");
    assert!(matches!(
        first_statement(&root),
        Statement::VariableDeclaration { .. }
    ));
}

#[test]
fn test_missing_initializer_expression() {
    let diagnostics = parse_source("int x = ;").unwrap_err();
    assert!(diagnostics.has_errors());
    // The error points at the token following '='.
    let error = &diagnostics.errors()[0];
    assert_eq!(error.token.lexeme, ";");
    assert_eq!(error.token.location.line, 1);
    assert_eq!(error.token.location.column, 9);
}

#[test]
fn test_function_call_chaining() {
    let root = parse_source("f()();").expect("parsing failed");
    let expected = "\
Block
  ExpressionStatement
    FunctionCall
      callee:
        FunctionCall
          callee:
            Identifier(f)
          args:
      args:";
    assert_eq!(root.tree_dump(0), expected);
}

#[test]
fn test_tree_dump_is_deterministic() {
    let source = "int add(int a, int b) { return a + b; } int main(void) { return add(1, 2); }";
    let first = parse_source(source).expect("parsing failed").tree_dump(0);
    let second = parse_source(source).expect("parsing failed").tree_dump(0);
    assert_eq!(first, second);
}

#[test]
fn test_unary_applies_only_once() {
    let root = parse_source("-x;").expect("parsing failed");
    match first_statement(&root) {
        Statement::ExpressionStatement { expr, .. } => {
            assert!(matches!(expr, Expression::UnaryOperation { .. }));
        }
        other => panic!("expected expression statement, got {:?}", other),
    }

    // The operand of a prefix sign is a func_call, never another unary.
    assert!(parse_source("- -x;").is_err());
    assert!(parse_source("--x;").is_err());
}

#[test]
fn test_unsupported_size_keywords() {
    let diagnostics = parse_source("char c ;").unwrap_err();
    assert_eq!(
        diagnostics.errors()[0].message,
        "Type \"char\" is not supported"
    );

    let diagnostics = parse_source("unsigned long n ;").unwrap_err();
    assert_eq!(
        diagnostics.errors()[0].message,
        "Type \"unsigned long\" is not supported"
    );
}

#[test]
fn test_void_parameter_forbids_additional_parameters() {
    let diagnostics = parse_source("int f ( void , int a ) { }").unwrap_err();
    assert!(diagnostics.errors()[0]
        .message
        .contains("void parameter list"));
}

#[test]
fn test_unnamed_parameter_is_recorded_with_warning() {
    let tokens = Lexer::new("int f ( int ) { }").tokenize().expect("lexing failed");
    let mut parser = Parser::new(tokens);
    let root = parser.parse().expect("parsing failed");

    match first_statement(&root) {
        Statement::FunctionDeclaration(func) => {
            assert_eq!(func.parameters.len(), 1);
            assert!(func.parameters[0].name.is_none());
        }
        other => panic!("expected function declaration, got {:?}", other),
    }

    let warnings = parser.diagnostics().warnings();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].message, "Parameter has no name");
}

#[test]
fn test_missing_comma_between_parameters() {
    assert!(parse_source("int f ( int a int b ) { }").is_err());
}

#[test]
fn test_bare_return() {
    let root = parse_source("return ;").expect("parsing failed");
    match first_statement(&root) {
        Statement::ReturnStatement { value, .. } => assert!(value.is_none()),
        other => panic!("expected return statement, got {:?}", other),
    }
}

#[test]
fn test_assignment_of_literals_parses() {
    // Semantically invalid, but grammatically an assignment; code
    // generation rejects it later.
    assert!(parse_source("1 = 2 ;").is_ok());
}

#[test]
fn test_integer_literal_out_of_range() {
    let diagnostics = parse_source("int x = 2147483648 ;").unwrap_err();
    assert!(diagnostics
        .errors()
        .iter()
        .any(|e| e.message == "Integer literal out of range"));
}

#[test]
fn test_start_tokens_track_construct_starts() {
    let root = parse_source("int y = 1 + 2 ;").expect("parsing failed");
    let statement = first_statement(&root);
    assert_eq!(statement.token().kind, TokenKind::Int);
    match statement {
        Statement::VariableDeclaration {
            initializer: Some(expr),
            ..
        } => {
            // A folded binary operation keeps its first operand's token.
            assert_eq!(expr.token().lexeme, "1");
        }
        other => panic!("expected initialized declaration, got {:?}", other),
    }
}

#[test]
fn test_empty_braced_scope() {
    let root = parse_source("{ }").expect("parsing failed");
    match first_statement(&root) {
        Statement::Scope { statements, .. } => assert!(statements.is_empty()),
        other => panic!("expected scope, got {:?}", other),
    }
}

#[test]
fn test_missing_closing_brace() {
    let diagnostics = parse_source("{ int x ;").unwrap_err();
    assert!(diagnostics
        .errors()
        .iter()
        .any(|e| e.message.contains("Expected '}'")));
}
