//! # Introduction
//!
//! `cinderc` is the front end for Cinder, a small statically-typed C-like
//! language. It parses source text into an abstract syntax tree and lowers
//! the tree into instructions for an in-memory target-code backend.
//!
//! ## Compilation pipeline
//!
//! ```text
//! Source → Lexer → Tokens → Parser → AST → Codegen → Backend IR
//! ```
//!
//! 1. [`parser`] — tokenises the source and builds an AST; errors and
//!    warnings accumulate per session and carry exact source locations.
//! 2. [`codegen`] — walks the AST depth-first and drives the backend
//!    builder; fails fast on the first lowering error.
//! 3. [`backend`] — the instruction builder: functions, basic blocks,
//!    arithmetic/comparison/branch/call/return instructions, and a
//!    deterministic textual dump.
//!
//! Every AST node also renders itself through `tree_dump`, a stable
//! indented dump used for debugging and golden tests.
//!
//! ## Supported language subset
//!
//! Types: `int` (with optional `unsigned`/`signed`), `void`, static arrays
//! `T[n]`, lvalue references `T&`. Statements: variable and function
//! declarations, `return`, expression statements, braced scopes.
//! Expressions: integer literals, identifiers, `+ - * /`, prefix sign,
//! assignment, chained function calls.

pub mod backend;
pub mod codegen;
pub mod parser;
