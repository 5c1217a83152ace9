//! Yul frontend
//!
//! The frontend is responsible for:
//! 1. Lexing source code into tokens
//! 2. Parsing tokens into an AST (a code block or a full object)
//!
//! Semantic analysis lives in [`crate::sema`].

pub mod ast;
pub mod lexer;
pub mod parser;

use crate::common::CompileResult;
use crate::names::NameRepository;

pub use ast::*;
pub use lexer::{Lexer, Token, TokenKind};
pub use parser::Parser;

/// Parse a source file that holds either an object or a bare block
pub fn parse_source(source: &str, names: &mut NameRepository) -> CompileResult<Object> {
    Parser::new(source, names)?.parse()
}

/// Parse a source file that must hold exactly one block
pub fn parse_block(source: &str, names: &mut NameRepository) -> CompileResult<Block> {
    Parser::new(source, names)?.parse_program()
}

/// Render the token stream, one token per line
pub fn dump_tokens(source: &str) -> CompileResult<String> {
    let tokens = Lexer::new(source).tokenize_all()?;
    let mut output = String::new();
    for token in &tokens {
        output.push_str(&format!("{:?}\n", token));
    }
    Ok(output)
}
