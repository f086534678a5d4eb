//! Score front-end: source text → tokens → [`Program`] AST.
//!
//! The front-end only recognises syntax. Everything with meaning (variables,
//! blocks, timing, pitch) happens in [`crate::eval`].

pub mod ast;
pub mod error;
pub mod lexer;
pub mod note;
pub mod parser;
pub mod token;

pub use ast::*;
pub use error::CompileError;

use lexer::Lexer;
use parser::Parser;

/// The score compiler front door.
pub struct Compiler;

impl Compiler {
    /// Parse score source into a Program AST.
    pub fn parse(source: &str) -> Result<Program, CompileError> {
        let mut lexer = Lexer::new(source);
        let tokens = lexer.tokenize()?;
        log::trace!("lexed {} tokens", tokens.len());
        let mut parser = Parser::new(tokens);
        parser.parse()
    }
}
