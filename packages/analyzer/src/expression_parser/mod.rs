/**
 * Expression Parser Module
 *
 * Turns BSL expression text into the flat member/operation syntax that the
 * expression tree builder consumes.
 */
pub mod lexer;
pub mod parser;
pub mod syntax;

pub use lexer::{Keyword, Lexer, Token, TokenType};
pub use parser::{ParseResult, Parser, MAX_NESTING_DEPTH};
pub use syntax::*;
