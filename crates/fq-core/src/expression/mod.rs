//! Where-clause expression parsing.
//!
//! The pipeline is:
//!
//! 1. **Splitting**: Break `<key> <operator> <value>` apart on single spaces.
//! 2. **Lexing**: Tokenize the value expression.
//! 3. **Reduction**: Fold the tokens into one scalar or a flat array.

pub mod lexer;
pub mod parser;

pub use lexer::{Lexer, Token, TokenKind};
pub use parser::{ParseError, parse_value, parse_where};
