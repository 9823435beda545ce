//! # Tigerlex - A Streaming Lexer for Tiger
//!
//! Tigerlex converts Tiger source text into positioned tokens. Input may
//! arrive in arbitrarily sized fragments: a keyword, a comment or a string
//! literal can straddle any fragment boundary and the produced tokens and
//! positions are the same as for the unfragmented text.
//!
//! ## Quick Start
//!
//! ```rust
//! use tigerlex::{lex_str, TokenKind};
//!
//! # fn main() -> tigerlex::Result<()> {
//! let tokens = lex_str("var x := 10 // the answer")
//!     .collect::<tigerlex::Result<Vec<_>>>()?;
//!
//! assert_eq!(tokens.len(), 4);
//! assert_eq!(tokens[0].kind, TokenKind::Var);
//! assert_eq!(tokens[3].to_string(), "Number(10) at [1, 10]");
//! # Ok(())
//! # }
//! ```
//!
//! ### Fragmented Input
//!
//! ```rust
//! use tigerlex::{lex_fragments, lex_str};
//!
//! let source = "let /* nested /* comment */ */ in \"a \\\" b\" end";
//! let whole: Vec<_> = lex_str(source).map(|t| t.unwrap()).collect();
//! let pieces: Vec<String> = source.chars().map(String::from).collect();
//! let split: Vec<_> = lex_fragments(pieces).map(|t| t.unwrap()).collect();
//!
//! assert_eq!(whole, split);
//! ```
//!
//! ## Architecture
//!
//! ```text
//! Fragments → LineAssembler → Lines → Segments → StateMachine → Tokens
//! ```
//!
//! - [`LineAssembler`](lexer::LineAssembler) - reassembles fragments into logical lines
//! - [`Scanner`](lexer::Scanner) - splits lines into words and drives the state machine
//! - [`StateMachine`](lexer::StateMachine) - maximal munch, comments and strings
//! - [`classify`](lexer::classify) - ordered classification of candidate lexemes
//! - [`TokenStream`] - lazy, pull-based producer over any [`ChunkSource`]
//! - [`lex_async`] - the same producer over a `tokio` reader
//!
//! ## Error Handling
//!
//! The first lexical error ends the stream:
//!
//! ```rust
//! use tigerlex::lex_str;
//!
//! let results: Vec<_> = lex_str("/* never closed").collect();
//! assert_eq!(results.len(), 1);
//! let err = results[0].as_ref().unwrap_err();
//! assert_eq!(err.to_string(), "LEX ERROR at [1, 16]: Unterminated block comment (1 still open)");
//! ```

pub mod config;
pub mod error;
pub mod lexer;
pub mod stream;

// Re-export main types
pub use config::{LexerConfig, StringWhitespace};
pub use error::{Error, LexError, LexErrorKind, Result};
pub use lexer::{Payload, Position, Token, TokenKind};
pub use stream::{
    lex_async, lex_file, lex_fragments, lex_reader, lex_str, ChunkSource, Fragments,
    ReaderSource, TokenStream,
};
