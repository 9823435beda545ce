//! Lexical analysis for Tiger
//!
//! Converts logical lines of source text into positioned tokens. The
//! [`Scanner`] drives one lexical pass; [`LineAssembler`] turns arbitrarily
//! fragmented input into the lines it consumes.

pub mod classifier;
mod position;
mod reassembler;
mod scanner;
mod state;
mod token;
mod words;

pub use classifier::{classify, Classification};
pub use position::Position;
pub use reassembler::{Line, LineAssembler};
pub use scanner::Scanner;
pub use state::{LexerState, StateMachine};
pub use token::{Payload, Token, TokenKind};
pub use words::{Segment, Segments};
