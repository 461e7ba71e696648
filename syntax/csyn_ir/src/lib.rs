//! Core syntax data model for the csyn C parser.
//!
//! Everything downstream crates share lives here: byte [`Span`]s, the
//! [`TokenKind`]/[`Token`]/[`TokenList`] triple produced by the lexer, the
//! [`NodeKind`] inventory with its closed [`Supertype`] groupings, and the
//! owned concrete syntax tree ([`Node`], [`SyntaxTree`]).
//!
//! Tokens carry no text: a token is a `(kind, span)` pair and its text is
//! recovered by slicing the original source. The tree keeps every token it
//! consumed — including comments and preprocessor directive markers — so the
//! original text can be reconstructed losslessly modulo whitespace.

/// Assert that a type has an exact size at compile time.
///
/// Guards against accidental size regressions on hot types.
#[macro_export]
macro_rules! static_assert_size {
    ($ty:ty, $size:expr) => {
        const _: [(); $size] = [(); ::std::mem::size_of::<$ty>()];
    };
}

mod node;
mod span;
mod token;
mod tree;

pub use node::{FieldName, NodeKind, Supertype};
pub use span::{Span, SpanError};
pub use token::{Token, TokenKind, TokenList};
pub use tree::{Child, CoverageError, Node, NodeOrToken, SyntaxTree};
