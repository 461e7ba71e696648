//! Recursive descent C parser producing a lossless concrete syntax tree.
//!
//! The parser interprets the grammar description in `csyn_grammar`
//! directly: static precedence drives the expression loop, and wherever the
//! description declares a conflict set the parser forks — parses each
//! declared alternative from a snapshot, ranks the completed candidates by
//! accumulated dynamic precedence (declaration order breaks ties) and keeps
//! the winner. Forking anywhere else is asserted against in debug builds.
//!
//! Parsing never aborts. Unparseable input becomes an `ERROR` node holding
//! the skipped tokens, and parsing resumes at the next item boundary, so a
//! single syntax error cannot take down the rest of the file and every
//! token still ends up in the tree (span coverage is an invariant, not a
//! best effort).

mod builder;
mod cursor;
mod fork;
mod grammar;
mod recovery;

#[cfg(test)]
mod tests;

use csyn_diagnostic::{Diagnostic, ErrorCode};
use csyn_ir::{FieldName, Node, NodeKind, Span, SyntaxTree, Token, TokenKind, TokenList};
use rustc_hash::FxHashSet;

pub(crate) use builder::NodeBuilder;
pub(crate) use cursor::Cursor;
pub(crate) use recovery::TokenSet;

/// Grow the stack before deeply recursive entry points.
///
/// 64KB red zone, 1MB growth; enough for the pathological nesting depths
/// editors feed a tolerant parser.
#[inline]
pub(crate) fn ensure_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(64 * 1024, 1024 * 1024, f)
}

/// A parse-level error, produced where a production cannot continue.
///
/// These never escape [`parse`]: item loops catch them, convert the span
/// into an `ERROR` node and resynchronize.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct ParseError {
    pub code: ErrorCode,
    pub message: String,
    pub span: Span,
}

impl ParseError {
    /// Create a new parse error.
    pub fn new(code: ErrorCode, message: impl Into<String>, span: Span) -> Self {
        ParseError {
            code,
            message: message.into(),
            span,
        }
    }

    /// Convert to a diagnostic for the parse result.
    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::error(self.code)
            .with_message(&self.message)
            .with_label(self.span, "here")
    }
}

/// Result alias used throughout the grammar modules.
pub(crate) type Parsed<T> = Result<T, ParseError>;

/// Everything one parse produced: the tree plus lexical and syntactic
/// diagnostics.
#[derive(Clone, Debug)]
pub struct ParseResult {
    pub tree: SyntaxTree,
    pub diagnostics: Vec<Diagnostic>,
}

impl ParseResult {
    /// Whether any diagnostics were produced.
    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}

/// Parse a C source buffer into a concrete syntax tree.
pub fn parse(source: &str) -> ParseResult {
    let lexed = csyn_lexer::lex(source);
    let mut diagnostics = lexed.diagnostics;
    let mut parser = Parser::new(source, &lexed.tokens);
    let root = parser.parse_translation_unit();
    diagnostics.extend(parser.diagnostics);
    ParseResult {
        tree: SyntaxTree::new(root),
        diagnostics,
    }
}

/// Parser state.
pub(crate) struct Parser<'a> {
    cursor: Cursor<'a>,
    source: &'a str,
    /// Dynamic precedence accumulated by the current derivation; compared
    /// across fork alternatives, never consulted outside a fork.
    dyn_prec: i64,
    /// Parse K&R parameter lists as bare identifiers.
    old_style_params: bool,
    /// Whether struct/union/enum specifiers may take a `{…}` body. Cast
    /// retries switch this off so `(struct point){…}` keeps its brace for
    /// the compound-literal initializer.
    struct_body_allowed: bool,
    /// Failed speculations, keyed by position, speculation kind and mode
    /// flags. Re-trying a failed speculation at the same position cannot
    /// succeed, so the cache keeps nested fallback chains from re-parsing
    /// the same region — the bounded-fork guarantee.
    failed_speculations: FxHashSet<u64>,
    diagnostics: Vec<Diagnostic>,
}

/// Speculative entry points eligible for failure caching.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
#[repr(u8)]
pub(crate) enum SpeculationKind {
    CastFull,
    CastNoStructBody,
    CastNoAbstract,
    SizeofType,
    MacroType,
    OrdinaryDeclarator,
    AbstractDeclarator,
}

impl<'a> Parser<'a> {
    pub(crate) fn new(source: &'a str, tokens: &'a TokenList) -> Self {
        Parser {
            cursor: Cursor::new(tokens),
            source,
            dyn_prec: 0,
            old_style_params: false,
            struct_body_allowed: true,
            failed_speculations: FxHashSet::default(),
            diagnostics: Vec::new(),
        }
    }

    // --- token access ---

    #[inline]
    pub(crate) fn current(&self) -> &Token {
        self.cursor.current()
    }

    #[inline]
    pub(crate) fn current_kind(&self) -> TokenKind {
        self.cursor.current().kind
    }

    #[inline]
    pub(crate) fn current_span(&self) -> Span {
        self.cursor.current().span
    }

    #[inline]
    pub(crate) fn at(&self, kind: TokenKind) -> bool {
        self.current_kind() == kind
    }

    #[inline]
    pub(crate) fn at_eof(&self) -> bool {
        self.at(TokenKind::Eof)
    }

    #[inline]
    pub(crate) fn peek_kind(&self) -> TokenKind {
        self.cursor.peek().kind
    }

    /// Text of a token, sliced from the source.
    #[inline]
    pub(crate) fn text(&self, token: &Token) -> &'a str {
        token.text(self.source)
    }

    /// Text of the current token.
    #[inline]
    pub(crate) fn current_text(&self) -> &'a str {
        self.text(self.cursor.current())
    }

    /// Two adjacent `[` tokens open an attribute declaration; adjacency is
    /// checked on spans the same way `>>` detection would be, since the
    /// lexer never fuses brackets.
    pub(crate) fn at_double_bracket(&self, kind: TokenKind) -> bool {
        let (a, b) = self.cursor.current_pair();
        a.kind == kind && b.kind == kind && a.span.end == b.span.start
    }

    // --- consumption ---

    /// Consume the current token into `b`, attaching any comments that
    /// precede it.
    pub(crate) fn bump(&mut self, b: &mut NodeBuilder) -> Token {
        debug_assert!(!self.at_eof(), "bump at end of input");
        for comment in self.cursor.take_leading_trivia() {
            b.push_node(Node::leaf(NodeKind::Comment, comment));
        }
        let token = self.cursor.advance();
        b.push_token(token);
        token
    }

    /// Consume the current token as a labeled child.
    pub(crate) fn bump_field(&mut self, b: &mut NodeBuilder, field: FieldName) -> Token {
        debug_assert!(!self.at_eof(), "bump at end of input");
        for comment in self.cursor.take_leading_trivia() {
            b.push_node(Node::leaf(NodeKind::Comment, comment));
        }
        let token = self.cursor.advance();
        b.push_field_token(field, token);
        token
    }

    /// Consume the current token into a named leaf node (identifier roles,
    /// literal leaves, single-keyword specifier nodes). Leading comments
    /// ride inside the leaf so they stay in the tree.
    pub(crate) fn take_leaf(&mut self, kind: NodeKind) -> Node {
        debug_assert!(!self.at_eof(), "bump at end of input");
        let mut b = NodeBuilder::new();
        for comment in self.cursor.take_leading_trivia() {
            b.push_node(Node::leaf(NodeKind::Comment, comment));
        }
        b.push_token(self.cursor.advance());
        b.finish(kind)
    }

    /// Consume the current token as a labeled named leaf.
    pub(crate) fn bump_leaf_field(
        &mut self,
        b: &mut NodeBuilder,
        field: FieldName,
        kind: NodeKind,
    ) {
        let leaf = self.take_leaf(kind);
        b.push_field(field, leaf);
    }

    /// Consume a token of `kind` or fail with `code`.
    pub(crate) fn expect(
        &mut self,
        b: &mut NodeBuilder,
        kind: TokenKind,
        code: ErrorCode,
    ) -> Parsed<Token> {
        if self.at(kind) {
            Ok(self.bump(b))
        } else {
            Err(self.error_here(code))
        }
    }

    /// An error anchored at the current token.
    pub(crate) fn error_here(&self, code: ErrorCode) -> ParseError {
        ParseError::new(
            code,
            format!("{}, found `{}`", code.description(), self.current_text()),
            self.current_span(),
        )
    }

    /// Cache key for a speculation at the current position under the
    /// current mode flags.
    fn speculation_key(&self, kind: SpeculationKind) -> u64 {
        ((self.cursor.pos() as u64) << 8)
            | ((kind as u64) << 2)
            | (u64::from(self.old_style_params) << 1)
            | u64::from(self.struct_body_allowed)
    }

    /// [`try_parse`](Self::try_parse) with failure caching: a speculation
    /// that failed at this position under the same flags is not retried.
    pub(crate) fn try_parse_memo<T>(
        &mut self,
        kind: SpeculationKind,
        f: impl FnOnce(&mut Self) -> Parsed<T>,
    ) -> Option<T> {
        let key = self.speculation_key(kind);
        if self.failed_speculations.contains(&key) {
            return None;
        }
        match self.try_parse(f) {
            Some(value) => Some(value),
            None => {
                self.failed_speculations.insert(key);
                None
            }
        }
    }

    /// Record dynamic precedence for a reduced production.
    #[inline]
    pub(crate) fn note_dynamic(&mut self, rule: csyn_grammar::RuleName) {
        self.dyn_prec += i64::from(rule.dynamic_precedence());
    }

    /// Record a positional dynamic-precedence adjustment that is not
    /// attached to a whole rule (the sized-specifier type-identifier slot).
    #[inline]
    pub(crate) fn note_dynamic_raw(&mut self, score: i32) {
        self.dyn_prec += i64::from(score);
    }

    // --- error recovery ---

    /// Build an `ERROR` node: consume at least one token (unless at EOF),
    /// then everything up to the recovery boundary, and report `error`.
    pub(crate) fn error_node(&mut self, boundary: TokenSet, error: &ParseError) -> Node {
        tracing::trace!(code = ?error.code, span = %error.span, "recovering");
        self.diagnostics.push(error.to_diagnostic());
        let mut b = NodeBuilder::new();
        let anchor = self.current_span();
        if !self.at_eof() {
            self.bump(&mut b);
            while !self.at_eof() && !boundary.contains(self.current_kind()) {
                self.bump(&mut b);
            }
        }
        b.finish_with_fallback(NodeKind::Error, anchor)
    }

    /// Attach any remaining comments at end of input.
    pub(crate) fn drain_trivia(&mut self, b: &mut NodeBuilder) {
        for comment in self.cursor.take_leading_trivia() {
            b.push_node(Node::leaf(NodeKind::Comment, comment));
        }
    }
}
