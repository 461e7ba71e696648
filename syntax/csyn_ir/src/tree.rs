//! The owned concrete syntax tree.
//!
//! A tree is a strict forest: every node owns its children and no child is
//! shared or back-referenced. Children are ordered, optionally tagged with
//! the [`FieldName`] they fill, and are either sub-nodes or raw tokens —
//! punctuation and keywords stay in the tree so the original text can be
//! reconstructed.
//!
//! [`SyntaxTree::reconstruct`] doubles as the span-coverage checker: it
//! walks every leaf in order and verifies that leaves do not overlap and
//! that the gaps between them contain nothing but whitespace.

use crate::{FieldName, NodeKind, Span, Token};

/// A child slot: either a structural sub-node or a raw token.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum NodeOrToken {
    Node(Node),
    Token(Token),
}

impl NodeOrToken {
    /// The span of whichever item is held.
    pub fn span(&self) -> Span {
        match self {
            NodeOrToken::Node(n) => n.span,
            NodeOrToken::Token(t) => t.span,
        }
    }

    /// The held node, if this is a node.
    pub fn as_node(&self) -> Option<&Node> {
        match self {
            NodeOrToken::Node(n) => Some(n),
            NodeOrToken::Token(_) => None,
        }
    }

    /// The held token, if this is a token.
    pub fn as_token(&self) -> Option<&Token> {
        match self {
            NodeOrToken::Node(_) => None,
            NodeOrToken::Token(t) => Some(t),
        }
    }
}

/// An ordered, optionally field-labeled child of a node.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Child {
    pub field: Option<FieldName>,
    pub item: NodeOrToken,
}

impl Child {
    /// Unlabeled node child.
    pub fn node(node: Node) -> Self {
        Child {
            field: None,
            item: NodeOrToken::Node(node),
        }
    }

    /// Field-labeled node child.
    pub fn field(field: FieldName, node: Node) -> Self {
        Child {
            field: Some(field),
            item: NodeOrToken::Node(node),
        }
    }

    /// Unlabeled token child.
    pub fn token(token: Token) -> Self {
        Child {
            field: None,
            item: NodeOrToken::Token(token),
        }
    }

    /// Field-labeled token child (e.g. the `operator` of a binary
    /// expression or the `start` quote of a string literal).
    pub fn field_token(field: FieldName, token: Token) -> Self {
        Child {
            field: Some(field),
            item: NodeOrToken::Token(token),
        }
    }
}

/// A concrete syntax tree node: kind, covered span, owned children.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Node {
    pub kind: NodeKind,
    pub span: Span,
    pub children: Vec<Child>,
}

impl Node {
    /// Create a node from already-assembled children.
    pub fn new(kind: NodeKind, span: Span, children: Vec<Child>) -> Self {
        Node {
            kind,
            span,
            children,
        }
    }

    /// A named leaf wrapping a single token (identifiers, comments,
    /// escape sequences, …).
    pub fn leaf(kind: NodeKind, token: Token) -> Self {
        Node {
            kind,
            span: token.span,
            children: vec![Child::token(token)],
        }
    }

    /// Iterate over the node children (skipping raw tokens).
    pub fn named_children(&self) -> impl Iterator<Item = &Node> {
        self.children.iter().filter_map(|c| c.item.as_node())
    }

    /// Number of node children.
    pub fn named_child_count(&self) -> usize {
        self.named_children().count()
    }

    /// The first node child filling `field`.
    pub fn field(&self, field: FieldName) -> Option<&Node> {
        self.children
            .iter()
            .filter(|c| c.field == Some(field))
            .find_map(|c| c.item.as_node())
    }

    /// All node children filling `field`.
    pub fn fields(&self, field: FieldName) -> impl Iterator<Item = &Node> + '_ {
        self.children
            .iter()
            .filter(move |c| c.field == Some(field))
            .filter_map(|c| c.item.as_node())
    }

    /// The first token child filling `field`.
    pub fn field_token(&self, field: FieldName) -> Option<&Token> {
        self.children
            .iter()
            .filter(|c| c.field == Some(field))
            .find_map(|c| c.item.as_token())
    }

    /// The node's text, sliced from the source it was parsed from.
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.span.to_range()]
    }

    /// Append every leaf token under this node, in order.
    pub fn collect_leaves(&self, out: &mut Vec<Token>) {
        for child in &self.children {
            match &child.item {
                NodeOrToken::Node(n) => n.collect_leaves(out),
                NodeOrToken::Token(t) => out.push(*t),
            }
        }
    }

    /// S-expression rendering of the node structure (nodes and field
    /// labels only; raw tokens are omitted). Matches the usual CST test
    /// notation: `(binary_expression left: (identifier) right: (…))`.
    pub fn to_sexp(&self) -> String {
        let mut out = String::new();
        self.write_sexp(&mut out);
        out
    }

    fn write_sexp(&self, out: &mut String) {
        out.push('(');
        out.push_str(self.kind.as_str());
        for child in &self.children {
            if let NodeOrToken::Node(node) = &child.item {
                out.push(' ');
                if let Some(field) = child.field {
                    out.push_str(field.as_str());
                    out.push_str(": ");
                }
                node.write_sexp(out);
            }
        }
        out.push(')');
    }
}

/// Violation of the span invariants found while reconstructing text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoverageError {
    /// Two leaves overlap or appear out of source order.
    #[error("leaf at {next} overlaps or precedes leaf ending at {prev_end}")]
    OverlappingLeaves { prev_end: u32, next: Span },
    /// The gap between two leaves holds non-whitespace text.
    #[error("non-whitespace source text at {0} is not covered by any leaf")]
    UncoveredText(Span),
}

/// Result of one parse: the root node plus tree-level helpers.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct SyntaxTree {
    root: Node,
}

impl SyntaxTree {
    /// Wrap a finished root node.
    pub fn new(root: Node) -> Self {
        SyntaxTree { root }
    }

    /// The root node (a `translation_unit`).
    pub fn root(&self) -> &Node {
        &self.root
    }

    /// All leaf tokens, in source order.
    pub fn leaves(&self) -> Vec<Token> {
        let mut out = Vec::new();
        self.root.collect_leaves(&mut out);
        out
    }

    /// S-expression rendering of the whole tree.
    pub fn to_sexp(&self) -> String {
        self.root.to_sexp()
    }

    /// Reconstruct the source text from the leaves, preserving the original
    /// inter-token whitespace.
    ///
    /// This enforces the span invariants: leaves must be in order and
    /// non-overlapping, and every gap between leaves (and before/after the
    /// tree) must be pure whitespace. On success the returned string equals
    /// the input source.
    pub fn reconstruct(&self, source: &str) -> Result<String, CoverageError> {
        let mut out = String::with_capacity(source.len());
        let mut prev_end: u32 = 0;
        for leaf in self.leaves() {
            if leaf.span.start < prev_end {
                return Err(CoverageError::OverlappingLeaves {
                    prev_end,
                    next: leaf.span,
                });
            }
            let gap = &source[prev_end as usize..leaf.span.start as usize];
            if !gap.chars().all(char::is_whitespace) {
                return Err(CoverageError::UncoveredText(Span::new(
                    prev_end,
                    leaf.span.start,
                )));
            }
            out.push_str(gap);
            out.push_str(leaf.text(source));
            prev_end = leaf.span.end;
        }
        let tail = &source[prev_end as usize..];
        if !tail.chars().all(char::is_whitespace) {
            return Err(CoverageError::UncoveredText(Span::new(
                prev_end,
                u32::try_from(source.len()).unwrap_or(u32::MAX),
            )));
        }
        out.push_str(tail);
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TokenKind;
    use pretty_assertions::assert_eq;

    fn tok(kind: TokenKind, start: u32, end: u32) -> Token {
        Token::new(kind, Span::new(start, end))
    }

    // Builds a tree for the source "a + b".
    fn sample_tree() -> (SyntaxTree, &'static str) {
        let source = "a + b";
        let left = Node::leaf(NodeKind::Identifier, tok(TokenKind::Identifier, 0, 1));
        let right = Node::leaf(NodeKind::Identifier, tok(TokenKind::Identifier, 4, 5));
        let binary = Node::new(
            NodeKind::BinaryExpression,
            Span::new(0, 5),
            vec![
                Child::field(FieldName::Left, left),
                Child::field_token(FieldName::Operator, tok(TokenKind::Plus, 2, 3)),
                Child::field(FieldName::Right, right),
            ],
        );
        let root = Node::new(
            NodeKind::TranslationUnit,
            Span::new(0, 5),
            vec![Child::node(binary)],
        );
        (SyntaxTree::new(root), source)
    }

    #[test]
    fn test_field_access() {
        let (tree, _) = sample_tree();
        let expr = tree.root().named_children().next().map(|n| n.kind);
        assert_eq!(expr, Some(NodeKind::BinaryExpression));

        let Some(binary) = tree.root().named_children().next() else {
            panic!("missing binary expression");
        };
        assert_eq!(
            binary.field(FieldName::Left).map(|n| n.kind),
            Some(NodeKind::Identifier)
        );
        assert_eq!(
            binary.field_token(FieldName::Operator).map(|t| t.kind),
            Some(TokenKind::Plus)
        );
        assert!(binary.field(FieldName::Condition).is_none());
    }

    #[test]
    fn test_to_sexp() {
        let (tree, _) = sample_tree();
        assert_eq!(
            tree.to_sexp(),
            "(translation_unit (binary_expression left: (identifier) right: (identifier)))"
        );
    }

    #[test]
    fn test_reconstruct_roundtrip() {
        let (tree, source) = sample_tree();
        let Ok(text) = tree.reconstruct(source) else {
            panic!("reconstruction failed");
        };
        assert_eq!(text, source);
    }

    #[test]
    fn test_reconstruct_detects_uncovered_text() {
        let (tree, _) = sample_tree();
        // Same spans, but the gap now holds a non-whitespace byte.
        let result = tree.reconstruct("a +!b");
        assert!(matches!(result, Err(CoverageError::UncoveredText(_))));
    }

    #[test]
    fn test_reconstruct_detects_overlap() {
        let source = "ab";
        let a = Node::leaf(NodeKind::Identifier, tok(TokenKind::Identifier, 0, 2));
        let b = Node::leaf(NodeKind::Identifier, tok(TokenKind::Identifier, 1, 2));
        let root = Node::new(
            NodeKind::TranslationUnit,
            Span::new(0, 2),
            vec![Child::node(a), Child::node(b)],
        );
        let tree = SyntaxTree::new(root);
        assert!(matches!(
            tree.reconstruct(source),
            Err(CoverageError::OverlappingLeaves { .. })
        ));
    }

    #[test]
    fn test_leaves_in_order() {
        let (tree, _) = sample_tree();
        let kinds: Vec<TokenKind> = tree.leaves().iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![TokenKind::Identifier, TokenKind::Plus, TokenKind::Identifier]
        );
    }
}
