//! Node builder.
//!
//! Collects ordered, optionally field-labeled children and finishes into a
//! [`Node`] whose span is the union of its children's spans. The inline
//! buffer covers the typical child count without allocating.

use csyn_ir::{Child, FieldName, Node, NodeKind, NodeOrToken, Span, Token};
use smallvec::SmallVec;

/// In-progress node.
pub(crate) struct NodeBuilder {
    children: SmallVec<[Child; 8]>,
}

impl NodeBuilder {
    /// Start an empty builder.
    pub(crate) fn new() -> Self {
        NodeBuilder {
            children: SmallVec::new(),
        }
    }

    /// Number of children collected so far; pairs with
    /// [`truncate`](Self::truncate) to roll back a failed sub-parse.
    pub(crate) fn len(&self) -> usize {
        self.children.len()
    }

    /// Drop children collected after `len`.
    pub(crate) fn truncate(&mut self, len: usize) {
        self.children.truncate(len);
    }

    /// Whether nothing has been collected.
    pub(crate) fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Append an unlabeled token child.
    pub(crate) fn push_token(&mut self, token: Token) {
        self.children.push(Child::token(token));
    }

    /// Append a labeled token child.
    pub(crate) fn push_field_token(&mut self, field: FieldName, token: Token) {
        self.children.push(Child::field_token(field, token));
    }

    /// Append an unlabeled node child.
    pub(crate) fn push_node(&mut self, node: Node) {
        self.children.push(Child::node(node));
    }

    /// Append a labeled node child.
    pub(crate) fn push_field(&mut self, field: FieldName, node: Node) {
        self.children.push(Child::field(field, node));
    }

    /// Splice another builder's children onto the end (transparent rules).
    pub(crate) fn append(&mut self, other: NodeBuilder) {
        self.children.extend(other.children);
    }

    /// Span covered by the collected children, if any.
    pub(crate) fn span(&self) -> Option<Span> {
        let first = self.children.first()?.item.span();
        let last = self.children.last()?.item.span();
        Some(first.merge(last))
    }

    /// Finish into a node; the builder must hold at least one child.
    pub(crate) fn finish(self, kind: NodeKind) -> Node {
        debug_assert!(!self.children.is_empty(), "empty {kind:?} node");
        let span = self.span().unwrap_or(Span::DUMMY);
        Node::new(kind, span, self.children.into_vec())
    }

    /// Finish into a node, using `fallback` (zero-width, at the anchor
    /// position) when no children were collected.
    pub(crate) fn finish_with_fallback(self, kind: NodeKind, fallback: Span) -> Node {
        let span = self
            .span()
            .unwrap_or_else(|| Span::point(fallback.start));
        Node::new(kind, span, self.children.into_vec())
    }

    /// Unwrap a builder holding exactly one node child.
    ///
    /// Used by fork alternatives that must produce a single candidate node.
    pub(crate) fn into_single_node(mut self) -> Node {
        debug_assert_eq!(self.children.len(), 1, "expected exactly one child");
        match self.children.pop().map(|c| c.item) {
            Some(NodeOrToken::Node(node)) => node,
            _ => Node::new(NodeKind::Error, Span::DUMMY, Vec::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use csyn_ir::TokenKind;

    #[test]
    fn test_span_is_union_of_children() {
        let mut b = NodeBuilder::new();
        b.push_token(Token::new(TokenKind::LParen, Span::new(2, 3)));
        b.push_token(Token::new(TokenKind::RParen, Span::new(7, 8)));
        let node = b.finish(NodeKind::ParenthesizedExpression);
        assert_eq!(node.span, Span::new(2, 8));
    }

    #[test]
    fn test_truncate_rolls_back() {
        let mut b = NodeBuilder::new();
        b.push_token(Token::new(TokenKind::Star, Span::new(0, 1)));
        let mark = b.len();
        b.push_token(Token::new(TokenKind::Star, Span::new(1, 2)));
        b.truncate(mark);
        assert_eq!(b.len(), 1);
    }

    #[test]
    fn test_fallback_span() {
        let b = NodeBuilder::new();
        let node = b.finish_with_fallback(NodeKind::Error, Span::new(5, 9));
        assert_eq!(node.span, Span::point(5));
        assert!(node.children.is_empty());
    }

    #[test]
    fn test_into_single_node() {
        let mut b = NodeBuilder::new();
        b.push_node(Node::leaf(
            NodeKind::Identifier,
            Token::new(TokenKind::Identifier, Span::new(0, 1)),
        ));
        let node = b.into_single_node();
        assert_eq!(node.kind, NodeKind::Identifier);
    }
}
