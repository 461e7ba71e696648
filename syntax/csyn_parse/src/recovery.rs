//! Error recovery token sets.
//!
//! Bitset over token-kind discriminants for O(1) membership tests during
//! resynchronization. Recovery is local and heuristic: skip to the nearest
//! token that can plausibly start or delimit the enclosing construct.

use csyn_ir::TokenKind;

/// A set of token kinds; each bit position is a kind discriminant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct TokenSet(u128);

impl TokenSet {
    /// Empty set.
    pub(crate) const fn new() -> Self {
        TokenSet(0)
    }

    /// Add a kind (const builder).
    #[must_use]
    pub(crate) const fn with(self, kind: TokenKind) -> Self {
        TokenSet(self.0 | (1u128 << kind.tag()))
    }

    /// Union of two sets.
    #[must_use]
    pub(crate) const fn union(self, other: Self) -> Self {
        TokenSet(self.0 | other.0)
    }

    /// Membership test.
    pub(crate) const fn contains(self, kind: TokenKind) -> bool {
        (self.0 & (1u128 << kind.tag())) != 0
    }
}

/// Boundaries for top-level and block items.
pub(crate) const ITEM_BOUNDARY: TokenSet = TokenSet::new()
    .with(TokenKind::Semicolon)
    .with(TokenKind::LBrace)
    .with(TokenKind::RBrace)
    .with(TokenKind::Hash)
    .with(TokenKind::Eof);

/// Boundaries inside struct/union field lists.
pub(crate) const FIELD_BOUNDARY: TokenSet = TokenSet::new()
    .with(TokenKind::Semicolon)
    .with(TokenKind::RBrace)
    .with(TokenKind::Hash)
    .with(TokenKind::Eof);

/// Boundaries inside enumerator lists.
pub(crate) const ENUMERATOR_BOUNDARY: TokenSet = TokenSet::new()
    .with(TokenKind::Comma)
    .with(TokenKind::RBrace)
    .with(TokenKind::Hash)
    .with(TokenKind::Eof);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_membership() {
        let set = TokenSet::new().with(TokenKind::Semicolon).with(TokenKind::RBrace);
        assert!(set.contains(TokenKind::Semicolon));
        assert!(set.contains(TokenKind::RBrace));
        assert!(!set.contains(TokenKind::LBrace));
    }

    #[test]
    fn test_union() {
        let a = TokenSet::new().with(TokenKind::Comma);
        let b = TokenSet::new().with(TokenKind::RBrace);
        let both = a.union(b);
        assert!(both.contains(TokenKind::Comma));
        assert!(both.contains(TokenKind::RBrace));
    }

    #[test]
    fn test_predefined_boundaries() {
        assert!(ITEM_BOUNDARY.contains(TokenKind::Semicolon));
        assert!(ITEM_BOUNDARY.contains(TokenKind::Hash));
        assert!(FIELD_BOUNDARY.contains(TokenKind::RBrace));
        assert!(ENUMERATOR_BOUNDARY.contains(TokenKind::Comma));
        assert!(!ITEM_BOUNDARY.contains(TokenKind::Plus));
    }
}
