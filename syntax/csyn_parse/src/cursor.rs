//! Token cursor.
//!
//! Navigates the lexer's token stream. Comments stay in the stream (they
//! must end up in the tree), so the cursor separates *inspection* — which
//! looks through comments — from *consumption*, which hands leading
//! comments to the caller for attachment before yielding the real token.

use csyn_ir::{Token, TokenKind, TokenList};
use smallvec::SmallVec;

/// Cursor over a token list. Positions index the raw stream, comments
/// included, so snapshots restore exactly.
pub(crate) struct Cursor<'a> {
    tokens: &'a TokenList,
    pos: usize,
}

impl<'a> Cursor<'a> {
    /// Create a cursor at the start of the stream.
    pub(crate) fn new(tokens: &'a TokenList) -> Self {
        debug_assert!(
            tokens.get(tokens.len().wrapping_sub(1)).is_some_and(|t| t.kind == TokenKind::Eof),
            "token list must be Eof-terminated"
        );
        Cursor { tokens, pos: 0 }
    }

    /// Raw position in the stream (comments included).
    #[inline]
    pub(crate) fn pos(&self) -> usize {
        self.pos
    }

    /// Restore a position taken from [`pos`](Self::pos).
    #[inline]
    pub(crate) fn set_pos(&mut self, pos: usize) {
        debug_assert!(pos < self.tokens.len() || pos == self.tokens.len().saturating_sub(1) + 1);
        self.pos = pos.min(self.tokens.len() - 1);
    }

    /// Index of the first non-comment token at or after `pos`.
    #[inline]
    fn significant_index(&self) -> usize {
        let mut i = self.pos;
        while self.tokens[i].kind == TokenKind::Comment {
            i += 1;
        }
        i
    }

    /// The current significant token (looking through comments).
    #[inline]
    pub(crate) fn current(&self) -> &Token {
        &self.tokens[self.significant_index()]
    }

    /// The significant token after the current one.
    pub(crate) fn peek(&self) -> &Token {
        let mut i = self.significant_index() + 1;
        while i < self.tokens.len() && self.tokens[i].kind == TokenKind::Comment {
            i += 1;
        }
        &self.tokens[i.min(self.tokens.len() - 1)]
    }

    /// The current significant token and the token physically next to it,
    /// for span-adjacency checks (`[[`, `]]`).
    pub(crate) fn current_pair(&self) -> (&Token, &Token) {
        let i = self.significant_index();
        let j = (i + 1).min(self.tokens.len() - 1);
        (&self.tokens[i], &self.tokens[j])
    }

    /// Take the comments sitting between the raw position and the current
    /// significant token; the caller attaches them to the tree.
    pub(crate) fn take_leading_trivia(&mut self) -> SmallVec<[Token; 2]> {
        let mut trivia = SmallVec::new();
        while self.tokens[self.pos].kind == TokenKind::Comment {
            trivia.push(self.tokens[self.pos]);
            self.pos += 1;
        }
        trivia
    }

    /// Consume and return the current token.
    ///
    /// The caller must have drained leading trivia first (the `bump`
    /// helpers do); the last `Eof` token is never consumed.
    #[inline]
    pub(crate) fn advance(&mut self) -> Token {
        debug_assert_ne!(self.tokens[self.pos].kind, TokenKind::Comment, "trivia not drained");
        let token = self.tokens[self.pos];
        if token.kind != TokenKind::Eof {
            self.pos += 1;
        }
        token
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use csyn_ir::Span;

    fn token_list(kinds: &[TokenKind]) -> TokenList {
        let mut list = TokenList::new();
        for (i, &kind) in kinds.iter().enumerate() {
            let at = u32::try_from(i).unwrap_or(u32::MAX);
            list.push(Token::new(kind, Span::new(at, at + 1)));
        }
        let end = u32::try_from(kinds.len()).unwrap_or(u32::MAX);
        list.finish(end);
        list
    }

    #[test]
    fn test_inspection_skips_comments() {
        let tokens = token_list(&[TokenKind::Comment, TokenKind::Identifier, TokenKind::Comment]);
        let cursor = Cursor::new(&tokens);
        assert_eq!(cursor.current().kind, TokenKind::Identifier);
        assert_eq!(cursor.peek().kind, TokenKind::Eof);
    }

    #[test]
    fn test_take_leading_trivia() {
        let tokens = token_list(&[TokenKind::Comment, TokenKind::Comment, TokenKind::Identifier]);
        let mut cursor = Cursor::new(&tokens);
        let trivia = cursor.take_leading_trivia();
        assert_eq!(trivia.len(), 2);
        assert_eq!(cursor.advance().kind, TokenKind::Identifier);
    }

    #[test]
    fn test_advance_stops_at_eof() {
        let tokens = token_list(&[TokenKind::Semicolon]);
        let mut cursor = Cursor::new(&tokens);
        assert_eq!(cursor.advance().kind, TokenKind::Semicolon);
        assert_eq!(cursor.advance().kind, TokenKind::Eof);
        assert_eq!(cursor.advance().kind, TokenKind::Eof);
    }

    #[test]
    fn test_adjacency_pair() {
        let mut list = TokenList::new();
        list.push(Token::new(TokenKind::LBracket, Span::new(0, 1)));
        list.push(Token::new(TokenKind::LBracket, Span::new(1, 2)));
        list.finish(2);
        let cursor = Cursor::new(&list);
        let (a, b) = cursor.current_pair();
        assert_eq!((a.kind, b.kind), (TokenKind::LBracket, TokenKind::LBracket));
        assert_eq!(a.span.end, b.span.start);
    }
}
