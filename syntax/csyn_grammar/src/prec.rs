//! Static operator precedence.
//!
//! One ladder, lowest to tightest binding. Binary operators are
//! left-associative; assignment and the conditional are right-associative.
//! `CAST` sits strictly between `MULTIPLY` and `SIZEOF` so that `(T)-x`
//! reads as a cast of a negation rather than a subtraction.
//!
//! The negative slots are deliberate: `PAREN_DECLARATOR` ranks a grouped
//! declarator below every expression reading of the same parentheses, and
//! assignment/conditional bind looser than all binary operators.

use csyn_ir::TokenKind;

pub const PAREN_DECLARATOR: i32 = -10;
pub const ASSIGNMENT: i32 = -2;
pub const CONDITIONAL: i32 = -1;
pub const DEFAULT: i32 = 0;
pub const LOGICAL_OR: i32 = 1;
pub const LOGICAL_AND: i32 = 2;
pub const INCLUSIVE_OR: i32 = 3;
pub const EXCLUSIVE_OR: i32 = 4;
pub const BITWISE_AND: i32 = 5;
pub const EQUAL: i32 = 6;
pub const RELATIONAL: i32 = 7;
pub const OFFSETOF: i32 = 8;
pub const SHIFT: i32 = 9;
pub const ADD: i32 = 10;
pub const MULTIPLY: i32 = 11;
pub const CAST: i32 = 12;
pub const SIZEOF: i32 = 13;
pub const UNARY: i32 = 14;
pub const CALL: i32 = 15;
pub const FIELD: i32 = 16;
pub const SUBSCRIPT: i32 = 17;

/// The ladder in binding order, for validation.
pub const LADDER: &[i32] = &[
    PAREN_DECLARATOR,
    ASSIGNMENT,
    CONDITIONAL,
    DEFAULT,
    LOGICAL_OR,
    LOGICAL_AND,
    INCLUSIVE_OR,
    EXCLUSIVE_OR,
    BITWISE_AND,
    EQUAL,
    RELATIONAL,
    OFFSETOF,
    SHIFT,
    ADD,
    MULTIPLY,
    CAST,
    SIZEOF,
    UNARY,
    CALL,
    FIELD,
    SUBSCRIPT,
];

/// Associativity of an infix production.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Assoc {
    Left,
    Right,
}

/// Binding strength of a binary operator token, if it is one.
pub const fn binary_precedence(op: TokenKind) -> Option<i32> {
    Some(match op {
        TokenKind::PipePipe => LOGICAL_OR,
        TokenKind::AmpAmp => LOGICAL_AND,
        TokenKind::Pipe => INCLUSIVE_OR,
        TokenKind::Caret => EXCLUSIVE_OR,
        TokenKind::Amp => BITWISE_AND,
        TokenKind::EqEq | TokenKind::BangEq => EQUAL,
        TokenKind::Lt | TokenKind::Gt | TokenKind::LtEq | TokenKind::GtEq => RELATIONAL,
        TokenKind::Shl | TokenKind::Shr => SHIFT,
        TokenKind::Plus | TokenKind::Minus => ADD,
        TokenKind::Star | TokenKind::Slash | TokenKind::Percent => MULTIPLY,
        _ => return None,
    })
}

/// Whether `op` is one of the assignment operators.
pub const fn is_assignment_operator(op: TokenKind) -> bool {
    matches!(
        op,
        TokenKind::Eq
            | TokenKind::StarEq
            | TokenKind::SlashEq
            | TokenKind::PercentEq
            | TokenKind::PlusEq
            | TokenKind::MinusEq
            | TokenKind::ShlEq
            | TokenKind::ShrEq
            | TokenKind::AmpEq
            | TokenKind::CaretEq
            | TokenKind::PipeEq
    )
}

/// Associativity of an infix production at the given precedence.
pub const fn associativity(precedence: i32) -> Assoc {
    if precedence == ASSIGNMENT || precedence == CONDITIONAL {
        Assoc::Right
    } else {
        Assoc::Left
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ladder_strictly_increasing() {
        for pair in LADDER.windows(2) {
            assert!(pair[0] < pair[1], "{} !< {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_cast_sits_between_multiply_and_sizeof() {
        assert!(MULTIPLY < CAST);
        assert!(CAST < SIZEOF);
        assert!(SIZEOF < UNARY);
    }

    #[test]
    fn test_binary_operator_table() {
        assert_eq!(binary_precedence(TokenKind::Star), Some(MULTIPLY));
        assert_eq!(binary_precedence(TokenKind::Plus), Some(ADD));
        assert_eq!(binary_precedence(TokenKind::Lt), Some(RELATIONAL));
        assert_eq!(binary_precedence(TokenKind::EqEq), Some(EQUAL));
        assert_eq!(binary_precedence(TokenKind::Eq), None);
        assert_eq!(binary_precedence(TokenKind::Bang), None);
        // Relational binds tighter than equality.
        assert!(RELATIONAL > EQUAL);
    }

    #[test]
    fn test_associativity() {
        assert_eq!(associativity(ASSIGNMENT), Assoc::Right);
        assert_eq!(associativity(CONDITIONAL), Assoc::Right);
        assert_eq!(associativity(ADD), Assoc::Left);
        assert_eq!(associativity(MULTIPLY), Assoc::Left);
    }

    #[test]
    fn test_assignment_operators() {
        assert!(is_assignment_operator(TokenKind::Eq));
        assert!(is_assignment_operator(TokenKind::ShlEq));
        assert!(!is_assignment_operator(TokenKind::EqEq));
    }
}
