//! The four declarator families.
//!
//! A declarator is a base wrapped in zero or more derivation layers
//! (pointer-to, array-of, function-returning, grouping, attributes). The
//! grammar defines the same wrapper shapes once per syntactic context,
//! because only the context determines what the base identifier may be:
//!
//! | Context  | Base                                    |
//! |----------|-----------------------------------------|
//! | Ordinary | `identifier`                            |
//! | Field    | `field_identifier`                      |
//! | Type     | `type_identifier` or a primitive type   |
//! | Abstract | none (the inner declarator is optional) |
//!
//! The table here is the parameterized generator: the parser asks a
//! [`DeclaratorContext`] for its wrapper rules and base kind instead of
//! duplicating the algorithm four times.

use csyn_ir::{NodeKind, Supertype};

use crate::rules::RuleName;

/// Which declarator family is being parsed.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum DeclaratorContext {
    /// Declarations, parameters, function definitions.
    Ordinary,
    /// Struct/union member lists.
    Field,
    /// `typedef` targets.
    Type,
    /// Unnamed: cast/sizeof type descriptors, anonymous parameters.
    Abstract,
}

/// A wrapper shape shared by all families.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Wrapper {
    Pointer,
    Array,
    Function,
    Parenthesized,
    Attributed,
}

impl DeclaratorContext {
    /// All four families, for symmetry checks.
    pub const ALL: [DeclaratorContext; 4] = [
        DeclaratorContext::Ordinary,
        DeclaratorContext::Field,
        DeclaratorContext::Type,
        DeclaratorContext::Abstract,
    ];

    /// The wrapper shapes every family defines. `Attributed` exists for the
    /// named families only.
    pub const WRAPPERS: [Wrapper; 5] = [
        Wrapper::Pointer,
        Wrapper::Array,
        Wrapper::Function,
        Wrapper::Parenthesized,
        Wrapper::Attributed,
    ];

    /// The production implementing `wrapper` in this family, if the family
    /// has it.
    pub const fn wrapper_rule(self, wrapper: Wrapper) -> Option<RuleName> {
        use DeclaratorContext as C;
        use RuleName as R;
        Some(match (self, wrapper) {
            (C::Ordinary, Wrapper::Pointer) => R::PointerDeclarator,
            (C::Ordinary, Wrapper::Array) => R::ArrayDeclarator,
            (C::Ordinary, Wrapper::Function) => R::FunctionDeclarator,
            (C::Ordinary, Wrapper::Parenthesized) => R::ParenthesizedDeclarator,
            (C::Ordinary, Wrapper::Attributed) => R::AttributedDeclarator,
            (C::Field, Wrapper::Pointer) => R::PointerFieldDeclarator,
            (C::Field, Wrapper::Array) => R::ArrayFieldDeclarator,
            (C::Field, Wrapper::Function) => R::FunctionFieldDeclarator,
            (C::Field, Wrapper::Parenthesized) => R::ParenthesizedFieldDeclarator,
            (C::Field, Wrapper::Attributed) => R::AttributedFieldDeclarator,
            (C::Type, Wrapper::Pointer) => R::PointerTypeDeclarator,
            (C::Type, Wrapper::Array) => R::ArrayTypeDeclarator,
            (C::Type, Wrapper::Function) => R::FunctionTypeDeclarator,
            (C::Type, Wrapper::Parenthesized) => R::ParenthesizedTypeDeclarator,
            (C::Type, Wrapper::Attributed) => R::AttributedTypeDeclarator,
            (C::Abstract, Wrapper::Pointer) => R::AbstractPointerDeclarator,
            (C::Abstract, Wrapper::Array) => R::AbstractArrayDeclarator,
            (C::Abstract, Wrapper::Function) => R::AbstractFunctionDeclarator,
            (C::Abstract, Wrapper::Parenthesized) => R::AbstractParenthesizedDeclarator,
            (C::Abstract, Wrapper::Attributed) => return None,
        })
    }

    /// Node kind for the base identifier, `None` in the abstract family.
    pub const fn base_kind(self) -> Option<NodeKind> {
        match self {
            DeclaratorContext::Ordinary => Some(NodeKind::Identifier),
            DeclaratorContext::Field => Some(NodeKind::FieldIdentifier),
            DeclaratorContext::Type => Some(NodeKind::TypeIdentifier),
            DeclaratorContext::Abstract => None,
        }
    }

    /// Whether the innermost declarator may be missing entirely.
    pub const fn allows_missing_inner(self) -> bool {
        matches!(self, DeclaratorContext::Abstract)
    }

    /// The supertype collecting this family's shapes.
    pub const fn supertype(self) -> Supertype {
        match self {
            DeclaratorContext::Ordinary => Supertype::Declarator,
            DeclaratorContext::Field => Supertype::FieldDeclarator,
            DeclaratorContext::Type => Supertype::TypeDeclarator,
            DeclaratorContext::Abstract => Supertype::AbstractDeclarator,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_family_symmetry() {
        // Every structural wrapper exists in every family; `Attributed` is
        // the one deliberate asymmetry (no abstract form).
        for ctx in DeclaratorContext::ALL {
            for wrapper in [
                Wrapper::Pointer,
                Wrapper::Array,
                Wrapper::Function,
                Wrapper::Parenthesized,
            ] {
                assert!(
                    ctx.wrapper_rule(wrapper).is_some(),
                    "{ctx:?} missing {wrapper:?}"
                );
            }
        }
        assert!(DeclaratorContext::Ordinary
            .wrapper_rule(Wrapper::Attributed)
            .is_some());
        assert!(DeclaratorContext::Abstract
            .wrapper_rule(Wrapper::Attributed)
            .is_none());
    }

    #[test]
    fn test_wrapper_rules_are_distinct_across_families() {
        let mut seen = Vec::new();
        for ctx in DeclaratorContext::ALL {
            for wrapper in DeclaratorContext::WRAPPERS {
                if let Some(rule) = ctx.wrapper_rule(wrapper) {
                    assert!(!seen.contains(&rule), "{rule:?} reused");
                    seen.push(rule);
                }
            }
        }
    }

    #[test]
    fn test_wrapper_visible_kinds_collapse_named_families() {
        // The three named families materialize under the same kinds…
        for wrapper in DeclaratorContext::WRAPPERS {
            let visible: Vec<_> = [
                DeclaratorContext::Ordinary,
                DeclaratorContext::Field,
                DeclaratorContext::Type,
            ]
            .iter()
            .filter_map(|ctx| ctx.wrapper_rule(wrapper))
            .map(RuleName::visible_kind)
            .collect();
            assert!(visible.windows(2).all(|w| w[0] == w[1]), "{wrapper:?}");
        }
        // …while the abstract family keeps distinct kinds.
        assert_ne!(
            DeclaratorContext::Abstract
                .wrapper_rule(Wrapper::Pointer)
                .and_then(RuleName::visible_kind),
            DeclaratorContext::Ordinary
                .wrapper_rule(Wrapper::Pointer)
                .and_then(RuleName::visible_kind),
        );
    }

    #[test]
    fn test_base_kinds() {
        assert_eq!(
            DeclaratorContext::Ordinary.base_kind(),
            Some(NodeKind::Identifier)
        );
        assert_eq!(
            DeclaratorContext::Field.base_kind(),
            Some(NodeKind::FieldIdentifier)
        );
        assert_eq!(
            DeclaratorContext::Type.base_kind(),
            Some(NodeKind::TypeIdentifier)
        );
        assert_eq!(DeclaratorContext::Abstract.base_kind(), None);
        assert!(DeclaratorContext::Abstract.allows_missing_inner());
        assert!(!DeclaratorContext::Ordinary.allows_missing_inner());
    }

    #[test]
    fn test_pointer_wrappers_prefer_the_declarator_reading() {
        for ctx in DeclaratorContext::ALL {
            let Some(rule) = ctx.wrapper_rule(Wrapper::Pointer) else {
                panic!("{ctx:?} missing pointer wrapper");
            };
            assert!(rule.dynamic_precedence() > 0, "{rule:?}");
        }
    }
}
