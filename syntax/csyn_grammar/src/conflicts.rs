//! Declared conflict sets.
//!
//! Each set names the productions allowed to compete for one input span.
//! The parser may only fork at a declared set; observing ambiguity anywhere
//! else is a grammar defect, not a runtime condition. Single-rule sets mark
//! productions that conflict with themselves across nesting (an `#else`
//! body can open another conditional of the same shape before the matching
//! `#endif` arrives).

use crate::rules::RuleName;

/// Every conflict position the grammar declares.
pub const CONFLICT_SETS: &[&[RuleName]] = &[
    // The typedef-vs-declarator ambiguity: `T *p;`.
    &[RuleName::TypeSpecifier, RuleName::Declarator],
    &[
        RuleName::TypeSpecifier,
        RuleName::Declarator,
        RuleName::MacroTypeSpecifier,
    ],
    // A parenthesized name may open a cast, a call or a grouping.
    &[RuleName::TypeSpecifier, RuleName::Expression],
    &[
        RuleName::TypeSpecifier,
        RuleName::Expression,
        RuleName::MacroTypeSpecifier,
    ],
    &[RuleName::TypeSpecifier, RuleName::MacroTypeSpecifier],
    // `unsigned T` vs `unsigned` + declarator `T`.
    &[RuleName::TypeSpecifier, RuleName::SizedTypeSpecifier],
    &[RuleName::SizedTypeSpecifier],
    &[RuleName::AttributedStatement],
    &[RuleName::DeclarationModifiers, RuleName::AttributedStatement],
    &[RuleName::EnumSpecifier],
    // K&R parameter identifiers vs a parameter type.
    &[RuleName::TypeSpecifier, RuleName::OldStyleParameterList],
    &[RuleName::ParameterList, RuleName::OldStyleParameterList],
    &[
        RuleName::FunctionDeclarator,
        RuleName::FunctionDeclarationDeclarator,
    ],
    &[RuleName::BlockItem, RuleName::Statement],
    &[RuleName::TopLevelItem, RuleName::TopLevelStatement],
    &[
        RuleName::TypeSpecifier,
        RuleName::TopLevelExpressionStatement,
    ],
    &[RuleName::TypeQualifier, RuleName::ExtensionExpression],
    // Conditional alternatives self-conflict across nesting, per context.
    &[RuleName::PreprocElse],
    &[RuleName::PreprocElseInFieldDeclarationList],
    &[RuleName::PreprocElif],
    &[RuleName::PreprocElifInFieldDeclarationList],
    &[RuleName::PreprocElifInEnumeratorList],
    &[RuleName::PreprocElifInEnumeratorListNoComma],
    &[RuleName::PreprocElifdef],
    &[RuleName::PreprocElifdefInFieldDeclarationList],
    &[RuleName::PreprocElifdefInEnumeratorList],
    &[RuleName::PreprocElifdefInEnumeratorListNoComma],
];

/// Whether `set` (in any order) is one of the declared conflict sets.
pub fn is_declared(set: &[RuleName]) -> bool {
    CONFLICT_SETS.iter().any(|declared| {
        declared.len() == set.len()
            && set.iter().all(|rule| declared.contains(rule))
            && declared.iter().all(|rule| set.contains(rule))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declared_sets_match_in_any_order() {
        assert!(is_declared(&[
            RuleName::TypeSpecifier,
            RuleName::Declarator
        ]));
        assert!(is_declared(&[
            RuleName::Declarator,
            RuleName::TypeSpecifier
        ]));
        assert!(is_declared(&[RuleName::BlockItem, RuleName::Statement]));
        assert!(is_declared(&[RuleName::PreprocElif]));
    }

    #[test]
    fn test_undeclared_sets_are_rejected() {
        assert!(!is_declared(&[
            RuleName::Expression,
            RuleName::Statement
        ]));
        assert!(!is_declared(&[RuleName::TypeSpecifier]));
        assert!(!is_declared(&[]));
    }

    #[test]
    fn test_sets_are_unique_and_nonempty() {
        for (i, a) in CONFLICT_SETS.iter().enumerate() {
            assert!(!a.is_empty());
            for b in &CONFLICT_SETS[i + 1..] {
                let same = a.len() == b.len() && a.iter().all(|r| b.contains(r));
                assert!(!same, "duplicate conflict set {a:?}");
            }
        }
    }

    #[test]
    fn test_no_duplicate_rules_within_a_set() {
        for set in CONFLICT_SETS {
            for (i, a) in set.iter().enumerate() {
                assert!(!set[i + 1..].contains(a), "{a:?} repeated in {set:?}");
            }
        }
    }
}
