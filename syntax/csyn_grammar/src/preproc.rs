//! The preprocessor-conditional template and its four instantiations.
//!
//! Conditional compilation must be syntactically legal wherever items can
//! appear, and what counts as an "item" differs per position: block items,
//! struct/union field declarations, enumerators followed by a comma, and
//! enumerators without one (the final entry of a list). The conditional
//! shape is defined once; [`PreprocContext`] supplies the per-instantiation
//! node kinds and the precedence that makes the no-comma enumerator variant
//! yield to the comma form when both apply.

use csyn_ir::NodeKind;

use crate::rules::RuleName;

/// Which content grammar a conditional instantiation wraps.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum PreprocContext {
    /// Top level and function bodies.
    BlockItem,
    /// Struct/union field declaration lists.
    FieldDeclarationList,
    /// Enumerator lists, each entry followed by `,`.
    EnumeratorList,
    /// Enumerator lists, entries without a trailing `,`.
    EnumeratorListNoComma,
}

impl PreprocContext {
    /// All instantiations, for parity checks.
    pub const ALL: [PreprocContext; 4] = [
        PreprocContext::BlockItem,
        PreprocContext::FieldDeclarationList,
        PreprocContext::EnumeratorList,
        PreprocContext::EnumeratorListNoComma,
    ];

    /// Node kind of the `#if` production in this context.
    pub const fn if_kind(self) -> NodeKind {
        match self {
            PreprocContext::BlockItem => NodeKind::PreprocIf,
            PreprocContext::FieldDeclarationList => NodeKind::PreprocIfInFieldDeclarationList,
            PreprocContext::EnumeratorList => NodeKind::PreprocIfInEnumeratorList,
            PreprocContext::EnumeratorListNoComma => NodeKind::PreprocIfInEnumeratorListNoComma,
        }
    }

    /// Node kind of the `#ifdef`/`#ifndef` production in this context.
    pub const fn ifdef_kind(self) -> NodeKind {
        match self {
            PreprocContext::BlockItem => NodeKind::PreprocIfdef,
            PreprocContext::FieldDeclarationList => NodeKind::PreprocIfdefInFieldDeclarationList,
            PreprocContext::EnumeratorList => NodeKind::PreprocIfdefInEnumeratorList,
            PreprocContext::EnumeratorListNoComma => NodeKind::PreprocIfdefInEnumeratorListNoComma,
        }
    }

    /// Node kind of the `#else` production in this context.
    pub const fn else_kind(self) -> NodeKind {
        match self {
            PreprocContext::BlockItem => NodeKind::PreprocElse,
            PreprocContext::FieldDeclarationList => NodeKind::PreprocElseInFieldDeclarationList,
            PreprocContext::EnumeratorList => NodeKind::PreprocElseInEnumeratorList,
            PreprocContext::EnumeratorListNoComma => NodeKind::PreprocElseInEnumeratorListNoComma,
        }
    }

    /// Node kind of the `#elif` production in this context.
    pub const fn elif_kind(self) -> NodeKind {
        match self {
            PreprocContext::BlockItem => NodeKind::PreprocElif,
            PreprocContext::FieldDeclarationList => NodeKind::PreprocElifInFieldDeclarationList,
            PreprocContext::EnumeratorList => NodeKind::PreprocElifInEnumeratorList,
            PreprocContext::EnumeratorListNoComma => NodeKind::PreprocElifInEnumeratorListNoComma,
        }
    }

    /// Node kind of the `#elifdef`/`#elifndef` production in this context.
    pub const fn elifdef_kind(self) -> NodeKind {
        match self {
            PreprocContext::BlockItem => NodeKind::PreprocElifdef,
            PreprocContext::FieldDeclarationList => NodeKind::PreprocElifdefInFieldDeclarationList,
            PreprocContext::EnumeratorList => NodeKind::PreprocElifdefInEnumeratorList,
            PreprocContext::EnumeratorListNoComma => {
                NodeKind::PreprocElifdefInEnumeratorListNoComma
            }
        }
    }

    /// The `#elif` rule, for conflict-set assertions at fork sites.
    pub const fn elif_rule(self) -> RuleName {
        match self {
            PreprocContext::BlockItem => RuleName::PreprocElif,
            PreprocContext::FieldDeclarationList => RuleName::PreprocElifInFieldDeclarationList,
            PreprocContext::EnumeratorList => RuleName::PreprocElifInEnumeratorList,
            PreprocContext::EnumeratorListNoComma => RuleName::PreprocElifInEnumeratorListNoComma,
        }
    }

    /// Static precedence of the instantiation; the no-comma enumerator
    /// variant ranks below the comma form.
    pub const fn static_precedence(self) -> i32 {
        match self {
            PreprocContext::EnumeratorListNoComma => -1,
            _ => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instantiations_have_distinct_kinds() {
        let mut kinds = Vec::new();
        for ctx in PreprocContext::ALL {
            for kind in [
                ctx.if_kind(),
                ctx.ifdef_kind(),
                ctx.else_kind(),
                ctx.elif_kind(),
                ctx.elifdef_kind(),
            ] {
                assert!(!kinds.contains(&kind), "{kind:?} reused");
                kinds.push(kind);
            }
        }
        assert_eq!(kinds.len(), 20);
    }

    #[test]
    fn test_all_kinds_are_conditionals() {
        for ctx in PreprocContext::ALL {
            assert!(ctx.if_kind().is_preproc_conditional());
            assert!(ctx.elifdef_kind().is_preproc_conditional());
        }
    }

    #[test]
    fn test_no_comma_variant_yields() {
        assert_eq!(PreprocContext::EnumeratorList.static_precedence(), 0);
        assert_eq!(PreprocContext::EnumeratorListNoComma.static_precedence(), -1);
    }

    #[test]
    fn test_elif_rules_are_declared_self_conflicts() {
        for ctx in PreprocContext::ALL {
            assert!(crate::conflicts::is_declared(&[ctx.elif_rule()]));
        }
    }
}
