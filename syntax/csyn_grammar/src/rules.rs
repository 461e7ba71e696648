//! The production inventory.
//!
//! Every production has a [`RuleName`], including hidden rules (never
//! materialized in the tree), aliased rules (materialized under another
//! kind) and the context-duplicated declarator and preprocessor families.
//! [`RuleName::visible_kind`] is the single source of truth for what a rule
//! contributes to the tree:
//!
//! - `None` — transparent: the rule's children splice into its parent
//!   (choice supertypes, item dispatchers, inlined helpers);
//! - `Some(kind)` — the rule materializes as `kind`, which for aliased
//!   rules differs from the rule's own name (a `pointer_field_declarator`
//!   appears in the tree as a plain `pointer_declarator`; only its base
//!   identifier reveals the context).
//!
//! [`RuleName::dynamic_precedence`] carries the tie-break scores consulted
//! when several complete derivations cover one span (§ conflict policy).

use csyn_ir::{NodeKind, Supertype};

use crate::prec;

/// Name of a grammar production.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, PartialOrd, Ord)]
#[allow(clippy::enum_variant_names)]
pub enum RuleName {
    TranslationUnit,
    TopLevelItem,
    BlockItem,

    // Preprocessor
    PreprocInclude,
    PreprocDef,
    PreprocFunctionDef,
    PreprocParams,
    PreprocCall,
    PreprocDirective,
    PreprocArg,
    PreprocExpression,
    PreprocParenthesizedExpression,
    PreprocDefined,
    PreprocUnaryExpression,
    PreprocCallExpression,
    PreprocArgumentList,
    PreprocBinaryExpression,
    // Conditional template, four instantiations
    PreprocIf,
    PreprocIfdef,
    PreprocElse,
    PreprocElif,
    PreprocElifdef,
    PreprocIfInFieldDeclarationList,
    PreprocIfdefInFieldDeclarationList,
    PreprocElseInFieldDeclarationList,
    PreprocElifInFieldDeclarationList,
    PreprocElifdefInFieldDeclarationList,
    PreprocIfInEnumeratorList,
    PreprocIfdefInEnumeratorList,
    PreprocElseInEnumeratorList,
    PreprocElifInEnumeratorList,
    PreprocElifdefInEnumeratorList,
    PreprocIfInEnumeratorListNoComma,
    PreprocIfdefInEnumeratorListNoComma,
    PreprocElseInEnumeratorListNoComma,
    PreprocElifInEnumeratorListNoComma,
    PreprocElifdefInEnumeratorListNoComma,

    // Definitions and declarations
    FunctionDefinition,
    OldStyleFunctionDefinition,
    Declaration,
    TypeDefinition,
    TypeDefinitionType,
    TypeDefinitionDeclarators,
    DeclarationModifiers,
    DeclarationSpecifiers,
    LinkageSpecification,
    AttributeSpecifier,
    Attribute,
    AttributeDeclaration,
    MsDeclspecModifier,
    MsBasedModifier,
    MsCallModifier,
    MsRestrictModifier,
    MsUnsignedPtrModifier,
    MsSignedPtrModifier,
    MsUnalignedPtrModifier,
    MsPointerModifier,
    DeclarationList,
    InitDeclarator,
    StorageClassSpecifier,
    TypeQualifier,
    AlignasQualifier,
    EmptyDeclaration,

    // Declarator families
    Declarator,
    DeclarationDeclarator,
    FieldDeclarator,
    TypeDeclarator,
    AbstractDeclarator,
    PointerDeclarator,
    PointerFieldDeclarator,
    PointerTypeDeclarator,
    AbstractPointerDeclarator,
    FunctionDeclarator,
    FunctionDeclarationDeclarator,
    FunctionFieldDeclarator,
    FunctionTypeDeclarator,
    AbstractFunctionDeclarator,
    OldStyleFunctionDeclarator,
    ArrayDeclarator,
    ArrayFieldDeclarator,
    ArrayTypeDeclarator,
    AbstractArrayDeclarator,
    ParenthesizedDeclarator,
    ParenthesizedFieldDeclarator,
    ParenthesizedTypeDeclarator,
    AbstractParenthesizedDeclarator,
    AttributedDeclarator,
    AttributedFieldDeclarator,
    AttributedTypeDeclarator,

    // Types
    TypeSpecifier,
    SizedTypeSpecifier,
    PrimitiveType,
    StructSpecifier,
    UnionSpecifier,
    EnumSpecifier,
    EnumeratorList,
    Enumerator,
    FieldDeclarationList,
    FieldDeclarationListItem,
    FieldDeclaration,
    FieldDeclarationDeclarator,
    BitfieldClause,
    MacroTypeSpecifier,
    TypeDescriptor,

    // Parameters
    ParameterList,
    OldStyleParameterList,
    ParameterDeclaration,
    VariadicParameter,

    // Statements
    Statement,
    NonCaseStatement,
    TopLevelStatement,
    TopLevelExpressionStatement,
    CompoundStatement,
    ExpressionStatement,
    IfStatement,
    ElseClause,
    SwitchStatement,
    CaseStatement,
    WhileStatement,
    DoStatement,
    ForStatement,
    ForStatementBody,
    ReturnStatement,
    BreakStatement,
    ContinueStatement,
    GotoStatement,
    LabeledStatement,
    AttributedStatement,
    SehTryStatement,
    SehExceptClause,
    SehFinallyClause,
    SehLeaveStatement,

    // Expressions
    Expression,
    ExpressionNotBinary,
    AssignmentLeftExpression,
    ConditionalExpression,
    AssignmentExpression,
    BinaryExpression,
    UnaryExpression,
    UpdateExpression,
    CastExpression,
    PointerExpression,
    SizeofExpression,
    AlignofExpression,
    OffsetofExpression,
    GenericExpression,
    SubscriptExpression,
    CallExpression,
    FieldExpression,
    CompoundLiteralExpression,
    ParenthesizedExpression,
    CommaExpression,
    ExtensionExpression,
    ArgumentList,
    InitializerList,
    InitializerPair,
    SubscriptDesignator,
    SubscriptRangeDesignator,
    FieldDesignator,
    String,
    ConcatenatedString,
    StringLiteral,
    CharLiteral,
    NumberLiteral,
    Identifier,
    TypeIdentifier,
    FieldIdentifier,
    StatementIdentifier,
    True,
    False,
    Null,

    // GNU inline assembly
    GnuAsmExpression,
    GnuAsmQualifier,
    GnuAsmOutputOperandList,
    GnuAsmOutputOperand,
    GnuAsmInputOperandList,
    GnuAsmInputOperand,
    GnuAsmClobberList,
    GnuAsmGotoList,

    SystemLibString,
    Comment,
}

impl RuleName {
    /// The node kind this rule materializes as, or `None` for transparent
    /// rules whose children splice into the parent.
    #[allow(clippy::too_many_lines)]
    pub const fn visible_kind(self) -> Option<NodeKind> {
        use NodeKind as N;
        use RuleName as R;
        Some(match self {
            // Transparent: supertype choices, dispatchers, inlined helpers.
            R::TopLevelItem
            | R::BlockItem
            | R::Statement
            | R::NonCaseStatement
            | R::TopLevelStatement
            | R::Expression
            | R::ExpressionNotBinary
            | R::AssignmentLeftExpression
            | R::TypeSpecifier
            | R::Declarator
            | R::DeclarationDeclarator
            | R::FieldDeclarator
            | R::TypeDeclarator
            | R::AbstractDeclarator
            | R::DeclarationModifiers
            | R::DeclarationSpecifiers
            | R::TypeDefinitionType
            | R::TypeDefinitionDeclarators
            | R::FieldDeclarationListItem
            | R::FieldDeclarationDeclarator
            | R::ForStatementBody
            | R::EmptyDeclaration
            | R::PreprocExpression
            | R::String => return None,

            // Aliased: materialize under a different kind.
            R::OldStyleFunctionDefinition => N::FunctionDefinition,
            R::OldStyleFunctionDeclarator | R::FunctionDeclarationDeclarator => {
                N::FunctionDeclarator
            }
            R::OldStyleParameterList => N::ParameterList,
            R::TopLevelExpressionStatement => N::ExpressionStatement,
            R::PointerFieldDeclarator | R::PointerTypeDeclarator => N::PointerDeclarator,
            R::FunctionFieldDeclarator | R::FunctionTypeDeclarator => N::FunctionDeclarator,
            R::ArrayFieldDeclarator | R::ArrayTypeDeclarator => N::ArrayDeclarator,
            R::ParenthesizedFieldDeclarator | R::ParenthesizedTypeDeclarator => {
                N::ParenthesizedDeclarator
            }
            R::AttributedFieldDeclarator | R::AttributedTypeDeclarator => N::AttributedDeclarator,
            R::PreprocUnaryExpression => N::UnaryExpression,
            R::PreprocCallExpression => N::CallExpression,
            R::PreprocArgumentList => N::ArgumentList,
            R::PreprocBinaryExpression => N::BinaryExpression,
            R::PreprocParenthesizedExpression => N::ParenthesizedExpression,

            // One-to-one.
            R::TranslationUnit => N::TranslationUnit,
            R::PreprocInclude => N::PreprocInclude,
            R::PreprocDef => N::PreprocDef,
            R::PreprocFunctionDef => N::PreprocFunctionDef,
            R::PreprocParams => N::PreprocParams,
            R::PreprocCall => N::PreprocCall,
            R::PreprocDirective => N::PreprocDirective,
            R::PreprocArg => N::PreprocArg,
            R::PreprocDefined => N::PreprocDefined,
            R::PreprocIf => N::PreprocIf,
            R::PreprocIfdef => N::PreprocIfdef,
            R::PreprocElse => N::PreprocElse,
            R::PreprocElif => N::PreprocElif,
            R::PreprocElifdef => N::PreprocElifdef,
            R::PreprocIfInFieldDeclarationList => N::PreprocIfInFieldDeclarationList,
            R::PreprocIfdefInFieldDeclarationList => N::PreprocIfdefInFieldDeclarationList,
            R::PreprocElseInFieldDeclarationList => N::PreprocElseInFieldDeclarationList,
            R::PreprocElifInFieldDeclarationList => N::PreprocElifInFieldDeclarationList,
            R::PreprocElifdefInFieldDeclarationList => N::PreprocElifdefInFieldDeclarationList,
            R::PreprocIfInEnumeratorList => N::PreprocIfInEnumeratorList,
            R::PreprocIfdefInEnumeratorList => N::PreprocIfdefInEnumeratorList,
            R::PreprocElseInEnumeratorList => N::PreprocElseInEnumeratorList,
            R::PreprocElifInEnumeratorList => N::PreprocElifInEnumeratorList,
            R::PreprocElifdefInEnumeratorList => N::PreprocElifdefInEnumeratorList,
            R::PreprocIfInEnumeratorListNoComma => N::PreprocIfInEnumeratorListNoComma,
            R::PreprocIfdefInEnumeratorListNoComma => N::PreprocIfdefInEnumeratorListNoComma,
            R::PreprocElseInEnumeratorListNoComma => N::PreprocElseInEnumeratorListNoComma,
            R::PreprocElifInEnumeratorListNoComma => N::PreprocElifInEnumeratorListNoComma,
            R::PreprocElifdefInEnumeratorListNoComma => N::PreprocElifdefInEnumeratorListNoComma,
            R::FunctionDefinition => N::FunctionDefinition,
            R::Declaration => N::Declaration,
            R::TypeDefinition => N::TypeDefinition,
            R::LinkageSpecification => N::LinkageSpecification,
            R::AttributeSpecifier => N::AttributeSpecifier,
            R::Attribute => N::Attribute,
            R::AttributeDeclaration => N::AttributeDeclaration,
            R::MsDeclspecModifier => N::MsDeclspecModifier,
            R::MsBasedModifier => N::MsBasedModifier,
            R::MsCallModifier => N::MsCallModifier,
            R::MsRestrictModifier => N::MsRestrictModifier,
            R::MsUnsignedPtrModifier => N::MsUnsignedPtrModifier,
            R::MsSignedPtrModifier => N::MsSignedPtrModifier,
            R::MsUnalignedPtrModifier => N::MsUnalignedPtrModifier,
            R::MsPointerModifier => N::MsPointerModifier,
            R::DeclarationList => N::DeclarationList,
            R::InitDeclarator => N::InitDeclarator,
            R::StorageClassSpecifier => N::StorageClassSpecifier,
            R::TypeQualifier => N::TypeQualifier,
            R::AlignasQualifier => N::AlignasQualifier,
            R::PointerDeclarator => N::PointerDeclarator,
            R::AbstractPointerDeclarator => N::AbstractPointerDeclarator,
            R::FunctionDeclarator => N::FunctionDeclarator,
            R::AbstractFunctionDeclarator => N::AbstractFunctionDeclarator,
            R::ArrayDeclarator => N::ArrayDeclarator,
            R::AbstractArrayDeclarator => N::AbstractArrayDeclarator,
            R::ParenthesizedDeclarator => N::ParenthesizedDeclarator,
            R::AbstractParenthesizedDeclarator => N::AbstractParenthesizedDeclarator,
            R::AttributedDeclarator => N::AttributedDeclarator,
            R::SizedTypeSpecifier => N::SizedTypeSpecifier,
            R::PrimitiveType => N::PrimitiveType,
            R::StructSpecifier => N::StructSpecifier,
            R::UnionSpecifier => N::UnionSpecifier,
            R::EnumSpecifier => N::EnumSpecifier,
            R::EnumeratorList => N::EnumeratorList,
            R::Enumerator => N::Enumerator,
            R::FieldDeclarationList => N::FieldDeclarationList,
            R::FieldDeclaration => N::FieldDeclaration,
            R::BitfieldClause => N::BitfieldClause,
            R::MacroTypeSpecifier => N::MacroTypeSpecifier,
            R::TypeDescriptor => N::TypeDescriptor,
            R::ParameterList => N::ParameterList,
            R::ParameterDeclaration => N::ParameterDeclaration,
            R::VariadicParameter => N::VariadicParameter,
            R::CompoundStatement => N::CompoundStatement,
            R::ExpressionStatement => N::ExpressionStatement,
            R::IfStatement => N::IfStatement,
            R::ElseClause => N::ElseClause,
            R::SwitchStatement => N::SwitchStatement,
            R::CaseStatement => N::CaseStatement,
            R::WhileStatement => N::WhileStatement,
            R::DoStatement => N::DoStatement,
            R::ForStatement => N::ForStatement,
            R::ReturnStatement => N::ReturnStatement,
            R::BreakStatement => N::BreakStatement,
            R::ContinueStatement => N::ContinueStatement,
            R::GotoStatement => N::GotoStatement,
            R::LabeledStatement => N::LabeledStatement,
            R::AttributedStatement => N::AttributedStatement,
            R::SehTryStatement => N::SehTryStatement,
            R::SehExceptClause => N::SehExceptClause,
            R::SehFinallyClause => N::SehFinallyClause,
            R::SehLeaveStatement => N::SehLeaveStatement,
            R::ConditionalExpression => N::ConditionalExpression,
            R::AssignmentExpression => N::AssignmentExpression,
            R::BinaryExpression => N::BinaryExpression,
            R::UnaryExpression => N::UnaryExpression,
            R::UpdateExpression => N::UpdateExpression,
            R::CastExpression => N::CastExpression,
            R::PointerExpression => N::PointerExpression,
            R::SizeofExpression => N::SizeofExpression,
            R::AlignofExpression => N::AlignofExpression,
            R::OffsetofExpression => N::OffsetofExpression,
            R::GenericExpression => N::GenericExpression,
            R::SubscriptExpression => N::SubscriptExpression,
            R::CallExpression => N::CallExpression,
            R::FieldExpression => N::FieldExpression,
            R::CompoundLiteralExpression => N::CompoundLiteralExpression,
            R::ParenthesizedExpression => N::ParenthesizedExpression,
            R::CommaExpression => N::CommaExpression,
            R::ExtensionExpression => N::ExtensionExpression,
            R::ArgumentList => N::ArgumentList,
            R::InitializerList => N::InitializerList,
            R::InitializerPair => N::InitializerPair,
            R::SubscriptDesignator => N::SubscriptDesignator,
            R::SubscriptRangeDesignator => N::SubscriptRangeDesignator,
            R::FieldDesignator => N::FieldDesignator,
            R::ConcatenatedString => N::ConcatenatedString,
            R::StringLiteral => N::StringLiteral,
            R::CharLiteral => N::CharLiteral,
            R::NumberLiteral => N::NumberLiteral,
            R::Identifier => N::Identifier,
            R::TypeIdentifier => N::TypeIdentifier,
            R::FieldIdentifier => N::FieldIdentifier,
            R::StatementIdentifier => N::StatementIdentifier,
            R::True => N::True,
            R::False => N::False,
            R::Null => N::Null,
            R::GnuAsmExpression => N::GnuAsmExpression,
            R::GnuAsmQualifier => N::GnuAsmQualifier,
            R::GnuAsmOutputOperandList => N::GnuAsmOutputOperandList,
            R::GnuAsmOutputOperand => N::GnuAsmOutputOperand,
            R::GnuAsmInputOperandList => N::GnuAsmInputOperandList,
            R::GnuAsmInputOperand => N::GnuAsmInputOperand,
            R::GnuAsmClobberList => N::GnuAsmClobberList,
            R::GnuAsmGotoList => N::GnuAsmGotoList,
            R::SystemLibString => N::SystemLibString,
            R::Comment => N::Comment,
        })
    }

    /// Tie-break score consulted when multiple complete derivations cover
    /// the same span.
    ///
    /// Positive scores promote a reading, negative scores demote it:
    /// pointer declarators beat the expression reading of `T *p`, while a
    /// parenthesized declarator loses to a macro-like call for `T (x)` and
    /// a macro type specifier loses to a plain type identifier.
    pub const fn dynamic_precedence(self) -> i32 {
        use RuleName as R;
        match self {
            R::PointerDeclarator
            | R::PointerFieldDeclarator
            | R::PointerTypeDeclarator
            | R::AbstractPointerDeclarator => 1,
            R::ParenthesizedDeclarator
            | R::ParenthesizedFieldDeclarator
            | R::ParenthesizedTypeDeclarator => prec::PAREN_DECLARATOR,
            R::MacroTypeSpecifier => -1,
            _ => 0,
        }
    }

    /// Static precedence annotations that are not part of the operator
    /// ladder: declarator wrappers bind above their bases, and the
    /// no-trailing-comma enumerator conditional yields to the comma form.
    pub const fn static_precedence(self) -> i32 {
        use RuleName as R;
        match self {
            R::FunctionDeclarator
            | R::FunctionDeclarationDeclarator
            | R::FunctionFieldDeclarator
            | R::FunctionTypeDeclarator
            | R::AbstractFunctionDeclarator
            | R::ArrayDeclarator
            | R::ArrayFieldDeclarator
            | R::ArrayTypeDeclarator
            | R::AbstractArrayDeclarator
            | R::AbstractParenthesizedDeclarator => 1,
            R::PreprocIfInEnumeratorListNoComma
            | R::PreprocIfdefInEnumeratorListNoComma
            | R::PreprocElseInEnumeratorListNoComma
            | R::PreprocElifInEnumeratorListNoComma
            | R::PreprocElifdefInEnumeratorListNoComma => -1,
            R::PreprocArg => -1,
            _ => prec::DEFAULT,
        }
    }

    /// The supertype this rule declares, if it is a supertype rule.
    pub const fn supertype(self) -> Option<Supertype> {
        use RuleName as R;
        match self {
            R::Expression => Some(Supertype::Expression),
            R::Statement => Some(Supertype::Statement),
            R::TypeSpecifier => Some(Supertype::TypeSpecifier),
            R::Declarator => Some(Supertype::Declarator),
            R::FieldDeclarator => Some(Supertype::FieldDeclarator),
            R::TypeDeclarator => Some(Supertype::TypeDeclarator),
            R::AbstractDeclarator => Some(Supertype::AbstractDeclarator),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supertype_rules_are_transparent() {
        for st in Supertype::ALL {
            let rule = match st {
                Supertype::Expression => RuleName::Expression,
                Supertype::Statement => RuleName::Statement,
                Supertype::TypeSpecifier => RuleName::TypeSpecifier,
                Supertype::Declarator => RuleName::Declarator,
                Supertype::FieldDeclarator => RuleName::FieldDeclarator,
                Supertype::TypeDeclarator => RuleName::TypeDeclarator,
                Supertype::AbstractDeclarator => RuleName::AbstractDeclarator,
            };
            assert_eq!(rule.supertype(), Some(st));
            assert_eq!(rule.visible_kind(), None, "{rule:?} must be transparent");
        }
    }

    #[test]
    fn test_context_aliases_share_a_visible_kind() {
        assert_eq!(
            RuleName::PointerFieldDeclarator.visible_kind(),
            Some(NodeKind::PointerDeclarator)
        );
        assert_eq!(
            RuleName::PointerTypeDeclarator.visible_kind(),
            Some(NodeKind::PointerDeclarator)
        );
        // Abstract declarators keep their own kinds.
        assert_eq!(
            RuleName::AbstractPointerDeclarator.visible_kind(),
            Some(NodeKind::AbstractPointerDeclarator)
        );
        // K&R forms alias back to the modern kinds.
        assert_eq!(
            RuleName::OldStyleFunctionDefinition.visible_kind(),
            Some(NodeKind::FunctionDefinition)
        );
        assert_eq!(
            RuleName::OldStyleParameterList.visible_kind(),
            Some(NodeKind::ParameterList)
        );
    }

    #[test]
    fn test_preproc_expression_aliases() {
        assert_eq!(
            RuleName::PreprocBinaryExpression.visible_kind(),
            Some(NodeKind::BinaryExpression)
        );
        assert_eq!(
            RuleName::PreprocCallExpression.visible_kind(),
            Some(NodeKind::CallExpression)
        );
        assert_eq!(RuleName::PreprocExpression.visible_kind(), None);
    }

    #[test]
    fn test_dynamic_precedence_values() {
        assert_eq!(RuleName::PointerDeclarator.dynamic_precedence(), 1);
        assert_eq!(RuleName::ParenthesizedDeclarator.dynamic_precedence(), -10);
        assert_eq!(RuleName::MacroTypeSpecifier.dynamic_precedence(), -1);
        assert_eq!(RuleName::BinaryExpression.dynamic_precedence(), 0);
    }

    #[test]
    fn test_preproc_context_kinds_are_distinct() {
        let kinds = [
            RuleName::PreprocIf.visible_kind(),
            RuleName::PreprocIfInFieldDeclarationList.visible_kind(),
            RuleName::PreprocIfInEnumeratorList.visible_kind(),
            RuleName::PreprocIfInEnumeratorListNoComma.visible_kind(),
        ];
        for (i, a) in kinds.iter().enumerate() {
            assert!(a.is_some());
            for b in &kinds[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
