//! Node kinds, supertype groupings and field names for the C concrete
//! syntax tree.
//!
//! The kind inventory mirrors the grammar: one kind per visible production,
//! including the context-duplicated preprocessor-conditional kinds (a
//! conditional wrapping struct fields is a different kind than one wrapping
//! enumerators, so consumers can tell the contexts apart without looking at
//! the parent).
//!
//! [`Supertype`] is the closed polymorphic grouping from the grammar: every
//! supertype can enumerate the exact concrete kinds it subsumes via
//! [`Supertype::variants`].

/// Kind of a concrete syntax tree node.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[repr(u8)]
pub enum NodeKind {
    TranslationUnit,

    // Preprocessor
    PreprocInclude,
    PreprocDef,
    PreprocFunctionDef,
    PreprocParams,
    PreprocCall,
    PreprocDirective,
    PreprocArg,
    PreprocDefined,

    // Conditional family, block-item content
    PreprocIf,
    PreprocIfdef,
    PreprocElse,
    PreprocElif,
    PreprocElifdef,
    // Conditional family, field-declaration-list content
    PreprocIfInFieldDeclarationList,
    PreprocIfdefInFieldDeclarationList,
    PreprocElseInFieldDeclarationList,
    PreprocElifInFieldDeclarationList,
    PreprocElifdefInFieldDeclarationList,
    // Conditional family, enumerator-list content (trailing comma)
    PreprocIfInEnumeratorList,
    PreprocIfdefInEnumeratorList,
    PreprocElseInEnumeratorList,
    PreprocElifInEnumeratorList,
    PreprocElifdefInEnumeratorList,
    // Conditional family, enumerator-list content (no trailing comma)
    PreprocIfInEnumeratorListNoComma,
    PreprocIfdefInEnumeratorListNoComma,
    PreprocElseInEnumeratorListNoComma,
    PreprocElifInEnumeratorListNoComma,
    PreprocElifdefInEnumeratorListNoComma,

    // Definitions and declarations
    FunctionDefinition,
    Declaration,
    TypeDefinition,
    LinkageSpecification,
    DeclarationList,

    // Attributes and vendor modifiers
    AttributeSpecifier,
    Attribute,
    AttributeDeclaration,
    MsDeclspecModifier,
    MsBasedModifier,
    MsCallModifier,
    MsPointerModifier,
    MsRestrictModifier,
    MsUnsignedPtrModifier,
    MsSignedPtrModifier,
    MsUnalignedPtrModifier,
    StorageClassSpecifier,
    TypeQualifier,
    AlignasQualifier,

    // Declarators
    PointerDeclarator,
    FunctionDeclarator,
    ArrayDeclarator,
    ParenthesizedDeclarator,
    AttributedDeclarator,
    InitDeclarator,
    AbstractPointerDeclarator,
    AbstractFunctionDeclarator,
    AbstractArrayDeclarator,
    AbstractParenthesizedDeclarator,

    // Type specifiers
    StructSpecifier,
    UnionSpecifier,
    EnumSpecifier,
    EnumeratorList,
    Enumerator,
    FieldDeclarationList,
    FieldDeclaration,
    BitfieldClause,
    SizedTypeSpecifier,
    PrimitiveType,
    MacroTypeSpecifier,
    TypeDescriptor,

    // Parameters
    ParameterList,
    ParameterDeclaration,
    VariadicParameter,

    // Statements
    CompoundStatement,
    ExpressionStatement,
    IfStatement,
    ElseClause,
    SwitchStatement,
    CaseStatement,
    WhileStatement,
    DoStatement,
    ForStatement,
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

    // GNU inline assembly
    GnuAsmExpression,
    GnuAsmQualifier,
    GnuAsmOutputOperandList,
    GnuAsmOutputOperand,
    GnuAsmInputOperandList,
    GnuAsmInputOperand,
    GnuAsmClobberList,
    GnuAsmGotoList,

    // Leaf-bearing nodes
    Identifier,
    TypeIdentifier,
    FieldIdentifier,
    StatementIdentifier,
    NumberLiteral,
    CharLiteral,
    StringLiteral,
    ConcatenatedString,
    StringContent,
    Character,
    EscapeSequence,
    SystemLibString,
    True,
    False,
    Null,
    Comment,

    /// Anchors unparseable input; children are the skipped tokens.
    Error,
}

impl NodeKind {
    /// Grammar-facing name, matching the production that created the node.
    pub const fn as_str(self) -> &'static str {
        use NodeKind::*;
        match self {
            TranslationUnit => "translation_unit",
            PreprocInclude => "preproc_include",
            PreprocDef => "preproc_def",
            PreprocFunctionDef => "preproc_function_def",
            PreprocParams => "preproc_params",
            PreprocCall => "preproc_call",
            PreprocDirective => "preproc_directive",
            PreprocArg => "preproc_arg",
            PreprocDefined => "preproc_defined",
            PreprocIf => "preproc_if",
            PreprocIfdef => "preproc_ifdef",
            PreprocElse => "preproc_else",
            PreprocElif => "preproc_elif",
            PreprocElifdef => "preproc_elifdef",
            PreprocIfInFieldDeclarationList => "preproc_if_in_field_declaration_list",
            PreprocIfdefInFieldDeclarationList => "preproc_ifdef_in_field_declaration_list",
            PreprocElseInFieldDeclarationList => "preproc_else_in_field_declaration_list",
            PreprocElifInFieldDeclarationList => "preproc_elif_in_field_declaration_list",
            PreprocElifdefInFieldDeclarationList => "preproc_elifdef_in_field_declaration_list",
            PreprocIfInEnumeratorList => "preproc_if_in_enumerator_list",
            PreprocIfdefInEnumeratorList => "preproc_ifdef_in_enumerator_list",
            PreprocElseInEnumeratorList => "preproc_else_in_enumerator_list",
            PreprocElifInEnumeratorList => "preproc_elif_in_enumerator_list",
            PreprocElifdefInEnumeratorList => "preproc_elifdef_in_enumerator_list",
            PreprocIfInEnumeratorListNoComma => "preproc_if_in_enumerator_list_no_comma",
            PreprocIfdefInEnumeratorListNoComma => "preproc_ifdef_in_enumerator_list_no_comma",
            PreprocElseInEnumeratorListNoComma => "preproc_else_in_enumerator_list_no_comma",
            PreprocElifInEnumeratorListNoComma => "preproc_elif_in_enumerator_list_no_comma",
            PreprocElifdefInEnumeratorListNoComma => "preproc_elifdef_in_enumerator_list_no_comma",
            FunctionDefinition => "function_definition",
            Declaration => "declaration",
            TypeDefinition => "type_definition",
            LinkageSpecification => "linkage_specification",
            DeclarationList => "declaration_list",
            AttributeSpecifier => "attribute_specifier",
            Attribute => "attribute",
            AttributeDeclaration => "attribute_declaration",
            MsDeclspecModifier => "ms_declspec_modifier",
            MsBasedModifier => "ms_based_modifier",
            MsCallModifier => "ms_call_modifier",
            MsPointerModifier => "ms_pointer_modifier",
            MsRestrictModifier => "ms_restrict_modifier",
            MsUnsignedPtrModifier => "ms_unsigned_ptr_modifier",
            MsSignedPtrModifier => "ms_signed_ptr_modifier",
            MsUnalignedPtrModifier => "ms_unaligned_ptr_modifier",
            StorageClassSpecifier => "storage_class_specifier",
            TypeQualifier => "type_qualifier",
            AlignasQualifier => "alignas_qualifier",
            PointerDeclarator => "pointer_declarator",
            FunctionDeclarator => "function_declarator",
            ArrayDeclarator => "array_declarator",
            ParenthesizedDeclarator => "parenthesized_declarator",
            AttributedDeclarator => "attributed_declarator",
            InitDeclarator => "init_declarator",
            AbstractPointerDeclarator => "abstract_pointer_declarator",
            AbstractFunctionDeclarator => "abstract_function_declarator",
            AbstractArrayDeclarator => "abstract_array_declarator",
            AbstractParenthesizedDeclarator => "abstract_parenthesized_declarator",
            StructSpecifier => "struct_specifier",
            UnionSpecifier => "union_specifier",
            EnumSpecifier => "enum_specifier",
            EnumeratorList => "enumerator_list",
            Enumerator => "enumerator",
            FieldDeclarationList => "field_declaration_list",
            FieldDeclaration => "field_declaration",
            BitfieldClause => "bitfield_clause",
            SizedTypeSpecifier => "sized_type_specifier",
            PrimitiveType => "primitive_type",
            MacroTypeSpecifier => "macro_type_specifier",
            TypeDescriptor => "type_descriptor",
            ParameterList => "parameter_list",
            ParameterDeclaration => "parameter_declaration",
            VariadicParameter => "variadic_parameter",
            CompoundStatement => "compound_statement",
            ExpressionStatement => "expression_statement",
            IfStatement => "if_statement",
            ElseClause => "else_clause",
            SwitchStatement => "switch_statement",
            CaseStatement => "case_statement",
            WhileStatement => "while_statement",
            DoStatement => "do_statement",
            ForStatement => "for_statement",
            ReturnStatement => "return_statement",
            BreakStatement => "break_statement",
            ContinueStatement => "continue_statement",
            GotoStatement => "goto_statement",
            LabeledStatement => "labeled_statement",
            AttributedStatement => "attributed_statement",
            SehTryStatement => "seh_try_statement",
            SehExceptClause => "seh_except_clause",
            SehFinallyClause => "seh_finally_clause",
            SehLeaveStatement => "seh_leave_statement",
            ConditionalExpression => "conditional_expression",
            AssignmentExpression => "assignment_expression",
            BinaryExpression => "binary_expression",
            UnaryExpression => "unary_expression",
            UpdateExpression => "update_expression",
            CastExpression => "cast_expression",
            PointerExpression => "pointer_expression",
            SizeofExpression => "sizeof_expression",
            AlignofExpression => "alignof_expression",
            OffsetofExpression => "offsetof_expression",
            GenericExpression => "generic_expression",
            SubscriptExpression => "subscript_expression",
            CallExpression => "call_expression",
            FieldExpression => "field_expression",
            CompoundLiteralExpression => "compound_literal_expression",
            ParenthesizedExpression => "parenthesized_expression",
            CommaExpression => "comma_expression",
            ExtensionExpression => "extension_expression",
            ArgumentList => "argument_list",
            InitializerList => "initializer_list",
            InitializerPair => "initializer_pair",
            SubscriptDesignator => "subscript_designator",
            SubscriptRangeDesignator => "subscript_range_designator",
            FieldDesignator => "field_designator",
            GnuAsmExpression => "gnu_asm_expression",
            GnuAsmQualifier => "gnu_asm_qualifier",
            GnuAsmOutputOperandList => "gnu_asm_output_operand_list",
            GnuAsmOutputOperand => "gnu_asm_output_operand",
            GnuAsmInputOperandList => "gnu_asm_input_operand_list",
            GnuAsmInputOperand => "gnu_asm_input_operand",
            GnuAsmClobberList => "gnu_asm_clobber_list",
            GnuAsmGotoList => "gnu_asm_goto_list",
            Identifier => "identifier",
            TypeIdentifier => "type_identifier",
            FieldIdentifier => "field_identifier",
            StatementIdentifier => "statement_identifier",
            NumberLiteral => "number_literal",
            CharLiteral => "char_literal",
            StringLiteral => "string_literal",
            ConcatenatedString => "concatenated_string",
            StringContent => "string_content",
            Character => "character",
            EscapeSequence => "escape_sequence",
            SystemLibString => "system_lib_string",
            True => "true",
            False => "false",
            Null => "null",
            Comment => "comment",
            Error => "ERROR",
        }
    }

    /// Whether this kind is one of the context-duplicated preprocessor
    /// conditional kinds (any context).
    pub const fn is_preproc_conditional(self) -> bool {
        (self as u8) >= (NodeKind::PreprocIf as u8)
            && (self as u8) <= (NodeKind::PreprocElifdefInEnumeratorListNoComma as u8)
    }

    /// Whether this kind belongs to the `expression` supertype.
    pub fn is_expression(self) -> bool {
        Supertype::Expression.variants().contains(&self)
    }

    /// Whether this kind belongs to the `statement` supertype.
    pub fn is_statement(self) -> bool {
        Supertype::Statement.variants().contains(&self)
    }

    /// Whether this kind belongs to the `type_specifier` supertype.
    pub fn is_type_specifier(self) -> bool {
        Supertype::TypeSpecifier.variants().contains(&self)
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A closed polymorphic grouping over concrete node kinds.
///
/// The variant sets are fixed at grammar-authoring time; a node whose kind
/// is in `variants()` may appear wherever the supertype is accepted.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Supertype {
    Expression,
    Statement,
    TypeSpecifier,
    Declarator,
    FieldDeclarator,
    TypeDeclarator,
    AbstractDeclarator,
}

impl Supertype {
    /// All supertypes, for enumeration in validation checks.
    pub const ALL: [Supertype; 7] = [
        Supertype::Expression,
        Supertype::Statement,
        Supertype::TypeSpecifier,
        Supertype::Declarator,
        Supertype::FieldDeclarator,
        Supertype::TypeDeclarator,
        Supertype::AbstractDeclarator,
    ];

    /// The closed set of concrete kinds this supertype subsumes.
    pub const fn variants(self) -> &'static [NodeKind] {
        use NodeKind::*;
        match self {
            Supertype::Expression => &[
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
                Identifier,
                NumberLiteral,
                StringLiteral,
                ConcatenatedString,
                True,
                False,
                Null,
                CharLiteral,
                ParenthesizedExpression,
                GnuAsmExpression,
                ExtensionExpression,
            ],
            Supertype::Statement => &[
                CaseStatement,
                AttributedStatement,
                LabeledStatement,
                CompoundStatement,
                ExpressionStatement,
                IfStatement,
                SwitchStatement,
                DoStatement,
                WhileStatement,
                ForStatement,
                ReturnStatement,
                BreakStatement,
                ContinueStatement,
                GotoStatement,
                SehTryStatement,
                SehLeaveStatement,
            ],
            Supertype::TypeSpecifier => &[
                StructSpecifier,
                UnionSpecifier,
                EnumSpecifier,
                MacroTypeSpecifier,
                SizedTypeSpecifier,
                PrimitiveType,
                TypeIdentifier,
            ],
            Supertype::Declarator => &[
                AttributedDeclarator,
                PointerDeclarator,
                FunctionDeclarator,
                ArrayDeclarator,
                ParenthesizedDeclarator,
                Identifier,
            ],
            Supertype::FieldDeclarator => &[
                AttributedDeclarator,
                PointerDeclarator,
                FunctionDeclarator,
                ArrayDeclarator,
                ParenthesizedDeclarator,
                FieldIdentifier,
            ],
            Supertype::TypeDeclarator => &[
                AttributedDeclarator,
                PointerDeclarator,
                FunctionDeclarator,
                ArrayDeclarator,
                ParenthesizedDeclarator,
                TypeIdentifier,
                PrimitiveType,
            ],
            Supertype::AbstractDeclarator => &[
                AbstractPointerDeclarator,
                AbstractFunctionDeclarator,
                AbstractArrayDeclarator,
                AbstractParenthesizedDeclarator,
            ],
        }
    }

    /// Whether `kind` is one of this supertype's concrete variants.
    pub fn contains(self, kind: NodeKind) -> bool {
        self.variants().contains(&kind)
    }
}

/// Field label a child can fill in its parent node.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[repr(u8)]
pub enum FieldName {
    Alternative,
    Argument,
    Arguments,
    AssemblyCode,
    Body,
    Clobbers,
    Condition,
    Consequence,
    Constraint,
    Declarator,
    Designator,
    Directive,
    End,
    Field,
    Filter,
    Function,
    GotoLabels,
    Index,
    Initializer,
    InputOperands,
    Label,
    Left,
    Member,
    Name,
    Operand,
    Operator,
    OutputOperands,
    Parameters,
    Path,
    Prefix,
    Register,
    Right,
    Size,
    Start,
    Symbol,
    Type,
    UnderlyingType,
    Update,
    Value,
}

impl FieldName {
    /// Grammar-facing name of the field.
    pub const fn as_str(self) -> &'static str {
        match self {
            FieldName::Alternative => "alternative",
            FieldName::Argument => "argument",
            FieldName::Arguments => "arguments",
            FieldName::AssemblyCode => "assembly_code",
            FieldName::Body => "body",
            FieldName::Clobbers => "clobbers",
            FieldName::Condition => "condition",
            FieldName::Consequence => "consequence",
            FieldName::Constraint => "constraint",
            FieldName::Declarator => "declarator",
            FieldName::Designator => "designator",
            FieldName::Directive => "directive",
            FieldName::End => "end",
            FieldName::Field => "field",
            FieldName::Filter => "filter",
            FieldName::Function => "function",
            FieldName::GotoLabels => "goto_labels",
            FieldName::Index => "index",
            FieldName::Initializer => "initializer",
            FieldName::InputOperands => "input_operands",
            FieldName::Label => "label",
            FieldName::Left => "left",
            FieldName::Member => "member",
            FieldName::Name => "name",
            FieldName::Operand => "operand",
            FieldName::Operator => "operator",
            FieldName::OutputOperands => "output_operands",
            FieldName::Parameters => "parameters",
            FieldName::Path => "path",
            FieldName::Prefix => "prefix",
            FieldName::Register => "register",
            FieldName::Right => "right",
            FieldName::Size => "size",
            FieldName::Start => "start",
            FieldName::Symbol => "symbol",
            FieldName::Type => "type",
            FieldName::UnderlyingType => "underlying_type",
            FieldName::Update => "update",
            FieldName::Value => "value",
        }
    }
}

impl std::fmt::Display for FieldName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supertype_membership() {
        assert!(NodeKind::BinaryExpression.is_expression());
        assert!(NodeKind::Identifier.is_expression());
        assert!(!NodeKind::Declaration.is_expression());

        assert!(NodeKind::IfStatement.is_statement());
        assert!(!NodeKind::Declaration.is_statement());

        assert!(NodeKind::TypeIdentifier.is_type_specifier());
        assert!(NodeKind::SizedTypeSpecifier.is_type_specifier());
        assert!(!NodeKind::TypeDescriptor.is_type_specifier());
    }

    #[test]
    fn test_supertype_variant_sets_are_nonempty_and_unique() {
        for st in Supertype::ALL {
            let variants = st.variants();
            assert!(!variants.is_empty(), "{st:?} has no variants");
            for (i, a) in variants.iter().enumerate() {
                for b in &variants[i + 1..] {
                    assert_ne!(a, b, "{st:?} lists {a:?} twice");
                }
            }
        }
    }

    #[test]
    fn test_preproc_conditional_range() {
        assert!(NodeKind::PreprocIf.is_preproc_conditional());
        assert!(NodeKind::PreprocElifdefInEnumeratorListNoComma.is_preproc_conditional());
        assert!(NodeKind::PreprocIfInFieldDeclarationList.is_preproc_conditional());
        assert!(!NodeKind::PreprocInclude.is_preproc_conditional());
        assert!(!NodeKind::FunctionDefinition.is_preproc_conditional());
    }

    #[test]
    fn test_display_names() {
        assert_eq!(NodeKind::TranslationUnit.to_string(), "translation_unit");
        assert_eq!(
            NodeKind::PreprocIfInEnumeratorListNoComma.to_string(),
            "preproc_if_in_enumerator_list_no_comma"
        );
        assert_eq!(FieldName::UnderlyingType.to_string(), "underlying_type");
    }
}
