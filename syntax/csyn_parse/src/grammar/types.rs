//! Type specifiers and type-bearing bodies.
//!
//! Declaration specifiers, the `type_specifier` supertype (struct/union/
//! enum, sized specifiers, primitive types, type identifiers and the
//! macro-call form), struct/union field lists, enumerator lists and the
//! `type_descriptor` used by casts and the sizeof family. The two list
//! bodies host their own preprocessor-conditional instantiations.

use csyn_diagnostic::ErrorCode;
use csyn_grammar::{PreprocContext, RuleName};
use csyn_ir::{FieldName, Node, NodeKind, TokenKind};

use crate::{recovery, NodeBuilder, Parsed, Parser};

impl<'a> Parser<'a> {
    /// `repeat(modifier) field(type) repeat(modifier)`, pushed into `b`.
    pub(crate) fn parse_declaration_specifiers(&mut self, b: &mut NodeBuilder) -> Parsed<()> {
        while self.parse_declaration_modifier_opt(b)? {}
        let ty = self.parse_type_specifier_node()?;
        b.push_field(FieldName::Type, ty);
        while self.parse_declaration_modifier_opt(b)? {}
        Ok(())
    }

    /// One storage class / qualifier / attribute / declspec modifier, if
    /// the current token starts one.
    pub(crate) fn parse_declaration_modifier_opt(&mut self, b: &mut NodeBuilder) -> Parsed<bool> {
        use TokenKind as T;
        let kind = self.current_kind();
        if kind.is_storage_class() {
            let node = self.take_leaf(NodeKind::StorageClassSpecifier);
            b.push_node(node);
        } else if kind.is_type_qualifier() {
            let node = self.take_leaf(NodeKind::TypeQualifier);
            b.push_node(node);
        } else if kind == T::Alignas {
            let node = self.parse_alignas_qualifier()?;
            b.push_node(node);
        } else if kind == T::Attribute {
            let node = self.parse_attribute_specifier()?;
            b.push_node(node);
        } else if kind == T::Declspec {
            let node = self.parse_ms_declspec_modifier()?;
            b.push_node(node);
        } else if kind == T::LBracket && self.at_double_bracket(T::LBracket) {
            let node = self.parse_attribute_declaration()?;
            b.push_node(node);
        } else {
            return Ok(false);
        }
        Ok(true)
    }

    /// One `type_specifier` variant.
    pub(crate) fn parse_type_specifier_node(&mut self) -> Parsed<Node> {
        use TokenKind as T;
        match self.current_kind() {
            T::Struct => self.parse_struct_or_union_specifier(NodeKind::StructSpecifier),
            T::Union => self.parse_struct_or_union_specifier(NodeKind::UnionSpecifier),
            T::Enum => self.parse_enum_specifier(),
            T::Signed | T::Unsigned | T::Long | T::Short => self.parse_sized_type_specifier(),
            T::PrimitiveType => {
                if self.peek_kind().is_sized_specifier() {
                    self.parse_sized_type_specifier()
                } else {
                    Ok(self.take_leaf(NodeKind::PrimitiveType))
                }
            }
            T::Identifier => {
                if self.peek_kind() == T::LParen {
                    self.assert_conflict(&[
                        RuleName::TypeSpecifier,
                        RuleName::MacroTypeSpecifier,
                    ]);
                    if let Some(node) = self.try_parse_memo(crate::SpeculationKind::MacroType, |p| {
                        p.parse_macro_type_specifier()
                    }) {
                        return Ok(node);
                    }
                }
                Ok(self.take_leaf(NodeKind::TypeIdentifier))
            }
            _ => Err(self.error_here(ErrorCode::E1005)),
        }
    }

    /// `name(type)` — a macro wrapping a type. Loses to the plain
    /// type-identifier reading unless a declarator clearly follows.
    fn parse_macro_type_specifier(&mut self) -> Parsed<Node> {
        use TokenKind as T;
        let mut b = NodeBuilder::new();
        self.bump_leaf_field(&mut b, FieldName::Name, NodeKind::Identifier);
        self.expect(&mut b, T::LParen, ErrorCode::E1001)?;
        let ty = self.parse_type_descriptor(true)?;
        b.push_field(FieldName::Type, ty);
        self.expect(&mut b, T::RParen, ErrorCode::E1003)?;
        if !matches!(
            self.current_kind(),
            T::Identifier | T::Star | T::MsCallModifier
        ) {
            return Err(self.error_here(ErrorCode::E1005));
        }
        self.note_dynamic(RuleName::MacroTypeSpecifier);
        Ok(b.finish(NodeKind::MacroTypeSpecifier))
    }

    /// `signed`/`unsigned`/`long`/`short` runs with an optional embedded
    /// base type.
    fn parse_sized_type_specifier(&mut self) -> Parsed<Node> {
        use TokenKind as T;
        let mut b = NodeBuilder::new();
        while self.current_kind().is_sized_specifier() {
            self.bump(&mut b);
        }
        while self.current_kind().is_type_qualifier() {
            let node = self.take_leaf(NodeKind::TypeQualifier);
            b.push_node(node);
        }
        match self.current_kind() {
            T::PrimitiveType => {
                self.bump_leaf_field(&mut b, FieldName::Type, NodeKind::PrimitiveType);
            }
            // `unsigned T x;` captures `T` only when a declarator clearly
            // follows; `typedef unsigned T;` keeps `T` for the declarator
            // (the speculative type-identifier reading is demoted).
            T::Identifier if matches!(self.peek_kind(), T::Identifier | T::Star) => {
                self.assert_conflict(&[RuleName::TypeSpecifier, RuleName::SizedTypeSpecifier]);
                self.note_dynamic_raw(-1);
                self.bump_leaf_field(&mut b, FieldName::Type, NodeKind::TypeIdentifier);
            }
            _ => {}
        }
        while self.current_kind().is_sized_specifier() {
            self.bump(&mut b);
        }
        Ok(b.finish(NodeKind::SizedTypeSpecifier))
    }

    fn parse_struct_or_union_specifier(&mut self, kind: NodeKind) -> Parsed<Node> {
        use TokenKind as T;
        let mut b = NodeBuilder::new();
        self.bump(&mut b); // struct / union
        if kind == NodeKind::StructSpecifier && self.at(T::Attribute) {
            let node = self.parse_attribute_specifier()?;
            b.push_node(node);
        }
        if self.at(T::Declspec) {
            let node = self.parse_ms_declspec_modifier()?;
            b.push_node(node);
        }
        if self.at(T::Identifier) {
            self.bump_leaf_field(&mut b, FieldName::Name, NodeKind::TypeIdentifier);
            if self.at(T::LBrace) && self.struct_body_allowed {
                let body = self.parse_field_declaration_list()?;
                b.push_field(FieldName::Body, body);
            }
        } else if self.at(T::LBrace) && self.struct_body_allowed {
            let body = self.parse_field_declaration_list()?;
            b.push_field(FieldName::Body, body);
        } else {
            return Err(self.error_here(ErrorCode::E1004));
        }
        if self.at(T::Attribute) {
            let node = self.parse_attribute_specifier()?;
            b.push_node(node);
        }
        Ok(b.finish(kind))
    }

    fn parse_enum_specifier(&mut self) -> Parsed<Node> {
        use TokenKind as T;
        let mut b = NodeBuilder::new();
        self.bump(&mut b); // enum
        if self.at(T::Identifier) {
            self.bump_leaf_field(&mut b, FieldName::Name, NodeKind::TypeIdentifier);
            if self.at(T::Colon) {
                self.bump(&mut b);
                if self.at(T::PrimitiveType) {
                    self.bump_leaf_field(&mut b, FieldName::UnderlyingType, NodeKind::PrimitiveType);
                } else {
                    return Err(self.error_here(ErrorCode::E1005));
                }
            }
            if self.at(T::LBrace) && self.struct_body_allowed {
                let body = self.parse_enumerator_list()?;
                b.push_field(FieldName::Body, body);
            }
        } else if self.at(T::LBrace) && self.struct_body_allowed {
            let body = self.parse_enumerator_list()?;
            b.push_field(FieldName::Body, body);
        } else {
            return Err(self.error_here(ErrorCode::E1004));
        }
        if self.at(T::Attribute) {
            let node = self.parse_attribute_specifier()?;
            b.push_node(node);
        }
        Ok(b.finish(NodeKind::EnumSpecifier))
    }

    // --- struct/union bodies ---

    fn parse_field_declaration_list(&mut self) -> Parsed<Node> {
        use TokenKind as T;
        let mut b = NodeBuilder::new();
        self.expect(&mut b, T::LBrace, ErrorCode::E1001)?;
        while !self.at(T::RBrace) && !self.at_eof() {
            let snapshot = self.snapshot();
            let mark = b.len();
            match self.parse_field_list_item() {
                Ok(item) => b.push_node(item),
                Err(error) => {
                    b.truncate(mark);
                    self.restore(snapshot);
                    let node = self.error_node(recovery::FIELD_BOUNDARY, &error);
                    b.push_node(node);
                    if self.at(T::Semicolon) {
                        self.bump(&mut b);
                    }
                }
            }
        }
        self.expect(&mut b, T::RBrace, ErrorCode::E1003)?;
        Ok(b.finish(NodeKind::FieldDeclarationList))
    }

    /// A field declaration or a preprocessor item legal between fields.
    pub(crate) fn parse_field_list_item(&mut self) -> Parsed<Node> {
        if self.at(TokenKind::Hash) {
            return self.parse_preproc_item(PreprocContext::FieldDeclarationList);
        }
        self.parse_field_declaration()
    }

    fn parse_field_declaration(&mut self) -> Parsed<Node> {
        use csyn_grammar::DeclaratorContext;
        use TokenKind as T;
        let mut b = NodeBuilder::new();
        self.parse_declaration_specifiers(&mut b)?;
        if !self.at(T::Semicolon) {
            loop {
                let declarator = self.parse_declarator(DeclaratorContext::Field)?;
                b.push_field(FieldName::Declarator, declarator);
                if self.at(T::Colon) {
                    let mut cb = NodeBuilder::new();
                    self.bump(&mut cb);
                    let width = self.parse_expression()?;
                    cb.push_node(width);
                    b.push_node(cb.finish(NodeKind::BitfieldClause));
                }
                if self.at(T::Comma) {
                    self.bump(&mut b);
                } else {
                    break;
                }
            }
        }
        if self.at(T::Attribute) {
            let node = self.parse_attribute_specifier()?;
            b.push_node(node);
        }
        self.expect(&mut b, T::Semicolon, ErrorCode::E1001)?;
        Ok(b.finish(NodeKind::FieldDeclaration))
    }

    // --- enumerator lists ---

    fn parse_enumerator_list(&mut self) -> Parsed<Node> {
        use TokenKind as T;
        let mut b = NodeBuilder::new();
        self.expect(&mut b, T::LBrace, ErrorCode::E1001)?;
        while !self.at(T::RBrace) && !self.at_eof() {
            if self.at(T::Hash) {
                let word = self.directive_word();
                let node = if matches!(word, "if" | "ifdef" | "ifndef") {
                    // Entries inside the conditional carry their commas in
                    // the comma instantiation; the no-comma instantiation
                    // (lower precedence) covers the final-entry shape.
                    match self
                        .try_parse(|p| p.parse_preproc_item(PreprocContext::EnumeratorList))
                    {
                        Some(node) => node,
                        None => self.parse_preproc_item(PreprocContext::EnumeratorListNoComma)?,
                    }
                } else {
                    let node = self.parse_preproc_item(PreprocContext::EnumeratorList)?;
                    b.push_node(node);
                    if self.at(T::Comma) {
                        self.bump(&mut b);
                    }
                    continue;
                };
                b.push_node(node);
                continue;
            }
            let snapshot = self.snapshot();
            let mark = b.len();
            match self.parse_enumerator() {
                Ok(enumerator) => {
                    b.push_node(enumerator);
                    if self.at(T::Comma) {
                        self.bump(&mut b);
                    } else {
                        break;
                    }
                }
                Err(error) => {
                    b.truncate(mark);
                    self.restore(snapshot);
                    let node = self.error_node(recovery::ENUMERATOR_BOUNDARY, &error);
                    b.push_node(node);
                    if self.at(T::Comma) {
                        self.bump(&mut b);
                    }
                }
            }
        }
        self.expect(&mut b, T::RBrace, ErrorCode::E1003)?;
        Ok(b.finish(NodeKind::EnumeratorList))
    }

    pub(crate) fn parse_enumerator(&mut self) -> Parsed<Node> {
        let mut b = NodeBuilder::new();
        self.expect_leaf_field(&mut b, FieldName::Name, NodeKind::Identifier)?;
        if self.at(TokenKind::Eq) {
            self.bump(&mut b);
            let value = self.parse_expression()?;
            b.push_field(FieldName::Value, value);
        }
        Ok(b.finish(NodeKind::Enumerator))
    }

    // --- type descriptors ---

    /// `qualifier* type qualifier* abstract-declarator?` — the type shape
    /// casts, `sizeof` and `_Generic` take. `allow_abstract` is switched
    /// off on the cast retry path so a trailing `(…)` stays available as
    /// the operand.
    pub(crate) fn parse_type_descriptor(&mut self, allow_abstract: bool) -> Parsed<Node> {
        use csyn_grammar::DeclaratorContext;
        use TokenKind as T;
        let mut b = NodeBuilder::new();
        while self.current_kind().is_type_qualifier() {
            let node = self.take_leaf(NodeKind::TypeQualifier);
            b.push_node(node);
        }
        let ty = self.parse_type_specifier_node()?;
        b.push_field(FieldName::Type, ty);
        while self.current_kind().is_type_qualifier() {
            let node = self.take_leaf(NodeKind::TypeQualifier);
            b.push_node(node);
        }
        if allow_abstract && matches!(self.current_kind(), T::Star | T::LParen | T::LBracket) {
            if let Some(declarator) =
                self.try_parse_memo(crate::SpeculationKind::AbstractDeclarator, |p| {
                    p.parse_declarator(DeclaratorContext::Abstract)
                })
            {
                b.push_field(FieldName::Declarator, declarator);
            }
        }
        Ok(b.finish(NodeKind::TypeDescriptor))
    }

    // --- attributes and vendor modifiers ---

    /// `__attribute__((…))`
    pub(crate) fn parse_attribute_specifier(&mut self) -> Parsed<Node> {
        let mut b = NodeBuilder::new();
        self.bump(&mut b); // __attribute__
        self.expect(&mut b, TokenKind::LParen, ErrorCode::E1001)?;
        let arguments = self.parse_argument_list()?;
        b.push_node(arguments);
        self.expect(&mut b, TokenKind::RParen, ErrorCode::E1003)?;
        Ok(b.finish(NodeKind::AttributeSpecifier))
    }

    /// `[[prefix::name(args), …]]`
    pub(crate) fn parse_attribute_declaration(&mut self) -> Parsed<Node> {
        use TokenKind as T;
        let mut b = NodeBuilder::new();
        self.expect(&mut b, T::LBracket, ErrorCode::E1001)?;
        self.expect(&mut b, T::LBracket, ErrorCode::E1001)?;
        loop {
            let attribute = self.parse_attribute()?;
            b.push_node(attribute);
            if self.at(T::Comma) {
                self.bump(&mut b);
            } else {
                break;
            }
        }
        self.expect(&mut b, T::RBracket, ErrorCode::E1003)?;
        self.expect(&mut b, T::RBracket, ErrorCode::E1003)?;
        Ok(b.finish(NodeKind::AttributeDeclaration))
    }

    fn parse_attribute(&mut self) -> Parsed<Node> {
        use TokenKind as T;
        let mut b = NodeBuilder::new();
        if self.at(T::Identifier) && self.peek_kind() == T::ColonColon {
            self.bump_leaf_field(&mut b, FieldName::Prefix, NodeKind::Identifier);
            self.bump(&mut b); // ::
        }
        if self.current_kind().is_word() {
            // Standard attributes reuse keyword spellings (`[[noreturn]]`).
            self.bump_leaf_field(&mut b, FieldName::Name, NodeKind::Identifier);
        } else {
            return Err(self.error_here(ErrorCode::E1004));
        }
        if self.at(T::LParen) {
            let arguments = self.parse_argument_list()?;
            b.push_node(arguments);
        }
        Ok(b.finish(NodeKind::Attribute))
    }

    /// `__declspec(name)`
    pub(crate) fn parse_ms_declspec_modifier(&mut self) -> Parsed<Node> {
        let mut b = NodeBuilder::new();
        self.bump(&mut b); // __declspec
        self.expect(&mut b, TokenKind::LParen, ErrorCode::E1001)?;
        if self.current_kind().is_word() {
            // `__declspec(noreturn)` and friends reuse keyword spellings.
            let node = self.take_leaf(NodeKind::Identifier);
            b.push_node(node);
        } else {
            return Err(self.error_here(ErrorCode::E1004));
        }
        self.expect(&mut b, TokenKind::RParen, ErrorCode::E1003)?;
        Ok(b.finish(NodeKind::MsDeclspecModifier))
    }

    /// `alignas(expression | type)`
    fn parse_alignas_qualifier(&mut self) -> Parsed<Node> {
        let mut b = NodeBuilder::new();
        self.bump(&mut b); // alignas
        self.expect(&mut b, TokenKind::LParen, ErrorCode::E1001)?;
        let argument = self
            .try_parse(|p| {
                let expr = p.parse_expression()?;
                if p.at(TokenKind::RParen) {
                    Ok(expr)
                } else {
                    Err(p.error_here(ErrorCode::E1003))
                }
            })
            .map_or_else(|| self.parse_type_descriptor(true), Ok)?;
        b.push_node(argument);
        self.expect(&mut b, TokenKind::RParen, ErrorCode::E1003)?;
        Ok(b.finish(NodeKind::AlignasQualifier))
    }
}
