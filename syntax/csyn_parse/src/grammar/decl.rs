//! Declarations, definitions and the four declarator families.
//!
//! One declarator algorithm serves all four contexts: the
//! [`DeclaratorContext`] table supplies the wrapper rules, the base
//! identifier role and whether the innermost declarator may be absent.
//! Pointer wrappers recurse, direct declarators loop function/array
//! suffixes, and the grammar's nesting is preserved: `int *f(void)` is a
//! pointer declarator wrapping a function declarator, exactly as the
//! productions derive it.
//!
//! The specifier-then-declarator prefix is shared by declarations and
//! function definitions; what follows the first declarator decides the
//! shape. A declarator followed by declarations instead of a body or `;`
//! re-parses its parameter list as the old-style (K&R) identifier list —
//! the declared `{parameter_list, old_style_parameter_list}` conflict.

use csyn_diagnostic::ErrorCode;
use csyn_grammar::{DeclaratorContext, RuleName, Wrapper};
use csyn_ir::{FieldName, Node, NodeKind, TokenKind};

use crate::{ensure_stack, NodeBuilder, Parsed, Parser};

/// What may trail a function declarator in the current position.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub(crate) enum DeclaratorTrailing {
    /// Declaration position: `asm("…")` and `__attribute__` specifiers.
    Declaration,
    /// Field/type/abstract positions: nothing trails.
    None,
}

/// Node kind a wrapper rule materializes as.
fn wrapper_kind(ctx: DeclaratorContext, wrapper: Wrapper) -> NodeKind {
    ctx.wrapper_rule(wrapper)
        .and_then(RuleName::visible_kind)
        .unwrap_or(NodeKind::Error)
}

/// Whether `declarator` could be re-read as an old-style definition head:
/// a function declarator whose every parameter is a bare identifier.
fn is_old_style_candidate(declarator: &Node) -> bool {
    if declarator.kind != NodeKind::FunctionDeclarator {
        return false;
    }
    let Some(parameters) = declarator.field(FieldName::Parameters) else {
        return false;
    };
    let mut any = false;
    for parameter in parameters.named_children() {
        match parameter.kind {
            NodeKind::VariadicParameter | NodeKind::Comment => continue,
            NodeKind::ParameterDeclaration => {}
            _ => return false,
        }
        let children: Vec<&Node> = parameter
            .named_children()
            .filter(|c| c.kind != NodeKind::Comment)
            .collect();
        if children.len() != 1 || children[0].kind != NodeKind::TypeIdentifier {
            return false;
        }
        any = true;
    }
    any
}

impl<'a> Parser<'a> {
    // --- declarations and definitions ---

    /// The shared declaration/definition shape, pushed into `parent`.
    ///
    /// Pushing (rather than returning) lets the hidden empty-declaration
    /// rule splice `type_specifier ;` straight into the enclosing item
    /// list. `require_declarator` disables that splice for fork
    /// alternatives that must produce exactly one node.
    pub(crate) fn parse_declaration_like_into(
        &mut self,
        parent: &mut NodeBuilder,
        require_declarator: bool,
        allow_definition: bool,
    ) -> Parsed<()> {
        use TokenKind as T;
        let mut b = NodeBuilder::new();
        if self.at(T::MsCallModifier) {
            let node = self.take_leaf(NodeKind::MsCallModifier);
            b.push_node(node);
        }
        self.parse_declaration_specifiers(&mut b)?;

        if self.at(T::Semicolon) && !require_declarator {
            // `struct S { … };` — the empty declaration splices.
            self.bump(&mut b);
            parent.append(b);
            return Ok(());
        }
        if self.at(T::MsCallModifier) {
            let node = self.take_leaf(NodeKind::MsCallModifier);
            b.push_node(node);
        }

        let declarator_snapshot = self.snapshot();
        let mark = b.len();
        let declarator =
            self.parse_declarator_ext(DeclaratorContext::Ordinary, DeclaratorTrailing::Declaration)?;

        // `declarator {` — a function definition.
        if allow_definition && self.at(T::LBrace) {
            b.push_field(FieldName::Declarator, declarator);
            let body = self.parse_compound_statement()?;
            b.push_field(FieldName::Body, body);
            parent.push_node(b.finish(NodeKind::FunctionDefinition));
            return Ok(());
        }

        // `declarator declaration+ {` — an old-style definition; re-read
        // the parameter list as bare identifiers.
        if allow_definition
            && self.current_kind().starts_declaration_specifier()
            && is_old_style_candidate(&declarator)
        {
            self.assert_conflict(&[RuleName::ParameterList, RuleName::OldStyleParameterList]);
            self.restore(declarator_snapshot);
            b.truncate(mark);
            let declarator = self.parse_old_style_declarator()?;
            b.push_field(FieldName::Declarator, declarator);
            while !self.at(T::LBrace) && !self.at_eof() {
                let declaration = self.parse_declaration_node()?;
                b.push_node(declaration);
                if !self.current_kind().starts_declaration_specifier() {
                    break;
                }
            }
            let body = self.parse_compound_statement()?;
            b.push_field(FieldName::Body, body);
            parent.push_node(b.finish(NodeKind::FunctionDefinition));
            return Ok(());
        }

        // Declaration tail: init declarators, optional asm, `;`.
        self.finish_declarator_slot(&mut b, declarator)?;
        while self.at(T::Comma) {
            self.bump(&mut b);
            if self.at(T::MsCallModifier) {
                let node = self.take_leaf(NodeKind::MsCallModifier);
                b.push_node(node);
            }
            let declarator = self
                .parse_declarator_ext(DeclaratorContext::Ordinary, DeclaratorTrailing::Declaration)?;
            self.finish_declarator_slot(&mut b, declarator)?;
        }
        self.expect(&mut b, T::Semicolon, ErrorCode::E1001)?;
        parent.push_node(b.finish(NodeKind::Declaration));
        Ok(())
    }

    /// Single-node variant for fork alternatives.
    pub(crate) fn parse_declaration_like_node(
        &mut self,
        require_declarator: bool,
        allow_definition: bool,
    ) -> Parsed<Node> {
        let mut b = NodeBuilder::new();
        self.parse_declaration_like_into(&mut b, require_declarator, allow_definition)?;
        Ok(b.into_single_node())
    }

    /// A plain declaration (no definitions, declarator required).
    pub(crate) fn parse_declaration_node(&mut self) -> Parsed<Node> {
        self.parse_declaration_like_node(true, false)
    }

    /// One declarator slot in a declaration: wrap into an init declarator
    /// when `=` follows, otherwise allow a trailing asm register binding.
    fn finish_declarator_slot(&mut self, b: &mut NodeBuilder, declarator: Node) -> Parsed<()> {
        use TokenKind as T;
        if self.at(T::Eq) {
            let mut ib = NodeBuilder::new();
            ib.push_field(FieldName::Declarator, declarator);
            self.bump(&mut ib);
            let value = if self.at(T::LBrace) {
                self.parse_initializer_list()?
            } else {
                self.parse_expression()?
            };
            ib.push_field(FieldName::Value, value);
            b.push_field(FieldName::Declarator, ib.finish(NodeKind::InitDeclarator));
        } else {
            b.push_field(FieldName::Declarator, declarator);
            if self.at(T::Asm) {
                let asm = self.parse_gnu_asm_expression()?;
                b.push_node(asm);
            }
        }
        Ok(())
    }

    /// `typedef` (optionally under `__extension__`).
    pub(crate) fn parse_type_definition(&mut self) -> Parsed<Node> {
        use TokenKind as T;
        let mut b = NodeBuilder::new();
        if self.at(T::Extension) {
            self.bump(&mut b);
        }
        self.expect(&mut b, T::Typedef, ErrorCode::E1001)?;
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
        loop {
            let declarator = self.parse_declarator(DeclaratorContext::Type)?;
            b.push_field(FieldName::Declarator, declarator);
            if self.at(T::Comma) {
                self.bump(&mut b);
            } else {
                break;
            }
        }
        while self.at(T::Attribute) {
            let node = self.parse_attribute_specifier()?;
            b.push_node(node);
        }
        self.expect(&mut b, T::Semicolon, ErrorCode::E1001)?;
        Ok(b.finish(NodeKind::TypeDefinition))
    }

    /// `extern "C" declaration | definition | { … }`
    pub(crate) fn parse_linkage_specification(&mut self) -> Parsed<Node> {
        let mut b = NodeBuilder::new();
        self.bump(&mut b); // extern
        let value = self.parse_string_literal()?;
        b.push_field(FieldName::Value, value);
        let body = if self.at(TokenKind::LBrace) {
            let mut lb = NodeBuilder::new();
            self.expect(&mut lb, TokenKind::LBrace, ErrorCode::E1001)?;
            while !self.at(TokenKind::RBrace) && !self.at_eof() {
                self.parse_item_recovering(&mut lb, false);
            }
            self.expect(&mut lb, TokenKind::RBrace, ErrorCode::E1003)?;
            lb.finish(NodeKind::DeclarationList)
        } else {
            self.parse_declaration_like_node(true, true)?
        };
        b.push_field(FieldName::Body, body);
        Ok(b.finish(NodeKind::LinkageSpecification))
    }

    // --- declarators ---

    pub(crate) fn parse_declarator(&mut self, ctx: DeclaratorContext) -> Parsed<Node> {
        self.parse_declarator_ext(ctx, DeclaratorTrailing::None)
    }

    pub(crate) fn parse_declarator_ext(
        &mut self,
        ctx: DeclaratorContext,
        trailing: DeclaratorTrailing,
    ) -> Parsed<Node> {
        ensure_stack(|| self.parse_declarator_inner(ctx, trailing))
    }

    fn parse_declarator_inner(
        &mut self,
        ctx: DeclaratorContext,
        trailing: DeclaratorTrailing,
    ) -> Parsed<Node> {
        use TokenKind as T;
        let has_based = self.at(T::Based) && ctx != DeclaratorContext::Abstract;
        if self.at(T::Star) || has_based {
            let mut b = NodeBuilder::new();
            if has_based {
                let node = self.parse_ms_based_modifier()?;
                b.push_node(node);
            }
            self.expect(&mut b, T::Star, ErrorCode::E1006)?;
            loop {
                match self.current_kind() {
                    T::MsRestrict | T::MsUptr | T::MsSptr | T::MsUnaligned => {
                        let node = self.parse_ms_pointer_modifier();
                        b.push_node(node);
                    }
                    kind if kind.is_type_qualifier() => {
                        let node = self.take_leaf(NodeKind::TypeQualifier);
                        b.push_node(node);
                    }
                    _ => break,
                }
            }
            if ctx.allows_missing_inner() {
                if matches!(self.current_kind(), T::Star | T::LParen | T::LBracket) {
                    let inner = self.parse_declarator_ext(ctx, trailing)?;
                    b.push_field(FieldName::Declarator, inner);
                }
            } else {
                let inner = self.parse_declarator_ext(ctx, trailing)?;
                b.push_field(FieldName::Declarator, inner);
            }
            let Some(rule) = ctx.wrapper_rule(Wrapper::Pointer) else {
                return Err(self.error_here(ErrorCode::E1006));
            };
            self.note_dynamic(rule);
            return Ok(b.finish(wrapper_kind(ctx, Wrapper::Pointer)));
        }
        self.parse_direct_declarator(ctx, trailing)
    }

    /// After a `(` in abstract position: does the parenthesis group an
    /// inner declarator, or open a parameter list on a missing one?
    fn paren_starts_abstract_group(&self) -> bool {
        matches!(
            self.peek_kind(),
            TokenKind::Star | TokenKind::LParen | TokenKind::LBracket | TokenKind::MsCallModifier
        )
    }

    fn parse_direct_declarator(
        &mut self,
        ctx: DeclaratorContext,
        trailing: DeclaratorTrailing,
    ) -> Parsed<Node> {
        use TokenKind as T;
        let base: Option<Node> = match self.current_kind() {
            T::LParen
                if ctx != DeclaratorContext::Abstract || self.paren_starts_abstract_group() =>
            {
                let mut b = NodeBuilder::new();
                self.bump(&mut b); // (
                if self.at(T::MsCallModifier) {
                    let node = self.take_leaf(NodeKind::MsCallModifier);
                    b.push_node(node);
                }
                let inner = self.parse_declarator(ctx)?;
                b.push_field(FieldName::Declarator, inner);
                self.expect(&mut b, T::RParen, ErrorCode::E1003)?;
                let Some(rule) = ctx.wrapper_rule(Wrapper::Parenthesized) else {
                    return Err(self.error_here(ErrorCode::E1006));
                };
                if ctx != DeclaratorContext::Abstract {
                    // The grouped reading ranks below the call/cast
                    // readings of the same parentheses.
                    self.note_dynamic(rule);
                }
                Some(b.finish(wrapper_kind(ctx, Wrapper::Parenthesized)))
            }
            T::Identifier => match ctx.base_kind() {
                Some(kind) => Some(self.take_leaf(kind)),
                None => None,
            },
            T::PrimitiveType | T::Signed | T::Unsigned | T::Long | T::Short
                if ctx == DeclaratorContext::Type =>
            {
                Some(self.take_leaf(NodeKind::PrimitiveType))
            }
            _ if ctx == DeclaratorContext::Abstract => None,
            _ => return Err(self.error_here(ErrorCode::E1006)),
        };
        self.wrap_declarator_suffixes(ctx, base, trailing)
    }

    fn wrap_declarator_suffixes(
        &mut self,
        ctx: DeclaratorContext,
        base: Option<Node>,
        trailing: DeclaratorTrailing,
    ) -> Parsed<Node> {
        use TokenKind as T;
        let mut current = base;
        loop {
            if self.at(T::LParen) {
                let mut b = NodeBuilder::new();
                if let Some(inner) = current.take() {
                    b.push_field(FieldName::Declarator, inner);
                }
                let parameters = self.parse_parameter_list()?;
                b.push_field(FieldName::Parameters, parameters);
                if ctx == DeclaratorContext::Ordinary && trailing == DeclaratorTrailing::Declaration
                {
                    if self.at(T::Asm) {
                        let asm = self.parse_gnu_asm_expression()?;
                        b.push_node(asm);
                    }
                    while self.at(T::Attribute) {
                        let attr = self.parse_attribute_specifier()?;
                        b.push_node(attr);
                    }
                }
                current = Some(b.finish(wrapper_kind(ctx, Wrapper::Function)));
            } else if self.at(T::LBracket) && !self.at_double_bracket(T::LBracket) {
                let mut b = NodeBuilder::new();
                if let Some(inner) = current.take() {
                    b.push_field(FieldName::Declarator, inner);
                }
                self.bump(&mut b); // [
                loop {
                    if self.current_kind().is_type_qualifier() {
                        let node = self.take_leaf(NodeKind::TypeQualifier);
                        b.push_node(node);
                    } else if self.at(T::Static) {
                        self.bump(&mut b);
                    } else {
                        break;
                    }
                }
                if self.at(T::Star) && self.peek_kind() == T::RBracket {
                    self.bump_field(&mut b, FieldName::Size);
                } else if !self.at(T::RBracket) {
                    let size = self.parse_expression()?;
                    b.push_field(FieldName::Size, size);
                }
                self.expect(&mut b, T::RBracket, ErrorCode::E1003)?;
                current = Some(b.finish(wrapper_kind(ctx, Wrapper::Array)));
            } else {
                break;
            }
        }
        if self.at_double_bracket(T::LBracket)
            && ctx.wrapper_rule(Wrapper::Attributed).is_some()
            && current.is_some()
        {
            let mut b = NodeBuilder::new();
            if let Some(inner) = current.take() {
                b.push_field(FieldName::Declarator, inner);
            }
            while self.at_double_bracket(T::LBracket) {
                let attr = self.parse_attribute_declaration()?;
                b.push_node(attr);
            }
            current = Some(b.finish(wrapper_kind(ctx, Wrapper::Attributed)));
        }
        current.ok_or_else(|| self.error_here(ErrorCode::E1006))
    }

    /// Re-parse of the head declarator with the parameter list read as the
    /// old-style identifier list.
    fn parse_old_style_declarator(&mut self) -> Parsed<Node> {
        self.old_style_params = true;
        let result = self.parse_declarator_ext(DeclaratorContext::Ordinary, DeclaratorTrailing::None);
        self.old_style_params = false;
        result
    }

    // --- parameters ---

    pub(crate) fn parse_parameter_list(&mut self) -> Parsed<Node> {
        use TokenKind as T;
        let mut b = NodeBuilder::new();
        self.expect(&mut b, T::LParen, ErrorCode::E1001)?;
        if self.old_style_params {
            while !self.at(T::RParen) && !self.at_eof() {
                if self.at(T::Ellipsis) {
                    let node = self.take_leaf(NodeKind::VariadicParameter);
                    b.push_node(node);
                } else if self.at(T::Identifier) {
                    let node = self.take_leaf(NodeKind::Identifier);
                    b.push_node(node);
                } else {
                    return Err(self.error_here(ErrorCode::E1004));
                }
                if self.at(T::Comma) {
                    self.bump(&mut b);
                } else {
                    break;
                }
            }
        } else if self.at(T::LBrace) {
            // Statement-taking macro: `M({ … })` parsed as a declarator.
            let body = self.parse_compound_statement()?;
            b.push_node(body);
        } else {
            while !self.at(T::RParen) && !self.at_eof() {
                let parameter = if self.at(T::Ellipsis) {
                    self.take_leaf(NodeKind::VariadicParameter)
                } else {
                    self.parse_parameter_declaration()?
                };
                b.push_node(parameter);
                if self.at(T::Comma) {
                    self.bump(&mut b);
                } else {
                    break;
                }
            }
        }
        self.expect(&mut b, T::RParen, ErrorCode::E1003)?;
        Ok(b.finish(NodeKind::ParameterList))
    }

    fn parse_parameter_declaration(&mut self) -> Parsed<Node> {
        use TokenKind as T;
        let mut b = NodeBuilder::new();
        self.parse_declaration_specifiers(&mut b)?;
        if !self.at(T::Comma) && !self.at(T::RParen) {
            // Named first; the abstract family picks up `*`, `[]` and
            // parameter-list suffixes with no identifier underneath.
            if let Some(declarator) = self.try_parse_memo(crate::SpeculationKind::OrdinaryDeclarator, |p| {
                p.parse_declarator(DeclaratorContext::Ordinary)
            }) {
                b.push_field(FieldName::Declarator, declarator);
            } else if let Some(declarator) =
                self.try_parse_memo(crate::SpeculationKind::AbstractDeclarator, |p| {
                    p.parse_declarator(DeclaratorContext::Abstract)
                })
            {
                b.push_field(FieldName::Declarator, declarator);
            }
        }
        while self.at(T::Attribute) {
            let attr = self.parse_attribute_specifier()?;
            b.push_node(attr);
        }
        Ok(b.finish(NodeKind::ParameterDeclaration))
    }

    // --- vendor modifiers ---

    fn parse_ms_pointer_modifier(&mut self) -> Node {
        use TokenKind as T;
        let inner_kind = match self.current_kind() {
            T::MsRestrict => NodeKind::MsRestrictModifier,
            T::MsUptr => NodeKind::MsUnsignedPtrModifier,
            T::MsSptr => NodeKind::MsSignedPtrModifier,
            _ => NodeKind::MsUnalignedPtrModifier,
        };
        let inner = self.take_leaf(inner_kind);
        let mut b = NodeBuilder::new();
        b.push_node(inner);
        b.finish(NodeKind::MsPointerModifier)
    }

    /// `__based(args)`
    fn parse_ms_based_modifier(&mut self) -> Parsed<Node> {
        let mut b = NodeBuilder::new();
        self.bump(&mut b); // __based
        let arguments = self.parse_argument_list()?;
        b.push_node(arguments);
        Ok(b.finish(NodeKind::MsBasedModifier))
    }
}
